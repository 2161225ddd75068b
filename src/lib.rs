//! JWT validation against local and remote JSON Web Key sets.
//!
//! Given a compact-serialized token, a configured expected algorithm, and a
//! key source, [`JwtProcessor`] verifies the token's signature and exposes
//! its claims:
//!
//! - HS256/384/512, RS256/384/512, ES256/384
//! - Local key sources loaded once from a JWK Set file
//! - Remote key sources fetched lazily over HTTPS, cached with atomic
//!   snapshot swaps, with concurrent cache misses collapsed into one fetch
//! - A typed error taxonomy separating permanent misconfiguration from
//!   per-token rejection and transient key-resolution failures
//!
//! ```no_run
//! use veritoken::{Algorithm, JwtConfig, JwtProcessor};
//!
//! # async fn example(token: &str) -> Result<(), veritoken::JwtError> {
//! let config = JwtConfig::new(Algorithm::RS256)
//!     .with_jwk_url("https://issuer.example/.well-known/jwks.json");
//! let processor = JwtProcessor::new(config)?;
//!
//! let claims = processor.process(token).await?;
//! println!("subject: {:?}", claims.get("sub"));
//! # Ok(())
//! # }
//! ```
//!
//! The configured algorithm is enforced before any key lookup, so a token
//! declaring a different (even technically valid) algorithm is rejected
//! outright rather than matched against whatever keys happen to exist.

mod algorithm;
mod config;
mod error;
mod jwk;
mod processor;
mod select;
mod source;
mod token;
mod verify;

pub use algorithm::{Algorithm, KeyFamily};
pub use config::{JwtConfig, ValidationOptions};
pub use error::{JwtError, JwtResult};
pub use jwk::{Jwk, JwkSet, Key};
pub use processor::{Claims, JwtProcessor};
pub use source::{KeySource, LocalKeySource, RemoteKeySource};
