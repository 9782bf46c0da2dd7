//! # activityhub-auth
//!
//! Authentication primitives for ActivityHub.
//!
//! - `jwt`: access/refresh token creation and validation
//! - `password`: Argon2id hashing and password policy

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::{PasswordHasher, PasswordValidator};
