//! Authentication service module
//!
//! Login, refresh and logout on top of the token issuer.

mod password;
mod service;

#[cfg(test)]
mod tests;

pub use password::{BcryptPasswordVerifier, PasswordVerifier};
pub use service::AuthService;
