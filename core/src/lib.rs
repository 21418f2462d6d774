//! # HR Core
//!
//! Domain layer of the HR authentication backend: refresh-token entities and
//! stores, the JWT token issuer, the login/refresh/logout facade, and the
//! error taxonomy shared by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
