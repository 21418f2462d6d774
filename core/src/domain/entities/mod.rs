//! Domain entities representing core business objects.

pub mod token;
pub mod user;


// Re-export commonly used types
pub use token::{
    AccessClaims, RefreshToken, ACCESS_TOKEN_EXPIRY_SECONDS, REFRESH_TOKEN_BYTES,
    REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use user::User;
