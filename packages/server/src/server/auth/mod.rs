// Token issuance and verification
pub mod credentials;
pub mod jwt;

pub use credentials::*;
pub use jwt::*;
