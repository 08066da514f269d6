// HTTP routes
pub mod auth;
pub mod health;
pub mod parse;

pub use auth::*;
pub use health::*;
pub use parse::*;
