// Medicine Parser - API Core
//
// HTTP surface over the medicine-parser engine: token issuance, per-caller
// rate limits and the single/batch extraction endpoints.

pub mod config;
pub mod server;

pub use config::*;
