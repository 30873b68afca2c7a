// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and liveness. Inputs are untrusted and validated here.

pub mod auth;
pub mod health;

pub use health::health;
