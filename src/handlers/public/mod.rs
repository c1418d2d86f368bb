// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, account registration, and liveness endpoints.
pub mod health;
pub mod login;
pub mod register;
pub mod root;
