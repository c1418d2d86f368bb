// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind middleware::require_auth; handlers may read the
// verified identity through `Extension<AuthUser>`.
pub mod doctors;
pub mod hospitals;
