// handlers/mod.rs - Two handler tiers
//
// Public (no auth) → Protected (bearer token verified by middleware::require_auth)
pub mod protected;
pub mod public;
