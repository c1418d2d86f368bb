pub mod account;
pub mod hash;
pub mod serve;
