//! Shared types used across the codebase

/// Write operations supported on registry records.
/// Validation rules differ between the two (updates also carry a status).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}
