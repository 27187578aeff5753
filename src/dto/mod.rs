//! Backend JSON envelopes and their conversion into domain projections.

pub mod errors;
pub mod filters;
pub mod statistics;
pub mod suggestions;
