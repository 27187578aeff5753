//! Client-side projections of the complaints backend.

pub mod complaint;
pub mod filters;
pub mod job;
pub mod notification;
pub mod statistics;
pub mod suggestion;
pub mod types;
