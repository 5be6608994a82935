//! Domain models and DTOs.

pub mod issue;
pub mod pagination;
pub mod query;
