//! Service layer providing alumni record operations on top of models.
//! - Storage sits behind the `AlumniRepository` port (SeaORM or in-memory).
//! - Reuses validation and entity definitions in `models` crate.
//! - Cursor pagination, chart aggregation and CSV import live here, free of HTTP concerns.

pub mod errors;
pub mod pagination;
pub mod alumni;
#[cfg(test)]
pub mod test_support;

pub use alumni::AlumniService;
