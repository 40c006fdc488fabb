//! Alumni module: domain types, storage port and adapters, and the service.

pub mod chart;
pub mod domain;
pub mod import;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::AlumniService;
