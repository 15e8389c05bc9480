//! solradmin DB - Index queue persistence on PostgreSQL.

pub mod repository;

pub use repository::QueueRepository;
