//! Infrastructure layer: product storage adapters and configuration.

pub mod config;
pub mod repository;

pub use config::{AppConfig, ConfigError};
pub use repository::{
    InMemoryProductRepository, PostgresProductRepository, ProductRepository, RepositoryError,
    RepositoryResult,
};
