//! Product persistence: the storage trait and its adapters.

pub mod in_memory;
pub mod postgres;
pub mod store;

pub use in_memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;
pub use store::{ProductRepository, RepositoryError, RepositoryResult};
