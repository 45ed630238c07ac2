use std::sync::Arc;

use thiserror::Error;

use shopfront_core::{DomainError, ProductId};
use shopfront_products::{NewProduct, Product};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage operation error.
///
/// Absence of a row on lookup is not an error (`Ok(None)`); these variants
/// describe storage that could not do what was asked.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A stored row violates a product invariant.
    #[error("stored product row is invalid: {0}")]
    Corrupt(#[from] DomainError),

    /// The row was removed between lookup and write.
    #[error("product {0} no longer exists")]
    Missing(ProductId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator for products.
///
/// Each call is atomic on its own; callers never group calls into a
/// transaction.
#[async_trait::async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by id ascending.
    async fn find_all(&self) -> RepositoryResult<Vec<Product>>;

    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;

    /// Insert a product; storage assigns the id and timestamps.
    async fn create(&self, fields: NewProduct) -> RepositoryResult<Product>;

    /// Persist the current state of an existing product and return the stored row.
    async fn save(&self, product: &Product) -> RepositoryResult<Product>;

    async fn destroy(&self, product: &Product) -> RepositoryResult<()>;
}

#[async_trait::async_trait]
impl<S> ProductRepository for Arc<S>
where
    S: ProductRepository + ?Sized,
{
    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, fields: NewProduct) -> RepositoryResult<Product> {
        (**self).create(fields).await
    }

    async fn save(&self, product: &Product) -> RepositoryResult<Product> {
        (**self).save(product).await
    }

    async fn destroy(&self, product: &Product) -> RepositoryResult<()> {
        (**self).destroy(product).await
    }
}
