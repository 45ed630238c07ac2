use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use shopfront_core::{Entity, ProductId};
use shopfront_products::{NewProduct, Product};

use super::store::{ProductRepository, RepositoryError, RepositoryResult};

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

/// In-memory product table for tests/dev.
///
/// Ids start at 1 and are never reused, like a database sequence.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    inner: RwLock<Table>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("in-memory product table lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, fields: NewProduct) -> RepositoryResult<Product> {
        let mut table = self.inner.write().map_err(poisoned)?;
        let id = ProductId::new(table.next_id);
        table.next_id += 1;

        let product = Product::from_new(id, fields, Utc::now());
        table.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn save(&self, product: &Product) -> RepositoryResult<Product> {
        let mut table = self.inner.write().map_err(poisoned)?;
        let id = *product.id();
        let row = table.rows.get_mut(&id).ok_or(RepositoryError::Missing(id))?;

        let mut stored = product.clone();
        stored.touch(Utc::now());
        *row = stored.clone();
        Ok(stored)
    }

    async fn destroy(&self, product: &Product) -> RepositoryResult<()> {
        let mut table = self.inner.write().map_err(poisoned)?;
        let id = *product.id();
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::Missing(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_products::{Price, ProductChanges};

    fn fields(name: &str, price: f64) -> NewProduct {
        NewProduct::new(name, Price::new(price).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_ascending_ids() {
        let repo = InMemoryProductRepository::new();
        let first = repo.create(fields("Mouse", 100.0)).await.unwrap();
        let second = repo.create(fields("Keyboard", 45.0)).await.unwrap();

        assert_eq!(*first.id(), ProductId::new(1));
        assert_eq!(*second.id(), ProductId::new(2));
        assert!(first.availability());
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let repo = InMemoryProductRepository::new();
        for (name, price) in [("C", 3.0), ("A", 1.0), ("B", 2.0)] {
            repo.create(fields(name, price)).await.unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_ids() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.find_by_id(ProductId::new(2000)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_persists_changes_and_bumps_updated_at() {
        let repo = InMemoryProductRepository::new();
        let mut product = repo.create(fields("Mouse", 100.0)).await.unwrap();

        product.replace(ProductChanges::new("Trackball", Price::new(80.0).unwrap(), false).unwrap());
        let saved = repo.save(&product).await.unwrap();
        assert!(saved.updated_at() >= saved.created_at());

        let stored = repo.find_by_id(*product.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Trackball");
        assert_eq!(stored.price().value(), 80.0);
        assert!(!stored.availability());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_destroy() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(fields("Mouse", 100.0)).await.unwrap();
        repo.destroy(&product).await.unwrap();

        assert!(repo.find_by_id(*product.id()).await.unwrap().is_none());
        let next = repo.create(fields("Mouse", 100.0)).await.unwrap();
        assert_eq!(*next.id(), ProductId::new(2));
    }

    #[tokio::test]
    async fn writes_to_a_vanished_row_report_missing() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(fields("Mouse", 100.0)).await.unwrap();
        repo.destroy(&product).await.unwrap();

        assert!(matches!(repo.save(&product).await, Err(RepositoryError::Missing(id)) if id == *product.id()));
        assert!(matches!(repo.destroy(&product).await, Err(RepositoryError::Missing(_))));
    }
}
