//! Postgres-backed product repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError |
//! |------------|-----------------|
//! | `PoolClosed` / `PoolTimedOut` | `Unavailable` |
//! | any other | `Database` (with the failing operation) |
//!
//! Rows that decode but break a product invariant (empty name, non-positive
//! price) surface as `Corrupt`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use shopfront_core::{Entity, ProductId};
use shopfront_products::{NewProduct, Product};

use super::store::{ProductRepository, RepositoryError, RepositoryResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id           BIGSERIAL PRIMARY KEY,
    name         VARCHAR(100) NOT NULL CHECK (name <> ''),
    price        DOUBLE PRECISION NOT NULL CHECK (price > 0),
    availability BOOLEAN NOT NULL DEFAULT TRUE,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Product table in Postgres.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; every method is a
/// single statement.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `products` table when it is missing. Existing tables are
    /// left untouched.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, availability, created_at, updated_at
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(|row| product_from_row("find_all", row)).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, availability, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref()
            .map(|row| product_from_row("find_by_id", row))
            .transpose()
    }

    #[instrument(skip(self, new_product), fields(name = new_product.name()), err)]
    async fn create(&self, new_product: NewProduct) -> RepositoryResult<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price, availability)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, availability, created_at, updated_at
            "#,
        )
        .bind(new_product.name())
        .bind(new_product.price().value())
        .bind(new_product.availability())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        product_from_row("create", &row)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn save(&self, product: &Product) -> RepositoryResult<Product> {
        let id = *product.id();
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $2,
                price = $3,
                availability = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, availability, created_at, updated_at
            "#,
        )
        .bind(id.get())
        .bind(product.name())
        .bind(product.price().value())
        .bind(product.availability())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save", e))?;

        match row {
            Some(row) => product_from_row("save", &row),
            None => Err(RepositoryError::Missing(id)),
        }
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn destroy(&self, product: &Product) -> RepositoryResult<()> {
        let id = *product.id();
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("destroy", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Missing(id));
        }
        Ok(())
    }
}

fn product_from_row(operation: &'static str, row: &PgRow) -> RepositoryResult<Product> {
    let decode = |e: sqlx::Error| map_sqlx_error(operation, e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let price: f64 = row.try_get("price").map_err(decode)?;
    let availability: bool = row.try_get("availability").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

    Ok(Product::restore(
        ProductId::new(id),
        name,
        price,
        availability,
        created_at,
        updated_at,
    )?)
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolClosed => {
            RepositoryError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        source => RepositoryError::Database { operation, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_products::Price;

    /// Runs only when `TEST_DATABASE_URL` points at a disposable database.
    async fn repository() -> Option<PostgresProductRepository> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let repo = PostgresProductRepository::connect(&url, 2).await.ok()?;
        repo.ensure_schema().await.ok()?;
        Some(repo)
    }

    #[test]
    fn pool_exhaustion_maps_to_unavailable() {
        assert!(matches!(
            map_sqlx_error("find_all", sqlx::Error::PoolTimedOut),
            RepositoryError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error("find_all", sqlx::Error::RowNotFound),
            RepositoryError::Database { operation: "find_all", .. }
        ));
    }

    #[tokio::test]
    async fn crud_round_trip_against_postgres() {
        let Some(repo) = repository().await else {
            return;
        };

        let fields = NewProduct::new("Postgres Mouse", Price::new(12.5).unwrap()).unwrap();
        let mut product = repo.create(fields).await.unwrap();
        assert!(product.availability());

        product.toggle_availability();
        let saved = repo.save(&product).await.unwrap();
        assert!(!saved.availability());

        let listed = repo.find_all().await.unwrap();
        assert!(listed.windows(2).all(|w| *w[0].id() < *w[1].id()));

        repo.destroy(&saved).await.unwrap();
        assert!(repo.find_by_id(*saved.id()).await.unwrap().is_none());
        assert!(matches!(repo.destroy(&saved).await, Err(RepositoryError::Missing(_))));
    }
}
