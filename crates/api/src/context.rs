use std::sync::Arc;

use shopfront_infra::{InMemoryProductRepository, ProductRepository};

/// Application context shared by every handler.
///
/// Built once at startup (or per test) and handed to the router as state;
/// there is no process-global storage handle.
#[derive(Clone)]
pub struct AppContext {
    products: Arc<dyn ProductRepository>,
}

impl AppContext {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Context backed by a fresh in-memory product table.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()))
    }

    pub fn products(&self) -> &dyn ProductRepository {
        self.products.as_ref()
    }
}

impl core::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
