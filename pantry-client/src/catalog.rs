//! Product catalog cache
//!
//! In-memory mirror of the last successful server read. The cache is only
//! ever replaced wholesale; with no partial updates it can never drift from
//! the server by more than one refresh.

use std::sync::RwLock;

use shared::models::Product;

/// Category precedence for the admin listing. Categories not listed here
/// sort after all listed ones and keep their relative server order.
const CATEGORY_ORDER: [&str; 3] = ["meat", "vegetable", "fruit"];

fn category_rank(category: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or(CATEGORY_ORDER.len())
}

/// Ordered snapshot of the remote product catalog.
#[derive(Debug, Default)]
pub struct CatalogCache {
    products: RwLock<Vec<Product>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog with a freshly sorted copy of `products`.
    pub fn replace_all(&self, mut products: Vec<Product>) {
        // Stable sort: ties keep their incoming order.
        products.sort_by_key(|p| category_rank(&p.category));
        *self.products.write().expect("catalog lock poisoned") = products;
    }

    /// The current ordered snapshot.
    pub fn current(&self) -> Vec<Product> {
        self.products.read().expect("catalog lock poisoned").clone()
    }

    /// Look up a product by id.
    pub fn find(&self, id: &str) -> Option<Product> {
        self.products
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.products.read().expect("catalog lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
