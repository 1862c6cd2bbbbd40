use std::sync::Arc;

use menuboard_catalog::{CatalogSnapshot, Category, Establishment, Product, category::sort_for_display};
use menuboard_core::{CategoryId, DomainError, DomainResult, Entity, EstablishmentId, OrderId, ProductId};
use menuboard_ordering::Order;

use super::scoped_store::{InMemoryScopedStore, ScopedStore};

type Categories = Arc<dyn ScopedStore<CategoryId, Category>>;
type Products = Arc<dyn ScopedStore<ProductId, Product>>;
type Orders = Arc<dyn ScopedStore<OrderId, Order>>;

/// Categories, products and orders of every establishment.
///
/// Owns the one cross-collection rule: deleting a category deletes its products.
#[derive(Clone)]
pub struct MenuStore {
    categories: Categories,
    products: Products,
    orders: Orders,
}

impl MenuStore {
    pub fn new(categories: Categories, products: Products, orders: Orders) -> Self {
        Self {
            categories,
            products,
            orders,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryScopedStore::new()),
            Arc::new(InMemoryScopedStore::new()),
            Arc::new(InMemoryScopedStore::new()),
        )
    }

    // Categories

    /// Display order: ascending `sort_order`, then name.
    pub fn categories(&self, establishment_id: EstablishmentId) -> Vec<Category> {
        let mut categories = self.categories.list(establishment_id);
        sort_for_display(&mut categories);
        categories
    }

    pub fn category(&self, establishment_id: EstablishmentId, id: CategoryId) -> DomainResult<Category> {
        self.categories
            .get(establishment_id, &id)
            .ok_or_else(|| DomainError::not_found("category"))
    }

    pub fn save_category(&self, category: Category) -> DomainResult<()> {
        let id = *category.id();
        self.categories.upsert(category.establishment_id, id, category)
    }

    /// Remove a category and every product filed under it. Returns the number of products removed.
    pub fn delete_category(&self, establishment_id: EstablishmentId, id: CategoryId) -> DomainResult<usize> {
        self.category(establishment_id, id)?;
        // Products first: a failed cascade keeps the category around.
        let removed = self
            .products
            .retain(establishment_id, &|p| p.category_id != Some(id))?;
        self.categories.remove(establishment_id, &id)?;
        Ok(removed)
    }

    // Products

    pub fn products(&self, establishment_id: EstablishmentId) -> Vec<Product> {
        let mut products = self.products.list(establishment_id);
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    pub fn products_in_category(&self, establishment_id: EstablishmentId, category_id: CategoryId) -> Vec<Product> {
        let mut products = self.products(establishment_id);
        products.retain(|p| p.category_id == Some(category_id));
        products
    }

    pub fn product(&self, establishment_id: EstablishmentId, id: ProductId) -> DomainResult<Product> {
        self.products
            .get(establishment_id, &id)
            .ok_or_else(|| DomainError::not_found("product"))
    }

    pub fn save_product(&self, product: Product) -> DomainResult<()> {
        let id = *product.id();
        self.products.upsert(product.establishment_id, id, product)
    }

    pub fn delete_product(&self, establishment_id: EstablishmentId, id: ProductId) -> DomainResult<()> {
        self.products
            .remove(establishment_id, &id)?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("product"))
    }

    // Orders

    /// Newest first.
    pub fn orders(&self, establishment_id: EstablishmentId) -> Vec<Order> {
        let mut orders = self.orders.list(establishment_id);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        orders
    }

    pub fn order(&self, establishment_id: EstablishmentId, id: OrderId) -> DomainResult<Order> {
        self.orders
            .get(establishment_id, &id)
            .ok_or_else(|| DomainError::not_found("order"))
    }

    pub fn save_order(&self, order: Order) -> DomainResult<()> {
        let id = *order.id();
        self.orders.upsert(order.establishment_id, id, order)
    }

    pub fn delete_order(&self, establishment_id: EstablishmentId, id: OrderId) -> DomainResult<()> {
        self.orders
            .remove(establishment_id, &id)?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("order"))
    }

    /// Point-in-time catalog of one establishment, as consumed by pricing and the public menu.
    pub fn snapshot(&self, establishment: Establishment) -> CatalogSnapshot {
        let id = establishment.id;
        CatalogSnapshot::new(establishment, self.categories.list(id), self.products.list(id))
    }
}
