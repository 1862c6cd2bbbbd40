use menuboard_core::{CategoryId, EstablishmentId, ProductId};

use crate::category::{Category, sort_for_display};
use crate::establishment::Establishment;
use crate::product::Product;

/// Point-in-time view of one establishment's catalog.
///
/// Built by the repository layer and handed to pure consumers (pricing,
/// public menu rendering). Products and categories of other establishments
/// are never part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    establishment: Establishment,
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl CatalogSnapshot {
    /// Records not owned by `establishment` are discarded.
    pub fn new(establishment: Establishment, categories: Vec<Category>, products: Vec<Product>) -> Self {
        let owner = establishment.id;
        Self {
            establishment,
            categories: categories
                .into_iter()
                .filter(|c| c.establishment_id == owner)
                .collect(),
            products: products
                .into_iter()
                .filter(|p| p.establishment_id == owner)
                .collect(),
        }
    }

    pub fn establishment(&self) -> &Establishment {
        &self.establishment
    }

    pub fn establishment_id(&self) -> EstablishmentId {
        self.establishment.id
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Active categories in display order.
    pub fn visible_categories(&self) -> Vec<Category> {
        let mut visible: Vec<Category> = self.categories.iter().filter(|c| c.active).cloned().collect();
        sort_for_display(&mut visible);
        visible
    }

    /// Available products whose category (if any) is visible.
    pub fn visible_products(&self) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.available)
            .filter(|p| match p.category_id {
                Some(cid) => self.category(&cid).is_none_or(|c| c.active),
                None => true,
            })
            .cloned()
            .collect()
    }
}
