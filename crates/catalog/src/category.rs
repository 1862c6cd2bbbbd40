use serde::{Deserialize, Serialize};

use menuboard_core::error::require_non_blank;
use menuboard_core::{CategoryId, DomainResult, Entity, EstablishmentId};

/// Menu section (e.g. "Pizzas", "Drinks"), listed by ascending `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub establishment_id: EstablishmentId,
    pub name: String,
    pub sort_order: i32,
    /// Inactive categories are hidden from the public menu.
    pub active: bool,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl Category {
    pub fn new(
        id: CategoryId,
        establishment_id: EstablishmentId,
        new: NewCategory,
    ) -> DomainResult<Self> {
        require_non_blank("name", &new.name)?;
        Ok(Self {
            id,
            establishment_id,
            name: new.name.trim().to_string(),
            sort_order: new.sort_order.unwrap_or(0),
            active: new.active.unwrap_or(true),
        })
    }

    pub fn apply_update(&mut self, update: CategoryUpdate) -> DomainResult<()> {
        if let Some(name) = &update.name {
            require_non_blank("name", name)?;
        }
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(order) = update.sort_order {
            self.sort_order = order;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        Ok(())
    }
}

/// Sort categories for display: ascending `sort_order`, name as tie-breaker.
pub fn sort_for_display(categories: &mut [Category]) {
    categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
}
