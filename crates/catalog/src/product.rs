use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use menuboard_core::error::require_non_blank;
use menuboard_core::{
    CategoryId, DomainError, DomainResult, Entity, EstablishmentId, Money, ProductId, ValueObject,
};

/// How the choices of an option group are picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Exactly one item (e.g. size).
    #[default]
    SingleSelect,
    /// Between `min` and `max` items.
    MultiSelect,
    /// Free-text or quantity value; unmatched values are still recorded.
    Quantity,
    /// Independent add-ons (e.g. extra cheese).
    AdditiveCheckbox,
}

/// One selectable value of an option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    #[serde(default)]
    pub extra_price: Money,
}

impl ValueObject for OptionItem {}

fn default_one() -> u32 {
    1
}

/// A named axis of product customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub name: String,
    #[serde(default)]
    pub kind: OptionKind,
    /// Selection bounds, only meaningful for [`OptionKind::MultiSelect`].
    #[serde(default = "default_one")]
    pub min: u32,
    #[serde(default = "default_one")]
    pub max: u32,
    #[serde(default)]
    pub items: Vec<OptionItem>,
}

impl ValueObject for OptionGroup {}

impl OptionGroup {
    /// Exact label match.
    pub fn item(&self, label: &str) -> Option<&OptionItem> {
        self.items.iter().find(|i| i.label == label)
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_blank("option group name", &self.name)?;
        if self.kind == OptionKind::MultiSelect && self.min > self.max {
            return Err(DomainError::validation(format!(
                "option group '{}': min ({}) exceeds max ({})",
                self.name, self.min, self.max
            )));
        }
        for item in &self.items {
            require_non_blank("option item label", &item.label)?;
        }
        Ok(())
    }
}

/// A menu product. Prices are in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub establishment_id: EstablishmentId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub base_price: Money,
    pub available: bool,
    pub option_groups: Vec<OptionGroup>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub base_price: Money,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
}

/// Partial product update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub base_price: Option<Money>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub option_groups: Option<Vec<OptionGroup>>,
}

impl Product {
    pub fn new(
        id: ProductId,
        establishment_id: EstablishmentId,
        new: NewProduct,
    ) -> DomainResult<Self> {
        require_non_blank("name", &new.name)?;
        validate_option_groups(&new.option_groups)?;

        Ok(Self {
            id,
            establishment_id,
            category_id: new.category_id,
            name: new.name.trim().to_string(),
            description: new.description,
            image_url: new.image_url,
            base_price: new.base_price,
            available: new.available.unwrap_or(true),
            option_groups: new.option_groups,
        })
    }

    pub fn apply_update(&mut self, update: ProductUpdate) -> DomainResult<()> {
        if let Some(name) = &update.name {
            require_non_blank("name", name)?;
        }
        if let Some(groups) = &update.option_groups {
            validate_option_groups(groups)?;
        }

        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(price) = update.base_price {
            self.base_price = price;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        if let Some(groups) = update.option_groups {
            self.option_groups = groups;
        }
        Ok(())
    }

    /// Exact-name lookup of an option group.
    pub fn option_group(&self, name: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.name == name)
    }
}

fn validate_option_groups(groups: &[OptionGroup]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for group in groups {
        group.validate()?;
        if !seen.insert(group.name.as_str()) {
            return Err(DomainError::validation(format!(
                "duplicate option group '{}'",
                group.name
            )));
        }
    }
    Ok(())
}
