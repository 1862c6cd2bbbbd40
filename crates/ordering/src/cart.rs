use serde::{Deserialize, Serialize};

use menuboard_core::ProductId;

/// A customer's choice within a named option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    pub group_name: String,
    pub selection: String,
}

/// One requested product in a cart.
///
/// `quantity` is signed on the wire so that zero and negative values reach the
/// pricing engine and are rejected as a validation failure instead of a parse
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub selected_options: Vec<OptionSelection>,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
            notes: None,
            selected_options: Vec::new(),
        }
    }

    pub fn with_option(mut self, group_name: impl Into<String>, selection: impl Into<String>) -> Self {
        self.selected_options.push(OptionSelection {
            group_name: group_name.into(),
            selection: selection.into(),
        });
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
