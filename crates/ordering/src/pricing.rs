//! Order pricing engine.
//!
//! Resolves cart lines against a [`CatalogSnapshot`] and produces a priced,
//! denormalized order. Deterministic and side-effect free: the same cart over
//! the same snapshot always yields the same [`PricedOrder`].

use tracing::warn;

use menuboard_catalog::{CatalogSnapshot, OptionKind, Product};
use menuboard_core::{EstablishmentId, Money};

use crate::cart::{CartLine, OptionSelection};
use crate::error::PricingError;
use crate::order::{OrderLineItem, SelectedOption};

/// Outcome of resolving one requested option selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionResolution {
    /// An option item matched; its extra price is charged.
    Matched {
        group: String,
        item: String,
        extra_price: Money,
    },
    /// The product has no group with this name; the selection is ignored.
    IgnoredUnknownGroup { group: String },
    /// No item matched a quantity/free-text group; recorded at no charge.
    FreeTextAccepted { group: String, value: String },
    /// No item matched in a non-free-text group; not recorded.
    Dropped { group: String, selection: String },
}

impl OptionResolution {
    /// The snapshot to store on the order line, if this selection is kept.
    pub fn selected_option(&self) -> Option<SelectedOption> {
        match self {
            OptionResolution::Matched {
                group,
                item,
                extra_price,
            } => Some(SelectedOption {
                group_name: group.clone(),
                selection: item.clone(),
                extra_price: *extra_price,
            }),
            OptionResolution::FreeTextAccepted { group, value } => Some(SelectedOption {
                group_name: group.clone(),
                selection: value.clone(),
                extra_price: Money::ZERO,
            }),
            OptionResolution::IgnoredUnknownGroup { .. } | OptionResolution::Dropped { .. } => None,
        }
    }

    pub fn extra_price(&self) -> Money {
        match self {
            OptionResolution::Matched { extra_price, .. } => *extra_price,
            _ => Money::ZERO,
        }
    }
}

/// A resolved cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub item: OrderLineItem,
    /// One entry per requested selection, in request order.
    pub resolutions: Vec<OptionResolution>,
    pub subtotal: Money,
}

/// A cart after every line was resolved and totals computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub establishment_id: EstablishmentId,
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

impl PricedOrder {
    pub fn line_items(&self) -> impl Iterator<Item = &OrderLineItem> {
        self.lines.iter().map(|l| &l.item)
    }
}

/// Resolve one selection against a product's option groups.
pub fn resolve_option(product: &Product, selection: &OptionSelection) -> OptionResolution {
    let Some(group) = product.option_group(&selection.group_name) else {
        return OptionResolution::IgnoredUnknownGroup {
            group: selection.group_name.clone(),
        };
    };

    match group.item(&selection.selection) {
        Some(item) => OptionResolution::Matched {
            group: group.name.clone(),
            item: item.label.clone(),
            extra_price: item.extra_price,
        },
        None if group.kind == OptionKind::Quantity => OptionResolution::FreeTextAccepted {
            group: group.name.clone(),
            value: selection.selection.clone(),
        },
        None => OptionResolution::Dropped {
            group: group.name.clone(),
            selection: selection.selection.clone(),
        },
    }
}

/// Price a cart for `establishment_id` against `catalog`.
///
/// All-or-nothing: the first invalid quantity or unknown product rejects the
/// whole cart. Quantities are checked before any product is resolved.
pub fn price_order(
    establishment_id: EstablishmentId,
    catalog: &CatalogSnapshot,
    cart: &[CartLine],
) -> Result<PricedOrder, PricingError> {
    if catalog.establishment_id() != establishment_id {
        return Err(PricingError::EstablishmentNotFound(establishment_id));
    }
    if cart.is_empty() {
        return Err(PricingError::EmptyCart);
    }

    let quantities = cart
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            u32::try_from(line.quantity)
                .ok()
                .filter(|q| *q > 0)
                .ok_or(PricingError::InvalidQuantity {
                    line: idx + 1,
                    quantity: line.quantity,
                })
        })
        .collect::<Result<Vec<u32>, _>>()?;

    let mut lines = Vec::with_capacity(cart.len());
    let mut total = Money::ZERO;

    for (line, quantity) in cart.iter().zip(quantities) {
        let product = catalog
            .product(&line.product_id)
            .ok_or(PricingError::ProductNotFound(line.product_id))?;

        let priced = price_line(product, line, quantity)?;
        total = total
            .checked_add(priced.subtotal)
            .map_err(|_| PricingError::Overflow)?;
        lines.push(priced);
    }

    Ok(PricedOrder {
        establishment_id,
        lines,
        total,
    })
}

fn price_line(product: &Product, line: &CartLine, quantity: u32) -> Result<PricedLine, PricingError> {
    let mut unit_price = product.base_price;
    let mut selected_options = Vec::new();
    let mut resolutions = Vec::with_capacity(line.selected_options.len());

    for selection in &line.selected_options {
        let resolution = resolve_option(product, selection);
        match &resolution {
            OptionResolution::IgnoredUnknownGroup { group } => {
                warn!(product_id = %product.id, group = %group, "ignoring selection for unknown option group");
            }
            OptionResolution::Dropped { group, selection } => {
                warn!(product_id = %product.id, group = %group, selection = %selection, "dropping unmatched option selection");
            }
            _ => {}
        }

        unit_price = unit_price
            .checked_add(resolution.extra_price())
            .map_err(|_| PricingError::Overflow)?;
        if let Some(selected) = resolution.selected_option() {
            selected_options.push(selected);
        }
        resolutions.push(resolution);
    }

    let subtotal = unit_price
        .checked_mul(quantity)
        .map_err(|_| PricingError::Overflow)?;

    Ok(PricedLine {
        item: OrderLineItem {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price,
            quantity,
            notes: line.notes.clone(),
            selected_options,
        },
        resolutions,
        subtotal,
    })
}
