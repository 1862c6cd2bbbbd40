use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menuboard_core::error::require_non_blank;
use menuboard_core::{
    DomainError, DomainResult, Entity, EstablishmentId, Money, OrderId, ProductId, ValueObject,
};

use crate::pricing::PricedOrder;

/// Order status lifecycle.
///
/// `pending → confirmed | cancelled`, `confirmed → delivered`. Nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
    Delivered,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Delivered)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one accepted option selection and what it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub group_name: String,
    pub selection: String,
    pub extra_price: Money,
}

impl ValueObject for SelectedOption {}

/// Snapshot of a product at order time. Never follows later catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    /// Base price plus every accepted option extra.
    pub unit_price: Money,
    pub quantity: u32,
    pub notes: Option<String>,
    pub selected_options: Vec<SelectedOption>,
}

impl ValueObject for OrderLineItem {}

impl OrderLineItem {
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Denormalized customer contact captured with the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl ValueObject for CustomerContact {}

impl CustomerContact {
    fn validate(&self) -> DomainResult<()> {
        require_non_blank("customer name", &self.name)?;
        require_non_blank("customer phone", &self.phone)
    }
}

/// A priced, persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub establishment_id: EstablishmentId,
    pub customer: CustomerContact,
    pub notes: Option<String>,
    pub lines: Vec<OrderLineItem>,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Merchant-side edit of an existing order. Lines and total are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Order {
    /// Build a `pending` order from a successfully priced cart.
    pub fn place(
        id: OrderId,
        priced: PricedOrder,
        customer: CustomerContact,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        customer.validate()?;
        if priced.lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }

        let total = priced.total;
        Ok(Self {
            id,
            establishment_id: priced.establishment_id,
            customer,
            notes: notes.filter(|n| !n.trim().is_empty()),
            lines: priced.lines.into_iter().map(|l| l.item).collect(),
            total,
            status: OrderStatus::Pending,
            created_at: now,
        })
    }

    pub fn transition(&mut self, next: OrderStatus) -> DomainResult<()> {
        if self.status == next {
            return Err(DomainError::conflict(format!("order is already {next}")));
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot move order from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Validation and the status transition are checked before any field changes.
    pub fn apply_update(&mut self, update: OrderUpdate) -> DomainResult<()> {
        let mut customer = self.customer.clone();
        if let Some(name) = update.customer_name {
            customer.name = name;
        }
        if let Some(phone) = update.customer_phone {
            customer.phone = phone;
        }
        if let Some(address) = update.customer_address {
            customer.address = Some(address);
        }
        customer.validate()?;

        if let Some(next) = update.status {
            self.transition(next)?;
        }
        self.customer = customer;
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        Ok(())
    }

    /// Σ unit_price × quantity over the line snapshots.
    pub fn computed_total(&self) -> DomainResult<Money> {
        self.lines
            .iter()
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.subtotal()?))
    }
}
