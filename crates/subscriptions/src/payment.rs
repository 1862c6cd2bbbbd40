use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menuboard_catalog::Subscription;

use crate::plan::Plan;

/// Payment status as reported by the provider callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Approved,
    Pending,
    InProcess,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
}

/// Apply a payment outcome to the stored subscription flags.
///
/// - `approved`: active, expiry extended by the plan duration from the later of
///   `now` and the current unexpired expiry
/// - `cancelled`, `refunded`, `charged_back`: inactive
/// - anything else: unchanged
///
/// Returns whether the subscription changed.
pub fn apply_payment_status(
    subscription: &mut Subscription,
    status: PaymentStatus,
    plan: Plan,
    now: DateTime<Utc>,
) -> bool {
    let before = subscription.clone();

    match status {
        PaymentStatus::Approved => {
            let start = subscription
                .expires_at
                .filter(|exp| subscription.active && *exp > now)
                .unwrap_or(now);
            subscription.active = true;
            subscription.expires_at = Some(start + plan.duration());
        }
        PaymentStatus::Cancelled | PaymentStatus::Refunded | PaymentStatus::ChargedBack => {
            subscription.active = false;
        }
        PaymentStatus::Pending | PaymentStatus::InProcess | PaymentStatus::Rejected => {}
    }

    *subscription != before
}
