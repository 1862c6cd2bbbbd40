use chrono::{DateTime, Utc};

use menuboard_catalog::Establishment;
use menuboard_core::{DomainError, DomainResult};

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotFound,
    Inactive,
    /// Flagged active but past `expires_at`; the sweeper has not caught up yet.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
    Granted,
    Denied(DenialReason),
}

impl Entitlement {
    pub fn is_granted(&self) -> bool {
        matches!(self, Entitlement::Granted)
    }

    pub fn into_result(self) -> DomainResult<()> {
        match self {
            Entitlement::Granted => Ok(()),
            Entitlement::Denied(DenialReason::NotFound) => Err(DomainError::not_found("establishment")),
            Entitlement::Denied(DenialReason::Inactive) => Err(DomainError::permission_denied(
                "subscription is not active; subscribe to manage the menu",
            )),
            Entitlement::Denied(DenialReason::Expired) => Err(DomainError::permission_denied(
                "subscription has expired; renew to manage the menu",
            )),
        }
    }
}

/// Evaluate the gate for an establishment at `now`. Never mutates anything.
pub fn is_entitled(establishment: Option<&Establishment>, now: DateTime<Utc>) -> Entitlement {
    let Some(establishment) = establishment else {
        return Entitlement::Denied(DenialReason::NotFound);
    };

    let subscription = &establishment.subscription;
    if !subscription.active {
        Entitlement::Denied(DenialReason::Inactive)
    } else if subscription.is_lapsed_at(now) {
        Entitlement::Denied(DenialReason::Expired)
    } else {
        Entitlement::Granted
    }
}
