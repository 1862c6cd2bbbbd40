use core::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use menuboard_core::{DomainError, Money};

/// Subscription plans offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Annual,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Annual => "annual",
        }
    }

    pub fn price(&self) -> Money {
        match self {
            Plan::Monthly => Money::from_cents(2990),
            Plan::Annual => Money::from_cents(29090),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Plan::Monthly => Duration::days(30),
            Plan::Annual => Duration::days(365),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Plan::Monthly => "Monthly subscription - Digital Menu",
            Plan::Annual => "Annual subscription - Digital Menu",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::Monthly => "Full monthly access to the digital menu",
            Plan::Annual => "Full annual access to the digital menu at a discount",
        }
    }
}

impl core::fmt::Display for Plan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Plan::Monthly),
            "annual" => Ok(Plan::Annual),
            other => Err(DomainError::validation(format!("invalid plan '{other}'"))),
        }
    }
}
