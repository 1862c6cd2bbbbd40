use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menuboard_core::error::require_non_blank;
use menuboard_core::{DomainError, DomainResult, Entity, EstablishmentId};

pub const DEFAULT_THEME_COLOR: &str = "#4F46E5";

/// Time-bounded entitlement flag.
///
/// Only the payment webhook and the expiry sweeper change this; clients never
/// write it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Active iff flagged and either open-ended or not yet expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.is_none_or(|exp| exp > now)
    }

    /// Still flagged active although the expiry has passed.
    pub fn is_lapsed_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Public presentation settings of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub welcome_message: Option<String>,
    pub theme_color: String,
    pub logo_url: Option<String>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            welcome_message: None,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            logo_url: None,
        }
    }
}

/// A merchant account owning a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: EstablishmentId,
    pub name: String,
    /// WhatsApp handle the order notification link is addressed to.
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
    pub social_links: Vec<String>,
    pub presentation: Presentation,
    pub subscription: Subscription,
    pub created_at: DateTime<Utc>,
}

impl Entity for Establishment {
    type Id = EstablishmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEstablishment {
    pub name: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
    #[serde(default)]
    pub welcome_message: Option<String>,
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub social_links: Option<Vec<String>>,
    #[serde(default)]
    pub welcome_message: Option<String>,
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Establishment {
    /// Register a new establishment. The subscription starts inactive.
    pub fn register(
        id: EstablishmentId,
        new: NewEstablishment,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        require_non_blank("name", &new.name)?;

        let theme_color = match new.theme_color {
            Some(color) => {
                validate_theme_color(&color)?;
                color
            }
            None => DEFAULT_THEME_COLOR.to_string(),
        };

        Ok(Self {
            id,
            name: new.name.trim().to_string(),
            contact_phone: new.contact_phone,
            address: new.address,
            opening_hours: new.opening_hours,
            social_links: new.social_links,
            presentation: Presentation {
                welcome_message: new.welcome_message,
                theme_color,
                logo_url: new.logo_url,
            },
            subscription: Subscription::inactive(),
            created_at: now,
        })
    }

    /// Apply a profile update; validation happens before any field changes.
    pub fn apply_update(&mut self, update: EstablishmentUpdate) -> DomainResult<()> {
        if let Some(name) = &update.name {
            require_non_blank("name", name)?;
        }
        if let Some(color) = &update.theme_color {
            validate_theme_color(color)?;
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(phone) = update.contact_phone {
            self.contact_phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(hours) = update.opening_hours {
            self.opening_hours = Some(hours);
        }
        if let Some(links) = update.social_links {
            self.social_links = links;
        }
        if let Some(message) = update.welcome_message {
            self.presentation.welcome_message = Some(message);
        }
        if let Some(color) = update.theme_color {
            self.presentation.theme_color = color;
        }
        if let Some(logo) = update.logo_url {
            self.presentation.logo_url = Some(logo);
        }
        Ok(())
    }

    pub fn is_subscription_active_at(&self, now: DateTime<Utc>) -> bool {
        self.subscription.is_active_at(now)
    }
}

fn validate_theme_color(color: &str) -> DomainResult<()> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| DomainError::validation("theme_color must start with '#'"))?;
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::validation(
            "theme_color must be a #RGB or #RRGGBB hex color",
        ));
    }
    Ok(())
}
