use thiserror::Error;

use menuboard_catalog::Establishment;
use menuboard_core::{DomainError, EstablishmentId};

pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("establishment {0} has no WhatsApp contact configured")]
    MissingContactChannel(EstablishmentId),
}

impl From<NotificationError> for DomainError {
    fn from(err: NotificationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// The establishment's WhatsApp handle reduced to digits (`+55 (11) 9...` → `55119...`).
pub fn contact_handle(establishment: &Establishment) -> Result<String, NotificationError> {
    let digits: String = establishment
        .contact_phone
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return Err(NotificationError::MissingContactChannel(establishment.id));
    }
    Ok(digits)
}

/// `https://wa.me/{handle}?text={percent-encoded message}`.
pub fn build_notification_link(
    establishment: &Establishment,
    message: &str,
) -> Result<String, NotificationError> {
    let handle = contact_handle(establishment)?;
    Ok(format!(
        "{WHATSAPP_BASE_URL}/{handle}?text={}",
        urlencoding::encode(message)
    ))
}
