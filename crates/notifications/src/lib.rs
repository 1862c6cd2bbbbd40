//! Order notifications: the human-readable order message and the WhatsApp
//! deep link that carries it to the establishment.

pub mod link;
pub mod message;

pub use link::{NotificationError, WHATSAPP_BASE_URL, build_notification_link, contact_handle};
pub use message::{MessageStyle, format_order_message};
