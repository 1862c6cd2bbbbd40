//! Payment provider clients.

pub mod mercado_pago;

pub use mercado_pago::{MercadoPagoCheckout, MercadoPagoConfig};
