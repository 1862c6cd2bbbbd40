//! Server configuration, read from the environment (and `.env` when present).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use menuboard_infra::payments::{
    MercadoPagoConfig,
    mercado_pago::{DEFAULT_API_URL, DEFAULT_TIMEOUT},
};
use menuboard_notifications::MessageStyle;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_SWEEP_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub currency_symbol: String,
    pub mercado_pago_access_token: Option<String>,
    pub mercado_pago_api_url: String,
    pub mercado_pago_timeout: Duration,
    /// Shared secret signing payment callbacks. Without it every callback is refused.
    pub mercado_pago_webhook_secret: Option<String>,
    /// Base URL of the web frontend, used for payment back-URLs.
    pub frontend_url: String,
    pub subscription_sweep_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            mercado_pago_access_token: None,
            mercado_pago_api_url: DEFAULT_API_URL.to_string(),
            mercado_pago_timeout: DEFAULT_TIMEOUT,
            mercado_pago_webhook_secret: None,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            subscription_sweep_interval: Duration::from_secs(DEFAULT_SWEEP_SECS),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and read configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            tracing::info!("loaded .env");
        }
        let config = Self::from_lookup(|name| std::env::var(name).ok())?;

        if config.mercado_pago_access_token.is_none() {
            tracing::warn!("MERCADO_PAGO_ACCESS_TOKEN not set; checkout links are unavailable");
        }
        if config.mercado_pago_webhook_secret.is_none() {
            tracing::warn!("MERCADO_PAGO_WEBHOOK_SECRET not set; payment callbacks will be rejected");
        }
        Ok(config)
    }

    /// Build configuration from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let bind_address = match get("BIND_ADDRESS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDRESS",
                value: v,
                reason: "expected an IP address",
            })?,
            None => defaults.bind_address,
        };

        let port = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v,
                reason: "expected a port number",
            })?,
            None => defaults.port,
        };

        let positive_secs = |name: &'static str, default: Duration| match get(name) {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::Invalid {
                    name,
                    value: v,
                    reason: "expected a positive number of seconds",
                }),
            },
            None => Ok(default),
        };
        let subscription_sweep_interval =
            positive_secs("SUBSCRIPTION_SWEEP_SECS", defaults.subscription_sweep_interval)?;
        let mercado_pago_timeout =
            positive_secs("MERCADO_PAGO_TIMEOUT_SECS", defaults.mercado_pago_timeout)?;

        Ok(Self {
            bind_address,
            port,
            currency_symbol: get("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            mercado_pago_access_token: get("MERCADO_PAGO_ACCESS_TOKEN"),
            mercado_pago_api_url: get("MERCADO_PAGO_API_URL").unwrap_or(defaults.mercado_pago_api_url),
            mercado_pago_timeout,
            mercado_pago_webhook_secret: get("MERCADO_PAGO_WEBHOOK_SECRET"),
            frontend_url: get("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            subscription_sweep_interval,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn mercado_pago(&self) -> MercadoPagoConfig {
        MercadoPagoConfig {
            access_token: self.mercado_pago_access_token.clone(),
            api_url: self.mercado_pago_api_url.clone(),
            timeout: self.mercado_pago_timeout,
            frontend_url: self.frontend_url.clone(),
        }
    }

    pub fn message_style(&self) -> MessageStyle {
        MessageStyle {
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}
