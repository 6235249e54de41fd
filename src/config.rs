use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_HEALTH_PORT: u16 = 3012;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// payment methods a user can pick from the payment options menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Bank,
    Visa,
    TelegramWallet,
    Crypto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Bank,
        PaymentMethod::Visa,
        PaymentMethod::TelegramWallet,
        PaymentMethod::Crypto,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::Bank => "bank",
            PaymentMethod::Visa => "visa",
            PaymentMethod::TelegramWallet => "telegram_wallet",
            PaymentMethod::Crypto => "crypto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PaymentMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.id() == s)
            .ok_or_else(|| ConfigError::Invalid {
                name: "payment_method",
                reason: format!("unknown payment method '{}'", s),
            })
    }
}

/// requisites shown on the payment details screens
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub bank_name: String,
    pub recipient_name: String,
    pub iban: String,
    pub swift: String,
    pub account_number: String,
    pub visa_card_number: String,
    pub cardholder_name: String,
    pub revolut_username: String,
    pub trc20_wallet_address: String,
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self {
            bank_name: "PLACEHOLDER_BANK_NAME".to_string(),
            recipient_name: "PLACEHOLDER_RECIPIENT_NAME".to_string(),
            iban: "GE00TB0000000000000000".to_string(),
            swift: "TBCBGE22".to_string(),
            account_number: "PLACEHOLDER_ACCOUNT_NUMBER".to_string(),
            visa_card_number: "4000 0000 0000 0000".to_string(),
            cardholder_name: "PLACEHOLDER CARDHOLDER NAME".to_string(),
            revolut_username: "PLACEHOLDER_REVOLUT_USERNAME".to_string(),
            trc20_wallet_address: "T0000000000000000000000000000000000".to_string(),
        }
    }
}

impl PaymentDetails {
    /// defaults overridden by PAYMENT_* environment variables where present
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, fallback: String| env::var(name).unwrap_or(fallback);

        Self {
            bank_name: read("PAYMENT_BANK_NAME", defaults.bank_name),
            recipient_name: read("PAYMENT_RECIPIENT_NAME", defaults.recipient_name),
            iban: read("PAYMENT_IBAN", defaults.iban),
            swift: read("PAYMENT_SWIFT", defaults.swift),
            account_number: read("PAYMENT_ACCOUNT_NUMBER", defaults.account_number),
            visa_card_number: read("PAYMENT_VISA_CARD_NUMBER", defaults.visa_card_number),
            cardholder_name: read("PAYMENT_CARDHOLDER_NAME", defaults.cardholder_name),
            revolut_username: read("PAYMENT_REVOLUT_USERNAME", defaults.revolut_username),
            trc20_wallet_address: read(
                "PAYMENT_TRC20_WALLET_ADDRESS",
                defaults.trc20_wallet_address,
            ),
        }
    }
}

/// telegram user ids allowed into the admin console, fixed for the process lifetime
#[derive(Debug, Clone, Default)]
pub struct AdminSet {
    ids: HashSet<u64>,
}

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// parses a comma-separated id list, skipping blanks and logging junk entries
    pub fn parse(raw: &str) -> Self {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .filter_map(|id| match id.parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Ignoring invalid admin id in ADMIN_IDS: {}", id);
                    None
                }
            })
            .collect();
        Self { ids }
    }

    pub fn contains(&self, user_id: u64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// ids in ascending order so notification fan-out is deterministic
    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub database_url: String,
    pub admins: AdminSet,
    pub service_account_key: String,
    pub storage_bucket: String,
    pub health_port: u16,
    pub payment_details: PaymentDetails,
}

#[derive(Deserialize)]
struct ServiceAccountProject {
    project_id: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = required("BOT_TOKEN")?;
        let database_url = required("DATABASE_URL")?;
        let service_account_key = required("FIREBASE_CONFIG")?;

        let admins = AdminSet::parse(&env::var("ADMIN_IDS").unwrap_or_default());
        if admins.is_empty() {
            warn!("ADMIN_IDS is empty, nobody will receive payment notifications");
        }

        let storage_bucket = match env::var("STORAGE_BUCKET") {
            Ok(bucket) if !bucket.trim().is_empty() => bucket,
            _ => Self::default_bucket(&service_account_key)?,
        };

        let health_port = match env::var("PORT") {
            Ok(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_HEALTH_PORT,
        };

        Ok(Self {
            bot_token,
            database_url,
            admins,
            service_account_key,
            storage_bucket,
            health_port,
            payment_details: PaymentDetails::from_env(),
        })
    }

    /// firebase projects get a `<project_id>.firebasestorage.app` bucket
    pub fn default_bucket(service_account_key: &str) -> Result<String, ConfigError> {
        let project: ServiceAccountProject =
            serde_json::from_str(service_account_key).map_err(|e| ConfigError::Invalid {
                name: "FIREBASE_CONFIG",
                reason: e.to_string(),
            })?;
        Ok(format!("{}.firebasestorage.app", project.project_id))
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}
