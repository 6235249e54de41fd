pub mod blobs;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::PaymentMethod;

pub use blobs::{BlobError, BlobStore, GcsBlobStore, SIGNED_URL_TTL};
pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// a stored enum column holds a value this build does not know
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {column} '{value}'")]
pub struct UnknownValue {
    pub column: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(column: &'static str, value: &str) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
}

impl ConfirmationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationStatus::Pending => "pending",
            ConfirmationStatus::Confirmed => "confirmed",
        }
    }
}

impl FromStr for ConfirmationStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConfirmationStatus::Pending),
            "confirmed" => Ok(ConfirmationStatus::Confirmed),
            other => Err(UnknownValue::new("confirmation status", other)),
        }
    }
}

/// kind of file accepted into the album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    #[serde(rename = "photo")]
    Photo,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "PDF")]
    Pdf,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Photo => "photo",
            FileKind::Image => "image",
            FileKind::Pdf => "PDF",
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, FileKind::Pdf)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(FileKind::Photo),
            "image" => Ok(FileKind::Image),
            "PDF" => Ok(FileKind::Pdf),
            other => Err(UnknownValue::new("file kind", other)),
        }
    }
}

/// identity fields copied from the telegram user onto every record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub language_code: Option<String>,
}

impl UserProfile {
    pub fn from_telegram(user: &teloxide::types::User) -> Self {
        Self {
            user_id: user.id.0.to_string(),
            username: user.username.clone().unwrap_or_default(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
            language_code: user.language_code.clone(),
        }
    }

    pub fn username_or_na(&self) -> &str {
        if self.username.is_empty() {
            "N/A"
        } else {
            &self.username
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConfirmation {
    pub user: UserProfile,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    pub id: String,
    pub user: UserProfile,
    pub payment_method: PaymentMethod,
    pub status: ConfirmationStatus,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<String>,
}

impl ConfirmationRecord {
    pub fn is_pending(&self) -> bool {
        self.status == ConfirmationStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub user: UserProfile,
    pub file_kind: FileKind,
    pub storage_path: String,
    pub file_name: Option<String>,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSubmission {
    pub id: String,
    pub user: UserProfile,
    pub file_kind: FileKind,
    pub storage_path: String,
    pub file_name: Option<String>,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub user_id: String,
    pub text: String,
    pub message_id: i32,
    pub date: DateTime<Utc>,
}

/// persistent records behind the bot; listings are newest first
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// creates or refreshes the profile, keeping the latest language tag
    async fn upsert_user(&self, user: &UserProfile) -> StoreResult<()>;

    async fn user_language(&self, user_id: &str) -> StoreResult<Option<String>>;

    async fn create_confirmation(&self, confirmation: &NewConfirmation) -> StoreResult<String>;

    async fn get_confirmation(&self, id: &str) -> StoreResult<Option<ConfirmationRecord>>;

    /// flips a pending confirmation to confirmed in one conditional write;
    /// returns None when the record is missing or no longer pending
    async fn confirm_pending(
        &self,
        id: &str,
        admin_id: &str,
        confirmed_at: DateTime<Utc>,
    ) -> StoreResult<Option<ConfirmationRecord>>;

    async fn count_confirmations(&self) -> StoreResult<usize>;

    async fn list_confirmations(
        &self,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<ConfirmationRecord>>;

    async fn create_submission(&self, submission: &NewSubmission) -> StoreResult<String>;

    async fn get_submission(&self, id: &str) -> StoreResult<Option<AlbumSubmission>>;

    async fn count_submissions(&self) -> StoreResult<usize>;

    async fn submission_at(&self, index: usize) -> StoreResult<Option<AlbumSubmission>>;

    async fn save_chat_message(&self, message: &ChatMessage) -> StoreResult<()>;
}
