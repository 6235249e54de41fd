use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Config, Pool, Runtime};
use log::info;
use tokio_postgres::Row;
use tokio_postgres_rustls::MakeRustlsConnect;

use super::{
    AlbumSubmission, ChatMessage, ConfirmationRecord, NewConfirmation, NewSubmission,
    RecordStore, StoreError, StoreResult, UserProfile,
};

const CONFIRMATION_COLUMNS: &str = "id::text, user_id, username, first_name, last_name, \
     language_code, payment_method, status, created_at, confirmed_at, confirmed_by";

const SUBMISSION_COLUMNS: &str = "id::text, user_id, username, first_name, last_name, \
     file_type, storage_path, file_name, caption, created_at";

/// true for the lowercase hyphenated form postgres prints for uuid columns
pub fn is_canonical_uuid(id: &str) -> bool {
    id.len() == 36
        && id.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => matches!(c, '0'..='9' | 'a'..='f'),
        })
}

/// builds a rustls-backed connection pool for the given postgres url
pub fn create_pool(database_url: &str) -> Result<Pool, Box<dyn std::error::Error + Send + Sync>> {
    let mut config = Config::new();
    config.url = Some(database_url.to_string());
    config.manager = Some(deadpool_postgres::ManagerConfig {
        recycling_method: deadpool_postgres::RecyclingMethod::Fast,
    });

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls = MakeRustlsConnect::new(
        rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth(),
    );

    Ok(config.create_pool(Some(Runtime::Tokio1), tls)?)
}

pub struct PgRecordStore {
    pool: Pool,
}

impl PgRecordStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn profile_from_row(row: &Row) -> UserProfile {
        UserProfile {
            user_id: row.get(1),
            username: row.get(2),
            first_name: row.get(3),
            last_name: row.get(4),
            language_code: None,
        }
    }

    fn confirmation_from_row(row: &Row) -> StoreResult<ConfirmationRecord> {
        let id: String = row.get(0);
        let mut user = Self::profile_from_row(row);
        user.language_code = row.get(5);

        let payment_method: String = row.get(6);
        let payment_method = payment_method.parse::<crate::config::PaymentMethod>().map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: e.to_string(),
        })?;
        let status: String = row.get(7);
        let status = status.parse::<super::ConfirmationStatus>().map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: e.to_string(),
        })?;

        Ok(ConfirmationRecord {
            id,
            user,
            payment_method,
            status,
            created_at: row.get(8),
            confirmed_at: row.get(9),
            confirmed_by: row.get(10),
        })
    }

    fn submission_from_row(row: &Row) -> StoreResult<AlbumSubmission> {
        let id: String = row.get(0);
        let user = Self::profile_from_row(row);

        let file_type: String = row.get(5);
        let file_kind = file_type.parse::<super::FileKind>().map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: e.to_string(),
        })?;

        Ok(AlbumSubmission {
            id,
            user,
            file_kind,
            storage_path: row.get(6),
            file_name: row.get(7),
            caption: row.get(8),
            created_at: row.get(9),
        })
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn upsert_user(&self, user: &UserProfile) -> StoreResult<()> {
        let client = self.pool.get().await?;
        let language_code = user.language_code.as_deref().unwrap_or("en");
        client
            .execute(
                "INSERT INTO users (id, username, first_name, last_name, language_code)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id) DO UPDATE SET
                     username = EXCLUDED.username,
                     first_name = EXCLUDED.first_name,
                     last_name = EXCLUDED.last_name,
                     language_code = EXCLUDED.language_code,
                     updated_at = NOW()",
                &[
                    &user.user_id,
                    &user.username,
                    &user.first_name,
                    &user.last_name,
                    &language_code,
                ],
            )
            .await?;
        Ok(())
    }

    async fn user_language(&self, user_id: &str) -> StoreResult<Option<String>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT language_code FROM users WHERE id = $1", &[&user_id])
            .await?;
        Ok(row.and_then(|row| row.get::<_, Option<String>>(0)))
    }

    async fn create_confirmation(&self, confirmation: &NewConfirmation) -> StoreResult<String> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO confirmations
                     (user_id, username, first_name, last_name, language_code, payment_method, status, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
                 RETURNING id::text",
                &[
                    &confirmation.user.user_id,
                    &confirmation.user.username,
                    &confirmation.user.first_name,
                    &confirmation.user.last_name,
                    &confirmation.user.language_code,
                    &confirmation.payment_method.id(),
                    &confirmation.created_at,
                ],
            )
            .await?;
        let id: String = row.get(0);
        info!(
            "Created confirmation {} for user {} ({})",
            id, confirmation.user.user_id, confirmation.payment_method
        );
        Ok(id)
    }

    async fn get_confirmation(&self, id: &str) -> StoreResult<Option<ConfirmationRecord>> {
        if !is_canonical_uuid(id) {
            return Ok(None);
        }
        let client = self.pool.get().await?;
        // compare as uuid so the primary key index is used
        let query = format!(
            "SELECT {} FROM confirmations WHERE id = $1::text::uuid",
            CONFIRMATION_COLUMNS
        );
        client
            .query_opt(query.as_str(), &[&id])
            .await?
            .map(|row| Self::confirmation_from_row(&row))
            .transpose()
    }

    async fn confirm_pending(
        &self,
        id: &str,
        admin_id: &str,
        confirmed_at: DateTime<Utc>,
    ) -> StoreResult<Option<ConfirmationRecord>> {
        if !is_canonical_uuid(id) {
            return Ok(None);
        }
        let client = self.pool.get().await?;
        // the status guard makes concurrent confirms race-free: only one update matches
        let query = format!(
            "UPDATE confirmations
             SET status = 'confirmed', confirmed_at = $2, confirmed_by = $3
             WHERE id = $1::text::uuid AND status = 'pending'
             RETURNING {}",
            CONFIRMATION_COLUMNS
        );
        client
            .query_opt(query.as_str(), &[&id, &confirmed_at, &admin_id])
            .await?
            .map(|row| Self::confirmation_from_row(&row))
            .transpose()
    }

    async fn count_confirmations(&self) -> StoreResult<usize> {
        let client = self.pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM confirmations", &[])
            .await?;
        Ok(row.get::<_, i64>(0) as usize)
    }

    async fn list_confirmations(
        &self,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<ConfirmationRecord>> {
        let client = self.pool.get().await?;
        let query = format!(
            "SELECT {} FROM confirmations ORDER BY created_at DESC OFFSET $1 LIMIT $2",
            CONFIRMATION_COLUMNS
        );
        let rows = client
            .query(query.as_str(), &[&(offset as i64), &(limit as i64)])
            .await?;
        rows.iter().map(Self::confirmation_from_row).collect()
    }

    async fn create_submission(&self, submission: &NewSubmission) -> StoreResult<String> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO album_submissions
                     (user_id, username, first_name, last_name, file_type, storage_path, file_name, caption, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 RETURNING id::text",
                &[
                    &submission.user.user_id,
                    &submission.user.username,
                    &submission.user.first_name,
                    &submission.user.last_name,
                    &submission.file_kind.as_str(),
                    &submission.storage_path,
                    &submission.file_name,
                    &submission.caption,
                    &submission.created_at,
                ],
            )
            .await?;
        let id: String = row.get(0);
        info!(
            "Created album submission {} for user {} at {}",
            id, submission.user.user_id, submission.storage_path
        );
        Ok(id)
    }

    async fn get_submission(&self, id: &str) -> StoreResult<Option<AlbumSubmission>> {
        if !is_canonical_uuid(id) {
            return Ok(None);
        }
        let client = self.pool.get().await?;
        let query = format!(
            "SELECT {} FROM album_submissions WHERE id = $1::text::uuid",
            SUBMISSION_COLUMNS
        );
        client
            .query_opt(query.as_str(), &[&id])
            .await?
            .map(|row| Self::submission_from_row(&row))
            .transpose()
    }

    async fn count_submissions(&self) -> StoreResult<usize> {
        let client = self.pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM album_submissions", &[])
            .await?;
        Ok(row.get::<_, i64>(0) as usize)
    }

    async fn submission_at(&self, index: usize) -> StoreResult<Option<AlbumSubmission>> {
        let client = self.pool.get().await?;
        let query = format!(
            "SELECT {} FROM album_submissions ORDER BY created_at DESC OFFSET $1 LIMIT 1",
            SUBMISSION_COLUMNS
        );
        client
            .query_opt(query.as_str(), &[&(index as i64)])
            .await?
            .map(|row| Self::submission_from_row(&row))
            .transpose()
    }

    async fn save_chat_message(&self, message: &ChatMessage) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO chat_messages (chat_id, user_id, text, message_id, date)
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &message.chat_id,
                    &message.user_id,
                    &message.text,
                    &message.message_id,
                    &message.date,
                ],
            )
            .await?;
        Ok(())
    }
}
