use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, FileMeta, MessageId, User};
use tg_payments::bot::BotContext;
use tg_payments::config::{AdminSet, PaymentDetails, PaymentMethod};
use tg_payments::storage::{
    AlbumSubmission, BlobError, BlobStore, ChatMessage, ConfirmationRecord, ConfirmationStatus,
    FileKind, NewConfirmation, NewSubmission, RecordStore, StoreResult, UserProfile,
};
use tg_payments::transport::MessageRef;
use url::Url;

use super::mock_bot::MockTransport;

pub const ADMIN_ID: u64 = 1001;
pub const OTHER_ADMIN_ID: u64 = 1002;
pub const PAYER_ID: u64 = 2001;
pub const STRANGER_ID: u64 = 3001;

/// in-memory record store with the same ordering and compare-and-set rules as postgres
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, UserProfile>>,
    confirmations: Mutex<Vec<ConfirmationRecord>>,
    submissions: Mutex<Vec<AlbumSubmission>>,
    chat_messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn confirmations(&self) -> Vec<ConfirmationRecord> {
        self.confirmations.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<AlbumSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.chat_messages.lock().unwrap().clone()
    }

    pub fn users(&self) -> HashMap<String, UserProfile> {
        self.users.lock().unwrap().clone()
    }

    /// seeds `count` pending confirmations, one minute apart, oldest first
    pub async fn seed_confirmations(&self, count: usize) -> Vec<String> {
        let start = base_time();
        let mut ids = Vec::new();
        for i in 0..count {
            let user = profile(5000 + i as u64, &format!("payer{}", i), Some("en"));
            let id = self
                .create_confirmation(&NewConfirmation {
                    user,
                    payment_method: PaymentMethod::ALL[i % PaymentMethod::ALL.len()],
                    created_at: start + Duration::minutes(i as i64),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }

    /// seeds submissions one minute apart, oldest first
    pub async fn seed_submissions(&self, kinds: &[FileKind]) -> Vec<String> {
        let start = base_time();
        let mut ids = Vec::new();
        for (i, kind) in kinds.iter().enumerate() {
            let (storage_path, file_name) = if kind.is_pdf() {
                (format!("album/{}/{}_menu.pdf", PAYER_ID, i), Some("menu.pdf".to_string()))
            } else {
                (format!("album/{}/{}.jpg", PAYER_ID, i), None)
            };
            let id = self
                .create_submission(&NewSubmission {
                    user: profile(PAYER_ID, "payer", Some("en")),
                    file_kind: *kind,
                    storage_path,
                    file_name,
                    caption: Some(format!("caption {}", i)),
                    created_at: start + Duration::minutes(i as i64),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }
}

fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut items = items.to_vec();
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_user(&self, user: &UserProfile) -> StoreResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn user_language(&self, user_id: &str) -> StoreResult<Option<String>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(user_id)
            .and_then(|user| user.language_code.clone()))
    }

    async fn create_confirmation(&self, confirmation: &NewConfirmation) -> StoreResult<String> {
        let id = self.next_id("conf");
        self.confirmations.lock().unwrap().push(ConfirmationRecord {
            id: id.clone(),
            user: confirmation.user.clone(),
            payment_method: confirmation.payment_method,
            status: ConfirmationStatus::Pending,
            created_at: confirmation.created_at,
            confirmed_at: None,
            confirmed_by: None,
        });
        Ok(id)
    }

    async fn get_confirmation(&self, id: &str) -> StoreResult<Option<ConfirmationRecord>> {
        Ok(self
            .confirmations
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn confirm_pending(
        &self,
        id: &str,
        admin_id: &str,
        confirmed_at: DateTime<Utc>,
    ) -> StoreResult<Option<ConfirmationRecord>> {
        let mut confirmations = self.confirmations.lock().unwrap();
        let Some(record) = confirmations
            .iter_mut()
            .find(|record| record.id == id && record.is_pending())
        else {
            return Ok(None);
        };
        record.status = ConfirmationStatus::Confirmed;
        record.confirmed_at = Some(confirmed_at);
        record.confirmed_by = Some(admin_id.to_string());
        Ok(Some(record.clone()))
    }

    async fn count_confirmations(&self) -> StoreResult<usize> {
        Ok(self.confirmations.lock().unwrap().len())
    }

    async fn list_confirmations(
        &self,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<ConfirmationRecord>> {
        let confirmations = self.confirmations.lock().unwrap();
        Ok(newest_first(&confirmations, |record| record.created_at)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn create_submission(&self, submission: &NewSubmission) -> StoreResult<String> {
        let id = self.next_id("sub");
        self.submissions.lock().unwrap().push(AlbumSubmission {
            id: id.clone(),
            user: submission.user.clone(),
            file_kind: submission.file_kind,
            storage_path: submission.storage_path.clone(),
            file_name: submission.file_name.clone(),
            caption: submission.caption.clone(),
            created_at: submission.created_at,
        });
        Ok(id)
    }

    async fn get_submission(&self, id: &str) -> StoreResult<Option<AlbumSubmission>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .find(|submission| submission.id == id)
            .cloned())
    }

    async fn count_submissions(&self) -> StoreResult<usize> {
        Ok(self.submissions.lock().unwrap().len())
    }

    async fn submission_at(&self, index: usize) -> StoreResult<Option<AlbumSubmission>> {
        let submissions = self.submissions.lock().unwrap();
        Ok(newest_first(&submissions, |submission| submission.created_at)
            .into_iter()
            .nth(index))
    }

    async fn save_chat_message(&self, message: &ChatMessage) -> StoreResult<()> {
        self.chat_messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// in-memory blob store handing out a distinct signed url on every call
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    signatures: AtomicUsize,
    fail_uploads: Mutex<bool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self) {
        *self.fail_uploads.lock().unwrap() = true;
    }

    pub fn object(&self, path: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn signatures_issued(&self) -> usize {
        self.signatures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn save(&self, path: &str, data: Bytes, content_type: &str) -> Result<(), BlobError> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(BlobError::UploadFailed {
                path: path.to_string(),
                reason: "bucket unavailable".to_string(),
            });
        }
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn signed_url(&self, path: &str, expires_in: std::time::Duration) -> Result<Url, BlobError> {
        let signature = self.signatures.fetch_add(1, Ordering::SeqCst) + 1;
        Url::parse(&format!(
            "https://storage.test/{}?expires={}&sig={}",
            path,
            expires_in.as_secs(),
            signature
        ))
        .map_err(|e| BlobError::SigningFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap()
}

pub fn profile(user_id: u64, username: &str, language_code: Option<&str>) -> UserProfile {
    UserProfile {
        user_id: user_id.to_string(),
        username: username.to_string(),
        first_name: format!("First{}", user_id),
        last_name: String::new(),
        language_code: language_code.map(str::to_string),
    }
}

/// telegram user as delivered with updates
pub fn telegram_user(user_id: u64, first_name: &str, username: Option<&str>, language_code: Option<&str>) -> User {
    let mut value = serde_json::json!({
        "id": user_id,
        "is_bot": false,
        "first_name": first_name,
    });
    if let Some(username) = username {
        value["username"] = serde_json::json!(username);
    }
    if let Some(language_code) = language_code {
        value["language_code"] = serde_json::json!(language_code);
    }
    serde_json::from_value(value).expect("valid telegram user json")
}

pub fn file_meta(file_id: &str) -> FileMeta {
    serde_json::from_value(serde_json::json!({
        "file_id": file_id,
        "file_unique_id": format!("unique-{}", file_id),
        "file_size": 16,
    }))
    .expect("valid file meta json")
}

pub fn message_ref(chat_id: u64, message_id: i32) -> MessageRef {
    MessageRef::new(ChatId(chat_id as i64), MessageId(message_id))
}

/// a bot context wired to in-memory seams
pub struct TestHarness {
    pub ctx: BotContext,
    pub transport: MockTransport,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_admins(&[ADMIN_ID, OTHER_ADMIN_ID])
    }

    pub fn with_admins(admins: &[u64]) -> Self {
        let transport = MockTransport::new();
        let store = Arc::new(MemoryStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let ctx = BotContext::new(
            Arc::new(transport.clone()),
            store.clone(),
            blobs.clone(),
            AdminSet::new(admins.iter().copied()),
            PaymentDetails::default(),
        );
        Self {
            ctx,
            transport,
            store,
            blobs,
        }
    }

    pub fn admin(&self) -> User {
        telegram_user(ADMIN_ID, "Alice", Some("alice_admin"), Some("en"))
    }

    pub fn stranger(&self) -> User {
        telegram_user(STRANGER_ID, "Mallory", Some("mallory"), Some("en"))
    }

    pub fn payer(&self, language_code: Option<&str>) -> User {
        telegram_user(PAYER_ID, "Pavel", Some("payer"), language_code)
    }
}
