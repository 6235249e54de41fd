use chrono::Utc;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use teloxide::types::{ChatId, FileMeta, Message};

use crate::config::AdminSet;
use crate::handlers::HandlerResult;
use crate::localization::Lang;
use crate::storage::{BlobStore, FileKind, NewSubmission, RecordStore, UserProfile};
use crate::transport::Transport;
use crate::user_session::SessionManager;
use crate::utils::MessageFormatter;

const PDF_MIME: &str = "application/pdf";

/// a file-bearing message as seen by album intake
#[derive(Debug, Clone)]
pub enum AlbumUpload {
    Photo {
        file: FileMeta,
    },
    Document {
        file: FileMeta,
        file_name: Option<String>,
        mime_type: Option<String>,
    },
    Video,
}

impl AlbumUpload {
    pub fn from_message(msg: &Message) -> Option<Self> {
        if let Some(sizes) = msg.photo() {
            // telegram lists sizes smallest first
            return sizes.last().map(|largest| AlbumUpload::Photo {
                file: largest.file.clone(),
            });
        }
        if let Some(document) = msg.document() {
            return Some(AlbumUpload::Document {
                file: document.file.clone(),
                file_name: document.file_name.clone(),
                mime_type: document
                    .mime_type
                    .as_ref()
                    .map(|mime| mime.essence_str().to_string()),
            });
        }
        if msg.video().is_some() {
            return Some(AlbumUpload::Video);
        }
        None
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlbumUpload::Photo { .. } => "photo",
            AlbumUpload::Document { .. } => "doc",
            AlbumUpload::Video => "video",
        }
    }
}

/// images and PDFs are accepted, everything else is refused
pub fn document_kind(mime_type: Option<&str>) -> Option<FileKind> {
    match mime_type {
        Some(PDF_MIME) => Some(FileKind::Pdf),
        Some(mime) if mime.starts_with("image/") => Some(FileKind::Image),
        _ => None,
    }
}

/// object key for an uploaded file; slashes in the original name are flattened
pub fn storage_path(user_id: &str, millis: i64, file_name: Option<&str>, extension: &str) -> String {
    match file_name {
        Some(name) => format!("album/{}/{}_{}", user_id, millis, name.replace('/', "_")),
        None => format!("album/{}/{}.{}", user_id, millis, extension),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    Stored(String),
    Rejected,
    Failed,
    /// the sender is not in album mode
    Ignored,
}

/// receives album files from users in album mode and relays them to storage
#[derive(Clone)]
pub struct AlbumIntake {
    store: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    transport: Arc<dyn Transport>,
    admins: Arc<AdminSet>,
    sessions: SessionManager,
}

impl AlbumIntake {
    pub fn new(
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        transport: Arc<dyn Transport>,
        admins: Arc<AdminSet>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            store,
            blobs,
            transport,
            admins,
            sessions,
        }
    }

    pub async fn receive(
        &self,
        user: &UserProfile,
        chat_id: ChatId,
        upload: AlbumUpload,
        caption: Option<String>,
    ) -> HandlerResult<ReceiveOutcome> {
        if !self.sessions.is_awaiting_album(&user.user_id).await {
            info!(
                "Ignoring {} from user {} outside album mode",
                upload.label(),
                user.user_id
            );
            return Ok(ReceiveOutcome::Ignored);
        }
        let lang = Lang::from_code(user.language_code.as_deref());

        let (file, file_kind, file_name, content_type) = match upload {
            AlbumUpload::Photo { file } => (file, FileKind::Photo, None, None),
            AlbumUpload::Document {
                file,
                file_name,
                mime_type,
            } => match document_kind(mime_type.as_deref()) {
                Some(kind) => (
                    file,
                    kind,
                    Some(file_name.unwrap_or_else(|| "file".to_string())),
                    mime_type,
                ),
                None => {
                    info!(
                        "Rejected album document of type {:?} from user {}",
                        mime_type, user.user_id
                    );
                    self.transport
                        .send_text(chat_id, lang.album_file_error(), None)
                        .await?;
                    return Ok(ReceiveOutcome::Rejected);
                }
            },
            AlbumUpload::Video => {
                self.transport
                    .send_text(chat_id, lang.album_file_error(), None)
                    .await?;
                return Ok(ReceiveOutcome::Rejected);
            }
        };

        let downloaded = match self.transport.download_file(&file).await {
            Ok(downloaded) => downloaded,
            Err(e) => {
                error!("Failed to download album file for user {}: {}", user.user_id, e);
                self.transport
                    .send_text(chat_id, lang.error_processing_request(), None)
                    .await?;
                return Ok(ReceiveOutcome::Failed);
            }
        };

        let extension = Path::new(&downloaded.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("jpg")
            .to_lowercase();
        let created_at = Utc::now();
        let path = storage_path(
            &user.user_id,
            created_at.timestamp_millis(),
            file_name.as_deref(),
            &extension,
        );
        let content_type = content_type.unwrap_or_else(|| format!("image/{}", extension));

        if let Err(e) = self
            .blobs
            .save(&path, downloaded.bytes, &content_type)
            .await
        {
            error!("Failed to store album file for user {}: {}", user.user_id, e);
            self.transport
                .send_text(chat_id, lang.error_processing_request(), None)
                .await?;
            return Ok(ReceiveOutcome::Failed);
        }

        let submission = NewSubmission {
            user: user.clone(),
            file_kind,
            storage_path: path,
            file_name,
            caption,
            created_at,
        };
        let submission_id = self.store.create_submission(&submission).await?;

        self.notify_admins(&submission).await;
        self.transport
            .send_text(chat_id, lang.album_file_received(), None)
            .await?;

        Ok(ReceiveOutcome::Stored(submission_id))
    }

    async fn notify_admins(&self, submission: &NewSubmission) {
        let notification = Lang::En.album_admin_notification(
            &MessageFormatter::full_name(&submission.user.first_name, &submission.user.last_name),
            &MessageFormatter::escape_html(submission.user.username_or_na()),
            submission.file_kind.as_str(),
            &MessageFormatter::full_date(&submission.created_at),
        );
        for admin_id in self.admins.ids() {
            if let Err(e) = self
                .transport
                .send_text(ChatId(admin_id as i64), &notification, None)
                .await
            {
                warn!(
                    "Failed to notify admin {} about album file {}: {}",
                    admin_id, submission.storage_path, e
                );
            }
        }
    }
}
