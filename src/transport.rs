use async_trait::async_trait;
use bytes::Bytes;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileMeta, InlineKeyboardMarkup, InputFile, MaybeInaccessibleMessage, MessageId,
    ParseMode,
};
use teloxide::{DownloadError, RequestError};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
    #[error("telegram file download failed: {0}")]
    Download(#[from] DownloadError),
}

/// a message the bot can later edit or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }

    pub fn from_callback_message(message: &MaybeInaccessibleMessage) -> Self {
        match message {
            MaybeInaccessibleMessage::Regular(msg) => Self::new(msg.chat.id, msg.id),
            MaybeInaccessibleMessage::Inaccessible(msg) => Self::new(msg.chat.id, msg.message_id),
        }
    }
}

/// telegram file fetched through the bot api
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub path: String,
    pub bytes: Bytes,
}

/// outgoing side of the bot. Text and captions are always sent in HTML parse mode,
/// so callers escape user-provided values.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError>;

    async fn edit_text(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: Url,
        caption: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError>;

    async fn send_document(
        &self,
        chat_id: ChatId,
        document: Url,
        caption: Option<&str>,
    ) -> Result<MessageRef, TransportError>;

    /// acknowledges a button tap, optionally with a toast
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError>;

    async fn download_file(&self, file: &FileMeta) -> Result<DownloadedFile, TransportError>;
}

#[async_trait]
impl Transport for Bot {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError> {
        let mut request = self
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        let message = request.await?;
        Ok(MessageRef::new(message.chat.id, message.id))
    }

    async fn edit_text(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let mut request = self
            .edit_message_text(message.chat_id, message.message_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        Requester::delete_message(self, message.chat_id, message.message_id).await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: Url,
        caption: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError> {
        let mut request = Requester::send_photo(self, chat_id, InputFile::url(photo))
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        let message = request.await?;
        Ok(MessageRef::new(message.chat.id, message.id))
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        document: Url,
        caption: Option<&str>,
    ) -> Result<MessageRef, TransportError> {
        let mut request = Requester::send_document(self, chat_id, InputFile::url(document))
            .parse_mode(ParseMode::Html);
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        let message = request.await?;
        Ok(MessageRef::new(message.chat.id, message.id))
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut request = self.answer_callback_query(callback_id.to_string());
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }

    async fn download_file(&self, file: &FileMeta) -> Result<DownloadedFile, TransportError> {
        let file = self.get_file(file.id.clone()).await?;
        let mut buffer: Vec<u8> = Vec::new();
        Download::download_file(self, &file.path, &mut buffer).await?;
        Ok(DownloadedFile {
            path: file.path,
            bytes: Bytes::from(buffer),
        })
    }
}
