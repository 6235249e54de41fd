use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use teloxide::types::{
    ChatId, FileMeta, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId,
};
use teloxide::{ApiError, RequestError};
use tg_payments::transport::{DownloadedFile, MessageRef, Transport, TransportError};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentKind {
    Text,
    Edit,
    Delete,
    Photo,
    Document,
    CallbackAnswer,
}

/// represents an outgoing call for verification in tests
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub kind: SentKind,
    pub chat_id: i64,
    pub message_id: Option<i32>,
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    pub url: Option<Url>,
}

impl SentMessage {
    /// callback data of every button, row by row
    pub fn actions(&self) -> Vec<String> {
        self.keyboard.as_ref().map(callback_data).unwrap_or_default()
    }
}

pub fn callback_data(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
    keyboard
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect()
}

/// records everything the handlers would send to telegram
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub sent_messages: Arc<Mutex<Vec<SentMessage>>>,
    failing_chats: Arc<Mutex<HashSet<i64>>>,
    fail_deletes: Arc<Mutex<bool>>,
    next_message_id: Arc<Mutex<i32>>,
    download: Arc<Mutex<(String, Bytes)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            failing_chats: Arc::new(Mutex::new(HashSet::new())),
            fail_deletes: Arc::new(Mutex::new(false)),
            next_message_id: Arc::new(Mutex::new(100)),
            download: Arc::new(Mutex::new((
                "photos/file_1.jpg".to_string(),
                Bytes::from_static(b"fake image bytes"),
            ))),
        }
    }

    /// every send to this chat fails as if the user blocked the bot
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }

    pub fn fail_deletes(&self) {
        *self.fail_deletes.lock().unwrap() = true;
    }

    /// path and content served by the next downloads
    pub fn set_download(&self, path: &str, bytes: &'static [u8]) {
        *self.download.lock().unwrap() = (path.to_string(), Bytes::from_static(bytes));
    }

    pub fn get_sent_messages(&self) -> Vec<SentMessage> {
        self.sent_messages.lock().unwrap().clone()
    }

    pub fn get_messages_for_chat(&self, chat_id: i64) -> Vec<SentMessage> {
        self.get_sent_messages()
            .into_iter()
            .filter(|msg| msg.chat_id == chat_id && msg.kind != SentKind::CallbackAnswer)
            .collect()
    }

    pub fn of_kind(&self, kind: SentKind) -> Vec<SentMessage> {
        self.get_sent_messages()
            .into_iter()
            .filter(|msg| msg.kind == kind)
            .collect()
    }

    /// toasts and plain acknowledgements, in order
    pub fn callback_answers(&self) -> Vec<SentMessage> {
        self.of_kind(SentKind::CallbackAnswer)
    }

    pub fn clear_messages(&self) {
        self.sent_messages.lock().unwrap().clear();
    }

    pub fn chat_received_message_containing(&self, chat_id: i64, text: &str) -> bool {
        self.get_messages_for_chat(chat_id)
            .iter()
            .any(|msg| msg.text.contains(text))
    }

    fn check_chat(&self, chat_id: ChatId) -> Result<(), TransportError> {
        if self.failing_chats.lock().unwrap().contains(&chat_id.0) {
            return Err(TransportError::Request(RequestError::Api(ApiError::BotBlocked)));
        }
        Ok(())
    }

    fn record(&self, message: SentMessage) -> i32 {
        let mut next = self.next_message_id.lock().unwrap();
        *next += 1;
        let id = message.message_id.unwrap_or(*next);
        self.sent_messages.lock().unwrap().push(SentMessage {
            message_id: Some(id),
            ..message
        });
        id
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError> {
        self.check_chat(chat_id)?;
        let id = self.record(SentMessage {
            kind: SentKind::Text,
            chat_id: chat_id.0,
            message_id: None,
            text: text.to_string(),
            keyboard,
            url: None,
        });
        Ok(MessageRef::new(chat_id, MessageId(id)))
    }

    async fn edit_text(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        self.check_chat(message.chat_id)?;
        self.record(SentMessage {
            kind: SentKind::Edit,
            chat_id: message.chat_id.0,
            message_id: Some(message.message_id.0),
            text: text.to_string(),
            keyboard,
            url: None,
        });
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(TransportError::Request(RequestError::Api(
                ApiError::MessageToDeleteNotFound,
            )));
        }
        self.record(SentMessage {
            kind: SentKind::Delete,
            chat_id: message.chat_id.0,
            message_id: Some(message.message_id.0),
            text: String::new(),
            keyboard: None,
            url: None,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: Url,
        caption: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError> {
        self.check_chat(chat_id)?;
        let id = self.record(SentMessage {
            kind: SentKind::Photo,
            chat_id: chat_id.0,
            message_id: None,
            text: caption.to_string(),
            keyboard,
            url: Some(photo),
        });
        Ok(MessageRef::new(chat_id, MessageId(id)))
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        document: Url,
        caption: Option<&str>,
    ) -> Result<MessageRef, TransportError> {
        self.check_chat(chat_id)?;
        let id = self.record(SentMessage {
            kind: SentKind::Document,
            chat_id: chat_id.0,
            message_id: None,
            text: caption.unwrap_or_default().to_string(),
            keyboard: None,
            url: Some(document),
        });
        Ok(MessageRef::new(chat_id, MessageId(id)))
    }

    async fn answer_callback(
        &self,
        _callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        self.record(SentMessage {
            kind: SentKind::CallbackAnswer,
            chat_id: 0,
            message_id: Some(0),
            text: text.unwrap_or_default().to_string(),
            keyboard: None,
            url: None,
        });
        Ok(())
    }

    async fn download_file(&self, _file: &FileMeta) -> Result<DownloadedFile, TransportError> {
        let (path, bytes) = self.download.lock().unwrap().clone();
        Ok(DownloadedFile { path, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_records_and_fails() {
        let transport = MockTransport::new();

        let sent = transport
            .send_text(ChatId(7), "hello", None)
            .await
            .expect("send should succeed");
        assert_eq!(sent.chat_id, ChatId(7));
        assert!(transport.chat_received_message_containing(7, "hello"));

        transport.fail_chat(8);
        assert!(transport.send_text(ChatId(8), "nope", None).await.is_err());
        assert_eq!(transport.get_messages_for_chat(8).len(), 0);

        transport.clear_messages();
        assert!(transport.get_sent_messages().is_empty());
    }
}
