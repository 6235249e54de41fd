use chrono::{DateTime, Utc};
use log::{error, info};
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::config::AdminSet;
use crate::handlers::HandlerResult;
use crate::localization::Lang;
use crate::storage::{ChatMessage, RecordStore, UserProfile};
use crate::transport::Transport;
use crate::user_session::SessionManager;
use crate::utils::MessageFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Forwarded,
    /// album mode swallows text
    Ignored,
}

/// stores free-text messages and passes them on to the admins
#[derive(Clone)]
pub struct MessageRelay {
    store: Arc<dyn RecordStore>,
    transport: Arc<dyn Transport>,
    admins: Arc<AdminSet>,
    sessions: SessionManager,
}

impl MessageRelay {
    pub fn new(
        store: Arc<dyn RecordStore>,
        transport: Arc<dyn Transport>,
        admins: Arc<AdminSet>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            store,
            transport,
            admins,
            sessions,
        }
    }

    pub async fn handle_text(
        &self,
        user: &UserProfile,
        chat_id: ChatId,
        message_id: i32,
        text: &str,
        date: DateTime<Utc>,
    ) -> HandlerResult<RelayOutcome> {
        if self.sessions.is_awaiting_album(&user.user_id).await {
            return Ok(RelayOutcome::Ignored);
        }

        self.store
            .save_chat_message(&ChatMessage {
                chat_id: chat_id.0,
                user_id: user.user_id.clone(),
                text: text.to_string(),
                message_id,
                date,
            })
            .await?;

        let forwarded = Lang::En.forwarded_message(
            &MessageFormatter::full_name(&user.first_name, &user.last_name),
            &MessageFormatter::escape_html(user.username_or_na()),
            &user.user_id,
            &MessageFormatter::escape_html(text),
        );
        for admin_id in self.admins.ids() {
            if let Err(e) = self
                .transport
                .send_text(ChatId(admin_id as i64), &forwarded, None)
                .await
            {
                error!(
                    "Failed to forward message from user {} to admin {}: {}",
                    user.user_id, admin_id, e
                );
            }
        }

        let lang = Lang::from_code(user.language_code.as_deref());
        self.transport
            .send_text(chat_id, lang.contact(), None)
            .await?;

        info!("Relayed message {} from user {}", message_id, user.user_id);
        Ok(RelayOutcome::Forwarded)
    }
}
