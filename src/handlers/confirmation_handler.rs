use chrono::Utc;
use log::{error, info, warn};
use std::sync::Arc;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, User};

use crate::actions::CallbackAction;
use crate::config::{AdminSet, PaymentMethod};
use crate::handlers::HandlerResult;
use crate::localization::Lang;
use crate::storage::{ConfirmationRecord, NewConfirmation, RecordStore, UserProfile};
use crate::transport::{MessageRef, Transport};
use crate::utils::MessageFormatter;

/// result of an admin tapping "confirm payment received"
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Confirmed(ConfirmationRecord),
    /// the record is missing or no longer pending
    AlreadyProcessed,
    Unauthorized,
}

/// user-side "I've paid" notices and the admin-side confirmation of them
#[derive(Clone)]
pub struct ConfirmationWorkflow {
    store: Arc<dyn RecordStore>,
    transport: Arc<dyn Transport>,
    admins: Arc<AdminSet>,
}

impl ConfirmationWorkflow {
    pub fn new(
        store: Arc<dyn RecordStore>,
        transport: Arc<dyn Transport>,
        admins: Arc<AdminSet>,
    ) -> Self {
        Self {
            store,
            transport,
            admins,
        }
    }

    pub fn admin_confirm_keyboard(confirmation_id: &str) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            Lang::En.btn_admin_confirm(),
            CallbackAction::AdminConfirm(confirmation_id.to_string()).to_string(),
        )]])
    }

    /// first name, else username, else a generic label
    pub fn admin_display_name(admin: &User) -> String {
        if !admin.first_name.is_empty() {
            return admin.first_name.clone();
        }
        match &admin.username {
            Some(username) if !username.is_empty() => username.clone(),
            _ => "Admin".to_string(),
        }
    }

    /// stores a pending confirmation, notifies every admin and acknowledges the user
    pub async fn request_confirmation(
        &self,
        user: &UserProfile,
        payment_method: PaymentMethod,
        origin: MessageRef,
        callback_id: &str,
    ) -> HandlerResult<String> {
        let record = NewConfirmation {
            user: user.clone(),
            payment_method,
            created_at: Utc::now(),
        };
        let confirmation_id = self.store.create_confirmation(&record).await?;

        let notification = Lang::En.admin_confirm_request(
            &MessageFormatter::full_name(&user.first_name, &user.last_name),
            &MessageFormatter::escape_html(user.username_or_na()),
            &user.user_id,
            Lang::En.payment_method_label(payment_method),
            &MessageFormatter::full_date(&record.created_at),
        );

        for admin_id in self.admins.ids() {
            if let Err(e) = self
                .transport
                .send_text(
                    ChatId(admin_id as i64),
                    &notification,
                    Some(Self::admin_confirm_keyboard(&confirmation_id)),
                )
                .await
            {
                error!(
                    "Failed to notify admin {} about confirmation {}: {}",
                    admin_id, confirmation_id, e
                );
            }
        }

        let lang = Lang::from_code(user.language_code.as_deref());
        self.transport
            .edit_text(origin, lang.confirm_request_sent(), None)
            .await?;
        self.transport.answer_callback(callback_id, None).await?;

        info!(
            "User {} reported a {} payment, confirmation {}",
            user.user_id, payment_method, confirmation_id
        );
        Ok(confirmation_id)
    }

    /// flips a pending confirmation to confirmed and tells the payer
    pub async fn confirm_payment(
        &self,
        confirmation_id: &str,
        admin: &User,
        origin: MessageRef,
        callback_id: &str,
    ) -> HandlerResult<ConfirmOutcome> {
        let admin_lang = Lang::from_code(admin.language_code.as_deref());

        if !self.admins.contains(admin.id.0) {
            warn!(
                "User {} tried to confirm payment {} without admin rights",
                admin.id.0, confirmation_id
            );
            self.transport
                .answer_callback(callback_id, Some(admin_lang.admin_not_authorized()))
                .await?;
            return Ok(ConfirmOutcome::Unauthorized);
        }

        let admin_id = admin.id.0.to_string();
        let record = match self
            .store
            .confirm_pending(confirmation_id, &admin_id, Utc::now())
            .await?
        {
            Some(record) => record,
            None => {
                // missing, or somebody confirmed it first
                info!(
                    "Confirmation {} is not pending, ignoring confirm by admin {}",
                    confirmation_id, admin_id
                );
                self.transport
                    .answer_callback(callback_id, Some(admin_lang.confirm_already_processed()))
                    .await?;
                return Ok(ConfirmOutcome::AlreadyProcessed);
            }
        };

        let confirmed_text = admin_lang.payment_confirmed_admin(
            &MessageFormatter::escape_html(record.user.username_or_na()),
            &record.user.user_id,
            &MessageFormatter::escape_html(&Self::admin_display_name(admin)),
        );
        self.transport.edit_text(origin, &confirmed_text, None).await?;
        self.transport.answer_callback(callback_id, None).await?;

        info!(
            "Confirmation {} for user {} confirmed by admin {}",
            record.id, record.user.user_id, admin_id
        );

        self.notify_payer(&record).await;
        Ok(ConfirmOutcome::Confirmed(record))
    }

    async fn notify_payer(&self, record: &ConfirmationRecord) {
        let language_code = match self.store.user_language(&record.user.user_id).await {
            Ok(Some(code)) => Some(code),
            Ok(None) => record.user.language_code.clone(),
            Err(e) => {
                warn!(
                    "Failed to look up language of user {}: {}",
                    record.user.user_id, e
                );
                record.user.language_code.clone()
            }
        };
        let lang = Lang::from_code(language_code.as_deref());

        let chat_id = match record.user.user_id.parse::<i64>() {
            Ok(id) => ChatId(id),
            Err(e) => {
                error!(
                    "Confirmation {} has a non-numeric user id {}: {}",
                    record.id, record.user.user_id, e
                );
                return;
            }
        };

        if let Err(e) = self
            .transport
            .send_text(chat_id, lang.payment_confirmed_user(), None)
            .await
        {
            error!(
                "Failed to notify user {} about confirmed payment: {}",
                record.user.user_id, e
            );
        }
    }
}
