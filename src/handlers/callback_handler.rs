use log::{info, warn};
use teloxide::types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, User};

use crate::actions::CallbackAction;
use crate::bot::BotContext;
use crate::config::PaymentMethod;
use crate::handlers::{HandlerResult, Origin};
use crate::localization::Lang;
use crate::storage::UserProfile;
use crate::transport::MessageRef;
use crate::user_session::SessionState;

pub struct CallbackHandler;

impl CallbackHandler {
    fn button(text: &str, action: CallbackAction) -> InlineKeyboardButton {
        InlineKeyboardButton::callback(text, action.to_string())
    }

    pub fn welcome_keyboard(lang: Lang) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![Self::button(
                lang.btn_payment_options(),
                CallbackAction::ShowPaymentOptions,
            )],
            vec![Self::button(lang.btn_album(), CallbackAction::ShowAlbum)],
        ])
    }

    pub fn payment_options_keyboard(lang: Lang) -> InlineKeyboardMarkup {
        let mut rows: Vec<Vec<InlineKeyboardButton>> = PaymentMethod::ALL
            .iter()
            .map(|method| {
                vec![Self::button(
                    lang.payment_method_label(*method),
                    CallbackAction::PaymentDetails(*method),
                )]
            })
            .collect();
        rows.push(vec![Self::button(
            lang.btn_back(),
            CallbackAction::BackToWelcome,
        )]);
        InlineKeyboardMarkup::new(rows)
    }

    pub fn payment_details_keyboard(lang: Lang, method: PaymentMethod) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![Self::button(
                lang.btn_confirm_payment(),
                CallbackAction::ConfirmPayment(method),
            )],
            vec![Self::button(
                lang.btn_back(),
                CallbackAction::ShowPaymentOptions,
            )],
        ])
    }

    pub fn album_keyboard(lang: Lang) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![Self::button(
                lang.btn_album_guidelines(),
                CallbackAction::ShowAlbumGuidelines,
            )],
            vec![Self::button(
                lang.btn_send_album_file(),
                CallbackAction::AlbumStartUpload,
            )],
            vec![Self::button(lang.btn_back(), CallbackAction::BackToWelcome)],
        ])
    }

    pub fn album_guidelines_keyboard(lang: Lang) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![
            vec![Self::button(
                lang.btn_send_album_file(),
                CallbackAction::AlbumStartUpload,
            )],
            vec![Self::button(lang.btn_back(), CallbackAction::ShowAlbum)],
        ])
    }

    pub async fn handle_callback_query(ctx: BotContext, query: CallbackQuery) -> HandlerResult<()> {
        let action = query.data.as_deref().and_then(CallbackAction::parse);
        let callback_id = query.id.to_string();

        match (action, &query.message) {
            (Some(action), Some(message)) => {
                if action.requires_admin() {
                    info!("Admin action {} from user {}", action, query.from.id.0);
                }
                let origin = MessageRef::from_callback_message(message);
                Self::handle_action(ctx, &query.from, action, origin, &callback_id).await
            }
            (None, _) => {
                warn!(
                    "Unknown callback data {:?} from user {}",
                    query.data, query.from.id.0
                );
                ctx.transport.answer_callback(&callback_id, None).await?;
                Ok(())
            }
            (Some(_), None) => {
                // message too old to be delivered with the callback
                ctx.transport.answer_callback(&callback_id, None).await?;
                Ok(())
            }
        }
    }

    pub async fn handle_action(
        ctx: BotContext,
        from: &User,
        action: CallbackAction,
        message: MessageRef,
        callback_id: &str,
    ) -> HandlerResult<()> {
        let lang = Lang::from_code(from.language_code.as_deref());
        let origin = Origin::Callback {
            message,
            callback_id,
        };

        match action {
            CallbackAction::ShowPaymentOptions => {
                ctx.transport
                    .edit_text(
                        message,
                        lang.payment_header(),
                        Some(Self::payment_options_keyboard(lang)),
                    )
                    .await?;
            }
            CallbackAction::PaymentDetails(method) => {
                ctx.transport
                    .edit_text(
                        message,
                        &lang.payment_details(method, &ctx.payment_details),
                        Some(Self::payment_details_keyboard(lang, method)),
                    )
                    .await?;
            }
            CallbackAction::ConfirmPayment(method) => {
                let user = UserProfile::from_telegram(from);
                // the workflow answers the callback itself
                ctx.confirmations
                    .request_confirmation(&user, method, message, callback_id)
                    .await?;
                return Ok(());
            }
            CallbackAction::BackToWelcome => {
                ctx.transport
                    .edit_text(message, lang.welcome(), Some(Self::welcome_keyboard(lang)))
                    .await?;
            }
            CallbackAction::ShowAlbum => {
                ctx.transport
                    .edit_text(message, lang.album_intro(), Some(Self::album_keyboard(lang)))
                    .await?;
            }
            CallbackAction::ShowAlbumGuidelines => {
                ctx.transport
                    .edit_text(
                        message,
                        lang.album_guidelines(),
                        Some(Self::album_guidelines_keyboard(lang)),
                    )
                    .await?;
            }
            CallbackAction::AlbumStartUpload => {
                ctx.sessions
                    .set_session(&from.id.0.to_string(), SessionState::AwaitingAlbumFile)
                    .await;
                info!("User {} entered album mode", from.id.0);
                ctx.transport
                    .edit_text(message, lang.album_awaiting_file(), None)
                    .await?;
            }
            // console entry points answer the callback themselves
            CallbackAction::AdminMain => return ctx.console.show_home(from, origin).await,
            CallbackAction::AdminPage(page) => {
                return ctx.console.show_confirmations(from, origin, page).await
            }
            CallbackAction::AdminView(id) => {
                return ctx.console.show_confirmation(from, origin, &id).await
            }
            CallbackAction::AdminConfirm(id) => {
                ctx.confirmations
                    .confirm_payment(&id, from, message, callback_id)
                    .await?;
                return Ok(());
            }
            CallbackAction::AdminAlbum(index) => {
                return ctx.console.show_submission(from, origin, index).await
            }
            CallbackAction::AdminAlbumDownload(id) => {
                return ctx.console.download_submission(from, origin, &id).await
            }
        }

        ctx.transport.answer_callback(callback_id, None).await?;
        Ok(())
    }
}
