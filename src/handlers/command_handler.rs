use log::info;
use teloxide::types::{ChatId, Message, User};

use crate::bot::{BotContext, Command};
use crate::handlers::{CallbackHandler, HandlerResult, Origin};
use crate::localization::Lang;

pub struct CommandHandler;

impl CommandHandler {
    pub async fn handle_command(ctx: BotContext, msg: Message, cmd: Command) -> HandlerResult<()> {
        let Some(user) = msg.from.as_ref() else {
            return Ok(());
        };
        Self::dispatch(ctx, user, msg.chat.id, cmd).await
    }

    pub async fn dispatch(
        ctx: BotContext,
        user: &User,
        chat_id: ChatId,
        cmd: Command,
    ) -> HandlerResult<()> {
        let lang = Lang::from_code(user.language_code.as_deref());

        match cmd {
            Command::Start => {
                // leaving album mode is part of going back to the menu
                ctx.sessions.clear_session(&user.id.0.to_string()).await;
                ctx.transport
                    .send_text(
                        chat_id,
                        lang.welcome(),
                        Some(CallbackHandler::welcome_keyboard(lang)),
                    )
                    .await?;
                info!("Sent welcome screen to user {}", user.id.0);
            }
            Command::Help => {
                ctx.transport.send_text(chat_id, lang.help(), None).await?;
            }
            Command::Admin => {
                ctx.console
                    .show_home(user, Origin::Command(chat_id))
                    .await?;
            }
        }
        Ok(())
    }
}
