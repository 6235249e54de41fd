use log::{error, info, warn};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, User};
use teloxide::utils::command::BotCommands;

use crate::config::{AdminSet, PaymentDetails};
use crate::handlers::{
    AdminConsole, AlbumIntake, AlbumUpload, CallbackHandler, CommandHandler,
    ConfirmationWorkflow, MessageRelay,
};
use crate::storage::{BlobStore, RecordStore, UserProfile};
use crate::transport::Transport;
use crate::user_session::SessionManager;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "open the main menu")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
    #[command(description = "admin panel")]
    Admin,
}

/// everything a handler needs, cheap to clone per update
#[derive(Clone)]
pub struct BotContext {
    pub transport: Arc<dyn Transport>,
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionManager,
    pub payment_details: Arc<PaymentDetails>,
    pub confirmations: ConfirmationWorkflow,
    pub console: AdminConsole,
    pub album: AlbumIntake,
    pub relay: MessageRelay,
}

impl BotContext {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        admins: AdminSet,
        payment_details: PaymentDetails,
    ) -> Self {
        let admins = Arc::new(admins);
        let sessions = SessionManager::new();

        Self {
            confirmations: ConfirmationWorkflow::new(
                store.clone(),
                transport.clone(),
                admins.clone(),
            ),
            console: AdminConsole::new(
                store.clone(),
                blobs.clone(),
                transport.clone(),
                admins.clone(),
            ),
            album: AlbumIntake::new(
                store.clone(),
                blobs,
                transport.clone(),
                admins.clone(),
                sessions.clone(),
            ),
            relay: MessageRelay::new(store.clone(), transport.clone(), admins, sessions.clone()),
            payment_details: Arc::new(payment_details),
            transport,
            store,
            sessions,
        }
    }

    /// refreshes the sender's profile; failures never block routing
    pub async fn track_user(&self, user: &User) {
        if let Err(e) = self.store.upsert_user(&UserProfile::from_telegram(user)).await {
            warn!("Failed to upsert profile of user {}: {}", user.id.0, e);
        }
    }
}

pub struct TelegramBot {
    bot: Bot,
    ctx: BotContext,
}

impl TelegramBot {
    pub fn new(
        bot_token: &str,
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        admins: AdminSet,
        payment_details: PaymentDetails,
    ) -> Self {
        let bot = Bot::new(bot_token);
        let transport: Arc<dyn Transport> = Arc::new(bot.clone());
        let ctx = BotContext::new(transport, store, blobs, admins, payment_details);
        Self { bot, ctx }
    }

    pub async fn run(&self) {
        info!("Starting Telegram bot...");

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            error!("Failed to register bot commands: {}", e);
        }

        let ctx = self.ctx.clone();

        let handler = dptree::entry()
            .branch(Update::filter_callback_query().endpoint({
                let ctx = ctx.clone();
                move |query: CallbackQuery| {
                    let ctx = ctx.clone();
                    async move { Self::handle_callback(ctx, query).await }
                }
            }))
            .branch(
                Update::filter_message()
                    .branch(dptree::entry().filter_command::<Command>().endpoint({
                        let ctx = ctx.clone();
                        move |msg: Message, cmd: Command| {
                            let ctx = ctx.clone();
                            async move { Self::handle_command(ctx, msg, cmd).await }
                        }
                    }))
                    .branch(
                        dptree::entry()
                            .filter_map(|msg: Message| {
                                AlbumUpload::from_message(&msg).map(|upload| (msg, upload))
                            })
                            .endpoint({
                                let ctx = ctx.clone();
                                move |(msg, upload): (Message, AlbumUpload)| {
                                    let ctx = ctx.clone();
                                    async move { Self::handle_upload(ctx, msg, upload).await }
                                }
                            }),
                    )
                    .branch(
                        dptree::filter(|msg: Message| msg.text().is_some()).endpoint({
                            let ctx = ctx.clone();
                            move |msg: Message| {
                                let ctx = ctx.clone();
                                async move { Self::handle_text(ctx, msg).await }
                            }
                        }),
                    )
                    .branch(dptree::endpoint(|msg: Message| async move {
                        info!(
                            "[update] unhandled message {} in chat {}",
                            msg.id.0, msg.chat.id.0
                        );
                        respond(())
                    })),
            )
            .branch(dptree::endpoint(|update: Update| async move {
                info!("[update] unhandled update {:?}", update.id);
                respond(())
            }));

        Dispatcher::builder(self.bot.clone(), handler)
            .error_handler(
                teloxide::error_handlers::LoggingErrorHandler::with_custom_text(
                    "An error from the update listener",
                ),
            )
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_callback(ctx: BotContext, query: CallbackQuery) -> ResponseResult<()> {
        info!(
            "[cb] {} from user {}",
            query.data.as_deref().unwrap_or(""),
            query.from.id.0
        );
        ctx.track_user(&query.from).await;

        let callback_id = query.id.to_string();
        if let Err(e) = CallbackHandler::handle_callback_query(ctx.clone(), query).await {
            error!("Callback handling failed: {}", e);
            // stop the client spinner; a second answer is rejected harmlessly
            let _ = ctx.transport.answer_callback(&callback_id, None).await;
        }
        Ok(())
    }

    async fn handle_command(ctx: BotContext, msg: Message, cmd: Command) -> ResponseResult<()> {
        info!("[msg] command {:?} in chat {}", cmd, msg.chat.id.0);
        if let Some(user) = msg.from.as_ref() {
            ctx.track_user(user).await;
        }

        if let Err(e) = CommandHandler::handle_command(ctx, msg, cmd).await {
            error!("Command handling failed: {}", e);
        }
        Ok(())
    }

    async fn handle_upload(ctx: BotContext, msg: Message, upload: AlbumUpload) -> ResponseResult<()> {
        let kind = match upload {
            AlbumUpload::Photo { .. } => "[photo]",
            AlbumUpload::Document { .. } => "[doc]",
            AlbumUpload::Video => "[update]",
        };
        info!("{} {} in chat {}", kind, upload.label(), msg.chat.id.0);

        let Some(user) = msg.from.as_ref() else {
            return Ok(());
        };
        ctx.track_user(user).await;

        let profile = UserProfile::from_telegram(user);
        let caption = msg.caption().map(str::to_string);
        match ctx.album.receive(&profile, msg.chat.id, upload, caption).await {
            Ok(outcome) => info!("Album upload from user {}: {:?}", profile.user_id, outcome),
            Err(e) => error!("Album upload from user {} failed: {}", profile.user_id, e),
        }
        Ok(())
    }

    async fn handle_text(ctx: BotContext, msg: Message) -> ResponseResult<()> {
        let Some(text) = msg.text() else {
            return Ok(());
        };
        info!("[msg] {} chars in chat {}", text.chars().count(), msg.chat.id.0);

        let Some(user) = msg.from.as_ref() else {
            return Ok(());
        };
        ctx.track_user(user).await;

        let profile = UserProfile::from_telegram(user);
        if let Err(e) = ctx
            .relay
            .handle_text(&profile, msg.chat.id, msg.id.0, text.trim(), msg.date)
            .await
        {
            error!("Relaying message from user {} failed: {}", profile.user_id, e);
        }
        Ok(())
    }
}
