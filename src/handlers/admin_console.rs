use log::{info, warn};
use std::sync::Arc;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, User};

use crate::actions::CallbackAction;
use crate::config::AdminSet;
use crate::handlers::{HandlerResult, Origin};
use crate::localization::Lang;
use crate::storage::{
    AlbumSubmission, BlobStore, ConfirmationRecord, RecordStore, SIGNED_URL_TTL,
};
use crate::transport::Transport;
use crate::utils::MessageFormatter;

pub const PAGE_SIZE: usize = 5;

// telegram caps photo captions at 1024 characters
const USER_CAPTION_LIMIT: usize = 700;

/// rendered text plus its inline keyboard
#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// clamps a requested page into [0, total_pages - 1]
pub fn clamp_page(requested: usize, total: usize) -> usize {
    requested.min(total_pages(total).saturating_sub(1))
}

/// clamps a requested submission index into [0, total - 1]
pub fn clamp_index(requested: usize, total: usize) -> usize {
    requested.min(total.saturating_sub(1))
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

pub fn render_home(lang: Lang) -> Screen {
    Screen {
        text: lang.admin_home().to_string(),
        keyboard: InlineKeyboardMarkup::new(vec![
            vec![button(
                lang.btn_admin_confirmations(),
                CallbackAction::AdminPage(0),
            )],
            vec![button(lang.btn_admin_album(), CallbackAction::AdminAlbum(0))],
        ]),
    }
}

pub fn render_empty_list(lang: Lang) -> Screen {
    Screen {
        text: lang.admin_no_confirmations().to_string(),
        keyboard: InlineKeyboardMarkup::new(vec![vec![button(
            lang.btn_refresh(),
            CallbackAction::AdminPage(0),
        )]]),
    }
}

/// one page of confirmations; `page` must already be clamped
pub fn render_list(lang: Lang, records: &[ConfirmationRecord], page: usize, total: usize) -> Screen {
    let pages = total_pages(total);
    let mut lines = vec![lang.admin_list_header(total), String::new()];
    let mut rows = Vec::new();

    for (offset, record) in records.iter().enumerate() {
        let ordinal = page * PAGE_SIZE + offset + 1;
        let username = MessageFormatter::escape_html(record.user.username_or_na());
        let glyph = if record.is_pending() { "⏳" } else { "✅" };
        lines.push(lang.admin_list_item(
            ordinal,
            &username,
            Lang::En.payment_method_label(record.payment_method),
            glyph,
            &MessageFormatter::short_date(&record.created_at),
        ));
        rows.push(vec![button(
            format!("{}. @{} {}", ordinal, record.user.username_or_na(), glyph),
            CallbackAction::AdminView(record.id.clone()),
        )]);
    }

    if pages > 1 {
        lines.push(String::new());
        lines.push(lang.admin_page_indicator(page + 1, pages));
    }

    let mut navigation = Vec::new();
    if page > 0 {
        navigation.push(button(lang.btn_prev_page(), CallbackAction::AdminPage(page - 1)));
    }
    if page + 1 < pages {
        navigation.push(button(lang.btn_next_page(), CallbackAction::AdminPage(page + 1)));
    }
    if !navigation.is_empty() {
        rows.push(navigation);
    }
    rows.push(vec![button(lang.btn_refresh(), CallbackAction::AdminPage(page))]);
    rows.push(vec![button(lang.btn_admin_home(), CallbackAction::AdminMain)]);

    Screen {
        text: lines.join("\n"),
        keyboard: InlineKeyboardMarkup::new(rows),
    }
}

pub fn render_detail(lang: Lang, record: &ConfirmationRecord) -> Screen {
    let status = if record.is_pending() {
        lang.status_pending()
    } else {
        lang.status_confirmed()
    };
    let confirmed_at = record.confirmed_at.as_ref().map(MessageFormatter::full_date);
    let confirmed = match (&confirmed_at, &record.confirmed_by) {
        (Some(at), Some(by)) => Some((at.as_str(), by.as_str())),
        _ => None,
    };

    let text = lang.admin_detail(
        &MessageFormatter::full_name(&record.user.first_name, &record.user.last_name),
        &MessageFormatter::escape_html(record.user.username_or_na()),
        &record.user.user_id,
        Lang::En.payment_method_label(record.payment_method),
        status,
        &MessageFormatter::full_date(&record.created_at),
        confirmed,
    );

    let mut rows = Vec::new();
    if record.is_pending() {
        rows.push(vec![button(
            lang.btn_admin_confirm(),
            CallbackAction::AdminConfirm(record.id.clone()),
        )]);
    }
    rows.push(vec![button(lang.btn_back_to_list(), CallbackAction::AdminPage(0))]);

    Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    }
}

pub fn render_album_empty(lang: Lang) -> Screen {
    Screen {
        text: lang.admin_album_empty().to_string(),
        keyboard: InlineKeyboardMarkup::new(vec![vec![button(
            lang.btn_admin_home(),
            CallbackAction::AdminMain,
        )]]),
    }
}

/// caption and keyboard for the submission at `index` (already clamped)
pub fn render_submission(
    lang: Lang,
    submission: &AlbumSubmission,
    index: usize,
    total: usize,
) -> Screen {
    let caption = submission
        .caption
        .as_deref()
        .map(|caption| {
            MessageFormatter::escape_html(&MessageFormatter::truncate(caption, USER_CAPTION_LIMIT))
        });
    let mut text = lang.admin_album_caption(
        index + 1,
        total,
        &MessageFormatter::escape_html(submission.user.username_or_na()),
        submission.file_kind.as_str(),
        &MessageFormatter::full_date(&submission.created_at),
        caption.as_deref(),
    );
    if submission.file_kind.is_pdf() {
        let file_name = submission.file_name.as_deref().unwrap_or("N/A");
        text.push_str(&lang.admin_album_file_details(
            &MessageFormatter::escape_html(file_name),
            &MessageFormatter::escape_html(&submission.storage_path),
        ));
    }

    let mut navigation = Vec::new();
    if index > 0 {
        navigation.push(button(lang.btn_prev_page(), CallbackAction::AdminAlbum(index - 1)));
    }
    if index + 1 < total {
        navigation.push(button(lang.btn_next_page(), CallbackAction::AdminAlbum(index + 1)));
    }

    let mut rows = Vec::new();
    if !navigation.is_empty() {
        rows.push(navigation);
    }
    rows.push(vec![button(
        lang.btn_download(),
        CallbackAction::AdminAlbumDownload(submission.id.clone()),
    )]);
    rows.push(vec![button(lang.btn_admin_home(), CallbackAction::AdminMain)]);

    Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    }
}

/// paginated review of confirmations and album submissions, admins only
#[derive(Clone)]
pub struct AdminConsole {
    store: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    transport: Arc<dyn Transport>,
    admins: Arc<AdminSet>,
}

impl AdminConsole {
    pub fn new(
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        transport: Arc<dyn Transport>,
        admins: Arc<AdminSet>,
    ) -> Self {
        Self {
            store,
            blobs,
            transport,
            admins,
        }
    }

    /// refuses non-admins; returns false when the caller was turned away
    async fn authorize(&self, caller: &User, origin: Origin<'_>) -> HandlerResult<bool> {
        if self.admins.contains(caller.id.0) {
            return Ok(true);
        }
        warn!("User {} was refused access to the admin console", caller.id.0);
        let lang = Lang::from_code(caller.language_code.as_deref());
        match origin {
            Origin::Command(chat_id) => {
                self.transport
                    .send_text(chat_id, lang.admin_not_authorized(), None)
                    .await?;
            }
            Origin::Callback { callback_id, .. } => {
                self.transport
                    .answer_callback(callback_id, Some(lang.admin_not_authorized()))
                    .await?;
            }
        }
        Ok(false)
    }

    async fn answer(&self, origin: Origin<'_>, toast: Option<&str>) -> HandlerResult<()> {
        if let Origin::Callback { callback_id, .. } = origin {
            self.transport.answer_callback(callback_id, toast).await?;
        }
        Ok(())
    }

    /// removes the screen a button was tapped on; failures are only logged
    async fn delete_previous(&self, origin: Origin<'_>) {
        if let Origin::Callback { message, .. } = origin {
            if let Err(e) = self.transport.delete_message(message).await {
                warn!(
                    "Failed to delete previous console screen {} in chat {}: {}",
                    message.message_id, message.chat_id, e
                );
            }
        }
    }

    /// edits the tapped message in place, or sends a fresh one for commands
    async fn show(&self, origin: Origin<'_>, screen: Screen) -> HandlerResult<()> {
        match origin {
            Origin::Command(chat_id) => {
                self.transport
                    .send_text(chat_id, &screen.text, Some(screen.keyboard))
                    .await?;
            }
            Origin::Callback { message, .. } => {
                self.transport
                    .edit_text(message, &screen.text, Some(screen.keyboard))
                    .await?;
            }
        }
        Ok(())
    }

    pub async fn show_home(&self, caller: &User, origin: Origin<'_>) -> HandlerResult<()> {
        if !self.authorize(caller, origin).await? {
            return Ok(());
        }
        let lang = Lang::from_code(caller.language_code.as_deref());
        let screen = render_home(lang);

        self.delete_previous(origin).await;
        self.transport
            .send_text(origin.chat_id(), &screen.text, Some(screen.keyboard))
            .await?;
        self.answer(origin, None).await
    }

    pub async fn show_confirmations(
        &self,
        caller: &User,
        origin: Origin<'_>,
        requested_page: usize,
    ) -> HandlerResult<()> {
        if !self.authorize(caller, origin).await? {
            return Ok(());
        }
        let lang = Lang::from_code(caller.language_code.as_deref());

        let total = self.store.count_confirmations().await?;
        let screen = if total == 0 {
            render_empty_list(lang)
        } else {
            let page = clamp_page(requested_page, total);
            let records = self
                .store
                .list_confirmations(page * PAGE_SIZE, PAGE_SIZE)
                .await?;
            info!(
                "Admin {} viewing confirmations page {}/{} ({} records)",
                caller.id.0,
                page + 1,
                total_pages(total),
                records.len()
            );
            render_list(lang, &records, page, total)
        };

        self.show(origin, screen).await?;
        self.answer(origin, None).await
    }

    pub async fn show_confirmation(
        &self,
        caller: &User,
        origin: Origin<'_>,
        confirmation_id: &str,
    ) -> HandlerResult<()> {
        if !self.authorize(caller, origin).await? {
            return Ok(());
        }
        let lang = Lang::from_code(caller.language_code.as_deref());

        match self.store.get_confirmation(confirmation_id).await? {
            Some(record) => {
                self.show(origin, render_detail(lang, &record)).await?;
                self.answer(origin, None).await
            }
            None => {
                self.answer(origin, Some(lang.confirmation_not_found()))
                    .await
            }
        }
    }

    pub async fn show_submission(
        &self,
        caller: &User,
        origin: Origin<'_>,
        requested_index: usize,
    ) -> HandlerResult<()> {
        if !self.authorize(caller, origin).await? {
            return Ok(());
        }
        let lang = Lang::from_code(caller.language_code.as_deref());
        let chat_id = origin.chat_id();

        let total = self.store.count_submissions().await?;
        if total == 0 {
            let screen = render_album_empty(lang);
            self.delete_previous(origin).await;
            self.transport
                .send_text(chat_id, &screen.text, Some(screen.keyboard))
                .await?;
            return self.answer(origin, None).await;
        }

        let index = clamp_index(requested_index, total);
        let submission = match self.store.submission_at(index).await? {
            Some(submission) => submission,
            None => {
                return self
                    .answer(origin, Some(lang.submission_not_found()))
                    .await
            }
        };
        let screen = render_submission(lang, &submission, index, total);

        self.delete_previous(origin).await;
        if submission.file_kind.is_pdf() {
            self.transport
                .send_text(chat_id, &screen.text, Some(screen.keyboard))
                .await?;
        } else {
            let url = self
                .blobs
                .signed_url(&submission.storage_path, SIGNED_URL_TTL)
                .await?;
            self.transport
                .send_photo(chat_id, url, &screen.text, Some(screen.keyboard))
                .await?;
        }
        self.answer(origin, None).await
    }

    pub async fn download_submission(
        &self,
        caller: &User,
        origin: Origin<'_>,
        submission_id: &str,
    ) -> HandlerResult<()> {
        if !self.authorize(caller, origin).await? {
            return Ok(());
        }
        let lang = Lang::from_code(caller.language_code.as_deref());

        let submission = match self.store.get_submission(submission_id).await? {
            Some(submission) => submission,
            None => {
                return self
                    .answer(origin, Some(lang.submission_not_found()))
                    .await
            }
        };

        let url = self
            .blobs
            .signed_url(&submission.storage_path, SIGNED_URL_TTL)
            .await?;
        let file_name = submission
            .file_name
            .as_deref()
            .map(MessageFormatter::escape_html);
        if submission.file_kind.is_pdf() {
            self.transport
                .send_document(origin.chat_id(), url, file_name.as_deref())
                .await?;
        } else {
            self.transport
                .send_photo(
                    origin.chat_id(),
                    url,
                    file_name.as_deref().unwrap_or_default(),
                    None,
                )
                .await?;
        }

        info!(
            "Admin {} downloaded album submission {}",
            caller.id.0, submission.id
        );
        self.answer(origin, None).await
    }
}
