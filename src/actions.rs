use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::PaymentMethod;

/// every callback payload the bot puts on an inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    ShowPaymentOptions,
    PaymentDetails(PaymentMethod),
    ConfirmPayment(PaymentMethod),
    BackToWelcome,
    ShowAlbum,
    ShowAlbumGuidelines,
    AlbumStartUpload,
    AdminMain,
    AdminPage(usize),
    AdminView(String),
    AdminConfirm(String),
    AdminAlbum(usize),
    AdminAlbumDownload(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        data.parse().ok()
    }

    /// true for actions that require the caller to be in the admin set
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            CallbackAction::AdminMain
                | CallbackAction::AdminPage(_)
                | CallbackAction::AdminView(_)
                | CallbackAction::AdminConfirm(_)
                | CallbackAction::AdminAlbum(_)
                | CallbackAction::AdminAlbumDownload(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown callback data: {0}")]
pub struct UnknownAction(pub String);

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl FromStr for CallbackAction {
    type Err = UnknownAction;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(data.to_string());

        let action = match data {
            "show_payment_options" => Some(CallbackAction::ShowPaymentOptions),
            "back_to_welcome" => Some(CallbackAction::BackToWelcome),
            "show_album" => Some(CallbackAction::ShowAlbum),
            "show_album_guidelines" => Some(CallbackAction::ShowAlbumGuidelines),
            "album_start_upload" => Some(CallbackAction::AlbumStartUpload),
            "admin_main" => Some(CallbackAction::AdminMain),
            _ => None,
        };
        if let Some(action) = action {
            return Ok(action);
        }

        // longer prefixes first: admin_album_dl_ shadows admin_album_
        if let Some(id) = data.strip_prefix("admin_album_dl_") {
            return non_empty(id)
                .map(CallbackAction::AdminAlbumDownload)
                .ok_or_else(unknown);
        }
        if let Some(index) = data.strip_prefix("admin_album_") {
            return index
                .parse()
                .map(CallbackAction::AdminAlbum)
                .map_err(|_| unknown());
        }
        if let Some(page) = data.strip_prefix("admin_page_") {
            return page
                .parse()
                .map(CallbackAction::AdminPage)
                .map_err(|_| unknown());
        }
        if let Some(id) = data.strip_prefix("admin_view_") {
            return non_empty(id).map(CallbackAction::AdminView).ok_or_else(unknown);
        }
        if let Some(id) = data.strip_prefix("admin_confirm_") {
            return non_empty(id)
                .map(CallbackAction::AdminConfirm)
                .ok_or_else(unknown);
        }
        if let Some(method) = data.strip_prefix("confirm_payment_") {
            return method
                .parse()
                .map(CallbackAction::ConfirmPayment)
                .map_err(|_| unknown());
        }
        if let Some(method) = data.strip_prefix("payment_") {
            return method
                .parse()
                .map(CallbackAction::PaymentDetails)
                .map_err(|_| unknown());
        }

        Err(unknown())
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::ShowPaymentOptions => f.write_str("show_payment_options"),
            CallbackAction::PaymentDetails(method) => write!(f, "payment_{}", method),
            CallbackAction::ConfirmPayment(method) => write!(f, "confirm_payment_{}", method),
            CallbackAction::BackToWelcome => f.write_str("back_to_welcome"),
            CallbackAction::ShowAlbum => f.write_str("show_album"),
            CallbackAction::ShowAlbumGuidelines => f.write_str("show_album_guidelines"),
            CallbackAction::AlbumStartUpload => f.write_str("album_start_upload"),
            CallbackAction::AdminMain => f.write_str("admin_main"),
            CallbackAction::AdminPage(page) => write!(f, "admin_page_{}", page),
            CallbackAction::AdminView(id) => write!(f, "admin_view_{}", id),
            CallbackAction::AdminConfirm(id) => write!(f, "admin_confirm_{}", id),
            CallbackAction::AdminAlbum(index) => write!(f, "admin_album_{}", index),
            CallbackAction::AdminAlbumDownload(id) => write!(f, "admin_album_dl_{}", id),
        }
    }
}
