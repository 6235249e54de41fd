pub mod admin_console;
pub mod album_handler;
pub mod callback_handler;
pub mod command_handler;
pub mod confirmation_handler;
pub mod message_handler;

pub use admin_console::AdminConsole;
pub use album_handler::{AlbumIntake, AlbumUpload, ReceiveOutcome};
pub use callback_handler::CallbackHandler;
pub use command_handler::CommandHandler;
pub use confirmation_handler::{ConfirmOutcome, ConfirmationWorkflow};
pub use message_handler::{MessageRelay, RelayOutcome};

use teloxide::types::ChatId;
use thiserror::Error;

use crate::storage::{BlobError, StoreError};
use crate::transport::{MessageRef, TransportError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type HandlerResult<T> = Result<T, HandlerError>;

/// where an interaction came from and therefore how its answer is delivered
#[derive(Debug, Clone, Copy)]
pub enum Origin<'a> {
    /// a typed command: answers go out as new messages
    Command(ChatId),
    /// a button tap on an existing bot message
    Callback {
        message: MessageRef,
        callback_id: &'a str,
    },
}

impl Origin<'_> {
    pub fn chat_id(&self) -> ChatId {
        match self {
            Origin::Command(chat_id) => *chat_id,
            Origin::Callback { message, .. } => message.chat_id,
        }
    }
}
