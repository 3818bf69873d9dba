//! Controller outcomes, turn tickets and command errors.

use parley_ai::{ChatError, SharedSession};
use parley_common::{ConversationId, PlatformError, Provider};

/// Whether a reply is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    AwaitingResponse,
}

/// Where a reply lands once it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnTarget {
    Append,
    /// Overwrite the bot message at this index.
    Replace(usize),
}

/// Identifies an in-flight turn and the conversation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub conversation: ConversationId,
    /// Vendor the request went to.
    pub provider: Provider,
    pub target: TurnTarget,
    /// Message count of the conversation when the turn started.
    pub(super) messages_at_start: usize,
}

/// A turn ready to run away from the controller.
pub struct PendingTurn {
    pub(super) ticket: Ticket,
    pub(super) session: SharedSession,
    pub(super) prompt: String,
    pub(super) image: Option<String>,
}

impl PendingTurn {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Call the provider. Holds the session lock for the whole call.
    pub async fn run(self) -> TurnResult {
        let reply = {
            let mut session = self.session.lock().await;
            session.chat(&self.prompt, self.image.as_deref()).await
        };
        TurnResult {
            ticket: self.ticket,
            prompt: self.prompt,
            image: self.image,
            reply,
        }
    }
}

impl std::fmt::Debug for PendingTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTurn")
            .field("ticket", &self.ticket)
            .field("prompt", &self.prompt)
            .field("image", &self.image.is_some())
            .finish_non_exhaustive()
    }
}

/// What came back from a [`PendingTurn`].
#[derive(Debug)]
pub struct TurnResult {
    pub ticket: Ticket,
    pub prompt: String,
    pub image: Option<String>,
    pub reply: Result<String, ChatError>,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Started(PendingTurn),
    /// Nothing to send, or a turn is already in flight.
    Ignored,
    Rejected(ChatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Appended { index: usize },
    Replaced { index: usize },
    /// The user moved on; the reply was written into its own conversation.
    DeliveredToOrigin { conversation: ConversationId },
    Discarded,
    Failed(ChatError),
}

/// Failures of non-chat commands, shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown model '{model}' for {provider}")]
    UnknownModel { provider: Provider, model: String },

    #[error("no message #{0}")]
    NoSuchMessage(usize),

    #[error("message has no code blocks")]
    NoCodeBlocks,

    #[error("clipboard is not available")]
    NoClipboard,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Destination for copied message text.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), PlatformError>;
}

impl ClipboardSink for parley_platform::Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), PlatformError> {
        parley_platform::Clipboard::set_text(self, text)
    }
}
