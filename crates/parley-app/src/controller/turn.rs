//! Sending, regenerating and completing chat turns.

use parley_ai::ChatError;
use parley_common::Banner;
use parley_config::schema::StaleReply;
use parley_store::{ChatMessage, Conversation};
use tracing::{debug, info, warn};

use super::types::{PendingTurn, Status, SubmitOutcome, Ticket, TurnOutcome, TurnResult, TurnTarget};
use super::Controller;

impl Controller {
    /// Append the user's message and start a turn for it.
    ///
    /// With only an image pending, the configured caption is shown and
    /// the configured image prompt is sent.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if self.is_busy() || (text.is_empty() && self.pending_image.is_none()) {
            return SubmitOutcome::Ignored;
        }
        if self.pending_image.is_some() && !self.provider.supports_images() {
            let err = ChatError::images_unsupported();
            self.raise(Banner::error(err.to_string()));
            return SubmitOutcome::Rejected(err);
        }

        self.banner = None;
        self.draft.clear();
        let image = self.pending_image.take();
        let (shown, prompt) = if text.is_empty() {
            (self.chat.image_caption.clone(), self.chat.image_prompt.clone())
        } else {
            (text.to_string(), text.to_string())
        };

        self.active.messages.push(ChatMessage::user(shown, image.clone()));
        self.persist_active();

        SubmitOutcome::Started(self.start_turn(TurnTarget::Append, prompt, image))
    }

    /// Ask again for the bot message at `index`, replacing it in place.
    ///
    /// Only bot messages that remember their request can be regenerated.
    pub fn regenerate(&mut self, index: usize) -> SubmitOutcome {
        if self.is_busy() {
            return SubmitOutcome::Ignored;
        }
        let Some(message) = self.active.messages.get(index).filter(|m| m.can_regenerate()) else {
            debug!(index, "Nothing to regenerate");
            return SubmitOutcome::Ignored;
        };
        let prompt = message.user_message.clone().unwrap_or_default();
        let image = message.user_image_data.clone();

        if image.is_some() && !self.provider.supports_images() {
            let err = ChatError::images_unsupported();
            self.raise(Banner::error(err.to_string()));
            return SubmitOutcome::Rejected(err);
        }

        self.banner = None;
        SubmitOutcome::Started(self.start_turn(TurnTarget::Replace(index), prompt, image))
    }

    fn start_turn(&mut self, target: TurnTarget, prompt: String, image: Option<String>) -> PendingTurn {
        let ticket = Ticket {
            id: self.next_ticket,
            conversation: self.active.id.clone(),
            provider: self.provider,
            target,
            messages_at_start: self.active.messages.len(),
        };
        self.next_ticket += 1;
        self.status = Status::AwaitingResponse;
        self.in_flight = Some(ticket.clone());

        debug!(ticket = ticket.id, provider = %self.provider, ?target, "Turn started");
        PendingTurn {
            ticket,
            session: self.session(self.provider),
            prompt,
            image,
        }
    }

    /// Give up on the in-flight turn when its task died without a result.
    pub fn abandon_turn(&mut self, reason: &str) {
        if let Some(ticket) = self.in_flight.take() {
            warn!(ticket = ticket.id, reason, "Turn abandoned");
            self.status = Status::Idle;
            let err = ChatError::ProviderRequestFailed(ticket.provider);
            self.raise(Banner::error(err.to_string()));
        }
    }

    /// Apply the result of a turn and return to idle.
    pub fn complete(&mut self, result: TurnResult) -> TurnOutcome {
        let TurnResult {
            ticket,
            prompt,
            image,
            reply,
        } = result;

        if self.in_flight.as_ref().map(|t| t.id) != Some(ticket.id) {
            warn!(ticket = ticket.id, "Ignoring result for a turn that is not in flight");
            return TurnOutcome::Discarded;
        }
        self.in_flight = None;
        self.status = Status::Idle;
        self.pending_image = None;

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                self.raise(Banner::error(e.to_string()));
                return TurnOutcome::Failed(e);
            }
        };
        self.banner = None;

        let message = ChatMessage::reply(reply, prompt, image);

        if ticket.conversation == self.active.id {
            let index = apply_reply(&mut self.active, &ticket, message);
            self.persist_active();
            return match ticket.target {
                TurnTarget::Append => TurnOutcome::Appended { index },
                TurnTarget::Replace(_) => TurnOutcome::Replaced { index },
            };
        }

        match self.chat.stale_reply {
            StaleReply::Discard => {
                info!(conversation = %ticket.conversation, "Discarding reply for inactive conversation");
                TurnOutcome::Discarded
            }
            StaleReply::DeliverToOrigin => {
                let Some(mut origin) = self.store.get_conversation(&ticket.conversation) else {
                    info!(conversation = %ticket.conversation, "Origin conversation is gone, dropping reply");
                    return TurnOutcome::Discarded;
                };
                apply_reply(&mut origin, &ticket, message);
                origin.last_modified = parley_common::now_millis();
                let status = self.store.save_conversation(&origin);
                self.record(status);
                info!(conversation = %origin.id, "Delivered reply to its origin conversation");
                TurnOutcome::DeliveredToOrigin {
                    conversation: origin.id,
                }
            }
        }
    }
}

/// Put `message` where the ticket says. Returns the index written.
///
/// A reloaded conversation may have been truncated by the store since
/// the turn started, so replacement indices are shifted by the number
/// of messages dropped from the front. If the target is no longer a
/// regenerable bot message the reply is appended instead.
fn apply_reply(conversation: &mut Conversation, ticket: &Ticket, message: ChatMessage) -> usize {
    if let TurnTarget::Replace(index) = ticket.target {
        let dropped = ticket
            .messages_at_start
            .saturating_sub(conversation.messages.len());
        if let Some(i) = index.checked_sub(dropped) {
            if let Some(slot) = conversation
                .messages
                .get_mut(i)
                .filter(|m| m.can_regenerate())
            {
                slot.text = message.text;
                return i;
            }
        }
        debug!(index, "Regenerate target moved, appending instead");
    }
    conversation.messages.push(message);
    conversation.messages.len() - 1
}
