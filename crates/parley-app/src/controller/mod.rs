//! Session controller.
//!
//! Owns the active conversation, the provider sessions serving it and
//! the transient UI state (status, banner, pending image, dictation
//! draft). Every user action is a method here; the REPL only renders
//! what the controller exposes.
//!
//! Provider calls run outside the controller in two phases:
//! [`Controller::submit`] hands back a [`PendingTurn`], the caller runs
//! it wherever it likes and feeds the [`TurnResult`] to
//! [`Controller::complete`].

mod attachments;
mod conversations;
mod turn;
mod types;

pub use types::{
    ClipboardSink, CommandError, PendingTurn, Status, SubmitOutcome, Ticket, TurnOutcome,
    TurnResult, TurnTarget,
};

use std::collections::HashMap;
use std::sync::Arc;

use parley_ai::{ChatError, Connector, ProviderSession, SharedSession, Transcriber};
use parley_common::{now_millis, Banner, Provider};
use parley_config::schema::{ChatConfig, ProvidersConfig};
use parley_config::ParleyConfig;
use parley_store::{Conversation, ConversationStore, ConversationSummary, StoreStatus};
use tracing::{debug, info, warn};

pub struct Controller {
    store: ConversationStore,
    connector: Arc<dyn Connector>,
    transcriber: Result<Arc<dyn Transcriber>, ChatError>,
    clipboard: Option<Box<dyn ClipboardSink>>,

    chat: ChatConfig,
    providers: ProvidersConfig,

    active: Conversation,
    /// Sessions serving `active`, created on first use.
    sessions: HashMap<Provider, SharedSession>,
    provider: Provider,
    /// Selected model per provider.
    models: HashMap<Provider, String>,
    global_instructions: String,

    status: Status,
    in_flight: Option<Ticket>,
    next_ticket: u64,
    banner: Option<Banner>,
    pending_image: Option<String>,
    draft: String,
    storage_error: Option<String>,
}

impl Controller {
    /// Open the most recently modified conversation (or a new one) and
    /// warn once about any missing vendor credentials.
    pub fn start(config: &ParleyConfig, store: ConversationStore, connector: Arc<dyn Connector>) -> Self {
        let active = store
            .list_recent()
            .first()
            .and_then(|s| store.get_conversation(&s.id))
            .unwrap_or_else(|| store.create_new_conversation());
        let global_instructions = store.global_instructions();

        let provider = config.chat.default_provider;
        let mut models: HashMap<Provider, String> = Provider::ALL
            .into_iter()
            .map(|p| (p, initial_model(&config.providers, p)))
            .collect();
        if let Some(ref model) = config.chat.default_model {
            if config.providers.get(provider).model_list(provider).contains(model) {
                models.insert(provider, model.clone());
            } else {
                warn!(%provider, %model, "chat.default_model is not offered by the provider, ignoring it");
            }
        }

        let missing: Vec<String> = Provider::ALL
            .into_iter()
            .filter(|p| !connector.has_credentials(*p))
            .map(|p| config.providers.get(p).api_key_env_for(p))
            .collect();
        let banner = if missing.is_empty() {
            None
        } else {
            warn!(missing = %missing.join(", "), "Missing provider credentials");
            Some(Banner::warning(format!(
                "Por favor agrega tus API keys en el archivo .env (missing: {})",
                missing.join(", ")
            )))
        };

        info!(conversation = %active.id, %provider, "Controller started");

        Self {
            store,
            connector,
            transcriber: Err(ChatError::UnsupportedCapability(
                "Voice dictation is not configured".into(),
            )),
            clipboard: None,
            chat: config.chat.clone(),
            providers: config.providers.clone(),
            active,
            sessions: HashMap::new(),
            provider,
            models,
            global_instructions,
            status: Status::Idle,
            in_flight: None,
            next_ticket: 1,
            banner,
            pending_image: None,
            draft: String::new(),
            storage_error: None,
        }
    }

    /// `Err` carries the reason dictation is unavailable.
    pub fn with_transcriber(mut self, transcriber: Result<Arc<dyn Transcriber>, ChatError>) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    // -- read-only views -------------------------------------------------------

    pub fn conversation(&self) -> &Conversation {
        &self.active
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == Status::AwaitingResponse
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        self.model_for(self.provider)
    }

    /// Models offered for `provider`.
    pub fn available_models(&self, provider: Provider) -> Vec<String> {
        self.providers.get(provider).model_list(provider)
    }

    pub fn pending_image(&self) -> Option<&str> {
        self.pending_image.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn global_instructions(&self) -> &str {
        &self.global_instructions
    }

    /// The instruction the active conversation runs with.
    pub fn effective_instructions(&self) -> &str {
        self.active
            .instructions()
            .unwrap_or(self.global_instructions.as_str())
    }

    /// Last write failure, cleared by the next successful write.
    pub fn storage_error(&self) -> Option<&str> {
        self.storage_error.as_deref()
    }

    pub fn list_recent(&self) -> Vec<ConversationSummary> {
        self.store.list_recent()
    }

    // -- internals -------------------------------------------------------------

    fn model_for(&self, provider: Provider) -> &str {
        self.models
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_model())
    }

    /// Session for `provider` serving the active conversation.
    fn session(&mut self, provider: Provider) -> SharedSession {
        if let Some(session) = self.sessions.get(&provider) {
            return session.clone();
        }
        let session = self.new_session(provider);
        self.sessions.insert(provider, session.clone());
        session
    }

    fn new_session(&self, provider: Provider) -> SharedSession {
        debug!(%provider, conversation = %self.active.id, "Creating provider session");
        ProviderSession::new(provider, self.model_for(provider), self.connector.clone())
            .with_system_instructions(self.effective_instructions())
            .into_shared()
    }

    /// Apply `f` to the session for `provider`.
    ///
    /// A session locked by an in-flight turn is left to that turn and
    /// replaced by a fresh one.
    fn update_session(&mut self, provider: Provider, f: impl FnOnce(&mut ProviderSession)) {
        let mut guard = match self.session(provider).try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                debug!(%provider, "Session busy, replacing it");
                let fresh = self.new_session(provider);
                self.sessions.insert(provider, fresh.clone());
                match fresh.try_lock_owned() {
                    Ok(guard) => guard,
                    Err(_) => return,
                }
            }
        };
        f(&mut guard);
    }

    /// Swap in another conversation. Provider sessions start over.
    fn activate(&mut self, conversation: Conversation) {
        debug!(from = %self.active.id, to = %conversation.id, "Switching conversation");
        self.active = conversation;
        self.sessions.clear();
        self.pending_image = None;
    }

    fn persist_active(&mut self) {
        self.active.last_modified = now_millis();
        let status = self.store.save_conversation(&self.active);
        self.record(status);
    }

    fn record(&mut self, status: StoreStatus) {
        self.storage_error = match status {
            StoreStatus::Persisted => None,
            StoreStatus::Failed(e) => Some(e.to_string()),
        };
    }

    fn raise(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }
}

/// The built-in default when the configured list offers it, otherwise the
/// first listed model.
fn initial_model(providers: &ProvidersConfig, provider: Provider) -> String {
    let offered = providers.get(provider).model_list(provider);
    let builtin = provider.default_model();
    if offered.iter().any(|m| m == builtin) {
        return builtin.to_string();
    }
    offered
        .into_iter()
        .next()
        .unwrap_or_else(|| builtin.to_string())
}
