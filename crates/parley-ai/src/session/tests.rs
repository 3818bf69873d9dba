use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_common::Provider;

use super::ProviderSession;
use crate::{AiError, ChatBackend, ChatError, Connector, Message, Role};

/// Echoes the last user message and records every history it was sent.
#[derive(Default)]
struct EchoBackend {
    calls: Mutex<Vec<(String, Vec<Message>)>>,
    fail: bool,
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, AiError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        if self.fail {
            return Err(AiError::ApiError("HTTP 500: boom".into()));
        }
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(format!("echo: {last}"))
    }
}

struct FakeConnector {
    backend: Option<Arc<EchoBackend>>,
    connects: AtomicUsize,
}

impl FakeConnector {
    fn with(backend: Arc<EchoBackend>) -> Arc<Self> {
        Arc::new(Self {
            backend: Some(backend),
            connects: AtomicUsize::new(0),
        })
    }

    fn without_credentials() -> Arc<Self> {
        Arc::new(Self {
            backend: None,
            connects: AtomicUsize::new(0),
        })
    }
}

impl Connector for FakeConnector {
    fn connect(&self, provider: Provider) -> Result<Arc<dyn ChatBackend>, ChatError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.backend {
            Some(ref b) => Ok(b.clone() as Arc<dyn ChatBackend>),
            None => Err(ChatError::ProviderUnavailable(provider)),
        }
    }

    fn has_credentials(&self, _provider: Provider) -> bool {
        self.backend.is_some()
    }
}

fn session(provider: Provider) -> (ProviderSession, Arc<EchoBackend>, Arc<FakeConnector>) {
    let backend = Arc::new(EchoBackend::default());
    let connector = FakeConnector::with(backend.clone());
    let session = ProviderSession::new(provider, provider.default_model(), connector.clone());
    (session, backend, connector)
}

#[test]
fn reset_chat_without_instruction_is_empty() {
    let (mut s, _, _) = session(Provider::Mistral);
    s.reset_chat();
    assert!(s.history().is_empty());
}

#[test]
fn reset_chat_seeds_single_system_entry() {
    let (s, _, _) = session(Provider::Mistral);
    let mut s = s.with_system_instructions("Be brief.");
    s.reset_chat();
    assert_eq!(s.history(), &[Message::system("Be brief.")]);
}

#[test]
fn blank_instruction_is_not_seeded() {
    let (s, _, _) = session(Provider::Groq);
    let s = s.with_system_instructions("   ");
    assert!(s.history().is_empty());
}

#[tokio::test]
async fn set_model_twice_equals_once() {
    let (mut s, _, _) = session(Provider::Groq);
    s.set_system_instructions("sys");
    s.chat("hi", None).await.unwrap();

    s.set_model("gemma-7b-it");
    let once = s.history().to_vec();
    s.set_model("gemma-7b-it");
    assert_eq!(s.history(), once.as_slice());
    assert_eq!(s.history(), &[Message::system("sys")]);
    assert_eq!(s.model(), "gemma-7b-it");
}

#[tokio::test]
async fn set_system_instructions_twice_equals_once() {
    let (mut s, _, _) = session(Provider::Mistral);
    s.chat("hi", None).await.unwrap();

    s.set_system_instructions("Answer in French.");
    let once = s.history().to_vec();
    s.set_system_instructions("Answer in French.");
    assert_eq!(s.history(), once.as_slice());
    assert_eq!(s.history().len(), 1);
}

#[tokio::test]
async fn chat_appends_user_and_assistant() {
    let (s, backend, _) = session(Provider::Mistral);
    let mut s = s.with_system_instructions("Be brief.");

    let reply = s.chat("Hello", None).await.unwrap();
    assert_eq!(reply, "echo: Hello");

    let roles: Vec<_> = s.history().iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::System, Role::User, Role::Assistant]);

    // the backend saw the system entry and the new user entry
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "mistral-small");
    assert_eq!(calls[0].1.len(), 2);
    assert_eq!(calls[0].1[0].role, Role::System);
}

#[tokio::test]
async fn history_grows_across_turns() {
    let (mut s, backend, _) = session(Provider::Groq);
    s.chat("one", None).await.unwrap();
    s.chat("two", None).await.unwrap();

    assert_eq!(s.history().len(), 4);
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls[1].1.len(), 3);
}

#[tokio::test]
async fn image_on_text_only_provider_is_rejected() {
    let (mut s, backend, connector) = session(Provider::Mistral);
    let err = s
        .chat("what is this", Some("data:image/png;base64,AAAA"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::UnsupportedCapability(_)));
    assert!(s.history().is_empty());
    assert!(backend.calls.lock().unwrap().is_empty());
    assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn image_reaches_gemini_backend() {
    let (mut s, backend, _) = session(Provider::Gemini);
    s.chat("Describe esta imagen en detalle", Some("data:image/png;base64,AAAA"))
        .await
        .unwrap();

    let calls = backend.calls.lock().unwrap();
    assert_eq!(
        calls[0].1[0].image.as_deref(),
        Some("data:image/png;base64,AAAA")
    );
}

#[tokio::test]
async fn missing_credentials_reported_on_first_use() {
    let connector = FakeConnector::without_credentials();
    let mut s = ProviderSession::new(Provider::Groq, "mixtral-8x7b-32768", connector.clone());

    // nothing is resolved until the first chat
    assert_eq!(connector.connects.load(Ordering::SeqCst), 0);

    let err = s.chat("hi", None).await.unwrap_err();
    assert_eq!(err, ChatError::ProviderUnavailable(Provider::Groq));
    assert!(s.history().is_empty());
}

#[tokio::test]
async fn backend_resolved_once() {
    let (mut s, _, connector) = session(Provider::Mistral);
    s.chat("a", None).await.unwrap();
    s.chat("b", None).await.unwrap();
    s.set_model("mistral-tiny");
    s.chat("c", None).await.unwrap();
    assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failure_keeps_user_entry() {
    let backend = Arc::new(EchoBackend {
        fail: true,
        ..Default::default()
    });
    let connector = FakeConnector::with(backend);
    let mut s = ProviderSession::new(Provider::Mistral, "mistral-small", connector);

    let err = s.chat("Hello", None).await.unwrap_err();
    assert_eq!(err, ChatError::ProviderRequestFailed(Provider::Mistral));
    assert_eq!(err.to_string(), "Failed to get response from Mistral");
    assert_eq!(s.history(), &[Message::user("Hello", None)]);
}

#[tokio::test]
async fn shared_session_locks() {
    let (s, _, _) = session(Provider::Gemini);
    let shared = s.into_shared();
    let reply = shared.lock().await.chat("hi", None).await.unwrap();
    assert_eq!(reply, "echo: hi");
    assert_eq!(shared.lock().await.history().len(), 2);
}
