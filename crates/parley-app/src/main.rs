mod cli;
mod controller;
mod markdown;
mod render;
mod repl;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parley_ai::{ChatError, EnvConnector, Transcriber, WhisperClient, WhisperConfig};
use parley_config::ParleyConfig;
use parley_store::{ConversationDefaults, ConversationStore, FileStore, KeyValueStore, MemoryStore};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::controller::Controller;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- Parley crashed ---");
        eprintln!("Your conversations up to the last message are saved.");
        eprintln!("----------------------\n");
        default_hook(info);
    }));
}

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the environment win.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Ok(dir) = parley_platform::config_dir() {
        candidates.push(dir.join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let line = line.strip_prefix("export ").unwrap_or(line);
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

/// `debug` becomes `parley=debug`; full directives pass through.
fn log_directive(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    if level.contains('=') {
        level
    } else {
        format!("parley={level}")
    }
}

fn env_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter.add_directive(LevelFilter::INFO.into()),
    }
}

fn load_config(path: Option<&str>) -> ParleyConfig {
    let loaded = match path {
        Some(path) => {
            tracing::info!("Using config override: {path}");
            parley_config::load_config_from(Path::new(path))
        }
        None => parley_config::load_config(),
    };
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        ParleyConfig::default()
    })
}

fn open_store(config: &ParleyConfig, ephemeral: bool) -> ConversationStore {
    let backend: Arc<dyn KeyValueStore> = if ephemeral {
        tracing::info!("Ephemeral mode, conversations are not saved");
        Arc::new(MemoryStore::new())
    } else {
        let dir = match config.storage.directory {
            Some(ref dir) => Ok(PathBuf::from(dir)),
            None => parley_platform::store_dir(),
        };
        let opened = dir
            .map_err(|e| e.to_string())
            .and_then(|d| FileStore::open(d).map_err(|e| e.to_string()));
        match opened {
            Ok(store) => {
                tracing::info!("Conversation store at {}", store.root().display());
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!("Conversation store unavailable, keeping chats in memory: {e}");
                Arc::new(MemoryStore::new())
            }
        }
    };

    ConversationStore::new(backend)
        .with_max_messages(config.storage.max_messages)
        .with_defaults(ConversationDefaults {
            title: config.chat.conversation_title.clone(),
            greeting: config.chat.greeting.clone(),
        })
}

fn transcriber(config: &ParleyConfig) -> Result<Arc<dyn Transcriber>, ChatError> {
    let whisper = WhisperConfig::from_env(&config.voice)?;
    match WhisperClient::new(whisper) {
        Ok(client) => Ok(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Voice dictation unavailable: {e}");
            Err(ChatError::UnsupportedCapability(format!(
                "Voice dictation unavailable: {e}"
            )))
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    install_panic_hook();

    let args = cli::parse();

    // Logs go to stderr so they never interleave with the conversation.
    let cli_directive = args.log_level.as_deref().map(log_directive);
    let bootstrap = cli_directive.as_deref().unwrap_or("parley=info");
    let (filter, reload) = tracing_subscriber::reload::Layer::new(env_filter(bootstrap));
    {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref());

    // The config's level applies unless the command line chose one.
    if cli_directive.is_none() {
        let updated = env_filter(config.logging.level.directive());
        if let Err(e) = reload.reload(updated) {
            tracing::warn!("Failed to apply configured log level: {e}");
        }
    }

    if args.no_color || !config.ui.color {
        colored::control::set_override(false);
    }

    if let Err(e) = parley_platform::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    let store = open_store(&config, args.ephemeral);
    let connector = Arc::new(EnvConnector::new(config.providers.clone()));

    let mut controller =
        Controller::start(&config, store, connector).with_transcriber(transcriber(&config));
    match parley_platform::Clipboard::new() {
        Ok(clipboard) => controller = controller.with_clipboard(Box::new(clipboard)),
        Err(e) => tracing::debug!("Clipboard unavailable: {e}"),
    }

    if args.provider.is_some() || args.model.is_some() {
        let provider = args.provider.unwrap_or(controller.provider());
        if let Err(e) = controller.switch_provider(provider, args.model.as_deref()) {
            tracing::warn!("Ignoring --provider/--model: {e}");
        }
    }

    let history = if args.ephemeral {
        None
    } else {
        parley_platform::history_file().ok()
    };

    repl::Repl::new(controller, config.ui.prompt.clone(), history)
        .run()
        .await;
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_are_scoped_to_parley() {
        assert_eq!(log_directive("DEBUG"), "parley=debug");
        assert_eq!(log_directive("warn"), "parley=warn");
        assert_eq!(log_directive("parley_ai=trace"), "parley_ai=trace");
    }

    #[test]
    fn ephemeral_store_starts_empty() {
        let store = open_store(&ParleyConfig::default(), true);
        assert!(store.list_conversations().is_empty());
    }

    #[test]
    fn store_honours_directory_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ParleyConfig::default();
        config.storage.directory = Some(dir.path().join("chats").display().to_string());

        let store = open_store(&config, false);
        let conversation = store.create_new_conversation();
        assert!(dir.path().join("chats").is_dir());
        assert!(store.get_conversation(&conversation.id).is_some());
    }
}
