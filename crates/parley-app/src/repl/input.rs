//! Line editor on its own thread.
//!
//! rustyline blocks, so it runs on a plain thread and talks to the async
//! loop over channels: the loop asks for a line (with the text to
//! pre-fill) and the thread answers with an [`InputEvent`].

use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::commands::COMMAND_NAMES;

#[derive(Debug)]
pub enum InputEvent {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D or closed stdin.
    Eof,
    Failed(String),
}

/// Slash-command completion and hints.
struct CommandHelper;

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, Vec::new()));
        }
        let candidates = COMMAND_NAMES
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMAND_NAMES
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

/// Handle to the editor thread.
pub struct LineReader {
    requests: std_mpsc::Sender<String>,
    events: mpsc::UnboundedReceiver<InputEvent>,
    thread: JoinHandle<()>,
}

impl LineReader {
    pub fn spawn(prompt: String, history: Option<PathBuf>) -> Self {
        let (request_tx, request_rx) = std_mpsc::channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let thread = std::thread::spawn(move || {
            read_lines(&prompt, history, request_rx, event_tx);
        });

        Self {
            requests: request_tx,
            events: event_rx,
            thread,
        }
    }

    /// Show the prompt, pre-filled with `initial`.
    pub fn request(&self, initial: &str) {
        if self.requests.send(initial.to_string()).is_err() {
            debug!("Line editor thread has exited");
        }
    }

    /// Next event, or `None` once the editor thread is gone.
    pub async fn next(&mut self) -> Option<InputEvent> {
        self.events.recv().await
    }

    /// Stop the editor thread and wait for it to save history.
    ///
    /// Only call this while no prompt is showing.
    pub fn shutdown(self) {
        drop(self.requests);
        if self.thread.join().is_err() {
            warn!("Line editor thread panicked");
        }
    }
}

fn read_lines(
    prompt: &str,
    history: Option<PathBuf>,
    requests: std_mpsc::Receiver<String>,
    events: mpsc::UnboundedSender<InputEvent>,
) {
    let mut editor: Editor<CommandHelper, FileHistory> = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = events.send(InputEvent::Failed(e.to_string()));
            return;
        }
    };
    editor.set_helper(Some(CommandHelper));

    if let Some(ref path) = history {
        if let Err(e) = editor.load_history(path) {
            debug!(path = %path.display(), error = %e, "No prompt history loaded");
        }
    }

    while let Ok(initial) = requests.recv() {
        let event = match editor.readline_with_initial(prompt, (&initial, "")) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                InputEvent::Line(line)
            }
            Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
            Err(ReadlineError::Eof) => InputEvent::Eof,
            Err(e) => InputEvent::Failed(e.to_string()),
        };
        if events.send(event).is_err() {
            break;
        }
    }

    if let Some(ref path) = history {
        if let Err(e) = editor.save_history(path) {
            warn!(path = %path.display(), error = %e, "Failed to save prompt history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;

    #[test]
    fn completes_slash_commands() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = CommandHelper.complete("/mo", 3, &ctx).unwrap();
        assert_eq!(start, 0);
        let names: Vec<_> = pairs.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(names, ["/model", "/models"]);
    }

    #[test]
    fn no_completion_for_chat_text() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (_, pairs) = CommandHelper.complete("hello", 5, &ctx).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn hints_rest_of_command() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        assert_eq!(CommandHelper.hint("/hist", 5, &ctx).as_deref(), Some("ory"));
        assert_eq!(CommandHelper.hint("/quit", 5, &ctx), None);
    }
}
