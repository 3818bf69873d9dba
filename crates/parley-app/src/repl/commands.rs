//! Slash-command parsing.

use std::path::PathBuf;

use parley_common::Provider;

/// Every command name, for completion.
pub const COMMAND_NAMES: &[&str] = &[
    "/help", "/new", "/list", "/open", "/delete", "/rename", "/provider", "/model", "/models",
    "/system", "/image", "/voice", "/regen", "/copy", "/history", "/status", "/quit",
];

/// A conversation named by its position in `/list` or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationRef {
    /// Zero-based.
    Index(usize),
    Id(String),
}

/// A parsed slash command. Message and list indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    New,
    List,
    Open(ConversationRef),
    /// `None` is the active conversation.
    Delete(Option<ConversationRef>),
    Rename {
        target: Option<ConversationRef>,
        title: String,
    },
    Provider {
        provider: Provider,
        model: Option<String>,
    },
    Model(String),
    Models,
    ShowSystem,
    /// Empty text clears the instruction.
    System {
        text: String,
        global: bool,
    },
    Image(PathBuf),
    ClearImage,
    Voice(PathBuf),
    /// `None` is the latest regenerable reply.
    Regen(Option<usize>),
    Copy {
        index: Option<usize>,
        code_only: bool,
    },
    History,
    Status,
    Quit,
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Chat(String),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}', try /help")]
    UnknownCommand(String),

    #[error("{command} needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("{command}: '{value}' is not valid")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

/// Classify a line. Lines starting with `/` are commands, everything
/// else is chat text.
pub fn parse(line: &str) -> Result<Input, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    if !line.starts_with('/') {
        return Ok(Input::Chat(line.to_string()));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "/help" | "/h" | "/?" => Command::Help,
        "/new" => Command::New,
        "/list" | "/ls" => Command::List,
        "/open" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "/open",
                    what: "a number or id",
                });
            }
            Command::Open(conversation_ref("/open", rest)?)
        }
        "/delete" | "/rm" => match rest {
            "" => Command::Delete(None),
            target => Command::Delete(Some(conversation_ref("/delete", target)?)),
        },
        "/rename" => parse_rename(rest)?,
        "/provider" => {
            let mut parts = rest.split_whitespace();
            let Some(name) = parts.next() else {
                return Err(ParseError::MissingArgument {
                    command: "/provider",
                    what: "a provider name",
                });
            };
            let provider = name.parse().map_err(|_| ParseError::InvalidArgument {
                command: "/provider",
                value: name.to_string(),
            })?;
            Command::Provider {
                provider,
                model: parts.next().map(str::to_string),
            }
        }
        "/model" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "/model",
                    what: "a model name",
                });
            }
            Command::Model(rest.to_string())
        }
        "/models" => Command::Models,
        "/system" => {
            let (global, text) = match rest.strip_prefix("--global") {
                Some(text) => (true, text.trim()),
                None => (false, rest),
            };
            match text {
                "" if !global => Command::ShowSystem,
                "--clear" | "" => Command::System {
                    text: String::new(),
                    global,
                },
                text => Command::System {
                    text: text.to_string(),
                    global,
                },
            }
        }
        "/image" | "/img" => match rest {
            "" => {
                return Err(ParseError::MissingArgument {
                    command: "/image",
                    what: "a file path",
                })
            }
            "clear" => Command::ClearImage,
            path => Command::Image(PathBuf::from(path)),
        },
        "/voice" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "/voice",
                    what: "an audio file path",
                });
            }
            Command::Voice(PathBuf::from(rest))
        }
        "/regen" | "/retry" => Command::Regen(optional_index("/regen", rest)?),
        "/copy" => {
            let mut index = None;
            let mut code_only = false;
            for arg in rest.split_whitespace() {
                if arg == "--code" || arg == "code" {
                    code_only = true;
                } else {
                    index = Some(parse_index("/copy", arg)?);
                }
            }
            Command::Copy { index, code_only }
        }
        "/history" => Command::History,
        "/status" => Command::Status,
        "/quit" | "/exit" | "/q" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Input::Command(command))
}

/// `/rename [n|id] <title>`. Without a leading number or id the whole
/// argument is the new title of the active conversation.
fn parse_rename(rest: &str) -> Result<Command, ParseError> {
    let missing = ParseError::MissingArgument {
        command: "/rename",
        what: "a title",
    };
    if rest.is_empty() {
        return Err(missing);
    }
    if let Some((first, title)) = rest.split_once(char::is_whitespace) {
        if first.parse::<usize>().is_ok() || looks_like_id(first) {
            if title.trim().is_empty() {
                return Err(missing);
            }
            return Ok(Command::Rename {
                target: Some(conversation_ref("/rename", first)?),
                title: title.trim().to_string(),
            });
        }
    }
    Ok(Command::Rename {
        target: None,
        title: rest.to_string(),
    })
}

fn conversation_ref(command: &'static str, arg: &str) -> Result<ConversationRef, ParseError> {
    if arg.chars().all(|c| c.is_ascii_digit()) {
        parse_index(command, arg).map(ConversationRef::Index)
    } else if arg.contains(char::is_whitespace) {
        Err(ParseError::InvalidArgument {
            command,
            value: arg.to_string(),
        })
    } else {
        Ok(ConversationRef::Id(arg.to_string()))
    }
}

/// Conversation ids are hyphenated UUIDs.
fn looks_like_id(s: &str) -> bool {
    s.len() == 36
        && s.chars().filter(|c| *c == '-').count() == 4
        && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn optional_index(command: &'static str, arg: &str) -> Result<Option<usize>, ParseError> {
    if arg.is_empty() {
        return Ok(None);
    }
    parse_index(command, arg).map(Some)
}

/// Users count from 1.
fn parse_index(command: &'static str, arg: &str) -> Result<usize, ParseError> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ParseError::InvalidArgument {
            command,
            value: arg.to_string(),
        }),
    }
}
