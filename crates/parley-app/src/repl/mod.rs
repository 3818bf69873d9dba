//! Interactive loop: reads lines, drives the controller, prints results.
//!
//! The prompt stays live while a reply is outstanding, so the user can
//! browse or switch conversations. Replies are awaited alongside input
//! with `tokio::select!`.

pub mod commands;
mod input;

use std::path::PathBuf;

use colored::Colorize;
use parley_common::ConversationId;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

use crate::controller::{Controller, SubmitOutcome, TurnOutcome, TurnResult};
use crate::render;
use commands::{Command, ConversationRef, Input};
use input::{InputEvent, LineReader};

enum Flow {
    Continue,
    Quit,
}

enum Event {
    Input(Option<InputEvent>),
    TurnDone(Result<TurnResult, JoinError>),
}

pub struct Repl {
    controller: Controller,
    prompt: String,
    history: Option<PathBuf>,
    turn: Option<JoinHandle<TurnResult>>,
}

impl Repl {
    pub fn new(controller: Controller, prompt: impl Into<String>, history: Option<PathBuf>) -> Self {
        Self {
            controller,
            prompt: prompt.into(),
            history,
            turn: None,
        }
    }

    pub async fn run(mut self) {
        self.print_welcome();

        let mut reader = LineReader::spawn(self.prompt.clone(), self.history.clone());
        reader.request(self.controller.draft());

        loop {
            let event = tokio::select! {
                input = reader.next() => Event::Input(input),
                done = wait_for(&mut self.turn) => Event::TurnDone(done),
            };

            match event {
                Event::TurnDone(done) => {
                    self.turn = None;
                    self.finish_turn(done);
                }
                Event::Input(None) | Event::Input(Some(InputEvent::Eof)) => break,
                Event::Input(Some(InputEvent::Failed(e))) => {
                    error!(error = %e, "Line editor failed");
                    break;
                }
                Event::Input(Some(InputEvent::Interrupted)) => {
                    self.controller.clear_draft();
                    println!("{}", "(use /quit to exit)".dimmed());
                    reader.request("");
                }
                Event::Input(Some(InputEvent::Line(line))) => {
                    if let Flow::Quit = self.handle_line(&line).await {
                        break;
                    }
                    reader.request(self.controller.draft());
                }
            }
        }

        if let Some(turn) = self.turn.take() {
            debug!("Abandoning reply still in flight");
            turn.abort();
        }
        reader.shutdown();
        println!("{}", "Bye!".green());
    }

    fn print_welcome(&self) {
        println!("{}", "Parley".cyan().bold());
        println!("{}", "Type a message, or /help for commands.".dimmed());
        println!();
        if let Some(banner) = self.controller.banner() {
            println!("{}\n", render::banner(banner));
        }
        print!("{}", render::conversation(self.controller.conversation()));
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        match commands::parse(line) {
            Ok(Input::Empty) => Flow::Continue,
            Ok(Input::Chat(text)) => {
                let outcome = self.controller.submit(&text);
                self.start(outcome);
                Flow::Continue
            }
            Ok(Input::Command(command)) => self.run_command(command).await,
            Err(e) => {
                println!("{}", e.to_string().red());
                Flow::Continue
            }
        }
    }

    async fn run_command(&mut self, command: Command) -> Flow {
        let c = &mut self.controller;
        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => print!("{}", render::help()),
            Command::New => {
                c.new_conversation();
                print!("{}", render::conversation(c.conversation()));
            }
            Command::List => {
                print!(
                    "{}",
                    render::conversation_list(&c.list_recent(), &c.conversation().id)
                );
            }
            Command::Open(target) => match resolve(c, &target) {
                Some(id) if c.select_conversation(&id) => {
                    print!("{}", render::conversation(c.conversation()));
                }
                _ => println!("{}", "no such conversation".red()),
            },
            Command::Delete(target) => {
                let id = match target {
                    None => Some(c.conversation().id.clone()),
                    Some(target) => resolve(c, &target),
                };
                match id {
                    Some(id) => {
                        let was_active = id == c.conversation().id;
                        c.delete_conversation(&id);
                        println!("{}", "Conversation deleted.".dimmed());
                        if was_active {
                            print!("{}", render::conversation(c.conversation()));
                        }
                    }
                    None => println!("{}", "no such conversation".red()),
                }
            }
            Command::Rename { target, title } => {
                let id = match target {
                    None => Some(c.conversation().id.clone()),
                    Some(target) => resolve(c, &target),
                };
                match id {
                    Some(id) if c.rename_conversation(&id, &title) => {
                        println!("{} {}", "Renamed to".dimmed(), title);
                    }
                    _ => println!("{}", "no such conversation".red()),
                }
            }
            Command::Provider { provider, model } => {
                match c.switch_provider(provider, model.as_deref()) {
                    Ok(()) => println!("{} {} ({})", "Using".dimmed(), provider, c.model()),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Command::Model(model) => match c.set_model(&model) {
                Ok(()) => println!("{} {} ({})", "Using".dimmed(), c.provider(), c.model()),
                Err(e) => println!("{}", e.to_string().red()),
            },
            Command::Models => print!("{}", render::models(c)),
            Command::ShowSystem => print!("{}", render::instructions(c)),
            Command::System { text, global } => {
                c.set_system_instructions(&text, global);
                println!(
                    "{}",
                    render::system_updated(global, text.is_empty(), c.effective_instructions())
                );
            }
            Command::Image(path) => match c.attach_image(&path) {
                Ok(()) => println!(
                    "{}",
                    "Image attached. Send a message (or just press enter).".dimmed()
                ),
                Err(e) => println!("{}", e.to_string().red()),
            },
            Command::ClearImage => {
                c.clear_image();
                println!("{}", "Image removed.".dimmed());
            }
            Command::Voice(path) => match c.dictate(&path).await {
                Ok(_) => println!("{}", "Transcribed. Edit the prompt and press enter.".dimmed()),
                Err(e) => println!("{}", e.to_string().red()),
            },
            Command::Regen(n) => {
                let index = n.or_else(|| last_regenerable(c));
                match index {
                    Some(index) => {
                        let outcome = c.regenerate(index);
                        self.start(outcome);
                    }
                    None => println!("{}", "nothing to regenerate".red()),
                }
            }
            Command::Copy { index, code_only } => {
                let Some(index) = index.or_else(|| last_reply(c)) else {
                    println!("{}", "nothing to copy".red());
                    return Flow::Continue;
                };
                match c.copy_message(index, code_only) {
                    Ok(()) => println!("{}", "Copied.".dimmed()),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Command::History => print!("{}", render::conversation(c.conversation())),
            Command::Status => print!("{}", render::status(c)),
        }
        Flow::Continue
    }

    fn start(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Started(turn) => {
                debug!(ticket = turn.ticket().id, "Spawning turn");
                println!("{}", render::thinking(self.controller.provider()));
                self.turn = Some(tokio::spawn(turn.run()));
            }
            SubmitOutcome::Ignored => {
                if self.controller.is_busy() {
                    println!("{}", "Still waiting for the last reply.".dimmed());
                }
            }
            SubmitOutcome::Rejected(e) => println!("{}", e.to_string().red()),
        }
    }

    fn finish_turn(&mut self, done: Result<TurnResult, JoinError>) {
        let result = match done {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Turn task failed");
                self.controller.abandon_turn(&e.to_string());
                if let Some(banner) = self.controller.banner() {
                    println!("{}", render::banner(banner));
                }
                return;
            }
        };

        let outcome = self.controller.complete(result);
        let c = &self.controller;
        match outcome {
            TurnOutcome::Appended { index } | TurnOutcome::Replaced { index } => {
                if let Some(message) = c.conversation().messages.get(index) {
                    print!("{}", render::message(index, message));
                }
            }
            TurnOutcome::DeliveredToOrigin { conversation } => {
                info!(%conversation, "Reply delivered to an inactive conversation");
                println!(
                    "{}",
                    "A reply arrived for another conversation and was saved there.".dimmed()
                );
            }
            TurnOutcome::Discarded => {
                println!("{}", "A reply for another conversation was discarded.".dimmed());
            }
            TurnOutcome::Failed(_) => {
                if let Some(banner) = c.banner() {
                    println!("{}", render::banner(banner));
                }
            }
        }
        if let Some(err) = c.storage_error() {
            println!("{} {}", "storage:".red(), err);
        }
    }
}

/// Resolves when the in-flight turn does; never resolves without one.
async fn wait_for(turn: &mut Option<JoinHandle<TurnResult>>) -> Result<TurnResult, JoinError> {
    match turn {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Id of the conversation `target` names, if it exists.
fn resolve(c: &Controller, target: &ConversationRef) -> Option<ConversationId> {
    let recent = c.list_recent();
    match target {
        ConversationRef::Index(n) => recent.get(*n).map(|s| s.id.clone()),
        ConversationRef::Id(id) => recent
            .into_iter()
            .find(|s| s.id.as_str() == id.as_str())
            .map(|s| s.id),
    }
}

fn last_regenerable(c: &Controller) -> Option<usize> {
    c.conversation()
        .messages
        .iter()
        .rposition(|m| m.can_regenerate())
}

fn last_reply(c: &Controller) -> Option<usize> {
    c.conversation().messages.iter().rposition(|m| m.is_bot)
}
