//! Console rendering of the controller's state.
//!
//! Everything here returns `String`s; the REPL decides where they go.
//! Colour is switched off globally through `colored::control`.

use chrono::{Local, TimeZone};
use colored::Colorize;
use parley_common::{Banner, BannerLevel, ConversationId, Provider};
use parley_store::{ChatMessage, Conversation, ConversationSummary};

use crate::controller::{Controller, Status};

pub fn banner(banner: &Banner) -> String {
    match banner.level {
        BannerLevel::Warning => format!("{} {}", "warning:".yellow().bold(), banner.message),
        BannerLevel::Error => format!("{} {}", "error:".red().bold(), banner.message),
    }
}

/// One message, numbered from 1 the way commands address it.
pub fn message(index: usize, message: &ChatMessage) -> String {
    let number = format!("[{}]", index + 1).dimmed();
    let who = if message.is_bot {
        "Bot".green().bold()
    } else {
        "You".blue().bold()
    };

    let mut out = format!("{number} {who}");
    if message.image_data.is_some() {
        out.push_str(&format!(" {}", "[image]".magenta()));
    }
    if message.can_regenerate() {
        out.push_str(&format!(" {}", "(regen)".dimmed()));
    }
    out.push('\n');
    out.push_str(&body(&message.text));
    out
}

/// Message text with fenced code set apart.
fn body(text: &str) -> String {
    let mut out = String::new();
    let mut in_code = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_code = !in_code;
            let lang = line.trim_start().trim_start_matches('`').trim();
            if in_code && !lang.is_empty() {
                out.push_str(&format!("  {}\n", format!("── {lang} ──").dimmed()));
            } else {
                out.push_str(&format!("  {}\n", "──".dimmed()));
            }
            continue;
        }
        if in_code {
            out.push_str(&format!("  {}\n", line.yellow()));
        } else {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

pub fn conversation(conversation: &Conversation) -> String {
    let mut out = format!("{}\n\n", conversation.title.cyan().bold());
    for (i, m) in conversation.messages.iter().enumerate() {
        out.push_str(&message(i, m));
        out.push('\n');
    }
    out
}

pub fn conversation_list(list: &[ConversationSummary], active: &ConversationId) -> String {
    if list.is_empty() {
        return "No saved conversations.\n".to_string();
    }
    let mut out = String::new();
    for (i, summary) in list.iter().enumerate() {
        let marker = if summary.id == *active { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:>2}. {}  {}\n",
            i + 1,
            summary.title,
            timestamp(summary.last_modified).dimmed()
        ));
    }
    out
}

fn timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn status(controller: &Controller) -> String {
    let conv = controller.conversation();
    let state = match controller.status() {
        Status::Idle => "idle".green(),
        Status::AwaitingResponse => "waiting for reply".yellow(),
    };
    let mut out = format!(
        "{} {} ({})\n{} {}\n{} {} messages\n{} {}\n",
        "provider:".cyan(),
        controller.provider(),
        controller.model(),
        "conversation:".cyan(),
        conv.title,
        "history:".cyan(),
        conv.messages.len(),
        "state:".cyan(),
        state,
    );

    let instructions = controller.effective_instructions();
    if !instructions.is_empty() {
        out.push_str(&format!("{} {}\n", "system:".cyan(), instructions));
    }
    if controller.pending_image().is_some() {
        out.push_str(&format!("{} attached\n", "image:".cyan()));
    }
    if let Some(err) = controller.storage_error() {
        out.push_str(&format!("{} {}\n", "storage:".red(), err));
    }
    out
}

/// The active conversation's instruction and the global default.
pub fn instructions(controller: &Controller) -> String {
    let show = |text: &str| {
        if text.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            text.to_string()
        }
    };
    let own = controller
        .conversation()
        .instructions()
        .unwrap_or_default();
    format!(
        "{} {}\n{} {}\n",
        "conversation:".cyan(),
        show(own),
        "global:".cyan(),
        show(controller.global_instructions()),
    )
}

/// Confirmation for `/system`. `applies` is the instruction the
/// conversation runs with afterwards.
pub fn system_updated(global: bool, cleared: bool, applies: &str) -> String {
    let scope = if global {
        "global and conversation"
    } else {
        "conversation"
    };
    let line = match (cleared, applies.is_empty()) {
        (false, _) => format!("Set {scope} instructions."),
        (true, true) => format!("Cleared {scope} instructions."),
        (true, false) => format!(
            "Cleared {scope} instructions. The global instruction applies: {applies}"
        ),
    };
    line.dimmed().to_string()
}

pub fn models(controller: &Controller) -> String {
    let mut out = String::new();
    for provider in Provider::ALL {
        let active = provider == controller.provider();
        let name = if active {
            provider.display_name().bold().to_string()
        } else {
            provider.display_name().to_string()
        };
        let images = if provider.supports_images() {
            " (images)"
        } else {
            ""
        };
        out.push_str(&format!("{name} [{}]{images}\n", provider.id()));
        for model in controller.available_models(provider) {
            let current = active && model == controller.model();
            let marker = if current { "*" } else { "-" };
            out.push_str(&format!("  {marker} {model}\n"));
        }
    }
    out
}

pub fn help() -> String {
    let rows = [
        ("/new", "start a new conversation"),
        ("/list", "list saved conversations"),
        ("/open <n|id>", "open a conversation from /list"),
        ("/delete [n|id]", "delete a conversation (default: current)"),
        ("/rename [n|id] <title>", "rename a conversation (default: current)"),
        ("/provider <name> [model]", "switch provider (gemini, mistral, groq)"),
        ("/model <name>", "switch model of the current provider"),
        ("/models", "list providers and models"),
        ("/system", "show system instructions"),
        ("/system [--global] <text>", "set system instructions"),
        ("/system [--global] --clear", "clear system instructions"),
        ("/image <path>", "attach an image to the next message"),
        ("/image clear", "drop the attached image"),
        ("/voice <path>", "transcribe an audio file into the prompt"),
        ("/regen [n]", "regenerate reply n (default: last)"),
        ("/copy [n] [code]", "copy reply n (or its code) to the clipboard"),
        ("/history", "show the current conversation"),
        ("/status", "show provider, model and state"),
        ("/quit", "exit"),
    ];
    let mut out = format!("{}\n", "Commands:".cyan().bold());
    for (cmd, what) in rows {
        out.push_str(&format!("  {:<28} {what}\n", cmd));
    }
    out
}

pub fn thinking(provider: Provider) -> String {
    format!("{provider} is thinking...").dimmed().to_string()
}
