//! Validation for the chat, storage and voice sections.

use crate::schema::ParleyConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(super) fn validate_chat(errors: &mut Vec<String>, config: &ParleyConfig) {
    let chat = &config.chat;
    validate_not_blank(errors, "chat.conversation_title", &chat.conversation_title);
    validate_not_blank(errors, "chat.greeting", &chat.greeting);
    validate_not_blank(errors, "chat.image_prompt", &chat.image_prompt);

    if let Some(ref model) = chat.default_model {
        validate_not_blank(errors, "chat.default_model", model);
    }
}

pub(super) fn validate_storage(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_range(
        errors,
        "storage.max_messages",
        config.storage.max_messages as u64,
        1,
        10_000,
    );
    if let Some(ref dir) = config.storage.directory {
        validate_not_blank(errors, "storage.directory", dir);
    }
}

pub(super) fn validate_voice(errors: &mut Vec<String>, config: &ParleyConfig) {
    if config.voice.enabled {
        validate_not_blank(errors, "voice.model", &config.voice.model);
        validate_not_blank(errors, "voice.api_key_env", &config.voice.api_key_env);
    }
}
