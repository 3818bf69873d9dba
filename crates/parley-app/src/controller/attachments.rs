//! Image attachments, voice dictation and copying messages out.

use std::path::Path;

use parley_ai::ChatError;
use parley_common::Banner;
use tracing::{debug, info};

use super::types::CommandError;
use super::Controller;
use crate::markdown;

impl Controller {
    /// Load an image to send with the next message.
    pub fn attach_image(&mut self, path: &Path) -> Result<(), CommandError> {
        if !self.provider.supports_images() {
            let err = ChatError::images_unsupported();
            self.raise(Banner::error(err.to_string()));
            return Err(err.into());
        }
        let data_uri = parley_platform::load_image(path)?;
        info!(path = %path.display(), "Image attached");
        self.pending_image = Some(data_uri);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.pending_image = None;
    }

    /// Transcribe an audio file and append it to the draft.
    ///
    /// Returns the new draft, which the prompt pre-fills.
    pub async fn dictate(&mut self, path: &Path) -> Result<String, CommandError> {
        let transcriber = self.transcriber.clone()?;

        let audio = tokio::fs::read(path)
            .await
            .map_err(|e| CommandError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let transcript = transcriber
            .transcribe(audio, &filename)
            .await
            .map_err(|e| CommandError::Transcription(e.to_string()))?;
        let transcript = transcript.trim();
        debug!(chars = transcript.len(), "Dictation transcribed");

        if !transcript.is_empty() {
            if !self.draft.is_empty() {
                self.draft.push(' ');
            }
            self.draft.push_str(transcript);
        }
        Ok(self.draft.clone())
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Copy message `index` (or just its fenced code) to the clipboard.
    pub fn copy_message(&mut self, index: usize, code_only: bool) -> Result<(), CommandError> {
        let message = self
            .active
            .messages
            .get(index)
            .ok_or(CommandError::NoSuchMessage(index + 1))?;

        let text = if code_only {
            let blocks = markdown::code_blocks(&message.text);
            if blocks.is_empty() {
                return Err(CommandError::NoCodeBlocks);
            }
            blocks
                .iter()
                .map(|b| b.code.trim_end())
                .collect::<Vec<_>>()
                .join("\n\n")
        } else {
            message.text.clone()
        };

        let clipboard = self.clipboard.as_mut().ok_or(CommandError::NoClipboard)?;
        clipboard.set_text(&text)?;
        debug!(index, code_only, "Copied message to clipboard");
        Ok(())
    }
}
