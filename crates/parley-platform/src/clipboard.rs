use parley_common::PlatformError;

/// The system clipboard, for `/copy`.
pub struct Clipboard(arboard::Clipboard);

impl Clipboard {
    /// Fails where there is no clipboard to talk to, such as a headless
    /// session without X11 or Wayland.
    pub fn new() -> Result<Self, PlatformError> {
        arboard::Clipboard::new()
            .map(Self)
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), PlatformError> {
        self.0
            .set_text(text)
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }
}
