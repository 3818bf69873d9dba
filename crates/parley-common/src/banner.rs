use std::fmt;

/// Severity of the banner shown above the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Warning,
    Error,
}

/// A non-fatal, user-visible message.
///
/// The banner coexists with the idle/awaiting states of the chat and is
/// cleared by the next successful action.
#[derive(Debug, Clone)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_level() {
        assert_eq!(Banner::warning("b").level, BannerLevel::Warning);
        assert_eq!(Banner::error("c").level, BannerLevel::Error);
    }

    #[test]
    fn display_is_message() {
        let banner = Banner::error("Failed to get response from GROQ");
        assert_eq!(banner.to_string(), "Failed to get response from GROQ");
    }
}
