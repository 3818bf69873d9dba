pub mod banner;
pub mod errors;
pub mod id;
pub mod provider;

pub use banner::{Banner, BannerLevel};
pub use errors::{ConfigError, PlatformError, StorageError};
pub use id::{new_id, now_millis, ConversationId};
pub use provider::Provider;
