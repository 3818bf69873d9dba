pub mod attachment;
pub mod clipboard;
pub mod paths;

pub use attachment::{encode_data_uri, load_image, DataUri};
pub use clipboard::Clipboard;
pub use paths::{config_dir, data_dir, ensure_dirs, history_file, store_dir};
