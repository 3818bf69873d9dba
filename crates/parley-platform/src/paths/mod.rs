mod ensure;
mod resolve;

pub use ensure::ensure_dirs;
pub use resolve::{config_dir, data_dir, history_file, store_dir};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dirs_are_named_parley() {
        for dir in [config_dir().unwrap(), data_dir().unwrap()] {
            assert!(dir.ends_with("parley"), "{dir:?}");
        }
    }

    #[test]
    fn store_dir_is_inside_data_dir() {
        let store = store_dir().unwrap();
        let data = data_dir().unwrap();
        assert!(
            store.starts_with(&data),
            "store_dir should be inside data_dir: store={store:?}, data={data:?}"
        );
        assert_eq!(store.file_name().unwrap().to_str().unwrap(), "store");
    }

    #[test]
    fn history_file_is_inside_data_dir() {
        let history = history_file().unwrap();
        assert!(history.starts_with(data_dir().unwrap()));
    }
}
