use frame_manager::{FrameError, FrameStore};
use web_sys::Storage;

/// [`FrameStore`] over `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

fn local_storage() -> Result<Storage, FrameError> {
    web_sys::window()
        .ok_or_else(|| FrameError::Storage("no global `window` exists".to_string()))?
        .local_storage()
        .map_err(|e| FrameError::Storage(format!("{e:?}")))?
        .ok_or_else(|| FrameError::Storage("localStorage is unavailable".to_string()))
}

impl FrameStore for LocalStore {
    fn load(&self, key: &str) -> Result<Option<String>, FrameError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| FrameError::Storage(format!("{e:?}")))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), FrameError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| FrameError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), FrameError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| FrameError::Storage(format!("{e:?}")))
    }
}
