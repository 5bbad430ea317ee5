//! Client-side key-value storage of the frame collection.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use shared_types::FrameRecord;

use crate::error::FrameError;

/// Key-value backend the layout is persisted to. The web host implements it
/// over `window.localStorage`.
pub trait FrameStore {
    fn load(&self, key: &str) -> Result<Option<String>, FrameError>;
    fn save(&self, key: &str, value: &str) -> Result<(), FrameError>;
    fn remove(&self, key: &str) -> Result<(), FrameError>;
}

/// In-memory store. Clones share the same entries, so a test can hand one
/// clone to a manager and inspect (or reuse) another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl FrameStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, FrameError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), FrameError> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), FrameError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

pub fn encode_frames(frames: &[FrameRecord]) -> Result<String, FrameError> {
    Ok(serde_json::to_string(frames)?)
}

pub fn decode_frames(raw: &str) -> Result<Vec<FrameRecord>, FrameError> {
    Ok(serde_json::from_str(raw)?)
}

/// Largest z-index kept as-is when restoring; CSS caps z-index at `i32::MAX`.
pub const MAX_Z_INDEX: u32 = 2_000_000_000;

/// Restores the collection invariants on data read back from storage: one
/// record per entity (first wins) and unique z-indices. Duplicates are
/// renumbered from the lowest stored value in their existing stacking order;
/// any value above [`MAX_Z_INDEX`] renumbers the whole stack from
/// `base_z_index` instead.
pub fn sanitize_restored(frames: Vec<FrameRecord>, base_z_index: u32) -> Vec<FrameRecord> {
    let mut seen = HashSet::new();
    let mut frames: Vec<FrameRecord> = frames
        .into_iter()
        .filter(|frame| seen.insert(frame.entity_id.clone()))
        .collect();

    let mut z_values = HashSet::new();
    let has_duplicate_z = frames
        .iter()
        .any(|frame| !z_values.insert(frame.window_state.z_index));
    let out_of_range = frames
        .iter()
        .any(|frame| frame.window_state.z_index > MAX_Z_INDEX);

    if out_of_range {
        renumber_z_order(&mut frames, base_z_index);
    } else if has_duplicate_z {
        let base = frames
            .iter()
            .map(|frame| frame.window_state.z_index)
            .min()
            .unwrap_or(base_z_index);
        renumber_z_order(&mut frames, base);
    }

    frames
}

/// Reassigns consecutive z-indices starting at `base`, keeping the current
/// stacking order (ties broken by position in the collection).
pub fn renumber_z_order(frames: &mut [FrameRecord], base: u32) {
    let mut order: Vec<usize> = (0..frames.len()).collect();
    order.sort_by_key(|&index| (frames[index].window_state.z_index, index));
    for (rank, index) in order.into_iter().enumerate() {
        let rank = u32::try_from(rank).unwrap_or(u32::MAX);
        frames[index].window_state.z_index = base.saturating_add(rank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{FrameId, FramePosition, FrameSize, FrameWindowState};

    fn record(id: &str, entity_id: &str, z_index: u32) -> FrameRecord {
        FrameRecord {
            id: FrameId::from(id),
            entity_id: entity_id.to_string(),
            entity_label: None,
            window_state: FrameWindowState {
                is_maximized: false,
                is_minimized: false,
                is_visible: true,
                position: FramePosition { x: 10, y: 10 },
                size: FrameSize {
                    width: 500,
                    height: 400,
                },
                z_index,
            },
        }
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.save("layout", "[]").unwrap();
        assert_eq!(other.load("layout").unwrap().as_deref(), Some("[]"));

        other.remove("layout").unwrap();
        assert!(!store.contains("layout"));
        assert_eq!(store.load("layout").unwrap(), None);
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        assert!(decode_frames(r#"{"frames": []}"#).is_err());
        assert!(decode_frames("[{\"id\": 3}]").is_err());
        assert!(decode_frames("not json").is_err());
    }

    #[test]
    fn sanitize_keeps_first_record_per_entity() {
        let frames = sanitize_restored(
            vec![
                record("a", "lead-1", 1000),
            record("b", "lead-2", 1001),
                record("c", "lead-1", 1002),
            ],
            1000,
        );
        let ids: Vec<&str> = frames.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn sanitize_renumbers_duplicate_z_in_stacking_order() {
        let frames = sanitize_restored(
            vec![
                record("a", "lead-1", 1005),
                record("b", "lead-2", 1001),
                record("c", "lead-3", 1005),
            ],
            1000,
        );
        let z: Vec<u32> = frames.iter().map(|f| f.window_state.z_index).collect();
        assert_eq!(z, vec![1002, 1001, 1003]);
    }

    #[test]
    fn sanitize_leaves_valid_collection_untouched() {
        let input = vec![record("a", "lead-1", 1003), record("b", "lead-2", 1001)];
        assert_eq!(sanitize_restored(input.clone(), 1000), input);
    }

    #[test]
    fn sanitize_renumbers_oversized_z_from_base() {
        let frames = sanitize_restored(
            vec![
                record("a", "lead-1", u32::MAX),
                record("b", "lead-2", 1001),
                record("c", "lead-3", MAX_Z_INDEX + 1),
            ],
            1000,
        );
        let z: Vec<u32> = frames.iter().map(|f| f.window_state.z_index).collect();
        assert_eq!(z, vec![1002, 1000, 1001]);
    }
}
