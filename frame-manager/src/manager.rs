//! FrameManager - owns the floating frame collection
//!
//! One instance per application, handed to the UI tree through a context
//! provider. Every operation that changes the collection persists it; pointer
//! moves inside a drag/resize gesture are flushed once the gesture ends.

use std::collections::HashMap;

use shared_types::{FrameId, FrameRecord, FrameWindowState};

use crate::config::FrameManagerConfig;
use crate::context::HostContext;
use crate::error::FrameError;
use crate::geometry::{
    clamp_bounds, fit_bounds, resize_bounds, staggered_position, tray_position, tray_size,
    Bounds, Point, ResizeDirection, Viewport,
};
use crate::interaction::{InteractionPhase, InteractionSession};
use crate::storage::{
    decode_frames, encode_frames, renumber_z_order, sanitize_restored, FrameStore, MAX_Z_INDEX,
};

/// Result of [`FrameManager::open`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new frame was added to the collection
    Created(FrameId),
    /// The entity already had a frame; it was brought to front
    Focused(FrameId),
    /// Running embedded: the host should navigate its top-level view instead
    NavigateTop { url: String },
}

pub struct FrameManager<S: FrameStore> {
    config: FrameManagerConfig,
    context: HostContext,
    store: S,
    viewport: Viewport,
    frames: Vec<FrameRecord>,
    active_frame_id: Option<FrameId>,
    next_z_index: u32,
    /// Normal geometry saved before maximize/minimize, keyed by frame id
    restore_bounds: HashMap<FrameId, Bounds>,
    sessions: HashMap<FrameId, InteractionSession>,
}

impl<S: FrameStore> FrameManager<S> {
    /// Builds the manager and restores the persisted layout unless `context`
    /// is embedded.
    pub fn new(
        config: FrameManagerConfig,
        context: HostContext,
        store: S,
        viewport: Viewport,
    ) -> Self {
        let next_z_index = config.base_z_index;
        let mut manager = Self {
            config,
            context,
            store,
            viewport,
            frames: Vec::new(),
            active_frame_id: None,
            next_z_index,
            restore_bounds: HashMap::new(),
            sessions: HashMap::new(),
        };
        manager.restore();
        manager
    }

    fn restore(&mut self) {
        let key = self.config.storage_key.clone();
        if self.context.is_embedded() {
            tracing::debug!(storage_key = %key, "Embedded context, skipping layout restore");
            return;
        }

        let raw = match self.store.load(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(storage_key = %key, error = %e, "Failed to read frame layout");
                return;
            }
        };

        let frames = match decode_frames(&raw) {
            Ok(frames) => sanitize_restored(frames, self.config.base_z_index),
            Err(e) => {
                tracing::warn!(
                    storage_key = %key,
                    error = %e,
                    "Discarding corrupt frame layout"
                );
                if let Err(e) = self.store.remove(&key) {
                    tracing::warn!(storage_key = %key, error = %e, "Failed to clear frame layout");
                }
                return;
            }
        };

        if let Some(max_z) = frames.iter().map(|f| f.window_state.z_index).max() {
            self.next_z_index = self.next_z_index.max(max_z.saturating_add(1));
        }
        self.active_frame_id = frames.last().map(|f| f.id.clone());
        self.frames = frames;
        let refitted = self.refit_frames();

        tracing::info!(
            storage_key = %key,
            frames = self.frames.len(),
            refitted,
            "Restored frame layout"
        );

        if refitted || self.frames.is_empty() {
            self.persist();
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn frame(&self, id: &FrameId) -> Option<&FrameRecord> {
        self.frames.iter().find(|f| &f.id == id)
    }

    pub fn frame_for_entity(&self, entity_id: &str) -> Option<&FrameRecord> {
        self.frames.iter().find(|f| f.entity_id == entity_id)
    }

    pub fn active_frame_id(&self) -> Option<&FrameId> {
        self.active_frame_id.as_ref()
    }

    pub fn is_active(&self, id: &FrameId) -> bool {
        self.active_frame_id.as_ref() == Some(id)
    }

    /// Active and stacked above every other frame.
    pub fn is_frontmost(&self, id: &FrameId) -> bool {
        let Some(frame) = self.frame(id) else {
            return false;
        };
        self.is_active(id)
            && self
                .frames
                .iter()
                .all(|f| &f.id == id || f.window_state.z_index < frame.window_state.z_index)
    }

    pub fn config(&self) -> &FrameManagerConfig {
        &self.config
    }

    pub fn context(&self) -> HostContext {
        self.context
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Geometry a maximized/minimized frame returns to, if one was saved.
    pub fn restore_bounds(&self, id: &FrameId) -> Option<Bounds> {
        self.restore_bounds.get(id).copied()
    }

    pub fn interaction_phase(&self, id: &FrameId) -> InteractionPhase {
        self.sessions
            .get(id)
            .map(InteractionSession::phase)
            .unwrap_or(InteractionPhase::Idle)
    }

    pub fn details_url(&self, entity_id: &str) -> String {
        self.config.details_url(entity_id)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Opens (or re-focuses) the frame showing `entity_id`. This is the only
    /// operation that grows the collection.
    pub fn open(&mut self, entity_id: &str, label: Option<&str>) -> OpenOutcome {
        if self.context.is_embedded() {
            let url = self.details_url(entity_id);
            tracing::info!(entity_id, url = %url, "Embedded context, delegating open to top view");
            return OpenOutcome::NavigateTop { url };
        }

        if let Some(index) = self.frames.iter().position(|f| f.entity_id == entity_id) {
            let id = self.frames[index].id.clone();
            let was_minimized = self.frames[index].window_state.is_minimized;
            {
                let frame = &mut self.frames[index];
                if let Some(label) = label {
                    frame.entity_label = Some(label.to_string());
                }
                frame.window_state.is_visible = true;
                frame.window_state.is_minimized = false;
            }
            if was_minimized {
                let bounds = self.take_restore_bounds(&id);
                bounds.apply_to(&mut self.frames[index].window_state);
            }
            self.raise(index);
            self.persist();
            tracing::debug!(frame_id = %id, entity_id, "Focused existing frame");
            return OpenOutcome::Focused(id);
        }

        let origin = staggered_position(self.frames.len(), &self.config);
        let bounds = fit_bounds(
            Bounds::new(origin, self.config.default_size),
            self.viewport,
            &self.config,
        );
        let id = FrameId::new();
        let z_index = self.take_next_z();
        self.frames.push(FrameRecord {
            id: id.clone(),
            entity_id: entity_id.to_string(),
            entity_label: label.map(str::to_string),
            window_state: FrameWindowState {
                is_maximized: false,
                is_minimized: false,
                is_visible: true,
                position: bounds.position(),
                size: bounds.size(),
                z_index,
            },
        });
        self.active_frame_id = Some(id.clone());
        self.persist();

        tracing::info!(frame_id = %id, entity_id, z_index, "Opened frame");
        OpenOutcome::Created(id)
    }

    pub fn close(&mut self, id: &FrameId) -> Result<(), FrameError> {
        let index = self.index_of(id)?;
        self.frames.remove(index);
        self.restore_bounds.remove(id);
        self.sessions.remove(id);

        if self.active_frame_id.as_ref() == Some(id) {
            self.active_frame_id = self.frames.last().map(|f| f.id.clone());
        }
        self.persist();

        tracing::info!(frame_id = %id, remaining = self.frames.len(), "Closed frame");
        Ok(())
    }

    /// Brings the frame to front and makes it active. Geometry is untouched.
    pub fn focus(&mut self, id: &FrameId) -> Result<(), FrameError> {
        let index = self.index_of(id)?;
        self.raise(index);
        self.persist();
        Ok(())
    }

    /// Toggles between full-viewport and the saved normal geometry.
    pub fn maximize(&mut self, id: &FrameId) -> Result<(), FrameError> {
        let index = self.index_of(id)?;
        self.sessions.remove(id);

        let state = self.frames[index].window_state.clone();
        if !state.is_maximized {
            if !state.is_minimized {
                self.restore_bounds.insert(id.clone(), Bounds::of(&state));
            }
            let full = self.full_viewport_bounds();
            let state = &mut self.frames[index].window_state;
            state.is_maximized = true;
            state.is_minimized = false;
            full.apply_to(state);
            tracing::debug!(frame_id = %id, "Maximized frame");
        } else {
            let bounds = clamp_bounds(self.take_restore_bounds(id), self.viewport, &self.config);
            let state = &mut self.frames[index].window_state;
            state.is_maximized = false;
            bounds.apply_to(state);
            tracing::debug!(frame_id = %id, "Restored maximized frame");
        }

        self.raise(index);
        self.persist();
        Ok(())
    }

    /// Toggles between a tray strip and the saved normal geometry.
    pub fn minimize(&mut self, id: &FrameId) -> Result<(), FrameError> {
        let index = self.index_of(id)?;
        self.sessions.remove(id);

        let state = self.frames[index].window_state.clone();
        if !state.is_minimized {
            if !state.is_maximized {
                self.restore_bounds.insert(id.clone(), Bounds::of(&state));
            }
            let slot = self
                .frames
                .iter()
                .filter(|f| f.window_state.is_minimized)
                .count();
            let position = tray_position(slot, self.viewport, &self.config);
            let state = &mut self.frames[index].window_state;
            state.is_minimized = true;
            state.is_maximized = false;
            state.position = position;
            state.size = tray_size(&self.config);
            tracing::debug!(frame_id = %id, slot, "Minimized frame");
        } else {
            let bounds = clamp_bounds(self.take_restore_bounds(id), self.viewport, &self.config);
            let state = &mut self.frames[index].window_state;
            state.is_minimized = false;
            bounds.apply_to(state);
            tracing::debug!(frame_id = %id, "Restored minimized frame");
        }

        self.raise(index);
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Pointer gestures
    // ========================================================================

    /// Starts a title-bar drag. Returns `false` when the frame is maximized or
    /// minimized, or already has a gesture in progress.
    pub fn begin_drag(
        &mut self,
        id: &FrameId,
        pointer_id: i32,
        pointer: Point,
    ) -> Result<bool, FrameError> {
        self.begin_session(id, |bounds| {
            InteractionSession::drag(pointer_id, pointer, bounds)
        })
    }

    pub fn begin_resize(
        &mut self,
        id: &FrameId,
        pointer_id: i32,
        direction: ResizeDirection,
        pointer: Point,
    ) -> Result<bool, FrameError> {
        self.begin_session(id, |bounds| {
            InteractionSession::resize(pointer_id, direction, pointer, bounds)
        })
    }

    fn begin_session(
        &mut self,
        id: &FrameId,
        start: impl FnOnce(Bounds) -> InteractionSession,
    ) -> Result<bool, FrameError> {
        let index = self.index_of(id)?;
        let state = &self.frames[index].window_state;
        if state.is_maximized || state.is_minimized || self.sessions.contains_key(id) {
            return Ok(false);
        }

        let session = start(Bounds::of(state));
        self.raise(index);
        self.persist();
        tracing::debug!(frame_id = %id, phase = ?session.phase(), "Gesture started");
        self.sessions.insert(id.clone(), session);
        Ok(true)
    }

    /// Applies a pointer move to the frame's gesture. Moves from a pointer
    /// other than the one that started the gesture are ignored. Returns
    /// whether the geometry changed.
    pub fn update_interaction(&mut self, id: &FrameId, pointer_id: i32, pointer: Point) -> bool {
        let Some(session) = self.sessions.get(id).copied() else {
            return false;
        };
        if session.pointer_id() != pointer_id {
            return false;
        }
        let Some(index) = self.frames.iter().position(|f| &f.id == id) else {
            self.sessions.remove(id);
            return false;
        };

        let next = session.apply(pointer, self.viewport, &self.config);
        let state = &mut self.frames[index].window_state;
        if Bounds::of(state) == next {
            return false;
        }
        next.apply_to(state);
        true
    }

    /// Commits the gesture on pointer release.
    pub fn end_interaction(&mut self, id: &FrameId, pointer_id: i32) -> bool {
        match self.sessions.get(id) {
            Some(session) if session.pointer_id() == pointer_id => {}
            _ => return false,
        }
        self.sessions.remove(id);
        self.persist();
        tracing::debug!(frame_id = %id, "Gesture committed");
        true
    }

    /// Aborts the gesture and puts the frame back where it was at press time.
    pub fn cancel_interaction(&mut self, id: &FrameId) -> bool {
        let Some(session) = self.sessions.remove(id) else {
            return false;
        };
        if let Some(frame) = self.frames.iter_mut().find(|f| &f.id == id) {
            session.start_bounds().apply_to(&mut frame.window_state);
        }
        self.persist();
        tracing::debug!(frame_id = %id, "Gesture cancelled");
        true
    }

    // ========================================================================
    // Keyboard nudges and viewport changes
    // ========================================================================

    /// Moves a normal frame by a delta, with the drag clamps.
    pub fn move_by(&mut self, id: &FrameId, dx: i32, dy: i32) -> Result<(), FrameError> {
        let index = self.index_of(id)?;
        let state = &self.frames[index].window_state;
        if state.is_maximized || state.is_minimized {
            return Ok(());
        }
        let mut next = Bounds::of(state);
        next.x += dx;
        next.y += dy;
        clamp_bounds(next, self.viewport, &self.config)
            .apply_to(&mut self.frames[index].window_state);
        self.persist();
        Ok(())
    }

    /// Grows/shrinks a normal frame from its bottom-right corner.
    pub fn resize_by(&mut self, id: &FrameId, dw: i32, dh: i32) -> Result<(), FrameError> {
        let index = self.index_of(id)?;
        let state = &self.frames[index].window_state;
        if state.is_maximized || state.is_minimized {
            return Ok(());
        }
        resize_bounds(
            Bounds::of(state),
            ResizeDirection::SouthEast,
            dw,
            dh,
            self.viewport,
            &self.config,
        )
        .apply_to(&mut self.frames[index].window_state);
        self.persist();
        Ok(())
    }

    /// Refits every frame to a new viewport: maximized frames fill it,
    /// minimized frames are re-slotted in the tray, others are clamped.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let changed = self.refit_frames();

        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            changed,
            "Viewport changed"
        );
        if changed {
            self.persist();
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Fits every frame to the current viewport: maximized frames fill it,
    /// minimized frames are re-slotted in the tray, others are clamped.
    /// Returns whether any geometry changed.
    fn refit_frames(&mut self) -> bool {
        let full = self.full_viewport_bounds();
        let mut slot = 0;
        let mut changed = false;
        for frame in &mut self.frames {
            let state = &mut frame.window_state;
            let next = if state.is_maximized {
                full
            } else if state.is_minimized {
                let position = tray_position(slot, self.viewport, &self.config);
                slot += 1;
                Bounds::new(position, tray_size(&self.config))
            } else {
                clamp_bounds(Bounds::of(state), self.viewport, &self.config)
            };
            if Bounds::of(state) != next {
                next.apply_to(state);
                changed = true;
            }
        }
        changed
    }

    fn index_of(&self, id: &FrameId) -> Result<usize, FrameError> {
        self.frames
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| FrameError::FrameNotFound(id.clone()))
    }

    fn take_next_z(&mut self) -> u32 {
        if self.next_z_index > MAX_Z_INDEX {
            renumber_z_order(&mut self.frames, self.config.base_z_index);
            let count = u32::try_from(self.frames.len()).unwrap_or(u32::MAX);
            self.next_z_index = self.config.base_z_index.saturating_add(count);
            tracing::debug!(next_z_index = self.next_z_index, "Compacted z-order");
        }
        let z = self.next_z_index;
        self.next_z_index += 1;
        z
    }

    fn raise(&mut self, index: usize) {
        let z_index = self.take_next_z();
        let frame = &mut self.frames[index];
        frame.window_state.z_index = z_index;
        self.active_frame_id = Some(frame.id.clone());
    }

    fn full_viewport_bounds(&self) -> Bounds {
        Bounds {
            x: 0,
            y: 0,
            width: self.viewport.width,
            height: self.viewport.height,
        }
    }

    fn default_bounds(&self) -> Bounds {
        fit_bounds(
            Bounds::new(self.config.default_position, self.config.default_size),
            self.viewport,
            &self.config,
        )
    }

    /// Saved normal geometry, or the default geometry when none was saved
    /// (e.g. a frame restored from storage while maximized).
    fn take_restore_bounds(&mut self, id: &FrameId) -> Bounds {
        match self.restore_bounds.remove(id) {
            Some(bounds) => bounds,
            None => {
                tracing::debug!(frame_id = %id, "No saved geometry, using default");
                self.default_bounds()
            }
        }
    }

    fn persist(&self) {
        if self.context.is_embedded() {
            return;
        }

        let key = &self.config.storage_key;
        let result = if self.frames.is_empty() {
            self.store.remove(key)
        } else {
            encode_frames(&self.frames).and_then(|raw| self.store.save(key, &raw))
        };

        if let Err(e) = result {
            tracing::warn!(storage_key = %key, error = %e, "Failed to persist frame layout");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn manager() -> FrameManager<MemoryStore> {
        FrameManager::new(
            FrameManagerConfig::default(),
            HostContext::TopLevel,
            MemoryStore::new(),
            Viewport::new(1920, 1080),
        )
    }

    fn created(outcome: OpenOutcome) -> FrameId {
        match outcome {
            OpenOutcome::Created(id) => id,
            other => panic!("expected a new frame, got {other:?}"),
        }
    }

    #[test]
    fn new_frames_are_staggered() {
        let mut manager = manager();
        let a = created(manager.open("lead-1", None));
        let b = created(manager.open("lead-2", None));

        let pa = manager.frame(&a).unwrap().window_state.position;
        let pb = manager.frame(&b).unwrap().window_state.position;
        assert_eq!(pb.x - pa.x, 30);
        assert_eq!(pb.y - pa.y, 30);
    }

    #[test]
    fn reopening_minimized_frame_restores_its_geometry() {
        let mut manager = manager();
        let id = created(manager.open("lead-1", None));
        let before = Bounds::of(&manager.frame(&id).unwrap().window_state);

        manager.minimize(&id).unwrap();
        let outcome = manager.open("lead-1", Some("P-001"));

        assert_eq!(outcome, OpenOutcome::Focused(id.clone()));
        let frame = manager.frame(&id).unwrap();
        assert!(!frame.window_state.is_minimized);
        assert_eq!(Bounds::of(&frame.window_state), before);
        assert_eq!(frame.entity_label.as_deref(), Some("P-001"));
        assert_eq!(manager.restore_bounds(&id), None);
    }

    #[test]
    fn reopening_without_label_keeps_previous_label() {
        let mut manager = manager();
        let id = created(manager.open("lead-1", Some("P-001")));
        manager.open("lead-1", None);
        assert_eq!(
            manager.frame(&id).unwrap().entity_label.as_deref(),
            Some("P-001")
        );
    }

    #[test]
    fn unknown_frame_ids_are_reported() {
        let mut manager = manager();
        let missing = FrameId::from("frame-0-missing");
        assert!(matches!(
            manager.focus(&missing),
            Err(FrameError::FrameNotFound(_))
        ));
        assert!(matches!(
            manager.close(&missing),
            Err(FrameError::FrameNotFound(_))
        ));
        assert!(!manager.update_interaction(&missing, 1, Point::new(0, 0)));
    }

    #[test]
    fn second_press_on_busy_frame_is_refused() {
        let mut manager = manager();
        let id = created(manager.open("lead-1", None));

        assert!(manager.begin_drag(&id, 1, Point::new(100, 70)).unwrap());
        assert!(!manager
            .begin_resize(&id, 2, ResizeDirection::East, Point::new(0, 0))
            .unwrap());
        assert_eq!(manager.interaction_phase(&id), InteractionPhase::Dragging);
    }

    #[test]
    fn maximized_frames_do_not_start_gestures() {
        let mut manager = manager();
        let id = created(manager.open("lead-1", None));
        manager.maximize(&id).unwrap();

        assert!(!manager.begin_drag(&id, 1, Point::new(10, 10)).unwrap());
        assert_eq!(manager.interaction_phase(&id), InteractionPhase::Idle);
    }

    #[test]
    fn maximize_then_minimize_then_restore_returns_to_normal_geometry() {
        let mut manager = manager();
        let id = created(manager.open("lead-1", None));
        let normal = Bounds::of(&manager.frame(&id).unwrap().window_state);

        manager.maximize(&id).unwrap();
        manager.minimize(&id).unwrap();
        let state = &manager.frame(&id).unwrap().window_state;
        assert!(state.is_minimized);
        assert!(!state.is_maximized);

        manager.minimize(&id).unwrap();
        let state = &manager.frame(&id).unwrap().window_state;
        assert!(!state.is_minimized);
        assert_eq!(Bounds::of(state), normal);
    }

    #[test]
    fn viewport_change_refits_maximized_and_clamps_normal_frames() {
        let mut manager = manager();
        let maximized = created(manager.open("lead-1", None));
        let normal = created(manager.open("lead-2", None));
        manager.maximize(&maximized).unwrap();
        manager.move_by(&normal, 1500, 0).unwrap();

        manager.set_viewport(Viewport::new(1024, 768));

        let state = &manager.frame(&maximized).unwrap().window_state;
        assert_eq!((state.size.width, state.size.height), (1024, 768));
        let state = &manager.frame(&normal).unwrap().window_state;
        assert_eq!(state.position.x, 1024 - manager.config().min_visible_margin);
        assert!(state.size.width <= 1024);
    }

    #[test]
    fn z_counter_is_compacted_before_it_runs_out() {
        let mut manager = manager();
        let a = created(manager.open("lead-1", None));
        let b = created(manager.open("lead-2", None));
        manager.next_z_index = MAX_Z_INDEX + 1;

        manager.focus(&a).unwrap();

        let base = manager.config().base_z_index;
        assert_eq!(manager.frame(&b).unwrap().window_state.z_index, base + 1);
        assert_eq!(manager.frame(&a).unwrap().window_state.z_index, base + 2);
        assert!(manager.is_frontmost(&a));
    }

    #[test]
    fn keyboard_resize_respects_minimum() {
        let mut manager = manager();
        let id = created(manager.open("lead-1", None));
        manager.resize_by(&id, -5000, -5000).unwrap();

        let size = manager.frame(&id).unwrap().window_state.size;
        assert_eq!((size.width, size.height), (400, 300));
    }
}
