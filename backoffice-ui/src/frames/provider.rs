use dioxus::prelude::*;
use frame_manager::{
    FrameError, FrameId, FrameManager, FrameManagerConfig, FrameRecord, InteractionPhase,
    OpenOutcome, Point, ResizeDirection, Viewport,
};

use crate::floating_frame::FrameLayer;
use crate::frames::effects;
use crate::frames::storage::LocalStore;
use crate::interop::{detect_host_context, get_viewport_size, navigate_top};

/// Copyable access to the application's frame manager, provided as context
/// by [`FrameProvider`].
#[derive(Clone, Copy, PartialEq)]
pub struct FrameHandle {
    manager: Signal<FrameManager<LocalStore>>,
}

fn report(operation: &str, result: Result<(), FrameError>) {
    if let Err(e) = result {
        dioxus_logger::tracing::warn!("Frame {} ignored: {}", operation, e);
    }
}

impl FrameHandle {
    /// Opens the details frame for `entity_id`, or focuses the existing one.
    /// Inside an embedded page the top-level view navigates to the details
    /// page instead.
    pub fn open(self, entity_id: &str, label: Option<&str>) {
        let mut manager = self.manager;
        let outcome = manager.write().open(entity_id, label);
        if let OpenOutcome::NavigateTop { url } = outcome {
            navigate_top(&url);
        }
    }

    pub fn close(self, id: &FrameId) {
        let mut manager = self.manager;
        report("close", manager.write().close(id));
    }

    pub fn focus(self, id: &FrameId) {
        let mut manager = self.manager;
        if manager.peek().is_frontmost(id) {
            return;
        }
        report("focus", manager.write().focus(id));
    }

    pub fn maximize(self, id: &FrameId) {
        let mut manager = self.manager;
        report("maximize", manager.write().maximize(id));
    }

    pub fn minimize(self, id: &FrameId) {
        let mut manager = self.manager;
        report("minimize", manager.write().minimize(id));
    }

    pub fn begin_drag(self, id: &FrameId, pointer_id: i32, pointer: Point) -> bool {
        let mut manager = self.manager;
        let started = manager.write().begin_drag(id, pointer_id, pointer);
        started.unwrap_or_else(|e| {
            dioxus_logger::tracing::warn!("Frame drag ignored: {}", e);
            false
        })
    }

    pub fn begin_resize(
        self,
        id: &FrameId,
        pointer_id: i32,
        direction: ResizeDirection,
        pointer: Point,
    ) -> bool {
        let mut manager = self.manager;
        let started = manager
            .write()
            .begin_resize(id, pointer_id, direction, pointer);
        started.unwrap_or_else(|e| {
            dioxus_logger::tracing::warn!("Frame resize ignored: {}", e);
            false
        })
    }

    pub fn update_interaction(self, id: &FrameId, pointer_id: i32, pointer: Point) {
        let mut manager = self.manager;
        if manager.peek().interaction_phase(id) == InteractionPhase::Idle {
            return;
        }
        manager.write().update_interaction(id, pointer_id, pointer);
    }

    pub fn end_interaction(self, id: &FrameId, pointer_id: i32) -> bool {
        let mut manager = self.manager;
        if manager.peek().interaction_phase(id) == InteractionPhase::Idle {
            return false;
        }
        let ended = manager.write().end_interaction(id, pointer_id);
        ended
    }

    pub fn cancel_interaction(self, id: &FrameId) -> bool {
        let mut manager = self.manager;
        if manager.peek().interaction_phase(id) == InteractionPhase::Idle {
            return false;
        }
        let cancelled = manager.write().cancel_interaction(id);
        cancelled
    }

    pub fn move_by(self, id: &FrameId, dx: i32, dy: i32) {
        let mut manager = self.manager;
        report("move", manager.write().move_by(id, dx, dy));
    }

    pub fn resize_by(self, id: &FrameId, dw: i32, dh: i32) {
        let mut manager = self.manager;
        report("resize", manager.write().resize_by(id, dw, dh));
    }

    pub fn set_viewport(self, viewport: Viewport) {
        let mut manager = self.manager;
        if manager.peek().viewport() == viewport {
            return;
        }
        manager.write().set_viewport(viewport);
    }

    pub fn frames(self) -> Vec<FrameRecord> {
        self.manager.read().frames().to_vec()
    }

    pub fn active_frame_id(self) -> Option<FrameId> {
        self.manager.read().active_frame_id().cloned()
    }

    pub fn is_busy(self, id: &FrameId) -> bool {
        self.manager.read().interaction_phase(id) != InteractionPhase::Idle
    }

    /// Width the frame returns to when restored from the tray.
    pub fn normal_width(self, id: &FrameId) -> i32 {
        let manager = self.manager.read();
        manager
            .restore_bounds(id)
            .map(|bounds| bounds.width)
            .unwrap_or(manager.config().default_size.width)
    }

    pub fn details_url(self, entity_id: &str) -> String {
        self.manager.peek().details_url(entity_id)
    }

    pub fn config(self) -> FrameManagerConfig {
        self.manager.peek().config().clone()
    }
}

pub fn use_frames() -> FrameHandle {
    use_context::<FrameHandle>()
}

fn resolve_config(config: Option<FrameManagerConfig>) -> FrameManagerConfig {
    match config.unwrap_or_default().validate() {
        Ok(config) => config,
        Err(e) => {
            dioxus_logger::tracing::warn!("Invalid frame configuration, using defaults: {}", e);
            FrameManagerConfig::default()
        }
    }
}

/// Owns the frame manager for the subtree and renders the frame layer above
/// `children`.
#[component]
pub fn FrameProvider(
    #[props(default)] config: Option<FrameManagerConfig>,
    children: Element,
) -> Element {
    let viewport = use_signal(get_viewport_size);
    let manager = use_signal(move || {
        let (width, height) = *viewport.peek();
        FrameManager::new(
            resolve_config(config),
            detect_host_context(),
            LocalStore,
            Viewport::new(width, height),
        )
    });
    let frames = use_context_provider(|| FrameHandle { manager });

    use_effect(move || {
        spawn(async move {
            effects::track_viewport(viewport).await;
        });
    });

    use_effect(move || {
        let (width, height) = viewport();
        frames.set_viewport(Viewport::new(width, height));
    });

    rsx! {
        {children}
        FrameLayer {}
    }
}
