use dioxus::prelude::*;
use dioxus_web::WebEventExt;
use frame_manager::{Bounds, FrameId, Point, ResizeDirection};
use shared_types::FrameRecord;
use wasm_bindgen::JsCast;

use crate::frames::use_frames;

const KEYBOARD_STEP_PX: i32 = 10;
const EDGE_HANDLE_PX: i32 = 6;
const CORNER_HANDLE_PX: i32 = 12;

fn pointer_point(e: &PointerEvent) -> Point {
    if let Some((x, y)) = e.data().try_as_web_event().and_then(|event| {
        event
            .dyn_ref::<web_sys::PointerEvent>()
            .map(|pointer| (pointer.client_x(), pointer.client_y()))
    }) {
        return Point::new(x, y);
    }

    let point = e.data().client_coordinates();
    Point::new(point.x as i32, point.y as i32)
}

fn pointer_buttons(e: &PointerEvent) -> u16 {
    e.data()
        .try_as_web_event()
        .and_then(|event| {
            event
                .dyn_ref::<web_sys::PointerEvent>()
                .map(|pointer| pointer.buttons())
        })
        .unwrap_or(1)
}

fn pointer_target_is_window_control(e: &PointerEvent) -> bool {
    e.data()
        .try_as_web_event()
        .and_then(|event| event.target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(|element| {
            element.closest("button").ok().flatten().is_some()
                || element.closest(".window-controls").ok().flatten().is_some()
        })
        .unwrap_or(false)
}

fn frame_element(e: &PointerEvent) -> Option<web_sys::Element> {
    e.data()
        .try_as_web_event()
        .and_then(|event| event.current_target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(".floating-window").ok().flatten())
}

fn capture_window_pointer(e: &PointerEvent, pointer_id: i32) {
    let _ = frame_element(e).map(|frame| frame.set_pointer_capture(pointer_id));
}

fn release_window_pointer(e: &PointerEvent, pointer_id: i32) {
    let _ = frame_element(e).map(|frame| frame.release_pointer_capture(pointer_id));
}

/// Strip geometry of a minimized frame. When expanded it grows leftwards to
/// `normal_width`, keeping its right edge in the tray slot.
pub fn strip_bounds(bounds: Bounds, normal_width: i32, expanded: bool) -> Bounds {
    if !expanded || normal_width <= bounds.width {
        return bounds;
    }
    let x = (bounds.right() - normal_width).max(0);
    Bounds {
        x,
        width: bounds.right() - x,
        ..bounds
    }
}

pub fn frame_style(bounds: Bounds, z_index: u32, is_active: bool, is_maximized: bool) -> String {
    let outline = if is_active && !is_maximized {
        "2px solid var(--accent-bg, #3b82f6)"
    } else {
        "none"
    };
    let (radius, shadow) = if is_maximized {
        ("0", "none")
    } else {
        (
            "var(--radius-lg, 10px)",
            "var(--shadow-lg, 0 10px 40px rgba(0,0,0,0.35))",
        )
    };
    format!(
        "position: fixed; left: {}px; top: {}px; width: {}px; height: {}px; z-index: {z_index}; \
         display: flex; flex-direction: column; background: var(--window-bg, #ffffff); \
         border: 1px solid var(--border-color, #d1d5db); border-radius: {radius}; \
         overflow: hidden; box-shadow: {shadow}; outline: {outline};",
        bounds.x, bounds.y, bounds.width, bounds.height
    )
}

/// Invisible hit-zone along one edge or corner of a frame.
pub fn handle_style(direction: ResizeDirection) -> String {
    let edge = EDGE_HANDLE_PX;
    let corner = CORNER_HANDLE_PX;
    let placement = match direction {
        ResizeDirection::North => {
            format!("top: 0; left: {corner}px; right: {corner}px; height: {edge}px;")
        }
        ResizeDirection::South => {
            format!("bottom: 0; left: {corner}px; right: {corner}px; height: {edge}px;")
        }
        ResizeDirection::East => {
            format!("right: 0; top: {corner}px; bottom: {corner}px; width: {edge}px;")
        }
        ResizeDirection::West => {
            format!("left: 0; top: {corner}px; bottom: {corner}px; width: {edge}px;")
        }
        ResizeDirection::NorthEast => {
            format!("top: 0; right: 0; width: {corner}px; height: {corner}px;")
        }
        ResizeDirection::NorthWest => {
            format!("top: 0; left: 0; width: {corner}px; height: {corner}px;")
        }
        ResizeDirection::SouthEast => {
            format!("bottom: 0; right: 0; width: {corner}px; height: {corner}px;")
        }
        ResizeDirection::SouthWest => {
            format!("bottom: 0; left: 0; width: {corner}px; height: {corner}px;")
        }
    };
    format!(
        "position: absolute; {placement} cursor: {}-resize; z-index: 3; touch-action: none;",
        direction.as_str()
    )
}

/// Renders every visible frame of the surrounding [`crate::FrameProvider`].
#[component]
pub fn FrameLayer() -> Element {
    let frames = use_frames();
    let records = frames.frames();
    let active = frames.active_frame_id();

    rsx! {
        {records.into_iter().filter(|record| record.window_state.is_visible).map(|record| {
            let is_active = active.as_ref() == Some(&record.id);
            let src = frames.details_url(&record.entity_id);
            rsx! {
                FloatingFrame {
                    key: "{record.id}",
                    frame: record,
                    src,
                    is_active,
                }
            }
        })}
    }
}

/// One floating frame. Minimized frames stay mounted (the embedded page keeps
/// its state) and render as a [`MinimizedStrip`].
#[component]
pub fn FloatingFrame(frame: FrameRecord, src: String, is_active: bool) -> Element {
    let frames = use_frames();
    let mut loaded = use_signal(|| false);
    let mut strip_expanded = use_signal(|| false);

    let state = frame.window_state.clone();
    let is_minimized = state.is_minimized;
    let title = frame.title().to_string();
    let busy = frames.is_busy(&frame.id);
    let title_bar_height = frames.config().title_bar_height;

    let bounds = if state.is_minimized {
        strip_bounds(
            Bounds::of(&state),
            frames.normal_width(&frame.id),
            strip_expanded(),
        )
    } else {
        Bounds::of(&state)
    };
    let window_style = frame_style(bounds, state.z_index, is_active, state.is_maximized);

    let id_for_focus = frame.id.clone();
    let id_for_keyboard = frame.id.clone();
    let id_for_pointer_move = frame.id.clone();
    let id_for_pointer_up = frame.id.clone();
    let id_for_pointer_cancel = frame.id.clone();
    let id_for_title_pointer = frame.id.clone();
    let id_for_title_dblclick = frame.id.clone();
    let id_for_resize = frame.id.clone();

    let on_window_keydown = move |e: KeyboardEvent| {
        let key = e.key();
        let modifiers = e.modifiers();
        let id = &id_for_keyboard;

        if key == Key::F4 && modifiers.alt() {
            e.prevent_default();
            frames.close(id);
            return;
        }

        if key == Key::Escape {
            if frames.cancel_interaction(id) {
                e.prevent_default();
            }
            return;
        }

        if let Key::Character(c) = &key {
            if c.eq_ignore_ascii_case("m") && modifiers.ctrl() {
                e.prevent_default();
                if modifiers.shift() {
                    frames.maximize(id);
                } else {
                    frames.minimize(id);
                }
                return;
            }
        }

        if !modifiers.alt() {
            return;
        }
        let (dx, dy) = match key {
            Key::ArrowLeft => (-KEYBOARD_STEP_PX, 0),
            Key::ArrowRight => (KEYBOARD_STEP_PX, 0),
            Key::ArrowUp => (0, -KEYBOARD_STEP_PX),
            Key::ArrowDown => (0, KEYBOARD_STEP_PX),
            _ => return,
        };
        e.prevent_default();
        if modifiers.shift() {
            frames.resize_by(id, dx, dy);
        } else {
            frames.move_by(id, dx, dy);
        }
    };

    let content_style = if state.is_minimized {
        "display: none;"
    } else {
        "position: relative; flex: 1; overflow: hidden;"
    };
    let iframe_style = if busy {
        "width: 100%; height: 100%; border: none; pointer-events: none;"
    } else {
        "width: 100%; height: 100%; border: none;"
    };

    rsx! {
        div {
            class: if is_active { "floating-window active" } else { "floating-window" },
            role: "dialog",
            "aria-label": title.clone(),
            tabindex: "0",
            style: "{window_style}",
            onpointerdown: move |_| frames.focus(&id_for_focus),
            onkeydown: on_window_keydown,
            onmouseenter: move |_| {
                if is_minimized {
                    strip_expanded.set(true);
                }
            },
            onmouseleave: move |_| {
                if strip_expanded() {
                    strip_expanded.set(false);
                }
            },
            onpointermove: move |e| {
                let pointer_id = e.data().pointer_id();
                // Pointer capture can be lost across focus transitions; with no
                // buttons held the gesture is over.
                if pointer_buttons(&e) == 0 {
                    if frames.end_interaction(&id_for_pointer_move, pointer_id) {
                        release_window_pointer(&e, pointer_id);
                    }
                    return;
                }
                frames.update_interaction(&id_for_pointer_move, pointer_id, pointer_point(&e));
            },
            onpointerup: move |e| {
                let pointer_id = e.data().pointer_id();
                if frames.end_interaction(&id_for_pointer_up, pointer_id) {
                    release_window_pointer(&e, pointer_id);
                }
            },
            onpointercancel: move |e| {
                let pointer_id = e.data().pointer_id();
                if frames.cancel_interaction(&id_for_pointer_cancel) {
                    release_window_pointer(&e, pointer_id);
                }
            },

            if state.is_minimized {
                MinimizedStrip {
                    id: frame.id.clone(),
                    title: title.clone(),
                    expanded: strip_expanded(),
                    height: title_bar_height,
                }
            } else {
                div {
                    class: "window-titlebar",
                    style: "display: flex; align-items: center; gap: 0.75rem; height: {title_bar_height}px; flex-shrink: 0; padding: 0 0.75rem; background: var(--titlebar-bg, #f3f4f6); border-bottom: 1px solid var(--border-color, #d1d5db); cursor: grab; user-select: none; touch-action: none;",
                    ondoubleclick: move |_| frames.maximize(&id_for_title_dblclick),
                    onpointerdown: move |e| {
                        if pointer_target_is_window_control(&e) {
                            return;
                        }
                        let pointer_id = e.data().pointer_id();
                        if frames.begin_drag(&id_for_title_pointer, pointer_id, pointer_point(&e)) {
                            e.prevent_default();
                            capture_window_pointer(&e, pointer_id);
                        }
                    },

                    WindowControls {
                        id: frame.id.clone(),
                        maximized: state.is_maximized,
                    }
                    span {
                        style: "flex: 1; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; font-weight: 500; color: var(--text-primary, #111827);",
                        "{title}"
                    }
                }
            }

            div {
                class: "window-content",
                style: "{content_style}",

                iframe {
                    src: "{src}",
                    title: "{title}",
                    "loading": "lazy",
                    style: "{iframe_style}",
                    onload: move |_| loaded.set(true),
                }

                if !loaded() {
                    div {
                        class: "frame-loading",
                        style: "position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; background: var(--window-bg, #ffffff); color: var(--text-muted, #6b7280);",
                        "Loading…"
                    }
                }
            }

            if !state.is_maximized && !state.is_minimized {
                {ResizeDirection::ALL.into_iter().map(|direction| {
                    let id = id_for_resize.clone();
                    rsx! {
                        div {
                            key: "{direction.as_str()}",
                            class: "resize-handle resize-handle-{direction.as_str()}",
                            style: handle_style(direction),
                            onpointerdown: move |e: PointerEvent| {
                                e.stop_propagation();
                                let pointer_id = e.data().pointer_id();
                                if frames.begin_resize(&id, pointer_id, direction, pointer_point(&e)) {
                                    e.prevent_default();
                                    capture_window_pointer(&e, pointer_id);
                                }
                            },
                        }
                    }
                })}
            }
        }
    }
}

#[component]
fn WindowControls(id: FrameId, maximized: bool) -> Element {
    let frames = use_frames();
    let id_for_close = id.clone();
    let id_for_minimize = id.clone();
    let id_for_maximize = id;

    rsx! {
        div {
            class: "window-controls",
            style: "display: flex; align-items: center; gap: 0.4rem;",
            button {
                class: "window-close",
                style: traffic_light_style("#ef4444"),
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": "Close",
                onclick: move |e| {
                    e.stop_propagation();
                    frames.close(&id_for_close);
                },
            }
            button {
                style: traffic_light_style("#facc15"),
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": "Minimize",
                onclick: move |e| {
                    e.stop_propagation();
                    frames.minimize(&id_for_minimize);
                },
            }
            button {
                style: traffic_light_style("#22c55e"),
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": if maximized { "Restore" } else { "Maximize" },
                onclick: move |e| {
                    e.stop_propagation();
                    frames.maximize(&id_for_maximize);
                },
            }
        }
    }
}

fn traffic_light_style(color: &str) -> String {
    format!(
        "width: 12px; height: 12px; padding: 0; border: none; border-radius: 999px; \
         background: {color}; cursor: pointer;"
    )
}

/// Tray entry of a minimized frame. Clicking the label restores the frame;
/// close and maximize only show while the strip is expanded.
#[component]
pub fn MinimizedStrip(id: FrameId, title: String, expanded: bool, height: i32) -> Element {
    let frames = use_frames();
    let id_for_restore = id.clone();
    let id_for_maximize = id.clone();
    let id_for_close = id;

    rsx! {
        div {
            class: "frame-strip",
            style: "display: flex; align-items: center; gap: 0.4rem; height: {height}px; padding: 0 0.75rem; background: var(--titlebar-bg, #f3f4f6); user-select: none;",

            if expanded {
                div {
                    class: "window-controls",
                    style: "display: flex; align-items: center; gap: 0.4rem;",
                    button {
                        class: "window-close",
                        style: traffic_light_style("#ef4444"),
                        "aria-label": "Close",
                        onclick: move |e| {
                            e.stop_propagation();
                            frames.close(&id_for_close);
                        },
                    }
                    button {
                        style: traffic_light_style("#22c55e"),
                        "aria-label": "Maximize",
                        onclick: move |e| {
                            e.stop_propagation();
                            frames.maximize(&id_for_maximize);
                        },
                    }
                }
            }

            button {
                class: "frame-strip-label",
                style: "flex: 1; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; text-align: left; background: transparent; border: none; cursor: pointer; font-weight: 500; color: var(--text-primary, #111827);",
                title: "{title}",
                onclick: move |e| {
                    e.stop_propagation();
                    frames.minimize(&id_for_restore);
                },
                "{title}"
            }
        }
    }
}
