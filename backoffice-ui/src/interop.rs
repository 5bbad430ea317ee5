use frame_manager::HostContext;
use web_sys::window;

/// Get the browser viewport dimensions in CSS pixels.
pub fn get_viewport_size() -> (i32, i32) {
    current_viewport_size().unwrap_or((0, 0))
}

pub(crate) fn current_viewport_size() -> Option<(i32, i32)> {
    let window = window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;

    if width > 0.0 && height > 0.0 {
        return Some((width.round() as i32, height.round() as i32));
    }

    let document = window.document()?;
    let root = document.document_element()?;
    Some((root.client_width().max(0), root.client_height().max(0)))
}

/// Whether this document is the top-level browsing context. Any failure while
/// checking counts as embedded.
pub fn detect_host_context() -> HostContext {
    HostContext::from_top_level_check(check_top_level())
}

fn check_top_level() -> Result<bool, String> {
    let window = window().ok_or_else(|| "no global `window` exists".to_string())?;
    let top = window
        .top()
        .map_err(|e| format!("{e:?}"))?
        .ok_or_else(|| "no top-level window".to_string())?;
    Ok(js_sys::Object::is(&top, &window))
}

/// Point the top-level view at `url`. Falls back to this document when the
/// top view refuses the navigation.
pub fn navigate_top(url: &str) {
    let Some(window) = window() else {
        return;
    };
    let target = window.top().ok().flatten().unwrap_or_else(|| window.clone());

    if let Err(e) = target.location().set_href(url) {
        dioxus_logger::tracing::warn!(
            "Top-level navigation to {} refused ({:?}), navigating current view",
            url,
            e
        );
        if let Err(e) = window.location().set_href(url) {
            dioxus_logger::tracing::warn!("Navigation to {} failed: {:?}", url, e);
        }
    }
}
