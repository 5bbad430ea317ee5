use std::fmt::Display;

/// Whether the manager runs in the top-level view or inside an embedded frame.
///
/// An embedded manager never spawns floating frames and never restores the
/// persisted layout; that is what stops a details page loaded inside a frame
/// from recursively opening frames of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostContext {
    TopLevel,
    Embedded,
}

impl HostContext {
    /// Maps the answer to "is this the top-level view?". A failed check
    /// (e.g. a cross-origin access error) counts as embedded.
    pub fn from_top_level_check<E: Display>(check: Result<bool, E>) -> Self {
        match check {
            Ok(true) => Self::TopLevel,
            Ok(false) => Self::Embedded,
            Err(e) => {
                tracing::warn!(error = %e, "Host context check failed, assuming embedded");
                Self::Embedded
            }
        }
    }

    pub fn is_embedded(self) -> bool {
        self == Self::Embedded
    }
}
