pub mod floating_frame;
pub mod frames;
pub mod interop;
pub mod launcher;

pub use floating_frame::*;
pub use frames::*;
pub use interop::*;
pub use launcher::*;
