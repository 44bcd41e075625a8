//! Frame loop and session runtime

pub mod render_loop;
pub mod runtime;

pub use render_loop::{FrameReport, PollScheduler, RenderLoop};
pub use runtime::{run_viewer, Viewer, ViewerError};
