//! Terminal UI for fnav.
//!
//! [render] draws one frame from the [AppState](crate::app::AppState): a
//! header line, the entry rows and a footer with the status or prompt.

pub mod render;

pub(crate) use render::render;
