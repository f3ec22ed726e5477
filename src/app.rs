//! Application module: exposes the navigation model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the fetched playlists and tracks,
//! the focused pane and one clamped selection per pane.

mod model;

pub use model::*;
