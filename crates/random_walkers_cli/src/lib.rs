#![forbid(unsafe_code)]
//! PNG rendering and command-line support for `random_walkers` scenes.

mod rendering;

pub use rendering::{init_tracing, panel_grid, render_scene, render_scene_to_png, RenderConfig};
