pub mod camera;
pub mod cli;
pub mod loaders;
pub mod nav;
pub mod renderer;
pub mod types;

pub use nav::{Location, LocationTable, NavigationController, PathAnimator, StationMap};
pub use renderer::Viewer;
