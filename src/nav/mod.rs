pub mod animator;
pub mod controller;
pub mod location;
pub mod route;
pub mod station;

pub use animator::{PathAnimator, DEFAULT_STEP_SIZE};
pub use controller::{
    NavigationController, ObjectId, SceneSink, MARKER_COLOR, MARKER_RADIUS, PATH_COLOR,
};
pub use location::{Location, LocationTable};
pub use route::{Leg, ResolvedPath, RouteError, RouteGraph};
pub use station::StationMap;
