use glam::Vec3;

use super::animator::PathAnimator;
use super::location::LocationTable;
use super::route::{ResolvedPath, RouteError, RouteGraph};

/// Highlighted route color.
pub const PATH_COLOR: [f32; 3] = [0.0, 1.0, 0.0];
/// Walking marker color.
pub const MARKER_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
/// Walking marker radius in world units.
pub const MARKER_RADIUS: f32 = 0.5;

/// Handle to an object the controller placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// What navigation needs from a renderer. Keeping the surface this narrow
/// lets the whole navigation flow run against a recording fake in tests.
pub trait SceneSink {
    fn add_polyline(&mut self, points: &[Vec3], color: [f32; 3]) -> ObjectId;
    fn add_marker(&mut self, position: Vec3, radius: f32, color: [f32; 3]) -> ObjectId;
    fn set_position(&mut self, id: ObjectId, position: Vec3);
    fn remove(&mut self, id: ObjectId);
}

struct Installed {
    line: ObjectId,
    marker: ObjectId,
}

/// Ties the pieces together: resolves requests against the station data and
/// keeps the scene's line and marker in step with the walk, one animator
/// step per frame.
pub struct NavigationController {
    locations: LocationTable,
    routes: RouteGraph,
    animator: PathAnimator,
    installed: Option<Installed>,
}

impl NavigationController {
    pub fn new(locations: LocationTable, routes: RouteGraph) -> Self {
        Self {
            locations,
            routes,
            animator: PathAnimator::new(),
            installed: None,
        }
    }

    pub fn with_step_size(locations: LocationTable, routes: RouteGraph, step_size: f32) -> Self {
        Self {
            animator: PathAnimator::with_step_size(step_size),
            ..Self::new(locations, routes)
        }
    }

    /// Labels available for selection, in station definition order.
    pub fn location_names(&self) -> impl Iterator<Item = &str> {
        self.locations.names()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn current_path(&self) -> Option<&ResolvedPath> {
        self.animator.path()
    }

    /// Where the marker currently stands, while a walk is in progress.
    pub fn marker_position(&self) -> Option<Vec3> {
        self.animator.position()
    }

    /// Resolve a label pair and start walking it.
    ///
    /// Resolution happens before anything in the scene is touched, so a
    /// failed request leaves a previous walk exactly as it was.
    pub fn request_path(
        &mut self,
        start: &str,
        end: &str,
        scene: &mut dyn SceneSink,
    ) -> Result<(), RouteError> {
        let path = self.routes.resolve(start, end, &self.locations)?;
        log::info!(
            "walking {start:?} -> {end:?}: {} points over {:.1} units",
            path.point_count(),
            path.total_length()
        );

        self.remove_installed(scene);
        let line = scene.add_polyline(path.points(), PATH_COLOR);
        let marker = scene.add_marker(path.first(), MARKER_RADIUS, MARKER_COLOR);
        self.installed = Some(Installed { line, marker });
        self.animator.install(path);
        Ok(())
    }

    /// Advance the walk one step and move the marker. No-op while idle.
    pub fn tick(&mut self, scene: &mut dyn SceneSink) {
        if let (Some(position), Some(installed)) = (self.animator.step(), &self.installed) {
            scene.set_position(installed.marker, position);
        }
    }

    /// Take down the current walk, if any.
    pub fn clear(&mut self, scene: &mut dyn SceneSink) {
        self.remove_installed(scene);
        self.animator.clear();
    }

    fn remove_installed(&mut self, scene: &mut dyn SceneSink) {
        if let Some(installed) = self.installed.take() {
            scene.remove(installed.line);
            scene.remove(installed.marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::location::Location;
    use crate::nav::route::Leg;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddPolyline { points: Vec<Vec3>, color: [f32; 3] },
        AddMarker { position: Vec3, radius: f32, color: [f32; 3] },
        SetPosition { id: ObjectId, position: Vec3 },
        Remove(ObjectId),
    }

    /// Records every sink call so tests can assert on the exact sequence.
    #[derive(Default)]
    struct MockScene {
        next_id: u64,
        calls: Vec<Call>,
    }

    impl MockScene {
        fn removals(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Remove(_)))
                .count()
        }
    }

    impl SceneSink for MockScene {
        fn add_polyline(&mut self, points: &[Vec3], color: [f32; 3]) -> ObjectId {
            self.calls.push(Call::AddPolyline {
                points: points.to_vec(),
                color,
            });
            self.next_id += 1;
            ObjectId(self.next_id)
        }

        fn add_marker(&mut self, position: Vec3, radius: f32, color: [f32; 3]) -> ObjectId {
            self.calls.push(Call::AddMarker {
                position,
                radius,
                color,
            });
            self.next_id += 1;
            ObjectId(self.next_id)
        }

        fn set_position(&mut self, id: ObjectId, position: Vec3) {
            self.calls.push(Call::SetPosition { id, position });
        }

        fn remove(&mut self, id: ObjectId) {
            self.calls.push(Call::Remove(id));
        }
    }

    fn controller() -> NavigationController {
        let locations: LocationTable = [
            Location::new("Entrance", Vec3::new(0.0, 0.0, 0.0)),
            Location::new("Hall", Vec3::new(10.0, 0.0, 0.0)),
            Location::new("Platform", Vec3::new(20.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        let mut routes = RouteGraph::new();
        routes.connect("Entrance", "Hall", Leg::direct());
        routes.connect("Hall", "Platform", Leg::direct());

        NavigationController::new(locations, routes)
    }

    #[test]
    fn request_installs_line_and_marker() {
        let mut scene = MockScene::default();
        let mut nav = controller();

        nav.request_path("Entrance", "Platform", &mut scene).unwrap();

        assert!(nav.is_animating());
        assert_eq!(
            scene.calls[0],
            Call::AddPolyline {
                points: vec![
                    Vec3::ZERO,
                    Vec3::new(10.0, 0.0, 0.0),
                    Vec3::new(20.0, 0.0, 0.0)
                ],
                color: PATH_COLOR,
            }
        );
        assert_eq!(
            scene.calls[1],
            Call::AddMarker {
                position: Vec3::ZERO,
                radius: MARKER_RADIUS,
                color: MARKER_COLOR,
            }
        );
    }

    #[test]
    fn failed_request_leaves_previous_walk_untouched() {
        let mut scene = MockScene::default();
        let mut nav = controller();
        nav.request_path("Entrance", "Platform", &mut scene).unwrap();
        let calls_before = scene.calls.len();

        let err = nav.request_path("Hall", "Hall", &mut scene).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPair { .. }));

        assert_eq!(scene.calls.len(), calls_before, "scene was touched on error");
        assert!(nav.is_animating(), "previous walk was dropped");
    }

    #[test]
    fn second_request_replaces_the_first_walk() {
        let mut scene = MockScene::default();
        let mut nav = controller();
        nav.request_path("Entrance", "Platform", &mut scene).unwrap();
        nav.request_path("Platform", "Hall", &mut scene).unwrap();

        assert_eq!(scene.removals(), 2, "old line and marker not removed");
        assert_eq!(
            nav.current_path().map(|p| p.first()),
            Some(Vec3::new(20.0, 0.0, 0.0))
        );
    }

    #[test]
    fn tick_moves_only_the_marker() {
        let mut scene = MockScene::default();
        let mut nav = controller();
        nav.request_path("Entrance", "Hall", &mut scene).unwrap();
        let marker = ObjectId(2);

        scene.calls.clear();
        nav.tick(&mut scene);

        assert_eq!(scene.calls.len(), 1);
        match &scene.calls[0] {
            Call::SetPosition { id, position } => {
                assert_eq!(*id, marker);
                assert!(position.x > 0.0);
            }
            other => panic!("expected a marker move, got {other:?}"),
        }
    }

    #[test]
    fn tick_without_a_walk_is_a_noop() {
        let mut scene = MockScene::default();
        let mut nav = controller();
        nav.tick(&mut scene);
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn clear_takes_down_both_objects() {
        let mut scene = MockScene::default();
        let mut nav = controller();
        nav.request_path("Entrance", "Hall", &mut scene).unwrap();

        nav.clear(&mut scene);

        assert_eq!(scene.removals(), 2);
        assert!(!nav.is_animating());
        nav.tick(&mut scene);
        assert_eq!(scene.removals(), 2, "tick after clear touched the scene");
    }
}
