use std::collections::HashMap;

use glam::Vec3;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use thiserror::Error;

use super::location::LocationTable;

/// Why a path request could not be resolved. Every variant is a recoverable
/// user-input condition; the UI shows the message and keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("unknown location \"{0}\"")]
    UnknownLocation(String),

    #[error("no route defined between \"{start}\" and \"{end}\"")]
    InvalidPair { start: String, end: String },
}

/// An ordered polyline of at least two points, ready to walk.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    points: Vec<Vec3>,
}

impl ResolvedPath {
    /// Returns None for fewer than two points, which cannot be walked.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    pub fn first(&self) -> Vec3 {
        self.points[0]
    }

    pub fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Sum of straight-line segment lengths.
    pub fn total_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// A directly walkable stretch between two named locations.
///
/// `via` holds intermediate geometry in the stored a→b orientation; it is
/// empty when the leg is a straight line. Positions of the two endpoints live
/// in the [`LocationTable`], not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leg {
    pub via: Vec<Vec3>,
}

impl Leg {
    pub fn direct() -> Self {
        Self::default()
    }

    pub fn through(via: Vec<Vec3>) -> Self {
        Self { via }
    }
}

/// The station's walkable topology: labels as nodes, legs as undirected
/// edges. Routes are resolved by traversal, so growing the station is a
/// matter of adding locations and legs, not branches.
#[derive(Debug)]
pub struct RouteGraph {
    graph: UnGraph<String, Leg>,
    nodes: HashMap<String, NodeIndex>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            nodes: HashMap::new(),
        }
    }

    /// Ensure a node exists for the label and return its index.
    pub fn add_location(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    /// Connect two labels with a leg, replacing any existing leg between them.
    pub fn connect(&mut self, a: &str, b: &str, leg: Leg) {
        let a_idx = self.add_location(a);
        let b_idx = self.add_location(b);
        self.graph.update_edge(a_idx, b_idx, leg);
    }

    pub fn location_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn leg_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Resolve a path request into an ordered point sequence.
    ///
    /// Pure lookup + traversal: no state is touched, identical inputs always
    /// produce identical output. The traversal minimizes walked distance, so
    /// legs with intermediate geometry cost their true polyline length.
    pub fn resolve(
        &self,
        start: &str,
        end: &str,
        table: &LocationTable,
    ) -> Result<ResolvedPath, RouteError> {
        if start == end {
            return Err(RouteError::InvalidPair {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        if !table.contains(start) {
            return Err(RouteError::UnknownLocation(start.to_string()));
        }
        if !table.contains(end) {
            return Err(RouteError::UnknownLocation(end.to_string()));
        }

        let invalid_pair = || RouteError::InvalidPair {
            start: start.to_string(),
            end: end.to_string(),
        };

        // Labels can be in the table without any leg touching them.
        let start_idx = *self.nodes.get(start).ok_or_else(invalid_pair)?;
        let end_idx = *self.nodes.get(end).ok_or_else(invalid_pair)?;

        let goal = table.position(end).unwrap_or(Vec3::ZERO);
        let (_cost, node_path) = petgraph::algo::astar(
            &self.graph,
            start_idx,
            |n| n == end_idx,
            |e| self.leg_cost(e, table),
            |n| self.straight_line_to(n, goal, table),
        )
        .ok_or_else(invalid_pair)?;

        self.splice(&node_path, table)
            .and_then(ResolvedPath::new)
            .ok_or_else(invalid_pair)
    }

    /// Walked length of a leg, endpoints included.
    fn leg_cost(&self, e: petgraph::graph::EdgeReference<'_, Leg>, table: &LocationTable) -> f32 {
        let src = self.node_position(e.source(), table);
        let dst = self.node_position(e.target(), table);
        match (src, dst) {
            (Some(a), Some(b)) => chain_length(a, &e.weight().via, b),
            // A leg whose endpoint has no position cannot be walked.
            _ => f32::MAX,
        }
    }

    fn straight_line_to(&self, n: NodeIndex, goal: Vec3, table: &LocationTable) -> f32 {
        self.node_position(n, table)
            .map(|p| p.distance(goal))
            .unwrap_or(0.0)
    }

    fn node_position(&self, n: NodeIndex, table: &LocationTable) -> Option<Vec3> {
        self.graph
            .node_weight(n)
            .and_then(|name| table.position(name))
    }

    /// Expand a node path into world points, splicing each leg's via
    /// geometry in traversal order.
    fn splice(&self, node_path: &[NodeIndex], table: &LocationTable) -> Option<Vec<Vec3>> {
        let mut points = Vec::with_capacity(node_path.len());
        points.push(self.node_position(*node_path.first()?, table)?);

        for pair in node_path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let edge = self.graph.find_edge(from, to)?;
            let leg = self.graph.edge_weight(edge)?;
            let (stored_a, _stored_b) = self.graph.edge_endpoints(edge)?;

            if stored_a == from {
                points.extend(leg.via.iter().copied());
            } else {
                points.extend(leg.via.iter().rev().copied());
            }
            points.push(self.node_position(to, table)?);
        }
        Some(points)
    }
}

impl Default for RouteGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn chain_length(from: Vec3, via: &[Vec3], to: Vec3) -> f32 {
    let mut length = 0.0;
    let mut prev = from;
    for &p in via {
        length += prev.distance(p);
        prev = p;
    }
    length + prev.distance(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::location::Location;

    fn table() -> LocationTable {
        [
            Location::new("A", Vec3::new(0.0, 0.0, 0.0)),
            Location::new("B", Vec3::new(10.0, 0.0, 0.0)),
            Location::new("C", Vec3::new(20.0, 0.0, 0.0)),
            Location::new("Island", Vec3::new(0.0, 0.0, 50.0)),
        ]
        .into_iter()
        .collect()
    }

    fn graph() -> RouteGraph {
        let mut g = RouteGraph::new();
        g.connect("A", "B", Leg::direct());
        g.connect("B", "C", Leg::direct());
        g
    }

    #[test]
    fn direct_leg_resolves_to_two_points() {
        let path = graph().resolve("A", "B", &table()).unwrap();
        assert_eq!(path.points(), &[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]);
    }

    #[test]
    fn multi_leg_route_passes_through_intermediate_node() {
        let path = graph().resolve("A", "C", &table()).unwrap();
        assert_eq!(
            path.points(),
            &[
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(20.0, 0.0, 0.0)
            ]
        );
    }

    #[test]
    fn reversed_request_reverses_the_points() {
        let g = graph();
        let t = table();
        let forward = g.resolve("A", "C", &t).unwrap();
        let backward = g.resolve("C", "A", &t).unwrap();

        let mut reversed: Vec<Vec3> = forward.points().to_vec();
        reversed.reverse();
        assert_eq!(backward.points(), reversed.as_slice());
    }

    #[test]
    fn via_geometry_is_spliced_in_traversal_order() {
        let mut g = RouteGraph::new();
        let elbow = Vec3::new(5.0, 0.0, 5.0);
        g.connect("A", "B", Leg::through(vec![elbow]));

        let t = table();
        let forward = g.resolve("A", "B", &t).unwrap();
        assert_eq!(
            forward.points(),
            &[Vec3::ZERO, elbow, Vec3::new(10.0, 0.0, 0.0)]
        );

        let backward = g.resolve("B", "A", &t).unwrap();
        assert_eq!(
            backward.points(),
            &[Vec3::new(10.0, 0.0, 0.0), elbow, Vec3::ZERO]
        );
    }

    #[test]
    fn same_label_is_an_invalid_pair() {
        let err = graph().resolve("A", "A", &table()).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPair { .. }));
    }

    #[test]
    fn unknown_label_is_reported_by_name() {
        let err = graph().resolve("A", "Lift", &table()).unwrap_err();
        assert_eq!(err, RouteError::UnknownLocation("Lift".to_string()));
    }

    #[test]
    fn known_location_without_legs_has_no_route() {
        // "Island" is in the table but no leg reaches it.
        let err = graph().resolve("A", "Island", &table()).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPair { .. }));
    }

    #[test]
    fn resolve_is_idempotent() {
        let g = graph();
        let t = table();
        assert_eq!(g.resolve("A", "C", &t), g.resolve("A", "C", &t));
    }

    #[test]
    fn traversal_prefers_the_shorter_route() {
        let mut g = RouteGraph::new();
        g.connect("A", "B", Leg::direct());
        g.connect("B", "C", Leg::direct());
        // Long way around through a distant elbow.
        g.connect("A", "C", Leg::through(vec![Vec3::new(10.0, 0.0, 100.0)]));

        let path = g.resolve("A", "C", &table()).unwrap();
        assert_eq!(path.point_count(), 3);
        assert_eq!(path.points()[1], Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn resolved_path_needs_two_points() {
        assert!(ResolvedPath::new(vec![]).is_none());
        assert!(ResolvedPath::new(vec![Vec3::ZERO]).is_none());
        assert!(ResolvedPath::new(vec![Vec3::ZERO, Vec3::ONE]).is_some());
    }

    #[test]
    fn total_length_sums_segments() {
        let path = ResolvedPath::new(vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 4.0, 0.0),
        ])
        .unwrap();
        assert!((path.total_length() - 7.0).abs() < 1e-6);
    }
}
