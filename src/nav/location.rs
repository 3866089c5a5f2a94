use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A named waypoint: a label bound to one world-space position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub position: Vec3,
}

impl Location {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Ordered set of named locations with unique labels.
///
/// Order is preserved so UI dropdowns list entries the way the station
/// config declared them.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    entries: Vec<Location>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a location, rejecting duplicate labels.
    /// Returns false (and leaves the table unchanged) if the label exists.
    pub fn insert(&mut self, location: Location) -> bool {
        if self.contains(&location.name) {
            return false;
        }
        self.entries.push(location);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|l| l.name == name)
    }

    /// Position for a label, if the label is known.
    pub fn position(&self, name: &str) -> Option<Vec3> {
        self.entries
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.position)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|l| l.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Location> for LocationTable {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut table = Self::new();
        for location in iter {
            table.insert(location);
        }
        table
    }
}
