use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::location::{Location, LocationTable};
use super::route::{Leg, RouteGraph};

/// One leg in a station file: two labels plus optional intermediate
/// geometry in from→to order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegEntry {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<Vec3>,
}

/// A complete station description: the named waypoints and the legs that
/// connect them. Loadable from JSON so a different station is a data change,
/// not a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMap {
    pub name: String,
    pub locations: Vec<Location>,
    pub legs: Vec<LegEntry>,
}

impl StationMap {
    /// The station compiled into the binary, used when no file is given.
    pub fn bundled() -> Self {
        Self {
            name: "Railway Station".to_string(),
            locations: vec![
                Location::new("Ticket Counter", Vec3::new(-36.918, 0.1, 8.65)),
                Location::new("Bypass", Vec3::new(-37.598, 0.1, -0.277)),
                Location::new("Stair", Vec3::new(59.56, 0.1, -0.735)),
            ],
            legs: vec![
                LegEntry {
                    from: "Ticket Counter".to_string(),
                    to: "Bypass".to_string(),
                    via: Vec::new(),
                },
                LegEntry {
                    from: "Bypass".to_string(),
                    to: "Stair".to_string(),
                    via: Vec::new(),
                },
            ],
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read station file: {:?}", path))?;
        Self::from_json(&text).context(format!("Failed to parse station file: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let station: Self = serde_json::from_str(text)?;
        Ok(station)
    }

    /// Validate the description and turn it into lookup table plus route
    /// graph. Duplicate labels and legs naming unknown labels are rejected.
    pub fn build(&self) -> Result<(LocationTable, RouteGraph)> {
        let mut table = LocationTable::new();
        for location in &self.locations {
            if !table.insert(location.clone()) {
                bail!("Station {:?} defines location {:?} twice", self.name, location.name);
            }
        }

        let mut graph = RouteGraph::new();
        for location in &self.locations {
            graph.add_location(&location.name);
        }
        for leg in &self.legs {
            for label in [&leg.from, &leg.to] {
                if !table.contains(label) {
                    bail!(
                        "Station {:?} has a leg touching unknown location {:?}",
                        self.name,
                        label
                    );
                }
            }
            if leg.from == leg.to {
                bail!(
                    "Station {:?} has a leg from {:?} to itself",
                    self.name,
                    leg.from
                );
            }
            graph.connect(&leg.from, &leg.to, Leg::through(leg.via.clone()));
        }

        Ok((table, graph))
    }
}

impl Default for StationMap {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_station_builds() {
        let (table, graph) = StationMap::bundled().build().unwrap();

        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, ["Ticket Counter", "Bypass", "Stair"]);
        assert_eq!(graph.location_count(), 3);
        assert_eq!(graph.leg_count(), 2);
    }

    #[test]
    fn bundled_route_passes_through_the_bypass() {
        let (table, graph) = StationMap::bundled().build().unwrap();
        let path = graph.resolve("Ticket Counter", "Stair", &table).unwrap();

        assert_eq!(
            path.points(),
            &[
                Vec3::new(-36.918, 0.1, 8.65),
                Vec3::new(-37.598, 0.1, -0.277),
                Vec3::new(59.56, 0.1, -0.735),
            ]
        );
    }

    #[test]
    fn station_survives_a_json_round_trip() {
        let station = StationMap::bundled();
        let text = serde_json::to_string_pretty(&station).unwrap();
        let reloaded = StationMap::from_json(&text).unwrap();

        assert_eq!(reloaded.name, station.name);
        assert_eq!(reloaded.locations, station.locations);
        assert_eq!(reloaded.legs.len(), station.legs.len());
    }

    #[test]
    fn via_points_survive_json() {
        let text = r#"{
            "name": "Test Halt",
            "locations": [
                { "name": "A", "position": [0.0, 0.0, 0.0] },
                { "name": "B", "position": [10.0, 0.0, 0.0] }
            ],
            "legs": [
                { "from": "A", "to": "B", "via": [[5.0, 0.0, 5.0]] }
            ]
        }"#;

        let (table, graph) = StationMap::from_json(text).unwrap().build().unwrap();
        let path = graph.resolve("A", "B", &table).unwrap();
        assert_eq!(path.points()[1], Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn duplicate_location_is_rejected() {
        let mut station = StationMap::bundled();
        station
            .locations
            .push(Location::new("Stair", Vec3::ZERO));

        let err = station.build().unwrap_err();
        assert!(err.to_string().contains("Stair"));
    }

    #[test]
    fn leg_with_unknown_label_is_rejected() {
        let mut station = StationMap::bundled();
        station.legs.push(LegEntry {
            from: "Stair".to_string(),
            to: "Lift".to_string(),
            via: Vec::new(),
        });

        let err = station.build().unwrap_err();
        assert!(err.to_string().contains("Lift"));
    }

    #[test]
    fn self_leg_is_rejected() {
        let mut station = StationMap::bundled();
        station.legs.push(LegEntry {
            from: "Stair".to_string(),
            to: "Stair".to_string(),
            via: Vec::new(),
        });

        assert!(station.build().is_err());
    }
}
