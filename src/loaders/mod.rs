pub mod gltf;

pub use gltf::{load_station_model, StationModel};
