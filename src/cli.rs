// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "station-nav")]
#[command(about = "Railway station wayfinding viewer", long_about = None)]
pub struct Cli {
    /// Path to the station model (.glb/.gltf); the scene stays empty when omitted
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Path to a station description JSON; the bundled station is used when omitted
    #[arg(long)]
    pub station: Option<PathBuf>,

    /// Disable the navigation overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Marker advance per frame, in segments
    #[arg(long)]
    pub step: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_optional() {
        let cli = Cli::try_parse_from(["station-nav"]).unwrap();
        assert!(cli.model.is_none());
        assert!(cli.station.is_none());
        assert!(!cli.no_ui);
        assert!(cli.step.is_none());
    }

    #[test]
    fn flags_parse_together() {
        let cli = Cli::try_parse_from([
            "station-nav",
            "--model",
            "railway_station.glb",
            "--no-ui",
            "--step",
            "0.01",
        ])
        .unwrap();
        assert_eq!(cli.model.unwrap(), PathBuf::from("railway_station.glb"));
        assert!(cli.no_ui);
        assert_eq!(cli.step.unwrap(), 0.01);
    }
}
