//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use voxa_voxel::Dimension;

use crate::Config;

/// Voxa command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "voxa", about = "Voxa procedural world engine")]
pub struct CliArgs {
    /// World seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    /// Dimension to stream (overworld, nether, end).
    #[arg(long, value_parser = parse_dimension)]
    pub dimension: Option<Dimension>,

    /// Worker threads (0 = auto).
    #[arg(long)]
    pub workers: Option<usize>,

    /// View radius in chunks.
    #[arg(long)]
    pub view_radius: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_dimension(name: &str) -> Result<Dimension, String> {
    Dimension::from_name(&name.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown dimension `{name}`, expected overworld, nether or end"))
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(dimension) = args.dimension {
            self.world.dimension = dimension;
        }
        if let Some(workers) = args.workers {
            self.workers.pool_size = workers;
        }
        if let Some(radius) = args.view_radius {
            self.streaming.view_radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(-5),
            dimension: Some(Dimension::End),
            view_radius: Some(2),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, -5);
        assert_eq!(config.world.dimension, Dimension::End);
        assert_eq!(config.streaming.view_radius, 2);
        // Non-overridden fields retain defaults
        assert_eq!(config.workers.pool_size, 0);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_from_args() {
        let args = CliArgs::try_parse_from([
            "voxa",
            "--seed",
            "-42",
            "--dimension",
            "Nether",
            "--workers",
            "3",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(-42));
        assert_eq!(args.dimension, Some(Dimension::Nether));
        assert_eq!(args.workers, Some(3));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_unknown_dimension_rejected() {
        let result = CliArgs::try_parse_from(["voxa", "--dimension", "aether"]);
        assert!(result.is_err());
    }
}
