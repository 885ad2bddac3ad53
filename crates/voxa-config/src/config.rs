//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use voxa_voxel::Dimension;

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World seed and starting dimension.
    pub world: WorldConfig,
    /// Worker pool sizing.
    pub workers: WorkerConfig,
    /// Meshing detail tiers and geometry reuse.
    pub meshing: MeshingConfig,
    /// Chunk streaming around the viewer.
    pub streaming: StreamingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Generation seed shared by every worker.
    pub seed: i32,
    /// Dimension streamed at startup.
    pub dimension: Dimension,
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker threads; 0 picks `num_cpus - 2` (at least one).
    pub pool_size: usize,
    /// In-flight task cap per worker.
    pub in_flight_multiplier: usize,
    /// Jobs run per tick when the pool is unavailable.
    pub sync_tasks_per_tick: usize,
    /// Warn about tasks dispatched longer than this many seconds; 0 disables.
    pub stall_warning_secs: u64,
}

/// Meshing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshingConfig {
    /// Chunk distance from which meshes skip ambient occlusion.
    pub lod1_distance: u32,
    /// Chunk distance from which decorative blocks are dropped.
    pub lod2_distance: u32,
    /// Finished geometry buffers kept for reuse.
    pub geometry_pool_capacity: usize,
}

/// Streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chebyshev radius, in chunks, of the square kept loaded.
    pub view_radius: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter override (e.g. "debug", "info,voxa_scheduler=trace").
    pub log_level: String,
    /// Write a JSON log file next to the config.
    pub log_to_file: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dimension: Dimension::Overworld,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool_size: 0,
            in_flight_multiplier: 4,
            sync_tasks_per_tick: 2,
            stall_warning_secs: 30,
        }
    }
}

impl Default for MeshingConfig {
    fn default() -> Self {
        Self {
            lod1_distance: 4,
            lod2_distance: 8,
            geometry_pool_capacity: 64,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { view_radius: 6 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Reads `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let defaults = Self::default();
            defaults.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(defaults);
        }
        let config = Self::read_file(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Re-reads `config.ron`; `Some` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_file(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    /// Worker count with 0 resolved against the available cores.
    pub fn resolved_pool_size(&self, available_cores: usize) -> usize {
        if self.workers.pool_size > 0 {
            self.workers.pool_size
        } else {
            available_cores.saturating_sub(2).max(1)
        }
    }
}
