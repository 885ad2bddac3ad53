//! Headless voxa binary.
//!
//! Loads `config.ron`, applies CLI overrides, then streams the square of
//! chunks within the view radius of the origin through the chunk pipeline
//! and prints generation and meshing statistics.
//!
//! Run with `cargo run -p voxa-app -- --seed 7 --dimension nether --view-radius 4`.

mod platform;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};
use voxa_config::{CliArgs, Config};
use voxa_mesh::{AtlasTable, Lod};
use voxa_scheduler::{ChunkPipeline, PipelineConfig, SchedulerConfig};
use voxa_voxel::ChunkCoord;

use crate::platform::PlatformDirs;

const ATLAS_FILE: &str = "atlas.ron";
const TICK_INTERVAL: Duration = Duration::from_millis(2);

#[derive(Debug, Default)]
struct StreamReport {
    chunks: usize,
    meshes: u64,
    stale: u64,
    ticks: u64,
    solid_vertices: usize,
    liquid_vertices: usize,
    per_lod: [usize; 3],
}

fn main() {
    let args = CliArgs::parse();

    let dirs = match args.config.as_deref() {
        Some(dir) => PlatformDirs::from_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                std::process::exit(1);
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create directories: {e}");
        std::process::exit(1);
    }

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let debug_build = cfg!(debug_assertions) || config.debug.log_to_file;
    voxa_log::init_logging(Some(&dirs.log_dir), debug_build, Some(&config));

    let atlas = Arc::new(load_atlas(&dirs.config_dir));
    let mut pipeline = ChunkPipeline::new(pipeline_config(&config, num_cpus::get()), atlas);
    info!(
        seed = config.world.seed,
        dimension = %config.world.dimension,
        radius = config.streaming.view_radius,
        degraded = pipeline.is_degraded(),
        "streaming started"
    );

    let started = Instant::now();
    let report = stream(&mut pipeline, &config);
    let elapsed = started.elapsed();
    let stats = pipeline.scheduler().stats();

    println!("voxa: {} {}", config.world.dimension, config.world.seed);
    println!("  chunks:          {}", report.chunks);
    println!("  meshes:          {} ({} stale)", report.meshes, report.stale);
    println!(
        "  lod full/reduced/far: {}/{}/{}",
        report.per_lod[0], report.per_lod[1], report.per_lod[2]
    );
    println!("  solid vertices:  {}", report.solid_vertices);
    println!("  liquid vertices: {}", report.liquid_vertices);
    println!("  ticks:           {}", report.ticks);
    println!("  elapsed:         {:.2?}", elapsed);
    println!(
        "  tasks:           {} dispatched, {} duplicates, {} stale",
        stats.dispatched, stats.duplicates, stats.stale_discarded
    );

    pipeline.shutdown();
}

/// Reads `atlas.ron` from the config directory, or lays every block out on
/// a 16-tile grid.
fn load_atlas(config_dir: &Path) -> AtlasTable {
    let fallback = AtlasTable::default();
    let path = config_dir.join(ATLAS_FILE);
    let Ok(source) = std::fs::read_to_string(&path) else {
        return fallback;
    };
    match AtlasTable::from_ron_str(&source, fallback.missing()) {
        Ok(atlas) => {
            info!(path = %path.display(), entries = atlas.len(), "atlas loaded");
            atlas
        }
        Err(error) => {
            warn!(%error, path = %path.display(), "atlas unreadable, using grid layout");
            fallback
        }
    }
}

fn pipeline_config(config: &Config, available_cores: usize) -> PipelineConfig {
    let pool_size = config.resolved_pool_size(available_cores);
    let stall_warning = (config.workers.stall_warning_secs > 0)
        .then(|| Duration::from_secs(config.workers.stall_warning_secs));
    PipelineConfig {
        scheduler: SchedulerConfig {
            pool_size,
            max_in_flight: (pool_size * config.workers.in_flight_multiplier).max(1),
            stall_warning,
        },
        seed: config.world.seed,
        dimension: config.world.dimension,
        sync_tasks_per_tick: config.workers.sync_tasks_per_tick,
        geometry_pool_capacity: config.meshing.geometry_pool_capacity,
    }
}

/// Chunks within `radius` of the origin, nearest first, with their tier.
fn view_square(config: &Config) -> Vec<(ChunkCoord, Lod)> {
    let radius = config.streaming.view_radius as i32;
    let origin = ChunkCoord::new(0, 0);
    let mut coords: Vec<(ChunkCoord, Lod)> = (-radius..=radius)
        .flat_map(|cz| (-radius..=radius).map(move |cx| ChunkCoord::new(cx, cz)))
        .map(|coord| {
            let distance = coord.chebyshev(origin);
            let lod = Lod::for_distance(
                distance,
                config.meshing.lod1_distance,
                config.meshing.lod2_distance,
            );
            (coord, lod)
        })
        .collect();
    coords.sort_by_key(|(coord, _)| (coord.chebyshev(origin), *coord));
    coords
}

fn stream(pipeline: &mut ChunkPipeline, config: &Config) -> StreamReport {
    let wanted = view_square(config);
    let mut report = StreamReport {
        chunks: wanted.len(),
        ..StreamReport::default()
    };
    for (coord, lod) in wanted {
        pipeline.request(coord, lod);
    }

    let mut latest: HashMap<ChunkCoord, (Lod, usize, usize)> = HashMap::new();
    loop {
        let tick = pipeline.tick();
        report.ticks += 1;
        report.stale += u64::from(tick.stale);
        for update in pipeline.drain_meshes() {
            report.meshes += 1;
            latest.insert(
                update.coord,
                (
                    update.lod,
                    update.geometry.solid.vertex_count(),
                    update.geometry.liquid.vertex_count(),
                ),
            );
            pipeline.recycle(update.geometry);
        }
        if pipeline.is_idle() {
            break;
        }
        if !pipeline.is_degraded() {
            std::thread::sleep(TICK_INTERVAL);
        }
    }

    for (lod, solid, liquid) in latest.values() {
        report.per_lod[lod.level() as usize] += 1;
        report.solid_vertices += solid;
        report.liquid_vertices += liquid;
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_square_tiers() {
        let mut config = Config::default();
        config.streaming.view_radius = 3;
        config.meshing.lod1_distance = 2;
        config.meshing.lod2_distance = 3;
        let square = view_square(&config);
        assert_eq!(square.len(), 49);
        assert_eq!(square[0], (ChunkCoord::new(0, 0), Lod::Full));
        let far = square.iter().filter(|(_, lod)| *lod == Lod::Far).count();
        assert_eq!(far, 49 - 25, "outer ring is far");
    }

    #[test]
    fn test_pipeline_config_from_config() {
        let mut config = Config::default();
        config.workers.pool_size = 3;
        config.workers.stall_warning_secs = 0;
        let pc = pipeline_config(&config, 16);
        assert_eq!(pc.scheduler.pool_size, 3);
        assert_eq!(pc.scheduler.max_in_flight, 12);
        assert!(pc.scheduler.stall_warning.is_none());
        assert_eq!(pc.seed, 42);
    }

    #[test]
    fn test_missing_atlas_file_uses_grid() {
        let tmp = tempfile::tempdir().unwrap();
        let atlas = load_atlas(tmp.path());
        assert_eq!(atlas.len(), AtlasTable::default().len());
    }

    #[test]
    fn test_degraded_stream_completes() {
        let mut config = Config::default();
        config.streaming.view_radius = 1;
        let mut pc = pipeline_config(&config, 4);
        pc.scheduler.pool_size = 0;
        let mut pipeline = ChunkPipeline::new(pc, Arc::new(AtlasTable::default()));
        let report = stream(&mut pipeline, &config);
        assert_eq!(report.chunks, 9);
        assert_eq!(report.per_lod.iter().sum::<usize>(), 9);
        assert!(report.solid_vertices > 0);
    }
}
