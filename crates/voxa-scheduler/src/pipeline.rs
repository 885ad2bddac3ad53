//! Chunk pipeline: drives requested chunks through generation, merge into
//! the chunk table, and meshing.
//!
//! The pipeline owns the [`ChunkTable`] and is the only writer to it.
//! Generation and meshing run on the [`Scheduler`]'s workers; when the pool
//! cannot start, the same pure functions run on the calling thread instead,
//! at most [`PipelineConfig::sync_tasks_per_tick`] jobs per [`tick`].
//!
//! A chunk is meshed as soon as its own buffer is merged, even if some
//! neighbours are still missing. Every merge bumps the versions of the
//! chunk and its neighbours, so each chunk is remeshed once its borders
//! are known.
//!
//! [`tick`]: ChunkPipeline::tick

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use voxa_mesh::{
    AtlasTable, ChunkGeometry, ChunkMeshState, GeometryPool, Lod, MeshInvalidator, mesh_chunk_into,
};
use voxa_terrain::GeneratorContext;
use voxa_voxel::{ChunkCoord, ChunkTable, Dimension, split_world};

use crate::protocol::{TaskOutput, TaskPayload};
use crate::scheduler::{Scheduler, SchedulerConfig, SubmitOutcome};

/// Pipeline construction parameters.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub scheduler: SchedulerConfig,
    pub seed: i32,
    pub dimension: Dimension,
    /// Jobs run per tick when the worker pool is unavailable.
    pub sync_tasks_per_tick: usize,
    /// Finished geometry kept for reuse.
    pub geometry_pool_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::auto(),
            seed: 42,
            dimension: Dimension::Overworld,
            sync_tasks_per_tick: 2,
            geometry_pool_capacity: 64,
        }
    }
}

/// A finished mesh for the current data of a chunk.
#[derive(Debug)]
pub struct MeshUpdate {
    pub coord: ChunkCoord,
    pub lod: Lod,
    /// Chunk version the mesh was built from.
    pub version: u64,
    pub geometry: ChunkGeometry,
}

/// What one [`ChunkPipeline::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Buffers merged into the chunk table.
    pub generated: u32,
    /// Meshes published to [`ChunkPipeline::drain_meshes`].
    pub meshed: u32,
    /// Results dropped because the chunk changed or was released meanwhile.
    pub stale: u32,
    /// Mesh jobs started or queued.
    pub remesh_requests: u32,
    /// Whether the tick ran on the synchronous fallback.
    pub degraded: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SyncJob {
    Generate(ChunkCoord),
    Mesh(ChunkCoord),
}

/// Generation → merge → meshing driver for one world.
pub struct ChunkPipeline {
    scheduler: Scheduler,
    /// Present only on the synchronous fallback.
    sync_context: Option<GeneratorContext>,
    seed: i32,
    atlas: Arc<AtlasTable>,
    table: ChunkTable,
    dimension: Dimension,
    sync_tasks_per_tick: usize,
    wanted: FxHashMap<ChunkCoord, Lod>,
    generating: FxHashSet<ChunkCoord>,
    mesh_states: FxHashMap<ChunkCoord, ChunkMeshState>,
    /// Tier and chunk version of the mesh job outstanding per chunk.
    meshing: FxHashMap<ChunkCoord, (Lod, u64)>,
    sync_queue: VecDeque<SyncJob>,
    pool: GeometryPool,
    meshes: Vec<MeshUpdate>,
}

impl ChunkPipeline {
    /// Starts the worker pool, falling back to synchronous execution if it
    /// cannot be initialised.
    pub fn new(config: PipelineConfig, atlas: Arc<AtlasTable>) -> Self {
        let mut scheduler = Scheduler::new(config.scheduler, Arc::clone(&atlas));
        scheduler.set_dimension(config.dimension);
        let ready = scheduler.init(config.seed);

        let mut pipeline = Self {
            scheduler,
            sync_context: None,
            seed: config.seed,
            atlas,
            table: ChunkTable::new(),
            dimension: config.dimension,
            sync_tasks_per_tick: config.sync_tasks_per_tick.max(1),
            wanted: FxHashMap::default(),
            generating: FxHashSet::default(),
            mesh_states: FxHashMap::default(),
            meshing: FxHashMap::default(),
            sync_queue: VecDeque::new(),
            pool: GeometryPool::new(config.geometry_pool_capacity),
            meshes: Vec::new(),
        };
        if !ready {
            pipeline.enter_degraded();
        }
        pipeline
    }

    fn enter_degraded(&mut self) {
        if self.sync_context.is_some() {
            return;
        }
        tracing::warn!(
            per_tick = self.sync_tasks_per_tick,
            "worker pool unavailable, generating and meshing synchronously"
        );
        self.scheduler.terminate();
        self.sync_context = Some(GeneratorContext::new(self.seed));

        // Work handed to the pool is lost with it.
        let mut lost: Vec<ChunkCoord> = self.generating.drain().collect();
        lost.sort_unstable();
        self.sync_queue
            .extend(lost.iter().copied().map(SyncJob::Generate));
        self.generating.extend(lost);
        for coord in self.meshing.drain().map(|(coord, _)| coord) {
            if let Some(state) = self.mesh_states.get_mut(&coord) {
                state.remesh_pending = false;
            }
        }
    }

    /// Whether the pipeline runs without worker threads.
    pub fn is_degraded(&self) -> bool {
        self.sync_context.is_some()
    }

    /// Asks for `coord` to be generated and meshed at `lod`.
    ///
    /// Requesting an already wanted chunk only updates its tier.
    pub fn request(&mut self, coord: ChunkCoord, lod: Lod) {
        self.wanted.insert(coord, lod);
        if !self.table.contains(coord) && !self.generating.contains(&coord) {
            self.start_generation(coord);
        }
    }

    /// Changes the detail tier of a wanted chunk. The new mesh replaces the
    /// old one on a later tick.
    pub fn set_lod(&mut self, coord: ChunkCoord, lod: Lod) -> bool {
        match self.wanted.get_mut(&coord) {
            Some(current) => {
                *current = lod;
                true
            }
            None => false,
        }
    }

    /// Forgets `coord`. Work already in flight for it is discarded on arrival.
    pub fn release(&mut self, coord: ChunkCoord) {
        self.wanted.remove(&coord);
        self.mesh_states.remove(&coord);
        self.meshing.remove(&coord);
        self.table.remove(coord);
        self.sync_queue.retain(|job| *job != SyncJob::Mesh(coord));
    }

    fn start_generation(&mut self, coord: ChunkCoord) {
        self.generating.insert(coord);
        if self.is_degraded() {
            self.sync_queue.push_back(SyncJob::Generate(coord));
            return;
        }
        match self.scheduler.submit(coord, TaskPayload::Generate) {
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "generation submit failed");
                self.enter_degraded();
            }
        }
    }

    /// Collects finished work, runs synchronous jobs when degraded and
    /// starts meshing for every wanted chunk whose mesh is out of date.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        if self.is_degraded() {
            self.run_sync_jobs(&mut report);
        } else {
            for completion in self.scheduler.drain_completed() {
                let coord = completion.key.coord;
                match completion.output {
                    TaskOutput::Generated(buffer) => {
                        self.generating.remove(&coord);
                        if self.wanted.contains_key(&coord) {
                            self.table.insert(coord, buffer);
                            report.generated += 1;
                        } else {
                            report.stale += 1;
                        }
                    }
                    TaskOutput::Meshed { lod, geometry } => {
                        self.finish_mesh(coord, lod, geometry, &mut report);
                    }
                }
            }
        }

        self.schedule_remeshes(&mut report);
        report.degraded = self.is_degraded();
        report
    }

    fn finish_mesh(&mut self, coord: ChunkCoord, lod: Lod, geometry: ChunkGeometry, report: &mut TickReport) {
        let Some((sent_lod, version)) = self.meshing.remove(&coord) else {
            report.stale += 1;
            self.pool.release(geometry);
            return;
        };
        let current = sent_lod == lod
            && self.wanted.get(&coord) == Some(&lod)
            && self.table.contains(coord)
            && self.table.version(coord) == version;

        let Some(state) = self.mesh_states.get_mut(&coord) else {
            report.stale += 1;
            self.pool.release(geometry);
            return;
        };
        state.remesh_pending = false;
        if !current {
            tracing::debug!(cx = coord.cx, cz = coord.cz, version, "outdated mesh dropped");
            report.stale += 1;
            self.pool.release(geometry);
            return;
        }
        state.mark_meshed(version, lod);
        report.meshed += 1;
        self.meshes.push(MeshUpdate {
            coord,
            lod,
            version,
            geometry,
        });
    }

    fn schedule_remeshes(&mut self, report: &mut TickReport) {
        let mut due: Vec<(ChunkCoord, Lod)> = self
            .wanted
            .iter()
            .filter(|(coord, _)| self.table.contains(**coord))
            .filter(|(coord, lod)| {
                self.mesh_states
                    .get(*coord)
                    .is_none_or(|state| state.needs_remesh(self.table.version(**coord), **lod))
            })
            .map(|(coord, lod)| (*coord, *lod))
            .collect();
        due.sort_unstable_by_key(|(coord, _)| *coord);

        for (coord, lod) in due {
            let version = self.table.version(coord);
            if self.is_degraded() {
                self.sync_queue.push_back(SyncJob::Mesh(coord));
            } else {
                let Some(center) = self.table.get(coord).cloned() else {
                    continue;
                };
                let payload = TaskPayload::Mesh {
                    center,
                    neighbors: self.table.neighbors(coord),
                    lod,
                };
                match self.scheduler.submit(coord, payload) {
                    Ok(SubmitOutcome::Duplicate) => continue,
                    Ok(_) => {}
                    Err(error) => {
                        tracing::warn!(%error, "mesh submit failed");
                        self.enter_degraded();
                        continue;
                    }
                }
            }
            self.meshing.insert(coord, (lod, version));
            self.mesh_states.entry(coord).or_default().remesh_pending = true;
            report.remesh_requests += 1;
        }
    }

    fn run_sync_jobs(&mut self, report: &mut TickReport) {
        for _ in 0..self.sync_tasks_per_tick {
            let Some(job) = self.sync_queue.pop_front() else {
                break;
            };
            match job {
                SyncJob::Generate(coord) => {
                    self.generating.remove(&coord);
                    if !self.wanted.contains_key(&coord) || self.table.contains(coord) {
                        continue;
                    }
                    let Some(context) = self.sync_context.as_ref() else {
                        continue;
                    };
                    let buffer = context.generate(coord, self.dimension);
                    self.table.insert(coord, buffer);
                    report.generated += 1;
                }
                SyncJob::Mesh(coord) => {
                    let Some(&(lod, _)) = self.meshing.get(&coord) else {
                        continue;
                    };
                    let Some(center) = self.table.get(coord).cloned() else {
                        self.meshing.remove(&coord);
                        continue;
                    };
                    // Meshes whatever is current now; the version is re-read
                    // so edits made since scheduling are included.
                    let version = self.table.version(coord);
                    self.meshing.insert(coord, (lod, version));
                    let neighbors = self.table.neighbors(coord);
                    let refs = neighbors.each_ref().map(|n| n.as_deref());
                    let mut geometry = self.pool.acquire();
                    mesh_chunk_into(&center, &refs, lod, &self.atlas, &mut geometry);
                    self.finish_mesh(coord, lod, geometry, report);
                }
            }
        }
    }

    /// Takes every mesh published since the last call.
    pub fn drain_meshes(&mut self) -> Vec<MeshUpdate> {
        std::mem::take(&mut self.meshes)
    }

    /// Returns finished geometry for reuse by synchronous meshing.
    pub fn recycle(&mut self, geometry: ChunkGeometry) {
        self.pool.release(geometry);
    }

    /// Switches every wanted chunk to `dimension`.
    ///
    /// Loaded chunks and meshes are dropped and regenerated; results still
    /// arriving for the previous dimension are discarded by the scheduler.
    pub fn set_dimension(&mut self, dimension: Dimension) {
        if dimension == self.dimension {
            return;
        }
        self.dimension = dimension;
        self.scheduler.set_dimension(dimension);
        self.table.clear();
        self.mesh_states.clear();
        self.meshing.clear();
        self.generating.clear();
        self.sync_queue.clear();
        for update in std::mem::take(&mut self.meshes) {
            self.pool.release(update.geometry);
        }

        let mut coords: Vec<ChunkCoord> = self.wanted.keys().copied().collect();
        coords.sort_unstable();
        for coord in coords {
            self.start_generation(coord);
        }
    }

    /// Writes one cell and marks the meshes it affects as out of date.
    ///
    /// Returns the loaded chunks that need remeshing, edited chunk first;
    /// empty if the chunk is not loaded, `wy` is out of range or the cell
    /// already holds `raw`.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, raw: u16) -> Vec<ChunkCoord> {
        match self.table.get_block(wx, wy, wz) {
            Some(existing) if existing != raw => {}
            _ => return Vec::new(),
        }
        if !self.table.set_block(wx, wy, wz, raw) {
            return Vec::new();
        }
        let (cx, lx) = split_world(wx);
        let (cz, lz) = split_world(wz);
        let edited = ChunkCoord::new(cx, cz);

        let mut dirty = MeshInvalidator::invalidate(edited, (lx, lz));
        dirty.retain(|coord| self.table.contains(*coord));
        for coord in dirty.iter().skip(1) {
            self.table.touch(*coord);
        }
        dirty
    }

    /// `true` when nothing is in flight and every wanted chunk has a mesh of
    /// its current data.
    pub fn is_idle(&self) -> bool {
        self.generating.is_empty()
            && self.meshing.is_empty()
            && self.sync_queue.is_empty()
            && self.wanted.iter().all(|(coord, lod)| {
                self.table.contains(*coord)
                    && self
                        .mesh_states
                        .get(coord)
                        .is_some_and(|state| !state.is_stale(self.table.version(*coord), *lod))
            })
    }

    /// Stops the worker pool. The pipeline keeps working synchronously.
    pub fn shutdown(&mut self) {
        self.scheduler.terminate();
    }

    pub fn table(&self) -> &ChunkTable {
        &self.table
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn wanted_count(&self) -> usize {
        self.wanted.len()
    }

    pub fn geometry_pool(&self) -> &GeometryPool {
        &self.pool
    }
}
