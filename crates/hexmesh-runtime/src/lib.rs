//! Mesh job queues and worker orchestration.
#![forbid(unsafe_code)]

mod revisions;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use hexmesh_mesh_cpu::{ChunkMesh, ChunkMeshBuilder};
use hexmesh_voxel::{ChunkBounds, ChunkCoord, ChunkOccupancy, VoxelGrid};
use rayon::{ThreadPool, ThreadPoolBuilder};

pub use revisions::ChunkRevisions;

/// One chunk to mesh from an immutable snapshot (interior plus apron).
#[derive(Clone, Debug)]
pub struct MeshJob {
    pub chunk: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
    pub snapshot: Arc<VoxelGrid>,
}

#[derive(Clone, Debug)]
pub struct MeshReady {
    pub chunk: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
    pub kind: JobKind,
    pub occupancy: ChunkOccupancy,
    pub mesh: ChunkMesh,
    pub t_mesh_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Edit,
    Bg,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub edit_queued: usize,
    pub edit_inflight: usize,
    pub bg_queued: usize,
    pub bg_inflight: usize,
}

impl QueueCounts {
    pub fn pending(&self) -> usize {
        self.edit_queued + self.edit_inflight + self.bg_queued + self.bg_inflight
    }
}

#[derive(Default)]
struct LaneCounters {
    queued: AtomicUsize,
    inflight: AtomicUsize,
}

/// Everything a worker needs to run a job; shared by all lanes.
struct Worker {
    builder: Arc<ChunkMeshBuilder>,
    tx: Sender<MeshReady>,
}

impl Worker {
    fn run(&self, job: MeshJob, kind: JobKind, lane: &LaneCounters) {
        lane.queued.fetch_sub(1, Ordering::Relaxed);
        lane.inflight.fetch_add(1, Ordering::Relaxed);
        let ready = process_mesh_job(job, kind, &self.builder);
        lane.inflight.fetch_sub(1, Ordering::Relaxed);
        let _ = self.tx.send(ready);
    }
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_mesh_job(job: MeshJob, kind: JobKind, builder: &ChunkMeshBuilder) -> MeshReady {
    let MeshJob {
        chunk,
        rev,
        job_id,
        snapshot,
    } = job;
    let occupancy = snapshot.occupancy_in(&ChunkBounds::interior(chunk, builder.dims()));
    let t0 = Instant::now();
    let mesh = if occupancy.has_voxels() {
        builder.build(snapshot.as_ref(), chunk)
    } else {
        ChunkMesh::empty(chunk)
    };
    let t_mesh_ms = elapsed_ms(t0);
    log::debug!(
        target: "runtime",
        "job done id={} kind={:?} cq={} cr={} rev={} tris={} ms={}",
        job_id,
        kind,
        chunk.cq,
        chunk.cr,
        rev,
        mesh.stats.triangles,
        t_mesh_ms
    );
    MeshReady {
        chunk,
        rev,
        job_id,
        kind,
        occupancy,
        mesh,
        t_mesh_ms,
    }
}

fn build_pool(lane: &'static str, threads: usize) -> Option<Arc<ThreadPool>> {
    if threads == 0 {
        return None;
    }
    match ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("hexmesh-{lane}-{i}"))
        .build()
    {
        Ok(pool) => Some(Arc::new(pool)),
        Err(e) => {
            log::warn!(target: "runtime", "{} pool unavailable threads={}: {}", lane, threads, e);
            None
        }
    }
}

/// Two lanes: `edit` (one worker, voxel-edit rebuilds) and `bg` (the rest, chunk loads).
/// Background workers pick up edit jobs first whenever both are queued.
pub struct Runtime {
    job_tx_edit: Sender<MeshJob>,
    job_tx_bg: Sender<MeshJob>,
    res_rx: Receiver<MeshReady>,
    _edit_pool: Option<Arc<ThreadPool>>,
    bg_pool: Option<Arc<ThreadPool>>,
    q_edit: Arc<LaneCounters>,
    q_bg: Arc<LaneCounters>,
    next_job_id: AtomicU64,
    // used when no pool could be built
    inline: Worker,
    pub w_edit: usize,
    pub w_bg: usize,
}

impl Runtime {
    /// `workers == 0` sizes the lanes from available parallelism.
    pub fn new(builder: ChunkMeshBuilder, workers: usize) -> Self {
        let builder = Arc::new(builder);
        let (job_tx_edit, job_rx_edit) = unbounded::<MeshJob>();
        let (job_tx_bg, job_rx_bg) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<MeshReady>();

        let worker_count = if workers > 0 {
            workers
        } else {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        };
        let q_edit = Arc::new(LaneCounters::default());
        let q_bg = Arc::new(LaneCounters::default());

        let edit_pool = build_pool("edit", 1);
        if let Some(pool) = &edit_pool {
            let rx = job_rx_edit.clone();
            let worker = Worker {
                builder: Arc::clone(&builder),
                tx: res_tx.clone(),
            };
            let q_edit = Arc::clone(&q_edit);
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    worker.run(job, JobKind::Edit, &q_edit);
                }
            });
        }
        let w_edit = usize::from(edit_pool.is_some());

        let bg_threads = if edit_pool.is_some() {
            worker_count.saturating_sub(1)
        } else {
            worker_count
        };
        let bg_pool = build_pool("bg", bg_threads);
        if let Some(pool) = &bg_pool {
            for _ in 0..bg_threads {
                let bg_rx = job_rx_bg.clone();
                let edit_rx = job_rx_edit.clone();
                let worker = Worker {
                    builder: Arc::clone(&builder),
                    tx: res_tx.clone(),
                };
                let q_edit = Arc::clone(&q_edit);
                let q_bg = Arc::clone(&q_bg);
                pool.spawn(move || {
                    loop {
                        if let Ok(job) = edit_rx.try_recv() {
                            worker.run(job, JobKind::Edit, &q_edit);
                            continue;
                        }
                        select! {
                            recv(edit_rx) -> res => match res {
                                Ok(job) => worker.run(job, JobKind::Edit, &q_edit),
                                Err(_) => {
                                    while let Ok(job) = bg_rx.recv() {
                                        worker.run(job, JobKind::Bg, &q_bg);
                                    }
                                    break;
                                }
                            },
                            recv(bg_rx) -> res => match res {
                                Ok(job) => worker.run(job, JobKind::Bg, &q_bg),
                                Err(_) => {
                                    while let Ok(job) = edit_rx.recv() {
                                        worker.run(job, JobKind::Edit, &q_edit);
                                    }
                                    break;
                                }
                            },
                        }
                    }
                });
            }
        }
        let w_bg = if bg_pool.is_some() { bg_threads } else { 0 };
        if w_edit + w_bg == 0 {
            log::warn!(target: "runtime", "no worker pools; meshing on the submitting thread");
        }
        log::info!(target: "runtime", "runtime up w_edit={} w_bg={}", w_edit, w_bg);

        Self {
            job_tx_edit,
            job_tx_bg,
            res_rx,
            _edit_pool: edit_pool,
            bg_pool,
            q_edit,
            q_bg,
            next_job_id: AtomicU64::new(1),
            inline: Worker {
                builder,
                tx: res_tx,
            },
            w_edit,
            w_bg,
        }
    }

    pub fn builder(&self) -> &ChunkMeshBuilder {
        &self.inline.builder
    }

    /// Snapshots `chunk` out of `grid` and tags it with a fresh job id.
    pub fn job_for(&self, grid: &VoxelGrid, chunk: ChunkCoord, rev: u64) -> MeshJob {
        MeshJob {
            chunk,
            rev,
            job_id: self.next_job_id.fetch_add(1, Ordering::Relaxed),
            snapshot: Arc::new(grid.snapshot(chunk, self.builder().dims())),
        }
    }

    fn has_workers(&self) -> bool {
        self.w_edit + self.w_bg > 0
    }

    pub fn submit_edit(&self, job: MeshJob) {
        self.q_edit.queued.fetch_add(1, Ordering::Relaxed);
        if !self.has_workers() {
            self.inline.run(job, JobKind::Edit, &self.q_edit);
            return;
        }
        if self.job_tx_edit.send(job).is_err() {
            self.q_edit.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn submit_bg(&self, job: MeshJob) {
        if self.bg_pool.is_none() {
            self.submit_edit(job);
            return;
        }
        self.q_bg.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_bg.send(job).is_err() {
            self.q_bg.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn drain_ready(&self) -> Vec<MeshReady> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks for the next result, up to `timeout`.
    pub fn wait_ready(&self, timeout: Duration) -> Option<MeshReady> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    pub fn queue_counts(&self) -> QueueCounts {
        QueueCounts {
            edit_queued: self.q_edit.queued.load(Ordering::Relaxed),
            edit_inflight: self.q_edit.inflight.load(Ordering::Relaxed),
            bg_queued: self.q_bg.queued.load(Ordering::Relaxed),
            bg_inflight: self.q_bg.inflight.load(Ordering::Relaxed),
        }
    }
}
