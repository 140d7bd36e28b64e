mod scenes;

use std::collections::BTreeSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use hexmesh_mesh_cpu::{ChunkMeshBuilder, MeshStats, MesherConfig};
use hexmesh_runtime::{ChunkRevisions, MeshReady, Runtime};
use hexmesh_voxel::{ChunkCoord, VoxelGrid};

use crate::scenes::{Scene, build_scene};

const DEFAULT_CONFIG: &str = "hexmesh.toml";

#[derive(Parser, Debug)]
#[command(name = "hexmesh", about = "Mesh hexagonal-prism voxel chunks and report stats")]
struct Cli {
    /// TOML config; falls back to ./hexmesh.toml, then built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixture scene to mesh
    #[arg(long, value_enum, default_value_t = Scene::Terraces)]
    scene: Scene,
    /// Override the hex circumradius
    #[arg(long)]
    radius: Option<f32>,
    /// Override the worker count (0 = available parallelism)
    #[arg(long)]
    workers: Option<usize>,
}

fn load_config(cli: &Cli) -> Result<MesherConfig, Box<dyn Error>> {
    let mut cfg = match &cli.config {
        Some(path) => MesherConfig::from_path(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => MesherConfig::from_path(DEFAULT_CONFIG)?,
        None => MesherConfig::default(),
    };
    if let Some(radius) = cli.radius {
        cfg.hex.radius = radius;
    }
    if let Some(workers) = cli.workers {
        cfg.mesher.workers = workers;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn scene_chunks(grid: &VoxelGrid, cfg: &MesherConfig) -> BTreeSet<ChunkCoord> {
    grid.iter()
        .filter(|v| v.occupancy.is_solid())
        .map(|v| ChunkCoord::from_voxel(v.coord, cfg.chunk))
        .collect()
}

/// Blocks until `n` results arrive, dropping stale ones.
fn receive(rt: &Runtime, revs: &ChunkRevisions, n: usize) -> Vec<MeshReady> {
    let mut out = Vec::with_capacity(n);
    let mut seen = 0;
    while seen < n {
        let Some(ready) = rt.wait_ready(Duration::from_secs(30)) else {
            log::warn!("gave up waiting: {} of {} results", seen, n);
            break;
        };
        seen += 1;
        if revs.accept(&ready) {
            out.push(ready);
        }
    }
    out
}

fn report(ready: &MeshReady) {
    let s = &ready.mesh.stats;
    log::info!(
        "chunk ({}, {}) kind={:?} faces={} regions={} loops={} holes={} dropped={} tris={} verts={} ms={}",
        ready.chunk.cq,
        ready.chunk.cr,
        ready.kind,
        s.exposed_faces,
        s.regions,
        s.loops,
        s.holes_bridged,
        s.dropped,
        s.triangles,
        s.vertices,
        ready.t_mesh_ms
    );
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(&cli)?;
    log::info!(
        "config R={} H={} chunk={}x{} holes={:?} workers={}",
        cfg.hex.radius,
        cfg.hex.height,
        cfg.chunk.size,
        cfg.chunk.height,
        cfg.mesher.hole_policy,
        cfg.mesher.workers
    );

    let mut grid = build_scene(cli.scene, cfg.chunk);
    let chunks = scene_chunks(&grid, &cfg);
    log::info!(
        "scene {:?} voxels={} chunks={}",
        cli.scene,
        grid.solid_count(),
        chunks.len()
    );

    let rt = Runtime::new(ChunkMeshBuilder::new(&cfg), cfg.mesher.workers);
    let mut revs = ChunkRevisions::new();
    let t0 = Instant::now();
    for &chunk in &chunks {
        let rev = revs.bump(chunk);
        rt.submit_bg(rt.job_for(&grid, chunk, rev));
    }
    let mut total = MeshStats::default();
    for ready in receive(&rt, &revs, chunks.len()) {
        report(&ready);
        total.accumulate(&ready.mesh.stats);
    }
    log::info!(
        "done chunks={} tris={} verts={} dropped={} ms={}",
        chunks.len(),
        total.triangles,
        total.vertices,
        total.dropped,
        t0.elapsed().as_millis()
    );

    // Carve the lowest solid voxel of the first chunk and rebuild it on the edit lane.
    if let Some(&chunk) = chunks.first() {
        let target = grid
            .iter()
            .filter(|v| v.occupancy.is_solid() && ChunkCoord::from_voxel(v.coord, cfg.chunk) == chunk)
            .map(|v| v.coord)
            .min_by_key(|c| (c.z, c.q, c.r));
        if let Some(coord) = target {
            grid.remove(coord);
            let rev = revs.bump(chunk);
            rt.submit_edit(rt.job_for(&grid, chunk, rev));
            for ready in receive(&rt, &revs, 1) {
                report(&ready);
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("hexmesh: {e}");
        std::process::exit(1);
    }
}
