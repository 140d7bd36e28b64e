use std::cell::Cell;
use std::time::Instant;

use hashbrown::HashSet;
use hexmesh_hex::{Axial, HexDir, HexLayout};
use hexmesh_voxel::{ChunkBounds, ChunkCoord, ChunkDims, VoxelQuery};

use crate::boundary::{side_run_bounds, trace_region};
use crate::chunk::{ChunkMesh, MeshStats};
use crate::config::MesherConfig;
use crate::constants::MIN_QUAD_RESERVE;
use crate::emit::{emit_polygon, emit_side_run};
use crate::face::Face;
use crate::mesh_build::MeshBuffers;
use crate::polygon::{HolePolicy, resolve_polygons};
use crate::regions::merge_regions;
use crate::triangulate::{Winding, triangulate};
use crate::visibility::{ExposedFaces, classify_faces};

thread_local! {
    static LAST_MESH_RESERVE: Cell<usize> = const { Cell::new(MIN_QUAD_RESERVE) };
}

#[derive(Default)]
struct MesherPerf {
    classify_ms: u32,
    caps_ms: u32,
    sides_ms: u32,
    total_ms: u32,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Meshes one chunk at a time from a voxel snapshot. Cheap to clone and share.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMeshBuilder {
    layout: HexLayout,
    dims: ChunkDims,
    hole_policy: HolePolicy,
}

impl ChunkMeshBuilder {
    pub fn new(cfg: &MesherConfig) -> Self {
        Self::from_parts(cfg.hex, cfg.chunk, cfg.mesher.hole_policy)
    }

    pub fn from_parts(layout: HexLayout, dims: ChunkDims, hole_policy: HolePolicy) -> Self {
        Self {
            layout,
            dims,
            hole_policy,
        }
    }

    #[inline]
    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    pub fn hole_policy(&self) -> HolePolicy {
        self.hole_policy
    }

    /// Runs the full pipeline for `chunk`. Only interior voxels are meshed; the apron ring
    /// is read for occlusion.
    pub fn build<Q: VoxelQuery + ?Sized>(&self, grid: &Q, chunk: ChunkCoord) -> ChunkMesh {
        let t_total = Instant::now();
        let mut perf = MesherPerf::default();
        let bounds = ChunkBounds::interior(chunk, self.dims);

        let t_classify = Instant::now();
        let faces = classify_faces(grid, &bounds);
        perf.classify_ms = elapsed_ms(t_classify);
        if faces.is_empty() {
            return ChunkMesh::empty(chunk);
        }

        let mut stats = MeshStats {
            exposed_faces: faces.face_count(),
            ..MeshStats::default()
        };
        let mut mb = MeshBuffers::default();
        mb.reserve_quads(LAST_MESH_RESERVE.with(Cell::get));

        let t_caps = Instant::now();
        self.emit_caps(&mut mb, &mut stats, &faces);
        perf.caps_ms = elapsed_ms(t_caps);

        let t_sides = Instant::now();
        self.emit_sides(&mut mb, &mut stats, &faces);
        perf.sides_ms = elapsed_ms(t_sides);

        stats.triangles = mb.triangle_count();
        stats.vertices = mb.vertex_count();
        let quads = stats.triangles / 2;
        LAST_MESH_RESERVE.with(|c| c.set((quads + quads / 4).max(MIN_QUAD_RESERVE)));
        perf.total_ms = elapsed_ms(t_total);
        log_mesher_perf(chunk, &perf, &stats);

        ChunkMesh {
            coord: chunk,
            bbox: mb.bounds(),
            buffers: mb,
            stats,
        }
    }

    fn emit_caps(&self, mb: &mut MeshBuffers, stats: &mut MeshStats, faces: &ExposedFaces) {
        for (face, planes) in [(Face::Top, &faces.top), (Face::Bottom, &faces.bottom)] {
            for (&height, cells) in planes {
                self.emit_plane(mb, stats, face, height, cells);
            }
        }
    }

    fn emit_plane(
        &self,
        mb: &mut MeshBuffers,
        stats: &mut MeshStats,
        face: Face,
        height: i32,
        cells: &HashSet<Axial>,
    ) {
        let winding = Winding::for_face(face);
        for region in merge_regions(cells) {
            stats.regions += 1;
            let traced = trace_region(&region, face, height, &self.layout);
            stats.loops += traced.loops.len();
            stats.dropped += traced.broken;
            if traced.loops.is_empty() {
                log::debug!(
                    target: "mesh",
                    "region without boundary face={:?} height={} cells={}",
                    face,
                    height,
                    region.len()
                );
                stats.dropped += 1;
                continue;
            }
            let resolved = resolve_polygons(traced.loops, self.hole_policy);
            stats.holes_bridged += resolved.holes_bridged;
            stats.dropped += resolved.dropped;
            for poly in resolved.polygons {
                let mut tri = triangulate(&poly.points);
                if tri.is_empty() {
                    log::warn!(
                        target: "mesh",
                        "polygon not triangulated face={:?} height={} len={} holes={}",
                        face,
                        height,
                        poly.points.len(),
                        poly.holes
                    );
                    stats.dropped += 1;
                    continue;
                }
                winding.apply(&mut tri.tris);
                emit_polygon(mb, &self.layout, face, &tri);
            }
        }
    }

    fn emit_sides(&self, mb: &mut MeshBuffers, stats: &mut MeshStats, faces: &ExposedFaces) {
        for dir in HexDir::ALL {
            for (&cell, heights) in &faces.sides[dir.index()] {
                for run in merge_regions(heights) {
                    stats.regions += 1;
                    match side_run_bounds(&run) {
                        Some(bounds) => emit_side_run(mb, &self.layout, cell, dir, bounds),
                        None => {
                            log::debug!(
                                target: "mesh",
                                "side run without bounds dir={:?} cell=({}, {})",
                                dir,
                                cell.q,
                                cell.r
                            );
                            stats.dropped += 1;
                        }
                    }
                }
            }
        }
    }
}

fn log_mesher_perf(chunk: ChunkCoord, perf: &MesherPerf, stats: &MeshStats) {
    log::info!(
        target: "perf",
        "ms classify={} caps={} sides={} total={} hex_mesh cq={} cr={} faces={} regions={} tris={}",
        perf.classify_ms,
        perf.caps_ms,
        perf.sides_ms,
        perf.total_ms,
        chunk.cq,
        chunk.cr,
        stats.exposed_faces,
        stats.regions,
        stats.triangles
    );
}

/// Convenience wrapper for one-off builds.
pub fn build_chunk_mesh<Q: VoxelQuery + ?Sized>(grid: &Q, chunk: ChunkCoord, cfg: &MesherConfig) -> ChunkMesh {
    ChunkMeshBuilder::new(cfg).build(grid, chunk)
}
