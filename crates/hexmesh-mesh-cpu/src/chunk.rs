use hexmesh_geom::Aabb;
use hexmesh_voxel::ChunkCoord;

use crate::mesh_build::MeshBuffers;

/// Per-pass counters, reported in logs and by the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub exposed_faces: usize,
    pub regions: usize,
    pub loops: usize,
    pub holes_bridged: usize,
    /// Degenerate sub-problems that produced no geometry.
    pub dropped: usize,
    pub triangles: usize,
    pub vertices: usize,
}

impl MeshStats {
    pub fn accumulate(&mut self, other: &MeshStats) {
        self.exposed_faces += other.exposed_faces;
        self.regions += other.regions;
        self.loops += other.loops;
        self.holes_bridged += other.holes_bridged;
        self.dropped += other.dropped;
        self.triangles += other.triangles;
        self.vertices += other.vertices;
    }
}

#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub buffers: MeshBuffers,
    pub stats: MeshStats,
}

impl ChunkMesh {
    pub fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            bbox: Aabb::EMPTY,
            buffers: MeshBuffers::default(),
            stats: MeshStats::default(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
