use core::ops::Range;

use serde::{Deserialize, Serialize};

use hexmesh_geom::Vec3;
use hexmesh_hex::{HexCoord, HexError, HexLayout};

/// Chunk footprint: `size × size` cells in the plane, `height` layers tall starting at z = 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkDims {
    pub size: i32,
    pub height: i32,
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self {
            size: 16,
            height: 16,
        }
    }
}

impl ChunkDims {
    #[inline]
    pub const fn new(size: i32, height: i32) -> Self {
        Self { size, height }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.size > 0 && self.height > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cq: i32,
    pub cr: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cq: i32, cr: i32) -> Self {
        Self { cq, cr }
    }

    #[inline]
    pub fn offset(self, dq: i32, dr: i32) -> Self {
        Self {
            cq: self.cq + dq,
            cr: self.cr + dr,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dq = i64::from(self.cq - other.cq);
        let dr = i64::from(self.cr - other.cr);
        dq * dq + dr * dr
    }

    /// Chunk owning a voxel; floor division so negative cells land in negative chunks.
    #[inline]
    pub fn from_voxel(c: HexCoord, dims: ChunkDims) -> Self {
        Self::new(c.q.div_euclid(dims.size), c.r.div_euclid(dims.size))
    }

    pub fn from_world(layout: &HexLayout, p: Vec3, dims: ChunkDims) -> Result<Self, HexError> {
        Ok(Self::from_voxel(layout.world_to_hex(p)?, dims))
    }

    /// World position of the chunk's first cell at layer 0.
    #[inline]
    pub fn origin_world(self, layout: &HexLayout, dims: ChunkDims) -> Vec3 {
        layout.hex_to_world(self.first_cell(dims))
    }

    #[inline]
    pub fn first_cell(self, dims: ChunkDims) -> HexCoord {
        HexCoord::new(self.cq * dims.size, self.cr * dims.size, 0)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cq, value.cr)
    }
}

/// Half-open cell ranges covered by a chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBounds {
    pub q: Range<i32>,
    pub r: Range<i32>,
    pub z: Range<i32>,
}

impl ChunkBounds {
    /// Cells the chunk generates faces for.
    pub fn interior(chunk: ChunkCoord, dims: ChunkDims) -> Self {
        let first = chunk.first_cell(dims);
        Self {
            q: first.q..first.q + dims.size,
            r: first.r..first.r + dims.size,
            z: 0..dims.height,
        }
    }

    /// The interior grown by the one-cell ring that neighbour lookups may touch.
    pub fn with_apron(&self) -> Self {
        Self {
            q: self.q.start - 1..self.q.end + 1,
            r: self.r.start - 1..self.r.end + 1,
            z: self.z.clone(),
        }
    }

    #[inline]
    pub fn contains(&self, c: HexCoord) -> bool {
        self.q.contains(&c.q) && self.r.contains(&c.r) && self.z.contains(&c.z)
    }

    #[inline]
    pub fn volume(&self) -> usize {
        let span = |r: &Range<i32>| (r.end - r.start).max(0) as usize;
        span(&self.q) * span(&self.r) * span(&self.z)
    }

    /// Every cell in q, then r, then z order.
    pub fn cells(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.q.clone().flat_map(move |q| {
            self.r
                .clone()
                .flat_map(move |r| self.z.clone().map(move |z| HexCoord::new(q, r, z)))
        })
    }
}
