//! Voxel occupancy model, chunk addressing and read-only snapshots.
#![forbid(unsafe_code)]

mod chunk_coord;

pub use chunk_coord::{ChunkBounds, ChunkCoord, ChunkDims};

use hashbrown::HashMap;
use hexmesh_geom::Vec3;
use hexmesh_hex::{HexCoord, HexError, HexLayout};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Occupancy {
    #[default]
    Empty,
    Solid,
}

impl Occupancy {
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, Occupancy::Solid)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub coord: HexCoord,
    pub occupancy: Occupancy,
}

impl Voxel {
    #[inline]
    pub const fn solid(coord: HexCoord) -> Self {
        Self {
            coord,
            occupancy: Occupancy::Solid,
        }
    }

    #[inline]
    pub const fn empty(coord: HexCoord) -> Self {
        Self {
            coord,
            occupancy: Occupancy::Empty,
        }
    }
}

/// Read access to a consistent voxel snapshot.
pub trait VoxelQuery {
    fn voxel_at(&self, coord: HexCoord) -> Option<Voxel>;

    /// Absent cells count as empty.
    #[inline]
    fn is_solid(&self, coord: HexCoord) -> bool {
        self.voxel_at(coord).is_some_and(|v| v.occupancy.is_solid())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_voxels(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

/// Sparse voxel map with unique coordinates.
#[derive(Clone, Debug, Default)]
pub struct VoxelGrid {
    cells: HashMap<HexCoord, Occupancy>,
}

impl VoxelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(n),
        }
    }

    /// Inserts or replaces; returns the previous voxel at that coordinate.
    pub fn insert(&mut self, voxel: Voxel) -> Option<Voxel> {
        self.cells
            .insert(voxel.coord, voxel.occupancy)
            .map(|occupancy| Voxel {
                coord: voxel.coord,
                occupancy,
            })
    }

    #[inline]
    pub fn set(&mut self, coord: HexCoord, occupancy: Occupancy) {
        self.cells.insert(coord, occupancy);
    }

    pub fn remove(&mut self, coord: HexCoord) -> Option<Voxel> {
        self.cells
            .remove(&coord)
            .map(|occupancy| Voxel { coord, occupancy })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Voxel> + '_ {
        self.cells
            .iter()
            .map(|(&coord, &occupancy)| Voxel { coord, occupancy })
    }

    pub fn solid_count(&self) -> usize {
        self.cells.values().filter(|o| o.is_solid()).count()
    }

    /// Whether any solid voxel falls inside `bounds`.
    pub fn occupancy_in(&self, bounds: &ChunkBounds) -> ChunkOccupancy {
        let any = if self.cells.len() < bounds.volume() {
            self.cells
                .iter()
                .any(|(c, o)| o.is_solid() && bounds.contains(*c))
        } else {
            bounds.cells().any(|c| self.is_solid(c))
        };
        if any {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        }
    }

    /// Copies the chunk plus its one-cell apron into a new grid.
    pub fn snapshot(&self, chunk: ChunkCoord, dims: ChunkDims) -> VoxelGrid {
        let bounds = ChunkBounds::interior(chunk, dims).with_apron();
        let mut out = VoxelGrid::new();
        if self.cells.len() < bounds.volume() {
            out.cells.extend(
                self.cells
                    .iter()
                    .filter(|(c, _)| bounds.contains(**c))
                    .map(|(c, o)| (*c, *o)),
            );
        } else {
            for c in bounds.cells() {
                if let Some(&o) = self.cells.get(&c) {
                    out.cells.insert(c, o);
                }
            }
        }
        out
    }

    /// Voxel at the cell containing a world position.
    pub fn voxel_at_world(&self, layout: &HexLayout, p: Vec3) -> Result<Option<Voxel>, HexError> {
        Ok(self.voxel_at(layout.world_to_hex(p)?))
    }
}

impl VoxelQuery for VoxelGrid {
    #[inline]
    fn voxel_at(&self, coord: HexCoord) -> Option<Voxel> {
        self.cells
            .get(&coord)
            .map(|&occupancy| Voxel { coord, occupancy })
    }
}

impl FromIterator<Voxel> for VoxelGrid {
    fn from_iter<I: IntoIterator<Item = Voxel>>(iter: I) -> Self {
        let mut grid = VoxelGrid::new();
        for v in iter {
            grid.insert(v);
        }
        grid
    }
}

impl Extend<Voxel> for VoxelGrid {
    fn extend<I: IntoIterator<Item = Voxel>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_not_solid() {
        let mut g = VoxelGrid::new();
        let a = HexCoord::new(0, 0, 0);
        let b = HexCoord::new(1, 0, 0);
        g.insert(Voxel::empty(a));
        assert!(!g.is_solid(a));
        assert!(!g.is_solid(b));
        assert_eq!(g.insert(Voxel::solid(a)), Some(Voxel::empty(a)));
        assert!(g.is_solid(a));
        assert_eq!(g.len(), 1);
        assert_eq!(g.solid_count(), 1);
    }

    #[test]
    fn voxel_at_world_finds_cell() {
        let layout = HexLayout::default();
        let g: VoxelGrid = [Voxel::solid(HexCoord::new(2, -1, 3))].into_iter().collect();
        let p = layout.hex_to_world(HexCoord::new(2, -1, 3)) + Vec3::new(5.0, -3.0, 20.0);
        assert_eq!(
            g.voxel_at_world(&layout, p),
            Ok(Some(Voxel::solid(HexCoord::new(2, -1, 3))))
        );
        assert!(g.voxel_at_world(&layout, Vec3::new(f32::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn occupancy_reports_interior_only() {
        let dims = ChunkDims::new(4, 2);
        let bounds = ChunkBounds::interior(ChunkCoord::new(0, 0), dims);
        let mut g = VoxelGrid::new();
        g.insert(Voxel::solid(HexCoord::new(-1, 0, 0)));
        assert!(g.occupancy_in(&bounds).is_empty());
        g.insert(Voxel::solid(HexCoord::new(3, 3, 1)));
        assert!(g.occupancy_in(&bounds).has_voxels());
    }
}
