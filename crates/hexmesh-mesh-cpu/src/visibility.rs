use std::collections::BTreeMap;

use hashbrown::HashSet;
use hexmesh_hex::{Axial, HexDir};
use hexmesh_voxel::{ChunkBounds, VoxelQuery};

/// Exposed faces of one chunk, bucketed by plane.
///
/// `top`/`bottom` are keyed by layer and hold planar cells; `sides[d]` is keyed by the
/// column facing direction `d` and holds the exposed layers of that column.
#[derive(Clone, Debug, Default)]
pub struct ExposedFaces {
    pub top: BTreeMap<i32, HashSet<Axial>>,
    pub bottom: BTreeMap<i32, HashSet<Axial>>,
    pub sides: [BTreeMap<Axial, HashSet<i32>>; 6],
}

impl ExposedFaces {
    /// Number of individual voxel faces marked exposed.
    pub fn face_count(&self) -> usize {
        let horizontal: usize = self
            .top
            .values()
            .chain(self.bottom.values())
            .map(HashSet::len)
            .sum();
        let lateral: usize = self
            .sides
            .iter()
            .flat_map(|m| m.values())
            .map(HashSet::len)
            .sum();
        horizontal + lateral
    }

    /// Top and bottom cell faces.
    pub fn horizontal_count(&self) -> usize {
        self.top
            .values()
            .chain(self.bottom.values())
            .map(HashSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty() && self.sides.iter().all(BTreeMap::is_empty)
    }
}

/// Marks every face of a solid interior voxel whose neighbour is absent or empty.
///
/// Cells outside `bounds` are only read as neighbours, never meshed.
pub fn classify_faces<Q: VoxelQuery + ?Sized>(grid: &Q, bounds: &ChunkBounds) -> ExposedFaces {
    let mut out = ExposedFaces::default();
    for c in bounds.cells() {
        if !grid.is_solid(c) {
            continue;
        }
        let cell = c.axial();
        if !grid.is_solid(c.up()) {
            out.top.entry(c.z).or_default().insert(cell);
        }
        if !grid.is_solid(c.down()) {
            out.bottom.entry(c.z).or_default().insert(cell);
        }
        for dir in HexDir::ALL {
            if !grid.is_solid(c.neighbor(dir)) {
                out.sides[dir.index()]
                    .entry(cell)
                    .or_default()
                    .insert(c.z);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmesh_hex::HexCoord;
    use hexmesh_voxel::{ChunkCoord, ChunkDims, Voxel, VoxelGrid};

    #[test]
    fn lone_voxel_exposes_eight_faces() {
        let grid: VoxelGrid = [Voxel::solid(HexCoord::new(0, 0, 0))].into_iter().collect();
        let bounds = ChunkBounds::interior(ChunkCoord::new(0, 0), ChunkDims::new(1, 1));
        let f = classify_faces(&grid, &bounds);
        assert_eq!(f.face_count(), 8);
        assert_eq!(f.horizontal_count(), 2);
        assert!(f.top[&0].contains(&Axial::new(0, 0)));
        assert!(f.sides.iter().all(|m| m[&Axial::new(0, 0)].contains(&0)));
    }

    #[test]
    fn apron_voxels_occlude_but_are_not_meshed() {
        let dims = ChunkDims::new(1, 1);
        let bounds = ChunkBounds::interior(ChunkCoord::new(0, 0), dims);
        let mut grid = VoxelGrid::new();
        grid.insert(Voxel::solid(HexCoord::new(0, 0, 0)));
        grid.insert(Voxel::solid(HexCoord::new(1, 0, 0)));
        grid.insert(Voxel::empty(HexCoord::new(0, 1, 0)));
        let f = classify_faces(&grid, &bounds);
        // the apron neighbour hides one side, the empty one does not
        assert_eq!(f.face_count(), 7);
        assert!(f.sides[HexDir::NorthEast.index()].is_empty());
        assert!(!f.sides[HexDir::North.index()].is_empty());
        assert!(f.top.values().all(|s| !s.contains(&Axial::new(1, 0))));
    }

    #[test]
    fn stacked_voxels_hide_shared_caps() {
        let grid: VoxelGrid = (0..3).map(|z| Voxel::solid(HexCoord::new(0, 0, z))).collect();
        let bounds = ChunkBounds::interior(ChunkCoord::new(0, 0), ChunkDims::new(1, 3));
        let f = classify_faces(&grid, &bounds);
        assert_eq!(f.top.keys().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(f.bottom.keys().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(f.face_count(), 2 + 6 * 3);
    }
}
