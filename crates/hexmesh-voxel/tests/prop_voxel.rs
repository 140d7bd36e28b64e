use hexmesh_hex::{HexCoord, HexLayout};
use hexmesh_voxel::{ChunkBounds, ChunkCoord, ChunkDims, Voxel, VoxelGrid, VoxelQuery};
use proptest::prelude::*;

fn dims() -> impl Strategy<Value = ChunkDims> {
    (1i32..=8, 1i32..=6).prop_map(|(s, h)| ChunkDims::new(s, h))
}

fn small_i32() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

fn arb_grid() -> impl Strategy<Value = Vec<(i32, i32, i32, bool)>> {
    prop::collection::vec((-12i32..12, -12i32..12, -1i32..7, any::<bool>()), 0..200)
}

proptest! {
    // A voxel always falls inside the interior bounds of its own chunk
    #[test]
    fn voxel_lies_in_its_chunk(q in small_i32(), r in small_i32(), d in dims()) {
        let c = HexCoord::new(q, r, 0);
        let chunk = ChunkCoord::from_voxel(c, d);
        prop_assert!(ChunkBounds::interior(chunk, d).contains(c));
    }

    // Interior cells are unique and exactly fill the bounds volume
    #[test]
    fn interior_cells_cover_volume(cq in -50i32..50, cr in -50i32..50, d in dims()) {
        let b = ChunkBounds::interior(ChunkCoord::new(cq, cr), d);
        let cells: Vec<HexCoord> = b.cells().collect();
        prop_assert_eq!(cells.len(), b.volume());
        let uniq: std::collections::BTreeSet<_> = cells.iter().copied().collect();
        prop_assert_eq!(uniq.len(), cells.len());
        prop_assert!(cells.iter().all(|c| b.contains(*c)));
    }

    // Snapshot keeps exactly the voxels inside the apron bounds, unchanged
    #[test]
    fn snapshot_matches_apron(entries in arb_grid(), cq in -2i32..2, cr in -2i32..2, d in dims()) {
        let grid: VoxelGrid = entries
            .iter()
            .map(|&(q, r, z, s)| {
                let c = HexCoord::new(q, r, z);
                if s { Voxel::solid(c) } else { Voxel::empty(c) }
            })
            .collect();
        let chunk = ChunkCoord::new(cq, cr);
        let snap = grid.snapshot(chunk, d);
        let apron = ChunkBounds::interior(chunk, d).with_apron();
        for v in grid.iter() {
            if apron.contains(v.coord) {
                prop_assert_eq!(snap.voxel_at(v.coord), Some(v));
            } else {
                prop_assert_eq!(snap.voxel_at(v.coord), None);
            }
        }
        prop_assert!(snap.iter().all(|v| apron.contains(v.coord)));
    }

    // Chunk origin maps back into the same chunk
    #[test]
    fn origin_world_round_trips(cq in -1_000i32..1_000, cr in -1_000i32..1_000, d in dims()) {
        let layout = HexLayout::default();
        let chunk = ChunkCoord::new(cq, cr);
        let p = chunk.origin_world(&layout, d);
        prop_assert_eq!(ChunkCoord::from_world(&layout, p, d), Ok(chunk));
    }
}

#[test]
fn negative_cells_floor_into_negative_chunks() {
    let d = ChunkDims::new(4, 1);
    assert_eq!(ChunkCoord::from_voxel(HexCoord::new(-1, 0, 0), d), ChunkCoord::new(-1, 0));
    assert_eq!(ChunkCoord::from_voxel(HexCoord::new(-4, 3, 0), d), ChunkCoord::new(-1, 0));
    assert_eq!(ChunkCoord::from_voxel(HexCoord::new(-5, 4, 0), d), ChunkCoord::new(-2, 1));
}

#[test]
fn apron_grows_planar_ranges_only() {
    let b = ChunkBounds::interior(ChunkCoord::new(1, -1), ChunkDims::new(3, 5));
    assert_eq!(b.q, 3..6);
    assert_eq!(b.r, -3..0);
    let a = b.with_apron();
    assert_eq!(a.q, 2..7);
    assert_eq!(a.r, -4..1);
    assert_eq!(a.z, 0..5);
}
