//! Built-in fixture worlds for the demo binary.

use hexmesh_hex::{Axial, HexCoord};
use hexmesh_voxel::{ChunkDims, Voxel, VoxelGrid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Scene {
    /// One voxel at the origin
    Single,
    /// Hollow rings, one inside a chunk and one straddling four chunks
    Ring,
    /// Stepped hills over 2×2 chunks
    Terraces,
    /// Floor slab with pillars of varying height over 2×2 chunks
    Pillars,
}

pub fn build_scene(scene: Scene, dims: ChunkDims) -> VoxelGrid {
    match scene {
        Scene::Single => [Voxel::solid(HexCoord::new(0, 0, 0))].into_iter().collect(),
        Scene::Ring => {
            let mid = dims.size / 2;
            let mut grid = ring(Axial::new(mid, mid), 1, 2, 0);
            grid.extend(ring(Axial::new(dims.size, dims.size), 3, 4, 0).iter());
            grid
        }
        Scene::Terraces => terraces(dims),
        Scene::Pillars => pillars(dims),
    }
}

fn ring(centre: Axial, inner: i32, outer: i32, z: i32) -> VoxelGrid {
    let mut grid = VoxelGrid::new();
    for dq in -outer..=outer {
        for dr in -outer..=outer {
            let a = Axial::new(centre.q + dq, centre.r + dr);
            if (inner..=outer).contains(&a.distance(centre)) {
                grid.insert(Voxel::solid(a.with_layer(z)));
            }
        }
    }
    grid
}

fn terraces(dims: ChunkDims) -> VoxelGrid {
    let span = dims.size * 2;
    let mut grid = VoxelGrid::with_capacity((span * span) as usize);
    for q in 0..span {
        for r in 0..span {
            let top = ((q + r) / 3).min(dims.height - 1);
            for z in 0..=top {
                grid.insert(Voxel::solid(HexCoord::new(q, r, z)));
            }
        }
    }
    grid
}

fn pillars(dims: ChunkDims) -> VoxelGrid {
    let span = dims.size * 2;
    let mut grid = VoxelGrid::new();
    for q in 0..span {
        for r in 0..span {
            grid.insert(Voxel::solid(HexCoord::new(q, r, 0)));
            if q % 4 == 1 && r % 4 == 1 {
                let h = (q * 7 + r * 13).rem_euclid(dims.height.max(1));
                for z in 1..=h.min(dims.height - 1) {
                    grid.insert(Voxel::solid(HexCoord::new(q, r, z)));
                }
            }
        }
    }
    grid
}
