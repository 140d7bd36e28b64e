//! Flat-topped hexagonal prism grid: axial coordinates, layout and corner identity.
#![forbid(unsafe_code)]

mod coord;
mod corner;
mod layout;

pub use coord::{Axial, HexCoord, HexDir};
pub use corner::{CornerKey, edge_corners};
pub use layout::{HexLayout, SQRT_3};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum HexError {
    #[error("non-finite world position ({x}, {y}, {z})")]
    NonFinite { x: f32, y: f32, z: f32 },
    #[error("invalid hex layout: radius {radius}, height {height} (both must be finite and > 0)")]
    InvalidLayout { radius: f32, height: f32 },
}

/// Cell containing a world position under `layout`.
#[inline]
pub fn world_to_hex(layout: &HexLayout, p: hexmesh_geom::Vec3) -> Result<HexCoord, HexError> {
    layout.world_to_hex(p)
}

/// Base centre of a cell under `layout`.
#[inline]
pub fn hex_to_world(layout: &HexLayout, c: HexCoord) -> hexmesh_geom::Vec3 {
    layout.hex_to_world(c)
}

/// Planar step distance; layers are ignored.
#[inline]
pub fn hex_distance(a: HexCoord, b: HexCoord) -> i32 {
    a.axial().distance(b.axial())
}
