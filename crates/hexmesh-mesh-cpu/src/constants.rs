//! Shared constants for hexmesh-mesh-cpu.

/// Relative tolerance for planar predicates, scaled by the squared extent of the input.
pub(crate) const REL_EPS: f64 = 1e-10;

/// Tolerance on the total turning angle when testing a loop for strict convexity.
pub(crate) const TURNING_EPS: f64 = 1e-6;

// Buffer reservation
pub(crate) const MIN_QUAD_RESERVE: usize = 64;
pub(crate) const VERTS_PER_QUAD: usize = 4;
pub(crate) const INDICES_PER_QUAD: usize = 6;

/// Top and bottom UVs repeat once per cell diameter.
pub(crate) const TOP_UV_CELL_DIAMETERS: f32 = 2.0;
