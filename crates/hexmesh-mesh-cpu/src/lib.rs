//! CPU meshing crate: exposed-face merging, boundary tracing and triangulation for
//! hexagonal-prism chunks.
#![forbid(unsafe_code)]

pub mod boundary;
mod build;
mod chunk;
pub mod config;
mod constants;
mod emit;
pub mod face;
mod mesh_build;
pub mod polygon;
pub mod regions;
pub mod triangulate;
pub mod visibility;

pub use boundary::{BoundaryLoop, SideRun, TraceOutput, side_run_bounds, trace_region};
pub use build::{ChunkMeshBuilder, build_chunk_mesh};
pub use chunk::{ChunkMesh, MeshStats};
pub use config::MesherConfig;
pub use face::Face;
pub use mesh_build::MeshBuffers;
pub use polygon::{HolePolicy, Polygon, ResolveOutput, resolve_polygons};
pub use regions::{PlanePosition, Region, merge_regions};
pub use triangulate::{Triangulation, Winding, triangulate};
pub use visibility::{ExposedFaces, classify_faces};
