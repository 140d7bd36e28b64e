use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hexmesh_hex::HexLayout;
use hexmesh_voxel::ChunkDims;

use crate::polygon::HolePolicy;

/// Mesher settings, read from TOML:
///
/// ```toml
/// [hex]
/// radius = 50.0
/// height = 100.0
///
/// [chunk]
/// size = 16
/// height = 16
///
/// [mesher]
/// hole_policy = "containment"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MesherConfig {
    #[serde(default)]
    pub hex: HexLayout,
    #[serde(default)]
    pub chunk: ChunkDims,
    #[serde(default)]
    pub mesher: MesherSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MesherSection {
    #[serde(default)]
    pub hole_policy: HolePolicy,
    /// Worker threads for the runtime; 0 picks from available parallelism.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    0
}

impl Default for MesherSection {
    fn default() -> Self {
        Self {
            hole_policy: HolePolicy::default(),
            workers: default_workers(),
        }
    }
}

impl MesherConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MesherConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        self.hex.validate()?;
        if !self.chunk.is_valid() {
            return Err(format!(
                "invalid chunk dims: size {} height {} (both must be > 0)",
                self.chunk.size, self.chunk.height
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = MesherConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, MesherConfig::default());
        assert_eq!(cfg.hex.radius, 50.0);
        assert_eq!(cfg.hex.height, 100.0);
        assert_eq!(cfg.mesher.hole_policy, HolePolicy::Containment);
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = MesherConfig::from_toml_str(
            r#"
            [hex]
            radius = 10.0

            [chunk]
            size = 8

            [mesher]
            hole_policy = "largest_area"
            workers = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.hex.radius, 10.0);
        assert_eq!(cfg.hex.height, 100.0);
        assert_eq!(cfg.chunk, ChunkDims::new(8, 16));
        assert_eq!(cfg.mesher.hole_policy, HolePolicy::LargestArea);
        assert_eq!(cfg.mesher.workers, 3);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(MesherConfig::from_toml_str("[hex]\nradius = -1.0").is_err());
        assert!(MesherConfig::from_toml_str("[chunk]\nsize = 0").is_err());
        assert!(MesherConfig::from_toml_str("[mesher]\nhole_policy = \"parity\"").is_err());
    }
}
