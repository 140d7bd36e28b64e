use hexmesh_geom::Vec3;
use hexmesh_hex::HexDir;

/// One of the eight faces of a hexagonal prism.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Face {
    Top,
    Bottom,
    Side(HexDir),
}

impl Face {
    pub const ALL: [Face; 8] = [
        Face::Top,
        Face::Bottom,
        Face::Side(HexDir::SouthEast),
        Face::Side(HexDir::NorthEast),
        Face::Side(HexDir::North),
        Face::Side(HexDir::NorthWest),
        Face::Side(HexDir::SouthWest),
        Face::Side(HexDir::South),
    ];

    /// Returns the `[0..8)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Face::Top => 0,
            Face::Bottom => 1,
            Face::Side(d) => 2 + d.index(),
        }
    }

    /// Converts a face index `[0..8)` back into a `Face` value.
    /// Falls back to `Top` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        Self::ALL.get(i).copied().unwrap_or(Face::Top)
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Top => Vec3::UP,
            Face::Bottom => Vec3::DOWN,
            Face::Side(d) => d.normal(),
        }
    }

    /// Returns the cell delta `(dq, dr, dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Top => (0, 0, 1),
            Face::Bottom => (0, 0, -1),
            Face::Side(d) => {
                let (dq, dr) = d.offset();
                (dq, dr, 0)
            }
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Face::Top | Face::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for f in Face::ALL {
            assert_eq!(Face::from_index(f.index()), f);
        }
        assert_eq!(Face::from_index(99), Face::Top);
    }

    #[test]
    fn normals_are_unit() {
        for f in Face::ALL {
            assert!((f.normal().length() - 1.0).abs() < 1e-6, "{f:?}");
        }
    }
}
