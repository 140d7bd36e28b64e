use serde::{Deserialize, Serialize};

use hexmesh_geom::Vec3;

/// Planar axial cell coordinate; `s = -q - r` is implied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    #[inline]
    pub fn neighbor(self, dir: HexDir) -> Axial {
        let (dq, dr) = dir.offset();
        Axial::new(self.q + dq, self.r + dr)
    }

    #[inline]
    pub fn neighbors(self) -> [Axial; 6] {
        HexDir::ALL.map(|d| self.neighbor(d))
    }

    /// Number of steps between two cells on the planar grid.
    #[inline]
    pub fn distance(self, other: Axial) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }

    #[inline]
    pub const fn with_layer(self, z: i32) -> HexCoord {
        HexCoord::new(self.q, self.r, z)
    }
}

/// Cell coordinate: axial `(q, r)` plus an independent vertical layer `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
    pub z: i32,
}

impl HexCoord {
    #[inline]
    pub const fn new(q: i32, r: i32, z: i32) -> Self {
        Self { q, r, z }
    }

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    #[inline]
    pub const fn axial(self) -> Axial {
        Axial::new(self.q, self.r)
    }

    #[inline]
    pub const fn offset(self, dq: i32, dr: i32, dz: i32) -> Self {
        Self::new(self.q + dq, self.r + dr, self.z + dz)
    }

    #[inline]
    pub const fn up(self) -> Self {
        self.offset(0, 0, 1)
    }

    #[inline]
    pub const fn down(self) -> Self {
        self.offset(0, 0, -1)
    }

    #[inline]
    pub fn neighbor(self, dir: HexDir) -> Self {
        let (dq, dr) = dir.offset();
        self.offset(dq, dr, 0)
    }
}

impl From<(i32, i32, i32)> for HexCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

/// The six lateral neighbour directions of a flat-topped cell.
///
/// Direction `i` points at `60·i − 30` degrees from +X; the edge facing it runs from the
/// corner at `60·(i−1)` degrees to the corner at `60·i` degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HexDir {
    SouthEast = 0,
    NorthEast = 1,
    North = 2,
    NorthWest = 3,
    SouthWest = 4,
    South = 5,
}

impl HexDir {
    pub const ALL: [HexDir; 6] = [
        HexDir::SouthEast,
        HexDir::NorthEast,
        HexDir::North,
        HexDir::NorthWest,
        HexDir::SouthWest,
        HexDir::South,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wraps any index onto the six directions.
    #[inline]
    pub fn from_index(i: usize) -> HexDir {
        Self::ALL[i % 6]
    }

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            HexDir::SouthEast => (1, -1),
            HexDir::NorthEast => (1, 0),
            HexDir::North => (0, 1),
            HexDir::NorthWest => (-1, 1),
            HexDir::SouthWest => (-1, 0),
            HexDir::South => (0, -1),
        }
    }

    /// Next direction counter-clockwise.
    #[inline]
    pub fn next(self) -> HexDir {
        Self::from_index(self.index() + 1)
    }

    /// Next direction clockwise.
    #[inline]
    pub fn prev(self) -> HexDir {
        Self::from_index(self.index() + 5)
    }

    #[inline]
    pub fn opposite(self) -> HexDir {
        Self::from_index(self.index() + 3)
    }

    #[inline]
    pub fn angle_radians(self) -> f32 {
        (60.0 * self.index() as f32 - 30.0).to_radians()
    }

    /// Outward unit normal of the side face facing this direction.
    #[inline]
    pub fn normal(self) -> Vec3 {
        Vec3::from_angle_xy(self.angle_radians())
    }
}
