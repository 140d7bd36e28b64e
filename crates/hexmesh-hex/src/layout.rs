use serde::{Deserialize, Serialize};

use hexmesh_geom::Vec3;

use crate::HexError;
use crate::coord::{Axial, HexCoord};

pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Cell geometry: corner radius `R` of the hexagon and height `H` of one layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexLayout {
    pub radius: f32,
    pub height: f32,
}

impl Default for HexLayout {
    fn default() -> Self {
        Self {
            radius: 50.0,
            height: 100.0,
        }
    }
}

impl HexLayout {
    #[inline]
    pub const fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Validating constructor for layouts read from configuration.
    pub fn try_new(radius: f32, height: f32) -> Result<Self, HexError> {
        let layout = Self::new(radius, height);
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), HexError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.radius) && ok(self.height) {
            Ok(())
        } else {
            Err(HexError::InvalidLayout {
                radius: self.radius,
                height: self.height,
            })
        }
    }

    /// Centre of `coord`'s prism base.
    pub fn hex_to_world(&self, coord: HexCoord) -> Vec3 {
        let r = f64::from(self.radius);
        let q = f64::from(coord.q);
        let rr = f64::from(coord.r);
        Vec3::new(
            (r * 1.5 * q) as f32,
            (r * (SQRT_3 * rr + SQRT_3 / 2.0 * q)) as f32,
            (f64::from(self.height) * f64::from(coord.z)) as f32,
        )
    }

    /// Cell containing `p`, using cube rounding in the plane and nearest layer vertically.
    pub fn world_to_hex(&self, p: Vec3) -> Result<HexCoord, HexError> {
        if !p.is_finite() {
            return Err(HexError::NonFinite {
                x: p.x,
                y: p.y,
                z: p.z,
            });
        }
        let r = f64::from(self.radius);
        let x = f64::from(p.x);
        let y = f64::from(p.y);
        let qf = (2.0 / 3.0) * x / r;
        let rf = (-x / 3.0 + SQRT_3 / 3.0 * y) / r;
        let sf = -qf - rf;

        let (mut q, mut rr, s) = (qf.round(), rf.round(), sf.round());
        let dq = (q - qf).abs();
        let dr = (rr - rf).abs();
        let ds = (s - sf).abs();
        if dq > dr && dq > ds {
            q = -rr - s;
        } else if dr > ds {
            rr = -q - s;
        }
        let z = (f64::from(p.z) / f64::from(self.height)).round();
        Ok(HexCoord::new(q as i32, rr as i32, z as i32))
    }

    /// Centre of a planar cell lifted to `layer`.
    #[inline]
    pub fn center(&self, cell: Axial, layer: i32) -> Vec3 {
        self.hex_to_world(cell.with_layer(layer))
    }

    /// Area of one hexagonal cap.
    #[inline]
    pub fn cell_area(&self) -> f32 {
        (1.5 * SQRT_3 * f64::from(self.radius) * f64::from(self.radius)) as f32
    }

    /// Area of one side face of one layer.
    #[inline]
    pub fn side_area(&self) -> f32 {
        self.radius * self.height
    }
}
