//! Geometry / element-type tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VerificationError;

/// Element geometry tag in `<dim>_<vertices>` form.
///
/// Known tags are `1_2` (line segments), `2_3` (triangles) and `2_4`
/// (quadrilaterals); other well-formed tags are accepted so that tables from
/// newer solver versions still load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryTag {
    dim: u8,
    vertices: u8,
}

impl GeometryTag {
    /// 1D line segments.
    pub const LINE: Self = Self { dim: 1, vertices: 2 };
    /// 2D triangles.
    pub const TRIANGLE: Self = Self { dim: 2, vertices: 3 };
    /// 2D quadrilaterals.
    pub const QUADRILATERAL: Self = Self { dim: 2, vertices: 4 };

    /// Spatial dimension.
    pub fn dimension(&self) -> usize {
        self.dim as usize
    }

    /// Number of vertices per element.
    pub fn vertex_count(&self) -> usize {
        self.vertices as usize
    }

    /// Display name used for plot labels. Empty for 1D meshes.
    pub fn display_name(&self) -> &'static str {
        match (self.dim, self.vertices) {
            (2, 3) => "Triangles",
            (2, 4) => "Quadrilaterals",
            _ => "",
        }
    }
}

impl fmt::Display for GeometryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.dim, self.vertices)
    }
}

impl FromStr for GeometryTag {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dim, vertices) = s
            .trim()
            .split_once('_')
            .ok_or_else(|| VerificationError::data(format!("malformed geometry tag '{s}'")))?;

        let dim: u8 = dim
            .parse()
            .map_err(|_| VerificationError::data(format!("malformed geometry tag '{s}'")))?;
        let vertices: u8 = vertices
            .parse()
            .map_err(|_| VerificationError::data(format!("malformed geometry tag '{s}'")))?;

        if !(1..=3).contains(&dim) || vertices < 2 {
            return Err(VerificationError::data(format!(
                "geometry tag '{s}' is outside the supported range"
            )));
        }

        Ok(Self { dim, vertices })
    }
}

impl Serialize for GeometryTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GeometryTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
