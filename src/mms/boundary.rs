//! Boundary edge labels and trace requests.
//!
//! Edge labels come from the mesh regions of a problem (`left`, `top_left`,
//! ...). They are resolved against [`BOUNDARY_EDGE_NAMES`] by exact name, so a
//! composite edge such as `top_left` is never confused with `left`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VerificationError};
use crate::types::dot;

/// A named boundary edge of the rectangular verification domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryEdge {
    Left,
    Right,
    Bottom,
    Top,
    /// Lower part of the left edge
    BottomLeft,
    /// Upper part of the left edge
    TopLeft,
    /// Lower part of the right edge
    BottomRight,
    /// Upper part of the right edge
    TopRight,
}

/// Recognized edge labels.
///
/// `bot_left` and `bot_right` are the short spellings used by some meshes.
pub const BOUNDARY_EDGE_NAMES: &[(&str, BoundaryEdge)] = &[
    ("left", BoundaryEdge::Left),
    ("right", BoundaryEdge::Right),
    ("bottom", BoundaryEdge::Bottom),
    ("top", BoundaryEdge::Top),
    ("bottom_left", BoundaryEdge::BottomLeft),
    ("bot_left", BoundaryEdge::BottomLeft),
    ("top_left", BoundaryEdge::TopLeft),
    ("bottom_right", BoundaryEdge::BottomRight),
    ("bot_right", BoundaryEdge::BottomRight),
    ("top_right", BoundaryEdge::TopRight),
];

impl BoundaryEdge {
    /// Canonical label.
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryEdge::Left => "left",
            BoundaryEdge::Right => "right",
            BoundaryEdge::Bottom => "bottom",
            BoundaryEdge::Top => "top",
            BoundaryEdge::BottomLeft => "bottom_left",
            BoundaryEdge::TopLeft => "top_left",
            BoundaryEdge::BottomRight => "bottom_right",
            BoundaryEdge::TopRight => "top_right",
        }
    }

    /// Outward unit normal of the edge.
    ///
    /// Split edges keep the normal of the side they lie on.
    pub fn outward_normal(&self) -> [f64; 2] {
        match self {
            BoundaryEdge::Left | BoundaryEdge::BottomLeft | BoundaryEdge::TopLeft => [-1.0, 0.0],
            BoundaryEdge::Right | BoundaryEdge::BottomRight | BoundaryEdge::TopRight => {
                [1.0, 0.0]
            }
            BoundaryEdge::Bottom => [0.0, -1.0],
            BoundaryEdge::Top => [0.0, 1.0],
        }
    }
}

impl FromStr for BoundaryEdge {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        BOUNDARY_EDGE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, edge)| *edge)
            .ok_or_else(|| VerificationError::config(format!("unknown boundary label '{s}'")))
    }
}

impl fmt::Display for BoundaryEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which derivative of the exact solution a boundary condition needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DerivativeOrder {
    /// u on the edge
    Value,
    /// ∇u (or its normal component) on the edge
    Gradient,
}

impl TryFrom<u8> for DerivativeOrder {
    type Error = VerificationError;

    fn try_from(order: u8) -> Result<Self> {
        match order {
            0 => Ok(DerivativeOrder::Value),
            1 => Ok(DerivativeOrder::Gradient),
            _ => Err(VerificationError::config(format!(
                "boundary derivative order must be 0 or 1, got {order}"
            ))),
        }
    }
}

/// A request for the exact-solution trace on one boundary edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryTraceRequest {
    pub edge: BoundaryEdge,
    pub order: DerivativeOrder,
    /// Project gradients onto the outward normal
    pub normal_projection: bool,
}

impl BoundaryTraceRequest {
    /// Resolve a label and derivative order.
    ///
    /// # Errors
    /// `Configuration` for an unknown label or an order other than 0 or 1.
    pub fn new(label: &str, order: u8) -> Result<Self> {
        Ok(Self {
            edge: label.parse()?,
            order: DerivativeOrder::try_from(order)?,
            normal_projection: false,
        })
    }

    /// Ask for ∇u·n instead of the full gradient.
    pub fn normal_component(mut self) -> Self {
        self.normal_projection = true;
        self
    }
}

/// Trace of the exact solution on a boundary point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trace {
    Value(f64),
    Gradient([f64; 2]),
    NormalDerivative(f64),
}

impl Trace {
    /// Build the trace for a request from the pointwise value and gradient.
    pub(crate) fn for_request(request: &BoundaryTraceRequest, value: f64, grad: [f64; 2]) -> Self {
        match request.order {
            DerivativeOrder::Value => Trace::Value(value),
            DerivativeOrder::Gradient if request.normal_projection => {
                Trace::NormalDerivative(dot(grad, request.edge.outward_normal()))
            }
            DerivativeOrder::Gradient => Trace::Gradient(grad),
        }
    }

    /// Scalar part of a value or normal-derivative trace.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Trace::Value(v) | Trace::NormalDerivative(v) => Some(*v),
            Trace::Gradient(_) => None,
        }
    }
}
