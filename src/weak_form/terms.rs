//! Signed weak-form terms.
//!
//! A [`WeakForm`] is the residual `Σ ±term = 0` handed to the external
//! assembler. Terms carry only data (kind, sign, coefficients); evaluation
//! belongs to the FE engine.

use std::fmt;

use crate::flux::StandardFlux;

/// Sign of a term in the residual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// The opposite sign.
    pub fn flipped(self) -> Self {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    /// +1.0 or −1.0.
    pub fn as_f64(self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => f.write_str("+"),
            Sign::Minus => f.write_str("-"),
        }
    }
}

/// Kind of a weak-form term, in residual order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermKind {
    /// (∂u/∂t, v)
    TimeDerivative,
    /// −(f(u), ∇v) volume contribution
    AdvectionVolume,
    /// ⟨F*(u⁻, u⁺)·n, [v]⟩ interface contribution
    AdvectionFlux,
    /// (D ∇u, ∇v)
    DiffusionVolume,
    /// ⟨{D ∇u}·n, [v]⟩ consistency term
    DiffusionConsistency,
    /// ⟨{D ∇v}·n, [u]⟩ symmetrizing term
    DiffusionTranspose,
    /// ⟨(C_w D / h) [u], [v]⟩
    InteriorPenalty,
    /// (g, v)
    VolumeSource,
}

impl TermKind {
    /// Short identifier used when rendering the residual.
    pub fn label(&self) -> &'static str {
        match self {
            TermKind::TimeDerivative => "volume_dot",
            TermKind::AdvectionVolume => "advect_volume",
            TermKind::AdvectionFlux => "advect_flux",
            TermKind::DiffusionVolume => "laplace",
            TermKind::DiffusionConsistency => "diffusion_flux",
            TermKind::DiffusionTranspose => "diffusion_flux_transpose",
            TermKind::InteriorPenalty => "interior_penalty",
            TermKind::VolumeSource => "volume_source",
        }
    }

    /// Whether the term belongs to the diffusion-scheme correction block.
    pub fn is_diffusion_correction(&self) -> bool {
        matches!(
            self,
            TermKind::DiffusionConsistency | TermKind::DiffusionTranspose
        )
    }

    /// Whether the term belongs to the advective operator.
    pub fn is_advective(&self) -> bool {
        matches!(self, TermKind::AdvectionVolume | TermKind::AdvectionFlux)
    }
}

/// Coefficients a term needs at assembly time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TermCoefficient {
    /// No material coefficient.
    None,
    /// Advective flux capability (velocity or nonlinear flux).
    Advection,
    /// Interface flux with its blend weight.
    Flux { flux: StandardFlux, weight: f64 },
    /// Diffusion coefficient D.
    Diffusion(f64),
    /// Diffusion coefficient and interior-penalty coefficient C_w.
    Penalty { diffusion: f64, penalty: f64 },
    /// Manufactured source callable.
    Source,
}

/// One signed term of the residual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeakFormTerm {
    /// Term kind.
    pub kind: TermKind,
    /// Sign in the residual.
    pub sign: Sign,
    /// Material data.
    pub coefficient: TermCoefficient,
}

impl WeakFormTerm {
    /// Create a term.
    pub fn new(kind: TermKind, sign: Sign, coefficient: TermCoefficient) -> Self {
        Self {
            kind,
            sign,
            coefficient,
        }
    }
}

impl fmt::Display for WeakFormTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sign, self.kind.label())?;
        match self.coefficient {
            TermCoefficient::None => Ok(()),
            TermCoefficient::Advection => f.write_str("(a)"),
            TermCoefficient::Flux { flux, weight } => {
                use crate::flux::NumericalFlux;
                write!(f, "({}, w={})", flux.name(), weight)
            }
            TermCoefficient::Diffusion(d) => write!(f, "(D={d})"),
            TermCoefficient::Penalty { diffusion, penalty } => {
                write!(f, "(D={diffusion}, Cw={penalty})")
            }
            TermCoefficient::Source => f.write_str("(g)"),
        }
    }
}

/// Ordered sequence of signed terms forming the residual `Σ ±term = 0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeakForm {
    terms: Vec<WeakFormTerm>,
}

impl WeakForm {
    pub(crate) fn from_terms(terms: Vec<WeakFormTerm>) -> Self {
        Self { terms }
    }

    /// Terms in residual order.
    pub fn terms(&self) -> &[WeakFormTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the residual has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether a term of the given kind is present.
    pub fn contains(&self, kind: TermKind) -> bool {
        self.terms.iter().any(|t| t.kind == kind)
    }

    /// First term of the given kind.
    pub fn term(&self, kind: TermKind) -> Option<&WeakFormTerm> {
        self.terms.iter().find(|t| t.kind == kind)
    }

    /// Kinds in residual order.
    pub fn kinds(&self) -> Vec<TermKind> {
        self.terms.iter().map(|t| t.kind).collect()
    }

    /// Whether the diffusion block yields a symmetric bilinear form.
    ///
    /// True when the consistency and transpose terms are both present with
    /// equal sign, or when no diffusion correction is present at all.
    pub fn is_symmetric_diffusion(&self) -> bool {
        match (
            self.term(TermKind::DiffusionConsistency),
            self.term(TermKind::DiffusionTranspose),
        ) {
            (Some(c), Some(t)) => c.sign == t.sign,
            (None, None) => true,
            _ => false,
        }
    }

    /// Whether the residual depends on time derivatives.
    pub fn is_transient(&self) -> bool {
        self.contains(TermKind::TimeDerivative)
    }

    /// Terms outside the diffusion correction block.
    pub fn non_correction_terms(&self) -> impl Iterator<Item = &WeakFormTerm> {
        self.terms
            .iter()
            .filter(|t| !t.kind.is_diffusion_correction())
    }
}

impl fmt::Display for WeakForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{term}")?;
        }
        f.write_str(" = 0")
    }
}
