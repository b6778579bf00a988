//! Operator catalogue.
//!
//! Operators are bound to fields by `ExprKind::OperatorBinding`. Each variant
//! carries the tag fields the analysis passes read (quadrature tag, boundary
//! tag, rank). Operators outside this core are represented by
//! [`Operator::External`] and rejected by every pass that meets them.

use crate::{BoundaryTag, FluxExpr, Name, QuadratureTag};

/// Element-local reductions to a scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReductionKind {
    Sum,
    Max,
    Min,
}

/// Flavours of differentiation operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// Strong-form derivative.
    Differentiation,
    /// Weak-form (inverse mass times stiffness transpose) derivative.
    WeakForm,
    /// Stiffness matrix application.
    Stiffness,
}

/// Mass matrix or its inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MassKind {
    Mass,
    InverseMass,
}

/// Element-local linear maps that preserve the nodal representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementwiseLinearKind {
    Filter(Name),
    Averaging,
}

/// Whether a flux operator applies the lifting (inverse mass) step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FluxOpKind {
    Flux,
    Lift,
}

/// A flux-kernel operator: the kernel body plus its constructor parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FluxOperator {
    pub kind: FluxOpKind,
    pub flux: FluxExpr,
}

impl FluxOperator {
    /// The same operator with its kernel body replaced.
    pub fn with_flux(&self, flux: FluxExpr) -> Self {
        Self {
            kind: self.kind,
            flux,
        }
    }
}

/// The operator kinds known to the analysis passes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    NodalReduction(ReductionKind),
    Diff {
        kind: DiffKind,
        xyz_axis: usize,
    },
    ReferenceDiff {
        kind: DiffKind,
        rst_axis: usize,
    },
    Mass(MassKind),
    ReferenceMass(MassKind),
    ReferenceQuadratureMass {
        quadrature_tag: QuadratureTag,
    },
    StiffnessT {
        xyz_axis: usize,
    },
    ReferenceStiffnessT {
        rst_axis: usize,
    },
    ReferenceQuadratureStiffnessT {
        rst_axis: usize,
        quadrature_tag: QuadratureTag,
    },
    ElementwiseMax,
    /// Restriction of volume data to a boundary ("boundarize").
    RestrictToBoundary {
        tag: BoundaryTag,
    },
    /// Exchange of face data with a neighbouring partition.
    FluxExchange {
        index: usize,
        rank: u32,
    },
    Flux(FluxOperator),
    QuadratureGridUpsampler {
        quadrature_tag: QuadratureTag,
    },
    QuadratureInteriorFacesGridUpsampler {
        quadrature_tag: QuadratureTag,
    },
    QuadratureBoundaryGridUpsampler {
        quadrature_tag: QuadratureTag,
        boundary_tag: BoundaryTag,
    },
    ElementwiseLinear(ElementwiseLinearKind),
    /// An operator outside the responsibility of these passes.
    External(Name),
}

impl Operator {
    pub fn restrict(tag: BoundaryTag) -> Self {
        Operator::RestrictToBoundary { tag }
    }

    pub fn flux(flux: FluxExpr) -> Self {
        Operator::Flux(FluxOperator {
            kind: FluxOpKind::Flux,
            flux,
        })
    }

    pub fn lift(flux: FluxExpr) -> Self {
        Operator::Flux(FluxOperator {
            kind: FluxOpKind::Lift,
            flux,
        })
    }

    pub fn upsample(quadrature_tag: QuadratureTag) -> Self {
        Operator::QuadratureGridUpsampler { quadrature_tag }
    }
}
