//! Human-readable rendering of expressions, operators and flux kernels.
//!
//! Used by diagnostics. Operands that are not atomic are parenthesized, so
//! the output is unambiguous without tracking precedence.

use std::fmt::{self, Display, Formatter};

use crate::flux::{FluxExpr, Side};
use crate::operator::{DiffKind, ElementwiseLinearKind, FluxOpKind, MassKind, ReductionKind};
use crate::{Expr, ExprKind, Operator};

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn is_atomic(expr: &Expr) -> bool {
    !matches!(
        expr.kind(),
        ExprKind::Sum(_)
            | ExprKind::Product(_)
            | ExprKind::Quotient { .. }
            | ExprKind::Power { .. }
            | ExprKind::Comparison { .. }
    )
}

/// Writes `expr`, parenthesized unless atomic.
struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if is_atomic(self.0) {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

fn write_operands(f: &mut Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    let operands: Vec<Operand<'_>> = items.iter().map(Operand).collect();
    write_list(f, &operands, sep)
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Constant(lit) => write!(f, "{lit}"),
            ExprKind::Variable(name) | ExprKind::ScalarParameter(name) => write!(f, "{name}"),
            ExprKind::Subscript { aggregate, index } => {
                write!(f, "{}[{index}]", Operand(aggregate))
            }
            ExprKind::Sum(children) => write_operands(f, children, " + "),
            ExprKind::Product(children) => write_operands(f, children, " * "),
            ExprKind::Quotient {
                numerator,
                denominator,
            } => write!(f, "{} / {}", Operand(numerator), Operand(denominator)),
            ExprKind::Power { base, exponent } => {
                write!(f, "{} ** {}", Operand(base), Operand(exponent))
            }
            ExprKind::If {
                condition,
                then,
                else_,
            } => write!(f, "If({condition}, {then}, {else_})"),
            ExprKind::IfPositive {
                criterion,
                then,
                else_,
            } => write!(f, "IfPositive({criterion}, {then}, {else_})"),
            ExprKind::Comparison { left, op, right } => write!(
                f,
                "{} {} {}",
                Operand(left),
                op.as_symbol(),
                Operand(right)
            ),
            ExprKind::Call {
                function,
                parameters,
            } => {
                write!(f, "{function}(")?;
                write_list(f, parameters, ", ")?;
                f.write_str(")")
            }
            ExprKind::CommonSubexpression { child, prefix } => match prefix {
                Some(prefix) => write!(f, "CSE[{prefix}]({child})"),
                None => write!(f, "CSE({child})"),
            },
            ExprKind::OperatorBinding { op, field } => write!(f, "{op}({field})"),
            ExprKind::BoundaryPair { field, bfield, tag } => {
                write!(f, "BPair({field}, {bfield}, {tag})")
            }
            ExprKind::Array(elements) => {
                f.write_str("[")?;
                write_list(f, elements, ", ")?;
                f.write_str("]")
            }
            ExprKind::NormalComponent {
                boundary_tag,
                axis,
                quadrature_tag,
            } => {
                write!(f, "normal[{boundary_tag}][{axis}]")?;
                if let Some(q) = quadrature_tag {
                    write!(f, "@{q}")?;
                }
                Ok(())
            }
            ExprKind::FluxNormal { axis } => write!(f, "FluxNormal[{axis}]"),
            ExprKind::NodeCoordinateComponent {
                axis,
                quadrature_tag,
            } => {
                write!(f, "x{axis}")?;
                if let Some(q) = quadrature_tag {
                    write!(f, "@{q}")?;
                }
                Ok(())
            }
            ExprKind::Ones { quadrature_tag } => match quadrature_tag {
                Some(q) => write!(f, "Ones@{q}"),
                None => f.write_str("Ones"),
            },
            ExprKind::Jacobian { quadrature_tag } => match quadrature_tag {
                Some(q) => write!(f, "Jacobian@{q}"),
                None => f.write_str("Jacobian"),
            },
            ExprKind::ForwardMetricDerivative { xyz_axis, rst_axis } => {
                write!(f, "dx{xyz_axis}/dr{rst_axis}")
            }
            ExprKind::InverseMetricDerivative { rst_axis, xyz_axis } => {
                write!(f, "dr{rst_axis}/dx{xyz_axis}")
            }
            ExprKind::FluxExchange {
                index,
                rank,
                arg_fields,
            } => {
                write!(f, "FluxExchange[{index}, rank {rank}](")?;
                write_list(f, arg_fields, ", ")?;
                f.write_str(")")
            }
            ExprKind::WholeDomainFlux {
                interiors,
                boundaries,
            } => {
                f.write_str("WholeDomainFlux(interiors: [")?;
                write_list(f, interiors, ", ")?;
                f.write_str("], boundaries: [")?;
                write_list(f, boundaries, ", ")?;
                f.write_str("])")
            }
        }
    }
}

fn diff_name(kind: DiffKind) -> &'static str {
    match kind {
        DiffKind::Differentiation => "Diff",
        DiffKind::WeakForm => "WeakDiff",
        DiffKind::Stiffness => "Stiffness",
    }
}

fn mass_name(kind: MassKind) -> &'static str {
    match kind {
        MassKind::Mass => "Mass",
        MassKind::InverseMass => "InverseMass",
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operator::NodalReduction(kind) => f.write_str(match kind {
                ReductionKind::Sum => "NodalSum",
                ReductionKind::Max => "NodalMax",
                ReductionKind::Min => "NodalMin",
            }),
            Operator::Diff { kind, xyz_axis } => write!(f, "{}[x{xyz_axis}]", diff_name(*kind)),
            Operator::ReferenceDiff { kind, rst_axis } => {
                write!(f, "Ref{}[r{rst_axis}]", diff_name(*kind))
            }
            Operator::Mass(kind) => f.write_str(mass_name(*kind)),
            Operator::ReferenceMass(kind) => write!(f, "Ref{}", mass_name(*kind)),
            Operator::ReferenceQuadratureMass { quadrature_tag } => {
                write!(f, "RefQuadMass[{quadrature_tag}]")
            }
            Operator::StiffnessT { xyz_axis } => write!(f, "StiffnessT[x{xyz_axis}]"),
            Operator::ReferenceStiffnessT { rst_axis } => write!(f, "RefStiffnessT[r{rst_axis}]"),
            Operator::ReferenceQuadratureStiffnessT {
                rst_axis,
                quadrature_tag,
            } => write!(f, "RefQuadStiffnessT[r{rst_axis}, {quadrature_tag}]"),
            Operator::ElementwiseMax => f.write_str("ElementwiseMax"),
            Operator::RestrictToBoundary { tag } => write!(f, "Restrict[{tag}]"),
            Operator::FluxExchange { index, rank } => {
                write!(f, "FluxExchange[{index}, rank {rank}]")
            }
            Operator::Flux(op) => match op.kind {
                FluxOpKind::Flux => write!(f, "Flux[{}]", op.flux),
                FluxOpKind::Lift => write!(f, "Lift[{}]", op.flux),
            },
            Operator::QuadratureGridUpsampler { quadrature_tag } => {
                write!(f, "Upsample[{quadrature_tag}]")
            }
            Operator::QuadratureInteriorFacesGridUpsampler { quadrature_tag } => {
                write!(f, "UpsampleIntFaces[{quadrature_tag}]")
            }
            Operator::QuadratureBoundaryGridUpsampler {
                quadrature_tag,
                boundary_tag,
            } => write!(f, "UpsampleBoundary[{quadrature_tag}, {boundary_tag}]"),
            Operator::ElementwiseLinear(kind) => match kind {
                ElementwiseLinearKind::Filter(name) => write!(f, "Filter[{name}]"),
                ElementwiseLinearKind::Averaging => f.write_str("Averaging"),
            },
            Operator::External(name) => write!(f, "{name}"),
        }
    }
}

fn is_atomic_flux(flux: &FluxExpr) -> bool {
    !matches!(
        flux,
        FluxExpr::Sum(_)
            | FluxExpr::Product(_)
            | FluxExpr::Quotient(..)
            | FluxExpr::Power(..)
            | FluxExpr::Comparison { .. }
    )
}

struct FluxOperand<'a>(&'a FluxExpr);

impl Display for FluxOperand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if is_atomic_flux(self.0) {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

impl Display for FluxExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FluxExpr::FieldComponent { index, side } => match side {
                Side::Interior => write!(f, "int[{index}]"),
                Side::Exterior => write!(f, "ext[{index}]"),
            },
            FluxExpr::Normal { axis } => write!(f, "n[{axis}]"),
            FluxExpr::Constant(lit) => write!(f, "{lit}"),
            FluxExpr::ScalarParameter(name) => write!(f, "{name}"),
            FluxExpr::Sum(terms) => {
                let operands: Vec<FluxOperand<'_>> = terms.iter().map(FluxOperand).collect();
                write_list(f, &operands, " + ")
            }
            FluxExpr::Product(factors) => {
                let operands: Vec<FluxOperand<'_>> = factors.iter().map(FluxOperand).collect();
                write_list(f, &operands, " * ")
            }
            FluxExpr::Quotient(num, den) => {
                write!(f, "{} / {}", FluxOperand(num), FluxOperand(den))
            }
            FluxExpr::Power(base, exp) => {
                write!(f, "{} ** {}", FluxOperand(base), FluxOperand(exp))
            }
            FluxExpr::Comparison { left, op, right } => write!(
                f,
                "{} {} {}",
                FluxOperand(left),
                op.as_symbol(),
                FluxOperand(right)
            ),
            FluxExpr::If {
                condition,
                then,
                else_,
            } => write!(f, "If({condition}, {then}, {else_})"),
            FluxExpr::Call {
                function,
                parameters,
            } => {
                write!(f, "{function}(")?;
                write_list(f, parameters, ", ")?;
                f.write_str(")")
            }
        }
    }
}
