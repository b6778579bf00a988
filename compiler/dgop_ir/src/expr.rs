//! Expression nodes for operator templates.
//!
//! An [`Expr`] is an immutable, reference-counted node. Its structural hash is
//! computed once at construction (children contribute their cached hashes), so
//! using expressions as map keys is O(1) per lookup regardless of depth.
//!
//! Equality is structural with a pointer-identity fast path: two separately
//! built `u + 1` trees compare equal, and a shared sub-DAG compares equal to
//! itself without descending.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;
use smallvec::SmallVec;

use crate::{BoundaryTag, Name, Operator, QuadratureTag};

/// A numeric literal.
///
/// Floats are stored as bits so that literals are `Eq + Hash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Float(u64),
}

impl Literal {
    /// Create a float literal.
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }

    /// Returns `true` for integer zero and for both signed float zeros.
    pub fn is_zero(self) -> bool {
        match self {
            Literal::Int(v) => v == 0,
            Literal::Float(bits) => f64::from_bits(bits) == 0.0,
        }
    }

    /// Returns `true` for integer one and float one.
    pub fn is_one(self) -> bool {
        match self {
            Literal::Int(v) => v == 1,
            Literal::Float(bits) => f64::from_bits(bits) == 1.0,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
        }
    }
}

/// Comparison operator of a `Comparison` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Lt,
    LtEq,
    Eq,
    NotEq,
    GtEq,
    Gt,
}

impl ComparisonOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::GtEq => ">=",
            ComparisonOp::Gt => ">",
        }
    }
}

/// Node kinds of an operator template.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    // Generic expression nodes
    Constant(Literal),
    Variable(Name),
    Subscript {
        aggregate: Expr,
        index: usize,
    },
    ScalarParameter(Name),
    Sum(Vec<Expr>),
    Product(Vec<Expr>),
    Quotient {
        numerator: Expr,
        denominator: Expr,
    },
    Power {
        base: Expr,
        exponent: Expr,
    },
    If {
        condition: Expr,
        then: Expr,
        else_: Expr,
    },
    IfPositive {
        criterion: Expr,
        then: Expr,
        else_: Expr,
    },
    Comparison {
        left: Expr,
        op: ComparisonOp,
        right: Expr,
    },
    Call {
        function: Name,
        parameters: Vec<Expr>,
    },
    CommonSubexpression {
        child: Expr,
        prefix: Option<Name>,
    },

    // Operator application
    OperatorBinding {
        op: Operator,
        field: Expr,
    },
    /// Interior field, boundary field and the boundary they meet on.
    BoundaryPair {
        field: Expr,
        bfield: Expr,
        tag: BoundaryTag,
    },
    /// An ordered object array of fields.
    Array(Vec<Expr>),

    // Discretization leaves
    /// Component of the outward normal on a tagged boundary.
    NormalComponent {
        boundary_tag: BoundaryTag,
        axis: usize,
        quadrature_tag: Option<QuadratureTag>,
    },
    /// Flux-kernel normal placeholder that leaked into a template.
    FluxNormal {
        axis: usize,
    },
    NodeCoordinateComponent {
        axis: usize,
        quadrature_tag: Option<QuadratureTag>,
    },
    Ones {
        quadrature_tag: Option<QuadratureTag>,
    },
    Jacobian {
        quadrature_tag: Option<QuadratureTag>,
    },
    ForwardMetricDerivative {
        xyz_axis: usize,
        rst_axis: usize,
    },
    InverseMetricDerivative {
        rst_axis: usize,
        xyz_axis: usize,
    },
    /// Data received from the partition of `rank`.
    FluxExchange {
        index: usize,
        rank: u32,
        arg_fields: Vec<Expr>,
    },
    /// Flux contributions collected over the whole domain. Each entry of
    /// `boundaries` is a `BoundaryPair`.
    WholeDomainFlux {
        interiors: Vec<Expr>,
        boundaries: Vec<Expr>,
    },
}

struct ExprNode {
    kind: ExprKind,
    hash: u64,
}

/// An immutable, shareable expression node.
#[derive(Clone)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    /// Wrap a node kind, computing its structural hash.
    pub fn new(kind: ExprKind) -> Self {
        let mut hasher = FxHasher::default();
        kind.hash(&mut hasher);
        let hash = hasher.finish();
        Self(Arc::new(ExprNode { kind, hash }))
    }

    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Returns `true` if both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // Construction

    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Constant(Literal::Int(value)))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ExprKind::Constant(Literal::float(value)))
    }

    pub fn zero() -> Self {
        Self::int(0)
    }

    pub fn var(name: &str) -> Self {
        Self::new(ExprKind::Variable(Name::new(name)))
    }

    pub fn subscript(aggregate: Expr, index: usize) -> Self {
        Self::new(ExprKind::Subscript { aggregate, index })
    }

    pub fn scalar_parameter(name: &str) -> Self {
        Self::new(ExprKind::ScalarParameter(Name::new(name)))
    }

    pub fn sum(children: Vec<Expr>) -> Self {
        Self::new(ExprKind::Sum(children))
    }

    pub fn product(children: Vec<Expr>) -> Self {
        Self::new(ExprKind::Product(children))
    }

    /// Negation, represented as multiplication by `-1`.
    pub fn neg(expr: Expr) -> Self {
        Self::product(vec![Self::int(-1), expr])
    }

    pub fn quotient(numerator: Expr, denominator: Expr) -> Self {
        Self::new(ExprKind::Quotient {
            numerator,
            denominator,
        })
    }

    pub fn power(base: Expr, exponent: Expr) -> Self {
        Self::new(ExprKind::Power { base, exponent })
    }

    pub fn if_(condition: Expr, then: Expr, else_: Expr) -> Self {
        Self::new(ExprKind::If {
            condition,
            then,
            else_,
        })
    }

    pub fn if_positive(criterion: Expr, then: Expr, else_: Expr) -> Self {
        Self::new(ExprKind::IfPositive {
            criterion,
            then,
            else_,
        })
    }

    pub fn compare(left: Expr, op: ComparisonOp, right: Expr) -> Self {
        Self::new(ExprKind::Comparison { left, op, right })
    }

    pub fn call(function: &str, parameters: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            function: Name::new(function),
            parameters,
        })
    }

    pub fn cse(child: Expr) -> Self {
        Self::new(ExprKind::CommonSubexpression {
            child,
            prefix: None,
        })
    }

    pub fn cse_named(child: Expr, prefix: &str) -> Self {
        Self::new(ExprKind::CommonSubexpression {
            child,
            prefix: Some(Name::new(prefix)),
        })
    }

    /// Apply `op` to `field`.
    pub fn bind(op: Operator, field: Expr) -> Self {
        Self::new(ExprKind::OperatorBinding { op, field })
    }

    pub fn boundary_pair(field: Expr, bfield: Expr, tag: BoundaryTag) -> Self {
        Self::new(ExprKind::BoundaryPair { field, bfield, tag })
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Self::new(ExprKind::Array(elements))
    }

    pub fn normal_component(boundary_tag: BoundaryTag, axis: usize) -> Self {
        Self::new(ExprKind::NormalComponent {
            boundary_tag,
            axis,
            quadrature_tag: None,
        })
    }

    pub fn flux_normal(axis: usize) -> Self {
        Self::new(ExprKind::FluxNormal { axis })
    }

    pub fn node_coordinate(axis: usize) -> Self {
        Self::new(ExprKind::NodeCoordinateComponent {
            axis,
            quadrature_tag: None,
        })
    }

    pub fn ones() -> Self {
        Self::new(ExprKind::Ones {
            quadrature_tag: None,
        })
    }

    pub fn jacobian() -> Self {
        Self::new(ExprKind::Jacobian {
            quadrature_tag: None,
        })
    }

    pub fn flux_exchange(index: usize, rank: u32, arg_fields: Vec<Expr>) -> Self {
        Self::new(ExprKind::FluxExchange {
            index,
            rank,
            arg_fields,
        })
    }

    pub fn whole_domain_flux(interiors: Vec<Expr>, boundaries: Vec<Expr>) -> Self {
        Self::new(ExprKind::WholeDomainFlux {
            interiors,
            boundaries,
        })
    }

    // Queries

    /// The fields held by this expression: the elements of an `Array`, or
    /// the expression itself.
    pub fn components(&self) -> &[Expr] {
        match self.kind() {
            ExprKind::Array(elements) => elements,
            _ => std::slice::from_ref(self),
        }
    }

    /// Returns `true` if this is a literal zero.
    pub fn is_zero(&self) -> bool {
        matches!(self.kind(), ExprKind::Constant(lit) if lit.is_zero())
    }

    /// Returns `true` if this node has no expression children.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Direct expression children, in evaluation order.
    pub fn children(&self) -> SmallVec<[&Expr; 4]> {
        let mut out = SmallVec::new();
        match self.kind() {
            ExprKind::Constant(_)
            | ExprKind::Variable(_)
            | ExprKind::ScalarParameter(_)
            | ExprKind::NormalComponent { .. }
            | ExprKind::FluxNormal { .. }
            | ExprKind::NodeCoordinateComponent { .. }
            | ExprKind::Ones { .. }
            | ExprKind::Jacobian { .. }
            | ExprKind::ForwardMetricDerivative { .. }
            | ExprKind::InverseMetricDerivative { .. } => {}
            ExprKind::Subscript { aggregate, .. } => out.push(aggregate),
            ExprKind::Sum(children) | ExprKind::Product(children) | ExprKind::Array(children) => {
                out.extend(children.iter());
            }
            ExprKind::Quotient {
                numerator,
                denominator,
            } => {
                out.push(numerator);
                out.push(denominator);
            }
            ExprKind::Power { base, exponent } => {
                out.push(base);
                out.push(exponent);
            }
            ExprKind::If {
                condition,
                then,
                else_,
            } => {
                out.push(condition);
                out.push(then);
                out.push(else_);
            }
            ExprKind::IfPositive {
                criterion,
                then,
                else_,
            } => {
                out.push(criterion);
                out.push(then);
                out.push(else_);
            }
            ExprKind::Comparison { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            ExprKind::Call { parameters, .. } => out.extend(parameters.iter()),
            ExprKind::CommonSubexpression { child, .. } => out.push(child),
            ExprKind::OperatorBinding { field, .. } => out.push(field),
            ExprKind::BoundaryPair { field, bfield, .. } => {
                out.push(field);
                out.push(bfield);
            }
            ExprKind::FluxExchange { arg_fields, .. } => out.extend(arg_fields.iter()),
            ExprKind::WholeDomainFlux {
                interiors,
                boundaries,
            } => {
                out.extend(interiors.iter());
                out.extend(boundaries.iter());
            }
        }
        out
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.0.hash == other.0.hash && self.0.kind == other.0.kind)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

#[cfg(test)]
mod tests;
