//! Maximal flux-evaluable expression finder.
//!
//! Translates a boundary field into flux IR. Whatever the kernel can compute
//! from face data is translated directly; everything else becomes a
//! `FieldComponent` referencing one of two input lists:
//!
//! - **volume inputs**: seeded with the pair's interior fields. A restricted
//!   volume field is read as an interior value of the face.
//! - **boundary inputs**: data that must still be materialized on the
//!   boundary (variables, exchanged data, upsampled data, expensive shared
//!   subexpressions).
//!
//! Registration is idempotent: a structurally equal expression always maps
//! to its first index.

use rustc_hash::FxHashMap;

use dgop_ir::{BoundaryTag, ComparisonOp, Expr, ExprKind, FluxExpr, Operator};

use crate::{ExpensiveOperatorDetector, RewriteError};

/// An order-stable, deduplicated list of expressions.
#[derive(Debug, Default)]
struct InputList {
    exprs: Vec<Expr>,
    index: FxHashMap<Expr, usize>,
}

impl InputList {
    /// Seed the list. Positions are kept even for repeated entries, since
    /// the kernel already refers to them by position.
    fn seeded(exprs: Vec<Expr>) -> Self {
        let mut index = FxHashMap::default();
        for (i, expr) in exprs.iter().enumerate() {
            index.entry(expr.clone()).or_insert(i);
        }
        Self { exprs, index }
    }

    fn register(&mut self, expr: &Expr) -> usize {
        if let Some(&i) = self.index.get(expr) {
            return i;
        }
        let i = self.exprs.len();
        self.index.insert(expr.clone(), i);
        self.exprs.push(expr.clone());
        i
    }
}

/// The inputs a rewritten flux kernel reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FluxInputs {
    /// Referenced by interior field components.
    pub volume: Vec<Expr>,
    /// Referenced by exterior field components.
    pub boundary: Vec<Expr>,
}

/// Rewrites boundary expressions of one boundary pair into flux IR.
pub struct FluxEvaluableFinder<'a> {
    pair_tag: &'a BoundaryTag,
    detector: &'a mut ExpensiveOperatorDetector,
    volume: InputList,
    boundary: InputList,
    cse_cache: FxHashMap<Expr, FluxExpr>,
}

impl<'a> FluxEvaluableFinder<'a> {
    /// Create a finder for the pair tagged `pair_tag` whose interior fields
    /// are `volume_fields`.
    pub fn new(
        pair_tag: &'a BoundaryTag,
        volume_fields: Vec<Expr>,
        detector: &'a mut ExpensiveOperatorDetector,
    ) -> Self {
        Self {
            pair_tag,
            detector,
            volume: InputList::seeded(volume_fields),
            boundary: InputList::default(),
            cse_cache: FxHashMap::default(),
        }
    }

    /// The registered input lists.
    pub fn into_inputs(self) -> FluxInputs {
        FluxInputs {
            volume: self.volume.exprs,
            boundary: self.boundary.exprs,
        }
    }

    /// Translate one boundary expression.
    pub fn rewrite(&mut self, expr: &Expr) -> Result<FluxExpr, RewriteError> {
        match expr.kind() {
            ExprKind::Variable(_) | ExprKind::Subscript { .. } | ExprKind::FluxExchange { .. } => {
                Ok(self.boundary_input(expr))
            }
            ExprKind::FluxNormal { .. } => {
                Err(RewriteError::BareFluxNormal { expr: expr.clone() })
            }
            ExprKind::NormalComponent {
                boundary_tag, axis, ..
            } => {
                self.check_tag("boundary normal component", boundary_tag)?;
                Ok(FluxExpr::normal(*axis))
            }
            ExprKind::OperatorBinding { op, field } => self.rewrite_operator_binding(expr, op, field),
            ExprKind::CommonSubexpression { child, .. } => {
                self.rewrite_common_subexpression(expr, child)
            }

            ExprKind::Constant(lit) => Ok(FluxExpr::Constant(*lit)),
            ExprKind::ScalarParameter(name) => Ok(FluxExpr::ScalarParameter(name.clone())),
            ExprKind::Sum(terms) => Ok(FluxExpr::sum(self.rewrite_all(terms)?)),
            ExprKind::Product(factors) => Ok(FluxExpr::product(self.rewrite_all(factors)?)),
            ExprKind::Quotient {
                numerator,
                denominator,
            } => Ok(FluxExpr::quotient(
                self.rewrite(numerator)?,
                self.rewrite(denominator)?,
            )),
            ExprKind::Power { base, exponent } => {
                Ok(FluxExpr::power(self.rewrite(base)?, self.rewrite(exponent)?))
            }
            ExprKind::Comparison { left, op, right } => Ok(FluxExpr::compare(
                self.rewrite(left)?,
                *op,
                self.rewrite(right)?,
            )),
            ExprKind::If {
                condition,
                then,
                else_,
            } => Ok(FluxExpr::if_(
                self.rewrite(condition)?,
                self.rewrite(then)?,
                self.rewrite(else_)?,
            )),
            ExprKind::IfPositive {
                criterion,
                then,
                else_,
            } => {
                let condition =
                    FluxExpr::compare(self.rewrite(criterion)?, ComparisonOp::Gt, FluxExpr::zero());
                Ok(FluxExpr::if_(
                    condition,
                    self.rewrite(then)?,
                    self.rewrite(else_)?,
                ))
            }
            ExprKind::Call {
                function,
                parameters,
            } => Ok(FluxExpr::call(
                function.clone(),
                self.rewrite_all(parameters)?,
            )),

            ExprKind::BoundaryPair { .. }
            | ExprKind::Array(_)
            | ExprKind::NodeCoordinateComponent { .. }
            | ExprKind::Ones { .. }
            | ExprKind::Jacobian { .. }
            | ExprKind::ForwardMetricDerivative { .. }
            | ExprKind::InverseMetricDerivative { .. }
            | ExprKind::WholeDomainFlux { .. } => {
                Err(RewriteError::UnsupportedExpression { expr: expr.clone() })
            }
        }
    }

    fn rewrite_all(&mut self, exprs: &[Expr]) -> Result<Vec<FluxExpr>, RewriteError> {
        exprs.iter().map(|e| self.rewrite(e)).collect()
    }

    fn rewrite_operator_binding(
        &mut self,
        expr: &Expr,
        op: &Operator,
        field: &Expr,
    ) -> Result<FluxExpr, RewriteError> {
        match op {
            Operator::RestrictToBoundary { tag } => {
                self.check_tag("restriction", tag)?;
                Ok(FluxExpr::interior(self.volume.register(field)))
            }
            Operator::FluxExchange { rank, .. } => {
                self.check_tag("flux exchange", &BoundaryTag::Rank(*rank))?;
                Ok(self.boundary_input(expr))
            }
            Operator::QuadratureBoundaryGridUpsampler { boundary_tag, .. } => {
                self.check_tag("boundary upsampler", boundary_tag)?;
                Ok(self.boundary_input(expr))
            }
            // Seen before operator specialization; only check the tag when
            // the operand makes it obvious.
            Operator::QuadratureGridUpsampler { .. } => {
                if let Some(tag) = syntactic_boundary_tag(field) {
                    self.check_tag("upsampler", &tag)?;
                }
                Ok(self.boundary_input(expr))
            }
            _ => Err(RewriteError::IllegalBoundaryOperator {
                op: op.clone(),
                expr: expr.clone(),
            }),
        }
    }

    /// Inline a CSE unless its body applies an expensive operator, in which
    /// case the whole CSE becomes a single boundary input.
    fn rewrite_common_subexpression(
        &mut self,
        expr: &Expr,
        child: &Expr,
    ) -> Result<FluxExpr, RewriteError> {
        if let Some(cached) = self.cse_cache.get(expr) {
            return Ok(cached.clone());
        }

        let result = if self.detector.is_expensive(child)? {
            self.boundary_input(expr)
        } else {
            self.rewrite(child)?
        };

        self.cse_cache.insert(expr.clone(), result.clone());
        Ok(result)
    }

    fn boundary_input(&mut self, expr: &Expr) -> FluxExpr {
        FluxExpr::exterior(self.boundary.register(expr))
    }

    fn check_tag(&self, construct: &'static str, found: &BoundaryTag) -> Result<(), RewriteError> {
        if found == self.pair_tag {
            Ok(())
        } else {
            Err(RewriteError::TagMismatch {
                construct,
                found: found.clone(),
                expected: self.pair_tag.clone(),
            })
        }
    }
}

/// The boundary `expr` lives on, when its outermost operator says so.
fn syntactic_boundary_tag(expr: &Expr) -> Option<BoundaryTag> {
    match expr.kind() {
        ExprKind::OperatorBinding { op, .. } => match op {
            Operator::RestrictToBoundary { tag } => Some(tag.clone()),
            Operator::QuadratureBoundaryGridUpsampler { boundary_tag, .. } => {
                Some(boundary_tag.clone())
            }
            Operator::FluxExchange { rank, .. } => Some(BoundaryTag::Rank(*rank)),
            _ => None,
        },
        ExprKind::FluxExchange { rank, .. } => Some(BoundaryTag::Rank(*rank)),
        ExprKind::CommonSubexpression { child, .. } => syntactic_boundary_tag(child),
        _ => None,
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
