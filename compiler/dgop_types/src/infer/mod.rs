//! Fixpoint type inference over operator templates.
//!
//! # Algorithm
//!
//! 1. **Scan**: Walk every root. For each node, run its rule against the
//!    current [`TypeDict`]: the rule reads operand types, may write operand
//!    constraints (downward), and returns the node's own type, which is
//!    unified into the dictionary (upward).
//! 2. **Iterate**: Repeat step 1 until a full pass adds no information.
//! 3. **Default**: Leaves whose representation is still unknown become nodal;
//!    leaves whose domain is still unknown become volume data. If anything
//!    was defaulted, iterate again.
//! 4. **Validate**: Every recorded type must be final.
//!
//! The fixpoint converges because dictionary writes are monotone and the
//! lattice has finite height: every productive write strictly adds
//! information to one entry.
//!
//! # Common Subexpressions
//!
//! A CSE body is re-inferred when the type recorded for the CSE node has
//! changed since the node was last processed, or when the dictionary has
//! gained information anywhere since then (a variable inside the body may
//! have been pinned by another root). The body is driven to its own local
//! fixpoint before the result is cached, so a shared sub-DAG is analyzed once
//! per dictionary state instead of once per use.

mod defaults;
mod operators;

use rustc_hash::FxHashMap;

use dgop_ir::{Expr, ExprKind};

use crate::{Repr, TypeDict, TypeError, TypeHints, TypeInfo};

/// Result of a successful inference run.
#[derive(Debug)]
pub struct Inference {
    /// Final type of every sub-expression.
    pub types: TypeDict,
    /// Number of full passes over the template.
    pub passes: usize,
}

impl Inference {
    /// Number of information-adding dictionary writes during the run.
    pub fn writes(&self) -> usize {
        self.types.writes()
    }
}

/// Infer types for every sub-expression reachable from `roots`.
///
/// Array roots are visited element by element.
pub fn infer_types(roots: &[Expr], hints: &TypeHints) -> Result<Inference, TypeError> {
    TypeInferrer::new().infer(roots, hints)
}

/// The inference engine.
///
/// Holds the per-CSE cache of the last inferred result. Create a fresh
/// inferrer per template; the cache is meaningless across templates.
#[derive(Debug, Default)]
pub struct TypeInferrer {
    cse_last_results: FxHashMap<Expr, CachedResult>,
}

/// Last result for a CSE node, stamped with the dictionary's write count.
#[derive(Debug)]
struct CachedResult {
    tp: TypeInfo,
    writes: usize,
}

impl TypeInferrer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run inference to convergence and validate the result.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
    pub fn infer(&mut self, roots: &[Expr], hints: &TypeHints) -> Result<Inference, TypeError> {
        let mut types = TypeDict::new(hints);

        let mut passes = self.run_to_fixpoint(roots, &mut types)?;
        if defaults::apply_leaf_defaults(&mut types)? {
            passes += self.run_to_fixpoint(roots, &mut types)?;
        }

        validate(&types)?;

        tracing::debug!(
            passes,
            writes = types.writes(),
            entries = types.len(),
            "type inference converged"
        );
        Ok(Inference { types, passes })
    }

    fn run_to_fixpoint(&mut self, roots: &[Expr], types: &mut TypeDict) -> Result<usize, TypeError> {
        let mut passes = 0;
        loop {
            types.reset_changed();

            for root in roots {
                for expr in root.components() {
                    let tp = self.infer_expr(expr, types)?;
                    types.set(expr, tp)?;
                }
            }

            passes += 1;
            tracing::trace!(pass = passes, writes = types.writes(), "inference pass");

            if !types.changed() {
                return Ok(passes);
            }
        }
    }

    /// Infer `expr` and record the result.
    fn rec(&mut self, expr: &Expr, types: &mut TypeDict) -> Result<TypeInfo, TypeError> {
        let tp = self.infer_expr(expr, types)?;
        types.set(expr, tp.clone())?;
        Ok(tp)
    }

    /// Run the rule for `expr`'s node kind, returning its type.
    fn infer_expr(&mut self, expr: &Expr, types: &mut TypeDict) -> Result<TypeInfo, TypeError> {
        match expr.kind() {
            ExprKind::Sum(_)
            | ExprKind::Product(_)
            | ExprKind::Quotient { .. }
            | ExprKind::Power { .. }
            | ExprKind::If { .. }
            | ExprKind::IfPositive { .. }
            | ExprKind::Comparison { .. }
            | ExprKind::Call { .. } => self.infer_for_children(expr, &expr.children(), types),

            ExprKind::OperatorBinding { op, field } => {
                self.infer_operator_binding(expr, op, field, types)
            }
            ExprKind::WholeDomainFlux {
                interiors,
                boundaries,
            } => self.infer_whole_domain_flux(interiors, boundaries, types),
            ExprKind::FluxExchange {
                rank, arg_fields, ..
            } => self.infer_flux_exchange(*rank, arg_fields, types),
            ExprKind::CommonSubexpression { child, .. } => {
                self.infer_common_subexpression(expr, child, types)
            }

            ExprKind::Constant(_) | ExprKind::ScalarParameter(_) => {
                TypeInfo::Scalar.unify(&types.get(expr), Some(expr))
            }
            // User-facing variables are nodal.
            ExprKind::Variable(_) | ExprKind::Subscript { .. } => {
                TypeInfo::KnownRepresentation(Repr::Nodal).unify(&types.get(expr), Some(expr))
            }
            ExprKind::Ones { quadrature_tag }
            | ExprKind::NodeCoordinateComponent { quadrature_tag, .. } => {
                TypeInfo::VolumeVector(Repr::from_quadrature_tag(quadrature_tag.as_ref()))
                    .unify(&types.get(expr), Some(expr))
            }
            ExprKind::NormalComponent {
                boundary_tag,
                quadrature_tag,
                ..
            } => {
                let own = match quadrature_tag {
                    Some(q) => {
                        TypeInfo::boundary_vector(boundary_tag.clone(), Repr::Quadrature(q.clone()))
                    }
                    None => TypeInfo::KnownBoundary(boundary_tag.clone()),
                };
                own.unify(&types.get(expr), Some(expr))
            }
            ExprKind::Jacobian { .. }
            | ExprKind::ForwardMetricDerivative { .. }
            | ExprKind::InverseMetricDerivative { .. } => Ok(TypeInfo::KnownVolume),

            ExprKind::FluxNormal { .. } | ExprKind::BoundaryPair { .. } | ExprKind::Array(_) => {
                Err(TypeError::UnsupportedExpression { expr: expr.clone() })
            }
        }
    }

    /// Unify all non-scalar children into one shared type.
    ///
    /// Scalars mix freely with vectors without making the result scalar; a
    /// node with only scalar children is `Scalar`.
    fn infer_for_children(
        &mut self,
        expr: &Expr,
        children: &[&Expr],
        types: &mut TypeDict,
    ) -> Result<TypeInfo, TypeError> {
        let mut tp = types.get(expr);
        let mut non_scalar: smallvec::SmallVec<[&Expr; 4]> = smallvec::SmallVec::new();

        for &child in children {
            if tp.is_no_type() {
                tp = self.rec(child, types)?;
                if tp.is_scalar() {
                    tp = TypeInfo::NoType;
                } else {
                    non_scalar.push(child);
                }
            } else {
                let other = self.rec(child, types)?;
                if !other.is_scalar() {
                    non_scalar.push(child);
                    tp = tp.unify(&other, Some(child))?;
                }
            }
        }

        if non_scalar.is_empty() {
            return Ok(TypeInfo::Scalar);
        }

        for child in non_scalar {
            types.set(child, tp.clone())?;
        }
        Ok(tp)
    }

    fn infer_common_subexpression(
        &mut self,
        expr: &Expr,
        child: &Expr,
        types: &mut TypeDict,
    ) -> Result<TypeInfo, TypeError> {
        let outer_tp = types.get(expr);

        if let Some(last) = self.cse_last_results.get(expr) {
            if last.tp == outer_tp && last.writes == types.writes() {
                return Ok(last.tp.clone());
            }
        }

        tracing::trace!(%expr, %outer_tp, "re-inferring common subexpression");

        // Re-run inner inference with the new outer information.
        types.set(child, outer_tp)?;

        // For correct caching, information below this node must have fully
        // propagated.
        loop {
            types.reset_changed();
            self.rec(child, types)?;
            if !types.changed() {
                break;
            }
        }

        let new_tp = types.get(child);
        self.cse_last_results.insert(
            expr.clone(),
            CachedResult {
                tp: new_tp.clone(),
                writes: types.writes(),
            },
        );

        // The inner loop consumed the outer change flag.
        types.mark_changed();
        Ok(new_tp)
    }
}

/// Check that inference produced a final type everywhere.
fn validate(types: &TypeDict) -> Result<(), TypeError> {
    match types.iter().find(|(_, tp)| !tp.is_final()) {
        Some((expr, partial)) => Err(TypeError::IncompleteInference {
            expr: expr.clone(),
            partial: partial.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
