//! Expensive boundary operator detection.
//!
//! Answers "does evaluating this boundary expression invoke an operator that
//! is costly to duplicate?" Inlining such an expression into a flux kernel
//! would evaluate the operator once per use, so the finder keeps shared
//! subexpressions containing one materialized instead.

use rustc_hash::FxHashMap;

use dgop_ir::{Expr, ExprKind, Operator};

use crate::RewriteError;

/// Memoizing detector for expensive operators in boundary expressions.
///
/// Results are context-free, so one detector can be reused across every
/// boundary pair of a template.
#[derive(Debug, Default)]
pub struct ExpensiveOperatorDetector {
    cache: FxHashMap<Expr, bool>,
}

impl ExpensiveOperatorDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if evaluating `expr` applies an expensive operator.
    ///
    /// Fails if an operator that cannot act on boundary data is applied.
    pub fn is_expensive(&mut self, expr: &Expr) -> Result<bool, RewriteError> {
        if let Some(&cached) = self.cache.get(expr) {
            return Ok(cached);
        }

        let result = self.classify(expr)?;
        self.cache.insert(expr.clone(), result);
        Ok(result)
    }

    fn classify(&mut self, expr: &Expr) -> Result<bool, RewriteError> {
        match expr.kind() {
            ExprKind::OperatorBinding { op, .. } => match op {
                Operator::RestrictToBoundary { .. } => Ok(false),
                Operator::FluxExchange { .. }
                | Operator::QuadratureGridUpsampler { .. }
                | Operator::QuadratureInteriorFacesGridUpsampler { .. }
                | Operator::QuadratureBoundaryGridUpsampler { .. } => Ok(true),
                _ => Err(RewriteError::IllegalBoundaryOperator {
                    op: op.clone(),
                    expr: expr.clone(),
                }),
            },
            ExprKind::FluxExchange { .. } => Ok(true),
            // Anything expensive below a CSE is already evaluated once there.
            ExprKind::CommonSubexpression { .. } => Ok(false),
            _ => {
                // Every child is checked so that illegal operators surface
                // even next to an expensive sibling.
                let mut expensive = false;
                for child in expr.children() {
                    expensive |= self.is_expensive(child)?;
                }
                Ok(expensive)
            }
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
