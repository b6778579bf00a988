//! The boundary-to-flux rewriter.
//!
//! Folds a whole template. Every flux operator bound to a boundary pair is
//! replaced by a binding whose kernel reads the boundary field's flux IR
//! translation, bound to a pair holding only the inputs that translation
//! still needs. All other nodes are rebuilt unchanged.

use rustc_hash::{FxHashMap, FxHashSet};

use dgop_ir::{
    fold_children, BoundaryTag, CallPolicy, DependencyCollector, Expr, ExprFolder, ExprKind,
    FluxExpr, FluxOperator, Operator, Side,
};

use crate::{ExpensiveOperatorDetector, FluxEvaluableFinder, RewriteError};

/// Rewrite the boundary fluxes of every root.
pub fn rewrite_boundary_fluxes(roots: &[Expr]) -> Result<Vec<Expr>, RewriteError> {
    let mut rewriter = BoundaryFluxRewriter::new();
    roots.iter().map(|root| rewriter.rewrite(root)).collect()
}

/// Whole-template rewriter. Memoizes shared subexpressions, so every CSE is
/// rewritten once no matter how often it is referenced.
#[derive(Debug, Default)]
pub struct BoundaryFluxRewriter {
    detector: ExpensiveOperatorDetector,
    cse_cache: FxHashMap<Expr, Expr>,
    rewritten: usize,
}

impl BoundaryFluxRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite one root.
    pub fn rewrite(&mut self, expr: &Expr) -> Result<Expr, RewriteError> {
        self.fold(expr)
    }

    /// Number of flux bindings rewritten so far.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    fn rewrite_flux_binding(
        &mut self,
        op: &FluxOperator,
        vol_field: &Expr,
        bdry_field: &Expr,
        tag: &BoundaryTag,
    ) -> Result<Expr, RewriteError> {
        check_aliasing(vol_field, bdry_field)?;

        let mut finder =
            FluxEvaluableFinder::new(tag, vol_field.components().to_vec(), &mut self.detector);
        let new_bdry = bdry_field
            .components()
            .iter()
            .map(|e| finder.rewrite(e))
            .collect::<Result<Vec<_>, _>>()?;
        let inputs = finder.into_inputs();

        let new_flux = substitute_boundary(&op.flux, &new_bdry)?;
        self.rewritten += 1;

        if new_flux.is_zero() {
            tracing::debug!(%tag, "boundary flux vanishes");
            return Ok(Expr::zero());
        }

        tracing::debug!(
            %tag,
            volume_inputs = inputs.volume.len(),
            boundary_inputs = inputs.boundary.len(),
            "rewrote boundary flux"
        );

        let volume = self.fold_all(&inputs.volume)?;
        let boundary = self.fold_all(&inputs.boundary)?;
        Ok(Expr::bind(
            Operator::Flux(op.with_flux(new_flux)),
            Expr::boundary_pair(Expr::array(volume), Expr::array(boundary), tag.clone()),
        ))
    }

    fn fold_all(&mut self, exprs: &[Expr]) -> Result<Vec<Expr>, RewriteError> {
        exprs.iter().map(|e| self.fold(e)).collect()
    }
}

impl ExprFolder for BoundaryFluxRewriter {
    type Error = RewriteError;

    fn fold_common_subexpression(&mut self, expr: &Expr, _child: &Expr) -> Result<Expr, Self::Error> {
        if let Some(cached) = self.cse_cache.get(expr) {
            return Ok(cached.clone());
        }
        let result = fold_children(self, expr)?;
        self.cse_cache.insert(expr.clone(), result.clone());
        Ok(result)
    }

    fn fold_operator_binding(
        &mut self,
        expr: &Expr,
        op: &Operator,
        field: &Expr,
    ) -> Result<Expr, Self::Error> {
        match (op, field.kind()) {
            (Operator::Flux(flux_op), ExprKind::BoundaryPair { field, bfield, tag }) => {
                self.rewrite_flux_binding(flux_op, field, bfield, tag)
            }
            _ => fold_children(self, expr),
        }
    }
}

/// Check every flux binding on a boundary pair for aliased sides without
/// rewriting anything.
///
/// An aliased pair is also ill-typed, so running this before type inference
/// reports the aliasing itself rather than the resulting domain conflict.
pub fn check_boundary_aliasing(roots: &[Expr]) -> Result<(), RewriteError> {
    let mut checker = AliasChecker::default();
    for root in roots {
        checker.fold(root)?;
    }
    Ok(())
}

#[derive(Default)]
struct AliasChecker {
    visited: FxHashSet<Expr>,
}

impl ExprFolder for AliasChecker {
    type Error = RewriteError;

    fn fold_common_subexpression(&mut self, expr: &Expr, _child: &Expr) -> Result<Expr, Self::Error> {
        if self.visited.insert(expr.clone()) {
            fold_children(self, expr)
        } else {
            Ok(expr.clone())
        }
    }

    fn fold_operator_binding(
        &mut self,
        expr: &Expr,
        op: &Operator,
        field: &Expr,
    ) -> Result<Expr, Self::Error> {
        if let (Operator::Flux(_), ExprKind::BoundaryPair { field, bfield, .. }) = (op, field.kind()) {
            check_aliasing(field, bfield)?;
        }
        fold_children(self, expr)
    }
}

/// Fail if the two sides of a pair read the same data.
fn check_aliasing(vol_field: &Expr, bdry_field: &Expr) -> Result<(), RewriteError> {
    let bdry_deps = DependencyCollector::new()
        .with_calls(CallPolicy::DescendArgs)
        .with_operator_bindings(true)
        .collect(bdry_field);
    let vol_deps: FxHashSet<Expr> = DependencyCollector::new()
        .with_operator_bindings(true)
        .collect(vol_field)
        .into_iter()
        .collect();

    let shared: Vec<Expr> = bdry_deps
        .into_iter()
        .filter(|dep| vol_deps.contains(dep))
        .collect();

    if shared.is_empty() {
        Ok(())
    } else {
        Err(RewriteError::AliasedDomainVariable { shared })
    }
}

/// Replace every exterior field component of `flux` by the matching
/// translated boundary component.
fn substitute_boundary(flux: &FluxExpr, new_bdry: &[FluxExpr]) -> Result<FluxExpr, RewriteError> {
    let mut out_of_range = None;
    flux.for_each_field_component(&mut |index, side| {
        if side == Side::Exterior && index >= new_bdry.len() {
            out_of_range.get_or_insert(index);
        }
    });
    if let Some(index) = out_of_range {
        return Err(RewriteError::BoundaryComponentOutOfRange {
            index,
            len: new_bdry.len(),
        });
    }

    Ok(flux.substitute(&mut |e: &FluxExpr| match e {
        FluxExpr::FieldComponent {
            index,
            side: Side::Exterior,
        } => new_bdry.get(*index).cloned(),
        _ => None,
    }))
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
