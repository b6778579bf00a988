//! Defaults for leaves that the fixpoint left underdetermined.
//!
//! Data the user binds is nodal volume data unless something in the template
//! says otherwise, so `x + 1` types as a nodal volume vector.

use dgop_ir::{Expr, ExprKind};

use crate::{Repr, TypeDict, TypeError, TypeInfo};

/// Complete partial leaf types. Returns `true` if any entry changed.
pub(super) fn apply_leaf_defaults(types: &mut TypeDict) -> Result<bool, TypeError> {
    let pending: Vec<(Expr, TypeInfo)> = types
        .iter()
        .filter(|(expr, tp)| is_defaultable_leaf(expr) && !tp.is_final())
        .map(|(expr, tp)| (expr.clone(), tp.clone()))
        .collect();

    if pending.is_empty() {
        return Ok(false);
    }

    for (expr, tp) in &pending {
        let mut tp = tp.clone();
        if tp.repr().is_none() {
            tp = tp.unify(&TypeInfo::KnownRepresentation(Repr::Nodal), Some(expr))?;
        }
        if !tp.is_final() {
            tp = tp.unify(&TypeInfo::KnownVolume, Some(expr))?;
        }
        tracing::trace!(%expr, %tp, "defaulted leaf type");
        types.set(expr, tp)?;
    }

    tracing::debug!(count = pending.len(), "applied leaf defaults");
    Ok(true)
}

fn is_defaultable_leaf(expr: &Expr) -> bool {
    matches!(
        expr.kind(),
        ExprKind::Variable(_)
            | ExprKind::Subscript { .. }
            | ExprKind::NormalComponent { .. }
            | ExprKind::NodeCoordinateComponent { .. }
            | ExprKind::Ones { .. }
            | ExprKind::Jacobian { .. }
            | ExprKind::ForwardMetricDerivative { .. }
            | ExprKind::InverseMetricDerivative { .. }
    )
}
