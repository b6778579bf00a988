//! Identity folding over expression trees.
//!
//! Implement [`ExprFolder`] and override the hooks for the node kinds a pass
//! rewrites. The default behaviour rebuilds every node from its folded
//! children, returning the original node untouched when no child changed so
//! that shared sub-DAGs stay shared.

use crate::{Expr, ExprKind, Operator};

/// Trait for fallible, structure-preserving rewrites of expressions.
pub trait ExprFolder {
    type Error;

    /// Fold an expression by dispatching to the node-kind hooks.
    fn fold(&mut self, expr: &Expr) -> Result<Expr, Self::Error> {
        match expr.kind() {
            ExprKind::CommonSubexpression { child, .. } => {
                self.fold_common_subexpression(expr, child)
            }
            ExprKind::OperatorBinding { op, field } => self.fold_operator_binding(expr, op, field),
            _ => fold_children(self, expr),
        }
    }

    /// Fold a common subexpression. Override to memoize per CSE node.
    fn fold_common_subexpression(
        &mut self,
        expr: &Expr,
        child: &Expr,
    ) -> Result<Expr, Self::Error> {
        let _ = child;
        fold_children(self, expr)
    }

    /// Fold an operator binding.
    fn fold_operator_binding(
        &mut self,
        expr: &Expr,
        op: &Operator,
        field: &Expr,
    ) -> Result<Expr, Self::Error> {
        let _ = (op, field);
        fold_children(self, expr)
    }
}

fn fold_all<F: ExprFolder + ?Sized>(
    folder: &mut F,
    exprs: &[Expr],
    changed: &mut bool,
) -> Result<Vec<Expr>, F::Error> {
    exprs
        .iter()
        .map(|e| fold_one(folder, e, changed))
        .collect()
}

fn fold_one<F: ExprFolder + ?Sized>(
    folder: &mut F,
    expr: &Expr,
    changed: &mut bool,
) -> Result<Expr, F::Error> {
    let folded = folder.fold(expr)?;
    if !folded.ptr_eq(expr) {
        *changed = true;
    }
    Ok(folded)
}

/// Rebuild `expr` from its folded children.
pub fn fold_children<F: ExprFolder + ?Sized>(folder: &mut F, expr: &Expr) -> Result<Expr, F::Error> {
    let mut changed = false;
    let c = &mut changed;

    let kind = match expr.kind() {
        ExprKind::Constant(_)
        | ExprKind::Variable(_)
        | ExprKind::ScalarParameter(_)
        | ExprKind::NormalComponent { .. }
        | ExprKind::FluxNormal { .. }
        | ExprKind::NodeCoordinateComponent { .. }
        | ExprKind::Ones { .. }
        | ExprKind::Jacobian { .. }
        | ExprKind::ForwardMetricDerivative { .. }
        | ExprKind::InverseMetricDerivative { .. } => return Ok(expr.clone()),

        ExprKind::Subscript { aggregate, index } => ExprKind::Subscript {
            aggregate: fold_one(folder, aggregate, c)?,
            index: *index,
        },
        ExprKind::Sum(children) => ExprKind::Sum(fold_all(folder, children, c)?),
        ExprKind::Product(children) => ExprKind::Product(fold_all(folder, children, c)?),
        ExprKind::Array(children) => ExprKind::Array(fold_all(folder, children, c)?),
        ExprKind::Quotient {
            numerator,
            denominator,
        } => ExprKind::Quotient {
            numerator: fold_one(folder, numerator, c)?,
            denominator: fold_one(folder, denominator, c)?,
        },
        ExprKind::Power { base, exponent } => ExprKind::Power {
            base: fold_one(folder, base, c)?,
            exponent: fold_one(folder, exponent, c)?,
        },
        ExprKind::If {
            condition,
            then,
            else_,
        } => ExprKind::If {
            condition: fold_one(folder, condition, c)?,
            then: fold_one(folder, then, c)?,
            else_: fold_one(folder, else_, c)?,
        },
        ExprKind::IfPositive {
            criterion,
            then,
            else_,
        } => ExprKind::IfPositive {
            criterion: fold_one(folder, criterion, c)?,
            then: fold_one(folder, then, c)?,
            else_: fold_one(folder, else_, c)?,
        },
        ExprKind::Comparison { left, op, right } => ExprKind::Comparison {
            left: fold_one(folder, left, c)?,
            op: *op,
            right: fold_one(folder, right, c)?,
        },
        ExprKind::Call {
            function,
            parameters,
        } => ExprKind::Call {
            function: function.clone(),
            parameters: fold_all(folder, parameters, c)?,
        },
        ExprKind::CommonSubexpression { child, prefix } => ExprKind::CommonSubexpression {
            child: fold_one(folder, child, c)?,
            prefix: prefix.clone(),
        },
        ExprKind::OperatorBinding { op, field } => ExprKind::OperatorBinding {
            op: op.clone(),
            field: fold_one(folder, field, c)?,
        },
        ExprKind::BoundaryPair { field, bfield, tag } => ExprKind::BoundaryPair {
            field: fold_one(folder, field, c)?,
            bfield: fold_one(folder, bfield, c)?,
            tag: tag.clone(),
        },
        ExprKind::FluxExchange {
            index,
            rank,
            arg_fields,
        } => ExprKind::FluxExchange {
            index: *index,
            rank: *rank,
            arg_fields: fold_all(folder, arg_fields, c)?,
        },
        ExprKind::WholeDomainFlux {
            interiors,
            boundaries,
        } => ExprKind::WholeDomainFlux {
            interiors: fold_all(folder, interiors, c)?,
            boundaries: fold_all(folder, boundaries, c)?,
        },
    };

    if changed {
        Ok(Expr::new(kind))
    } else {
        Ok(expr.clone())
    }
}
