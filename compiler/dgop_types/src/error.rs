//! Type inference errors.
//!
//! Every error is fatal to the template being compiled; there is no local
//! recovery. Each variant carries the offending expression or types so the
//! message can point at the problem.

use dgop_ir::{Expr, Operator};

use crate::{Repr, TypeInfo};

fn for_expr(expr: &Option<Expr>) -> String {
    match expr {
        Some(expr) => format!(" for '{expr}'"),
        None => String::new(),
    }
}

/// Error from type unification or inference.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// No unification rule applies in either direction.
    #[error("types '{left}' and '{right}'{} cannot be unified", for_expr(.expr))]
    TypeConflict {
        /// The type already known.
        left: TypeInfo,
        /// The type it was unified with.
        right: TypeInfo,
        /// The expression being typed, when the conflict is tied to one.
        expr: Option<Expr>,
    },

    /// An interior-faces vector was requested with a non-quadrature
    /// representation.
    #[error("InteriorFacesVector is not usable with non-quadrature representation '{repr}'")]
    MalformedType {
        /// The rejected representation.
        repr: Repr,
    },

    /// Both unification directions resolved, to different results. This is a
    /// bug in the lattice, not in the template.
    #[error("types '{left}' and '{right}' don't agree about their unifier")]
    InconsistentUnifier {
        /// First input to unification.
        left: TypeInfo,
        /// Second input to unification.
        right: TypeInfo,
    },

    /// Inference converged without a final type for `expr`.
    #[error(
        "type inference was unable to deduce complete type information for '{expr}' (only '{partial}')"
    )]
    IncompleteInference {
        /// The expression left without a final type.
        expr: Expr,
        /// What was deduced for it.
        partial: TypeInfo,
    },

    /// No inference rule for this operator.
    #[error("type inference doesn't know how to handle operator '{op}' in '{expr}'")]
    UnsupportedOperator {
        /// The unhandled operator.
        op: Operator,
        /// The binding applying it.
        expr: Expr,
    },

    /// No inference rule for this node kind in this position.
    #[error("type inference doesn't know how to handle '{expr}'")]
    UnsupportedExpression {
        /// The unhandled node.
        expr: Expr,
    },
}
