//! Operator template IR.
//!
//! This crate contains the data structures shared by the analysis passes:
//! - Names and opaque tags (boundary tags, quadrature tags)
//! - Expression nodes (`Expr`, `ExprKind`) for operator templates
//! - The operator catalogue (`Operator`) bound to fields by `OperatorBinding`
//! - The kernel-local flux IR (`FluxExpr`) carried by flux operators
//! - Traversal helpers (`ExprFolder`, `DependencyCollector`)
//!
//! # Design Philosophy
//!
//! - **Immutable sharing**: `Expr` is a reference-counted node. Sub-DAGs are
//!   shared freely and never mutated after construction.
//! - **Structural identity**: every node caches its structural hash, so an
//!   `Expr` is a cheap map key and equality short-circuits on pointer identity.
//! - **Closed dispatch**: node kinds and operator kinds are enums, so every
//!   pass matches exhaustively.
//!
//! Floats are stored as `u64` bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod dependencies;
mod expr;
pub mod flux;
mod fold;
mod format;
mod name;
mod operator;

pub use dependencies::{CallPolicy, DependencyCollector};
pub use expr::{ComparisonOp, Expr, ExprKind, Literal};
pub use flux::{FluxExpr, Side};
pub use fold::{fold_children, ExprFolder};
pub use name::{BoundaryTag, Name, QuadratureTag};
pub use operator::{
    DiffKind, ElementwiseLinearKind, FluxOpKind, FluxOperator, MassKind, Operator,
    ReductionKind,
};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Expr;
    // Expr is a single Arc pointer.
    crate::static_assert_size!(Expr, 8);
}
