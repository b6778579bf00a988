//! Rewrite errors.

use dgop_ir::{BoundaryTag, Expr, Operator};

fn join(exprs: &[Expr]) -> String {
    exprs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error from boundary-to-flux rewriting. Every variant is fatal to the
/// template being compiled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// An operator other than restriction, exchange or upsampling was
    /// applied to boundary data.
    #[error(
        "found '{op}' in a boundary term; no operator applies directly to boundary data (in '{expr}')"
    )]
    IllegalBoundaryOperator {
        /// The offending operator.
        op: Operator,
        /// The binding applying it.
        expr: Expr,
    },

    /// The same data is read on both sides of a boundary pair.
    #[error("variables are being used as both boundary and volume quantities: {}", join(.shared))]
    AliasedDomainVariable {
        /// Dependencies read on both sides, in boundary-side order.
        shared: Vec<Expr>,
    },

    /// A tag recorded on `construct` disagrees with the enclosing pair.
    #[error("{construct} and boundary pair do not agree about boundary tag: {found} vs {expected}")]
    TagMismatch {
        /// What carried the tag (e.g. "restriction").
        construct: &'static str,
        /// The tag on the construct.
        found: BoundaryTag,
        /// The tag of the enclosing pair.
        expected: BoundaryTag,
    },

    /// A flux-kernel normal appeared in a boundary field.
    #[error(
        "boundary field contains the flux normal '{expr}'; use a boundary normal component for normals in boundary terms"
    )]
    BareFluxNormal {
        /// The flux normal leaf.
        expr: Expr,
    },

    /// The flux kernel reads a boundary component the pair doesn't provide.
    #[error("flux kernel reads boundary component {index}, but the boundary field has {len}")]
    BoundaryComponentOutOfRange {
        /// Exterior component index read by the kernel.
        index: usize,
        /// Number of boundary field components.
        len: usize,
    },

    /// No flux IR counterpart exists for this node kind.
    #[error("'{expr}' cannot be evaluated inside a flux kernel")]
    UnsupportedExpression {
        /// The untranslatable node.
        expr: Expr,
    },
}
