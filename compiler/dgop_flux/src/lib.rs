//! Boundary-to-flux rewriting.
//!
//! A flux operator bound to a boundary pair normally needs its boundary field
//! materialized as separate boundary data. When the boundary field is an
//! expression of data the flux kernel can already see (interior values,
//! normals, scalars), that expression is inlined into the kernel instead.
//!
//! # Pipeline
//!
//! 1. [`BoundaryFluxRewriter`] folds the whole template and stops at every
//!    flux binding on a boundary pair.
//! 2. It rejects pairs whose two sides share a variable.
//! 3. [`FluxEvaluableFinder`] translates the boundary field into flux IR,
//!    registering the volume and boundary inputs the kernel still needs.
//!    [`ExpensiveOperatorDetector`] decides which shared subexpressions must
//!    stay materialized so their operators are not evaluated twice.
//! 4. The translated field is substituted into the kernel. A kernel that
//!    vanishes collapses the binding to zero.

mod error;
mod expensive;
mod finder;
mod rewrite;

#[cfg(test)]
mod test_helpers;

pub use error::RewriteError;
pub use expensive::ExpensiveOperatorDetector;
pub use finder::{FluxEvaluableFinder, FluxInputs};
pub use rewrite::{check_boundary_aliasing, rewrite_boundary_fluxes, BoundaryFluxRewriter};
