//! Compilation errors.

use dgop_flux::RewriteError;
use dgop_types::TypeError;

/// Error from compiling a template. Compilation stops at the first error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("type inference failed: {0}")]
    Type(#[from] TypeError),

    #[error("boundary flux rewriting failed: {0}")]
    Rewrite(#[from] RewriteError),
}
