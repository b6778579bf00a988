//! Compilation options.

use dgop_ir::Expr;
use dgop_types::{TypeHints, TypeInfo};

/// Options for [`compile_template`](crate::compile_template).
///
/// Both passes run by default.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Seed types for the inference runs.
    pub hints: TypeHints,
    /// Run the boundary-to-flux rewrite.
    pub rewrite_boundary_fluxes: bool,
    /// Infer types again on the rewritten template. When off, the types of
    /// the input template are returned.
    pub reinfer: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            hints: TypeHints::default(),
            rewrite_boundary_fluxes: true,
            reinfer: true,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `expr` with type `tp`.
    #[must_use]
    pub fn with_hint(mut self, expr: Expr, tp: TypeInfo) -> Self {
        self.hints.insert(expr, tp);
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: TypeHints) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn rewrite_boundary_fluxes(mut self, enabled: bool) -> Self {
        self.rewrite_boundary_fluxes = enabled;
        self
    }

    #[must_use]
    pub fn reinfer(mut self, enabled: bool) -> Self {
        self.reinfer = enabled;
        self
    }
}
