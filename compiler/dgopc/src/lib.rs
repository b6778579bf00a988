//! Operator template compilation driver.
//!
//! Runs the analysis passes over a template in order:
//!
//! 1. Alias check on every boundary flux pair. Aliased pairs are ill-typed
//!    as well; checking first reports the aliasing instead of the domain
//!    conflict it causes.
//! 2. Type inference on the input, rejecting ill-typed templates.
//! 3. Boundary-to-flux rewriting.
//! 4. Type inference on the rewritten template, producing the type
//!    dictionary a lowering stage consumes.
//!
//! Set `RUST_LOG=dgop_types=debug,dgop_flux=debug` after calling
//! [`init_tracing`] to watch the passes.

mod error;
mod options;

use std::sync::Once;

use dgop_flux::{check_boundary_aliasing, BoundaryFluxRewriter};
use dgop_ir::Expr;
use dgop_types::{TypeDict, TypeInferrer};

pub use error::CompileError;
pub use options::CompileOptions;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// A compiled template.
#[derive(Debug)]
pub struct CompiledTemplate {
    /// The template roots after rewriting.
    pub roots: Vec<Expr>,
    /// Final type of every sub-expression of `roots`.
    pub types: TypeDict,
    /// Number of boundary flux bindings that were rewritten.
    pub rewritten_fluxes: usize,
}

/// Compile a template.
#[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
pub fn compile_template(
    roots: &[Expr],
    options: &CompileOptions,
) -> Result<CompiledTemplate, CompileError> {
    if options.rewrite_boundary_fluxes {
        check_boundary_aliasing(roots)?;
    }

    let initial = TypeInferrer::new().infer(roots, &options.hints)?;

    if !options.rewrite_boundary_fluxes {
        return Ok(CompiledTemplate {
            roots: roots.to_vec(),
            types: initial.types,
            rewritten_fluxes: 0,
        });
    }

    let mut rewriter = BoundaryFluxRewriter::new();
    let rewritten = roots
        .iter()
        .map(|root| rewriter.rewrite(root))
        .collect::<Result<Vec<_>, _>>()?;
    let rewritten_fluxes = rewriter.rewritten();
    tracing::debug!(rewritten_fluxes, "boundary fluxes rewritten");

    let types = if options.reinfer {
        TypeInferrer::new().infer(&rewritten, &options.hints)?.types
    } else {
        initial.types
    };

    Ok(CompiledTemplate {
        roots: rewritten,
        types,
        rewritten_fluxes,
    })
}
