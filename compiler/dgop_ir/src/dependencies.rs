//! Dependency collection.
//!
//! Finds the free variables (and optionally whole operator bindings) an
//! expression reads. Shared sub-DAGs are visited once.

use rustc_hash::FxHashSet;

use crate::{Expr, ExprKind};

/// How function calls contribute dependencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallPolicy {
    /// The call node itself is a dependency.
    #[default]
    Include,
    /// Only the call's arguments are searched.
    DescendArgs,
}

/// Collects the dependencies of an expression.
///
/// Variables and subscripts are always dependencies. Operator bindings (and
/// flux-exchange leaves) are reported whole when `include_operator_bindings`
/// is set; otherwise their operands are searched.
#[derive(Clone, Copy, Debug, Default)]
pub struct DependencyCollector {
    calls: CallPolicy,
    include_operator_bindings: bool,
}

impl DependencyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_calls(mut self, calls: CallPolicy) -> Self {
        self.calls = calls;
        self
    }

    #[must_use]
    pub fn with_operator_bindings(mut self, include: bool) -> Self {
        self.include_operator_bindings = include;
        self
    }

    /// Dependencies of `expr`, deduplicated, in order of first occurrence.
    pub fn collect(&self, expr: &Expr) -> Vec<Expr> {
        let mut state = CollectState {
            visited: FxHashSet::default(),
            deps: Vec::new(),
        };
        self.visit(expr, &mut state);
        state.deps
    }

    fn visit(&self, expr: &Expr, state: &mut CollectState) {
        if !state.visited.insert(expr.clone()) {
            return;
        }

        match expr.kind() {
            ExprKind::Variable(_) | ExprKind::Subscript { .. } => state.record(expr),
            ExprKind::Call { parameters, .. } => match self.calls {
                CallPolicy::Include => state.record(expr),
                CallPolicy::DescendArgs => {
                    for param in parameters {
                        self.visit(param, state);
                    }
                }
            },
            ExprKind::OperatorBinding { field, .. } => {
                if self.include_operator_bindings {
                    state.record(expr);
                } else {
                    self.visit(field, state);
                }
            }
            ExprKind::FluxExchange { arg_fields, .. } => {
                if self.include_operator_bindings {
                    state.record(expr);
                } else {
                    for arg in arg_fields {
                        self.visit(arg, state);
                    }
                }
            }
            _ => {
                for child in expr.children() {
                    self.visit(child, state);
                }
            }
        }
    }
}

struct CollectState {
    visited: FxHashSet<Expr>,
    deps: Vec<Expr>,
}

impl CollectState {
    /// Each node is visited once, so no further deduplication is needed.
    fn record(&mut self, expr: &Expr) {
        self.deps.push(expr.clone());
    }
}
