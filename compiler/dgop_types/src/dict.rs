//! The type dictionary.
//!
//! Maps each expression (by structural identity) to the best type known for
//! it so far. Writes are monotone: a write is unified with the recorded
//! type, so it can only add information. Writes that add information set the
//! change flag that drives the inference fixpoint.

use rustc_hash::FxHashMap;

use dgop_ir::Expr;

use crate::{TypeError, TypeInfo};

/// Externally supplied seed types.
pub type TypeHints = FxHashMap<Expr, TypeInfo>;

/// Current best-known type per expression.
#[derive(Clone, Debug, Default)]
pub struct TypeDict {
    container: FxHashMap<Expr, TypeInfo>,
    changed: bool,
    /// Number of information-adding writes since creation.
    writes: usize,
}

impl TypeDict {
    /// Create a dictionary seeded with `hints`.
    pub fn new(hints: &TypeHints) -> Self {
        Self {
            container: hints.clone(),
            changed: false,
            writes: 0,
        }
    }

    /// The recorded type of `expr`, or `NoType`.
    pub fn get(&self, expr: &Expr) -> TypeInfo {
        self.container.get(expr).cloned().unwrap_or_default()
    }

    /// The recorded type of `expr`, if any.
    pub fn lookup(&self, expr: &Expr) -> Option<&TypeInfo> {
        self.container.get(expr)
    }

    /// Record `new_tp` for `expr`, unified with what is already known.
    ///
    /// Writing `NoType` is a no-op. Fails if the new type conflicts with the
    /// recorded one.
    pub fn set(&mut self, expr: &Expr, new_tp: TypeInfo) -> Result<(), TypeError> {
        if new_tp.is_no_type() {
            return Ok(());
        }

        match self.container.get_mut(expr) {
            None => {
                self.container.insert(expr.clone(), new_tp);
                self.note_write();
            }
            Some(old_tp) => {
                let tp = old_tp.unify(&new_tp, Some(expr))?;
                if tp != *old_tp {
                    *old_tp = tp;
                    self.note_write();
                }
            }
        }
        Ok(())
    }

    fn note_write(&mut self) {
        self.changed = true;
        self.writes += 1;
    }

    pub(crate) fn changed(&self) -> bool {
        self.changed
    }

    pub(crate) fn reset_changed(&mut self) {
        self.changed = false;
    }

    /// Force another fixpoint pass without recording a write.
    pub(crate) fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Number of information-adding writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &TypeInfo)> {
        self.container.iter()
    }

    /// Consume the dictionary, returning the raw mapping (e.g. to seed
    /// another inference run).
    pub fn into_map(self) -> FxHashMap<Expr, TypeInfo> {
        self.container
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
