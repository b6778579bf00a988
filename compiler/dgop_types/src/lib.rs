//! Type inference for operator templates.
//!
//! Every sub-expression of a template is annotated with a [`TypeInfo`]: how
//! its data is sampled (nodally or on a tagged quadrature grid) and where it
//! lives (volume, a tagged boundary, or interior faces).
//!
//! # Architecture
//!
//! - [`TypeInfo`] and [`Repr`] form a small unification lattice. Partial
//!   types (`KnownVolume`, `KnownRepresentation`, ...) combine into final
//!   types (`VolumeVector`, `BoundaryVector`, ...) through [`TypeInfo::unify`].
//! - [`TypeDict`] records the best-known type per expression and only ever
//!   gains information.
//! - [`TypeInferrer`] runs per-node rules over the template until the
//!   dictionary stops changing, then checks that every entry is final.
//!
//! Information flows both ways: operands constrain results and operators
//! constrain their operands, so inference is a monotone fixpoint rather than a
//! single bottom-up walk.

mod dict;
mod error;
mod infer;
mod info;

pub use dict::{TypeDict, TypeHints};
pub use error::TypeError;
pub use infer::{infer_types, Inference, TypeInferrer};
pub use info::{Repr, TypeInfo};
