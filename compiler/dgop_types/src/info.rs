//! The type lattice.
//!
//! Ordered from least to most informative:
//!
//! ```text
//!                 Scalar   VolumeVector(r)   BoundaryVector(t, r)   InteriorFacesVector(q)
//!                               \                  |                     /
//!   KnownVolume   KnownBoundary(t)   KnownInteriorFaces   KnownRepresentation(r)
//!                               \                  |                     /
//!                                              NoType
//! ```
//!
//! Partial types know either the domain or the representation, never both.
//! Final types know everything and unify only with themselves (or `NoType`).
//!
//! # Unification
//!
//! Each type knows how to absorb some others ([`TypeInfo::unify_inner`]).
//! [`TypeInfo::unify`] tries both directions so the result never depends on
//! argument order; if both directions resolve, they must agree.

use std::fmt;

use dgop_ir::{BoundaryTag, Expr, QuadratureTag};

use crate::TypeError;

/// How vector data is sampled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Repr {
    /// At the discretization's nodes.
    Nodal,
    /// On the quadrature grid with the given tag.
    Quadrature(QuadratureTag),
}

impl Repr {
    pub fn quadrature(tag: &str) -> Self {
        Repr::Quadrature(QuadratureTag::new(tag))
    }

    /// Nodal unless a quadrature tag is given.
    pub fn from_quadrature_tag(tag: Option<&QuadratureTag>) -> Self {
        tag.map_or(Repr::Nodal, |q| Repr::Quadrature(q.clone()))
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repr::Nodal => f.write_str("Nodal"),
            Repr::Quadrature(tag) => write!(f, "Quadrature({tag})"),
        }
    }
}

/// What is known about the type of an expression.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    /// Nothing known yet.
    #[default]
    NoType,
    /// A volume vector of unknown representation.
    KnownVolume,
    /// A vector on the given boundary, representation unknown.
    KnownBoundary(BoundaryTag),
    /// A vector of interior face values, representation unknown.
    KnownInteriorFaces,
    /// Representation known, domain unknown.
    KnownRepresentation(Repr),
    Scalar,
    VolumeVector(Repr),
    BoundaryVector {
        tag: BoundaryTag,
        repr: Repr,
    },
    /// Interior face values. Only exists on quadrature grids, so the payload
    /// is the quadrature tag; see [`TypeInfo::interior_faces_vector`].
    InteriorFacesVector(QuadratureTag),
}

impl TypeInfo {
    /// Construct an interior-faces vector type.
    ///
    /// Fails with [`TypeError::MalformedType`] for the nodal representation.
    pub fn interior_faces_vector(repr: Repr) -> Result<Self, TypeError> {
        match repr {
            Repr::Quadrature(tag) => Ok(TypeInfo::InteriorFacesVector(tag)),
            Repr::Nodal => Err(TypeError::MalformedType { repr }),
        }
    }

    pub fn boundary_vector(tag: BoundaryTag, repr: Repr) -> Self {
        TypeInfo::BoundaryVector { tag, repr }
    }

    /// Returns `true` if no more information can be added to this type.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TypeInfo::Scalar
                | TypeInfo::VolumeVector(_)
                | TypeInfo::BoundaryVector { .. }
                | TypeInfo::InteriorFacesVector(_)
        )
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeInfo::Scalar)
    }

    #[inline]
    pub fn is_no_type(&self) -> bool {
        matches!(self, TypeInfo::NoType)
    }

    /// The representation, if known.
    pub fn repr(&self) -> Option<Repr> {
        match self {
            TypeInfo::KnownRepresentation(repr)
            | TypeInfo::VolumeVector(repr)
            | TypeInfo::BoundaryVector { repr, .. } => Some(repr.clone()),
            TypeInfo::InteriorFacesVector(tag) => Some(Repr::Quadrature(tag.clone())),
            TypeInfo::NoType
            | TypeInfo::KnownVolume
            | TypeInfo::KnownBoundary(_)
            | TypeInfo::KnownInteriorFaces
            | TypeInfo::Scalar => None,
        }
    }

    /// Only the representation aspect of this type.
    pub fn extract_representation(&self) -> TypeInfo {
        self.repr()
            .map_or(TypeInfo::NoType, TypeInfo::KnownRepresentation)
    }

    /// Only the domain aspect of this type (volume or boundary).
    pub fn extract_domain(&self) -> TypeInfo {
        match self {
            TypeInfo::KnownVolume | TypeInfo::VolumeVector(_) => TypeInfo::KnownVolume,
            TypeInfo::KnownBoundary(tag) | TypeInfo::BoundaryVector { tag, .. } => {
                TypeInfo::KnownBoundary(tag.clone())
            }
            _ => TypeInfo::NoType,
        }
    }

    /// Return a type that represents both `self` and `other`.
    ///
    /// `expr` is the expression being typed, used for diagnostics only.
    pub fn unify(&self, other: &TypeInfo, expr: Option<&Expr>) -> Result<TypeInfo, TypeError> {
        if self == other {
            return Ok(self.clone());
        }

        match (self.unify_inner(other), other.unify_inner(self)) {
            (None, None) => Err(TypeError::TypeConflict {
                left: self.clone(),
                right: other.clone(),
                expr: expr.cloned(),
            }),
            (Some(tp), None) | (None, Some(tp)) => Ok(tp),
            (Some(forward), Some(backward)) => {
                if forward == backward {
                    Ok(forward)
                } else {
                    Err(TypeError::InconsistentUnifier {
                        left: self.clone(),
                        right: other.clone(),
                    })
                }
            }
        }
    }

    /// One direction of unification. `None` means "ask the other side".
    fn unify_inner(&self, other: &TypeInfo) -> Option<TypeInfo> {
        match (self, other) {
            (TypeInfo::NoType, _) => Some(other.clone()),

            // Unification with KnownRepresentation is handled there.
            (TypeInfo::KnownVolume, TypeInfo::VolumeVector(_)) => Some(other.clone()),

            (TypeInfo::KnownInteriorFaces, TypeInfo::InteriorFacesVector(_)) => {
                Some(other.clone())
            }
            // Interior faces only exist under quadrature; otherwise they
            // degrade to ordinary nodal volume data.
            (TypeInfo::KnownInteriorFaces, TypeInfo::KnownVolume)
            | (TypeInfo::KnownInteriorFaces, TypeInfo::VolumeVector(Repr::Nodal)) => {
                Some(TypeInfo::VolumeVector(Repr::Nodal))
            }

            (TypeInfo::KnownBoundary(tag), TypeInfo::BoundaryVector { tag: other_tag, .. })
                if tag == other_tag =>
            {
                Some(other.clone())
            }

            (TypeInfo::KnownRepresentation(repr), _) => match other {
                TypeInfo::VolumeVector(other_repr)
                | TypeInfo::BoundaryVector {
                    repr: other_repr, ..
                } if repr == other_repr => Some(other.clone()),
                TypeInfo::InteriorFacesVector(tag) if *repr == Repr::Quadrature(tag.clone()) => {
                    Some(other.clone())
                }
                TypeInfo::KnownVolume => Some(TypeInfo::VolumeVector(repr.clone())),
                TypeInfo::KnownInteriorFaces => match repr {
                    Repr::Nodal => Some(TypeInfo::VolumeVector(Repr::Nodal)),
                    Repr::Quadrature(tag) => Some(TypeInfo::InteriorFacesVector(tag.clone())),
                },
                TypeInfo::KnownBoundary(tag) => Some(TypeInfo::BoundaryVector {
                    tag: tag.clone(),
                    repr: repr.clone(),
                }),
                _ => None,
            },

            _ => None,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::NoType => f.write_str("NoType"),
            TypeInfo::KnownVolume => f.write_str("KnownAsVolume"),
            TypeInfo::KnownBoundary(tag) => write!(f, "KnownAsBoundary({tag})"),
            TypeInfo::KnownInteriorFaces => f.write_str("KnownAsIntFace"),
            TypeInfo::KnownRepresentation(repr) => write!(f, "KnownRepresentation({repr})"),
            TypeInfo::Scalar => f.write_str("Scalar"),
            TypeInfo::VolumeVector(repr) => write!(f, "Volume({repr})"),
            TypeInfo::BoundaryVector { tag, repr } => write!(f, "Boundary({tag}, {repr})"),
            TypeInfo::InteriorFacesVector(tag) => write!(f, "InteriorFaces(Quadrature({tag}))"),
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
