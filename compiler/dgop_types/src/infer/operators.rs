//! Inference rules for operator applications and flux nodes.
//!
//! Each rule pins the operand's type (downward), recurses into the operand,
//! and returns the application's own type (upward).

use dgop_ir::{BoundaryTag, Expr, ExprKind, MassKind, Operator};

use super::TypeInferrer;
use crate::{Repr, TypeDict, TypeError, TypeInfo};

impl TypeInferrer {
    pub(super) fn infer_operator_binding(
        &mut self,
        expr: &Expr,
        op: &Operator,
        field: &Expr,
        types: &mut TypeDict,
    ) -> Result<TypeInfo, TypeError> {
        let nodal_volume = TypeInfo::VolumeVector(Repr::Nodal);

        match op {
            Operator::NodalReduction(_) => {
                self.pin_and_rec(field, TypeInfo::KnownVolume, types)?;
                Ok(TypeInfo::Scalar)
            }

            Operator::ReferenceQuadratureStiffnessT { quadrature_tag, .. }
            | Operator::ReferenceQuadratureMass { quadrature_tag } => {
                let quad_volume = TypeInfo::VolumeVector(Repr::Quadrature(quadrature_tag.clone()));
                self.pin_and_rec(field, quad_volume, types)?;
                Ok(nodal_volume)
            }

            // Quadrature specialization may later retarget these to a
            // quadrature operand, so only the domain is pinned.
            Operator::StiffnessT { .. }
            | Operator::ReferenceStiffnessT { .. }
            | Operator::Mass(MassKind::Mass)
            | Operator::ReferenceMass(MassKind::Mass) => {
                self.pin_and_rec(field, TypeInfo::KnownVolume, types)?;
                Ok(nodal_volume)
            }

            Operator::Diff { .. }
            | Operator::ReferenceDiff { .. }
            | Operator::Mass(MassKind::InverseMass)
            | Operator::ReferenceMass(MassKind::InverseMass)
            | Operator::ElementwiseLinear(_) => {
                self.pin_and_rec(field, nodal_volume.clone(), types)?;
                Ok(nodal_volume)
            }

            Operator::ElementwiseMax => {
                let tp = types.get(expr).unify(&TypeInfo::KnownVolume, Some(field))?;
                self.pin_and_rec(field, tp, types)
            }

            Operator::RestrictToBoundary { tag } => {
                // The operand shares the representation of the result.
                let upward = TypeInfo::KnownVolume
                    .unify(&types.get(expr).extract_representation(), Some(field))?;
                self.pin_and_rec(field, upward, types)?;

                // And the result shares the representation of the operand.
                TypeInfo::KnownBoundary(tag.clone())
                    .unify(&types.get(field).extract_representation(), Some(expr))
            }

            Operator::Flux(_) => {
                let mut repr_cell = TypeInfo::NoType;
                match field.kind() {
                    ExprKind::BoundaryPair {
                        field: vol,
                        bfield,
                        tag,
                    } => {
                        self.infer_flux_args(vol, bfield, tag, &mut repr_cell, types)?;
                    }
                    _ => {
                        for arg in field.components() {
                            self.infer_flux_arg(
                                arg,
                                TypeInfo::KnownInteriorFaces,
                                &mut repr_cell,
                                types,
                            )?;
                        }
                    }
                }
                Ok(nodal_volume)
            }

            Operator::QuadratureGridUpsampler { quadrature_tag } => {
                let domain = types.get(expr).extract_domain();
                self.pin_and_rec(field, domain, types)?;
                TypeInfo::KnownRepresentation(Repr::Quadrature(quadrature_tag.clone()))
                    .unify(&types.get(field).extract_domain(), Some(expr))
            }

            Operator::QuadratureInteriorFacesGridUpsampler { quadrature_tag } => {
                self.pin_and_rec(field, nodal_volume, types)?;
                Ok(TypeInfo::InteriorFacesVector(quadrature_tag.clone()))
            }

            Operator::QuadratureBoundaryGridUpsampler {
                quadrature_tag,
                boundary_tag,
            } => {
                let nodal_boundary = TypeInfo::boundary_vector(boundary_tag.clone(), Repr::Nodal);
                self.pin_and_rec(field, nodal_boundary, types)?;
                Ok(TypeInfo::boundary_vector(
                    boundary_tag.clone(),
                    Repr::Quadrature(quadrature_tag.clone()),
                ))
            }

            // Exchanges are introduced as leaves; a bound exchange operator
            // has no typing rule.
            Operator::FluxExchange { .. } | Operator::External(_) => {
                Err(TypeError::UnsupportedOperator {
                    op: op.clone(),
                    expr: expr.clone(),
                })
            }
        }
    }

    pub(super) fn infer_whole_domain_flux(
        &mut self,
        interiors: &[Expr],
        boundaries: &[Expr],
        types: &mut TypeDict,
    ) -> Result<TypeInfo, TypeError> {
        let mut repr_cell = TypeInfo::NoType;

        for interior in interiors {
            for arg in interior.components() {
                self.infer_flux_arg(arg, TypeInfo::KnownInteriorFaces, &mut repr_cell, types)?;
            }
        }

        for bpair in boundaries {
            match bpair.kind() {
                ExprKind::BoundaryPair { field, bfield, tag } => {
                    self.infer_flux_args(field, bfield, tag, &mut repr_cell, types)?;
                }
                _ => return Err(TypeError::UnsupportedExpression { expr: bpair.clone() }),
            }
        }

        Ok(TypeInfo::VolumeVector(Repr::Nodal))
    }

    pub(super) fn infer_flux_exchange(
        &mut self,
        rank: u32,
        arg_fields: &[Expr],
        types: &mut TypeDict,
    ) -> Result<TypeInfo, TypeError> {
        for arg in arg_fields {
            self.pin_and_rec(arg, TypeInfo::VolumeVector(Repr::Nodal), types)?;
        }
        Ok(TypeInfo::boundary_vector(BoundaryTag::Rank(rank), Repr::Nodal))
    }

    /// Type the volume and boundary halves of a boundary pair.
    fn infer_flux_args(
        &mut self,
        vol: &Expr,
        bfield: &Expr,
        tag: &BoundaryTag,
        repr_cell: &mut TypeInfo,
        types: &mut TypeDict,
    ) -> Result<(), TypeError> {
        for arg in vol.components() {
            self.infer_flux_arg(arg, TypeInfo::KnownInteriorFaces, repr_cell, types)?;
        }
        for arg in bfield.components() {
            self.infer_flux_arg(arg, TypeInfo::KnownBoundary(tag.clone()), repr_cell, types)?;
        }
        Ok(())
    }

    /// Pin one flux argument to `domain`, sharing the representation of the
    /// arguments seen before it.
    fn infer_flux_arg(
        &mut self,
        arg: &Expr,
        domain: TypeInfo,
        repr_cell: &mut TypeInfo,
        types: &mut TypeDict,
    ) -> Result<(), TypeError> {
        let tp = domain.unify(repr_cell, Some(arg))?;
        types.set(arg, tp)?;
        *repr_cell = self.rec(arg, types)?.extract_representation();
        Ok(())
    }

    fn pin_and_rec(
        &mut self,
        field: &Expr,
        tp: TypeInfo,
        types: &mut TypeDict,
    ) -> Result<TypeInfo, TypeError> {
        types.set(field, tp)?;
        self.rec(field, types)
    }
}
