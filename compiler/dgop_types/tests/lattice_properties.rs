//! Property-based tests for the type lattice and the inference fixpoint.
//!
//! Verifies:
//! 1. Unification does not depend on argument order.
//! 2. `NoType` is the identity and a successful unifier absorbs both inputs.
//! 3. Final types only unify with equal types.
//! 4. Inference results do not depend on the order roots are visited in.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use dgop_ir::{BoundaryTag, DiffKind, Expr, FluxExpr, MassKind, Operator, QuadratureTag};
use dgop_types::{infer_types, Repr, TypeError, TypeHints, TypeInfo};
use proptest::prelude::*;

// -- Strategies --

fn repr_strategy() -> impl Strategy<Value = Repr> {
    prop_oneof![
        Just(Repr::Nodal),
        Just(Repr::quadrature("q")),
        Just(Repr::quadrature("r")),
    ]
}

fn quadrature_tag_strategy() -> impl Strategy<Value = QuadratureTag> {
    prop_oneof![Just(QuadratureTag::new("q")), Just(QuadratureTag::new("r"))]
}

fn boundary_tag_strategy() -> impl Strategy<Value = BoundaryTag> {
    prop_oneof![
        Just(BoundaryTag::named("wall")),
        Just(BoundaryTag::named("inflow")),
        Just(BoundaryTag::Rank(1)),
    ]
}

fn type_strategy() -> impl Strategy<Value = TypeInfo> {
    prop_oneof![
        Just(TypeInfo::NoType),
        Just(TypeInfo::KnownVolume),
        boundary_tag_strategy().prop_map(TypeInfo::KnownBoundary),
        Just(TypeInfo::KnownInteriorFaces),
        repr_strategy().prop_map(TypeInfo::KnownRepresentation),
        Just(TypeInfo::Scalar),
        repr_strategy().prop_map(TypeInfo::VolumeVector),
        (boundary_tag_strategy(), repr_strategy())
            .prop_map(|(tag, repr)| TypeInfo::boundary_vector(tag, repr)),
        quadrature_tag_strategy().prop_map(TypeInfo::InteriorFacesVector),
    ]
}

/// A pool of well-typed roots sharing the variables `u` and `v`.
fn root_pool() -> Vec<Expr> {
    let u = Expr::var("u");
    let v = Expr::var("v");
    let wall = BoundaryTag::named("wall");
    let q = QuadratureTag::new("q");
    let shared = Expr::cse(Expr::sum(vec![u.clone(), Expr::int(1)]));
    let scaled = Expr::cse(Expr::product(vec![Expr::int(2), u.clone()]));

    vec![
        scaled,
        Expr::sum(vec![u.clone(), v.clone()]),
        Expr::bind(
            Operator::Diff {
                kind: DiffKind::Differentiation,
                xyz_axis: 0,
            },
            shared.clone(),
        ),
        Expr::bind(Operator::Mass(MassKind::Mass), shared),
        Expr::bind(
            Operator::flux(FluxExpr::interior(0) - FluxExpr::exterior(0)),
            Expr::boundary_pair(
                v.clone(),
                Expr::bind(Operator::restrict(wall.clone()), v.clone()),
                wall,
            ),
        ),
        Expr::bind(
            Operator::ReferenceQuadratureMass {
                quadrature_tag: q.clone(),
            },
            Expr::bind(Operator::upsample(q), u),
        ),
        Expr::product(vec![Expr::scalar_parameter("dt"), v]),
    ]
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        max_global_rejects: 16384,
        ..ProptestConfig::default()
    })]

    #[test]
    fn unify_is_order_independent(a in type_strategy(), b in type_strategy()) {
        let forward = a.unify(&b, None);
        let backward = b.unify(&a, None);

        prop_assert!(
            !matches!(forward, Err(TypeError::InconsistentUnifier { .. })),
            "inconsistent unifier for {:?} / {:?}",
            a,
            b
        );
        match (forward, backward) {
            (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
            (Err(_), Err(_)) => {}
            (x, y) => prop_assert!(false, "asymmetric unification: {:?} vs {:?}", x, y),
        }
    }

    #[test]
    fn no_type_is_identity(a in type_strategy()) {
        prop_assert_eq!(a.unify(&TypeInfo::NoType, None), Ok(a.clone()));
    }

    #[test]
    fn unifier_absorbs_both_inputs(a in type_strategy(), b in type_strategy()) {
        if let Ok(c) = a.unify(&b, None) {
            prop_assert_eq!(c.unify(&a, None), Ok(c.clone()));
            prop_assert_eq!(c.unify(&b, None), Ok(c.clone()));
        }
    }

    #[test]
    fn final_types_only_unify_with_equal_types(a in type_strategy(), b in type_strategy()) {
        prop_assume!(a.is_final() && b.is_final());
        prop_assert_eq!(a.unify(&b, None).is_ok(), a == b);
    }

    #[test]
    fn inference_is_independent_of_root_order(
        roots in Just(root_pool()).prop_shuffle(),
    ) {
        let hints = TypeHints::default();
        let expected = infer_types(&root_pool(), &hints).unwrap().types.into_map();
        let actual = infer_types(&roots, &hints).unwrap().types.into_map();
        prop_assert_eq!(actual, expected);
    }
}
