use pretty_assertions::assert_eq;

use dgop_ir::QuadratureTag;

use super::*;
use crate::test_helpers::{diff, exchange_op, q, restrict, upsample, wall};

fn find(vol: Vec<Expr>, bfield: &Expr) -> Result<(FluxExpr, FluxInputs), RewriteError> {
    let tag = wall();
    let mut detector = ExpensiveOperatorDetector::new();
    let mut finder = FluxEvaluableFinder::new(&tag, vol, &mut detector);
    let flux = finder.rewrite(bfield)?;
    Ok((flux, finder.into_inputs()))
}

#[test]
fn negated_restriction_reuses_volume_input() {
    let u = Expr::var("u");
    let (flux, inputs) = find(vec![u.clone()], &Expr::neg(restrict(u.clone()))).unwrap();

    assert_eq!(flux, -FluxExpr::interior(0));
    assert_eq!(inputs.volume, vec![u]);
    assert!(inputs.boundary.is_empty());
}

#[test]
fn new_restrictions_append_to_volume_inputs() {
    let u = Expr::var("u");
    let v = Expr::var("v");
    let bfield = Expr::sum(vec![restrict(v.clone()), restrict(u.clone()), restrict(v.clone())]);

    let (flux, inputs) = find(vec![u.clone()], &bfield).unwrap();

    assert_eq!(
        flux,
        FluxExpr::sum(vec![
            FluxExpr::interior(1),
            FluxExpr::interior(0),
            FluxExpr::interior(1),
        ])
    );
    assert_eq!(inputs.volume, vec![u, v]);
}

#[test]
fn variables_become_boundary_inputs() {
    let g = Expr::var("g");
    let bfield = Expr::product(vec![Expr::scalar_parameter("c"), g.clone(), g.clone()]);

    let (flux, inputs) = find(vec![Expr::var("u")], &bfield).unwrap();

    assert_eq!(
        flux,
        FluxExpr::product(vec![
            FluxExpr::ScalarParameter(dgop_ir::Name::new("c")),
            FluxExpr::exterior(0),
            FluxExpr::exterior(0),
        ])
    );
    assert_eq!(inputs.boundary, vec![g]);
}

#[test]
fn normal_components_become_flux_normals() {
    let bfield = Expr::product(vec![Expr::normal_component(wall(), 1), restrict(Expr::var("u"))]);
    let (flux, _) = find(vec![Expr::var("u")], &bfield).unwrap();
    assert_eq!(
        flux,
        FluxExpr::product(vec![FluxExpr::normal(1), FluxExpr::interior(0)])
    );
}

#[test]
fn normal_component_on_other_boundary_is_a_tag_mismatch() {
    let bfield = Expr::normal_component(BoundaryTag::named("inflow"), 0);
    assert_eq!(
        find(vec![], &bfield).unwrap_err(),
        RewriteError::TagMismatch {
            construct: "boundary normal component",
            found: BoundaryTag::named("inflow"),
            expected: wall(),
        }
    );
}

#[test]
fn restriction_to_other_boundary_is_a_tag_mismatch() {
    let bfield = Expr::bind(
        Operator::restrict(BoundaryTag::named("inflow")),
        Expr::var("u"),
    );
    assert!(matches!(
        find(vec![], &bfield),
        Err(RewriteError::TagMismatch { construct: "restriction", .. })
    ));
}

#[test]
fn bare_flux_normal_is_rejected() {
    let bfield = Expr::sum(vec![restrict(Expr::var("u")), Expr::flux_normal(0)]);
    assert!(matches!(
        find(vec![Expr::var("u")], &bfield),
        Err(RewriteError::BareFluxNormal { .. })
    ));
}

#[test]
fn exchange_must_match_rank_boundary() {
    let on_rank = BoundaryTag::Rank(2);
    let mut detector = ExpensiveOperatorDetector::new();
    let mut finder = FluxEvaluableFinder::new(&on_rank, vec![], &mut detector);
    let exchanged = exchange_op(Expr::var("u"), 2);

    assert_eq!(finder.rewrite(&exchanged), Ok(FluxExpr::exterior(0)));
    assert!(matches!(
        finder.rewrite(&exchange_op(Expr::var("u"), 3)),
        Err(RewriteError::TagMismatch { construct: "flux exchange", .. })
    ));
    assert_eq!(finder.into_inputs().boundary, vec![exchanged]);
}

#[test]
fn upsamplers_become_boundary_inputs() {
    let boundary_up = Expr::bind(
        Operator::QuadratureBoundaryGridUpsampler {
            quadrature_tag: q(),
            boundary_tag: wall(),
        },
        restrict(Expr::var("u")),
    );
    let generic_up = upsample(restrict(Expr::var("v")));
    let bfield = Expr::sum(vec![boundary_up.clone(), generic_up.clone()]);

    let (flux, inputs) = find(vec![], &bfield).unwrap();

    assert_eq!(
        flux,
        FluxExpr::sum(vec![FluxExpr::exterior(0), FluxExpr::exterior(1)])
    );
    assert_eq!(inputs.boundary, vec![boundary_up, generic_up]);
}

#[test]
fn generic_upsampler_checks_known_operand_tag() {
    let bfield = Expr::bind(
        Operator::upsample(QuadratureTag::new("q")),
        Expr::bind(Operator::restrict(BoundaryTag::named("inflow")), Expr::var("u")),
    );
    assert!(matches!(
        find(vec![], &bfield),
        Err(RewriteError::TagMismatch { construct: "upsampler", .. })
    ));
}

#[test]
fn volume_operator_is_illegal() {
    let bfield = diff(Expr::var("u"));
    assert!(matches!(
        find(vec![], &bfield),
        Err(RewriteError::IllegalBoundaryOperator { .. })
    ));
}

#[test]
fn expensive_cse_stays_one_boundary_input() {
    let shared = Expr::cse(exchange_op(Expr::var("u"), 0));
    let tag = BoundaryTag::Rank(0);
    let bfield = Expr::sum(vec![shared.clone(), Expr::product(vec![Expr::int(2), shared.clone()])]);

    let mut detector = ExpensiveOperatorDetector::new();
    let mut finder = FluxEvaluableFinder::new(&tag, vec![], &mut detector);
    let flux = finder.rewrite(&bfield).unwrap();

    assert_eq!(
        flux,
        FluxExpr::sum(vec![
            FluxExpr::exterior(0),
            FluxExpr::product(vec![FluxExpr::int(2), FluxExpr::exterior(0)]),
        ])
    );
    assert_eq!(finder.into_inputs().boundary, vec![shared]);
}

#[test]
fn cheap_cse_is_inlined() {
    let u = Expr::var("u");
    let shared = Expr::cse(Expr::neg(restrict(u.clone())));

    let (flux, inputs) = find(vec![u], &shared).unwrap();

    assert_eq!(flux, -FluxExpr::interior(0));
    assert!(inputs.boundary.is_empty());
}

#[test]
fn geometric_leaves_are_unsupported() {
    assert!(matches!(
        find(vec![], &Expr::ones()),
        Err(RewriteError::UnsupportedExpression { .. })
    ));
}
