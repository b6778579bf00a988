use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{diff, exchange_op, jump, restrict, wall, wall_flux};

fn rewrite(expr: &Expr) -> Result<Expr, RewriteError> {
    BoundaryFluxRewriter::new().rewrite(expr)
}

#[test]
fn negated_restriction_needs_no_boundary_inputs() {
    let u = Expr::var("u");
    let expr = wall_flux(jump(), u.clone(), Expr::neg(restrict(u.clone())));

    let result = rewrite(&expr).unwrap();

    let expected = Expr::bind(
        Operator::flux(FluxExpr::interior(0) - (-FluxExpr::interior(0))),
        Expr::boundary_pair(Expr::array(vec![u]), Expr::array(vec![]), wall()),
    );
    assert_eq!(result, expected);
}

#[test]
fn same_variable_on_both_sides_is_aliased() {
    let u = Expr::var("u");
    let expr = wall_flux(jump(), u.clone(), u.clone());

    assert_eq!(
        rewrite(&expr),
        Err(RewriteError::AliasedDomainVariable { shared: vec![u] })
    );
}

#[test]
fn aliasing_looks_through_call_arguments() {
    let u = Expr::var("u");
    let bfield = Expr::call("sin", vec![u.clone()]);
    let expr = wall_flux(jump(), Expr::array(vec![u.clone(), Expr::var("v")]), bfield);

    assert!(matches!(
        rewrite(&expr),
        Err(RewriteError::AliasedDomainVariable { .. })
    ));
}

#[test]
fn alias_check_finds_nested_pairs_without_rewriting() {
    let u = Expr::var("u");
    let mirrored = wall_flux(jump(), u.clone(), Expr::neg(restrict(u.clone())));
    let aliased = Expr::cse(wall_flux(jump(), u.clone(), u.clone()));

    assert_eq!(check_boundary_aliasing(&[mirrored.clone()]), Ok(()));
    assert_eq!(
        check_boundary_aliasing(&[mirrored, Expr::sum(vec![diff(u.clone()), aliased])]),
        Err(RewriteError::AliasedDomainVariable { shared: vec![u] })
    );
}

#[test]
fn vanishing_flux_collapses_to_zero() {
    let u = Expr::var("u");
    let flux = FluxExpr::interior(0) * FluxExpr::exterior(0);
    let root = Expr::sum(vec![diff(u.clone()), wall_flux(flux, u.clone(), Expr::zero())]);

    let result = rewrite(&root).unwrap();

    assert_eq!(result, Expr::sum(vec![diff(u), Expr::zero()]));
}

#[test]
fn shared_exchange_is_one_boundary_input() {
    let u = Expr::var("u");
    let shared = Expr::cse(exchange_op(u.clone(), 1));
    let tag = BoundaryTag::Rank(1);
    let flux = FluxExpr::interior(0) * FluxExpr::exterior(0) + FluxExpr::exterior(0);
    let expr = Expr::bind(
        Operator::flux(flux.clone()),
        Expr::boundary_pair(u.clone(), shared.clone(), tag.clone()),
    );

    let result = rewrite(&expr).unwrap();

    let expected = Expr::bind(
        Operator::flux(flux),
        Expr::boundary_pair(Expr::array(vec![u]), Expr::array(vec![shared]), tag),
    );
    assert_eq!(result, expected);
}

#[test]
fn bare_flux_normal_in_boundary_field_fails() {
    let u = Expr::var("u");
    let bfield = Expr::product(vec![Expr::flux_normal(0), restrict(u.clone())]);
    let expr = wall_flux(jump(), u, bfield);

    assert!(matches!(
        rewrite(&expr),
        Err(RewriteError::BareFluxNormal { .. })
    ));
}

#[test]
fn lift_operators_keep_their_kind() {
    let u = Expr::var("u");
    let g = Expr::var("g");
    let expr = Expr::bind(
        Operator::lift(jump()),
        Expr::boundary_pair(u.clone(), g.clone(), wall()),
    );

    let result = rewrite(&expr).unwrap();

    let expected = Expr::bind(
        Operator::lift(jump()),
        Expr::boundary_pair(Expr::array(vec![u]), Expr::array(vec![g]), wall()),
    );
    assert_eq!(result, expected);
}

#[test]
fn non_pair_bindings_are_left_alone() {
    let expr = Expr::sum(vec![
        diff(Expr::var("u")),
        Expr::bind(Operator::flux(jump()), Expr::var("u")),
    ]);
    let result = rewrite(&expr).unwrap();
    assert!(result.ptr_eq(&expr));
}

#[test]
fn shared_flux_bindings_are_rewritten_once() {
    let u = Expr::var("u");
    let shared = Expr::cse(wall_flux(jump(), u.clone(), Expr::var("g")));
    let root = Expr::sum(vec![shared.clone(), diff(shared)]);

    let mut rewriter = BoundaryFluxRewriter::new();
    let result = rewriter.rewrite(&root).unwrap();

    assert_eq!(rewriter.rewritten(), 1);
    let ExprKind::Sum(terms) = result.kind() else {
        panic!("expected a sum, got {result}");
    };
    let ExprKind::OperatorBinding { field, .. } = terms[1].kind() else {
        panic!("expected a binding, got {}", terms[1]);
    };
    assert!(terms[0].ptr_eq(field));
}

#[test]
fn kernel_reading_missing_boundary_component_fails() {
    let u = Expr::var("u");
    let flux = FluxExpr::exterior(1);
    let expr = wall_flux(flux, u, Expr::var("g"));

    assert_eq!(
        rewrite(&expr),
        Err(RewriteError::BoundaryComponentOutOfRange { index: 1, len: 1 })
    );
}

#[test]
fn every_root_is_rewritten() {
    let u = Expr::var("u");
    let roots = vec![
        wall_flux(jump(), u.clone(), Expr::neg(restrict(u.clone()))),
        wall_flux(FluxExpr::exterior(0), u.clone(), Expr::zero()),
    ];

    let result = rewrite_boundary_fluxes(&roots).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[1], Expr::zero());
}
