use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use super::*;
use crate::{FluxExpr, Operator};

#[test]
fn separately_built_trees_are_equal() {
    let a = Expr::sum(vec![Expr::var("x"), Expr::int(1)]);
    let b = Expr::sum(vec![Expr::var("x"), Expr::int(1)]);
    assert!(!a.ptr_eq(&b));
    assert_eq!(a, b);
}

#[test]
fn structural_keys_share_map_entries() {
    let mut map = FxHashMap::default();
    map.insert(Expr::var("u"), 1);
    map.insert(Expr::var("u"), 2);
    map.insert(Expr::subscript(Expr::var("u"), 0), 3);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&Expr::var("u")], 2);
}

#[test]
fn cse_prefix_is_part_of_identity() {
    let body = Expr::var("u");
    assert_ne!(Expr::cse(body.clone()), Expr::cse_named(body, "flux"));
}

#[test]
fn float_literals_compare_by_bits() {
    assert_eq!(Expr::float(0.5), Expr::float(0.5));
    assert_ne!(Expr::float(0.5), Expr::float(0.25));
    assert!(Expr::float(-0.0).is_zero());
    assert!(Expr::zero().is_zero());
}

#[test]
fn components_flatten_arrays_only() {
    let u = Expr::var("u");
    assert_eq!(u.components(), std::slice::from_ref(&u));

    let arr = Expr::array(vec![Expr::var("a"), Expr::var("b")]);
    assert_eq!(arr.components(), &[Expr::var("a"), Expr::var("b")]);
}

#[test]
fn children_in_evaluation_order() {
    let expr = Expr::if_positive(Expr::var("c"), Expr::var("t"), Expr::var("e"));
    let names: Vec<String> = expr.children().iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["c", "t", "e"]);
    assert!(Expr::jacobian().is_leaf());
}

#[test]
fn display_renders_bindings_and_pairs() {
    let tag = BoundaryTag::named("wall");
    let pair = Expr::boundary_pair(
        Expr::var("u"),
        Expr::neg(Expr::bind(Operator::restrict(tag.clone()), Expr::var("u"))),
        tag,
    );
    let flux = Expr::bind(
        Operator::flux(FluxExpr::interior(0) - FluxExpr::exterior(0)),
        pair,
    );
    assert_eq!(
        flux.to_string(),
        "Flux[int[0] + (-1 * ext[0])](BPair(u, -1 * Restrict[wall](u), wall))"
    );
}

#[test]
fn display_parenthesizes_compound_operands() {
    let expr = Expr::product(vec![
        Expr::sum(vec![Expr::var("a"), Expr::var("b")]),
        Expr::var("c"),
    ]);
    assert_eq!(expr.to_string(), "(a + b) * c");
}
