use pretty_assertions::assert_eq;

use super::*;

#[test]
fn sum_drops_zero_terms() {
    let flux = FluxExpr::sum(vec![FluxExpr::zero(), FluxExpr::interior(0), FluxExpr::zero()]);
    assert_eq!(flux, FluxExpr::interior(0));
}

#[test]
fn product_with_zero_factor_is_zero() {
    let flux = FluxExpr::normal(0) * FluxExpr::zero();
    assert!(flux.is_zero());
}

#[test]
fn product_drops_unit_factors() {
    let flux = FluxExpr::int(1) * FluxExpr::exterior(2);
    assert_eq!(flux, FluxExpr::exterior(2));
}

#[test]
fn negated_zero_is_zero() {
    assert!((-FluxExpr::zero()).is_zero());
}

#[test]
fn conditional_with_zero_branches_is_zero() {
    let flux = FluxExpr::if_(
        FluxExpr::compare(FluxExpr::normal(0), ComparisonOp::Gt, FluxExpr::zero()),
        FluxExpr::zero(),
        FluxExpr::float(0.0),
    );
    assert!(flux.is_zero());
}

#[test]
fn substitute_exterior_components() {
    // 0.5 * (int0 - ext0)  with  ext0 := -int0
    let flux = FluxExpr::float(0.5) * (FluxExpr::interior(0) - FluxExpr::exterior(0));
    let rewritten = flux.substitute(&mut |e| match e {
        FluxExpr::FieldComponent {
            side: Side::Exterior,
            ..
        } => Some(-FluxExpr::interior(0)),
        _ => None,
    });

    let expected = FluxExpr::float(0.5) * (FluxExpr::interior(0) - (-FluxExpr::interior(0)));
    assert_eq!(rewritten, expected);
}

#[test]
fn substitute_to_zero_collapses_kernel() {
    let flux = FluxExpr::normal(1) * FluxExpr::exterior(0);
    let rewritten = flux.substitute(&mut |e| match e {
        FluxExpr::FieldComponent {
            side: Side::Exterior,
            ..
        } => Some(FluxExpr::zero()),
        _ => None,
    });
    assert!(rewritten.is_zero());
}

#[test]
fn field_components_are_visited_in_order() {
    let flux = FluxExpr::interior(1) - FluxExpr::exterior(0) * FluxExpr::normal(0);
    let mut seen = Vec::new();
    flux.for_each_field_component(&mut |index, side| seen.push((index, side)));
    assert_eq!(seen, vec![(1, Side::Interior), (0, Side::Exterior)]);
}
