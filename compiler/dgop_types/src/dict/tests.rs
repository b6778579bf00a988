use pretty_assertions::assert_eq;

use super::*;
use crate::Repr;

#[test]
fn missing_entries_read_as_no_type() {
    let dict = TypeDict::default();
    assert_eq!(dict.get(&Expr::var("u")), TypeInfo::NoType);
    assert!(dict.lookup(&Expr::var("u")).is_none());
}

#[test]
fn writing_no_type_is_ignored() {
    let mut dict = TypeDict::default();
    dict.set(&Expr::var("u"), TypeInfo::NoType).unwrap();
    assert!(dict.is_empty());
    assert!(!dict.changed());
}

#[test]
fn writes_are_unified_with_existing_entries() {
    let u = Expr::var("u");
    let mut dict = TypeDict::default();

    dict.set(&u, TypeInfo::KnownVolume).unwrap();
    dict.set(&u, TypeInfo::KnownRepresentation(Repr::Nodal)).unwrap();

    assert_eq!(dict.get(&u), TypeInfo::VolumeVector(Repr::Nodal));
    assert_eq!(dict.writes(), 2);
}

#[test]
fn downgrading_write_is_a_no_op() {
    let u = Expr::var("u");
    let mut dict = TypeDict::default();
    dict.set(&u, TypeInfo::VolumeVector(Repr::Nodal)).unwrap();
    dict.reset_changed();

    dict.set(&u, TypeInfo::KnownVolume).unwrap();

    assert_eq!(dict.get(&u), TypeInfo::VolumeVector(Repr::Nodal));
    assert!(!dict.changed());
    assert_eq!(dict.writes(), 1);
}

#[test]
fn conflicting_write_fails_with_expression() {
    let u = Expr::var("u");
    let mut dict = TypeDict::default();
    dict.set(&u, TypeInfo::Scalar).unwrap();

    let err = dict
        .set(&u, TypeInfo::VolumeVector(Repr::Nodal))
        .unwrap_err();
    assert!(matches!(err, TypeError::TypeConflict { expr: Some(e), .. } if e == u));
}

#[test]
fn hints_seed_the_dictionary() {
    let mut hints = TypeHints::default();
    hints.insert(Expr::var("u"), TypeInfo::Scalar);
    let dict = TypeDict::new(&hints);
    assert_eq!(dict.get(&Expr::var("u")), TypeInfo::Scalar);
    assert_eq!(dict.writes(), 0);
}
