//! Builders shared by the rewrite tests.

use dgop_ir::{BoundaryTag, DiffKind, Expr, FluxExpr, Operator, QuadratureTag};

pub fn wall() -> BoundaryTag {
    BoundaryTag::named("wall")
}

pub fn q() -> QuadratureTag {
    QuadratureTag::new("q")
}

pub fn restrict(field: Expr) -> Expr {
    Expr::bind(Operator::restrict(wall()), field)
}

pub fn diff(field: Expr) -> Expr {
    Expr::bind(
        Operator::Diff {
            kind: DiffKind::Differentiation,
            xyz_axis: 0,
        },
        field,
    )
}

pub fn upsample(field: Expr) -> Expr {
    Expr::bind(Operator::upsample(q()), field)
}

pub fn exchange_op(field: Expr, rank: u32) -> Expr {
    Expr::bind(Operator::FluxExchange { index: 0, rank }, field)
}

/// `int[0] - ext[0]`: the jump across a face.
pub fn jump() -> FluxExpr {
    FluxExpr::interior(0) - FluxExpr::exterior(0)
}

/// A flux binding on the pair `(field, bfield)` at the wall.
pub fn wall_flux(flux: FluxExpr, field: Expr, bfield: Expr) -> Expr {
    Expr::bind(
        Operator::flux(flux),
        Expr::boundary_pair(field, bfield, wall()),
    )
}
