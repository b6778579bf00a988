//! Kernel-local flux IR.
//!
//! A flux kernel is evaluated once per face from interior and exterior field
//! values plus the face normal. Field values are referenced by position:
//! [`FluxExpr::FieldComponent`] with [`Side::Interior`] indexes the volume
//! fields of the bound pair, [`Side::Exterior`] indexes its boundary fields.
//!
//! The constructors fold additive and multiplicative zeros, so substituting a
//! zero boundary value into a kernel collapses the affected terms. This is
//! what lets the boundary rewriter detect kernels that vanish entirely.

use std::ops;

use crate::{ComparisonOp, Literal, Name};

/// Which side of a face a field component is sampled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Interior,
    Exterior,
}

/// An expression in the flux kernel language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FluxExpr {
    FieldComponent { index: usize, side: Side },
    Normal { axis: usize },
    Constant(Literal),
    ScalarParameter(Name),
    Sum(Vec<FluxExpr>),
    Product(Vec<FluxExpr>),
    Quotient(Box<FluxExpr>, Box<FluxExpr>),
    Power(Box<FluxExpr>, Box<FluxExpr>),
    Comparison {
        left: Box<FluxExpr>,
        op: ComparisonOp,
        right: Box<FluxExpr>,
    },
    If {
        condition: Box<FluxExpr>,
        then: Box<FluxExpr>,
        else_: Box<FluxExpr>,
    },
    Call {
        function: Name,
        parameters: Vec<FluxExpr>,
    },
}

impl FluxExpr {
    // Leaves

    pub fn interior(index: usize) -> Self {
        FluxExpr::FieldComponent {
            index,
            side: Side::Interior,
        }
    }

    pub fn exterior(index: usize) -> Self {
        FluxExpr::FieldComponent {
            index,
            side: Side::Exterior,
        }
    }

    pub fn normal(axis: usize) -> Self {
        FluxExpr::Normal { axis }
    }

    pub fn int(value: i64) -> Self {
        FluxExpr::Constant(Literal::Int(value))
    }

    pub fn float(value: f64) -> Self {
        FluxExpr::Constant(Literal::float(value))
    }

    pub fn zero() -> Self {
        Self::int(0)
    }

    // Folding constructors

    /// Sum of `terms`, dropping zero terms.
    pub fn sum(terms: Vec<FluxExpr>) -> Self {
        let mut kept: Vec<FluxExpr> = terms.into_iter().filter(|t| !t.is_zero()).collect();
        match kept.len() {
            0 => Self::zero(),
            1 => kept.swap_remove(0),
            _ => FluxExpr::Sum(kept),
        }
    }

    /// Product of `factors`; zero if any factor is zero, unit factors dropped.
    pub fn product(factors: Vec<FluxExpr>) -> Self {
        if factors.iter().any(FluxExpr::is_zero) {
            return Self::zero();
        }
        let mut kept: Vec<FluxExpr> = factors.into_iter().filter(|f| !f.is_one()).collect();
        match kept.len() {
            0 => Self::int(1),
            1 => kept.swap_remove(0),
            _ => FluxExpr::Product(kept),
        }
    }

    pub fn quotient(numerator: FluxExpr, denominator: FluxExpr) -> Self {
        if numerator.is_zero() {
            return Self::zero();
        }
        FluxExpr::Quotient(Box::new(numerator), Box::new(denominator))
    }

    pub fn power(base: FluxExpr, exponent: FluxExpr) -> Self {
        FluxExpr::Power(Box::new(base), Box::new(exponent))
    }

    pub fn compare(left: FluxExpr, op: ComparisonOp, right: FluxExpr) -> Self {
        FluxExpr::Comparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Conditional; zero if both branches are zero.
    pub fn if_(condition: FluxExpr, then: FluxExpr, else_: FluxExpr) -> Self {
        if then.is_zero() && else_.is_zero() {
            return Self::zero();
        }
        FluxExpr::If {
            condition: Box::new(condition),
            then: Box::new(then),
            else_: Box::new(else_),
        }
    }

    pub fn call(function: Name, parameters: Vec<FluxExpr>) -> Self {
        FluxExpr::Call {
            function,
            parameters,
        }
    }

    // Queries

    pub fn is_zero(&self) -> bool {
        matches!(self, FluxExpr::Constant(lit) if lit.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, FluxExpr::Constant(lit) if lit.is_one())
    }

    /// Replace sub-expressions for which `f` returns a value, rebuilding the
    /// rest through the folding constructors.
    pub fn substitute<F>(&self, f: &mut F) -> FluxExpr
    where
        F: FnMut(&FluxExpr) -> Option<FluxExpr>,
    {
        if let Some(replacement) = f(self) {
            return replacement;
        }

        match self {
            FluxExpr::FieldComponent { .. }
            | FluxExpr::Normal { .. }
            | FluxExpr::Constant(_)
            | FluxExpr::ScalarParameter(_) => self.clone(),
            FluxExpr::Sum(terms) => Self::sum(terms.iter().map(|t| t.substitute(f)).collect()),
            FluxExpr::Product(factors) => {
                Self::product(factors.iter().map(|t| t.substitute(f)).collect())
            }
            FluxExpr::Quotient(num, den) => Self::quotient(num.substitute(f), den.substitute(f)),
            FluxExpr::Power(base, exp) => Self::power(base.substitute(f), exp.substitute(f)),
            FluxExpr::Comparison { left, op, right } => {
                Self::compare(left.substitute(f), *op, right.substitute(f))
            }
            FluxExpr::If {
                condition,
                then,
                else_,
            } => Self::if_(
                condition.substitute(f),
                then.substitute(f),
                else_.substitute(f),
            ),
            FluxExpr::Call {
                function,
                parameters,
            } => Self::call(
                function.clone(),
                parameters.iter().map(|p| p.substitute(f)).collect(),
            ),
        }
    }

    /// Visit every field component in the kernel.
    pub fn for_each_field_component(&self, f: &mut impl FnMut(usize, Side)) {
        match self {
            FluxExpr::FieldComponent { index, side } => f(*index, *side),
            FluxExpr::Normal { .. } | FluxExpr::Constant(_) | FluxExpr::ScalarParameter(_) => {}
            FluxExpr::Sum(children)
            | FluxExpr::Product(children)
            | FluxExpr::Call {
                parameters: children,
                ..
            } => {
                for child in children {
                    child.for_each_field_component(f);
                }
            }
            FluxExpr::Quotient(a, b)
            | FluxExpr::Power(a, b)
            | FluxExpr::Comparison {
                left: a, right: b, ..
            } => {
                a.for_each_field_component(f);
                b.for_each_field_component(f);
            }
            FluxExpr::If {
                condition,
                then,
                else_,
            } => {
                condition.for_each_field_component(f);
                then.for_each_field_component(f);
                else_.for_each_field_component(f);
            }
        }
    }
}

impl ops::Add for FluxExpr {
    type Output = FluxExpr;

    fn add(self, rhs: FluxExpr) -> FluxExpr {
        FluxExpr::sum(vec![self, rhs])
    }
}

impl ops::Sub for FluxExpr {
    type Output = FluxExpr;

    fn sub(self, rhs: FluxExpr) -> FluxExpr {
        FluxExpr::sum(vec![self, -rhs])
    }
}

impl ops::Mul for FluxExpr {
    type Output = FluxExpr;

    fn mul(self, rhs: FluxExpr) -> FluxExpr {
        FluxExpr::product(vec![self, rhs])
    }
}

impl ops::Neg for FluxExpr {
    type Output = FluxExpr;

    fn neg(self) -> FluxExpr {
        FluxExpr::product(vec![FluxExpr::int(-1), self])
    }
}

#[cfg(test)]
mod tests;
