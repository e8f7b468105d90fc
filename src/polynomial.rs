// The fixed catalog of polynomials we can draw newton fractals for
//
// Every entry knows its own roots up front. The order of the roots is part of
// the output - root i always gets palette colour i - so the lists below must
// not be reordered.

use std::f64::consts::PI;

use num::complex::Complex64;
use num::{One, Zero};

use crate::error::{FractalError, Result};

// Identifiers accepted by `Polynomial::from_id`
pub const CATALOG : [&str; 6] = ["z3-1", "z4-1", "z5-1", "z3-2z+2", "cluster4", "rings8"];

#[derive(Clone, Debug, PartialEq)]
pub enum Polynomial {
    // z^n - 1 with the n-th roots of unity
    UnityRoots {
        id : &'static str,
        degree : u32,
        roots : Vec<Complex64>
    },
    // Depressed cubic z^3 + p z + q with precomputed numeric roots
    Cubic {
        id : &'static str,
        p : f64,
        q : f64,
        roots : Vec<Complex64>
    },
    // Product of (z - r) over a root set given directly
    RootProduct {
        id : &'static str,
        roots : Vec<Complex64>
    }
}

fn c(re : f64, im : f64) -> Complex64 {
    Complex64::new(re, im)
}

impl Polynomial {
    pub fn from_id(id : &str) -> Result<Polynomial> {
        let polynomial = match id {
            "z3-1" => Polynomial::UnityRoots {
                id : "z3-1",
                degree : 3,
                roots : vec![
                    c(1.0, 0.0),
                    Complex64::from_polar(1.0, 2.0 * PI / 3.0),
                    Complex64::from_polar(1.0, -2.0 * PI / 3.0)
                ]
            },
            "z4-1" => Polynomial::UnityRoots {
                id : "z4-1",
                degree : 4,
                roots : vec![c(1.0, 0.0), c(0.0, 1.0), c(-1.0, 0.0), c(0.0, -1.0)]
            },
            "z5-1" => Polynomial::UnityRoots {
                id : "z5-1",
                degree : 5,
                roots : (0..5).map(
                    |k| Complex64::from_polar(1.0, 2.0 * PI * k as f64 / 5.0)
                ).collect()
            },
            "z3-2z+2" => Polynomial::Cubic {
                id : "z3-2z+2",
                p : -2.0,
                q : 2.0,
                roots : vec![
                    c(-1.7692923542386314, 0.0),
                    c(0.8846461771193157, 0.5897428050222055),
                    c(0.8846461771193157, -0.5897428050222055)
                ]
            },
            "cluster4" => Polynomial::RootProduct {
                id : "cluster4",
                roots : vec![c(0.5, 0.0), c(0.53, 0.02), c(0.53, -0.02), c(-1.0, 0.0)]
            },
            "rings8" => {
                let inner = (0..3).map(
                    |k| Complex64::from_polar(0.5, PI / 6.0 + 2.0 * PI * k as f64 / 3.0)
                );
                let outer = (0..5).map(
                    |k| Complex64::from_polar(1.5, 2.0 * PI * k as f64 / 5.0)
                );
                Polynomial::RootProduct {
                    id : "rings8",
                    roots : inner.chain(outer).collect()
                }
            },
            _ => return Err(FractalError::UnknownPolynomial(id.to_string()))
        };
        log::debug!("Using polynomial {} with {} roots", polynomial.id(), polynomial.roots().len());
        Ok(polynomial)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Polynomial::UnityRoots { id, .. } => *id,
            Polynomial::Cubic { id, .. } => *id,
            Polynomial::RootProduct { id, .. } => *id
        }
    }

    pub fn roots(&self) -> &[Complex64] {
        match self {
            Polynomial::UnityRoots { roots, .. } => roots,
            Polynomial::Cubic { roots, .. } => roots,
            Polynomial::RootProduct { roots, .. } => roots
        }
    }

    pub fn eval(&self, z : Complex64) -> Complex64 {
        match self {
            Polynomial::UnityRoots { degree, .. } => z.powu(*degree) - 1.0,
            Polynomial::Cubic { p, q, .. } => z * z * z + z * *p + *q,
            Polynomial::RootProduct { roots, .. } => roots.iter().map(|r| z - r).product()
        }
    }

    pub fn deriv(&self, z : Complex64) -> Complex64 {
        match self {
            Polynomial::UnityRoots { degree, .. } => z.powu(degree - 1) * (*degree as f64),
            Polynomial::Cubic { p, .. } => z * z * 3.0 + *p,
            Polynomial::RootProduct { roots, .. } => product_deriv(z, roots)
        }
    }
}

// Logarithmic derivative f(z) * sum 1/(z - r). Sitting exactly on a root would
// divide by zero, there the derivative is just the product of the other factors.
fn product_deriv(z : Complex64, roots : &[Complex64]) -> Complex64 {
    let mut others = Complex64::one();
    let mut inverse_sum = Complex64::zero();
    let mut zero_factors = 0;
    for root in roots {
        let factor = z - root;
        if factor.is_zero() {
            zero_factors += 1;
        } else {
            others *= factor;
            inverse_sum += factor.inv();
        }
    }
    match zero_factors {
        0 => others * inverse_sum,
        1 => others,
        // Repeated root
        _ => Complex64::zero()
    }
}
