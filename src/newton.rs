// Newton's method for a single seed and the classification of where it ended
//
// For each seed we run z <- z - damping * f(z) / f'(z) until the step or the
// residual drops under the tolerance, the derivative vanishes, or we run out
// of iterations. Whichever way it stops, the final point is then matched
// against the known roots.

use num::complex::Complex64;

use crate::polynomial::Polynomial;

// Derivatives smaller than this are treated as a critical point
pub const CRITICAL_EPSILON : f64 = 1e-30;
// Furthest a final iterate may be from a root and still count as reaching it
pub const MATCH_THRESHOLD : f64 = 1e-5;
// Root id stored for pixels which did not reach any root
pub const NO_ROOT : i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonParams {
    pub max_iterations : usize,
    pub tolerance : f64,
    pub damping : f64,
    pub critical_epsilon : f64,
    pub match_threshold : f64
}

impl Default for NewtonParams {
    fn default() -> NewtonParams {
        NewtonParams {
            max_iterations : 100,
            tolerance : 1e-10,
            damping : 1.0,
            critical_epsilon : CRITICAL_EPSILON,
            match_threshold : MATCH_THRESHOLD
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Converged,
    // Derivative vanished so no further step could be taken
    Diverged,
    MaxIterationsReached
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub z : Complex64,
    pub iterations : usize,
    pub termination : Termination
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelResult {
    pub root : Option<usize>,
    pub iterations : usize,
    pub termination : Termination
}

impl PixelResult {
    pub fn root_id(&self) -> i32 {
        self.root.map(|i| i as i32).unwrap_or(NO_ROOT)
    }
}

pub fn iterate(initial : Complex64, polynomial : &Polynomial, params : &NewtonParams) -> Orbit {
    let mut z = initial;
    for k in 0..params.max_iterations {
        let f = polynomial.eval(z);
        let fp = polynomial.deriv(z);
        if fp.norm() < params.critical_epsilon {
            return Orbit { z, iterations : k, termination : Termination::Diverged };
        }
        let step = f * params.damping / fp;
        let next = z - step;
        if (next - z).norm() < params.tolerance || f.norm() < params.tolerance {
            return Orbit { z : next, iterations : k + 1, termination : Termination::Converged };
        }
        z = next;
    }
    Orbit {
        z,
        iterations : params.max_iterations,
        termination : Termination::MaxIterationsReached
    }
}

// Index of the nearest root, the lowest index winning ties, or None if even
// the nearest is further than the threshold. NaN distances never match.
pub fn classify(z : Complex64, roots : &[Complex64], threshold : f64) -> Option<usize> {
    let mut best : Option<(usize, f64)> = None;
    for (i, root) in roots.iter().enumerate() {
        let distance = (z - root).norm();
        let closer = match best {
            Some((_, best_distance)) => distance < best_distance,
            None => !distance.is_nan()
        };
        if closer {
            best = Some((i, distance));
        }
    }
    best.filter(|(_, distance)| *distance <= threshold).map(|(i, _)| i)
}

pub fn newton_iterate(initial : Complex64, polynomial : &Polynomial, params : &NewtonParams) -> PixelResult {
    let orbit = iterate(initial, polynomial, params);
    PixelResult {
        root : classify(orbit.z, polynomial.roots(), params.match_threshold),
        iterations : orbit.iterations,
        termination : orbit.termination
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;

    fn params(max_iterations : usize, tolerance : f64) -> NewtonParams {
        NewtonParams { max_iterations, tolerance, ..NewtonParams::default() }
    }

    #[test]
    fn test_perturbed_roots_return_home() {
        for id in crate::polynomial::CATALOG {
            let poly = Polynomial::from_id(id).unwrap();
            let p = params(50, 1e-14);
            for (i, root) in poly.roots().iter().enumerate() {
                let result = newton_iterate(root + Complex64::new(1e-3, -1e-3), &poly, &p);
                assert_eq!(result.root, Some(i), "{} root {}", id, i);
            }
        }
    }

    #[test]
    fn test_z3_minus_1_near_one() {
        let poly = Polynomial::from_id("z3-1").unwrap();
        let p = NewtonParams { max_iterations : 50, tolerance : 1e-14, damping : 1.0, ..NewtonParams::default() };
        let result = newton_iterate(Complex64::new(1.001, -0.001), &poly, &p);
        assert_eq!(result.root, Some(0));
        assert_eq!(result.root_id(), 0);
        assert_eq!(result.termination, Termination::Converged);
        assert!(result.iterations < 10);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_other_catalog_seeds_converge() {
        let z5 = Polynomial::from_id("z5-1").unwrap();
        let result = newton_iterate(Complex64::new(0.5, 0.6), &z5, &params(80, 1e-13));
        assert!(result.root.is_some());

        let cubic = Polynomial::from_id("z3-2z+2").unwrap();
        let result = newton_iterate(Complex64::new(-2.0, 0.3), &cubic, &params(100, 1e-12));
        assert!(result.root.is_some());
    }

    #[test]
    fn test_critical_point_diverges_immediately() {
        // f'(0) = 0 for z^3 - 1
        let poly = Polynomial::from_id("z3-1").unwrap();
        let orbit = iterate(Complex64::new(0.0, 0.0), &poly, &params(50, 1e-12));
        assert_eq!(orbit.termination, Termination::Diverged);
        assert_eq!(orbit.iterations, 0);
        assert_eq!(orbit.z, Complex64::new(0.0, 0.0));
        assert_eq!(newton_iterate(orbit.z, &poly, &params(50, 1e-12)).root_id(), NO_ROOT);
    }

    #[test]
    fn test_max_iterations_reached() {
        let poly = Polynomial::from_id("z3-1").unwrap();
        let orbit = iterate(Complex64::new(-3.0, 2.0), &poly, &params(2, 1e-14));
        assert_eq!(orbit.termination, Termination::MaxIterationsReached);
        assert_eq!(orbit.iterations, 2);
        assert_eq!(newton_iterate(Complex64::new(-3.0, 2.0), &poly, &params(2, 1e-14)).root, None);
    }

    #[test]
    fn test_zero_iterations_classifies_seed() {
        let poly = Polynomial::from_id("z3-1").unwrap();
        let p = params(0, 1e-12);
        let on_root = newton_iterate(Complex64::new(1.0, 0.0), &poly, &p);
        assert_eq!(on_root.root, Some(0));
        assert_eq!(on_root.iterations, 0);
        assert_eq!(on_root.termination, Termination::MaxIterationsReached);
        let near_root = newton_iterate(Complex64::new(1.0, 5e-6), &poly, &p);
        assert_eq!(near_root.root, Some(0));
        let off_root = newton_iterate(Complex64::new(1.1, 0.0), &poly, &p);
        assert_eq!(off_root.root, None);
        assert_eq!(off_root.iterations, 0);
    }

    #[test]
    fn test_damping_still_converges() {
        let poly = Polynomial::from_id("z3-1").unwrap();
        let seed = Complex64::new(1.3, 0.2);
        let undamped = newton_iterate(seed, &poly, &params(200, 1e-12));
        let damped = newton_iterate(
            seed, &poly, &NewtonParams { damping : 0.5, ..params(200, 1e-12) }
        );
        assert_eq!(undamped.root, Some(0));
        assert_eq!(damped.root, Some(0));
        assert!(damped.iterations > undamped.iterations);
    }

    #[test]
    fn test_nan_seed_terminates_unclassified() {
        let poly = Polynomial::from_id("z3-1").unwrap();
        let result = newton_iterate(Complex64::new(f64::NAN, 0.0), &poly, &params(25, 1e-12));
        assert_eq!(result.root, None);
        assert!(result.iterations <= 25);
    }

    #[test]
    fn test_classify_ties_pick_lowest_index() {
        let roots = [Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0), Complex64::new(1.0, 0.0)];
        // Equidistant from 1 and -1
        assert_eq!(classify(Complex64::new(0.0, 0.0), &roots, 2.0), Some(0));
        assert_eq!(classify(Complex64::new(1.0, 0.0), &roots, MATCH_THRESHOLD), Some(0));
        let close = [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)];
        assert_eq!(classify(Complex64::new(1e-7, 0.0), &close, MATCH_THRESHOLD), Some(0));
    }

    #[test]
    fn test_clustered_roots_resolve_to_lower_index() {
        let poly = Polynomial::RootProduct {
            id : "pair",
            roots : vec![Complex64::new(0.5, 0.0), Complex64::new(0.5, 2e-6), Complex64::new(-1.0, 0.0)]
        };
        let result = newton_iterate(Complex64::new(0.5, 1e-6), &poly, &params(0, 1e-12));
        assert_eq!(result.root, Some(0));
    }

    #[test]
    fn test_rejected_iff_nearest_root_beyond_threshold() {
        let poly = Polynomial::from_id("z4-1").unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(17);
        for _ in 0..500 {
            let z = Complex64::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5));
            let p = params(rng.gen_range(0..40), 1e-12);
            let orbit = iterate(z, &poly, &p);
            let nearest = poly.roots().iter().map(
                |r| (orbit.z - r).norm()
            ).fold(f64::INFINITY, f64::min);
            let result = newton_iterate(z, &poly, &p);
            assert_eq!(result.root.is_none(), nearest > MATCH_THRESHOLD);
            assert!(result.iterations <= p.max_iterations);
        }
    }
}
