// Evaluate the newton kernel over a pixel grid
//
// Rows are handed out to rayon workers. Each pixel writes only its own slot in
// the two output arrays and each row reports its own largest iteration count,
// which are then folded into the grid wide maximum once every row is done.

use std::time::Instant;

use num::complex::Complex64;
use rayon::prelude::*;

use crate::error::{FractalError, Result};
use crate::newton::{newton_iterate, NewtonParams, Termination, NO_ROOT};
use crate::polynomial::Polynomial;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min : f64,
    pub x_max : f64,
    pub y_min : f64,
    pub y_max : f64
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds { x_min : -2.0, x_max : 2.0, y_min : -1.5, y_max : 1.5 }
    }
}

impl Bounds {
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max].iter().all(|v| v.is_finite());
        if !finite {
            return Err(FractalError::InvalidConfig("bounds must be finite".to_string()));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(FractalError::InvalidConfig(format!(
                "bounds are inverted: x {}..{}, y {}..{}",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        Ok(())
    }

    fn pixel_size(&self, width : usize, height : usize) -> (f64, f64) {
        (
            (self.x_max - self.x_min) / width as f64,
            (self.y_max - self.y_min) / height as f64
        )
    }

    // Seeds sit at pixel centres
    pub fn seed(&self, x : usize, y : usize, width : usize, height : usize) -> Complex64 {
        let (dx, dy) = self.pixel_size(width, height);
        Complex64::new(
            self.x_min + (x as f64 + 0.5) * dx,
            self.y_min + (y as f64 + 0.5) * dy
        )
    }
}

// Largest grid we will allocate: each side must fit an image dimension and
// the four byte per pixel planes must fit in memory addressing
pub fn check_dimensions(width : usize, height : usize) -> Result<usize> {
    let too_large = || FractalError::InvalidConfig(format!("resolution {}x{} is too large", width, height));
    if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
        return Err(too_large());
    }
    let pixels = width.checked_mul(height).ok_or_else(too_large)?;
    pixels.checked_mul(4).ok_or_else(too_large)?;
    Ok(pixels)
}

// Per pixel results in row major order
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub width : usize,
    pub height : usize,
    pub root_ids : Vec<i32>,
    pub iterations : Vec<usize>,
    pub max_iterations : usize,
    // Pixels whose orbit stopped on a vanishing derivative
    pub critical_points : usize
}

impl Grid {
    pub fn index(&self, x : usize, y : usize) -> usize {
        y * self.width + x
    }
}

pub fn evaluate(
    polynomial : &Polynomial,
    params : &NewtonParams,
    bounds : &Bounds,
    width : usize,
    height : usize
) -> Grid {
    let mut root_ids = vec![NO_ROOT; width * height];
    let mut iterations = vec![0; width * height];
    if root_ids.is_empty() {
        return Grid { width, height, root_ids, iterations, max_iterations : 0, critical_points : 0 };
    }
    let (max_iterations, critical_points) = root_ids.par_chunks_mut(width)
        .zip(iterations.par_chunks_mut(width))
        .enumerate()
        .map(|(y, (root_row, iteration_row))| {
            let mut row_max = 0;
            let mut row_critical = 0;
            for (x, (root_id, count)) in root_row.iter_mut().zip(iteration_row.iter_mut()).enumerate() {
                let result = newton_iterate(bounds.seed(x, y, width, height), polynomial, params);
                *root_id = result.root_id();
                *count = result.iterations;
                row_max = row_max.max(result.iterations);
                if result.termination == Termination::Diverged {
                    row_critical += 1;
                }
            }
            (row_max, row_critical)
        })
        .reduce(|| (0, 0), |a, b| (a.0.max(b.0), a.1 + b.1));
    Grid { width, height, root_ids, iterations, max_iterations, critical_points }
}

// Run `evaluate` on a pool of the given size, 0 picks rayon's default
pub fn evaluate_with_threads(
    polynomial : &Polynomial,
    params : &NewtonParams,
    bounds : &Bounds,
    width : usize,
    height : usize,
    threads : usize
) -> Result<Grid> {
    check_dimensions(width, height)?;
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    log::debug!("Evaluating grid on {} threads", pool.current_num_threads());
    let start = Instant::now();
    let grid = pool.install(|| evaluate(polynomial, params, bounds, width, height));
    log::info!(
        "Computed in {:.6} seconds for {}x{}, max_iterations={}, deepest pixel took {}",
        start.elapsed().as_secs_f64(), width, height, params.max_iterations, grid.max_iterations
    );
    if grid.critical_points > 0 {
        log::debug!("{} pixels stopped at a critical point", grid.critical_points);
    }
    Ok(grid)
}
