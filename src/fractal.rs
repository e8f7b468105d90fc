// Make a pair of newton fractal images for one of the catalog polynomials
//
// The json input picks the polynomial, the region of the plane, the sampling
// resolution and the iteration settings. Everything is checked here, before any
// pixels are computed.

use image::RgbaImage;
use json::JsonValue;

use crate::error::{FractalError, Result};
use crate::grid::{check_dimensions, evaluate_with_threads, Bounds};
use crate::newton::{NewtonParams, CRITICAL_EPSILON, MATCH_THRESHOLD};
use crate::palette::{make_basin_palette, BasinPalette};
use crate::planes::{basin_plane, checksum, iteration_plane};
use crate::polynomial::Polynomial;

pub struct NewtonFractal {
    polynomial : Polynomial,
    params : NewtonParams,
    bounds : Bounds,
    resolution : (usize, usize),
    palette : BasinPalette,
    threads : usize
}

// The two colour planes of a run
pub struct Planes {
    pub basins : RgbaImage,
    pub iterations : RgbaImage
}

fn invalid(message : &str) -> FractalError {
    FractalError::InvalidConfig(message.to_string())
}

fn wrong_type(key : &str, expected : &str, value : &JsonValue) -> FractalError {
    FractalError::InvalidConfig(format!("{} must be {}, got {}", key, expected, value.dump()))
}

// Missing keys take the default, present keys must hold the right kind of value
fn read_usize(input : &JsonValue, key : &str, default : usize) -> Result<usize> {
    let value = &input[key];
    if value.is_null() {
        return Ok(default);
    }
    value.as_usize().ok_or_else(|| wrong_type(key, "a non-negative integer", value))
}

fn read_f64(input : &JsonValue, key : &str, default : f64) -> Result<f64> {
    let value = &input[key];
    if value.is_null() {
        return Ok(default);
    }
    value.as_f64().ok_or_else(|| wrong_type(key, "a number", value))
}

fn read_str<'a>(input : &'a JsonValue, key : &str, default : &'a str) -> Result<&'a str> {
    let value = &input[key];
    if value.is_null() {
        return Ok(default);
    }
    value.as_str().ok_or_else(|| wrong_type(key, "a string", value))
}

fn read_bounds(input : &JsonValue) -> Result<Bounds> {
    let default_bounds = Bounds::default();
    let bounds_input = &input["bounds"];
    if bounds_input.is_null() {
        return Ok(default_bounds);
    }
    if !bounds_input.is_object() {
        return Err(wrong_type("bounds", "an object", bounds_input));
    }
    Ok(Bounds {
        x_min : read_f64(bounds_input, "x_min", default_bounds.x_min)?,
        x_max : read_f64(bounds_input, "x_max", default_bounds.x_max)?,
        y_min : read_f64(bounds_input, "y_min", default_bounds.y_min)?,
        y_max : read_f64(bounds_input, "y_max", default_bounds.y_max)?
    })
}

impl NewtonFractal {
    pub fn from_json(input : &JsonValue) -> Result<NewtonFractal> {
        let polynomial = Polynomial::from_id(read_str(input, "polynomial", "z3-1")?)?;
        let res_x = read_usize(input, "resolution_x", 1024)?;
        let res_y = read_usize(input, "resolution_y", 768)?;
        let params = NewtonParams {
            max_iterations : read_usize(input, "max_iterations", 300)?,
            tolerance : read_f64(input, "tolerance", 1e-12)?,
            damping : read_f64(input, "damping", 1.0)?,
            critical_epsilon : read_f64(input, "critical_epsilon", CRITICAL_EPSILON)?,
            match_threshold : read_f64(input, "match_threshold", MATCH_THRESHOLD)?
        };
        let bounds = read_bounds(input)?;
        let palette = read_str(input, "palette", "pastel")?.parse::<BasinPalette>()?;
        let threads = read_usize(input, "threads", 0)?;
        let fractal = NewtonFractal {
            polynomial,
            params,
            bounds,
            resolution : (res_x, res_y),
            palette,
            threads
        };
        fractal.validate()?;
        Ok(fractal)
    }

    fn validate(&self) -> Result<()> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(invalid("resolution must be positive"));
        }
        check_dimensions(self.resolution.0, self.resolution.1)?;
        if self.params.max_iterations == 0 {
            return Err(invalid("max_iterations must be positive"));
        }
        if !(self.params.tolerance > 0.0) {
            return Err(invalid("tolerance must be positive"));
        }
        if !(self.params.damping > 0.0 && self.params.damping <= 1.0) {
            return Err(invalid("damping must be in (0, 1]"));
        }
        if !(self.params.critical_epsilon >= 0.0) || !(self.params.match_threshold >= 0.0) {
            return Err(invalid("critical_epsilon and match_threshold must not be negative"));
        }
        self.bounds.validate()
    }

    pub fn make_planes(&self) -> Result<Planes> {
        log::info!(
            "Generating newton fractal for {} at {}x{}",
            self.polynomial.id(), self.resolution.0, self.resolution.1
        );
        // Colours are fixed by the root list alone, so settle them first
        let roots = self.polynomial.roots();
        let colours = make_basin_palette(roots.len(), self.palette, Some(roots));
        log::debug!("Using {:?} palette", self.palette);
        let grid = evaluate_with_threads(
            &self.polynomial,
            &self.params,
            &self.bounds,
            self.resolution.0,
            self.resolution.1,
            self.threads
        )?;
        let planes = Planes {
            basins : basin_plane(&grid, &colours),
            iterations : iteration_plane(&grid)
        };
        log::debug!(
            "Checksums: basins {}, iterations {}",
            checksum(&planes.basins), checksum(&planes.iterations)
        );
        Ok(planes)
    }
}

pub fn generate(input : &JsonValue) -> Result<Planes> {
    let fractal = NewtonFractal::from_json(input)?;
    fractal.make_planes()
}
