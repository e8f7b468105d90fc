// Load a json file that specifies which newton fractal we are going to make,
// compute it and write out the basin and iteration images

use std::env;
use std::fs::{self, create_dir_all};
use std::path::Path;

use crate::error::{FractalError, Result};

mod error;
mod fractal;
mod grid;
mod newton;
mod palette;
mod planes;
mod polynomial;

fn make_directory_for_image(path_str : &str) -> std::io::Result<()> {
    let path = Path::new(path_str);
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => create_dir_all(dir),
        _ => Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    // Get file to use else default
    let in_filename = env::args().nth(1).unwrap_or("input.json".to_string());
    let out_prefix = env::args().nth(2).unwrap_or("run/out".to_string());
    log::info!("Loading input file: {}", in_filename);
    let contents = fs::read_to_string(&in_filename)?;
    let input = json::parse(&contents).map_err(
        |err| FractalError::InvalidConfig(format!("couldn't parse {}: {}", in_filename, err))
    )?;
    let planes = fractal::generate(&input)?;
    let out_basins = format!("{}_basins.png", out_prefix);
    let out_iterations = format!("{}_iters.png", out_prefix);
    make_directory_for_image(&out_basins)?;
    planes.basins.save(&out_basins)?;
    planes.iterations.save(&out_iterations)?;
    log::info!("Wrote {} and {}", out_basins, out_iterations);
    Ok(())
}
