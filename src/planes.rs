// Turn a finished grid into the two images we hand out
//
// The basin plane colours each pixel by the root it reached. The iteration
// plane needs the grid wide maximum, which only exists once the whole grid has
// been evaluated, so both take a completed `Grid`.

use image::{Rgba, RgbaImage};

use crate::grid::Grid;
use crate::palette::turbo_colormap;

pub const NO_CONVERGENCE : Rgba<u8> = Rgba([0, 0, 0, 255]);

pub fn basin_plane(grid : &Grid, colours : &[Rgba<u8>]) -> RgbaImage {
    RgbaImage::from_fn(grid.width as u32, grid.height as u32, |x, y| {
        let root_id = grid.root_ids[grid.index(x as usize, y as usize)];
        usize::try_from(root_id).ok()
            .and_then(|i| colours.get(i))
            .copied()
            .unwrap_or(NO_CONVERGENCE)
    })
}

pub fn iteration_plane(grid : &Grid) -> RgbaImage {
    let max_iterations = grid.max_iterations.max(1) as f64;
    RgbaImage::from_fn(grid.width as u32, grid.height as u32, |x, y| {
        let n = grid.iterations[grid.index(x as usize, y as usize)];
        turbo_colormap(n as f64 / max_iterations)
    })
}

// Order dependent hash of every pixel, for spotting changes in output
pub fn checksum(image : &RgbaImage) -> u64 {
    image.pixels().fold(0u64, |sum, pixel| {
        let [r, g, b, a] = pixel.0;
        sum.wrapping_mul(1315423911)
            .wrapping_add(r as u64 * 3 + g as u64 * 5 + b as u64 * 7 + a as u64)
    })
}
