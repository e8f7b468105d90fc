// Colours for basins and iteration counts
//
// A basin palette gives one colour per root, index aligned with the
// polynomial's root list. The iteration colours come from a cheap closed form
// stand-in for the turbo colormap.

use std::f64::consts::PI;
use std::str::FromStr;

use image::Rgba;
use num::complex::Complex64;

use crate::error::FractalError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasinPalette {
    // Hue follows the angle of the root in the complex plane
    AngleHue,
    BlueGold,
    // Paul Tol's bright palette
    ColorblindSafe,
    Pastel,
    // Fixed table of 12 well separated label colours
    Categorical
}

impl FromStr for BasinPalette {
    type Err = FractalError;

    fn from_str(name : &str) -> Result<BasinPalette, FractalError> {
        match name {
            "angle-hue" => Ok(BasinPalette::AngleHue),
            "blue-gold" => Ok(BasinPalette::BlueGold),
            "colorblind-safe" => Ok(BasinPalette::ColorblindSafe),
            "pastel" => Ok(BasinPalette::Pastel),
            "categorical" => Ok(BasinPalette::Categorical),
            _ => Err(FractalError::UnknownPalette(name.to_string()))
        }
    }
}

const TOL_BRIGHT : [[u8; 3]; 8] = [
    [68, 119, 170], [102, 204, 238], [34, 136, 51], [204, 187, 68],
    [238, 102, 119], [170, 51, 119], [187, 187, 187], [51, 34, 136]
];

const LABELS : [[u8; 3]; 12] = [
    [230, 25, 75], [60, 180, 75], [255, 225, 25], [0, 130, 200],
    [245, 130, 48], [145, 30, 180], [70, 240, 240], [240, 50, 230],
    [210, 245, 60], [250, 190, 190], [0, 128, 128], [230, 190, 255]
];

fn opaque(rgb : [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

fn clamp8(val : i32) -> u8 {
    val.clamp(0, 255) as u8
}

fn make_rgba(r : i32, g : i32, b : i32) -> Rgba<u8> {
    Rgba([clamp8(r), clamp8(g), clamp8(b), 255])
}

// Hue in degrees, saturation and value in [0, 1]
fn hsv(hue : f64, saturation : f64, value : f64) -> Rgba<u8> {
    let h = (hue.max(0.0) % 360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));
    let (r, g, b) = match sector as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q)
    };
    Rgba([(255.0 * r) as u8, (255.0 * g) as u8, (255.0 * b) as u8, 255])
}

// Position of colour i along a ramp of n colours
fn ramp(i : usize, n : usize) -> f64 {
    i as f64 / (n.max(2) - 1) as f64
}

pub fn make_basin_palette(n : usize, palette : BasinPalette, roots : Option<&[Complex64]>) -> Vec<Rgba<u8>> {
    match (palette, roots) {
        (BasinPalette::AngleHue, Some(roots)) if roots.len() >= n => {
            roots[..n].iter().map(|root| {
                let degrees = root.arg() * 180.0 / PI + 360.0;
                hsv(degrees % 360.0, 0.85, 0.95)
            }).collect()
        },
        (BasinPalette::BlueGold, _) => (0..n).map(|i| {
            let t = ramp(i, n);
            make_rgba(
                (30.0 + 200.0 * t).round() as i32,
                (80.0 + 140.0 * t).round() as i32,
                (200.0 - 120.0 * t).round() as i32
            )
        }).collect(),
        (BasinPalette::ColorblindSafe, _) => (0..n).map(
            |i| opaque(TOL_BRIGHT[i % TOL_BRIGHT.len()])
        ).collect(),
        (BasinPalette::Categorical, _) => (0..n).map(label_color).collect(),
        // Pastel, and angle hue without enough roots to go on
        _ => (0..n).map(|i| {
            let t = ramp(i, n);
            make_rgba(
                (200.0 - 40.0 * t) as i32,
                (180.0 + 30.0 * t) as i32,
                (220.0 - 60.0 * t) as i32
            )
        }).collect()
    }
}

pub fn label_color(label : usize) -> Rgba<u8> {
    opaque(LABELS[label % LABELS.len()])
}

// Approximation of google's turbo colormap for x in [0, 1]
//
// Reference renders were made with exactly this arithmetic, including the
// truncated 2 pi, so the expressions must stay as written.
#[allow(clippy::approx_constant)]
pub fn turbo_colormap(x : f64) -> Rgba<u8> {
    let x = x.clamp(0.0, 1.0);
    let r = (1.0 + 0.0 * x - 3.0 * (x - 0.5) * (x - 0.5)).clamp(0.0, 1.0);
    let g = (1.2 * x * (1.0 - x) * 4.0).clamp(0.0, 1.0);
    let b = (1.0 - x + 0.3 * (6.28318530718 * x).sin()).clamp(0.0, 1.0);
    Rgba([(255.0 * r) as u8, (255.0 * g) as u8, (255.0 * b) as u8, 255])
}
