// Errors raised while setting up a run
//
// Everything here happens before or around the grid pass. The kernel itself
// never fails, degenerate seeds just end up unclassified.

use thiserror::Error;

use crate::polynomial::CATALOG;

#[derive(Error, Debug)]
pub enum FractalError {
    #[error("unknown polynomial id: {0} (expected one of {})", CATALOG.join(", "))]
    UnknownPolynomial(String),

    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("could not write image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FractalError>;
