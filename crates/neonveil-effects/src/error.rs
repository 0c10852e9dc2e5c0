//! Errors raised while starting the backdrop.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InitError {
    #[error("particle palette is empty")]
    EmptyPalette,
    #[error("rain column width must be positive, got {0}")]
    ColumnWidth(f32),
    #[error("rain speed range {min}..{max} is empty")]
    SpeedRange { min: f32, max: f32 },
    #[error("glyph reroll chance {0} is outside 0..=1")]
    RerollChance(f64),
}

pub type Result<T> = std::result::Result<T, InitError>;
