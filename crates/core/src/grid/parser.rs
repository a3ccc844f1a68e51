//! Text map parser
//!
//! A map is UTF-8 text with one row per line. Cells are separated by single
//! spaces and each cell is `<height>` or `<height>,<hex color>`:
//!
//! ```text
//! 0 0 0,0xFF0000
//! 0 1 2
//! ```
//!
//! Blank lines are dropped before row numbering, so they never produce empty
//! rows. Repeated spaces produce empty tokens that are skipped.

use std::fmt;
use std::num::ParseIntError;

use crate::core_types::{ColorError, Rgba};
use crate::grid::{Grid, MapPoint};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Color for cells without an explicit color
    pub default_color: Rgba,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_color: Rgba::WHITE,
        }
    }
}

/// Errors raised while parsing a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Height is not a signed integer
    InvalidHeight {
        row: usize,
        col: usize,
        token: String,
        source: ParseIntError,
    },
    /// Color is not a hex number
    InvalidColor {
        row: usize,
        col: usize,
        token: String,
        source: ColorError,
    },
    /// The text contained no cells
    NoPoints,
}

impl ParseError {
    /// `(row, col)` of the offending cell, if any.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::InvalidHeight { row, col, .. } | Self::InvalidColor { row, col, .. } => {
                Some((*row, *col))
            }
            Self::NoPoints => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeight {
                row, col, token, ..
            } => write!(f, "invalid height {token:?} for {row}/{col}"),
            Self::InvalidColor {
                row, col, token, ..
            } => write!(f, "invalid color {token:?} for {row}/{col}"),
            Self::NoPoints => write!(f, "no points"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidHeight { source, .. } => Some(source),
            Self::InvalidColor { source, .. } => Some(source),
            Self::NoPoints => None,
        }
    }
}

/// Parse map text into a grid.
///
/// # Errors
/// Returns [`ParseError`] for a bad height or color token, or when no cell
/// was found.
pub fn parse_map(text: &str, config: &ParserConfig) -> Result<Grid, ParseError> {
    let lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty());

    let mut rows = Vec::new();
    for (row, line) in lines.enumerate() {
        let tokens = line.split(' ').filter(|token| !token.is_empty());
        let mut points = Vec::new();
        for (col, token) in tokens.enumerate() {
            points.push(parse_cell(token, col, row, config)?);
        }
        rows.push(points);
    }

    let grid = Grid::from_rows(rows);
    if grid.is_empty() {
        return Err(ParseError::NoPoints);
    }
    Ok(grid)
}

fn parse_cell(
    token: &str,
    col: usize,
    row: usize,
    config: &ParserConfig,
) -> Result<MapPoint, ParseError> {
    let mut parts = token.split(',');
    let height_token = parts.next().unwrap_or_default();
    let height = height_token
        .parse::<i32>()
        .map_err(|source| ParseError::InvalidHeight {
            row,
            col,
            token: height_token.to_string(),
            source,
        })?;

    let color = match parts.next() {
        Some(color_token) => Rgba::from_hex(color_token)
            .map_err(|source| ParseError::InvalidColor {
                row,
                col,
                token: color_token.to_string(),
                source,
            })?
            .with_alpha(u8::MAX),
        None => config.default_color,
    };

    Ok(MapPoint::new(col, row, height, color))
}
