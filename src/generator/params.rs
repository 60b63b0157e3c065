/*
params.rs

Copyright 2025 Hervé Quatremain

This file is part of Spectre Tiling.

Spectre Tiling is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Spectre Tiling is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Spectre Tiling. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Patch descriptor.
//!
//! A [`SpectrePatchParams`] object freezes the hierarchy decisions taken while generating a
//! patch, so that the same patch can be generated again without any randomness.
//! Its text form is `<orientation>:<coordinates><final hexagon>`, for example `4:0152G`.

use crate::generator::hexagons::{HexLabel, is_valid_hex_letter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons for rejecting a patch descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("expected at least one numeric coordinate")]
    NoCoordinates,

    #[error("invalid final hexagon type")]
    InvalidFinalHex,

    #[error("coordinate out of range")]
    CoordinateOutOfRange,

    #[error("orientation out of range")]
    OrientationOutOfRange,

    #[error("malformed patch descriptor")]
    Malformed,
}

/// Frozen description of a patch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpectrePatchParams {
    /// Orientation of the initial Spectre, in twelfths of a turn.
    pub orientation: usize,

    /// `coords[0]` is the index of the initial Spectre within its hexagon, and `coords[i]` the
    /// index of the level `i - 1` hexagon within the level `i` one.
    pub coords: Vec<u8>,

    /// Letter of the hexagon type at the top of the hierarchy.
    pub final_hex: char,
}

impl SpectrePatchParams {
    /// Check that the descriptor names an existing position in the hierarchy.
    ///
    /// The coordinates are checked from the top, each one against the size of the expansion
    /// of the hexagon it indexes into.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.coords.is_empty() {
            return Err(ParamsError::NoCoordinates);
        }
        let Some(mut hex) = HexLabel::from_letter(self.final_hex) else {
            return Err(ParamsError::InvalidFinalHex);
        };
        if self.orientation >= 12 {
            return Err(ParamsError::OrientationOutOfRange);
        }

        for (i, &coord) in self.coords.iter().enumerate().rev() {
            let limit: usize = if i == 0 {
                hex.num_spectres()
            } else {
                hex.num_subhexes()
            };
            if coord as usize >= limit {
                return Err(ParamsError::CoordinateOutOfRange);
            }
            if i > 0 {
                hex = hex.subhexes()[coord as usize];
            }
        }
        Ok(())
    }
}

impl fmt::Display for SpectrePatchParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:", self.orientation)?;
        for c in &self.coords {
            write!(f, "{c}")?;
        }
        write!(f, "{}", self.final_hex)
    }
}

impl FromStr for SpectrePatchParams {
    type Err = ParamsError;

    /// Parse and validate the text form of a descriptor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (orientation, rest) = s.trim().split_once(':').ok_or(ParamsError::Malformed)?;
        let orientation: usize = orientation.parse().map_err(|_| ParamsError::Malformed)?;

        let mut chars: Vec<char> = rest.chars().collect();
        let final_hex: char = chars.pop().ok_or(ParamsError::Malformed)?;
        if !is_valid_hex_letter(final_hex) {
            return Err(ParamsError::InvalidFinalHex);
        }

        let coords: Vec<u8> = chars
            .iter()
            .map(|c| c.to_digit(10).map(|d| d as u8).ok_or(ParamsError::Malformed))
            .collect::<Result<Vec<u8>, ParamsError>>()?;

        let params: SpectrePatchParams = Self {
            orientation,
            coords,
            final_hex,
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(orientation: usize, coords: &[u8], final_hex: char) -> SpectrePatchParams {
        SpectrePatchParams {
            orientation,
            coords: coords.to_vec(),
            final_hex,
        }
    }

    #[test]
    fn valid_descriptors() {
        assert_eq!(params(0, &[0], 'Y').validate(), Ok(()));
        assert_eq!(params(11, &[1, 2, 7], 'F').validate(), Ok(()));
        // Spectre 1 only exists in G: index 2 of D is G
        assert_eq!(params(3, &[1, 2], 'D').validate(), Ok(()));
    }

    #[test]
    fn invalid_descriptors() {
        assert_eq!(
            params(0, &[], 'G').validate(),
            Err(ParamsError::NoCoordinates)
        );
        assert_eq!(
            params(0, &[0], 'Q').validate(),
            Err(ParamsError::InvalidFinalHex)
        );
        assert_eq!(
            params(12, &[0], 'G').validate(),
            Err(ParamsError::OrientationOutOfRange)
        );
        // G only has seven sub-hexes
        assert_eq!(
            params(0, &[0, 7], 'G').validate(),
            Err(ParamsError::CoordinateOutOfRange)
        );
        // Index 0 of D is F, which holds a single Spectre
        assert_eq!(
            params(0, &[1, 0], 'D').validate(),
            Err(ParamsError::CoordinateOutOfRange)
        );
        assert_eq!(
            params(0, &[2], 'G').validate(),
            Err(ParamsError::CoordinateOutOfRange)
        );
    }

    #[test]
    fn text_form() {
        let p: SpectrePatchParams = params(4, &[0, 1, 5, 2], 'G');
        assert_eq!(p.to_string(), "4:0152G");
        assert_eq!("4:0152G".parse::<SpectrePatchParams>(), Ok(p));
        assert_eq!(
            "4:0152".parse::<SpectrePatchParams>(),
            Err(ParamsError::InvalidFinalHex)
        );
        assert_eq!(
            "4:01x2G".parse::<SpectrePatchParams>(),
            Err(ParamsError::Malformed)
        );
        assert_eq!(
            "40152G".parse::<SpectrePatchParams>(),
            Err(ParamsError::Malformed)
        );
        assert_eq!(
            "4:G".parse::<SpectrePatchParams>(),
            Err(ParamsError::NoCoordinates)
        );
        assert_eq!(
            "4:0Z".parse::<SpectrePatchParams>(),
            Err(ParamsError::InvalidFinalHex)
        );
    }
}
