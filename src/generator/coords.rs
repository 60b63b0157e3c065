/*
coords.rs

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

//! Hierarchical coordinates of a Spectre.

use crate::generator::hexagons::HexLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of the hexagon hierarchy.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct HexCoord {
    /// Index of this hexagon within its parent, or [`None`] when the parent is not decided yet.
    pub index: Option<usize>,

    /// Type of this hexagon.
    pub hex: HexLabel,
}

impl HexCoord {
    pub fn new(index: Option<usize>, hex: HexLabel) -> Self {
        Self { index, hex }
    }
}

/// Position of a Spectre in the hexagon hierarchy.
///
/// `stack[0]` is the hexagon that directly contains the Spectre, `stack[1]` contains
/// `stack[0]`, and so on.
/// Only the top of the stack has an undecided index.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SpectreCoords {
    /// Index of the Spectre within `stack[0]`.
    pub index: usize,

    pub stack: Vec<HexCoord>,

    /// Colour, in `0..3`, of the lowest-level hexagon. Used to four-colour renderings.
    pub hex_colour: u8,

    /// Colour of the previously visited lowest-level hexagon.
    pub prev_hex_colour: u8,

    /// Side through which the current lowest-level hexagon was entered.
    pub incoming_hex_edge: u8,
}

impl SpectreCoords {
    /// Create an empty [`SpectreCoords`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create coordinates from their index and stack.
    pub fn from_stack(index: usize, stack: Vec<HexCoord>) -> Self {
        Self {
            index,
            stack,
            ..Self::default()
        }
    }

    /// Make sure the stack can hold `size` levels without reallocating.
    ///
    /// Capacity grows by a quarter plus sixteen entries, or to `size` if that is not enough.
    pub fn make_space(&mut self, size: usize) {
        let capacity: usize = self.stack.capacity();
        if capacity < size {
            let target: usize = (capacity * 5 / 4 + 16).max(size);
            self.stack.reserve_exact(target - self.stack.len());
        }
    }

    /// Number of levels in the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Type of the hexagon that directly contains the Spectre.
    pub fn hex(&self) -> HexLabel {
        self.stack[0].hex
    }

    /// Whether the coordinates describe a valid position: every decided level is a sub-hex of
    /// the level above it, only the top is undecided, and the Spectre index fits its hexagon.
    pub fn is_consistent(&self) -> bool {
        let Some(top) = self.stack.last() else {
            return false;
        };
        if top.index.is_some() || self.index >= self.stack[0].hex.num_spectres() {
            return false;
        }
        self.stack.windows(2).all(|pair| match pair[0].index {
            Some(i) => pair[1].hex.subhexes().get(i) == Some(&pair[0].hex),
            None => false,
        })
    }

    /// Track the colour of the lowest-level hexagon after leaving it through `out_edge` and
    /// entering the next one through `in_edge`.
    ///
    /// Leaving through a side of the same parity as the entry side goes back to the previous
    /// colour. Otherwise the new hexagon gets the third colour.
    pub fn update_colours(&mut self, out_edge: usize, in_edge: usize) {
        let new_colour: u8 = if (out_edge as u8 ^ self.incoming_hex_edge) & 1 == 0 {
            self.prev_hex_colour
        } else {
            3u8.wrapping_sub(self.hex_colour)
                .wrapping_sub(self.prev_hex_colour)
        };
        self.prev_hex_colour = self.hex_colour;
        self.hex_colour = new_colour;
        self.incoming_hex_edge = in_edge as u8;
    }
}

impl fmt::Display for SpectreCoords {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [", self.index)?;
        for (i, c) in self.stack.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match c.index {
                Some(index) => write!(f, "{}{index}", c.hex)?,
                None => write!(f, "{}?", c.hex)?,
            }
        }
        write!(f, "]")
    }
}
