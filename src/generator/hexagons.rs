/*
hexagons.rs

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

//! Hand-written description of the hexagonal metatiles.
//!
//! Each of the nine hexagon types expands into seven or eight smaller hexagons (the sub-hexes),
//! and, at the lowest level, into one or two Spectres.
//! The data in this module describes that expansion: the type and orientation of every
//! sub-hex, the shape of each side of the expanded hexagon, and the limiting frequency of
//! each type.
//! The transition tables in [`crate::generator::tables`] are computed from this data.

use crate::generator::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// The nine hexagon types.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr,
)]
#[repr(u8)]
pub enum HexLabel {
    G = 0,
    D,
    J,
    L,
    X,
    P,
    S,
    F,
    Y,
}

/// Hexagon letters, in the order of [`HexLabel`].
pub const HEX_LETTERS: &str = "GDJLXPSFY";

use HexLabel::{D, F, G, J, L, P, S, X, Y};

const SUBHEXES_G: [HexLabel; 7] = [F, X, G, S, P, D, J];
const SUBHEXES_D: [HexLabel; 8] = [F, P, G, S, X, D, F, X];
const SUBHEXES_J: [HexLabel; 8] = [F, P, G, S, Y, D, F, P];
const SUBHEXES_L: [HexLabel; 8] = [F, P, G, S, Y, D, F, X];
const SUBHEXES_X: [HexLabel; 8] = [F, Y, G, S, Y, D, F, P];
const SUBHEXES_P: [HexLabel; 8] = [F, Y, G, S, Y, D, F, X];
const SUBHEXES_S: [HexLabel; 8] = [L, P, G, S, X, D, F, X];
const SUBHEXES_F: [HexLabel; 8] = [F, P, G, S, Y, D, F, Y];
const SUBHEXES_Y: [HexLabel; 8] = [F, Y, G, S, Y, D, F, Y];

/// Orientation of each sub-hex, in sixths of a turn. Identical for every type apart from the
/// missing eighth sub-hex of G.
const ORIENTATIONS: [u32; 8] = [2, 1, 0, 1, 4, 5, 0, 5];

/// Centres of the sub-hexes in the expansion diagram.
pub const HEX_CENTRES: [Point; 8] = [
    Point::new(0, 0, 0, 0),
    Point::new(6, 0, 0, 0),
    Point::new(0, 0, -6, 0),
    Point::new(6, 0, -6, 0),
    Point::new(0, 0, -12, 0),
    Point::new(6, 0, -12, 0),
    Point::new(12, 0, -12, 0),
    Point::new(12, 0, -18, 0),
];

/// Turns between consecutive edges of a Spectre, in twelfths of a turn.
/// Entry `i` is the turn made when arriving at vertex `i`.
pub const SPECTRE_ANGLES: [i32; 14] = [-3, -2, 3, -2, -3, 2, -3, 2, -3, -2, 0, -2, 3, -2];

impl HexLabel {
    /// All the types, in table order.
    pub const ALL: [HexLabel; 9] = [G, D, J, L, X, P, S, F, Y];

    /// Letter naming the type.
    pub fn letter(self) -> char {
        HEX_LETTERS.as_bytes()[self as usize] as char
    }

    /// Type named by the given letter, if any.
    pub fn from_letter(letter: char) -> Option<Self> {
        HEX_LETTERS
            .find(letter)
            .and_then(|pos| HexLabel::from_repr(pos as u8))
    }

    /// Number of sub-hexes in the expansion of the hexagon.
    pub fn num_subhexes(self) -> usize {
        if self == G { 7 } else { 8 }
    }

    /// Number of Spectres in the expansion of the hexagon.
    pub fn num_spectres(self) -> usize {
        if self == G { 2 } else { 1 }
    }

    /// Types of the sub-hexes.
    pub fn subhexes(self) -> &'static [HexLabel] {
        match self {
            G => &SUBHEXES_G,
            D => &SUBHEXES_D,
            J => &SUBHEXES_J,
            L => &SUBHEXES_L,
            X => &SUBHEXES_X,
            P => &SUBHEXES_P,
            S => &SUBHEXES_S,
            F => &SUBHEXES_F,
            Y => &SUBHEXES_Y,
        }
    }

    /// Orientations of the sub-hexes, in sixths of a turn.
    pub fn orientations(self) -> &'static [u32] {
        &ORIENTATIONS[..self.num_subhexes()]
    }

    /// Types of the six sides, anticlockwise.
    pub fn edges(self) -> [Edge; 6] {
        use EdgeType::{Alpha, Beta, Delta, Epsilon, Eta, Gamma, Theta, Zeta};
        let p = Edge::plus;
        let m = Edge::minus;

        match self {
            G => [m(Beta), m(Alpha), p(Alpha), m(Gamma), m(Delta), p(Beta)],
            D => [m(Zeta), p(Gamma), p(Beta), m(Epsilon), p(Alpha), m(Gamma)],
            J => [m(Beta), p(Gamma), p(Beta), p(Theta), p(Beta), p(Eta)],
            L => [m(Beta), p(Gamma), p(Beta), m(Epsilon), p(Alpha), m(Theta)],
            X => [m(Beta), m(Alpha), p(Epsilon), p(Theta), p(Beta), p(Eta)],
            P => [m(Beta), m(Alpha), p(Epsilon), m(Epsilon), p(Alpha), m(Theta)],
            S => [p(Delta), p(Zeta), p(Beta), m(Epsilon), p(Alpha), m(Gamma)],
            F => [m(Beta), p(Gamma), p(Beta), m(Epsilon), p(Epsilon), p(Eta)],
            Y => [m(Beta), m(Alpha), p(Epsilon), m(Epsilon), p(Epsilon), p(Eta)],
        }
    }

    /// Weight of the type in the limiting distribution, scaled by 10⁷.
    pub fn probability(self) -> u64 {
        match self {
            G | D | S => 10_000_000,
            J | L => 1_270_167,
            X | P => 7_459_667,
            F => 17_459_667,
            Y => 13_810_500,
        }
    }

    /// D and S hexagons have their expansion outline starting at another place.
    fn is_rare(self) -> bool {
        matches!(self, D | S)
    }

    /// First vertex, and direction of the first edge, of the traced outline of the expansion.
    pub fn hex_outline_start(self) -> (Point, Point) {
        if self.is_rare() {
            (Point::new(-2, 0, -14, 0), Point::new(-2, 0, 4, 0))
        } else {
            (Point::new(-4, 0, -10, 0), Point::new(2, 0, 2, 0))
        }
    }

    /// Spectre and vertex where the traced outline of the Spectre expansion starts.
    pub fn spectre_outline_start(self) -> (usize, usize) {
        if self.is_rare() { (0, 8) } else { (0, 9) }
    }
}

impl fmt::Display for HexLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Whether the letter names a hexagon type.
pub fn is_valid_hex_letter(letter: char) -> bool {
    HexLabel::from_letter(letter).is_some()
}

/// The eight shapes a side of a hexagon can expand into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EdgeType {
    Eta = 0,
    Alpha,
    Beta,
    Gamma,
    Delta,
    Epsilon,
    Zeta,
    Theta,
}

impl EdgeType {
    /// Turns, in twelfths of a turn, between the sub-edges of the side once expanded into
    /// hexagons.
    pub fn hex_shape(self) -> &'static [i32] {
        match self {
            EdgeType::Eta => &[2, 2, -2, -2],
            EdgeType::Alpha => &[2, -2],
            EdgeType::Beta => &[-2],
            EdgeType::Gamma => &[2, -2, -2, 2],
            EdgeType::Delta => &[-2, 2, -2, 2],
            EdgeType::Epsilon => &[2, -2, -2],
            EdgeType::Zeta => &[-2, 2],
            EdgeType::Theta => &[2, 2, -2, -2, 2],
        }
    }

    /// Turns between the sub-edges of the side once expanded into Spectres.
    pub fn spectre_shape(self) -> &'static [i32] {
        match self {
            EdgeType::Eta => &[0],
            EdgeType::Alpha => &[-2, 3],
            EdgeType::Beta => &[3, -2],
            EdgeType::Gamma => &[2],
            EdgeType::Delta => &[2, 3, 2, -3, 2],
            EdgeType::Epsilon => &[3],
            EdgeType::Zeta => &[-2],
            // A single straight edge
            EdgeType::Theta => &[],
        }
    }
}

/// Signed side type.
///
/// A negative side is a positive side traversed in the other direction.
/// Two sides fit together when their values add up to zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeType,
    pub negative: bool,
}

impl Edge {
    pub const fn plus(kind: EdgeType) -> Self {
        Self {
            kind,
            negative: false,
        }
    }

    pub const fn minus(kind: EdgeType) -> Self {
        Self {
            kind,
            negative: true,
        }
    }

    /// Signed integer value: 0 for η, ±1 to ±7 for the others.
    pub fn value(self) -> i32 {
        let v: i32 = self.kind as i32;
        if self.negative { -v } else { v }
    }

    /// Whether the two sides fit together.
    pub fn mates(self, other: Edge) -> bool {
        self.value() + other.value() == 0
    }

    /// Signed turn sequence of the given shape, in the direction of travel.
    ///
    /// The returned vector has one entry less than the number of sub-edges.
    pub fn turns(self, shape: &[i32]) -> Vec<i32> {
        if self.negative {
            shape.iter().rev().map(|t| -t).collect()
        } else {
            shape.to_vec()
        }
    }
}
