/*
spectre.rs

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

//! Spectres placed in the plane.

use crate::generator::context::SpectreContext;
use crate::generator::coords::SpectreCoords;
use crate::generator::hexagons::SPECTRE_ANGLES;
use crate::generator::point::Point;
use serde::{Deserialize, Serialize};

/// A Spectre with its vertices and its position in the hierarchy.
///
/// Vertices go anticlockwise around the tile, starting at the tip of the head.
/// Edge `i` joins vertex `i` to vertex `i + 1`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Spectre {
    pub vertices: [Point; 14],
    pub coords: SpectreCoords,
}

impl Spectre {
    /// Place a Spectre whose vertex `index_of_u` is `u`, and whose next vertex is `v`.
    pub fn place(u: Point, v: Point, index_of_u: usize, coords: SpectreCoords) -> Self {
        Self {
            vertices: place_vertices(u, v, index_of_u),
            coords,
        }
    }

    /// First two vertices, which are enough to tell Spectres apart.
    pub fn key(&self) -> (Point, Point) {
        (self.vertices[0], self.vertices[1])
    }

    /// Colour in `0..4` such that neighbouring Spectres mostly differ.
    ///
    /// The rare second Spectre of G gets its own colour.
    pub fn colour(&self) -> u8 {
        if self.coords.index == 1 {
            3
        } else {
            self.coords.hex_colour
        }
    }
}

/// Compute all the vertices of a Spectre from two consecutive ones.
pub fn place_vertices(u: Point, v: Point, index_of_u: usize) -> [Point; 14] {
    let mut vertices: [Point; 14] = [Point::ZERO; 14];
    let mut pos: Point = u;
    let mut disp: Point = v - u;

    for i in 0..14 {
        vertices[(i + index_of_u) % 14] = pos;
        pos = pos + disp;
        disp = disp * Point::rot(SPECTRE_ANGLES[(i + 1 + index_of_u) % 14]);
    }
    vertices
}

impl SpectreContext {
    /// The initial Spectre of the context.
    pub fn initial_spectre(&self) -> Spectre {
        Spectre::place(
            self.start_vertices[0],
            self.start_vertices[1],
            0,
            self.initial_coords(),
        )
    }

    /// The Spectre across edge `src_edge` of `src`.
    ///
    /// Also return the edge of the new Spectre that `src_edge` matches.
    pub fn adjacent(&mut self, src: &Spectre, src_edge: usize) -> (Spectre, usize) {
        let mut coords: SpectreCoords = src.coords.clone();
        let dst_edge: usize = self.step(&mut coords, src_edge);
        let dst: Spectre = Spectre::place(
            src.vertices[(src_edge + 1) % 14],
            src.vertices[src_edge],
            dst_edge,
            coords,
        );
        (dst, dst_edge)
    }
}
