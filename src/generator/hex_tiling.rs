/*
hex_tiling.rs

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

//! Tiling by the lowest-level hexagons.
//!
//! The hexagons are drawn as a regular hexagonal grid.
//! Starting from the hexagon of the initial Spectre, the generator spirals outwards one ring
//! at a time, and stops after a complete ring without any hexagon in the window.

use crate::generator::context::SpectreContext;
use crate::generator::coords::SpectreCoords;
use crate::generator::hexagons::HexLabel;
use crate::generator::point::Point;
use log::debug;
use serde::{Deserialize, Serialize};

/// A lowest-level hexagon placed in the plane.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlacedHex {
    pub hex: HexLabel,
    pub centre: Point,
    pub vertices: [Point; 6],

    /// Colour in `0..3`. Neighbouring hexagons have different colours when the initial
    /// colouring fields are.
    pub colour: u8,
}

/// Deliver to `callback` the hexagons that have a vertex for which `inside` is `true`.
///
/// `orientation`, in sixths of a turn, is the orientation of the first hexagon.
/// Return the number of delivered hexagons.
pub fn generate_hexes<I, F>(
    ctx: &mut SpectreContext,
    orientation: usize,
    inside: I,
    mut callback: F,
) -> usize
where
    I: Fn(Point) -> bool,
    F: FnMut(&PlacedHex),
{
    let top: Point = Point::new(-2, 0, 4, 0);
    let six: Point = Point::new(6, 0, 0, 0);

    let mut sc: SpectreCoords = ctx.initial_coords();
    let mut orient: usize = orientation % 6;
    let mut centre: Point = Point::ZERO;
    let mut count: usize = 0;

    // Ring radius, side of the ring, and position along that side
    let mut radius: usize = 1;
    let mut side: usize = 0;
    let mut pos: usize = 0;
    let mut delivered_in_ring: bool = false;

    loop {
        let vertices: [Point; 6] =
            std::array::from_fn(|i| centre + top * Point::rot(2 * (orient + i) as i32));
        if vertices.iter().any(|v| inside(*v)) {
            delivered_in_ring = true;
            count += 1;
            callback(&PlacedHex {
                hex: sc.hex(),
                centre,
                vertices,
                colour: sc.hex_colour,
            });
        }

        // The first move of each ring goes out to the next ring
        let out_edge: usize = if side == 0 && pos == 0 { 5 } else { side };
        pos += 1;
        if pos >= radius {
            pos = 0;
            side += 1;
            if side >= 6 {
                side = 0;
                if !delivered_in_ring {
                    break;
                }
                delivered_in_ring = false;
                radius += 1;
            }
        }

        let in_edge: usize = ctx.step_hex(&mut sc, 0, (out_edge + 6 - orient) % 6);
        orient = (out_edge + 9 - in_edge) % 6;
        centre = centre + six * Point::rot(4 + 2 * out_edge as i32);
    }

    debug!("Hexagon tiling: {count} hexagons over {radius} rings");
    count
}
