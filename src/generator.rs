/*
generator.rs

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

//! Generate patches of the Spectre tiling.
//!
//! The Spectre tiling is aperiodic: it cannot be stored as a repeating pattern.
//! Instead, every Spectre is identified by its position in a hierarchy of hexagonal
//! metatiles.
//! Each Spectre belongs to a hexagon of the lowest level, which belongs to a hexagon of the
//! level above, and so on.
//! There are nine types of hexagons, listed in [`hexagons::HexLabel`].
//!
//! * [`point::Point`] gives exact coordinates to the vertices.
//!   All the vertices lie in the ring of integers generated by the twelfth roots of unity.
//!
//! * [`tables::tables`] returns the transition tables.
//!   For each hexagon type, they tell which sub-hexagon, or which Spectre, is on the other
//!   side of each edge.
//!   The tables are built once, at first use, from the hand-written data in [`hexagons`].
//!
//! * [`coords::SpectreCoords`] is the position of a Spectre in the hierarchy.
//!
//! * A [`context::SpectreContext`] stores the decisions taken about the upper levels of the
//!   hierarchy, and moves from a Spectre to its neighbours with
//!   [`context::SpectreContext::step`].
//!   The hierarchy grows upwards, at random, when a move needs a level that does not exist yet.
//!
//! To generate a patch, create a [`patch::PatchWindow`] and use one of its generators:
//!
//! * [`patch::PatchWindow::breadth_first`] explores the patch from the initial Spectre.
//!   See [`breadth_first`].
//!
//! * [`patch::PatchWindow::raster`] produces the Spectres line by line.
//!   See [`raster`].
//!
//! [`patch::randomise`] chooses a random patch and freezes it into a
//! [`params::SpectrePatchParams`] descriptor.
//! [`patch::generate`] regenerates the same patch from that descriptor.
//!
//! [`hex_tiling::generate_hexes`] draws the lowest-level hexagons instead of the Spectres.

pub mod breadth_first;
pub mod context;
pub mod coords;
pub mod hex_tiling;
pub mod hexagons;
pub mod params;
pub mod patch;
pub mod point;
pub mod raster;
pub mod spectre;
pub mod tables;
