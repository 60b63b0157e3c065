/*
lib.rs

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

//! Patches of the Spectre aperiodic monotile tiling.
//!
//! See [`generator`] for an overview.

pub mod config;
pub mod generator;

pub use generator::context::{SpectreContext, seeded_rng};
pub use generator::params::{ParamsError, SpectrePatchParams};
pub use generator::patch::{PatchWindow, WindowError, generate, generate_raster, randomise};
pub use generator::spectre::Spectre;
