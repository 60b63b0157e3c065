/*
context.rs

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

//! Generation context and step engine.
//!
//! A [`SpectreContext`] owns the prototype coordinates, which record every decision taken so
//! far about the upper levels of the hierarchy.
//! All the coordinates used while generating a patch copy their upper levels from the
//! prototype, so that they all agree on the same infinite tiling.
//!
//! [`SpectreContext::step`] moves from a Spectre to its neighbour across one of its edges.
//! It climbs the hierarchy until it finds a hexagon that contains both Spectres, and then
//! walks back down.
//! When the climb reaches the top of the prototype, the prototype is extended upwards with a
//! random parent.

use crate::config::FALLBACK_SEED;
use crate::generator::coords::{HexCoord, SpectreCoords};
use crate::generator::hexagons::HexLabel;
use crate::generator::params::{ParamsError, SpectrePatchParams};
use crate::generator::point::Point;
use crate::generator::tables::{HexTables, MapEntry, Possibility, tables};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore, SeedableRng};

/// Build a random number generator from a text seed.
///
/// The same text always gives the same sequence of numbers.
pub fn seeded_rng(seed: &str) -> StdRng {
    let mut bytes: [u8; 32] = [0; 32];
    for (i, b) in seed.bytes().enumerate() {
        bytes[i % 32] = bytes[i % 32].rotate_left(3) ^ b;
    }
    StdRng::from_seed(bytes)
}

/// Pick one of the possibilities, weighted by their probability.
fn choose_possibility(rng: &mut StdRng, poss: &[Possibility]) -> Possibility {
    *poss
        .choose_weighted(rng, |p| p.prob)
        .expect("Possibility tables are not empty and have positive weights")
}

/// Shared state for generating one patch.
#[derive(Debug, Clone)]
pub struct SpectreContext {
    /// Random number generator. [`None`] when the context replays a descriptor, until the
    /// prototype needs to grow beyond it.
    rng: Option<StdRng>,

    /// Every hierarchy decision taken so far.
    pub(crate) prototype: SpectreCoords,

    /// First two vertices of the initial Spectre.
    pub(crate) start_vertices: [Point; 2],

    /// Orientation of the initial Spectre, in twelfths of a turn.
    orientation: usize,
}

impl SpectreContext {
    /// Create a context with a random initial Spectre.
    ///
    /// The context gets its own generator, seeded from `rng`.
    pub fn new_random<R: RngCore>(rng: &mut R) -> Self {
        let mut rng: StdRng = StdRng::from_rng(rng);
        let poss: Possibility = choose_possibility(&mut rng, &tables().possibilities_spectre);

        let mut prototype: SpectreCoords = SpectreCoords::new();
        prototype.make_space(1);
        prototype.index = poss.lo;
        prototype.stack.push(HexCoord::new(None, poss.hi));

        // Spectres whose orientation is an odd number of twelfths are rare. They are exactly
        // the second Spectre of G. Keep the common ones in an even orientation.
        let orientation: usize = 2 * rng.random_range(0..6) + prototype.index;
        debug!("New random context: initial Spectre {prototype}, orientation {orientation}");

        Self {
            rng: Some(rng),
            prototype,
            start_vertices: start_vertices(orientation),
            orientation,
        }
    }

    /// Create a context that replays the given descriptor.
    pub fn from_params(params: &SpectrePatchParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let final_hex: HexLabel =
            HexLabel::from_letter(params.final_hex).ok_or(ParamsError::InvalidFinalHex)?;
        let n: usize = params.coords.len();

        let mut prototype: SpectreCoords = SpectreCoords::new();
        prototype.make_space(n);
        prototype.index = params.coords[0] as usize;

        // Rebuild the types from the top down
        let mut stack: Vec<HexCoord> = Vec::with_capacity(n);
        let mut hex: HexLabel = final_hex;
        stack.push(HexCoord::new(None, hex));
        for &coord in params.coords[1..].iter().rev() {
            hex = hex.subhexes()[coord as usize];
            stack.push(HexCoord::new(Some(coord as usize), hex));
        }
        stack.reverse();
        prototype.stack.extend(stack);

        debug!(
            "Context from descriptor {params}: initial Spectre {prototype}, orientation {}",
            params.orientation
        );
        Ok(Self {
            rng: None,
            prototype,
            start_vertices: start_vertices(params.orientation),
            orientation: params.orientation,
        })
    }

    /// Orientation of the initial Spectre.
    pub fn orientation(&self) -> usize {
        self.orientation
    }

    /// Hierarchy decisions taken so far.
    pub fn prototype(&self) -> &SpectreCoords {
        &self.prototype
    }

    /// Coordinates of the initial Spectre.
    pub fn initial_coords(&self) -> SpectreCoords {
        self.prototype.clone()
    }

    /// Random generator of the context, created from a fixed seed when the context has none.
    fn rng(&mut self) -> &mut StdRng {
        self.rng.get_or_insert_with(|| {
            debug!("No random generator: creating one from a fixed seed");
            seeded_rng(FALLBACK_SEED)
        })
    }

    /// Give the initial Spectre random colouring fields.
    pub fn randomise_colours(&mut self) {
        let rng: &mut StdRng = self.rng();
        let hex_colour: u8 = rng.random_range(0..3);
        let prev_hex_colour: u8 = (hex_colour + 1 + rng.random_range(0..2)) % 3;
        let incoming_hex_edge: u8 = rng.random_range(0..2);

        self.prototype.hex_colour = hex_colour;
        self.prototype.prev_hex_colour = prev_hex_colour;
        self.prototype.incoming_hex_edge = incoming_hex_edge;
    }

    /// Freeze the hierarchy decisions taken so far into a descriptor.
    pub fn to_params(&self) -> SpectrePatchParams {
        let n: usize = self.prototype.len();
        let mut coords: Vec<u8> = Vec::with_capacity(n);
        coords.push(self.prototype.index as u8);
        for c in &self.prototype.stack[..n - 1] {
            coords.push(c.index.unwrap_or_default() as u8);
        }

        SpectrePatchParams {
            orientation: self.orientation,
            coords,
            final_hex: self.prototype.stack[n - 1].hex.letter(),
        }
    }

    /// Make sure `sc` has at least `n` levels, copying them from the prototype.
    ///
    /// The prototype is extended first if it is too short, by choosing a random parent for its
    /// top hexagon, weighted by the limiting frequencies.
    pub fn extend_coords(&mut self, sc: &mut SpectreCoords, n: usize) {
        if self.prototype.len() < n {
            self.prototype.make_space(n);
            while self.prototype.len() < n {
                let top: HexLabel = self.prototype.stack[self.prototype.len() - 1].hex;
                let poss: Possibility =
                    choose_possibility(self.rng(), &tables().hex(top).possibilities);
                debug!(
                    "Extending the prototype to {} levels: {top} is sub-hex {} of {}",
                    self.prototype.len() + 1,
                    poss.lo,
                    poss.hi
                );

                let last: usize = self.prototype.len() - 1;
                self.prototype.stack[last].index = Some(poss.lo);
                self.prototype.stack.push(HexCoord::new(None, poss.hi));
            }
        }

        sc.make_space(n);
        while sc.len() < n {
            let k: usize = sc.len() - 1;
            assert!(sc.stack[k].index.is_none(), "Top of {sc} is decided");
            assert_eq!(
                sc.stack[k].hex, self.prototype.stack[k].hex,
                "{sc} disagrees with the prototype"
            );
            sc.stack[k].index = self.prototype.stack[k].index;
            sc.stack
                .push(HexCoord::new(None, self.prototype.stack[k + 1].hex));
        }
    }

    /// Move the hexagon at level `depth` of `sc` across its side `edge`.
    ///
    /// Return the side of the new hexagon through which it was entered.
    pub fn step_hex(&mut self, sc: &mut SpectreCoords, depth: usize, edge: usize) -> usize {
        self.extend_coords(sc, depth + 2);

        let Some(child) = sc.stack[depth].index else {
            panic!("Level {depth} of {sc} is undecided");
        };
        assert!(edge < 6, "Hexagon side {edge} out of range");

        let mut parent: HexLabel = sc.stack[depth + 1].hex;
        assert!(child < parent.num_subhexes());
        let mut m: MapEntry = tables().hex(parent).hexmap[6 * child + edge];

        if !m.internal {
            // Leave the parent hexagon, then find where we land in the new one
            let recedge: usize = self.step_hex(sc, depth + 1, m.hi);
            assert!(recedge < 6);
            parent = sc.stack[depth + 1].hex;
            let t: &HexTables = tables().hex(parent);
            m = t.hexin[t.hexedges[recedge].reversed(m.lo)];
            assert!(m.internal, "Hexagon step out of {parent} lands outside");
        }

        sc.stack[depth] = HexCoord::new(Some(m.hi), parent.subhexes()[m.hi]);
        if depth == 0 {
            sc.update_colours(edge, m.lo);
        }
        trace!("Hexagon step at level {depth} across side {edge}: {sc}, entered by side {}", m.lo);
        m.lo
    }

    /// Move the Spectre described by `sc` across its edge `edge`.
    ///
    /// Return the edge of the new Spectre through which it was entered.
    pub fn step(&mut self, sc: &mut SpectreCoords, edge: usize) -> usize {
        assert!(
            sc.index < sc.hex().num_spectres(),
            "Spectre index of {sc} out of range"
        );
        assert!(edge < 14, "Spectre edge {edge} out of range");

        let mut m: MapEntry = tables().hex(sc.hex()).specmap[14 * sc.index + edge];

        // Crossing the spur of S takes two hexagon steps
        while !m.internal {
            let recedge: usize = self.step_hex(sc, 0, m.hi);
            assert!(recedge < 6);
            let t: &HexTables = tables().hex(sc.hex());
            m = t.specin[t.specedges[recedge].reversed(m.lo)];
        }

        sc.index = m.hi;
        trace!("Spectre step across edge {edge}: {sc}, entered by edge {}", m.lo);
        m.lo
    }
}

/// First two vertices of the initial Spectre for the given orientation.
fn start_vertices(orientation: usize) -> [Point; 2] {
    let minus_sqrt3: Point = Point::rot(5) + Point::rot(-5);
    let basic_edge: Point = (Point::rot(0) + Point::rot(-3)) * Point::rot(orientation as i32);
    let diagonal: Point = basic_edge + basic_edge * Point::rot(-3);
    let first: Point = diagonal * minus_sqrt3;
    [first, first + basic_edge]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::patch::PatchWindow;
    use HexLabel::{D, F, G, L, P, S, X, Y};

    fn context() -> SpectreContext {
        SpectreContext::new_random(&mut seeded_rng("12345"))
    }

    fn coords(index: usize, stack: &[(HexLabel, Option<usize>)]) -> SpectreCoords {
        SpectreCoords::from_stack(
            index,
            stack
                .iter()
                .map(|&(hex, index)| HexCoord::new(index, hex))
                .collect(),
        )
    }

    #[test]
    fn step_between_the_two_spectres_of_g() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = coords(0, &[(G, None)]);
        assert_eq!(ctx.step(&mut sc, 12), 5);
        assert_eq!(sc, coords(1, &[(G, None)]));
    }

    #[test]
    fn step_across_the_spur_of_s() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = coords(1, &[(G, Some(2)), (F, None)]);
        assert_eq!(ctx.step(&mut sc, 1), 6);
        assert_eq!(sc.index, 0);
        assert_eq!(sc.stack, coords(0, &[(D, Some(5)), (F, None)]).stack);
    }

    #[test]
    fn step_into_s_without_crossing_the_spur() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = coords(1, &[(G, Some(2)), (F, None)]);
        assert_eq!(ctx.step(&mut sc, 13), 4);
        assert_eq!(sc.index, 0);
        assert_eq!(sc.stack, coords(0, &[(S, Some(3)), (F, None)]).stack);
    }

    #[test]
    fn step_up_and_down_the_hierarchy() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = coords(
            0,
            &[
                (S, Some(3)),
                (Y, Some(7)),
                (Y, Some(4)),
                (Y, Some(4)),
                (F, Some(0)),
                (X, Some(1)),
                (G, None),
            ],
        );
        assert_eq!(ctx.step(&mut sc, 13), 12);
        assert_eq!(sc.index, 0);
        assert_eq!(
            sc.stack,
            coords(
                0,
                &[
                    (Y, Some(1)),
                    (P, Some(1)),
                    (D, Some(5)),
                    (Y, Some(4)),
                    (X, Some(7)),
                    (S, Some(3)),
                    (G, None),
                ],
            )
            .stack
        );
    }

    #[test]
    fn step_up_and_down_the_hierarchy_again() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = coords(
            0,
            &[
                (Y, Some(7)),
                (F, Some(6)),
                (Y, Some(4)),
                (X, Some(7)),
                (L, Some(0)),
                (S, Some(3)),
                (F, None),
            ],
        );
        assert_eq!(ctx.step(&mut sc, 0), 1);
        assert_eq!(sc.index, 0);
        assert_eq!(
            sc.stack,
            coords(
                0,
                &[
                    (P, Some(1)),
                    (F, Some(0)),
                    (Y, Some(7)),
                    (F, Some(0)),
                    (G, Some(2)),
                    (D, Some(5)),
                    (F, None),
                ],
            )
            .stack
        );
    }

    #[test]
    fn every_step_can_be_undone() {
        let mut ctx: SpectreContext = context();
        let start: SpectreCoords = ctx.initial_coords();
        for edge in 0..14 {
            let mut sc: SpectreCoords = start.clone();
            let back: usize = ctx.step(&mut sc, edge);
            assert!(sc.is_consistent());
            assert_eq!(ctx.step(&mut sc, back), edge);
            assert_eq!(sc.index, start.index);

            // Back at the initial Spectre, whose ancestors are the prototype
            let top: usize = sc.len() - 1;
            assert_eq!(sc.stack[..top], ctx.prototype().stack[..top]);
            assert_eq!(sc.stack[top].hex, ctx.prototype().stack[top].hex);
        }
    }

    #[test]
    fn prototype_only_grows() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = ctx.initial_coords();
        ctx.extend_coords(&mut sc, 5);
        let before: SpectreCoords = ctx.prototype().clone();
        assert_eq!(before.len(), 5);
        assert!(before.is_consistent());
        assert_eq!(sc.stack, before.stack);

        ctx.extend_coords(&mut sc, 8);
        let after: &SpectreCoords = ctx.prototype();
        assert_eq!(after.len(), 8);
        assert_eq!(after.stack[..4], before.stack[..4]);
        assert_eq!(after.stack[4].hex, before.stack[4].hex);
    }

    #[test]
    fn exploring_keeps_the_lower_levels_of_the_prototype() {
        let mut ctx: SpectreContext = context();
        let small: PatchWindow = PatchWindow::from_pixels(200, 150, 10.0).unwrap();
        small.breadth_first(&mut ctx, |_| {});
        let before: SpectreCoords = ctx.prototype().clone();
        assert!(before.len() > 1);

        // Larger patches need more levels, added on top of the existing ones
        let large: PatchWindow = PatchWindow::from_pixels(1024, 768, 10.0).unwrap();
        large.breadth_first(&mut ctx, |_| {});
        large.raster(&mut ctx, |_| {});
        let after: &SpectreCoords = ctx.prototype();
        let top: usize = before.len() - 1;
        assert!(after.len() >= before.len());
        assert!(after.is_consistent());
        assert_eq!(after.index, before.index);
        assert_eq!(after.stack[..top], before.stack[..top]);
        assert_eq!(after.stack[top].hex, before.stack[top].hex);
    }

    #[test]
    fn random_contexts_are_reproducible() {
        let a: SpectreContext = context();
        let b: SpectreContext = context();
        assert_eq!(a.prototype(), b.prototype());
        assert_eq!(a.orientation(), b.orientation());
        assert_eq!(a.orientation() % 2, a.prototype().index);
    }

    #[test]
    fn descriptor_round_trip() {
        let mut ctx: SpectreContext = context();
        let mut sc: SpectreCoords = ctx.initial_coords();
        ctx.extend_coords(&mut sc, 6);

        let params: SpectrePatchParams = ctx.to_params();
        assert_eq!(params.coords.len(), 6);
        assert_eq!(params.validate(), Ok(()));

        let replay: SpectreContext = SpectreContext::from_params(&params).unwrap();
        assert_eq!(replay.prototype().stack, ctx.prototype().stack);
        assert_eq!(replay.prototype().index, ctx.prototype().index);
        assert_eq!(replay.start_vertices, ctx.start_vertices);
    }

    #[test]
    fn replay_extends_from_a_fixed_seed() {
        let params: SpectrePatchParams = "0:0Y".parse().unwrap();
        let mut a: SpectreContext = SpectreContext::from_params(&params).unwrap();
        let mut b: SpectreContext = SpectreContext::from_params(&params).unwrap();
        let mut sa: SpectreCoords = a.initial_coords();
        let mut sb: SpectreCoords = b.initial_coords();
        a.extend_coords(&mut sa, 4);
        b.extend_coords(&mut sb, 4);
        assert_eq!(sa, sb);
        assert!(sa.is_consistent());
    }

    #[test]
    fn start_vertices_are_one_edge_apart() {
        for orientation in 0..12 {
            let [u, v] = start_vertices(orientation);
            let edge: Point = v - u;
            assert_eq!(edge * Point::rot(-(orientation as i32)), Point::new(1, 0, 0, -1));
        }
    }
}
