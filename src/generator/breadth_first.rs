/*
breadth_first.rs

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

//! Breadth-first patch generation.
//!
//! Starting from the initial Spectre of the context, neighbours are explored edge by edge.
//! The callback decides whether a Spectre belongs to the patch: rejected Spectres are not
//! explored further, which bounds the search.

use crate::generator::context::SpectreContext;
use crate::generator::point::Point;
use crate::generator::spectre::Spectre;
use log::debug;
use std::collections::{BTreeSet, VecDeque};

/// Deliver the Spectres of the patch to `callback`, in breadth-first order.
///
/// `callback` returns whether it accepts the Spectre.
/// Every accepted Spectre is delivered once. Return the number of accepted Spectres.
pub fn generate<F>(ctx: &mut SpectreContext, mut callback: F) -> usize
where
    F: FnMut(&Spectre) -> bool,
{
    let mut placed: BTreeSet<(Point, Point)> = BTreeSet::new();
    let mut queue: VecDeque<Spectre> = VecDeque::new();
    let mut accepted: usize = 0;
    let mut rejected: usize = 0;

    let start: Spectre = ctx.initial_spectre();
    placed.insert(start.key());
    if callback(&start) {
        accepted += 1;
        queue.push_back(start);
    } else {
        debug!("The initial Spectre is outside the patch");
    }

    while let Some(spectre) = queue.pop_front() {
        for edge in 0..14 {
            let (next, _) = ctx.adjacent(&spectre, edge);
            if placed.contains(&next.key()) {
                continue;
            }
            if !callback(&next) {
                rejected += 1;
                continue;
            }
            accepted += 1;
            placed.insert(next.key());
            queue.push_back(next);
        }
    }

    debug!(
        "Breadth-first generation: {accepted} Spectres accepted, {rejected} rejections, prototype height {}",
        ctx.prototype().len()
    );
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::context::seeded_rng;

    #[test]
    fn rejecting_everything_stops_at_the_initial_spectre() {
        let mut ctx: SpectreContext = SpectreContext::new_random(&mut seeded_rng("1"));
        let mut calls: usize = 0;
        let n: usize = generate(&mut ctx, |_| {
            calls += 1;
            false
        });
        assert_eq!(n, 0);
        assert_eq!(calls, 1);
    }

    #[test]
    fn bounded_search_delivers_unique_spectres() {
        let mut ctx: SpectreContext = SpectreContext::new_random(&mut seeded_rng("2"));
        let start: Spectre = ctx.initial_spectre();
        let origin: Point = start.vertices[0];
        let mut keys: Vec<(Point, Point)> = Vec::new();

        // Accept the Spectres whose first vertex is close to the initial one
        let n: usize = generate(&mut ctx, |s| {
            let d: Point = s.vertices[0] - origin;
            let close: bool = d.x().abs().to_f64() < 30.0 && d.y().abs().to_f64() < 30.0;
            if close {
                keys.push(s.key());
            }
            close
        });

        assert!(n > 1);
        assert_eq!(n, keys.len());
        keys.sort();
        keys.dedup();
        assert_eq!(n, keys.len());
    }
}
