/*
raster.rs

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

//! Raster patch generation.
//!
//! Spectres are produced line by line, from the top of the area to the bottom, and from left
//! to right along each line.
//! Only the Spectres crossed by the current scan line, and the few ones still straddling it
//! from the lines above, are kept in memory.
//!
//! The generator walks along straight lines by stepping across the edges that the line
//! crosses.
//! A vertical line, the spine, runs to the left of the area and leads from one scan line to
//! the next.
//!
//! All positions are four times the doubled coordinates returned by [`Point::x`] and
//! [`Point::y`].
//! Scan lines are at positions congruent to 2 modulo 4, and the spine at an odd position.
//! With that choice, no vertex lies on a scan line or on the spine, and no edge goes through
//! the point where the spine meets a scan line.

use crate::generator::context::SpectreContext;
use crate::generator::point::{Coord, Point};
use crate::generator::spectre::Spectre;
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Distance between two scan lines: one unit.
pub const LINE_STEP: i64 = 8;

/// Width of a Spectre in any direction, rounded up: 2 + √3 edges.
pub const SPECTRE_SPAN: i64 = 40;

/// Rectangle to cover, in doubled coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RasterArea {
    pub xmin: i64,
    pub xmax: i64,
    pub ymin: i64,
    pub ymax: i64,

    /// Distance between the area and the spine, in raster positions. Must be even.
    ///
    /// A zero margin finds the Spectres lying inside the area. A margin of [`SPECTRE_SPAN`]
    /// also finds the Spectres that only have a vertex inside.
    pub margin: i64,
}

/// Exact position along a line: `num / den` with `den > 0`.
#[derive(Debug, Copy, Clone)]
struct Frac {
    num: Coord,
    den: i64,
}

impl Frac {
    fn integer(value: i64) -> Self {
        Self {
            num: Coord::integer(value),
            den: 1,
        }
    }

    /// Build `num / den` for a non-zero `den`, moving the irrational part to the numerator.
    fn new(num: Coord, den: Coord) -> Self {
        let num: Coord = num * den.conjugate();
        let norm: i64 = den.norm();
        if norm < 0 {
            Self {
                num: -num,
                den: -norm,
            }
        } else {
            Self { num, den: norm }
        }
    }
}

impl Ord for Frac {
    fn cmp(&self, other: &Self) -> Ordering {
        self.num.scale(other.den).cmp(&other.num.scale(self.den))
    }
}

impl PartialOrd for Frac {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frac {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frac {}

/// Direction of travel along a line.
///
/// Each direction has its own frame: `u` increases along the direction of travel, and the
/// line is at a constant `v`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Sweep {
    Right,
    Left,
    Up,
    Down,
}

impl Sweep {
    /// Coordinates `(u, v)` of the point in the frame of the direction.
    fn project(self, p: Point) -> (Coord, Coord) {
        let x: Coord = p.x().scale(4);
        let y: Coord = p.y().scale(4);
        match self {
            Sweep::Right => (x, y),
            Sweep::Left => (-x, y),
            Sweep::Up => (y, x),
            Sweep::Down => (-y, x),
        }
    }

    fn reverse(self) -> Self {
        match self {
            Sweep::Right => Sweep::Left,
            Sweep::Left => Sweep::Right,
            Sweep::Up => Sweep::Down,
            Sweep::Down => Sweep::Up,
        }
    }
}

/// Positions where the line `v = line` crosses the edges of the Spectre, with the edge
/// indexes.
fn crossings(spectre: &Spectre, sweep: Sweep, line: i64) -> Vec<(Frac, usize)> {
    let level: Coord = Coord::integer(line);
    let mut result: Vec<(Frac, usize)> = Vec::new();

    for edge in 0..14 {
        let (up, vp) = sweep.project(spectre.vertices[edge]);
        let (uq, vq) = sweep.project(spectre.vertices[(edge + 1) % 14]);
        let side_p: i32 = (vp - level).signum();
        let side_q: i32 = (vq - level).signum();
        debug_assert!(side_p != 0 && side_q != 0, "Vertex on line {line}");
        if side_p == side_q {
            continue;
        }

        let du: Coord = uq - up;
        let dv: Coord = vq - vp;
        let num: Coord = up * dv + (level - vp) * du;
        result.push((Frac::new(num, dv), edge));
    }
    result
}

/// Position where the line enters the Spectre, in the direction of travel.
fn entry(spectre: &Spectre, sweep: Sweep, line: i64) -> Frac {
    crossings(spectre, sweep, line)
        .into_iter()
        .map(|(pos, _)| pos)
        .min()
        .unwrap_or_else(|| panic!("Line {line} misses the Spectre"))
}

/// Walk along the line from position `pos` inside `tile`, up to `target`.
///
/// Every Spectre entered on the way is given to `visit`, which returns `false` to stop the
/// walk. Return the Spectre that contains `target`, or [`None`] if the walk was stopped.
fn walk<F>(
    ctx: &mut SpectreContext,
    mut tile: Spectre,
    sweep: Sweep,
    line: i64,
    mut pos: Frac,
    target: Frac,
    visit: &mut F,
) -> Option<Spectre>
where
    F: FnMut(&Spectre) -> bool,
{
    loop {
        let (exit, edge) = crossings(&tile, sweep, line)
            .into_iter()
            .filter(|(u, _)| *u > pos)
            .min_by(|a, b| a.0.cmp(&b.0))
            .unwrap_or_else(|| panic!("No exit from {} along line {line}", tile.coords));

        if exit > target {
            return Some(tile);
        }
        tile = ctx.adjacent(&tile, edge).0;
        pos = exit;
        if !visit(&tile) {
            return None;
        }
    }
}

/// Move from `tile`, which the line crosses, to the Spectre containing the point at `target`
/// along the line.
fn move_to(
    ctx: &mut SpectreContext,
    tile: Spectre,
    sweep: Sweep,
    line: i64,
    target: i64,
) -> Option<Spectre> {
    let start: Frac = entry(&tile, sweep, line);
    if Frac::integer(target) > start {
        walk(
            ctx,
            tile,
            sweep,
            line,
            start,
            Frac::integer(target),
            &mut |_: &Spectre| true,
        )
    } else {
        let back: Sweep = sweep.reverse();
        let start: Frac = entry(&tile, back, line);
        walk(
            ctx,
            tile,
            back,
            line,
            start,
            Frac::integer(-target),
            &mut |_: &Spectre| true,
        )
    }
}

/// A scan line that crosses the Spectre.
fn straddled_line(spectre: &Spectre) -> i64 {
    let ys: Vec<Coord> = spectre.vertices.iter().map(|v| v.y().scale(4)).collect();
    let low: f64 = ys.iter().map(|y| y.to_f64()).fold(f64::INFINITY, f64::min);
    let high: f64 = ys.iter().map(|y| y.to_f64()).fold(f64::NEG_INFINITY, f64::max);

    (low.ceil() as i64..=high.floor() as i64)
        .filter(|l| l.rem_euclid(4) == 2)
        .find(|&l| {
            let level: Coord = Coord::integer(l);
            ys.iter().any(|y| *y > level) && ys.iter().any(|y| *y < level)
        })
        .unwrap_or_else(|| panic!("No scan line crosses {}", spectre.coords))
}

/// Lowest point of the Spectre.
fn bottom(spectre: &Spectre) -> Coord {
    spectre
        .vertices
        .iter()
        .map(|v| v.y().scale(4))
        .min()
        .unwrap_or(Coord::ZERO)
}

/// Deliver the Spectres crossing the area to `callback`, in raster order.
///
/// Every Spectre is delivered once. The callback returns `false` to stop the generation.
/// Return the number of delivered Spectres.
pub fn generate<F>(ctx: &mut SpectreContext, area: &RasterArea, mut callback: F) -> usize
where
    F: FnMut(&Spectre) -> bool,
{
    let spine: i64 = 4 * area.xmin - area.margin - 1;
    let right_end: i64 = 4 * area.xmax + area.margin + 1;
    let first_line: i64 = 4 * area.ymax + 2;
    let last_line: i64 = 4 * area.ymin - area.margin.min(LINE_STEP);
    debug!("Raster generation over {area:?}: spine at {spine}, lines {first_line} to {last_line}");

    // Reach the top of the spine from the initial Spectre
    let start: Spectre = ctx.initial_spectre();
    let line0: i64 = straddled_line(&start);
    let Some(tile) = move_to(ctx, start, Sweep::Right, line0, spine) else {
        return 0;
    };
    let Some(mut tile) = move_to(ctx, tile, Sweep::Up, spine, first_line) else {
        return 0;
    };

    // Spectres already delivered that may still cross the next lines, with their lowest point
    let mut seen: BTreeMap<(Point, Point), Coord> = BTreeMap::new();
    let mut count: usize = 0;
    let mut line: i64 = first_line;

    while line >= last_line {
        let before: usize = count;
        let mut report = |s: &Spectre| -> bool {
            if seen.contains_key(&s.key()) {
                return true;
            }
            seen.insert(s.key(), bottom(s));
            count += 1;
            callback(s)
        };

        if !report(&tile) {
            return count;
        }
        if walk(
            ctx,
            tile.clone(),
            Sweep::Right,
            line,
            Frac::integer(spine),
            Frac::integer(right_end),
            &mut report,
        )
        .is_none()
        {
            return count;
        }
        trace!("Scan line {line}: {} new Spectres", count - before);

        let next: i64 = line - LINE_STEP;
        let level: Coord = Coord::integer(next);
        seen.retain(|_, low| *low < level);

        let Some(t) = walk(
            ctx,
            tile,
            Sweep::Down,
            spine,
            Frac::integer(-line),
            Frac::integer(-next),
            &mut |_: &Spectre| true,
        ) else {
            return count;
        };
        tile = t;
        line = next;
    }

    debug!(
        "Raster generation: {count} Spectres, prototype height {}",
        ctx.prototype().len()
    );
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::context::seeded_rng;

    #[test]
    fn fractions_compare_exactly() {
        let third: Frac = Frac::new(Coord::integer(1), Coord::integer(3));
        let half: Frac = Frac::new(Coord::integer(-1), Coord::integer(-2));
        assert!(third < half);
        // 1 / (2 - √3) = 2 + √3
        let a: Frac = Frac::new(Coord::integer(1), Coord::new(2, -1));
        assert_eq!(a, Frac::new(Coord::new(2, 1), Coord::integer(1)));
        assert!(a > Frac::integer(3));
        assert!(a < Frac::integer(4));
    }

    #[test]
    fn every_scan_line_crossing_pairs_up() {
        let ctx: SpectreContext = SpectreContext::new_random(&mut seeded_rng("12345"));
        let spectre: Spectre = ctx.initial_spectre();
        let line: i64 = straddled_line(&spectre);
        let right: Vec<(Frac, usize)> = crossings(&spectre, Sweep::Right, line);
        assert!(!right.is_empty());
        assert_eq!(right.len() % 2, 0);

        // Travelling left meets the same edges
        let mut left: Vec<usize> = crossings(&spectre, Sweep::Left, line)
            .iter()
            .map(|c| c.1)
            .collect();
        let mut edges: Vec<usize> = right.iter().map(|c| c.1).collect();
        left.sort();
        edges.sort();
        assert_eq!(left, edges);
    }

    #[test]
    fn raster_delivers_unique_spectres() {
        let mut ctx: SpectreContext = SpectreContext::new_random(&mut seeded_rng("3"));
        let area: RasterArea = RasterArea {
            xmin: -20,
            xmax: 20,
            ymin: -16,
            ymax: 16,
            margin: SPECTRE_SPAN,
        };
        let mut keys: Vec<(Point, Point)> = Vec::new();
        let n: usize = generate(&mut ctx, &area, |s| {
            keys.push(s.key());
            true
        });
        assert!(n > 10);
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), n);
    }

    #[test]
    fn callback_can_stop_the_generation() {
        let mut ctx: SpectreContext = SpectreContext::new_random(&mut seeded_rng("3"));
        let area: RasterArea = RasterArea {
            xmin: -20,
            xmax: 20,
            ymin: -16,
            ymax: 16,
            margin: SPECTRE_SPAN,
        };
        let mut calls: usize = 0;
        let n: usize = generate(&mut ctx, &area, |_| {
            calls += 1;
            calls < 5
        });
        assert_eq!(n, 5);
        assert_eq!(calls, 5);
    }
}
