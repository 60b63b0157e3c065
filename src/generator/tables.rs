/*
tables.rs

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

//! Transition tables between hexagons and Spectres.
//!
//! For each hexagon type, the expansion diagram is laid out in the plane, with the sub-hexes
//! (or the Spectres) drawn at their place, and the outline of the expanded hexagon traced
//! around them by following the shapes of its six sides.
//! Every drawn edge is recorded as a directed edge, with the tile on its left.
//! Looking up the reverse of an edge then tells what is on the other side of it: either
//! another tile of the same expansion (an internal edge), or a segment of the outline (an
//! external edge).
//!
//! The tables are computed once, on first use, and shared by every context.

use crate::generator::hexagons::{Edge, HEX_CENTRES, HexLabel, SPECTRE_ANGLES};
use crate::generator::point::Point;
use log::{Level, debug, log_enabled};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// What lies on the other side of an edge.
///
/// - When `internal` is `true`, `hi` is the index of a tile in the expansion and `lo` the
///   index of one of its edges.
/// - Otherwise, `hi` is a side of the expanded hexagon and `lo` the index of the segment
///   along that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub internal: bool,
    pub hi: usize,
    pub lo: usize,
}

/// Slice of the `hexin` or `specin` table that covers one side of the expanded hexagon.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MapEdge {
    pub start: usize,
    pub len: usize,
}

impl MapEdge {
    /// Index in the inbound table of the segment `lo` of the side, counted in the reverse
    /// direction.
    pub fn reversed(&self, lo: usize) -> usize {
        assert!(lo < self.len, "segment {lo} beyond side of length {}", self.len);
        self.start + self.len - 1 - lo
    }
}

/// A way a hexagon (or a Spectre) can appear in the expansion of a larger one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Possibility {
    /// Type of the enclosing hexagon.
    pub hi: HexLabel,

    /// Index of the tile within the enclosing hexagon.
    pub lo: usize,

    /// Weight of the choice, which is the limiting frequency of the enclosing hexagon.
    pub prob: u64,
}

/// Transition tables for one hexagon type.
#[derive(Debug, Clone)]
pub struct HexTables {
    /// For each sub-hex edge (`6 * child + side`), what lies across it.
    pub hexmap: Vec<MapEntry>,

    /// Slices of `hexin`, one per side.
    pub hexedges: [MapEdge; 6],

    /// For each outline segment, the sub-hex edge inside it.
    pub hexin: Vec<MapEntry>,

    /// For each Spectre edge (`14 * spectre + edge`), what lies across it.
    pub specmap: Vec<MapEntry>,

    /// Slices of `specin`, one per side.
    pub specedges: [MapEdge; 6],

    /// For each outline segment of the Spectre expansion, what lies inside it.
    pub specin: Vec<MapEntry>,

    /// Places where this hexagon type appears as a sub-hex.
    pub possibilities: Vec<Possibility>,
}

/// All the transition tables.
#[derive(Debug, Clone)]
pub struct Tables {
    hexes: Vec<HexTables>,

    /// Places where a Spectre appears at the lowest level.
    pub possibilities_spectre: Vec<Possibility>,
}

static TABLES: Lazy<Tables> = Lazy::new(Tables::build);

/// Return the shared tables.
pub fn tables() -> &'static Tables {
    &TABLES
}

impl Tables {
    /// Tables for the given hexagon type.
    pub fn hex(&self, label: HexLabel) -> &HexTables {
        &self.hexes[label as usize]
    }

    fn build() -> Self {
        let hexes: Vec<HexTables> = HexLabel::ALL
            .iter()
            .map(|&label| {
                let (hexmap, hexedges, hexin) = lay_out_hexagons(label);
                let (specmap, specedges, specin) = lay_out_spectres(label);
                HexTables {
                    hexmap,
                    hexedges,
                    hexin,
                    specmap,
                    specedges,
                    specin,
                    possibilities: parent_possibilities(label),
                }
            })
            .collect();

        let possibilities_spectre: Vec<Possibility> = HexLabel::ALL
            .iter()
            .flat_map(|&parent| {
                (0..parent.num_spectres()).map(move |lo| Possibility {
                    hi: parent,
                    lo,
                    prob: parent.probability(),
                })
            })
            .collect();

        let tables: Tables = Self {
            hexes,
            possibilities_spectre,
        };
        if log_enabled!(Level::Debug) {
            for label in HexLabel::ALL {
                let t: &HexTables = tables.hex(label);
                debug!(
                    "Tables for {label}: {} hex edges, {} outline segments, {} spectre edges, {} spectre outline segments, {} parents",
                    t.hexmap.len(),
                    t.hexin.len(),
                    t.specmap.len(),
                    t.specin.len(),
                    t.possibilities.len()
                );
            }
        }
        tables
    }
}

/// Directed edge drawn in an expansion diagram.
#[derive(Debug, Copy, Clone)]
struct EdgeData {
    start: Point,
    finish: Point,
    internal: bool,
    hi: usize,
    lo: usize,
}

impl EdgeData {
    fn entry(&self) -> MapEntry {
        MapEntry {
            internal: self.internal,
            hi: self.hi,
            lo: self.lo,
        }
    }
}

/// Edges of an expansion diagram, keyed by their `(start, finish)` points.
#[derive(Default)]
struct EdgeMap {
    edges: BTreeMap<(Point, Point), EdgeData>,
}

impl EdgeMap {
    /// Record the edge. An edge already present at the same place is kept.
    fn insert(&mut self, edge: EdgeData) {
        self.edges.entry((edge.start, edge.finish)).or_insert(edge);
    }

    /// What lies on the other side of the given edge.
    fn reverse(&self, edge: &EdgeData) -> MapEntry {
        match self.edges.get(&(edge.finish, edge.start)) {
            Some(rev) => rev.entry(),
            None => panic!(
                "No edge from {} to {} in the expansion diagram",
                edge.finish, edge.start
            ),
        }
    }

    /// Direction of the first edge leaving `pos` that has nothing on its right side.
    fn exterior_direction(&self, pos: Point) -> Point {
        self.edges
            .range((pos, Point::MIN)..)
            .take_while(|((start, _), _)| *start == pos)
            .find(|((start, finish), _)| !self.edges.contains_key(&(*finish, *start)))
            .map(|((start, finish), _)| *finish - *start)
            .unwrap_or_else(|| panic!("No exterior edge leaves {pos}"))
    }
}

/// Walk the sub-edges of one side of an outline, starting at `pos` in direction `dir`.
///
/// Return the visited points, the starting one included, and leave `dir` as the direction of
/// the last sub-edge.
fn trace_side(pos: Point, dir: &mut Point, edge: Edge, shape: &[i32]) -> Vec<Point> {
    let turns: Vec<i32> = edge.turns(shape);
    let mut points: Vec<Point> = vec![pos];
    let mut p: Point = pos;

    for j in 0..=shape.len() {
        p = p + *dir;
        if let Some(turn) = turns.get(j) {
            *dir = *dir * Point::rot(*turn);
        }
        points.push(p);
    }
    points
}

/// Lay out the sub-hexes of a hexagon, and trace the outline of its expansion.
fn lay_out_hexagons(label: HexLabel) -> (Vec<MapEntry>, [MapEdge; 6], Vec<MapEntry>) {
    let mut edge_map: EdgeMap = EdgeMap::default();
    let mut intmap: Vec<EdgeData> = Vec::with_capacity(6 * label.num_subhexes());
    let mut extmap: Vec<EdgeData> = Vec::new();
    let mut edge_starts: [usize; 7] = [0; 7];

    for (i, (centre, orientation)) in HEX_CENTRES.iter().zip(label.orientations()).enumerate() {
        let mut vrel: Point = Point::new(-2, 0, 4, 0) * Point::rot(2 * *orientation as i32);
        for j in 0..6 {
            let vrel_next: Point = vrel * Point::rot(2);
            let edge: EdgeData = EdgeData {
                start: *centre + vrel,
                finish: *centre + vrel_next,
                internal: true,
                hi: i,
                lo: j,
            };
            edge_map.insert(edge);
            intmap.push(edge);
            vrel = vrel_next;
        }
    }

    let (start, mut dir) = label.hex_outline_start();
    let mut pos: Point = start;
    for (i, edge) in label.edges().iter().enumerate() {
        edge_starts[i] = extmap.len();
        let points: Vec<Point> = trace_side(pos, &mut dir, *edge, edge.kind.hex_shape());
        for (j, pair) in points.windows(2).enumerate() {
            let edge: EdgeData = EdgeData {
                start: pair[0],
                finish: pair[1],
                internal: false,
                hi: i,
                lo: j,
            };
            edge_map.insert(edge);
            extmap.push(edge);
        }
        pos = points[points.len() - 1];

        // Sides of the expanded hexagon meet at a 60 degrees turn
        dir = dir * Point::rot(-2);
    }
    edge_starts[6] = extmap.len();
    assert_eq!(pos, start, "Hexagon outline of {label} does not close");

    let hexmap: Vec<MapEntry> = intmap.iter().map(|e| edge_map.reverse(e)).collect();
    let hexedges: [MapEdge; 6] = std::array::from_fn(|i| MapEdge {
        start: edge_starts[i],
        len: edge_starts[i + 1] - edge_starts[i],
    });
    let hexin: Vec<MapEntry> = extmap.iter().map(|e| edge_map.reverse(e)).collect();
    (hexmap, hexedges, hexin)
}

/// Lay out the Spectres of a hexagon, and trace the outline of its expansion.
///
/// The Spectre expansions are mirror images of the hexagon ones, so the outline is traced
/// clockwise, starting from the last side.
fn lay_out_spectres(label: HexLabel) -> (Vec<MapEntry>, [MapEdge; 6], Vec<MapEntry>) {
    let mut edge_map: EdgeMap = EdgeMap::default();
    let mut intmap: Vec<EdgeData> = Vec::with_capacity(14 * label.num_spectres());
    let mut vertices: Vec<Point> = Vec::with_capacity(14 * label.num_spectres());

    for i in 0..label.num_spectres() {
        let mut pos: Point = Point::ZERO;
        let mut dir: Point = Point::new(2, 0, 0, 2) * Point::rot(5);

        // The second Spectre of G sits at its own place
        if i == 1 {
            pos = Point::new(2, 6, 2, 0);
            dir = dir * Point::rot(1);
        }

        for j in 0..14 {
            let edge: EdgeData = EdgeData {
                start: pos,
                finish: pos + dir,
                internal: true,
                hi: i,
                lo: j,
            };
            edge_map.insert(edge);
            intmap.push(edge);
            vertices.push(pos);

            pos = edge.finish;
            dir = dir * Point::rot(SPECTRE_ANGLES[(j + 1) % 14]);
        }
    }

    let (spectre, vertex) = label.spectre_outline_start();
    let start: Point = vertices[14 * spectre + vertex];
    let mut pos: Point = start;
    let mut dir: Point = Point::ZERO;
    let mut traced: Vec<EdgeData> = Vec::new();
    let mut side_ends: [usize; 7] = [0; 7];
    let edges: [Edge; 6] = label.edges();

    for i in 0..6 {
        let side: usize = 5 - i;
        let edge: Edge = edges[side];

        if label == HexLabel::S && i >= 4 {
            // The spur of S goes out along the previous direction and comes back
            if i == 5 {
                dir = dir * Point::rot(6);
            }
        } else {
            dir = edge_map.exterior_direction(pos);
        }

        let points: Vec<Point> = trace_side(pos, &mut dir, edge, edge.kind.spectre_shape());
        let len: usize = points.len() - 1;
        for (j, pair) in points.windows(2).enumerate() {
            let edge: EdgeData = EdgeData {
                start: pair[1],
                finish: pair[0],
                internal: false,
                hi: side,
                lo: len - 1 - j,
            };
            edge_map.insert(edge);
            traced.push(edge);
        }
        pos = points[len];
        side_ends[i + 1] = traced.len();
    }
    assert_eq!(pos, start, "Spectre outline of {label} does not close");

    let total: usize = traced.len();
    let specmap: Vec<MapEntry> = intmap.iter().map(|e| edge_map.reverse(e)).collect();
    let specedges: [MapEdge; 6] = std::array::from_fn(|side| MapEdge {
        start: total - side_ends[6 - side],
        len: side_ends[6 - side] - side_ends[5 - side],
    });
    let specin: Vec<MapEntry> = traced.iter().rev().map(|e| edge_map.reverse(e)).collect();
    (specmap, specedges, specin)
}

/// List every (parent, index) pair whose sub-hex has the given type.
fn parent_possibilities(label: HexLabel) -> Vec<Possibility> {
    let mut poss: Vec<Possibility> = Vec::new();
    for parent in HexLabel::ALL {
        for (lo, sub) in parent.subhexes().iter().enumerate() {
            if *sub == label {
                poss.push(Possibility {
                    hi: parent,
                    lo,
                    prob: parent.probability(),
                });
            }
        }
    }
    poss
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_edges_are_reciprocal() {
        for label in HexLabel::ALL {
            let t: &HexTables = tables().hex(label);
            assert_eq!(t.hexmap.len(), 6 * label.num_subhexes());

            for (k, m) in t.hexmap.iter().enumerate() {
                let (child, side) = (k / 6, k % 6);
                let back: MapEntry = if m.internal {
                    t.hexmap[6 * m.hi + m.lo]
                } else {
                    t.hexin[t.hexedges[m.hi].start + m.lo]
                };
                assert_eq!(
                    back,
                    MapEntry {
                        internal: true,
                        hi: child,
                        lo: side
                    },
                    "{label}: edge {side} of sub-hex {child}"
                );
            }
        }
    }

    #[test]
    fn spectre_edges_are_reciprocal() {
        for label in HexLabel::ALL {
            let t: &HexTables = tables().hex(label);
            assert_eq!(t.specmap.len(), 14 * label.num_spectres());

            for (k, m) in t.specmap.iter().enumerate() {
                let back: MapEntry = if m.internal {
                    t.specmap[14 * m.hi + m.lo]
                } else {
                    t.specin[t.specedges[m.hi].start + m.lo]
                };
                assert_eq!(
                    back,
                    MapEntry {
                        internal: true,
                        hi: k / 14,
                        lo: k % 14
                    },
                    "{label}: edge {} of Spectre {}",
                    k % 14,
                    k / 14
                );
            }
        }
    }

    #[test]
    fn outline_sides_follow_edge_shapes() {
        for label in HexLabel::ALL {
            let t: &HexTables = tables().hex(label);
            let mut hex_pos: usize = 0;
            for (side, edge) in label.edges().iter().enumerate() {
                assert_eq!(t.hexedges[side].start, hex_pos);
                assert_eq!(t.hexedges[side].len, edge.kind.hex_shape().len() + 1);
                assert_eq!(t.specedges[side].len, edge.kind.spectre_shape().len() + 1);
                hex_pos += t.hexedges[side].len;
            }
            assert_eq!(hex_pos, t.hexin.len());
            let spec_total: usize = t.specedges.iter().map(|e| e.len).sum();
            assert_eq!(spec_total, t.specin.len());
            assert_eq!(t.specedges[0].start, 0);
        }
    }

    #[test]
    fn only_s_has_a_spur() {
        for label in HexLabel::ALL {
            let t: &HexTables = tables().hex(label);
            let external: usize = t.specin.iter().filter(|m| !m.internal).count();
            if label == HexLabel::S {
                assert!(external > 0);
            } else {
                assert_eq!(external, 0, "{label}");
            }
        }
    }

    #[test]
    fn adjacent_subhexes_have_mating_sides() {
        for label in HexLabel::ALL {
            let t: &HexTables = tables().hex(label);
            let subhexes: &[HexLabel] = label.subhexes();
            for (k, m) in t.hexmap.iter().enumerate() {
                if !m.internal {
                    continue;
                }
                let ours: Edge = subhexes[k / 6].edges()[k % 6];
                let theirs: Edge = subhexes[m.hi].edges()[m.lo];
                assert!(ours.mates(theirs), "{label}: sub-hex {} side {}", k / 6, k % 6);
            }
        }
    }

    #[test]
    fn first_subhexes_of_g_are_neighbours() {
        let t: &HexTables = tables().hex(HexLabel::G);
        assert_eq!(
            t.hexmap[2],
            MapEntry {
                internal: true,
                hi: 1,
                lo: 0
            }
        );
    }

    #[test]
    fn possibilities_cover_every_subhex() {
        let total: usize = HexLabel::ALL
            .iter()
            .map(|&l| tables().hex(l).possibilities.len())
            .sum();
        let expected: usize = HexLabel::ALL.iter().map(|l| l.num_subhexes()).sum();
        assert_eq!(total, expected);
        assert_eq!(tables().possibilities_spectre.len(), 10);
        // J only appears in G
        assert_eq!(
            tables().hex(HexLabel::J).possibilities,
            vec![Possibility {
                hi: HexLabel::G,
                lo: 6,
                prob: 10_000_000
            }]
        );
    }
}
