/*
point.rs

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

//! Exact coordinates in the plane.
//!
//! A [`Point`] is an integer linear combination of `{1, d, d², d³}` where `d` is the complex
//! number `exp(iπ/6)`, that is one twelfth of a turn about the origin.
//! Every vertex of the tiling has such coordinates, so placing, rotating, and comparing tiles
//! never needs floating point.
//!
//! Projecting a [`Point`] on the x or y axis gives a [`Coord`], a real number of the form
//! `c1 + cr3·√3`.
//! The projection doubles the real value, so that the coefficients stay integers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Point of the plane, as the coefficients of `1`, `d`, `d²`, and `d³`.
///
/// The derived ordering compares the coefficients lexicographically.
/// It has no geometric meaning, but it is total and cheap, which is all the edge maps and the
/// set of placed Spectres need.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Point {
    pub coeffs: [i32; 4],
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point::new(0, 0, 0, 0);

    /// Smallest point for the lexicographic ordering. Used as a lower bound in range queries.
    pub const MIN: Point = Point::new(i32::MIN, i32::MIN, i32::MIN, i32::MIN);

    /// Create the point `a + b·d + c·d² + e·d³`.
    pub const fn new(a: i32, b: i32, c: i32, e: i32) -> Self {
        Self {
            coeffs: [a, b, c, e],
        }
    }

    /// Multiply by `d`.
    ///
    /// Uses `d⁴ = d² - 1`, from the minimal polynomial of the 12th roots of unity.
    pub fn mul_by_zeta(self) -> Self {
        let [a, b, c, e] = self.coeffs;
        Self::new(-e, a, b + e, c)
    }

    /// Return `d^steps`, a rotation of `steps` twelfths of a turn anticlockwise.
    pub fn rot(steps: i32) -> Self {
        let mut s: i32 = steps.rem_euclid(12);
        let mut result: Point = Point::new(1, 0, 0, 0);
        let mut power: Point = Point::new(0, 1, 0, 0);

        loop {
            if s & 1 != 0 {
                result = result * power;
            }
            s >>= 1;
            if s == 0 {
                break;
            }
            power = power * power;
        }
        result
    }

    /// Twice the x coordinate of the point.
    pub fn x(self) -> Coord {
        let [a, b, c, _] = self.coeffs;
        Coord::new(2 * a as i64 + c as i64, b as i64)
    }

    /// Twice the y coordinate of the point.
    pub fn y(self) -> Coord {
        let [_, b, c, e] = self.coeffs;
        Coord::new(2 * e as i64 + b as i64, c as i64)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        let mut r: Point = self;
        for (c, o) in r.coeffs.iter_mut().zip(other.coeffs) {
            *c += o;
        }
        r
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        let mut r: Point = self;
        for (c, o) in r.coeffs.iter_mut().zip(other.coeffs) {
            *c -= o;
        }
        r
    }
}

impl Mul for Point {
    type Output = Point;

    /// Complex multiplication, by Horner's rule over the coefficients of `other`.
    fn mul(self, other: Point) -> Point {
        let scaled = |k: i32| Point {
            coeffs: self.coeffs.map(|c| c * k),
        };

        let mut r: Point = scaled(other.coeffs[3]);
        for i in (0..3).rev() {
            r = r.mul_by_zeta() + scaled(other.coeffs[i]);
        }
        r
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, e] = self.coeffs;
        write!(f, "({a},{b},{c},{e})")
    }
}

/// Real number `c1 + cr3·√3`.
///
/// Because `√3` is irrational, two different coefficient pairs always denote two different
/// reals, so the ordering below is total and agrees with equality.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Coefficient of 1.
    pub c1: i64,

    /// Coefficient of √3.
    pub cr3: i64,
}

impl Coord {
    pub const ZERO: Coord = Coord::new(0, 0);

    pub const fn new(c1: i64, cr3: i64) -> Self {
        Self { c1, cr3 }
    }

    /// An integer.
    pub const fn integer(c1: i64) -> Self {
        Self { c1, cr3: 0 }
    }

    /// Sign of the real number: -1, 0, or 1.
    ///
    /// When the two coefficients disagree, the one with the larger magnitude wins, which is
    /// decided by comparing `c1²` with `3·cr3²`.
    pub fn signum(self) -> i32 {
        if self.c1 == 0 && self.cr3 == 0 {
            return 0;
        }
        if self.c1 >= 0 && self.cr3 >= 0 {
            return 1;
        }
        if self.c1 <= 0 && self.cr3 <= 0 {
            return -1;
        }

        let square: i128 = self.c1 as i128 * self.c1 as i128;
        let root3_square: i128 = 3 * self.cr3 as i128 * self.cr3 as i128;
        if square > root3_square {
            self.c1.signum() as i32
        } else {
            self.cr3.signum() as i32
        }
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        if self.signum() < 0 { -self } else { self }
    }

    /// Multiply by an integer.
    pub fn scale(self, k: i64) -> Self {
        Self::new(self.c1 * k, self.cr3 * k)
    }

    /// Algebraic conjugate `c1 - cr3·√3`.
    pub fn conjugate(self) -> Self {
        Self::new(self.c1, -self.cr3)
    }

    /// Product with the conjugate, `c1² - 3·cr3²`. Never zero for a non-zero value.
    pub fn norm(self) -> i64 {
        self.c1 * self.c1 - 3 * self.cr3 * self.cr3
    }

    /// Approximate value, for display and for picking integer candidates.
    pub fn to_f64(self) -> f64 {
        self.c1 as f64 + self.cr3 as f64 * 3f64.sqrt()
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord::new(self.c1 + other.c1, self.cr3 + other.cr3)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, other: Coord) -> Coord {
        Coord::new(self.c1 - other.c1, self.cr3 - other.cr3)
    }
}

impl Mul for Coord {
    type Output = Coord;

    fn mul(self, other: Coord) -> Coord {
        Coord::new(
            self.c1 * other.c1 + 3 * self.cr3 * other.cr3,
            self.c1 * other.cr3 + self.cr3 * other.c1,
        )
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.c1, -self.cr3)
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self - *other).signum().cmp(&0)
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{:+}√3", self.c1, self.cr3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_steps_make_a_full_turn() {
        let one: Point = Point::new(1, 0, 0, 0);
        let mut p: Point = one;
        for _ in 0..12 {
            p = p * Point::rot(1);
        }
        assert_eq!(p, one);
        assert_eq!(Point::rot(12), one);
        assert_eq!(Point::rot(-1), Point::rot(11));
        assert_eq!(Point::rot(6), Point::new(-1, 0, 0, 0));
    }

    #[test]
    fn multiplying_by_zeta_is_a_one_step_rotation() {
        let p: Point = Point::new(3, -1, 4, 2);
        assert_eq!(p.mul_by_zeta(), p * Point::rot(1));
        assert_eq!(p * Point::rot(3) * Point::rot(3), p * Point::rot(6));
    }

    #[test]
    fn projections_of_the_unit_rotations() {
        // d = cos 30° + i sin 30°, doubled: (√3, 1)
        assert_eq!(Point::rot(1).x(), Coord::new(0, 1));
        assert_eq!(Point::rot(1).y(), Coord::new(1, 0));
        // d³ = i
        assert_eq!(Point::rot(3).x(), Coord::ZERO);
        assert_eq!(Point::rot(3).y(), Coord::integer(2));
        // d² = 1/2 + i√3/2
        assert_eq!(Point::rot(2).x(), Coord::integer(1));
        assert_eq!(Point::rot(2).y(), Coord::new(0, 1));
    }

    #[test]
    fn coord_sign_with_mixed_coefficients() {
        assert_eq!(Coord::new(2, -1).signum(), 1);
        assert_eq!(Coord::new(1, -1).signum(), -1);
        assert_eq!(Coord::new(-2, 1).signum(), -1);
        assert_eq!(Coord::new(-1, 1).signum(), 1);
        assert_eq!(Coord::ZERO.signum(), 0);
        // 7 - 4√3 is a small positive number
        assert_eq!(Coord::new(7, -4).abs(), Coord::new(7, -4));
        assert_eq!(Coord::new(-7, 4).abs(), Coord::new(7, -4));
    }

    #[test]
    fn coord_ordering_matches_real_values() {
        let mut values: Vec<Coord> = vec![
            Coord::new(0, 1),
            Coord::integer(2),
            Coord::new(5, -2),
            Coord::integer(-1),
            Coord::new(-3, 2),
        ];
        values.sort();
        let approx: Vec<f64> = values.iter().map(|c| c.to_f64()).collect();
        for pair in approx.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn coord_arithmetic() {
        let a: Coord = Coord::new(1, 1);
        let b: Coord = Coord::new(1, -1);
        assert_eq!(a * b, Coord::integer(-2));
        assert_eq!(a.norm(), -2);
        assert_eq!(a * a.conjugate(), Coord::integer(a.norm()));
        assert_eq!(a + b, Coord::integer(2));
        assert_eq!(a - b, Coord::new(0, 2));
    }
}
