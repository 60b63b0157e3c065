/*
patch.rs

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

//! Patches of Spectres clipped to a window.
//!
//! Window bounds are in the doubled coordinates of [`Point::x`] and [`Point::y`], so that a
//! Spectre edge is two units long.

use crate::config::MAX_WINDOW_SIZE;
use crate::generator::breadth_first;
use crate::generator::context::SpectreContext;
use crate::generator::params::{ParamsError, SpectrePatchParams};
use crate::generator::point::{Coord, Point};
use crate::generator::raster::{self, RasterArea};
use crate::generator::spectre::Spectre;
use log::debug;
use rand::RngCore;
use thiserror::Error;

/// Error returned when a window cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    #[error("The scale must be a positive number, not {0}")]
    InvalidScale(f64),

    #[error("The window must not exceed {} units in each direction", MAX_WINDOW_SIZE)]
    TooLarge,
}

/// Which Spectres belong to the patch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// Every vertex must be inside the window.
    AllVertices,

    /// At least one vertex must be inside the window.
    AnyVertex,
}

/// Rectangle of the plane that a patch covers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PatchWindow {
    pub xmin: i64,
    pub xmax: i64,
    pub ymin: i64,
    pub ymax: i64,
    pub acceptance: Acceptance,

    /// Output offsets. When set, output coordinates are relative to the top left corner of
    /// the window and the y axis points down.
    pub offsets: Option<(i64, i64)>,
}

impl PatchWindow {
    /// Window of `width` by `height` units centred on the origin, for descriptor patches.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is larger than [`MAX_WINDOW_SIZE`].
    pub fn centred(width: u32, height: u32) -> Self {
        assert!(
            width <= MAX_WINDOW_SIZE && height <= MAX_WINDOW_SIZE,
            "Window of {width}x{height} units is too large"
        );
        let xoff: i64 = width as i64 / 2;
        let yoff: i64 = height as i64 / 2;
        Self {
            xmin: -xoff,
            xmax: width as i64 - xoff,
            ymin: yoff - height as i64,
            ymax: yoff,
            acceptance: Acceptance::AllVertices,
            offsets: Some((xoff, yoff)),
        }
    }

    /// Window covering an image of `width` by `height` pixels, with `scale` pixels per
    /// Spectre edge.
    ///
    /// The scale must be a finite positive number, and the window no larger than
    /// [`MAX_WINDOW_SIZE`] units in each direction.
    pub fn from_pixels(width: u32, height: u32, scale: f64) -> Result<Self, WindowError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WindowError::InvalidScale(scale));
        }
        let half_units = |pixels: u32| -> Result<i64, WindowError> {
            let half: f64 = (pixels as f64 / (2.0 * scale)).ceil();
            if 4.0 * half > MAX_WINDOW_SIZE as f64 {
                return Err(WindowError::TooLarge);
            }
            Ok(half as i64)
        };
        let xmax: i64 = half_units(width)?;
        let ymax: i64 = half_units(height)?;
        Ok(Self {
            xmin: -2 * xmax,
            xmax: 2 * xmax,
            ymin: -2 * ymax,
            ymax: 2 * ymax,
            acceptance: Acceptance::AnyVertex,
            offsets: None,
        })
    }

    /// Whether the point is inside the window, borders included.
    pub fn contains(&self, p: Point) -> bool {
        let x: Coord = p.x();
        let y: Coord = p.y();
        x >= Coord::integer(self.xmin)
            && x <= Coord::integer(self.xmax)
            && y >= Coord::integer(self.ymin)
            && y <= Coord::integer(self.ymax)
    }

    /// Whether the Spectre belongs to the patch.
    pub fn accepts(&self, spectre: &Spectre) -> bool {
        match self.acceptance {
            Acceptance::AllVertices => spectre.vertices.iter().all(|v| self.contains(*v)),
            Acceptance::AnyVertex => spectre.vertices.iter().any(|v| self.contains(*v)),
        }
    }

    /// Output coefficients of one point: the rational and √3 parts of x and then of y.
    ///
    /// # Panics
    ///
    /// Panics if a coefficient does not fit in an `i32`. That cannot happen for the points
    /// of a window built with [`PatchWindow::centred`] or [`PatchWindow::from_pixels`].
    pub fn output_point(&self, p: Point) -> [i32; 4] {
        let x: Coord = p.x();
        let y: Coord = p.y();
        let values: [i64; 4] = match self.offsets {
            Some((xoff, yoff)) => [xoff + x.c1, x.cr3, yoff - y.c1, -y.cr3],
            None => [x.c1, x.cr3, y.c1, y.cr3],
        };
        values.map(|v| i32::try_from(v).expect("Output coordinate out of range"))
    }

    /// Coordinates handed to patch callbacks: four integers per vertex.
    pub fn output_coords(&self, spectre: &Spectre) -> [i32; 56] {
        let mut coords: [i32; 56] = [0; 56];
        for (out, v) in coords.chunks_exact_mut(4).zip(spectre.vertices.iter()) {
            out.copy_from_slice(&self.output_point(*v));
        }
        coords
    }

    /// Area for the raster generator.
    pub fn raster_area(&self) -> RasterArea {
        RasterArea {
            xmin: self.xmin,
            xmax: self.xmax,
            ymin: self.ymin,
            ymax: self.ymax,
            margin: match self.acceptance {
                Acceptance::AllVertices => 0,
                Acceptance::AnyVertex => raster::SPECTRE_SPAN,
            },
        }
    }

    /// Deliver the Spectres of the patch to `callback`, in breadth-first order.
    pub fn breadth_first<F>(&self, ctx: &mut SpectreContext, mut callback: F) -> usize
    where
        F: FnMut(&Spectre),
    {
        breadth_first::generate(ctx, |s| {
            let accepted: bool = self.accepts(s);
            if accepted {
                callback(s);
            }
            accepted
        })
    }

    /// Deliver the Spectres of the patch to `callback`, in raster order.
    pub fn raster<F>(&self, ctx: &mut SpectreContext, mut callback: F) -> usize
    where
        F: FnMut(&Spectre),
    {
        let mut count: usize = 0;
        raster::generate(ctx, &self.raster_area(), |s| {
            if self.accepts(s) {
                count += 1;
                callback(s);
            }
            true
        });
        count
    }
}

/// Choose a random patch of `width` by `height` units and return its descriptor.
///
/// The descriptor records every hierarchy decision that generating the patch needed.
pub fn randomise<R: RngCore>(width: u32, height: u32, rng: &mut R) -> SpectrePatchParams {
    let mut ctx: SpectreContext = SpectreContext::new_random(rng);
    let window: PatchWindow = PatchWindow::centred(width, height);
    let n: usize = window.breadth_first(&mut ctx, |_| {});
    let params: SpectrePatchParams = ctx.to_params();
    debug!("Random {width}x{height} patch of {n} Spectres: {params}");
    params
}

/// Generate the `width` by `height` patch of the descriptor, in breadth-first order.
///
/// Return the number of Spectres given to `callback`.
pub fn generate<F>(
    params: &SpectrePatchParams,
    width: u32,
    height: u32,
    mut callback: F,
) -> Result<usize, ParamsError>
where
    F: FnMut(&[i32; 56]),
{
    let mut ctx: SpectreContext = SpectreContext::from_params(params)?;
    let window: PatchWindow = PatchWindow::centred(width, height);
    Ok(window.breadth_first(&mut ctx, |s| callback(&window.output_coords(s))))
}

/// Same as [`generate`], in raster order.
pub fn generate_raster<F>(
    params: &SpectrePatchParams,
    width: u32,
    height: u32,
    mut callback: F,
) -> Result<usize, ParamsError>
where
    F: FnMut(&[i32; 56]),
{
    let mut ctx: SpectreContext = SpectreContext::from_params(params)?;
    let window: PatchWindow = PatchWindow::centred(width, height);
    Ok(window.raster(&mut ctx, |s| callback(&window.output_coords(s))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::context::seeded_rng;
    use crate::generator::spectre::place_vertices;

    #[test]
    fn centred_window_bounds() {
        let window: PatchWindow = PatchWindow::centred(21, 10);
        assert_eq!(
            (window.xmin, window.xmax, window.ymin, window.ymax),
            (-10, 11, -5, 5)
        );
        assert!(window.contains(Point::ZERO));
        assert!(!window.contains(Point::new(6, 0, 0, 0)));
    }

    #[test]
    fn pixel_window_bounds() {
        let window: PatchWindow = PatchWindow::from_pixels(1024, 768, 10.0).unwrap();
        assert_eq!(
            (window.xmin, window.xmax, window.ymin, window.ymax),
            (-104, 104, -78, 78)
        );
        assert_eq!(window.acceptance, Acceptance::AnyVertex);
    }

    #[test]
    fn pixel_window_needs_a_positive_scale() {
        for scale in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                PatchWindow::from_pixels(1024, 768, scale),
                Err(WindowError::InvalidScale(_))
            ));
        }
        assert_eq!(
            PatchWindow::from_pixels(1024, 768, 1e-9),
            Err(WindowError::TooLarge)
        );
        assert!(PatchWindow::from_pixels(u32::MAX, 10, 1e6).is_ok());
    }

    #[test]
    #[should_panic]
    fn centred_window_size_is_limited() {
        PatchWindow::centred(MAX_WINDOW_SIZE + 1, 10);
    }

    #[test]
    fn largest_windows_fit_the_output() {
        let window: PatchWindow = PatchWindow::centred(MAX_WINDOW_SIZE, MAX_WINDOW_SIZE);
        let corner: Point = Point::new(MAX_WINDOW_SIZE as i32 / 4, 0, 0, 0);
        assert!(window.contains(corner));
        assert_eq!(
            window.output_point(corner),
            [MAX_WINDOW_SIZE as i32, 0, MAX_WINDOW_SIZE as i32 / 2, 0]
        );
    }

    #[test]
    #[should_panic(expected = "Output coordinate out of range")]
    fn output_coordinates_are_not_truncated() {
        let window: PatchWindow = PatchWindow::from_pixels(100, 100, 1.0).unwrap();
        window.output_point(Point::new(i32::MAX, 0, 0, 0));
    }

    #[test]
    fn output_coordinates() {
        let spectre: Spectre = Spectre {
            vertices: place_vertices(Point::ZERO, Point::new(1, 0, 0, -1), 0),
            coords: Default::default(),
        };
        let centred: [i32; 56] = PatchWindow::centred(20, 10).output_coords(&spectre);
        assert_eq!(centred[..8], [10, 0, 5, 0, 12, 0, 7, 0]);

        let raw: [i32; 56] = PatchWindow::from_pixels(20, 10, 1.0)
            .unwrap()
            .output_coords(&spectre);
        assert_eq!(raw[..8], [0, 0, 0, 0, 2, 0, -2, 0]);
    }

    #[test]
    fn acceptance_modes() {
        let spectre: Spectre = Spectre {
            vertices: place_vertices(Point::ZERO, Point::new(1, 0, 0, -1), 0),
            coords: Default::default(),
        };
        let mut window: PatchWindow = PatchWindow::centred(4, 4);
        assert!(!window.accepts(&spectre));
        window.acceptance = Acceptance::AnyVertex;
        assert!(window.accepts(&spectre));
    }

    #[test]
    fn randomise_is_deterministic() {
        let a: SpectrePatchParams = randomise(60, 50, &mut seeded_rng("12345"));
        let b: SpectrePatchParams = randomise(60, 50, &mut seeded_rng("12345"));
        assert_eq!(a, b);
        assert_eq!(a.validate(), Ok(()));
    }

    #[test]
    fn generate_rejects_bad_descriptors() {
        let params: SpectrePatchParams = SpectrePatchParams {
            orientation: 0,
            coords: Vec::new(),
            final_hex: 'G',
        };
        assert_eq!(
            generate(&params, 10, 10, |_| {}),
            Err(ParamsError::NoCoordinates)
        );
    }

    #[test]
    fn descriptor_patches_stay_inside_the_window() {
        let params: SpectrePatchParams = randomise(60, 50, &mut seeded_rng("9"));
        let n: usize = generate(&params, 60, 50, |coords| {
            for v in coords.chunks_exact(4) {
                let x: f64 = v[0] as f64 + v[1] as f64 * 3f64.sqrt();
                let y: f64 = v[2] as f64 + v[3] as f64 * 3f64.sqrt();
                assert!((-1e-9..=60.0 + 1e-9).contains(&x));
                assert!((-1e-9..=50.0 + 1e-9).contains(&y));
            }
        })
        .unwrap();
        assert!(n > 0);
    }
}
