/*
Copyright 2021 - 2022 Jakub Lewandowski

This file is part of Pressure-level Wind Animation (PRSWND).

Pressure-level Wind Animation (PRSWND) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Pressure-level Wind Animation (PRSWND) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Pressure-level Wind Animation (PRSWND). If not, see https://www.gnu.org/licenses/.
*/

//! Static background of every frame: shaded topography,
//! land outline, graticule and colour bar.
//!
//! The background does not depend on the pressure level,
//! so it is rasterized once and copied for each frame.

use super::bisection::find_nearest;
use super::colormap::{blues, elevation_color, normalize, BLACK, GRAY, WHITE};
use super::projection::PlateCarree;
use super::text::{degrees_label, trim_number, Anchor, Typeface};
use crate::animation::configuration::{CoastlineResolution, Domain};
use crate::animation::dataset::Topography;
use crate::constants::TOPOGRAPHY_RANGE;
use crate::Float;
use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPool;

/// Position and size of the colour bar as fractions of the frame,
/// `[left, bottom, width, height]` measured from the bottom-left corner.
const COLORBAR_RECT: [Float; 4] = [0.82, 0.12, 0.01, 0.3];

/// Elevation interval (in metres) of colour bar ticks.
const COLORBAR_TICK_STEP: Float = 200.0;

/// Gap (in pixels) between labels and what they describe.
const LABEL_PAD: Float = 4.0;

/// Parallels and meridians drawn within the domain, starting
/// from the whole degree below the minimum with given spacing
/// and ending before the whole degree above the maximum.
pub fn graticule_ticks(min: Float, max: Float, step: Float) -> Vec<Float> {
    let start = min.floor();
    let stop = max.ceil();

    if !(step > 0.0) || stop <= start {
        return vec![];
    }

    let count = ((stop - start) / step).ceil() as usize;

    (0..count).map(|k| start + k as Float * step).collect()
}

/// Everything needed to draw the frame background.
pub struct BaseMap<'a> {
    pub size: u32,
    pub projection: &'a PlateCarree,
    pub domain: &'a Domain,
    pub topography: &'a Topography,
    pub coastline: CoastlineResolution,
    pub typeface: Option<&'a Typeface>,
    pub label_size: Float,
}

impl<'a> BaseMap<'a> {
    pub fn draw(&self, threadpool: &ThreadPool) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(self.size, self.size, WHITE);

        debug!("Rasterizing topography");
        self.draw_topography(&mut image, threadpool);
        self.draw_graticule(&mut image);
        self.draw_border(&mut image);
        self.draw_colorbar(&mut image);

        image
    }

    /// Pixel range `[start, end)` of the plot area along both axes.
    fn pixel_ranges(&self) -> ((u32, u32), (u32, u32)) {
        let area = self.projection.area();
        let clip = |v: Float| (v.round().max(0.0) as u32).min(self.size);

        (
            (clip(area.left), clip(area.right())),
            (clip(area.top), clip(area.bottom())),
        )
    }

    /// Topography shading with the land outline over it.
    ///
    /// Each pixel takes the value of the nearest topography grid cell,
    /// pixels outside of the topography grid stay white.
    fn draw_topography(&self, image: &mut RgbaImage, threadpool: &ThreadPool) {
        let ((x0, x1), (y0, y1)) = self.pixel_ranges();
        let area = self.projection.area();

        let lons = self.topography.lons.to_vec();
        let lats = self.topography.lats.to_vec();
        let elevation = &self.topography.elevation;

        let columns: Vec<Option<usize>> = (x0..x1)
            .map(|x| {
                let (lon, _) = self.projection.inverse_project(Float::from(x) + 0.5, area.top);
                find_nearest(&lons, lon).ok()
            })
            .collect();

        let rows: Vec<Option<usize>> = (y0..y1)
            .map(|y| {
                let (_, lat) = self.projection.inverse_project(area.left, Float::from(y) + 0.5);
                find_nearest(&lats, lat).ok()
            })
            .collect();

        let stride = self.coastline.sampling_stride();
        let is_land = |i: usize, j: usize| elevation[[i - i % stride, j - j % stride]] > 0.0;

        let (colors, land): (Vec<Vec<Rgba<u8>>>, Vec<Vec<Option<bool>>>) = threadpool.install(|| {
            rows.par_iter()
                .map(|row| {
                    let pixels: (Vec<Rgba<u8>>, Vec<Option<bool>>) = columns
                        .iter()
                        .map(|column| match (row, column) {
                            (Some(i), Some(j)) => {
                                (elevation_color(elevation[[*i, *j]]), Some(is_land(*i, *j)))
                            }
                            _ => (WHITE, None),
                        })
                        .unzip();
                    pixels
                })
                .unzip()
        });

        for (dy, row) in colors.iter().enumerate() {
            for (dx, color) in row.iter().enumerate() {
                image.put_pixel(x0 + dx as u32, y0 + dy as u32, *color);
            }
        }

        // outline where land mask changes between neighbouring pixels
        for dy in 0..land.len() {
            for dx in 0..land[dy].len() {
                let here = land[dy][dx];
                let right = land[dy].get(dx + 1).copied().flatten();
                let below = land.get(dy + 1).and_then(|r| r[dx]);

                let edge = match here {
                    Some(h) => right.map_or(false, |r| r != h) || below.map_or(false, |b| b != h),
                    None => false,
                };

                if edge {
                    image.put_pixel(x0 + dx as u32, y0 + dy as u32, BLACK);
                }
            }
        }
    }

    fn draw_graticule(&self, image: &mut RgbaImage) {
        let area = self.projection.area();
        let (dx, dy) = self.domain.graticule_spacing();
        let ((x0, x1), (y0, y1)) = self.pixel_ranges();

        let (west, north) = self.projection.inverse_project(area.left, area.top);
        let (east, south) = self.projection.inverse_project(area.right(), area.bottom());

        for lat in graticule_ticks(self.domain.lat_min, self.domain.lat_max, dy) {
            if lat < south || lat > north {
                continue;
            }

            let (_, y) = self.projection.project(west, lat);
            let row = (y.round() as u32).min(y1.saturating_sub(1));

            for x in (x0..x1).step_by(2) {
                image.put_pixel(x, row, GRAY);
            }

            self.label(
                image,
                &degrees_label(lat, 'N', 'S'),
                Anchor::MiddleRight,
                (area.left - LABEL_PAD, y),
            );
        }

        for lon in graticule_ticks(self.domain.lon_min, self.domain.lon_max, dx) {
            if lon < west || lon > east {
                continue;
            }

            let (x, _) = self.projection.project(lon, north);
            let column = (x.round() as u32).min(x1.saturating_sub(1));

            for y in (y0..y1).step_by(2) {
                image.put_pixel(column, y, GRAY);
            }

            self.label(
                image,
                &degrees_label(lon, 'E', 'W'),
                Anchor::TopCentre,
                (x, area.bottom() + LABEL_PAD),
            );
        }
    }

    fn draw_border(&self, image: &mut RgbaImage) {
        let ((x0, x1), (y0, y1)) = self.pixel_ranges();

        if x1 > x0 && y1 > y0 {
            let rect = Rect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0);
            draw_hollow_rect_mut(image, rect, BLACK);
        }
    }

    /// Vertical colour bar with elevation ticks.
    fn draw_colorbar(&self, image: &mut RgbaImage) {
        let size = Float::from(self.size);
        let [left, bottom, width, height] = COLORBAR_RECT;

        let x0 = (left * size).round() as u32;
        let width = ((width * size).round() as u32).max(1);
        let height = ((height * size).round() as u32).max(1);
        let bottom = (size - bottom * size).round() as u32;
        let top = bottom.saturating_sub(height);

        if x0 + width > self.size || bottom > self.size {
            return;
        }

        for y in top..bottom {
            let t = (Float::from(bottom - y) - 0.5) / Float::from(height);
            let color = blues(t);

            for x in x0..x0 + width {
                image.put_pixel(x, y, color);
            }
        }

        draw_hollow_rect_mut(
            image,
            Rect::at(x0 as i32, top as i32).of_size(width, height),
            BLACK,
        );

        let (min, max) = TOPOGRAPHY_RANGE;
        let right = x0 + width;
        let mut value = min;

        while value <= max {
            let y = Float::from(bottom) - normalize(value) * Float::from(height);
            let row = (y.round() as u32).min(bottom - 1);

            for x in right..(right + 3).min(self.size) {
                image.put_pixel(x, row, BLACK);
            }

            self.label(
                image,
                &trim_number(value),
                Anchor::MiddleLeft,
                (Float::from(right) + 3.0 + LABEL_PAD / 2.0, y),
            );

            value += COLORBAR_TICK_STEP;
        }

        self.label(
            image,
            "Elevation [m]",
            Anchor::BottomCentre,
            (Float::from(x0) + Float::from(width) / 2.0, Float::from(top) - LABEL_PAD),
        );
    }

    fn label(&self, image: &mut RgbaImage, text: &str, anchor: Anchor, position: (Float, Float)) {
        if let Some(typeface) = self.typeface {
            typeface.draw(image, text, self.label_size, anchor, position, BLACK);
        }
    }
}
