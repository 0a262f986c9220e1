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

//! Drawing of the wind arrows.

use super::colormap::BLACK;
use super::projection::PlateCarree;
use crate::animation::frames::Quiver;
use crate::Float;
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

/// Longest arrow head in pixels.
const MAX_HEAD_LENGTH: Float = 9.0;

/// Arrows shorter than that (in pixels) are not drawn.
const MIN_ARROW_LENGTH: Float = 1.0;

/// Pixel displacement of the arrow tip from its tail.
///
/// Eastward wind points right, northward wind points up.
pub fn arrow_vector(u: Float, v: Float, scale: Float, plot_width: Float) -> (Float, Float) {
    let factor = plot_width / scale;
    (u * factor, -v * factor)
}

/// Draws all arrows of the quiver, tails anchored at grid points.
///
/// Arrows are drawn on a separate layer covering the plot area,
/// so parts reaching outside of the map are clipped.
pub fn draw_quiver(image: &mut RgbaImage, projection: &PlateCarree, quiver: &Quiver) {
    let area = projection.area();
    let (left, top) = (area.left.round(), area.top.round());

    let mut layer = RgbaImage::new(area.width.round() as u32, area.height.round() as u32);
    let sample = &quiver.sample;

    for (i, &lat) in sample.lats.iter().enumerate() {
        for (j, &lon) in sample.lons.iter().enumerate() {
            let (u, v) = (sample.u_wind[[i, j]], sample.v_wind[[i, j]]);

            if !u.is_finite() || !v.is_finite() {
                continue;
            }

            let (x, y) = projection.project(lon, lat);
            let (dx, dy) = arrow_vector(u, v, quiver.scale, area.width);

            draw_arrow(&mut layer, (x - left, y - top), (dx, dy), BLACK);
        }
    }

    imageops::overlay(image, &layer, left as i64, top as i64);
}

fn draw_arrow(image: &mut RgbaImage, tail: (Float, Float), vector: (Float, Float), color: Rgba<u8>) {
    let length = vector.0.hypot(vector.1);

    if length < MIN_ARROW_LENGTH {
        return;
    }

    let tip = (tail.0 + vector.0, tail.1 + vector.1);
    draw_line_segment_mut(
        image,
        (tail.0 as f32, tail.1 as f32),
        (tip.0 as f32, tip.1 as f32),
        color,
    );

    let head_length = (0.4 * length).min(MAX_HEAD_LENGTH);

    if head_length < 2.0 {
        return;
    }

    let (ux, uy) = (vector.0 / length, vector.1 / length);
    let half_width = 0.35 * head_length;
    let base = (tip.0 - ux * head_length, tip.1 - uy * head_length);

    let corner = |sign: Float| {
        Point::new(
            (base.0 - sign * uy * half_width).round() as i32,
            (base.1 + sign * ux * half_width).round() as i32,
        )
    };

    let head = [
        Point::new(tip.0.round() as i32, tip.1.round() as i32),
        corner(1.0),
        corner(-1.0),
    ];

    if head[0] != head[2] && head[1] != head[2] {
        draw_polygon_mut(image, &head, color);
    }
}
