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

//! Colour scale of the topography shading.

use crate::constants::TOPOGRAPHY_RANGE;
use crate::Float;
use image::Rgba;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Position of elevation on the colour scale, clipped to `[0, 1]`.
pub fn normalize(elevation: Float) -> Float {
    let (min, max) = TOPOGRAPHY_RANGE;
    ((elevation - min) / (max - min)).clamp(0.0, 1.0)
}

/// Colour of sequential blue scale at position `t` in `[0, 1]`.
pub fn blues(t: Float) -> Rgba<u8> {
    let color = colorous::BLUES.eval_continuous(t.clamp(0.0, 1.0));
    Rgba([color.r, color.g, color.b, 255])
}

/// Shading of given elevation, missing data is left white.
pub fn elevation_color(elevation: Float) -> Rgba<u8> {
    if elevation.is_nan() {
        return WHITE;
    }

    blues(normalize(elevation))
}

#[cfg(test)]
mod tests {
    use super::{blues, elevation_color, normalize, WHITE};
    use float_cmp::approx_eq;

    #[test]
    fn clipping() {
        assert!(approx_eq!(f64, normalize(-120.0), 0.0));
        assert!(approx_eq!(f64, normalize(500.0), 0.5));
        assert!(approx_eq!(f64, normalize(2228.0), 1.0));

        assert_eq!(elevation_color(5000.0), blues(1.0));
        assert_eq!(elevation_color(-5.0), blues(0.0));
    }

    #[test]
    fn scale_darkens_with_height() {
        let low = blues(0.0);
        let high = blues(1.0);

        let brightness = |c: image::Rgba<u8>| c.0[..3].iter().map(|&v| u32::from(v)).sum::<u32>();
        assert!(brightness(high) < brightness(low));
        assert_eq!(elevation_color(f64::NAN), WHITE);
    }
}
