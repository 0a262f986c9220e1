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

//! Module containing constants used by the program.

use crate::Float;

/// Number of arrows (approximately) drawn along the longer domain axis.
pub const DECIMATION_FACTOR: usize = 20;

/// Delay between animation frames in milliseconds.
pub const FRAME_DELAY_MS: u32 = 400;

/// Fallback spacing (in degrees) of parallels and meridians
/// used when the domain has zero extent along an axis.
pub const MIN_GRATICULE_SPACING: Float = 0.5;

/// Number of meridian intervals across the domain.
pub const MERIDIAN_DIVISIONS: Float = 8.0;

/// Number of parallel intervals across the domain.
pub const PARALLEL_DIVISIONS: Float = 10.0;

/// Elevation (in metres) range to which topography shading is clipped.
pub const TOPOGRAPHY_RANGE: (Float, Float) = (0.0, 1000.0);

/// Format of the timestamp embedded in input file names.
pub const FILE_TIME_FORMAT: &str = "%Y%m%dT%H%MZ";

/// Format of the timestamp embedded in the output file name.
pub const OUTPUT_TIME_FORMAT: &str = "%Y%m%d%H";

/// Values with greater magnitude are treated as missing data.
pub const FILL_THRESHOLD: f32 = 1.0e30;

/// Smallest and largest side (in pixels) of an animation frame.
pub const FRAME_SIZE_LIMITS: (u32, u32) = (32, 8192);

/// Title font size (in points) of each frame.
pub const TITLE_FONT_SIZE: Float = 14.0;

/// Font size (in points) of graticule and colour bar labels.
pub const LABEL_FONT_SIZE: Float = 10.0;

/// Fonts tried when no font is set in configuration.
pub const SYSTEM_FONTS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];
