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

//! Text drawing for titles and labels.

use crate::constants::SYSTEM_FONTS;
use crate::errors::RenderError;
use crate::Float;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, warn};
use rusttype::{Font, Scale};
use std::{fs, path::Path};

/// Point of the text box placed at the given pixel.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Anchor {
    TopCentre,
    BottomCentre,
    MiddleLeft,
    MiddleRight,
}

/// Loaded TrueType font.
pub struct Typeface {
    font: Font<'static>,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface").finish_non_exhaustive()
    }
}

impl Typeface {
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let data = fs::read(path)?;
        let font = Font::try_from_vec(data).ok_or(RenderError::InvalidFont)?;

        Ok(Typeface { font })
    }

    /// Loads the configured font or the first available system font.
    ///
    /// A configured font must load. Without configuration
    /// `None` is returned when no system font is found,
    /// and frames are drawn without text.
    pub fn load(configured: Option<&Path>) -> Result<Option<Self>, RenderError> {
        if let Some(path) = configured {
            debug!("Loading font from {}", path.display());
            return Typeface::from_file(path).map(Some);
        }

        for candidate in SYSTEM_FONTS.iter().map(Path::new) {
            if candidate.is_file() {
                if let Ok(typeface) = Typeface::from_file(candidate) {
                    debug!("Using system font {}", candidate.display());
                    return Ok(Some(typeface));
                }
            }
        }

        warn!("No font found, frames will be drawn without title and labels");
        Ok(None)
    }

    /// Draws text of given pixel height with the anchor at `(x, y)`.
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        size: Float,
        anchor: Anchor,
        position: (Float, Float),
        color: Rgba<u8>,
    ) {
        let scale = Scale::uniform(size as f32);
        let (width, height) = text_size(scale, &self.font, text);
        let (x, y) = (position.0.round() as i32, position.1.round() as i32);

        let (left, top) = match anchor {
            Anchor::TopCentre => (x - width / 2, y),
            Anchor::BottomCentre => (x - width / 2, y - height),
            Anchor::MiddleLeft => (x, y - height / 2),
            Anchor::MiddleRight => (x - width, y - height / 2),
        };

        draw_text_mut(image, color, left, top, scale, &self.font, text);
    }
}

/// Converts font size in points to pixels.
pub fn points_to_pixels(points: Float, dpi: u32) -> Float {
    points * Float::from(dpi) / 72.0
}

/// Formats graticule label with hemisphere letter.
pub fn degrees_label(value: Float, positive: char, negative: char) -> String {
    let magnitude = trim_number(value.abs());

    if magnitude == "0" {
        "0°".to_string()
    } else if value > 0.0 {
        format!("{}°{}", magnitude, positive)
    } else {
        format!("{}°{}", magnitude, negative)
    }
}

/// Number with at most two decimals and no trailing zeros.
pub fn trim_number(value: Float) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');

    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
