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

//! Module responsible for drawing animation frames.
//!
//! The map background (topography, land outline, graticule
//! and colour bar) is drawn once when the renderer is created.
//! Each frame is a copy of it with arrows and title on top.

mod arrows;
mod basemap;
mod bisection;
mod colormap;
mod projection;
mod text;

use self::basemap::BaseMap;
use self::colormap::BLACK;
use self::projection::{PlateCarree, PlotArea};
use self::text::{points_to_pixels, Anchor, Typeface};
use super::configuration::{CoastlineResolution, Domain, Output};
use super::dataset::Topography;
use super::frames::Frame;
use crate::constants::{LABEL_FONT_SIZE, TITLE_FONT_SIZE};
use crate::errors::RenderError;
use crate::Float;
use image::RgbaImage;
use log::debug;
use rayon::ThreadPool;

/// Gap (in pixels) between the title and the map.
const TITLE_PAD: Float = 6.0;

#[derive(Debug)]
pub struct Renderer {
    background: RgbaImage,
    projection: PlateCarree,
    typeface: Option<Typeface>,
    title_size: Float,
}

impl Renderer {
    pub fn new(
        output: &Output,
        coastline: CoastlineResolution,
        domain: &Domain,
        topography: &Topography,
        threadpool: &ThreadPool,
    ) -> Result<Self, RenderError> {
        let size = output.frame_size();
        debug!("Preparing {}x{} px map background", size, size);

        let typeface = Typeface::load(output.font.as_deref())?;
        let projection = PlateCarree::new(domain, PlotArea::for_frame(size));

        let background = BaseMap {
            size,
            projection: &projection,
            domain,
            topography,
            coastline,
            typeface: typeface.as_ref(),
            label_size: points_to_pixels(LABEL_FONT_SIZE, output.dpi),
        }
        .draw(threadpool);

        Ok(Renderer {
            background,
            projection,
            typeface,
            title_size: points_to_pixels(TITLE_FONT_SIZE, output.dpi),
        })
    }

    pub fn render_frame(&self, frame: &Frame) -> RgbaImage {
        debug!("Drawing frame {}", frame.index);
        let mut image = self.background.clone();

        arrows::draw_quiver(&mut image, &self.projection, &frame.quiver);

        if let Some(typeface) = &self.typeface {
            let area = self.projection.area();

            typeface.draw(
                &mut image,
                &frame.title,
                self.title_size,
                Anchor::BottomCentre,
                (area.left + area.width / 2.0, area.top - TITLE_PAD),
                BLACK,
            );
        }

        image
    }
}
