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

//! Module with methods to do computations
//! of the map projection used for plotting.
//!
//! The map uses cylindrical equidistant (plate carrée)
//! projection, stretched to fill the plot area, so
//! longitude and latitude map linearly onto pixels.

use crate::animation::configuration::Domain;
use crate::constants::MIN_GRATICULE_SPACING;
use crate::Float;
use float_cmp::approx_eq;

/// Rectangle (in pixels) of the frame occupied by the map.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct PlotArea {
    pub left: Float,
    pub top: Float,
    pub width: Float,
    pub height: Float,
}

impl PlotArea {
    /// Map area placed in a square frame of given size
    /// with margins for title and axis labels.
    pub fn for_frame(size: u32) -> Self {
        let size = Float::from(size);

        PlotArea {
            left: 0.125 * size,
            top: 0.12 * size,
            width: 0.775 * size,
            height: 0.77 * size,
        }
    }

    pub fn right(&self) -> Float {
        self.left + self.width
    }

    pub fn bottom(&self) -> Float {
        self.top + self.height
    }
}

/// Front-facing struct of the plate carrée projection.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct PlateCarree {
    lon_0: Float,
    lat_0: Float,
    x_scale: Float,
    y_scale: Float,
    area: PlotArea,
}

impl PlateCarree {
    /// Projection of the domain onto the plot area.
    ///
    /// Domain with zero extent along an axis is widened by
    /// half of the fallback graticule spacing on both sides.
    pub fn new(domain: &Domain, area: PlotArea) -> Self {
        let pad = MIN_GRATICULE_SPACING / 2.0;

        let (west, east) = if approx_eq!(Float, domain.lon_span(), 0.0) {
            (domain.lon_min - pad, domain.lon_max + pad)
        } else {
            (domain.lon_min, domain.lon_max)
        };

        let (south, north) = if approx_eq!(Float, domain.lat_span(), 0.0) {
            (domain.lat_min - pad, domain.lat_max + pad)
        } else {
            (domain.lat_min, domain.lat_max)
        };

        PlateCarree {
            lon_0: west,
            lat_0: north,
            x_scale: area.width / (east - west),
            y_scale: area.height / (north - south),
            area,
        }
    }

    pub fn area(&self) -> PlotArea {
        self.area
    }

    /// Function to project geographic coordinates
    /// to pixel coordinates of the frame.
    pub fn project(&self, lon: Float, lat: Float) -> (Float, Float) {
        let x = self.area.left + (lon - self.lon_0) * self.x_scale;
        let y = self.area.top + (self.lat_0 - lat) * self.y_scale;

        (x, y)
    }

    /// Function to inversly project pixel coordinates
    /// of the frame to geographic coordinates.
    pub fn inverse_project(&self, x: Float, y: Float) -> (Float, Float) {
        let lon = self.lon_0 + (x - self.area.left) / self.x_scale;
        let lat = self.lat_0 - (y - self.area.top) / self.y_scale;

        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::{PlateCarree, PlotArea};
    use crate::animation::configuration::Domain;
    use float_cmp::approx_eq;

    #[test]
    fn corners() {
        let area = PlotArea::for_frame(800);
        let proj = PlateCarree::new(&Domain::new(110.8, 158.0, -45.6, -10.5), area);

        let (x, y) = proj.project(110.8, -10.5);
        assert!(approx_eq!(f64, x, 100.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, y, 96.0, epsilon = 1e-9));

        let (x, y) = proj.project(158.0, -45.6);
        assert!(approx_eq!(f64, x, 720.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, y, 712.0, epsilon = 1e-9));
    }

    #[test]
    fn project() {
        let proj = PlateCarree::new(
            &Domain::new(143.0, 149.0, -44.185, -39.55),
            PlotArea::for_frame(640),
        );

        let (lon_0, lat_0) = (147.3257, -42.8821);

        let (x, y) = proj.project(lon_0, lat_0);
        let (lon, lat) = proj.inverse_project(x, y);

        assert!((lon - lon_0).abs() < 0.000001);
        assert!((lat - lat_0).abs() < 0.000001);
    }

    #[test]
    fn zero_span_is_widened() {
        let area = PlotArea::for_frame(800);
        let proj = PlateCarree::new(&Domain::new(147.0, 147.0, -43.0, -42.0), area);

        let (x, _) = proj.project(147.0, -42.5);
        assert!(approx_eq!(f64, x, area.left + area.width / 2.0, epsilon = 1e-9));
        assert!(proj.project(147.25, -42.5).0.is_finite());
    }
}
