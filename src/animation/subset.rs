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

//! Truncation of the wind data to the plotting domain.

use super::configuration::Domain;
use super::dataset::WindDataset;
use crate::errors::InputError;
use crate::Float;
use log::debug;
use ndarray::{Array1, Array3, Axis};

/// Wind components on pressure levels restricted to the domain.
///
/// Coordinate arrays have the same lengths as
/// corresponding axes of the data arrays.
#[derive(Clone, Debug)]
pub struct WindSubset {
    pub lons: Array1<Float>,
    pub lats: Array1<Float>,
    pub pressure: Array1<Float>,
    pub u_wind: Array3<Float>,
    pub v_wind: Array3<Float>,
}

impl WindSubset {
    pub fn levels_count(&self) -> usize {
        self.pressure.len()
    }
}

/// Domain covering all grid points of the coordinates.
pub fn full_extent(lons: &Array1<Float>, lats: &Array1<Float>) -> Domain {
    let (lon_min, lon_max) = min_max(lons);
    let (lat_min, lat_max) = min_max(lats);

    Domain::new(lon_min, lon_max, lat_min, lat_max)
}

/// Indices of coordinates inside the inclusive range.
pub fn mask_indices(coords: &Array1<Float>, min: Float, max: Float) -> Vec<usize> {
    coords
        .iter()
        .enumerate()
        .filter(|(_, &c)| c >= min && c <= max)
        .map(|(i, _)| i)
        .collect()
}

/// Selects grid points of the dataset inside the domain.
pub fn subset_to_domain(dataset: &WindDataset, domain: &Domain) -> Result<WindSubset, InputError> {
    let lon_indices = mask_indices(&dataset.lons, domain.lon_min, domain.lon_max);
    let lat_indices = mask_indices(&dataset.lats, domain.lat_min, domain.lat_max);

    if lon_indices.is_empty() || lat_indices.is_empty() {
        return Err(InputError::EmptySubset);
    }

    debug!(
        "Domain covers {} longitudes and {} latitudes of the input grid",
        lon_indices.len(),
        lat_indices.len()
    );

    let truncate = |field: &Array3<Float>| {
        field
            .select(Axis(1), &lat_indices)
            .select(Axis(2), &lon_indices)
    };

    Ok(WindSubset {
        lons: dataset.lons.select(Axis(0), &lon_indices),
        lats: dataset.lats.select(Axis(0), &lat_indices),
        pressure: dataset.pressure.clone(),
        u_wind: truncate(&dataset.u_wind),
        v_wind: truncate(&dataset.v_wind),
    })
}

fn min_max(values: &Array1<Float>) -> (Float, Float) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold((Float::INFINITY, Float::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{full_extent, mask_indices, subset_to_domain};
    use crate::animation::configuration::Domain;
    use crate::animation::dataset::WindDataset;
    use crate::errors::InputError;
    use float_cmp::approx_eq;
    use ndarray::{Array1, Array3};

    /// Dataset on a regular grid with distinct values at each point.
    pub(crate) fn dataset(levels: usize, n_lat: usize, n_lon: usize) -> WindDataset {
        let lons = Array1::linspace(110.0, 110.0 + 0.5 * (n_lon - 1) as f64, n_lon);
        let lats = Array1::linspace(-10.0, -10.0 - 0.5 * (n_lat - 1) as f64, n_lat);
        let pressure = Array1::linspace(1000.0, 1000.0 - 25.0 * (levels - 1) as f64, levels);

        let u_wind = Array3::from_shape_fn((levels, n_lat, n_lon), |(p, y, x)| {
            (10_000 * p + 100 * y + x) as f64
        });
        let v_wind = u_wind.mapv(|u| -u);

        WindDataset {
            lons,
            lats,
            pressure,
            u_wind,
            v_wind,
        }
    }

    #[test]
    fn mask_is_inclusive() {
        let coords = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(mask_indices(&coords, 2.0, 4.0), vec![1, 2, 3]);
        assert_eq!(mask_indices(&coords, 5.0, 5.0), vec![4]);
        assert!(mask_indices(&coords, 5.5, 6.0).is_empty());
    }

    #[test]
    fn subset_lengths_match_mask_counts() {
        let data = dataset(4, 30, 40);
        let domains = [
            Domain::new(112.0, 120.0, -20.0, -12.0),
            Domain::new(110.0, 129.5, -24.5, -10.0),
            Domain::new(115.5, 115.5, -13.0, -13.0),
            Domain::new(100.0, 200.0, -90.0, 90.0),
        ];

        for domain in &domains {
            let subset = subset_to_domain(&data, domain).unwrap();

            let lon_count = data
                .lons
                .iter()
                .filter(|&&x| x >= domain.lon_min && x <= domain.lon_max)
                .count();
            let lat_count = data
                .lats
                .iter()
                .filter(|&&y| y >= domain.lat_min && y <= domain.lat_max)
                .count();

            assert_eq!(subset.lons.len(), lon_count);
            assert_eq!(subset.lats.len(), lat_count);
            assert_eq!(subset.u_wind.dim(), (4, lat_count, lon_count));
            assert_eq!(subset.v_wind.dim(), (4, lat_count, lon_count));
        }
    }

    #[test]
    fn subset_keeps_coordinates_aligned() {
        let data = dataset(2, 10, 10);
        let domain = Domain::new(111.0, 112.0, -12.0, -11.0);

        let subset = subset_to_domain(&data, &domain).unwrap();

        // lon 111.0 is index 2, lat -11.0 is index 2
        assert!(approx_eq!(f64, subset.lons[0], 111.0));
        assert!(approx_eq!(f64, subset.lats[0], -11.0));
        assert!(approx_eq!(f64, subset.u_wind[[1, 0, 0]], 10_202.0));
        assert!(approx_eq!(f64, subset.v_wind[[1, 2, 2]], -10_404.0));
    }

    #[test]
    fn empty_subset_is_an_error() {
        let data = dataset(2, 10, 10);
        let domain = Domain::new(0.0, 10.0, -12.0, -11.0);

        assert!(matches!(
            subset_to_domain(&data, &domain),
            Err(InputError::EmptySubset)
        ));
    }

    #[test]
    fn full_extent_covers_everything() {
        let data = dataset(1, 5, 8);
        let domain = full_extent(&data.lons, &data.lats);

        assert!(approx_eq!(f64, domain.lon_min, 110.0));
        assert!(approx_eq!(f64, domain.lon_max, 113.5));
        assert!(approx_eq!(f64, domain.lat_min, -12.0));
        assert!(approx_eq!(f64, domain.lat_max, -10.0));

        let subset = subset_to_domain(&data, &domain).unwrap();
        assert_eq!(subset.u_wind.dim(), (1, 5, 8));
    }
}
