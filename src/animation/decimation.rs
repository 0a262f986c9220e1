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

//! Thinning of the wind field for legible arrow plots.

use super::subset::WindSubset;
use crate::constants::DECIMATION_FACTOR;
use crate::errors::InputError;
use crate::Float;
use ndarray::{s, Array1, Array2};

/// Decimated wind field of a single pressure level.
#[derive(Clone, Debug)]
pub struct LevelSample {
    pub lons: Array1<Float>,
    pub lats: Array1<Float>,
    pub pressure: Float,

    /// Zonal wind `[lat, lon]`.
    pub u_wind: Array2<Float>,

    /// Meridional wind `[lat, lon]`.
    pub v_wind: Array2<Float>,
}

/// Sampling interval along both axes, chosen so that roughly
/// `DECIMATION_FACTOR` arrows are drawn along the longer axis.
///
/// Never smaller than 1, so domains with fewer grid points
/// than the factor are drawn at full resolution.
pub fn stride(n_lat: usize, n_lon: usize) -> usize {
    (n_lat.max(n_lon) / DECIMATION_FACTOR).max(1)
}

/// Returns coordinates, pressure and wind components
/// of the pressure level with given index, sampled
/// at the same stride along latitude and longitude.
pub fn get_uv(subset: &WindSubset, level: usize) -> Result<LevelSample, InputError> {
    if level >= subset.levels_count() {
        return Err(InputError::LevelOutOfRange(level));
    }

    let (_, n_lat, n_lon) = subset.u_wind.dim();
    let step = stride(n_lat, n_lon) as isize;

    let sample = LevelSample {
        lons: subset.lons.slice(s![..;step]).to_owned(),
        lats: subset.lats.slice(s![..;step]).to_owned(),
        pressure: subset.pressure[level],
        u_wind: subset.u_wind.slice(s![level, ..;step, ..;step]).to_owned(),
        v_wind: subset.v_wind.slice(s![level, ..;step, ..;step]).to_owned(),
    };

    let expected = (sample.lats.len(), sample.lons.len());

    if sample.u_wind.dim() != expected || sample.v_wind.dim() != expected {
        return Err(InputError::ShapeMismatch(format!(
            "decimated wind has shape {:?} and {:?} but coordinates {:?}",
            sample.u_wind.dim(),
            sample.v_wind.dim(),
            expected
        )));
    }

    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::{get_uv, stride};
    use crate::animation::configuration::Domain;
    use crate::animation::subset::{subset_to_domain, tests::dataset, WindSubset};
    use crate::errors::InputError;
    use float_cmp::approx_eq;
    use ndarray::Array1;

    fn whole(levels: usize, n_lat: usize, n_lon: usize) -> WindSubset {
        let data = dataset(levels, n_lat, n_lon);
        subset_to_domain(&data, &Domain::new(-180.0, 360.0, -90.0, 90.0)).unwrap()
    }

    #[test]
    fn stride_is_never_zero() {
        assert_eq!(stride(1, 1), 1);
        assert_eq!(stride(19, 5), 1);
        assert_eq!(stride(20, 5), 1);
        assert_eq!(stride(39, 40), 2);
        assert_eq!(stride(432, 768), 38);
    }

    #[test]
    fn small_subset_is_not_thinned() {
        let subset = whole(3, 7, 12);

        for level in 0..3 {
            let sample = get_uv(&subset, level).unwrap();

            assert_eq!(sample.lons.len(), 12);
            assert_eq!(sample.lats.len(), 7);
            assert_eq!(sample.u_wind.dim(), (7, 12));
        }
    }

    #[test]
    fn shapes_match_coordinates_for_every_level() {
        for &(n_lat, n_lon) in &[(45, 61), (61, 45), (20, 20), (1, 100), (100, 1)] {
            let subset = whole(5, n_lat, n_lon);

            for level in 0..subset.levels_count() {
                let sample = get_uv(&subset, level).unwrap();

                assert!(sample.lons.len() > 0 && sample.lats.len() > 0);
                assert_eq!(sample.u_wind.dim(), (sample.lats.len(), sample.lons.len()));
                assert_eq!(sample.v_wind.dim(), (sample.lats.len(), sample.lons.len()));
            }
        }
    }

    #[test]
    fn sampling_follows_stride() {
        // stride 3 for 61 points
        let subset = whole(2, 45, 61);
        let sample = get_uv(&subset, 1).unwrap();

        assert_eq!(sample.lons.len(), 21);
        assert_eq!(sample.lats.len(), 15);
        assert!(approx_eq!(f64, sample.lons[1], subset.lons[3]));
        assert!(approx_eq!(f64, sample.lats[2], subset.lats[6]));
        assert!(approx_eq!(f64, sample.u_wind[[2, 1]], 10_603.0));
        assert!(approx_eq!(f64, sample.v_wind[[2, 1]], -10_603.0));
        assert!(approx_eq!(f64, sample.pressure, 975.0));
    }

    #[test]
    fn level_out_of_range() {
        let subset = whole(2, 5, 5);

        assert!(matches!(
            get_uv(&subset, 2),
            Err(InputError::LevelOutOfRange(2))
        ));
    }

    #[test]
    fn inconsistent_subset_is_rejected() {
        let mut subset = whole(1, 5, 5);
        subset.lons = Array1::linspace(0.0, 1.0, 4);

        assert!(matches!(
            get_uv(&subset, 0),
            Err(InputError::ShapeMismatch(_))
        ));
    }
}
