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

//! Module responsible for reading wind and topography
//! from BARRA NetCDF files.
//!
//! Each file is opened only for the duration of the function
//! reading from it and the data is copied into `ndarray` arrays,
//! so no file handles outlive the loading stage.

use super::calendar::{decode_times, find_time_index};
use super::paths::InputPaths;
use crate::constants::FILL_THRESHOLD;
use crate::errors::InputError;
use crate::Float;
use chrono::NaiveDateTime;
use log::debug;
use ndarray::{Array1, Array2, Array3};
use netcdf::{AttributeValue, Variable};
use std::path::Path;

/// Wind components on pressure levels at a single time
/// over the whole input grid.
#[derive(Clone, Debug)]
pub struct WindDataset {
    pub lons: Array1<Float>,
    pub lats: Array1<Float>,
    pub pressure: Array1<Float>,

    /// Zonal wind `[pressure, lat, lon]`.
    pub u_wind: Array3<Float>,

    /// Meridional wind `[pressure, lat, lon]`.
    pub v_wind: Array3<Float>,
}

impl WindDataset {
    /// Checks that coordinates and data arrays have consistent shapes.
    pub fn check_shapes(&self) -> Result<(), InputError> {
        let expected = (self.pressure.len(), self.lats.len(), self.lons.len());

        for (name, field) in [("wnd_ucmp", &self.u_wind), ("wnd_vcmp", &self.v_wind)] {
            if field.dim() != expected {
                return Err(InputError::ShapeMismatch(format!(
                    "{} has shape {:?} but coordinates imply {:?}",
                    name,
                    field.dim(),
                    expected
                )));
            }
        }

        Ok(())
    }
}

/// Surface elevation on its own grid.
#[derive(Clone, Debug)]
pub struct Topography {
    pub lons: Array1<Float>,
    pub lats: Array1<Float>,

    /// Elevation in metres `[lat, lon]`.
    pub elevation: Array2<Float>,
}

/// Reads wind components valid at the target time.
pub fn load_wind(paths: &InputPaths, target: NaiveDateTime) -> Result<WindDataset, InputError> {
    debug!("Reading zonal wind from {}", paths.u_wind.display());
    let (lons, lats, pressure, u_wind) = read_wind_component(&paths.u_wind, "wnd_ucmp", target)?;

    debug!("Reading meridional wind from {}", paths.v_wind.display());
    let (v_lons, v_lats, _, v_wind) = read_wind_component(&paths.v_wind, "wnd_vcmp", target)?;

    if v_lons != lons || v_lats != lats {
        return Err(InputError::ShapeMismatch(
            "zonal and meridional wind are on different grids".to_string(),
        ));
    }

    let dataset = WindDataset {
        lons,
        lats,
        pressure,
        u_wind,
        v_wind,
    };

    dataset.check_shapes()?;

    Ok(dataset)
}

/// Reads surface elevation.
pub fn load_topography(path: &Path) -> Result<Topography, InputError> {
    debug!("Reading topography from {}", path.display());
    let file = open_file(path)?;

    let lons = read_coordinate(&file, "longitude")?;
    let lats = read_coordinate(&file, "latitude")?;

    let var = file
        .variable("topog")
        .ok_or(InputError::MissingVariable("topog"))?;

    // some files keep a singleton time dimension
    let values: Vec<f32> = match var.dimensions().len() {
        2 => var.get_values(..)?,
        3 => var.get_values((0usize, .., ..))?,
        n => {
            return Err(InputError::ShapeMismatch(format!(
                "topog has {} dimensions, expected 2 or 3",
                n
            )))
        }
    };

    let values = unpack_values(&var, &values);
    let elevation = Array2::from_shape_vec((lats.len(), lons.len()), values)
        .map_err(|err| InputError::ShapeMismatch(format!("topog: {}", err)))?;

    Ok(Topography {
        lons,
        lats,
        elevation,
    })
}

type WindComponent = (Array1<Float>, Array1<Float>, Array1<Float>, Array3<Float>);

/// Reads coordinates and one wind component at the time index
/// matching the target.
fn read_wind_component(
    path: &Path,
    name: &'static str,
    target: NaiveDateTime,
) -> Result<WindComponent, InputError> {
    let file = open_file(path)?;

    let lons = read_coordinate(&file, "longitude")?;
    let lats = read_coordinate(&file, "latitude")?;
    let pressure = read_coordinate(&file, "pressure")?;

    let times = read_times(&file)?;
    let time_index = find_time_index(&times, target)?;
    debug!("Found {} at time index {}", target, time_index);

    let var = file.variable(name).ok_or(InputError::MissingVariable(name))?;

    let dims: Vec<usize> = var.dimensions().iter().map(|dim| dim.len()).collect();
    let expected = [times.len(), pressure.len(), lats.len(), lons.len()];

    if dims != expected {
        return Err(InputError::ShapeMismatch(format!(
            "{} has dimensions {:?}, expected {:?}",
            name, dims, expected
        )));
    }

    let values: Vec<f32> = var.get_values((time_index, .., .., ..))?;
    let values = unpack_values(&var, &values);

    let field = Array3::from_shape_vec((pressure.len(), lats.len(), lons.len()), values)
        .map_err(|err| InputError::ShapeMismatch(format!("{}: {}", name, err)))?;

    Ok((lons, lats, pressure, field))
}

fn open_file(path: &Path) -> Result<netcdf::File, InputError> {
    if !path.is_file() {
        return Err(InputError::FileNotFound(path.display().to_string()));
    }

    Ok(netcdf::open(path)?)
}

fn read_coordinate(file: &netcdf::File, name: &'static str) -> Result<Array1<Float>, InputError> {
    let var = file.variable(name).ok_or(InputError::MissingVariable(name))?;
    let values: Vec<f64> = var.get_values(..)?;

    Ok(Array1::from_vec(values))
}

/// Reads the time coordinate and decodes it using its `units` attribute.
fn read_times(file: &netcdf::File) -> Result<Vec<NaiveDateTime>, InputError> {
    let var = file
        .variable("time")
        .ok_or(InputError::MissingVariable("time"))?;

    let units = match var.attribute_value("units") {
        Some(Ok(AttributeValue::Str(units))) => units,
        _ => return Err(InputError::MissingAttribute("units")),
    };

    let values: Vec<f64> = var.get_values(..)?;

    decode_times(&values, &units)
}

/// Replaces fill values with NaN and applies
/// `scale_factor` and `add_offset` if present.
fn unpack_values(var: &Variable, raw: &[f32]) -> Vec<Float> {
    let fill_value = numeric_attribute(var, "_FillValue");
    let missing_value = numeric_attribute(var, "missing_value");
    let scale = numeric_attribute(var, "scale_factor").unwrap_or(1.0);
    let offset = numeric_attribute(var, "add_offset").unwrap_or(0.0);

    raw.iter()
        .map(|&value| {
            let is_fill = |fill: Option<Float>| fill.map_or(false, |f| Float::from(value) == f);

            if !value.is_finite()
                || value.abs() > FILL_THRESHOLD
                || is_fill(fill_value)
                || is_fill(missing_value)
            {
                Float::NAN
            } else {
                Float::from(value) * scale + offset
            }
        })
        .collect()
}

fn numeric_attribute(var: &Variable, name: &str) -> Option<Float> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(value) => Some(value),
        AttributeValue::Float(value) => Some(Float::from(value)),
        AttributeValue::Short(value) => Some(Float::from(value)),
        AttributeValue::Int(value) => Some(Float::from(value)),
        _ => None,
    }
}
