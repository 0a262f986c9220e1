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

//! Module responsible for parsing and checking the configuration file.
//!
//! To provide meaningful error messages the configuration file uses
//! [YAML](https://en.wikipedia.org/wiki/YAML) and `serde` to enforce
//! strong typing and automatic type checking.
//!
//! The structures and their fields in this module directly correspond to
//! the fields inside `config.yaml` so you can check this documentation
//! for more details how to set the config file.

use crate::constants::{
    FRAME_SIZE_LIMITS, MERIDIAN_DIVISIONS, MIN_GRATICULE_SPACING, PARALLEL_DIVISIONS,
};
use crate::errors::ConfigError;
use crate::Float;
use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use std::{
    convert::TryFrom,
    fmt, fs,
    path::{Path, PathBuf},
};

/// Reanalysis models for which input files can be located.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize)]
#[serde(try_from = "String")]
pub enum Model {
    /// BARRA-R, the regional reanalysis over Australia (12 km).
    BarraR,

    /// BARRA-TA, the Tasmanian downscaling (1.5 km).
    BarraTa,
}

impl Model {
    pub fn name(self) -> &'static str {
        match self {
            Model::BarraR => "BARRA_R",
            Model::BarraTa => "BARRA_TA",
        }
    }

    /// Plotting domain used when the configuration does not set one.
    pub fn default_domain(self) -> Domain {
        match self {
            Model::BarraR => Domain::new(110.8, 158.0, -45.6, -10.5),
            Model::BarraTa => Domain::new(143.0, 149.0, -44.185, -39.55),
        }
    }

    /// Level of coastline detail suitable for the model resolution.
    pub fn coastline_resolution(self) -> CoastlineResolution {
        match self {
            Model::BarraR => CoastlineResolution::Crude,
            Model::BarraTa => CoastlineResolution::Full,
        }
    }

    /// Location of the model sample data on the NCI filesystem.
    pub fn default_data_dir(self) -> PathBuf {
        PathBuf::from(format!("/g/data/ma05/sample/{}/v1", self.name()))
    }
}

impl TryFrom<String> for Model {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        match name.as_str() {
            "BARRA_R" => Ok(Model::BarraR),
            "BARRA_TA" => Ok(Model::BarraTa),
            _ => Err(ConfigError::UnknownModel(name)),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detail of the land/sea outline drawn from topography.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CoastlineResolution {
    Crude,
    Full,
}

impl CoastlineResolution {
    /// Stride (in topography grid cells) at which the land mask is sampled.
    pub fn sampling_stride(self) -> usize {
        match self {
            CoastlineResolution::Crude => 4,
            CoastlineResolution::Full => 1,
        }
    }
}

/// Rectangular longitude-latitude box (in degrees)
/// to which data and map are restricted.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Domain {
    pub lon_min: Float,
    pub lon_max: Float,
    pub lat_min: Float,
    pub lat_max: Float,
}

impl Domain {
    pub fn new(lon_min: Float, lon_max: Float, lat_min: Float, lat_max: Float) -> Self {
        Domain {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Checks if domain specification follows conventions
    /// and limits.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.lat_min) || !(-90.0..=90.0).contains(&self.lat_max) {
            return Err(ConfigError::OutOfBounds(
                "Domain latitude is too low or too high",
            ));
        }

        if !(-180.0..=360.0).contains(&self.lon_min) || !(-180.0..=360.0).contains(&self.lon_max)
        {
            return Err(ConfigError::OutOfBounds(
                "Domain longitude is too low or too high",
            ));
        }

        if self.lon_min > self.lon_max || self.lat_min > self.lat_max {
            return Err(ConfigError::OutOfBounds(
                "Domain minimum cannot be greater than maximum",
            ));
        }

        Ok(())
    }

    pub fn lon_span(&self) -> Float {
        self.lon_max - self.lon_min
    }

    pub fn lat_span(&self) -> Float {
        self.lat_max - self.lat_min
    }

    /// Spacing of meridians and parallels (in degrees) respectively.
    ///
    /// Domain with zero extent along an axis gets the fallback spacing
    /// for that axis.
    pub fn graticule_spacing(&self) -> (Float, Float) {
        let mut dx = self.lon_span() / MERIDIAN_DIVISIONS;
        let mut dy = self.lat_span() / PARALLEL_DIVISIONS;

        if dx == 0.0 {
            dx = MIN_GRATICULE_SPACING;
        }

        if dy == 0.0 {
            dy = MIN_GRATICULE_SPACING;
        }

        (dx, dy)
    }
}

/// Way of selecting the plotting domain.
///
/// In `config.yaml` it is either `model_default`, `full_extent`
/// or a `bounds` map with `lon_min`, `lon_max`, `lat_min` and `lat_max`.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainChoice {
    /// Domain predefined for the model.
    ModelDefault,

    /// Whole extent of the input grid.
    FullExtent,

    /// Domain set explicitly.
    Bounds(Domain),
}

impl Default for DomainChoice {
    fn default() -> Self {
        DomainChoice::ModelDefault
    }
}

/// Fields with information about time of the plotted data.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct DateTime {
    /// Validity time of the plotted wind field.
    pub target: NaiveDateTime,

    /// Forecast lead time (in hours) of the data,
    /// used to find the model run (base time).
    pub lead_hours: u32,
}

impl DateTime {
    /// Initialisation time of the model run
    /// which produced the data valid at the target time.
    pub fn base_time(&self) -> NaiveDateTime {
        self.target - Duration::hours(i64::from(self.lead_hours))
    }
}

/// _(Optional)_ Fields with information about model input data.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
pub struct Input {
    /// _(Optional)_ Root directory of the model data.
    ///
    /// Defaults to `/g/data/ma05/sample/<MODEL>/v1`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// _(Optional)_ Fields with information about the output animation.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Output {
    /// _(Optional)_ Directory in which the animation is saved.
    ///
    /// Defaults to the working directory. Created if it does not exist.
    #[serde(default = "Output::default_directory")]
    pub directory: PathBuf,

    /// _(Optional)_ Dots per inch of the animation frames.
    ///
    /// Cannot be less than `10`. Defaults to `80`.
    #[serde(default = "Output::default_dpi")]
    pub dpi: u32,

    /// _(Optional)_ Width and height of the square figure in inches.
    ///
    /// Must be positive. Defaults to `10.0`.
    #[serde(default = "Output::default_figure_size")]
    pub figure_size: Float,

    /// _(Optional)_ TrueType font used for the title and labels.
    ///
    /// When not set, a few common system fonts are tried
    /// and text is skipped if none of them exists.
    #[serde(default)]
    pub font: Option<PathBuf>,
}

impl Output {
    fn default_directory() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_dpi() -> u32 {
        80
    }

    fn default_figure_size() -> Float {
        10.0
    }

    /// Side length of the square frame in pixels.
    pub fn frame_size(&self) -> u32 {
        (self.figure_size * Float::from(self.dpi)).round() as u32
    }

    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.dpi < 10 {
            return Err(ConfigError::OutOfBounds("Output dpi cannot be less than 10"));
        }

        if !(self.figure_size > 0.0) {
            return Err(ConfigError::OutOfBounds("Figure size must be positive"));
        }

        let (min_size, max_size) = FRAME_SIZE_LIMITS;

        if self.frame_size() < min_size {
            return Err(ConfigError::OutOfBounds(
                "Frame cannot be smaller than 32 pixels",
            ));
        }

        if self.frame_size() > max_size {
            return Err(ConfigError::OutOfBounds(
                "Frame cannot be larger than 8192 pixels",
            ));
        }

        Ok(())
    }
}

impl Default for Output {
    fn default() -> Self {
        Output {
            directory: Output::default_directory(),
            dpi: Output::default_dpi(),
            figure_size: Output::default_figure_size(),
            font: None,
        }
    }
}

/// _(Optional)_ Fields with information about
/// resources available for the program.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Resources {
    /// _(Optional)_ Thread count used for rasterizing the background.
    ///
    /// Cannot be less than `1`. Defaults to `1`.
    #[serde(default = "Resources::default_threads")]
    pub threads: u16,

    /// _(Optional)_ Heap memory limit for the program in MB.
    /// Useful for enabling meaningful Out-of-memory error messages.
    ///
    /// Cannot be less than `128`. Defaults to whole addressable-space
    /// (`2^32` or `2^64` bytes).
    ///
    /// BARRA-R files hold all 37 pressure levels of a run, so reading
    /// them can take substantial amount of memory. When the allocator
    /// has a capped memory amount available it will abort the process
    /// with (somehow useful) OOM error message instead of being killed
    /// silently by the system.
    #[serde(default = "Resources::default_memory")]
    pub memory: usize,
}

impl Resources {
    fn default_threads() -> u16 {
        1
    }

    fn default_memory() -> usize {
        usize::MAX / (1024 * 1024)
    }

    /// Checks if thread count and memory limit are
    /// above limits.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.threads < 1 {
            return Err(ConfigError::OutOfBounds(
                "Available threads cannot be less than 1",
            ));
        }

        if self.memory < 128 {
            return Err(ConfigError::OutOfBounds(
                "Available memory cannot be less than 128 MB",
            ));
        }

        Ok(())
    }
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            threads: Resources::default_threads(),
            memory: Resources::default_memory(),
        }
    }
}

/// Main config structure representing the fields in
/// configuration file.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Config {
    pub model: Model,

    pub datetime: DateTime,

    #[serde(default)]
    pub input: Input,

    #[serde(default)]
    pub domain: DomainChoice,

    #[serde(default)]
    pub output: Output,

    #[serde(default)]
    pub resources: Resources,
}

impl Config {
    /// Config structure constructor, responsible for
    /// deserializing configuration and checking it.
    pub fn new_from_file(file_path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(file_path)?;
        Config::new_from_slice(data.as_slice())
    }

    pub fn new_from_slice(data: &[u8]) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_slice(data)?;

        if let DomainChoice::Bounds(domain) = &config.domain {
            domain.check_bounds()?;
        }
        config.output.check_bounds()?;
        config.resources.check_bounds()?;

        Ok(config)
    }

    /// Directory with model data, either configured or the default one.
    pub fn data_dir(&self) -> PathBuf {
        self.input
            .data_dir
            .clone()
            .unwrap_or_else(|| self.model.default_data_dir())
    }

    /// Domain configured explicitly or predefined for the model.
    ///
    /// Returns `None` when the whole input grid should be plotted.
    pub fn domain(&self) -> Option<Domain> {
        match self.domain {
            DomainChoice::ModelDefault => Some(self.model.default_domain()),
            DomainChoice::FullExtent => None,
            DomainChoice::Bounds(domain) => Some(domain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Domain, DomainChoice, Model};
    use crate::errors::ConfigError;
    use chrono::NaiveDate;
    use float_cmp::approx_eq;
    use std::path::PathBuf;

    const MINIMAL: &str = "
model: BARRA_R
datetime:
  target: 2015-02-07T12:00:00
  lead_hours: 6
";

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::new_from_slice(MINIMAL.as_bytes()).unwrap();

        assert_eq!(config.model, Model::BarraR);
        assert_eq!(config.domain, DomainChoice::ModelDefault);
        assert_eq!(config.output.dpi, 80);
        assert_eq!(config.output.frame_size(), 800);
        assert_eq!(config.resources.threads, 1);
        assert_eq!(
            config.data_dir(),
            PathBuf::from("/g/data/ma05/sample/BARRA_R/v1")
        );
        assert_eq!(
            config.domain(),
            Some(Domain::new(110.8, 158.0, -45.6, -10.5))
        );
        assert_eq!(
            config.datetime.base_time(),
            NaiveDate::from_ymd_opt(2015, 2, 7)
                .and_then(|d| d.and_hms_opt(6, 0, 0))
                .unwrap()
        );
    }

    #[test]
    fn domain_choices() {
        let full = format!("{}domain: full_extent\n", MINIMAL);
        let config = Config::new_from_slice(full.as_bytes()).unwrap();
        assert_eq!(config.domain(), None);

        let bounds = format!(
            "{}domain:\n  bounds:\n    lon_min: 143.0\n    lon_max: 149.0\n    lat_min: -44.185\n    lat_max: -39.55\n",
            MINIMAL
        );
        let config = Config::new_from_slice(bounds.as_bytes()).unwrap();
        assert_eq!(
            config.domain(),
            Some(Domain::new(143.0, 149.0, -44.185, -39.55))
        );
    }

    #[test]
    fn unknown_model_is_rejected() {
        let yaml = MINIMAL.replace("BARRA_R", "ACCESS_G");
        let err = Config::new_from_slice(yaml.as_bytes()).unwrap_err();

        assert!(matches!(err, ConfigError::CantDeserialize(_)));
        assert!(err.to_string().contains("ACCESS_G"));
    }

    #[test]
    fn inverted_domain_is_rejected() {
        let yaml = format!(
            "{}domain:\n  bounds:\n    lon_min: 150.0\n    lon_max: 140.0\n    lat_min: -40.0\n    lat_max: -30.0\n",
            MINIMAL
        );

        assert!(matches!(
            Config::new_from_slice(yaml.as_bytes()),
            Err(ConfigError::OutOfBounds(_))
        ));
    }

    #[test]
    fn frame_size_limits() {
        let output = |size: &str| format!("{}output:\n  dpi: 80\n  figure_size: {}\n", MINIMAL, size);

        for size in &["0.01", "0.39", "103.0", "0.0", "-1.0"] {
            assert!(matches!(
                Config::new_from_slice(output(size).as_bytes()),
                Err(ConfigError::OutOfBounds(_))
            ));
        }

        let config = Config::new_from_slice(output("0.4").as_bytes()).unwrap();
        assert_eq!(config.output.frame_size(), 32);

        let config = Config::new_from_slice(output("102.4").as_bytes()).unwrap();
        assert_eq!(config.output.frame_size(), 8192);
    }

    #[test]
    fn graticule_spacing() {
        let (dx, dy) = Domain::new(110.8, 158.0, -45.6, -10.5).graticule_spacing();
        assert!(approx_eq!(f64, dx, 5.9, epsilon = 1e-9));
        assert!(approx_eq!(f64, dy, 3.51, epsilon = 1e-9));

        let (dx, dy) = Domain::new(145.0, 145.0, -40.0, -40.0).graticule_spacing();
        assert!(approx_eq!(f64, dx, 0.5));
        assert!(approx_eq!(f64, dy, 0.5));
    }
}
