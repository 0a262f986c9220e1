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

//! Module containing the animation pipeline.
//!
//! The program reads zonal and meridional wind on pressure levels
//! from BARRA NetCDF files for a single time, restricts them to the
//! plotting domain and draws one frame per pressure level, from the
//! first to the last level of the input file. Arrows are thinned
//! so that about 20 of them fit along the longer domain axis, and
//! their length scale is fixed on the first frame.
//!
//! Frames are drawn over shaded topography, which together with
//! the land outline and graticule forms a static background.
//! The frames are saved as a GIF animation (400 ms per frame,
//! played once) named after the model and the validity time.

mod calendar;
mod configuration;
mod dataset;
mod decimation;
mod export;
mod frames;
mod paths;
mod render;
mod subset;

use self::{
    configuration::Config,
    dataset::{load_topography, load_wind},
    export::save_animation,
    frames::FrameController,
    paths::{output_file_name, InputPaths},
    render::Renderer,
    subset::{full_extent, subset_to_domain},
};
use crate::{
    errors::{AnimationError, RenderError},
    ALLOCATOR,
};
use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Main animation function, responsible for all steps
/// from reading configuration to saving the animation.
///
/// Configuration is read from the file given as the first
/// command line argument, or from `config.yaml` in the
/// working directory. Returns the path of the saved animation.
pub fn main() -> Result<PathBuf, AnimationError> {
    let config_path = env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("config.yaml"), PathBuf::from);

    info!("Preparing the animation core");
    let core = Core::new(&config_path)?;

    core.run()
}

/// Structure containing configuration and resources
/// needed to produce the animation.
#[derive(Debug)]
pub struct Core {
    pub config: Config,
    pub threadpool: ThreadPool,
}

impl Core {
    /// Animation [`Core`] constructor.
    ///
    /// Configuration is loaded and checked, memory limit
    /// and threadpool are set up before any data is read.
    pub fn new(config_path: &Path) -> Result<Self, AnimationError> {
        debug!("Reading configuration from {}", config_path.display());
        let config = Config::new_from_file(config_path)?;

        debug!("Setting memory limit");
        ALLOCATOR
            .set_limit(config.resources.memory.saturating_mul(1024 * 1024))
            .map_err(|_| AnimationError::MemoryLimit(config.resources.memory))?;

        debug!("Setting up ThreadPool");
        let threadpool = ThreadPoolBuilder::new()
            .num_threads(config.resources.threads as usize)
            .stack_size(2 * 1024 * 1024)
            .build()?;

        Ok(Core { config, threadpool })
    }

    pub fn run(&self) -> Result<PathBuf, AnimationError> {
        let config = &self.config;
        let target = config.datetime.target;

        info!(
            "Reading {} wind valid at {} (run of {})",
            config.model,
            target,
            config.datetime.base_time()
        );
        let paths = InputPaths::new(config);
        let wind = load_wind(&paths, target)?;
        let topography = load_topography(&paths.topography)?;

        let domain = config
            .domain()
            .unwrap_or_else(|| full_extent(&wind.lons, &wind.lats));
        debug!("Plotting domain {:?}", domain);

        let subset = subset_to_domain(&wind, &domain)?;
        drop(wind);

        let out_path = prepare_output_path(config)?;

        info!("Drawing map background");
        let renderer = Renderer::new(
            &config.output,
            config.model.coastline_resolution(),
            &domain,
            &topography,
            &self.threadpool,
        )?;

        let controller = FrameController::new(&subset);

        // set progress bar for rendered frames
        let frames_bar = ProgressBar::new(controller.frames_count() as u64);
        frames_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .progress_chars("#>-"),
        );
        frames_bar.set_prefix("Rendered frames");

        let images = controller.map(|frame| -> Result<RgbaImage, RenderError> {
            let image = renderer.render_frame(&frame?);
            frames_bar.inc(1);
            Ok(image)
        });

        let saved = save_animation(images, &out_path);
        frames_bar.finish_and_clear();

        info!("Saved {} frames", saved?);

        Ok(out_path)
    }
}

/// Creates the output directory if needed and returns
/// the path of the animation file.
fn prepare_output_path(config: &Config) -> Result<PathBuf, AnimationError> {
    let out_dir = &config.output.directory;

    if !out_dir.is_dir() {
        debug!("Output directory does not exist so creating a new one");
        fs::create_dir_all(out_dir)?;
    }

    Ok(out_dir.join(output_file_name(config.model, config.datetime.target)))
}

#[cfg(test)]
mod tests {
    use super::Core;
    use crate::animation::configuration::Model;
    use crate::animation::dataset::tests::{write_topography_file, write_wind_file};
    use crate::animation::paths::build_input_paths;
    use crate::errors::{AnimationError, ConfigError, InputError};
    use chrono::NaiveDate;
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use std::{
        fs,
        fs::File,
        path::{Path, PathBuf},
    };

    fn write_config(dir: &Path, target: &str, lead_hours: u32) -> PathBuf {
        let yaml = format!(
            "model: BARRA_TA
datetime:
  target: {}
  lead_hours: {}
input:
  data_dir: {}
domain: full_extent
output:
  directory: {}
  dpi: 20
  figure_size: 5.0
resources:
  threads: 2
",
            target,
            lead_hours,
            dir.join("data").display(),
            dir.join("out").display()
        );

        let path = dir.join("config.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    fn write_inputs(dir: &Path) {
        let base = NaiveDate::from_ymd_opt(2015, 2, 7)
            .and_then(|d| d.and_hms_opt(6, 0, 0))
            .unwrap();
        let paths = build_input_paths(Model::BarraTa, base, &dir.join("data"));

        for path in [&paths.u_wind, &paths.v_wind, &paths.topography] {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
        }

        write_wind_file(&paths.u_wind, "wnd_ucmp");
        write_wind_file(&paths.v_wind, "wnd_vcmp");
        write_topography_file(&paths.topography);
    }

    #[test]
    fn animation_has_frame_per_level() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let config_path = write_config(dir.path(), "2015-02-07T12:00:00", 6);

        let core = Core::new(&config_path).unwrap();
        let out_path = core.run().unwrap();

        assert_eq!(
            out_path,
            dir.path().join("out").join("prs_wnd.BARRA_TA.2015020712.gif")
        );

        let decoder = GifDecoder::new(File::open(&out_path).unwrap()).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].buffer().dimensions(), (100, 100));
    }

    #[test]
    fn missing_time_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        // same model run, but no record at 13 UTC
        let config_path = write_config(dir.path(), "2015-02-07T13:00:00", 7);

        let core = Core::new(&config_path).unwrap();

        assert!(matches!(
            core.run(),
            Err(AnimationError::Input(InputError::TimeNotFound(_)))
        ));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_config_is_an_error() {
        assert!(matches!(
            Core::new(Path::new("/nonexistent/config.yaml")),
            Err(AnimationError::Config(ConfigError::CantOpenFile(_)))
        ));
    }
}
