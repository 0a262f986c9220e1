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

//! Pressure-level Wind Animation (PRSWND) renders an animation
//! of wind vectors through the pressure levels of BARRA
//! (Bureau of Meteorology Atmospheric high-resolution Regional
//! Reanalysis for Australia) sample data.
//!
//! Zonal and meridional wind on pressure levels are read from
//! NetCDF files, cut to the configured domain and time, and each
//! pressure level becomes one frame of a GIF animation drawn
//! over shaded topography.

mod animation;
mod constants;
mod errors;

use cap::Cap;
use env_logger::Env;
use log::{error, info};
use std::{alloc, process};

type Float = f64;

/// Global allocator used by the program.
///
/// Use of static global allocator allows for capping the memory to the limit set by user
/// in configuration file and in effect provide better [OOM error](https://en.wikipedia.org/wiki/Out_of_memory) handling.
#[global_allocator]
static ALLOCATOR: Cap<alloc::System> = Cap::new(alloc::System, usize::MAX);

/// The main program function.
/// Prepares the runtime environment and calls the [`animation::main`].
///
/// To provide meaningful and high-quality error messages the `env_logger`
/// needs to be initiated before any log messages are possible to occur.
fn main() {
    #[cfg(not(feature = "debug"))]
    let logger_env = Env::new().filter_or("PRSWND_LOG_LEVEL", "info");

    #[cfg(feature = "debug")]
    let logger_env = Env::new().filter_or("PRSWND_LOG_LEVEL", "debug");

    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    match animation::main() {
        Ok(out_path) => info!("SUCCESS! Animation saved to {}", out_path.display()),
        Err(err) => {
            error!("Animation failed with error: {}", err);
            process::exit(1);
        }
    }
}
