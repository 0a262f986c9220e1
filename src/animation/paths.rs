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

//! Construction of BARRA input file paths.
//!
//! BARRA sample data is stored in a directory tree organised
//! by stream (forecast/analysis), level type, variable and
//! the year and month of the model run, with the run time
//! embedded in each file name.

use super::configuration::{Config, Model};
use crate::constants::{FILE_TIME_FORMAT, OUTPUT_TIME_FORMAT};
use chrono::{Datelike, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Paths of the three files read by the program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InputPaths {
    pub u_wind: PathBuf,
    pub v_wind: PathBuf,
    pub topography: PathBuf,
}

impl InputPaths {
    pub fn new(config: &Config) -> Self {
        build_input_paths(
            config.model,
            config.datetime.base_time(),
            &config.data_dir(),
        )
    }
}

/// Builds paths of zonal wind, meridional wind and topography files
/// of the model run initialised at `base_time`.
pub fn build_input_paths(model: Model, base_time: NaiveDateTime, data_dir: &Path) -> InputPaths {
    let year_month = format!("{:04}/{:02}", base_time.year(), base_time.month());
    let stamp = base_time.format(FILE_TIME_FORMAT).to_string();
    let name = model.name();

    let wind_path = |variable: &str| {
        data_dir
            .join("forecast/prs")
            .join(variable)
            .join(&year_month)
            .join(format!("{}-fc-prs-PT1H-{}-v1-{}.nc", variable, name, stamp))
    };

    // BARRA-R topography comes from the analysis stream
    let topography = match model {
        Model::BarraTa => data_dir
            .join("forecast/slv/topog")
            .join(&year_month)
            .join(format!("topog-fc-slv-PT1H-{}-v1-{}.nc", name, stamp)),
        Model::BarraR => data_dir
            .join("analysis/slv/topog")
            .join(&year_month)
            .join(format!("topog-an-slv-PT0H-{}-v1-{}.nc", name, stamp)),
    };

    InputPaths {
        u_wind: wind_path("wnd_ucmp"),
        v_wind: wind_path("wnd_vcmp"),
        topography,
    }
}

/// Name of the output animation for given model and validity time.
pub fn output_file_name(model: Model, target: NaiveDateTime) -> String {
    format!("prs_wnd.{}.{}.gif", model, target.format(OUTPUT_TIME_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::{build_input_paths, output_file_name};
    use crate::animation::configuration::Model;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::path::{Path, PathBuf};

    fn datetime(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 2, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn barra_r_paths() {
        let target = datetime(7, 12);
        let base_time = target - Duration::hours(6);
        assert_eq!(base_time, datetime(7, 6));

        let dir = Path::new("/g/data/ma05/sample/BARRA_R/v1");
        let paths = build_input_paths(Model::BarraR, base_time, dir);

        assert_eq!(
            paths.u_wind,
            PathBuf::from("/g/data/ma05/sample/BARRA_R/v1/forecast/prs/wnd_ucmp/2015/02/wnd_ucmp-fc-prs-PT1H-BARRA_R-v1-20150207T0600Z.nc")
        );
        assert_eq!(
            paths.v_wind,
            PathBuf::from("/g/data/ma05/sample/BARRA_R/v1/forecast/prs/wnd_vcmp/2015/02/wnd_vcmp-fc-prs-PT1H-BARRA_R-v1-20150207T0600Z.nc")
        );
        assert_eq!(
            paths.topography,
            PathBuf::from("/g/data/ma05/sample/BARRA_R/v1/analysis/slv/topog/2015/02/topog-an-slv-PT0H-BARRA_R-v1-20150207T0600Z.nc")
        );

        for path in [&paths.u_wind, &paths.v_wind, &paths.topography] {
            let path = path.to_string_lossy();
            assert!(path.contains("2015/02"));
            assert!(path.contains("20150207T0600Z"));
        }

        assert_eq!(
            output_file_name(Model::BarraR, target),
            "prs_wnd.BARRA_R.2015020712.gif"
        );
    }

    #[test]
    fn barra_ta_topography_from_forecast() {
        let paths = build_input_paths(Model::BarraTa, datetime(1, 0), Path::new("data"));

        assert_eq!(
            paths.topography,
            PathBuf::from(
                "data/forecast/slv/topog/2015/02/topog-fc-slv-PT1H-BARRA_TA-v1-20150201T0000Z.nc"
            )
        );
        assert_eq!(
            paths.u_wind,
            PathBuf::from(
                "data/forecast/prs/wnd_ucmp/2015/02/wnd_ucmp-fc-prs-PT1H-BARRA_TA-v1-20150201T0000Z.nc"
            )
        );
    }

    #[test]
    fn base_time_crosses_month() {
        let base_time = datetime(1, 3) - Duration::hours(6);
        let paths = build_input_paths(Model::BarraR, base_time, Path::new("d"));

        assert!(paths.u_wind.to_string_lossy().contains("2015/01"));
        assert!(paths.u_wind.to_string_lossy().contains("20150131T2100Z"));
    }
}
