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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("Error while reading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Error while reading input data: {0}")]
    Input(#[from] InputError),

    #[error("Error while rendering animation: {0}")]
    Render(#[from] RenderError),

    #[error("Error while creating ThreadPool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Error while preparing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot set memory limit, program already uses more than {0} MB")]
    MemoryLimit(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot open configuration file: {0}")]
    CantOpenFile(#[from] std::io::Error),

    #[error("Cannot deserialize configuration file: {0}")]
    CantDeserialize(#[from] serde_yaml::Error),

    #[error("Unrecognized model name {0}, expected BARRA_R or BARRA_TA")]
    UnknownModel(String),

    #[error("Configuration component is out of bounds {0}")]
    OutOfBounds(&'static str),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("NetCDF library returned an error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Input file {0} does not exist")]
    FileNotFound(String),

    #[error("Variable {0} is missing in the input file")]
    MissingVariable(&'static str),

    #[error("Attribute {0} is missing or has incorrect type")]
    MissingAttribute(&'static str),

    #[error("Time units {0} are not supported")]
    UnsupportedTimeUnits(String),

    #[error("Time coordinate value {0} cannot be decoded")]
    InvalidTimeValue(f64),

    #[error("Requested time {0} is not present in the time coordinate")]
    TimeNotFound(chrono::NaiveDateTime),

    #[error("No grid points of the input data are inside the domain")]
    EmptySubset,

    #[error("Pressure level index {0} is out of range")]
    LevelOutOfRange(usize),

    #[error("Shapes of data arrays do not match: {0}")]
    ShapeMismatch(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font file is not a valid TrueType font")]
    InvalidFont,

    #[error("Image encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("Frame computation failed: {0}")]
    Frame(#[from] InputError),

    #[error("Animation has no frames to save")]
    NoFrames,
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Array to search is empty")]
    EmptyArray,

    #[error("Searched value is out of array bounds")]
    OutOfBounds,
}
