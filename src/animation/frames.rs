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

//! Frame controller stepping through pressure levels.
//!
//! Frames are produced by an iterator, so the encoder
//! pulls them one by one and computing the next vector
//! field is decoupled from drawing and encoding.

use super::decimation::{get_uv, LevelSample};
use super::subset::WindSubset;
use crate::errors::InputError;
use crate::Float;
use log::info;
use ndarray::Array2;

/// Minimal number of arrows assumed by the arrow autoscaling.
const AUTOSCALE_MIN_ARROWS: Float = 10.0;

/// Ratio of the autoscaled reference speed to the mean speed.
const AUTOSCALE_FACTOR: Float = 1.8;

/// Vector field graphic drawn on every frame.
///
/// Arrows are anchored at the grid points given by coordinates.
/// The scale is fixed when the quiver is created, so arrow
/// lengths are comparable between frames.
#[derive(Clone, Debug)]
pub struct Quiver {
    pub sample: LevelSample,

    /// Wind speed of an arrow as long as the plot width.
    pub scale: Float,
}

impl Quiver {
    pub fn new(sample: LevelSample) -> Self {
        let scale = autoscale(&sample.u_wind, &sample.v_wind);

        Quiver { sample, scale }
    }

    /// Replaces arrow components, keeping their positions and scale.
    pub fn set_uvc(&mut self, sample: LevelSample) -> Result<(), InputError> {
        if sample.u_wind.dim() != self.sample.u_wind.dim() {
            return Err(InputError::ShapeMismatch(format!(
                "new components have shape {:?} but quiver has {:?}",
                sample.u_wind.dim(),
                self.sample.u_wind.dim()
            )));
        }

        self.sample.u_wind = sample.u_wind;
        self.sample.v_wind = sample.v_wind;
        self.sample.pressure = sample.pressure;

        Ok(())
    }
}

/// Reference speed such that an average arrow is a small
/// fraction of the plot width, decreasing with arrows count.
fn autoscale(u_wind: &Array2<Float>, v_wind: &Array2<Float>) -> Float {
    let speeds: Vec<Float> = u_wind
        .iter()
        .zip(v_wind.iter())
        .map(|(u, v)| u.hypot(*v))
        .filter(|speed| speed.is_finite())
        .collect();

    if speeds.is_empty() {
        return 1.0;
    }

    let count = speeds.len() as Float;
    let mean = speeds.iter().sum::<Float>() / count;
    let scale = AUTOSCALE_FACTOR * mean * AUTOSCALE_MIN_ARROWS.max(count.sqrt());

    if scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Title shown above the map.
pub fn frame_title(pressure: Float) -> String {
    format!("Pressure level: {:.3} hPa", pressure)
}

/// One step of the animation.
#[derive(Clone, Debug)]
pub struct Frame {
    pub index: usize,
    pub title: String,
    pub quiver: Quiver,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FrameState {
    Uninitialized,
    Frame(usize),
    Halted,
}

/// Iterator over animation frames, one per pressure level,
/// in the order of the pressure coordinate.
///
/// The iteration ends after the last level and does not wrap around.
#[derive(Debug)]
pub struct FrameController<'a> {
    subset: &'a WindSubset,
    quiver: Option<Quiver>,
    state: FrameState,
}

impl<'a> FrameController<'a> {
    pub fn new(subset: &'a WindSubset) -> Self {
        FrameController {
            subset,
            quiver: None,
            state: FrameState::Uninitialized,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frames_count(&self) -> usize {
        self.subset.levels_count()
    }

    fn init_quiver(&mut self) -> Result<Frame, InputError> {
        info!("Plotting pressure level 0");
        let sample = get_uv(self.subset, 0)?;
        let title = frame_title(sample.pressure);

        let quiver = Quiver::new(sample);
        self.quiver = Some(quiver.clone());
        self.state = FrameState::Frame(0);

        Ok(Frame {
            index: 0,
            title,
            quiver,
        })
    }

    fn update_quiver(&mut self, index: usize) -> Result<Frame, InputError> {
        info!("Plotting pressure level {}", index);
        let sample = get_uv(self.subset, index)?;
        let title = frame_title(sample.pressure);

        let quiver = match self.quiver.as_mut() {
            Some(quiver) => {
                quiver.set_uvc(sample)?;
                quiver.clone()
            }
            None => {
                return Err(InputError::ShapeMismatch(
                    "quiver updated before initialisation".to_string(),
                ))
            }
        };

        self.state = FrameState::Frame(index);

        Ok(Frame {
            index,
            title,
            quiver,
        })
    }
}

impl<'a> Iterator for FrameController<'a> {
    type Item = Result<Frame, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            FrameState::Uninitialized if self.frames_count() > 0 => self.init_quiver(),
            FrameState::Frame(j) if j + 1 < self.frames_count() => self.update_quiver(j + 1),
            _ => return None,
        };

        if result.is_err() {
            self.state = FrameState::Halted;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{frame_title, FrameController, FrameState};
    use crate::animation::configuration::Domain;
    use crate::animation::subset::{subset_to_domain, tests::dataset, WindSubset};
    use float_cmp::approx_eq;

    fn whole(levels: usize, n_lat: usize, n_lon: usize) -> WindSubset {
        let data = dataset(levels, n_lat, n_lon);
        subset_to_domain(&data, &Domain::new(-180.0, 360.0, -90.0, 90.0)).unwrap()
    }

    #[test]
    fn one_frame_per_level_without_wrapping() {
        let subset = whole(37, 30, 42);
        let mut controller = FrameController::new(&subset);
        assert_eq!(controller.state(), FrameState::Uninitialized);

        let mut indices = vec![];
        for frame in controller.by_ref() {
            indices.push(frame.unwrap().index);
        }

        assert_eq!(indices, (0..37).collect::<Vec<_>>());
        assert_eq!(controller.state(), FrameState::Frame(36));

        // terminal state does not advance any more
        assert!(controller.next().is_none());
        assert_eq!(controller.state(), FrameState::Frame(36));
    }

    #[test]
    fn quiver_keeps_positions_and_scale() {
        let subset = whole(3, 25, 25);
        let frames: Vec<_> = FrameController::new(&subset)
            .collect::<Result<_, _>>()
            .unwrap();

        let first = &frames[0].quiver;
        let last = &frames[2].quiver;

        assert_eq!(first.sample.lons, last.sample.lons);
        assert_eq!(first.sample.lats, last.sample.lats);
        assert!(approx_eq!(f64, first.scale, last.scale));
        assert_ne!(first.sample.u_wind, last.sample.u_wind);
        assert!(approx_eq!(f64, last.sample.pressure, 950.0));
        assert_eq!(frames[2].title, "Pressure level: 950.000 hPa");
    }

    #[test]
    fn titles_use_three_decimals() {
        assert_eq!(frame_title(1000.0), "Pressure level: 1000.000 hPa");
        assert_eq!(frame_title(7.5), "Pressure level: 7.500 hPa");
    }

    #[test]
    fn no_levels_no_frames() {
        let mut subset = whole(1, 4, 4);
        subset.pressure = ndarray::Array1::zeros(0);

        assert!(FrameController::new(&subset).next().is_none());
    }
}
