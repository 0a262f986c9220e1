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

//! Saving of rendered frames as a GIF animation.
//!
//! Frames are encoded as they arrive, so only one frame
//! is kept in memory at a time. The animation is written
//! to a temporary file next to the destination and moved
//! into place only when all frames were encoded.

use crate::constants::FRAME_DELAY_MS;
use crate::errors::RenderError;
use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, RgbaImage};
use log::{debug, warn};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Trade-off between colour quantization quality and speed (1 to 30).
const QUANTIZATION_SPEED: i32 = 10;

/// Encodes all frames into a GIF animation at `path`,
/// displayed once without looping.
///
/// Returns the number of saved frames. On error no file
/// is left at the destination.
pub fn save_animation<I>(frames: I, path: &Path) -> Result<usize, RenderError>
where
    I: IntoIterator<Item = Result<RgbaImage, RenderError>>,
{
    let temp_path = temporary_path(path);
    debug!("Encoding animation into {}", temp_path.display());

    match encode_frames(frames, &temp_path) {
        Ok(0) => {
            discard(&temp_path);
            Err(RenderError::NoFrames)
        }
        Ok(count) => match fs::rename(&temp_path, path) {
            Ok(()) => Ok(count),
            Err(err) => {
                discard(&temp_path);
                Err(err.into())
            }
        },
        Err(err) => {
            discard(&temp_path);
            Err(err)
        }
    }
}

fn encode_frames<I>(frames: I, path: &Path) -> Result<usize, RenderError>
where
    I: IntoIterator<Item = Result<RgbaImage, RenderError>>,
{
    let mut file = BufWriter::new(File::create(path)?);
    let delay = Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1);

    let mut count = 0;

    {
        // encoder writes the GIF trailer when dropped
        let mut encoder = GifEncoder::new_with_speed(&mut file, QUANTIZATION_SPEED);

        for image in frames {
            encoder.encode_frame(Frame::from_parts(image?, 0, 0, delay))?;
            count += 1;
        }
    }

    file.flush()?;
    file.get_ref().sync_all()?;

    Ok(count)
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");

    path.with_file_name(name)
}

fn discard(path: &Path) {
    if path.exists() {
        if let Err(err) = fs::remove_file(path) {
            warn!("Cannot remove incomplete file {}: {}", path.display(), err);
        }
    }
}
