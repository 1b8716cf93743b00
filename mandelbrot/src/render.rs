//! Colour mapping and image/animation output for escape grids.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::frames::Frame;
use crate::grid::EscapeGrid;

/// NeuQuant sampling speed, 1 (best) to 30 (fastest)
const GIF_SPEED: i32 = 10;

const HOT_RED_END: f64 = 0.365079;
const HOT_GREEN_END: f64 = 0.746032;

/// Samples of the magma map at evenly spaced positions over [0, 1].
const MAGMA: [[f64; 3]; 9] = [
    [0.0, 0.0, 4.0],
    [28.0, 16.0, 68.0],
    [79.0, 18.0, 123.0],
    [129.0, 37.0, 129.0],
    [181.0, 54.0, 122.0],
    [229.0, 80.0, 100.0],
    [251.0, 135.0, 97.0],
    [254.0, 194.0, 135.0],
    [252.0, 253.0, 191.0],
];

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// Black through red and yellow to white
    #[default]
    Hot,
    /// Black through purple and orange to pale yellow
    Magma,
    Gray,
}

impl Palette {
    /// Colour for `t` in [0, 1]; values outside are clamped.
    pub fn color(&self, t: f64) -> Rgba<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let [r, g, b] = match self {
            Palette::Hot => [
                ramp(t, 0.0, HOT_RED_END),
                ramp(t, HOT_RED_END, HOT_GREEN_END),
                ramp(t, HOT_GREEN_END, 1.0),
            ]
            .map(|c| c * 255.0),
            Palette::Magma => {
                let pos = t * (MAGMA.len() - 1) as f64;
                let lo = (pos.floor() as usize).min(MAGMA.len() - 2);
                let frac = pos - lo as f64;
                let (a, b) = (MAGMA[lo], MAGMA[lo + 1]);
                [0, 1, 2].map(|i| a[i] + (b[i] - a[i]) * frac)
            }
            Palette::Gray => [t * 255.0; 3],
        };
        Rgba([r.round() as u8, g.round() as u8, b.round() as u8, 255])
    }
}

fn ramp(t: f64, start: f64, end: f64) -> f64 {
    ((t - start) / (end - start)).clamp(0.0, 1.0)
}

/// Rendering state handed to every output call instead of living in a global.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub palette: Palette,
}

impl RenderContext {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Colour the grid, scaling its own min..max onto the palette.
    /// Row 0 becomes the top line of the image.
    pub fn to_image(&self, grid: &EscapeGrid) -> Result<RgbaImage> {
        let width = u32::try_from(grid.cols())
            .map_err(|_| Error::invalid(format!("{} columns do not fit an image", grid.cols())))?;
        let height = u32::try_from(grid.rows())
            .map_err(|_| Error::invalid(format!("{} rows do not fit an image", grid.rows())))?;

        let cells = grid.as_slice();
        let min = cells.iter().copied().min().unwrap_or(0);
        let max = cells.iter().copied().max().unwrap_or(0);
        let span = f64::from(max - min);

        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let value = cells[y as usize * grid.cols() + x as usize];
            let t = if span > 0.0 {
                f64::from(value - min) / span
            } else {
                0.0
            };
            self.palette.color(t)
        }))
    }
}

/// Write one escape grid as a still image; the format follows the extension.
pub fn save_image<P: AsRef<Path>>(grid: &EscapeGrid, path: P, palette: Palette) -> Result<()> {
    let path = path.as_ref();
    RenderContext::new(palette).to_image(grid)?.save(path)?;
    tracing::info!("Image written to {}", path.display());
    Ok(())
}

/// Consumer of escape grids produced one at a time.
pub trait FrameSink {
    fn push(&mut self, grid: &EscapeGrid) -> Result<()>;
}

/// Appends frames to an endlessly looping GIF as they arrive.
///
/// The GIF header is sized from the first frame; every later frame must
/// match it. Call [`AnimationWriter::finish`] to write the trailer.
pub struct AnimationWriter {
    path: PathBuf,
    output: Output,
    context: RenderContext,
    delay: u16,
    frames: usize,
}

enum Output {
    /// File created, nothing encoded yet
    Pending(BufWriter<File>),
    Encoding {
        encoder: gif::Encoder<BufWriter<File>>,
        size: (u16, u16),
    },
    /// An earlier encoder error left the output unusable
    Closed,
}

impl AnimationWriter {
    pub fn create<P: AsRef<Path>>(path: P, context: RenderContext, interval_ms: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            output: Output::Pending(BufWriter::new(file)),
            context,
            // gif delays are in hundredths of a second
            delay: u16::try_from(interval_ms / 10).unwrap_or(u16::MAX),
            frames: 0,
        })
    }

    /// Write the trailer and flush, returning how many frames the file holds.
    ///
    /// An animation without frames is not a valid GIF; the file is removed
    /// and an error returned.
    pub fn finish(self) -> Result<usize> {
        match self.output {
            Output::Encoding { encoder, .. } => {
                let writer = encoder.into_inner()?;
                writer.into_inner().map_err(|e| e.into_error())?;
                tracing::info!("Animation with {} frames written to {}", self.frames, self.path.display());
                Ok(self.frames)
            }
            Output::Pending(writer) => {
                drop(writer);
                std::fs::remove_file(&self.path)?;
                Err(Error::invalid(format!(
                    "animation {} has no frames",
                    self.path.display()
                )))
            }
            Output::Closed => Err(closed()),
        }
    }
}

fn closed() -> Error {
    Error::invalid("animation output is closed after an earlier error")
}

fn gif_size(image: &RgbaImage) -> Result<(u16, u16)> {
    let (width, height) = image.dimensions();
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::invalid(format!(
            "{}x{} frame is too large for a GIF",
            width, height
        ))),
    }
}

impl FrameSink for AnimationWriter {
    fn push(&mut self, grid: &EscapeGrid) -> Result<()> {
        let image = self.context.to_image(grid)?;
        let (width, height) = gif_size(&image)?;

        self.output = match std::mem::replace(&mut self.output, Output::Closed) {
            Output::Pending(writer) => {
                let mut encoder = gif::Encoder::new(writer, width, height, &[])?;
                encoder.set_repeat(gif::Repeat::Infinite)?;
                Output::Encoding {
                    encoder,
                    size: (width, height),
                }
            }
            other => other,
        };

        match &mut self.output {
            Output::Encoding { encoder, size } if *size == (width, height) => {
                let mut pixels = image.into_raw();
                let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, GIF_SPEED);
                frame.delay = self.delay;
                encoder.write_frame(&frame)?;
            }
            Output::Encoding { size, .. } => {
                return Err(Error::invalid(format!(
                    "{}x{} frame does not match the {}x{} animation",
                    width, height, size.0, size.1
                )));
            }
            _ => return Err(closed()),
        }
        self.frames += 1;
        Ok(())
    }
}

/// Drain `frames` into `sink` in order, stopping at the first error.
pub fn stream<I, S>(frames: I, sink: &mut S) -> Result<usize>
where
    I: IntoIterator<Item = Result<Frame>>,
    S: FrameSink + ?Sized,
{
    let mut written = 0;
    for frame in frames {
        let frame = frame?;
        sink.push(&frame.grid)?;
        written += 1;
    }
    Ok(written)
}
