//! Multi-page TIFF stacks, one grayscale page per frame. Outputs are written
//! as 32-bit float pages, the layout Fiji opens as a float hyperstack.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use ndarray::{Array2, Array3, ArrayView3, Axis};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::ColorType;

use crate::error::{Result, SpyboatError};
use crate::movie::Movie;

/// Page count and page geometry of a stack, read without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TiffStackInfo {
    pub pages: usize,
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u8,
}

pub fn read_stack_info(path: &Path) -> Result<TiffStackInfo> {
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let bits_per_sample = gray_bits(&mut decoder)?;
    let (width, height) = decoder.dimensions()?;
    let mut pages = 1;
    while decoder.more_images() {
        decoder.next_image()?;
        pages += 1;
    }
    Ok(TiffStackInfo {
        pages,
        width,
        height,
        bits_per_sample,
    })
}

/// Read every page of a grayscale stack as raw values. All pages must share
/// the first page's dimensions.
pub fn read_tiff_stack(path: &Path) -> Result<Movie> {
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let mut frames = vec![read_page(&mut decoder)?];
    let (h, w) = frames[0].dim();

    while decoder.more_images() {
        decoder.next_image()?;
        let frame = read_page(&mut decoder)?;
        if frame.dim() != (h, w) {
            return Err(SpyboatError::ShapeMismatch {
                expected: vec![h, w],
                actual: vec![frame.nrows(), frame.ncols()],
            });
        }
        frames.push(frame);
    }

    let mut movie = Array3::<f64>::zeros((frames.len(), h, w));
    for (mut slot, frame) in movie.axis_iter_mut(Axis(0)).zip(&frames) {
        slot.assign(frame);
    }
    Ok(movie)
}

fn gray_bits<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<u8> {
    match decoder.colortype()? {
        ColorType::Gray(bits) => Ok(bits),
        other => Err(SpyboatError::UnsupportedColorMode(format!(
            "TIFF page color type {other:?}"
        ))),
    }
}

fn read_page<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Array2<f64>> {
    gray_bits(decoder)?;
    let (width, height) = decoder.dimensions()?;
    let (h, w) = (height as usize, width as usize);
    let values = widen(decoder.read_image()?);
    Array2::from_shape_vec((h, w), values).map_err(|_| SpyboatError::ShapeMismatch {
        expected: vec![h, w],
        actual: vec![h * w],
    })
}

fn widen(result: DecodingResult) -> Vec<f64> {
    match result {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
    }
}

/// Write a (frames, rows, cols) movie as a stack of 32-bit float pages.
pub fn write_tiff_stack(path: &Path, movie: ArrayView3<'_, f32>) -> Result<()> {
    let (_, height, width) = movie.dim();
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(SpyboatError::InvalidDimensions {
                frames: movie.dim().0,
                height,
                width,
            })
        }
    };

    let mut file = BufWriter::new(File::create(path)?);
    {
        let mut encoder = TiffEncoder::new(&mut file)?;
        for frame in movie.axis_iter(Axis(0)) {
            let page: Vec<f32> = frame.iter().copied().collect();
            encoder.write_image::<colortype::Gray32Float>(w, h, &page)?;
        }
    }
    file.flush()?;
    Ok(())
}
