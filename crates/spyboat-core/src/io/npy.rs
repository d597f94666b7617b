//! NumPy `.npy` arrays, the exchange format with the Python tooling around
//! SpyBOAT. Parsing and encoding are done by `npyz`; this module only maps
//! shapes and element types onto [`Movie`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array3, ArrayView3};
use npyz::{DType, NpyFile, NpyHeader, Order, TypeChar, WriterBuilder};

use crate::error::{Result, SpyboatError};
use crate::movie::Movie;

/// Read a 3-D (frames, rows, cols) array; a 2-D array is read as a
/// single-frame movie. Float, unsigned 8/16-bit and signed 16-bit elements
/// of either byte order are accepted.
pub fn read_npy(path: &Path) -> Result<Movie> {
    let bytes = std::fs::read(path)?;
    parse_npy(&bytes)
}

pub(crate) fn parse_npy(bytes: &[u8]) -> Result<Movie> {
    let mut data = bytes;
    let header = NpyHeader::from_reader(&mut data).map_err(npy_error)?;

    if header.order() == Order::Fortran {
        return Err(SpyboatError::InvalidNpy(
            "Fortran-ordered arrays are not supported".into(),
        ));
    }
    let (frames, height, width) = movie_dims(header.shape())?;
    let element = Element::of(&header.dtype())?;

    // The header is untrusted: size the data before anything is allocated.
    let expected = frames
        .checked_mul(height)
        .and_then(|n| n.checked_mul(width))
        .and_then(|n| n.checked_mul(element.size()))
        .ok_or_else(|| {
            SpyboatError::InvalidNpy(format!(
                "shape ({frames}, {height}, {width}) is too large"
            ))
        })?;
    if data.len() < expected {
        return Err(SpyboatError::InvalidNpy(format!(
            "expected {expected} bytes of data, got {}",
            data.len()
        )));
    }

    let values = element
        .read(NpyFile::with_header(header, data))
        .map_err(npy_error)?;
    Array3::from_shape_vec((frames, height, width), values).map_err(|_| {
        SpyboatError::ShapeMismatch {
            expected: vec![frames, height, width],
            actual: vec![frames * height * width],
        }
    })
}

fn movie_dims(shape: &[u64]) -> Result<(usize, usize, usize)> {
    let dims = shape
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| {
            SpyboatError::InvalidNpy(format!("shape {shape:?} exceeds the address space"))
        })?;
    match dims.as_slice() {
        [f, h, w] => Ok((*f, *h, *w)),
        [h, w] => Ok((1, *h, *w)),
        other => Err(SpyboatError::ShapeMismatch {
            expected: vec![0, 0, 0],
            actual: other.to_vec(),
        }),
    }
}

/// Element types accepted on input, in either byte order.
#[derive(Clone, Copy, Debug)]
enum Element {
    F64,
    F32,
    U8,
    U16,
    I16,
}

impl Element {
    fn of(dtype: &DType) -> Result<Self> {
        let DType::Plain(type_str) = dtype else {
            return Err(SpyboatError::InvalidNpy(format!(
                "structured dtype {} is not supported",
                dtype.descr()
            )));
        };
        match (type_str.type_char(), type_str.size_field()) {
            (TypeChar::Float, 8) => Ok(Self::F64),
            (TypeChar::Float, 4) => Ok(Self::F32),
            (TypeChar::Uint, 1) => Ok(Self::U8),
            (TypeChar::Uint, 2) => Ok(Self::U16),
            (TypeChar::Int, 2) => Ok(Self::I16),
            _ => Err(SpyboatError::InvalidNpy(format!(
                "unsupported dtype '{type_str}'"
            ))),
        }
    }

    fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    fn read(self, file: NpyFile<&[u8]>) -> std::io::Result<Vec<f64>> {
        Ok(match self {
            Self::F64 => file.into_vec::<f64>()?,
            Self::F32 => widen(file.into_vec::<f32>()?),
            Self::U8 => widen(file.into_vec::<u8>()?),
            Self::U16 => widen(file.into_vec::<u16>()?),
            Self::I16 => widen(file.into_vec::<i16>()?),
        })
    }
}

fn widen<T: Into<f64>>(values: Vec<T>) -> Vec<f64> {
    values.into_iter().map(Into::into).collect()
}

fn npy_error(err: std::io::Error) -> SpyboatError {
    SpyboatError::InvalidNpy(err.to_string())
}

/// Write a single-precision (frames, rows, cols) array as `<f4` NPY.
pub fn write_npy(path: &Path, array: ArrayView3<'_, f32>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_npy_to(&mut writer, array)?;
    writer.flush()?;
    Ok(())
}

fn write_npy_to(w: &mut impl Write, array: ArrayView3<'_, f32>) -> Result<()> {
    let shape: Vec<u64> = array.shape().iter().map(|&d| d as u64).collect();
    let mut npy = npyz::WriteOptions::<f32>::new()
        .default_dtype()
        .shape(&shape)
        .writer(w)
        .begin_nd()?;
    // Logical iteration order is C order regardless of memory layout.
    npy.extend(array.iter().copied())?;
    npy.finish()?;
    Ok(())
}
