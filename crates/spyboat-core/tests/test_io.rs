#[allow(dead_code)]
mod common;

use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma};
use ndarray::Array3;
use tempfile::TempDir;

use spyboat_core::error::SpyboatError;
use spyboat_core::io::image_io::{list_frame_files, load_image_sequence};
use spyboat_core::io::npy::{read_npy, write_npy};
use spyboat_core::io::tiff_stack::{read_stack_info, read_tiff_stack, write_tiff_stack};
use spyboat_core::io::{detect_format, load_movie, output_path, save_wavelet_movies};
use spyboat_core::movie::{
    MovieShape, OutputFormat, SourceFormat, WaveletMovies, WaveletQuantity,
};
use tiff::encoder::{colortype, TiffEncoder};

/// Hand-built NPY file with an arbitrary header dict and payload.
fn npy_bytes(header: &str, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\x93NUMPY");
    bytes.extend_from_slice(&[1, 0]);
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

fn write_gray_png(dir: &Path, name: &str, w: u32, h: u32, f: impl Fn(u32, u32) -> u8) {
    let img: GrayImage = ImageBuffer::from_fn(w, h, |x, y| Luma([f(x, y)]));
    img.save(dir.join(name)).unwrap();
}

// ---------------------------------------------------------------------------
// TIFF stacks
// ---------------------------------------------------------------------------

#[test]
fn test_tiff_stack_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stack.tif");
    let movie = Array3::from_shape_fn((3, 2, 4), |(t, r, c)| (t * 8 + r * 4 + c) as f32 - 0.5);

    write_tiff_stack(&path, movie.view()).unwrap();
    let back = read_tiff_stack(&path).unwrap();

    assert_eq!(back.dim(), (3, 2, 4));
    assert_eq!(back[[0, 0, 0]], -0.5);
    assert_eq!(back[[2, 1, 3]], 22.5);

    let info = read_stack_info(&path).unwrap();
    assert_eq!(info.pages, 3);
    assert_eq!((info.width, info.height), (4, 2));
    assert_eq!(info.bits_per_sample, 32);
}

#[test]
fn test_tiff_stack_writes_views_in_logical_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("t.tif");
    let movie = Array3::from_shape_fn((2, 2, 3), |(t, r, c)| (t * 6 + r * 3 + c) as f32);
    let swapped = movie.view().permuted_axes([0, 2, 1]);

    write_tiff_stack(&path, swapped).unwrap();
    let back = read_tiff_stack(&path).unwrap();
    assert_eq!(back.dim(), (2, 3, 2));
    assert_eq!(back[[1, 2, 0]], movie[[1, 0, 2]] as f64);
}

#[test]
fn test_tiff_stack_reads_16bit_raw_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("raw16.tif");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(&mut file).unwrap();
        encoder
            .write_image::<colortype::Gray16>(2, 1, &[1000u16, 4095])
            .unwrap();
        encoder
            .write_image::<colortype::Gray16>(2, 1, &[0u16, 65535])
            .unwrap();
    }

    let movie = read_tiff_stack(&path).unwrap();
    assert_eq!(movie.dim(), (2, 1, 2));
    assert_eq!(movie[[0, 0, 0]], 1000.0);
    assert_eq!(movie[[0, 0, 1]], 4095.0);
    assert_eq!(movie[[1, 0, 1]], 65535.0);
}

#[test]
fn test_tiff_stack_rejects_rgb_pages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rgb.tif");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(&mut file).unwrap();
        encoder
            .write_image::<colortype::RGB8>(1, 1, &[1u8, 2, 3])
            .unwrap();
    }
    assert!(matches!(
        read_tiff_stack(&path),
        Err(SpyboatError::UnsupportedColorMode(_))
    ));
}

#[test]
fn test_tiff_stack_rejects_mixed_page_sizes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.tif");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(&mut file).unwrap();
        encoder
            .write_image::<colortype::Gray8>(2, 2, &[0u8; 4])
            .unwrap();
        encoder
            .write_image::<colortype::Gray8>(3, 2, &[0u8; 6])
            .unwrap();
    }
    assert!(matches!(
        read_tiff_stack(&path),
        Err(SpyboatError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_tiff_stack_rejects_garbage() {
    let tmp = common::write_temp_file(b"definitely not a tiff", ".tif");
    assert!(matches!(
        read_tiff_stack(tmp.path()),
        Err(SpyboatError::Tiff(_))
    ));
}

// ---------------------------------------------------------------------------
// NPY
// ---------------------------------------------------------------------------

#[test]
fn test_npy_write_then_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("movie.npy");
    let array = Array3::from_shape_fn((2, 3, 4), |(t, r, c)| (t * 12 + r * 4 + c) as f32 * 0.5);

    write_npy(&path, array.view()).unwrap();
    let movie = read_npy(&path).unwrap();

    assert_eq!(movie.dim(), (2, 3, 4));
    assert_eq!(movie[[1, 2, 3]], 11.5);
    assert_eq!(movie[[0, 1, 0]], 2.0);
}

#[test]
fn test_npy_writes_non_contiguous_views_in_logical_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("t.npy");
    let array = Array3::from_shape_fn((2, 2, 3), |(t, r, c)| (t * 6 + r * 3 + c) as f32);
    let swapped = array.view().permuted_axes([0, 2, 1]);

    write_npy(&path, swapped).unwrap();
    let movie = read_npy(&path).unwrap();
    assert_eq!(movie.dim(), (2, 3, 2));
    assert_eq!(movie[[1, 2, 0]], array[[1, 0, 2]] as f64);
}

#[test]
fn test_npy_reads_float64_and_uint16() {
    let dir = TempDir::new().unwrap();

    let f8 = dir.path().join("f8.npy");
    let payload: Vec<u8> = [1.5f64, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    std::fs::write(
        &f8,
        npy_bytes("{'descr': '<f8', 'fortran_order': False, 'shape': (2, 1, 1), }\n", &payload),
    )
    .unwrap();
    let movie = read_npy(&f8).unwrap();
    assert_eq!(movie.dim(), (2, 1, 1));
    assert_eq!(movie[[1, 0, 0]], -2.0);

    let u2 = dir.path().join("u2.npy");
    let payload: Vec<u8> = [7u16, 65535].iter().flat_map(|v| v.to_le_bytes()).collect();
    std::fs::write(
        &u2,
        npy_bytes("{'descr': '<u2', 'fortran_order': False, 'shape': (1, 1, 2), }\n", &payload),
    )
    .unwrap();
    let movie = read_npy(&u2).unwrap();
    assert_eq!(movie[[0, 0, 1]], 65535.0);
}

#[test]
fn test_npy_rejects_unsupported_dtype() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c16.npy");
    std::fs::write(
        &path,
        npy_bytes(
            "{'descr': '<c16', 'fortran_order': False, 'shape': (1, 1, 1), }\n",
            &[0u8; 16],
        ),
    )
    .unwrap();
    assert!(matches!(read_npy(&path), Err(SpyboatError::InvalidNpy(_))));
}

#[test]
fn test_npy_rejects_wrong_rank() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vec.npy");
    std::fs::write(
        &path,
        npy_bytes("{'descr': '|u1', 'fortran_order': False, 'shape': (3,), }\n", &[1, 2, 3]),
    )
    .unwrap();
    assert!(matches!(
        read_npy(&path),
        Err(SpyboatError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_npy_rejects_oversized_shape_without_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.npy");
    std::fs::write(
        &path,
        npy_bytes(
            "{'descr': '<f8', 'fortran_order': False, 'shape': (2305843009213693952, 1, 1), }\n",
            &[],
        ),
    )
    .unwrap();
    assert!(matches!(read_npy(&path), Err(SpyboatError::InvalidNpy(_))));
}

#[test]
fn test_npy_rejects_truncated_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.npy");
    std::fs::write(
        &path,
        npy_bytes("{'descr': '<f4', 'fortran_order': False, 'shape': (1, 2, 2), }\n", &[0u8; 8]),
    )
    .unwrap();
    assert!(matches!(read_npy(&path), Err(SpyboatError::InvalidNpy(_))));
}

// ---------------------------------------------------------------------------
// Image sequences
// ---------------------------------------------------------------------------

#[test]
fn test_image_sequence_sorted_by_name() {
    let dir = TempDir::new().unwrap();
    write_gray_png(dir.path(), "frame_002.png", 3, 2, |_, _| 20);
    write_gray_png(dir.path(), "frame_000.png", 3, 2, |x, y| (x + 3 * y) as u8);
    write_gray_png(dir.path(), "frame_001.png", 3, 2, |_, _| 10);
    std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

    let files = list_frame_files(dir.path()).unwrap();
    assert_eq!(files.len(), 3);

    let movie = load_image_sequence(dir.path()).unwrap();
    assert_eq!(movie.dim(), (3, 2, 3));
    assert_eq!(movie[[0, 1, 2]], 5.0);
    assert_eq!(movie[[1, 0, 0]], 10.0);
    assert_eq!(movie[[2, 1, 1]], 20.0);
}

#[test]
fn test_image_sequence_rejects_mixed_sizes() {
    let dir = TempDir::new().unwrap();
    write_gray_png(dir.path(), "a.png", 4, 4, |_, _| 0);
    write_gray_png(dir.path(), "b.png", 5, 4, |_, _| 0);
    assert!(matches!(
        load_image_sequence(dir.path()),
        Err(SpyboatError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_empty_directory_is_empty_movie() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load_image_sequence(dir.path()),
        Err(SpyboatError::EmptyMovie)
    ));
}

// ---------------------------------------------------------------------------
// Format detection and output files
// ---------------------------------------------------------------------------

#[test]
fn test_detect_format() {
    let dir = TempDir::new().unwrap();
    assert_eq!(detect_format(dir.path()).unwrap(), SourceFormat::ImageSequence);
    assert_eq!(detect_format(Path::new("a/b.TIF")).unwrap(), SourceFormat::TiffStack);
    assert_eq!(detect_format(Path::new("b.tiff")).unwrap(), SourceFormat::TiffStack);
    assert_eq!(detect_format(Path::new("movie.npy")).unwrap(), SourceFormat::Npy);
    assert!(matches!(
        detect_format(Path::new("movie.ser")),
        Err(SpyboatError::UnsupportedSource(_))
    ));
}

#[test]
fn test_load_movie_reports_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cells.tif");
    let movie = Array3::from_shape_fn((2, 2, 2), |(t, r, c)| (t * 4 + r * 2 + c + 1) as f32);
    write_tiff_stack(&path, movie.view()).unwrap();

    let (loaded, info) = load_movie(&path).unwrap();
    assert_eq!(info.format, SourceFormat::TiffStack);
    assert_eq!(info.shape.dim(), (2, 2, 2));
    assert_eq!(loaded[[1, 1, 1]], 8.0);
}

fn sample_movies() -> WaveletMovies {
    let shape = MovieShape {
        frames: 3,
        height: 2,
        width: 2,
    };
    let mut movies = WaveletMovies::zeros(shape);
    movies.period.fill(24.0);
    movies.phase[[1, 0, 1]] = -1.25;
    movies
}

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_save_wavelet_movies_as_npy() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("nested").join("out");
    let movies = sample_movies();

    let written = save_wavelet_movies(&out, "cells", &movies, OutputFormat::Npy).unwrap();
    assert_eq!(
        file_names(&written),
        vec![
            "cells_phase.npy",
            "cells_period.npy",
            "cells_power.npy",
            "cells_amplitude.npy"
        ]
    );

    let period_path = output_path(&out, "cells", WaveletQuantity::Period, OutputFormat::Npy);
    let period = read_npy(&period_path).unwrap();
    assert!(period.iter().all(|&v| v == 24.0));
    let phase = read_npy(&written[0]).unwrap();
    assert_eq!(phase[[1, 0, 1]], -1.25);
    assert_eq!(phase.dim(), (3, 2, 2));
}

#[test]
fn test_save_wavelet_movies_as_float_tiff_stacks() {
    let dir = TempDir::new().unwrap();
    let movies = sample_movies();

    let written = save_wavelet_movies(dir.path(), "cells", &movies, OutputFormat::Tiff).unwrap();
    assert_eq!(
        file_names(&written),
        vec![
            "cells_phase.tif",
            "cells_period.tif",
            "cells_power.tif",
            "cells_amplitude.tif"
        ]
    );

    let info = read_stack_info(&written[0]).unwrap();
    assert_eq!(info.pages, 3);
    assert_eq!(info.bits_per_sample, 32);
    let (phase, _) = load_movie(&written[0]).unwrap();
    assert_eq!(phase[[1, 0, 1]], -1.25);
}
