//! Integration tests for the mandelbrot library
//!
//! Exercise the public API end to end: grid construction, evaluation,
//! frame sequences and file output.

use std::path::PathBuf;

use mandelbrot::{
    evaluate, evaluate_grid, frames, linspace, meshgrid, save_image, stream, AnimationWriter,
    CapSchedule, Error, Grid, Palette, Region, RenderContext,
};
use image::GenericImageView;
use num::Complex;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mandelbrot-{}-{}", std::process::id(), name))
}

#[test]
fn test_three_by_three_scenario() {
    let axis = linspace(-1.0, 1.0, 3);
    assert_eq!(axis, vec![-1.0, 0.0, 1.0]);
    let (real, imag) = meshgrid(&axis, &axis);

    let out = evaluate_grid(&real, &imag, 4).unwrap();
    assert_eq!(out.shape(), (3, 3));

    // centre sample 0+0i never escapes
    assert_eq!(out.get(1, 1), Some(&3));
    // corner sample 1+1i: 1+i -> 1+3i -> -7+7i
    assert_eq!(*real.get(2, 2).unwrap(), 1.0);
    assert_eq!(*imag.get(2, 2).unwrap(), 1.0);
    assert_eq!(out.get(2, 2), Some(&2));

    for row in 0..3 {
        for col in 0..3 {
            let c = Complex::new(*real.get(row, col).unwrap(), *imag.get(row, col).unwrap());
            assert_eq!(out.get(row, col), Some(&evaluate(c, 4).unwrap()));
        }
    }
}

#[test]
fn test_cells_stay_below_cap() {
    let (real, imag) = Region {
        width: 64,
        height: 48,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();

    for cap in [1, 2, 5, 37, 100] {
        let out = evaluate_grid(&real, &imag, cap).unwrap();
        assert_eq!(out.shape(), (48, 64));
        assert!(out.as_slice().iter().all(|&v| v <= cap - 1));
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    let (real, imag) = Region {
        width: 50,
        height: 50,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();

    let first = evaluate_grid(&real, &imag, 100).unwrap();
    let second = evaluate_grid(&real, &imag, 100).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_classic_view_has_interior_and_exterior() {
    let (real, imag) = Region {
        width: 81,
        height: 61,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();
    let out = evaluate_grid(&real, &imag, 100).unwrap();

    assert!(out.as_slice().contains(&99));
    assert!(out.as_slice().iter().any(|&v| v <= 2));
}

#[test]
fn test_mismatched_shapes_fail() {
    let real = Grid::from_vec(2, 2, vec![0.0; 4]).unwrap();
    let imag = Grid::from_vec(3, 3, vec![0.0; 9]).unwrap();
    let result = evaluate_grid(&real, &imag, 10);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_frame_caps_unfold() {
    let (real, imag) = Region {
        width: 20,
        height: 20,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();

    let caps: Vec<u32> = frames(&real, &imag, 20)
        .unwrap()
        .map(|frame| frame.unwrap().cap)
        .collect();
    assert_eq!(caps, CapSchedule::default().caps(20).unwrap());
    assert_eq!(caps[0], 1);
    assert!(caps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_png_output() {
    let (real, imag) = Region {
        width: 32,
        height: 24,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();
    let grid = evaluate_grid(&real, &imag, 50).unwrap();

    let path = temp_path("still.png");
    save_image(&grid, &path, Palette::Hot).unwrap();
    let written = image::open(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written.dimensions(), (32, 24));
}

#[test]
fn test_gif_output() {
    let (real, imag) = Region {
        width: 16,
        height: 16,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();

    let path = temp_path("sweep.gif");
    let mut writer =
        AnimationWriter::create(&path, RenderContext::new(Palette::Magma), 100).unwrap();
    let written = stream(frames(&real, &imag, 5).unwrap(), &mut writer).unwrap();
    assert_eq!(written, 5);
    assert_eq!(writer.finish().unwrap(), 5);

    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(bytes.last(), Some(&0x3b));
}

#[test]
fn test_zero_frame_gif_is_rejected() {
    let (real, imag) = Region {
        width: 8,
        height: 8,
        ..Region::default()
    }
    .coordinate_grids()
    .unwrap();

    let path = temp_path("empty.gif");
    let mut writer =
        AnimationWriter::create(&path, RenderContext::new(Palette::Magma), 100).unwrap();
    assert_eq!(stream(frames(&real, &imag, 0).unwrap(), &mut writer).unwrap(), 0);
    assert!(matches!(writer.finish(), Err(Error::InvalidInput(_))));
    assert!(!path.exists());
}
