#![allow(clippy::unwrap_used)]

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use approx::assert_relative_eq;
use geodesis::error::MeasureError;
use geodesis::mask::MaskPreset;
use geodesis::math::{Position, UNDEFINED_POSITION};
use geodesis::measure::{Calibration, DiameterParams, GeodesicDiameter};
use geodesis::progress::Monitor;
use geodesis::raster::{Dims, Raster};
use geodesis::transform::{GeodesicDistanceTransform, GeodesicParams, PropagationStrategy};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The twelve edges of the cube spanning `[1, 9]` inside an 11³ volume.
fn cube_edges() -> Raster<u32> {
    let mut labels = Raster::new(Dims::new_3d(11, 11, 11), 0_u32).unwrap();
    let on_face = |c: i32| c == 1 || c == 9;
    for z in 1..=9 {
        for y in 1..=9 {
            for x in 1..=9 {
                let faces = [x, y, z].into_iter().filter(|&c| on_face(c)).count();
                if faces >= 2 {
                    labels.set(Position::new(x, y, z), 1).unwrap();
                }
            }
        }
    }
    labels
}

#[test]
fn cube_edges_opposite_corner() {
    init_tracing();
    let labels = cube_edges();
    let mut markers = Raster::new(labels.dims(), false).unwrap();
    markers.set(Position::new(1, 1, 1), true).unwrap();

    let mask = MaskPreset::CityBlock.mask_3d::<u16>().unwrap();
    let map = GeodesicDistanceTransform::new(&mask)
        .execute(&markers, &labels)
        .unwrap();
    assert!(map.converged);
    assert_eq!(map.distances.get(Position::new(9, 9, 9)), Some(24));
    assert_eq!(map.distances.get(Position::new(9, 1, 1)), Some(8));
    assert_eq!(map.distances.get(Position::new(5, 5, 5)), Some(0));

    let wide = MaskPreset::CityBlock.mask_3d::<u32>().unwrap();
    let wavefront = GeodesicDistanceTransform::new(&wide)
        .with_params(GeodesicParams::default().with_strategy(PropagationStrategy::Wavefront))
        .execute(&markers, &labels)
        .unwrap();
    assert_eq!(wavefront.distances.get(Position::new(9, 9, 9)), Some(24));
}

#[test]
fn cube_edges_diameter() {
    init_tracing();
    let labels = cube_edges();
    let mask = MaskPreset::CityBlock.mask_3d::<u32>().unwrap();
    let out = GeodesicDiameter::new(&mask)
        .with_params(DiameterParams::default().with_paths(true))
        .execute(&labels)
        .unwrap();

    let r = &out.results[&1];
    assert_relative_eq!(r.diameter, 25.0);
    assert_relative_eq!(r.inner_radius, 1.0);
    let corners = [Position::new(1, 1, 1), Position::new(9, 9, 9)];
    assert!(corners.contains(&r.first_extremity));
    assert!(corners.contains(&r.second_extremity));

    // Diagonal moves may cut the corners of the skeleton.
    let path = r.path.as_ref().unwrap();
    assert!(path.len() > 2 && path.len() <= 25);
    assert_eq!(path.first(), Some(&r.second_extremity));
    assert_eq!(path.last(), Some(&r.first_extremity));
    for step in path.windows(2) {
        let d = step[1] - step[0];
        assert!(d.x.abs() <= 1 && d.y.abs() <= 1 && d.z.abs() <= 1);
        assert_eq!(labels.get(step[1]), Some(1));
        assert!(out.distance_map.get(step[1]) < out.distance_map.get(step[0]));
    }
    assert!(out.warnings.is_empty());
}

#[test]
fn estimator_end_to_end() {
    init_tracing();
    // 1: a 9-pixel bar, 2: an L, 3: split in two, 5: a lone pixel.
    let labels = Raster::from_rows(&[
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 2, 0, 0, 3, 3, 0, 3, 0, 5, 0],
        [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ])
    .unwrap();
    let mask = MaskPreset::Borgefors.mask_2d::<u16>().unwrap();
    let out = GeodesicDiameter::new(&mask)
        .with_params(DiameterParams::default().with_paths(true))
        .with_labels(&[1, 2, 3, 4, 5])
        .execute(&labels)
        .unwrap();
    assert!(!out.cancelled);
    assert_eq!(out.results.len(), 5);

    let bar = &out.results[&1];
    assert_relative_eq!(bar.diameter, 9.0);
    assert_eq!(bar.path.as_ref().map(Vec::len), Some(9));

    // Orthogonal, diagonal, orthogonal around the corner, plus one pixel.
    let corner = &out.results[&2];
    assert_relative_eq!(corner.diameter, (3.0 + 4.0 + 3.0 + 3.0) / 3.0);
    let ends = [corner.first_extremity, corner.second_extremity];
    assert!(ends.contains(&Position::new(1, 3, 0)));
    assert!(ends.contains(&Position::new(3, 5, 0)));

    let split = &out.results[&3];
    assert!(split.diameter.is_infinite());
    assert_eq!(split.path, Some(Vec::new()));

    let absent = &out.results[&4];
    assert!(absent.inner_radius.is_nan());
    assert_eq!(absent.center, UNDEFINED_POSITION);

    let lone = &out.results[&5];
    assert_relative_eq!(lone.diameter, 1.0);
    assert_eq!(lone.path.as_ref().map(Vec::len), Some(1));

    assert!(out.warnings.contains(&MeasureError::RegionNotFound { label: 3 }));
    assert!(out.warnings.contains(&MeasureError::RegionNotFound { label: 4 }));
    assert_eq!(out.warnings.len(), 2);

    let physical = out.calibrated(&Calibration::Uniform(2.0)).unwrap();
    assert_relative_eq!(physical[&1].diameter, 18.0);
    assert!(physical[&4].center.is_none());
}

#[test]
fn cancellation_stops_the_estimator() {
    init_tracing();
    let flag = Arc::new(AtomicBool::new(true));
    let monitor = Monitor::new().with_cancel_flag(Arc::clone(&flag));
    let params = DiameterParams::default()
        .with_paths(true)
        .with_geodesic(GeodesicParams::default().with_monitor(monitor));
    let mask = MaskPreset::Chessboard.mask_2d::<f32>().unwrap();
    let labels = Raster::from_rows(&[[0, 1, 1, 1, 0]]).unwrap();
    let out = GeodesicDiameter::new(&mask)
        .with_params(params)
        .execute(&labels)
        .unwrap();
    assert!(out.cancelled);
    assert!(out.results[&1].path.is_none());
    assert!(out.warnings.is_empty());
}

#[test]
fn long_bar_saturates_without_reading_as_disconnected() {
    init_tracing();
    let mut row = vec![1_u32; 22_000];
    row[0] = 0;
    let labels = Raster::from_rows(&[row]).unwrap();

    let narrow = MaskPreset::Borgefors.mask_2d::<u16>().unwrap();
    let out = GeodesicDiameter::new(&narrow).execute(&labels).unwrap();
    let capped = &out.results[&1];
    assert!(capped.diameter.is_finite());
    assert!(capped.diameter > 21_000.0);
    assert!(!out
        .warnings
        .contains(&MeasureError::RegionNotFound { label: 1 }));
    assert!(out.warnings.iter().any(|w| matches!(
        w,
        MeasureError::DistanceRangeExceeded { label: 1, .. }
    )));

    let wide = MaskPreset::Borgefors.mask_2d::<u32>().unwrap();
    let exact = GeodesicDiameter::new(&wide).execute(&labels).unwrap();
    assert_relative_eq!(exact.results[&1].diameter, 21_999.0);
    assert!(exact.warnings.is_empty());
}
