//! File-backed loading and grid construction

use std::collections::BTreeSet;
use std::io::Write;

use stag_voxel_view::{Coordinate, Dataset, VoxelError, VoxelGrid, load, load_path};
use tempfile::NamedTempFile;

fn write_points(contents: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().expect("Failed to create temp file");
	file.write_all(contents.as_bytes()).expect("Failed to write temp file");
	file
}

/// Rows laid out the way the spherify tool writes them
#[test]
fn test_load_path_producer_format() {
	let file = write_points("0, 0, 0\n1, 1, 1\n2, 2, 2\n3, 3, 3\n");
	let dataset = load_path(file.path()).unwrap();

	let grid = VoxelGrid::build(&dataset).unwrap();
	assert_eq!(grid.side(), 3);
	assert_eq!(grid.count_filled(), 3);
	assert_eq!(grid.total_voxels() - grid.count_filled(), 24);
	assert!(grid.is_filled(1, 1, 1));
	assert!(!grid.is_filled(1, 1, 0));
}

#[test]
fn test_missing_file_is_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let result = load_path(dir.path().join("nope.txt"));
	match result {
		Err(VoxelError::Io { origin, .. }) => assert!(origin.ends_with("nope.txt")),
		other => panic!("expected Io error, got {other:?}"),
	}
}

/// N unique in-bounds points come back as exactly N filled cells
#[test]
fn test_unique_points_fill_exactly() {
	let mut points = Vec::new();
	for x in (0..6).step_by(2) {
		for y in 0..6 {
			points.push(Coordinate::new(x, y, (x + y) % 6));
		}
	}
	let expected: BTreeSet<Coordinate> = points.iter().copied().collect();

	let mut text = String::new();
	for p in &points {
		text.push_str(&format!("{}, {}, {}\n", p.x, p.y, p.z));
	}
	text.push_str(&format!("6, {}, 6\n", points.len()));

	let dataset = load(text.as_bytes()).unwrap();
	assert_eq!(dataset.points(), points.as_slice());

	let grid = VoxelGrid::build(&dataset).unwrap();
	assert_eq!(grid.count_filled(), dataset.point_count());
	let filled: BTreeSet<Coordinate> = grid.filled_coordinates().collect();
	assert_eq!(filled, expected);
}

#[test]
fn test_duplicates_reduce_count_without_error() {
	let dataset = load("1,1,1\n1,1,1\n0,1,0\n2,3,2\n".as_bytes()).unwrap();
	let grid = VoxelGrid::build(&dataset).unwrap();
	assert_eq!(dataset.point_count(), 3);
	assert_eq!(grid.count_filled(), 2);
}

#[test]
fn test_boundary_coordinates() {
	let edge = Dataset::new(vec![Coordinate::new(4, 4, 4)], 5);
	assert!(VoxelGrid::build(&edge).unwrap().is_filled(4, 4, 4));

	let past = Dataset::new(vec![Coordinate::new(0, 5, 0)], 5);
	assert!(matches!(
		VoxelGrid::build(&past),
		Err(VoxelError::OutOfBounds { bound: 5, .. })
	));
}

#[test]
fn test_declared_count_checked() {
	let result = load("0,0,0\n1,0,0\n0,1,0\n0,0,1\n2,5,2\n".as_bytes());
	assert!(matches!(
		result,
		Err(VoxelError::CountMismatch { declared: 5, actual: 4 })
	));
}
