use bitvec::order::Lsb0;
use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;

use crate::voxel_grid::error::{Result, VoxelError};
use crate::voxel_grid::point_set::{Coordinate, Dataset};

/// Cubic occupancy grid with bit-packed storage.
/// Only `build` writes to it, so a grid is immutable once handed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
	side: usize,         // Voxels along each axis
	total_voxels: usize, // side^3
	data: BitVec,        // 1-bit per voxel, x fastest
}

impl VoxelGrid {
	/// Build the occupancy grid for `dataset`, failing on the first point outside it
	pub fn build(dataset: &Dataset) -> Result<Self> {
		let dimension = dataset.lattice_dimension();
		if dimension <= 0 {
			return Err(VoxelError::InvalidDimension { dimension });
		}
		let side = usize::try_from(dimension).map_err(|_| VoxelError::InvalidDimension { dimension })?;
		let total_voxels = Self::cell_count(side).ok_or(VoxelError::GridTooLarge { dimension })?;

		let mut grid = Self::empty(side, total_voxels);
		for point in dataset.points() {
			let [x, y, z] = Self::checked_axes(point, dimension)?;
			let index = grid.xyz_to_index(x, y, z);
			grid.data.set(index, true);
		}

		log::info!("{side} x {side} x {side} grid created");
		Ok(grid)
	}

	/// side^3, or `None` when it overflows or exceeds what a `BitVec` can address
	fn cell_count(side: usize) -> Option<usize> {
		side.checked_mul(side)
			.and_then(|area| area.checked_mul(side))
			.filter(|&total| total <= BitSlice::<usize, Lsb0>::MAX_BITS)
	}

	/// Allocate a grid with every voxel set to `false`
	fn empty(side: usize, total_voxels: usize) -> Self {
		Self {
			side,
			total_voxels,
			data: BitVec::repeat(false, total_voxels), // Pre-allocate full grid
		}
	}

	fn checked_axes(point: &Coordinate, bound: i64) -> Result<[usize; 3]> {
		let mut out = [0usize; 3];
		for (slot, value) in out.iter_mut().zip(point.axes()) {
			if !(0..bound).contains(&value) {
				return Err(VoxelError::OutOfBounds {
					coordinate: *point,
					bound,
				});
			}
			*slot = value as usize;
		}
		Ok(out)
	}

	pub fn side(&self) -> usize {
		self.side
	}

	pub fn total_voxels(&self) -> usize {
		self.total_voxels
	}

	/// Raw bit storage, linear index `x + y*side + z*side*side`
	pub fn bits(&self) -> &BitVec {
		&self.data
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dataset(points: &[(i64, i64, i64)], dimension: i64) -> Dataset {
		Dataset::new(
			points.iter().map(|&(x, y, z)| Coordinate::new(x, y, z)).collect(),
			dimension,
		)
	}

	#[test]
	fn test_diagonal_grid() {
		let grid = VoxelGrid::build(&dataset(&[(0, 0, 0), (1, 1, 1), (2, 2, 2)], 3)).unwrap();
		assert_eq!(grid.side(), 3);
		assert_eq!(grid.total_voxels(), 27);
		assert_eq!(grid.count_filled(), 3);
		for x in 0..3 {
			for y in 0..3 {
				for z in 0..3 {
					assert_eq!(grid.is_filled(x, y, z), x == y && y == z, "({x}, {y}, {z})");
				}
			}
		}
	}

	#[test]
	fn test_invalid_dimension() {
		for dimension in [0, -2] {
			match VoxelGrid::build(&dataset(&[], dimension)) {
				Err(VoxelError::InvalidDimension { dimension: d }) => assert_eq!(d, dimension),
				other => panic!("expected InvalidDimension, got {other:?}"),
			}
		}
	}

	#[test]
	fn test_oversized_dimension_rejected() {
		for dimension in [3_000_000, i64::MAX] {
			match VoxelGrid::build(&dataset(&[], dimension)) {
				Err(VoxelError::GridTooLarge { dimension: d }) => assert_eq!(d, dimension),
				other => panic!("expected GridTooLarge, got {other:?}"),
			}
		}
		assert_eq!(VoxelGrid::cell_count(4), Some(64));
	}

	#[test]
	fn test_bounds() {
		assert!(VoxelGrid::build(&dataset(&[(3, 3, 3)], 4)).is_ok());

		for point in [(4, 0, 0), (0, 4, 0), (0, 0, 4), (-1, 0, 0)] {
			match VoxelGrid::build(&dataset(&[(0, 0, 0), point], 4)) {
				Err(VoxelError::OutOfBounds { coordinate, bound }) => {
					assert_eq!(coordinate, Coordinate::new(point.0, point.1, point.2));
					assert_eq!(bound, 4);
				}
				other => panic!("expected OutOfBounds for {point:?}, got {other:?}"),
			}
		}
	}

	#[test]
	fn test_first_violation_reported() {
		let result = VoxelGrid::build(&dataset(&[(5, 0, 0), (0, 6, 0)], 2));
		assert!(matches!(
			result,
			Err(VoxelError::OutOfBounds { coordinate: Coordinate { x: 5, y: 0, z: 0 }, .. })
		));
	}

	#[test]
	fn test_duplicates_are_idempotent() {
		let grid = VoxelGrid::build(&dataset(&[(1, 0, 1), (1, 0, 1), (0, 0, 0)], 2)).unwrap();
		assert_eq!(grid.count_filled(), 2);
	}

	#[test]
	fn test_build_twice_identical() {
		let data = dataset(&[(0, 1, 2), (2, 1, 0), (1, 1, 1)], 3);
		let a = VoxelGrid::build(&data).unwrap();
		let b = VoxelGrid::build(&data).unwrap();
		assert_eq!(a, b);
	}
}
