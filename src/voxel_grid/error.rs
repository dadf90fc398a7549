//! Error taxonomy for loading point sets and building voxel grids

use thiserror::Error;

use crate::voxel_grid::point_set::Coordinate;

/// Terminal failures for a single dataset. None of these are retried.
#[derive(Error, Debug)]
pub enum VoxelError {
	/// The source held no rows at all, not even the sentinel
	#[error("point source is empty: expected at least the sentinel row")]
	EmptySource,

	/// A row did not parse as exactly three integers
	#[error("malformed row {row}: {reason}")]
	MalformedRow { row: usize, reason: String },

	/// Sentinel point count disagrees with the number of data rows
	#[error("sentinel declares {declared} points but {actual} data rows precede it")]
	CountMismatch { declared: i64, actual: usize },

	/// Lattice dimension is zero or negative
	#[error("invalid lattice dimension {dimension}: must be greater than zero")]
	InvalidDimension { dimension: i64 },

	/// The cubic cell count does not fit in addressable memory
	#[error("lattice dimension {dimension} is too large: {dimension}^3 cells cannot be addressed")]
	GridTooLarge { dimension: i64 },

	/// A coordinate falls outside `[0, bound)` on some axis
	#[error("coordinate {coordinate} is outside the grid bound {bound}")]
	OutOfBounds { coordinate: Coordinate, bound: i64 },

	/// Opening or reading the source failed
	#[error("failed to read {origin}: {source}")]
	Io {
		origin: String,
		#[source]
		source: std::io::Error,
	},
}

/// Result alias for point-set and grid operations
pub type Result<T> = std::result::Result<T, VoxelError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = VoxelError::CountMismatch { declared: 5, actual: 4 };
		assert_eq!(err.to_string(), "sentinel declares 5 points but 4 data rows precede it");

		let err = VoxelError::OutOfBounds {
			coordinate: Coordinate::new(3, 0, 1),
			bound: 3,
		};
		assert_eq!(err.to_string(), "coordinate (3, 0, 1) is outside the grid bound 3");
	}
}
