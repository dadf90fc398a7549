use std::mem::size_of;

use bitvec::prelude::BitVec;

use crate::voxel_grid::grid::VoxelGrid;
use crate::voxel_grid::point_set::Coordinate;

/// Format large numbers with KB, MB, GB, TB suffixes
pub fn format_bytes(bytes: usize) -> String {
	const KB: usize = 1024;
	const MB: usize = KB * 1024;
	const GB: usize = MB * 1024;
	const TB: usize = GB * 1024;

	if bytes >= TB {
		format!("{:.2} TB", bytes as f64 / TB as f64)
	} else if bytes >= GB {
		format!("{:.2} GB", bytes as f64 / GB as f64)
	} else if bytes >= MB {
		format!("{:.2} MB", bytes as f64 / MB as f64)
	} else if bytes >= KB {
		format!("{:.2} KB", bytes as f64 / KB as f64)
	} else {
		format!("{} bytes", bytes)
	}
}

impl VoxelGrid {
	/// Log memory usage at debug level
	pub fn report_memory(&self) {
		let struct_overhead = size_of::<Self>() - size_of::<BitVec>();
		let bitvec_bytes = self.bits().capacity() / 8;

		log::debug!(
			"grid {}^3: {:e} voxels, overhead {}, bits {}, total {}",
			self.side(),
			self.total_voxels() as f64,
			format_bytes(struct_overhead),
			format_bytes(bitvec_bytes),
			format_bytes(struct_overhead + bitvec_bytes),
		);
	}

	/// Convert (x, y, z) to a linear index
	#[inline]
	pub fn xyz_to_index(&self, x: usize, y: usize, z: usize) -> usize {
		let side = self.side();
		x + y * side + z * side * side
	}

	/// Convert a linear index back to (x, y, z)
	#[inline]
	pub fn index_to_xyz(&self, index: usize) -> (usize, usize, usize) {
		let side = self.side();
		let z = index / (side * side);
		let y = (index % (side * side)) / side;
		let x = index % side;
		(x, y, z)
	}

	/// Voxel value by (x, y, z); anything outside the grid reads as empty
	#[inline]
	pub fn is_filled(&self, x: usize, y: usize, z: usize) -> bool {
		let side = self.side();
		if x >= side || y >= side || z >= side {
			return false;
		}
		self.bits()[self.xyz_to_index(x, y, z)]
	}

	/// Count the number of filled voxels
	pub fn count_filled(&self) -> usize {
		self.bits().count_ones()
	}

	/// Filled voxels in linear-index order
	pub fn filled_coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
		self.bits().iter_ones().map(move |index| {
			let (x, y, z) = self.index_to_xyz(index);
			Coordinate::new(x as i64, y as i64, z as i64)
		})
	}
}
