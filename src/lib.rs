pub mod voxel_grid {
	pub mod error;
	pub mod point_set;
	pub mod grid;
	pub mod utils;
	pub mod info;
	pub mod mrc_output;
	pub mod render;
	pub mod pipeline;
}

pub use voxel_grid::error::{Result, VoxelError};
pub use voxel_grid::grid::VoxelGrid;
pub use voxel_grid::point_set::{Coordinate, Dataset, PointRecord, Sentinel, load, load_path};
