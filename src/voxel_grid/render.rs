//! Presentation sinks for built grids.
//!
//! Window placement and styling travel with each call in a `DisplayConfig`;
//! renderers keep no figure state between calls.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::voxel_grid::grid::VoxelGrid;

/// Per-call presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
	pub title: String,
	/// Window placement hint in screen pixels, `+x+y` style
	pub position: (i32, i32),
	pub axis_labels: [String; 3],
	pub show_axes: bool,
	pub edge_color: String,
}

impl DisplayConfig {
	pub fn new(title: impl Into<String>, position: (i32, i32)) -> Self {
		Self {
			title: title.into(),
			position,
			axis_labels: ["X".to_string(), "Y".to_string(), "Z".to_string()],
			show_axes: false,
			edge_color: "k".to_string(),
		}
	}

	/// Left window of the side-by-side comparison
	pub fn original() -> Self {
		Self::new("Original", (50, 100))
	}

	/// Right window of the side-by-side comparison
	pub fn spherified() -> Self {
		Self::new("Spherified", (750, 100))
	}

	/// Geometry string in `+x+y` form
	pub fn geometry(&self) -> String {
		format!("+{}+{}", self.position.0, self.position.1)
	}

	/// File-name friendly form of the title
	pub fn slug(&self) -> String {
		let slug: String = self
			.title
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
			.collect();
		if slug.is_empty() { "grid".to_string() } else { slug }
	}
}

/// Terminal sink for a finished grid. Nothing is returned to the caller.
pub trait Renderer {
	fn render(&mut self, grid: &VoxelGrid, config: &DisplayConfig) -> Result<()>;
}

/// Writes each grid to `<dir>/<slug>.mrc`
#[derive(Debug, Clone)]
pub struct MrcExport {
	pub dir: PathBuf,
}

impl MrcExport {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn path_for(&self, config: &DisplayConfig) -> PathBuf {
		self.dir.join(format!("{}.mrc", config.slug()))
	}
}

impl Renderer for MrcExport {
	fn render(&mut self, grid: &VoxelGrid, config: &DisplayConfig) -> Result<()> {
		let path = self.path_for(config);
		let labels = [
			config.title.clone(),
			format!("position {}", config.geometry()),
			format!("edges {}", config.edge_color),
		];
		grid.write_to_mrc_file(&path, &labels)
			.with_context(|| format!("writing {}", path.display()))
	}
}

/// Text rendering, one block per z slice with y rows printed top-down
pub struct SliceRenderer<W: Write> {
	out: W,
}

impl<W: Write> SliceRenderer<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

impl<W: Write> Renderer for SliceRenderer<W> {
	fn render(&mut self, grid: &VoxelGrid, config: &DisplayConfig) -> Result<()> {
		let side = grid.side();
		let out = &mut self.out;

		writeln!(out, "== {} ==", config.title)?;
		writeln!(out, "position {}  filled {}/{}", config.geometry(), grid.count_filled(), grid.total_voxels())?;
		if config.show_axes {
			let [x, y, z] = &config.axis_labels;
			writeln!(out, "axes {x} -> right, {y} -> up, {z} -> slice")?;
		}

		let mut row = String::with_capacity(side);
		for z in 0..side {
			writeln!(out, "z = {z}")?;
			for y in (0..side).rev() {
				row.clear();
				row.extend((0..side).map(|x| if grid.is_filled(x, y, z) { '#' } else { '.' }));
				writeln!(out, "{row}")?;
			}
			writeln!(out)?;
		}
		out.flush().context("flushing slice output")?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::voxel_grid::point_set::{Coordinate, Dataset};

	#[test]
	fn test_slice_rendering() {
		let dataset = Dataset::new(vec![Coordinate::new(0, 0, 0), Coordinate::new(1, 1, 1)], 2);
		let grid = VoxelGrid::build(&dataset).unwrap();

		let mut renderer = SliceRenderer::new(Vec::new());
		renderer.render(&grid, &DisplayConfig::original()).unwrap();
		let text = String::from_utf8(renderer.into_inner()).unwrap();

		let expected = "== Original ==\n\
			position +50+100  filled 2/8\n\
			z = 0\n\
			..\n\
			#.\n\
			\n\
			z = 1\n\
			.#\n\
			..\n\
			\n";
		assert_eq!(text, expected);
	}

	#[test]
	fn test_axis_labels_shown_on_request() {
		let grid = VoxelGrid::build(&Dataset::new(Vec::new(), 1)).unwrap();
		let mut config = DisplayConfig::spherified();
		config.show_axes = true;

		let mut renderer = SliceRenderer::new(Vec::new());
		renderer.render(&grid, &config).unwrap();
		let text = String::from_utf8(renderer.into_inner()).unwrap();
		assert!(text.contains("position +750+100"));
		assert!(text.contains("axes X -> right, Y -> up, Z -> slice"));
	}

	#[test]
	fn test_slug() {
		assert_eq!(DisplayConfig::new("High Res #2", (0, 0)).slug(), "high_res__2");
		assert_eq!(DisplayConfig::new("", (0, 0)).slug(), "grid");
	}
}
