//! Load, build and render each dataset of a comparison run

use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::voxel_grid::grid::VoxelGrid;
use crate::voxel_grid::point_set;
use crate::voxel_grid::render::{DisplayConfig, Renderer};

/// One dataset of the comparison and where its window goes
#[derive(Debug, Clone)]
pub struct DatasetSource {
	pub path: PathBuf,
	pub display: DisplayConfig,
}

impl DatasetSource {
	pub fn new(path: impl Into<PathBuf>, display: DisplayConfig) -> Self {
		Self {
			path: path.into(),
			display,
		}
	}

	pub fn label(&self) -> &str {
		&self.display.title
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
	/// Build the datasets on separate threads
	pub parallel: bool,
	/// Log a failed dataset and carry on with the rest
	pub keep_going: bool,
	/// Hide the progress bar
	pub quiet: bool,
}

#[derive(Debug, Default)]
pub struct RunSummary {
	pub rendered: Vec<String>,
	pub failed: Vec<(String, anyhow::Error)>,
}

/// Load one point-set file and build its grid
pub fn load_and_build(source: &DatasetSource) -> Result<VoxelGrid> {
	let label = source.label();
	let dataset = point_set::load_path(&source.path)
		.with_context(|| format!("loading {} positions from {}", label, source.path.display()))?;
	log::info!(
		"{} dipoles imported successfully from {} image",
		dataset.point_count(),
		label
	);

	let grid = VoxelGrid::build(&dataset)
		.with_context(|| format!("building {} grid from {}", label, source.path.display()))?;
	grid.report_memory();
	Ok(grid)
}

/// Build every grid, in input order. Parallel and sequential results match.
pub fn build_all(sources: &[DatasetSource], parallel: bool) -> Vec<Result<VoxelGrid>> {
	if !parallel {
		return sources.iter().map(load_and_build).collect();
	}

	thread::scope(|scope| {
		let handles: Vec<_> = sources
			.iter()
			.map(|source| scope.spawn(move || load_and_build(source)))
			.collect();
		handles
			.into_iter()
			.zip(sources)
			.map(|(handle, source)| {
				handle
					.join()
					.unwrap_or_else(|_| Err(anyhow::anyhow!("{} worker panicked", source.label())))
			})
			.collect()
	})
}

/// Build all grids and hand each one to `renderer` with its display settings.
/// Without `keep_going` the first failure, in input order, aborts the run.
pub fn run(sources: &[DatasetSource], renderer: &mut dyn Renderer, options: RunOptions) -> Result<RunSummary> {
	let pb = if options.quiet {
		ProgressBar::hidden()
	} else {
		ProgressBar::new(sources.len() as u64)
	};
	if let Ok(style) = ProgressStyle::default_bar().template("Rendering grids: [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
		pb.set_style(style.progress_chars("#>-"));
	}

	let mut summary = RunSummary::default();
	for (source, built) in sources.iter().zip(build_all(sources, options.parallel)) {
		let label = source.label().to_string();
		pb.set_message(label.clone());

		let rendered = built.and_then(|grid| {
			renderer
				.render(&grid, &source.display)
				.with_context(|| format!("rendering {} grid", label))
		});
		pb.inc(1);

		match rendered {
			Ok(()) => {
				log::info!("{} image loaded", label);
				summary.rendered.push(label);
			}
			Err(err) if options.keep_going => {
				log::error!("skipping {}: {:#}", label, err);
				summary.failed.push((label, err));
			}
			Err(err) => {
				pb.abandon();
				return Err(err);
			}
		}
	}

	pb.finish_and_clear();
	Ok(summary)
}
