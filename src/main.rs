use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use stag_voxel_view::voxel_grid::info;
use stag_voxel_view::voxel_grid::pipeline::{self, DatasetSource, RunOptions};
use stag_voxel_view::voxel_grid::render::{DisplayConfig, MrcExport, Renderer, SliceRenderer};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
	/// Text slices on stdout
	Slices,
	/// One MRC volume per dataset in --output-dir
	Mrc,
}

/// Compare original and spherified dipole lattices as voxel grids
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
	/// Point-set file for the original lattice
	#[arg(long, default_value = "original.txt")]
	original: PathBuf,

	/// Point-set file for the spherified lattice
	#[arg(long, default_value = "high_res.txt")]
	spherified: PathBuf,

	#[arg(long, value_enum, default_value_t = Format::Slices)]
	format: Format,

	/// Directory for MRC output
	#[arg(long, default_value = ".")]
	output_dir: PathBuf,

	/// Build both grids concurrently
	#[arg(long)]
	parallel: bool,

	/// Render the remaining dataset when one fails
	#[arg(long)]
	keep_going: bool,

	/// Hide the progress bar
	#[arg(short, long)]
	quiet: bool,
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();

	info::print_banner();
	info::print_compile_info();

	let sources = [
		DatasetSource::new(&cli.original, DisplayConfig::original()),
		DatasetSource::new(&cli.spherified, DisplayConfig::spherified()),
	];
	let options = RunOptions {
		parallel: cli.parallel,
		keep_going: cli.keep_going,
		quiet: cli.quiet,
	};

	let mut renderer: Box<dyn Renderer> = match cli.format {
		Format::Slices => Box::new(SliceRenderer::new(io::stdout().lock())),
		Format::Mrc => Box::new(MrcExport::new(&cli.output_dir)),
	};

	match pipeline::run(&sources, renderer.as_mut(), options) {
		Ok(summary) if summary.failed.is_empty() => ExitCode::SUCCESS,
		Ok(_) => ExitCode::FAILURE,
		Err(err) => {
			log::error!("{:#}", err);
			ExitCode::FAILURE
		}
	}
}
