//! Point-set files: comma separated integer triples where the final row is a
//! sentinel carrying `(lattice_dimension, point_count, reserved)` instead of a
//! coordinate.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::voxel_grid::error::{Result, VoxelError};

/// One lattice position. Signed so that bad input reaches the grid bound check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
	pub x: i64,
	pub y: i64,
	pub z: i64,
}

impl Coordinate {
	pub const fn new(x: i64, y: i64, z: i64) -> Self {
		Self { x, y, z }
	}

	/// Axis values in x, y, z order
	pub fn axes(&self) -> [i64; 3] {
		[self.x, self.y, self.z]
	}
}

impl fmt::Display for Coordinate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {}, {})", self.x, self.y, self.z)
	}
}

/// Grid metadata stored in the last row of a point-set file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
	pub lattice_dimension: i64,
	pub point_count: i64,
	/// Never interpreted. Producers write the lattice dimension here again.
	pub reserved: i64,
}

/// A row of a point-set file, tagged by its position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRecord {
	Data(Coordinate),
	Sentinel(Sentinel),
}

/// Occupied lattice positions plus the sentinel that described them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
	points: Vec<Coordinate>,
	sentinel: Sentinel,
}

impl Dataset {
	/// Build a dataset directly; the declared count is the number of points.
	pub fn new(points: Vec<Coordinate>, lattice_dimension: i64) -> Self {
		let sentinel = Sentinel {
			lattice_dimension,
			point_count: points.len() as i64,
			reserved: lattice_dimension,
		};
		Self { points, sentinel }
	}

	/// Data points in file order
	pub fn points(&self) -> &[Coordinate] {
		&self.points
	}

	pub fn lattice_dimension(&self) -> i64 {
		self.sentinel.lattice_dimension
	}

	pub fn point_count(&self) -> usize {
		self.points.len()
	}

	pub fn sentinel(&self) -> Sentinel {
		self.sentinel
	}

	/// The tagged record view, data rows first and the sentinel last
	pub fn records(&self) -> impl Iterator<Item = PointRecord> + '_ {
		self.points
			.iter()
			.copied()
			.map(PointRecord::Data)
			.chain(std::iter::once(PointRecord::Sentinel(self.sentinel)))
	}
}

/// Open `path` and load it as a point set.
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset> {
	let path = path.as_ref();
	let origin = path.display().to_string();
	let file = File::open(path).map_err(|source| VoxelError::Io {
		origin: origin.clone(),
		source,
	})?;
	load_named(file, &origin)
}

/// Load a point set from any reader. The last row is taken as the sentinel.
pub fn load<R: Read>(source: R) -> Result<Dataset> {
	load_named(source, "<input>")
}

fn load_named<R: Read>(source: R, origin: &str) -> Result<Dataset> {
	let mut rows = read_rows(source, origin)?;

	let [lattice_dimension, point_count, reserved] = rows.pop().ok_or(VoxelError::EmptySource)?;
	let sentinel = Sentinel {
		lattice_dimension,
		point_count,
		reserved,
	};

	let actual = rows.len();
	if usize::try_from(point_count).ok() != Some(actual) {
		return Err(VoxelError::CountMismatch {
			declared: point_count,
			actual,
		});
	}

	let points = rows
		.into_iter()
		.map(|[x, y, z]| Coordinate::new(x, y, z))
		.collect();

	Ok(Dataset { points, sentinel })
}

fn read_rows<R: Read>(mut source: R, origin: &str) -> Result<Vec<[i64; 3]>> {
	let mut bytes = Vec::new();
	source.read_to_end(&mut bytes).map_err(|source| VoxelError::Io {
		origin: origin.to_string(),
		source,
	})?;

	let mut reader = ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.quoting(false)
		.trim(Trim::All)
		.from_reader(bytes.as_slice());

	let mut rows = Vec::new();
	let mut record = StringRecord::new();
	loop {
		let read = reader.read_record(&mut record);
		let row = line_of(&bytes, reader.position().byte());
		match read {
			Ok(true) => {}
			Ok(false) => break,
			Err(err) => {
				let reason = err.to_string();
				return Err(match err.into_kind() {
					csv::ErrorKind::Io(source) => VoxelError::Io {
						origin: origin.to_string(),
						source,
					},
					_ => VoxelError::MalformedRow { row, reason },
				});
			}
		}

		// whitespace-only line
		if record.len() == 1 && record[0].is_empty() {
			continue;
		}
		rows.push(parse_triple(&record, row)?);
	}
	Ok(rows)
}

/// 0-based file line of the record the reader finished at byte `end`.
/// csv skips blank lines itself, so line numbers come from the raw bytes.
fn line_of(bytes: &[u8], end: u64) -> usize {
	let end = usize::try_from(end).map_or(bytes.len(), |end| end.min(bytes.len()));
	let mut head = &bytes[..end];
	if let [rest @ .., b'\n' | b'\r'] = head {
		head = rest;
	}
	head.iter().filter(|&&b| b == b'\n').count()
}

fn parse_triple(record: &StringRecord, row: usize) -> Result<[i64; 3]> {
	if record.len() != 3 {
		return Err(VoxelError::MalformedRow {
			row,
			reason: format!("expected 3 fields, found {}", record.len()),
		});
	}

	let mut triple = [0i64; 3];
	for (slot, field) in triple.iter_mut().zip(record.iter()) {
		*slot = field.parse().map_err(|_| VoxelError::MalformedRow {
			row,
			reason: format!("'{field}' is not an integer"),
		})?;
	}
	Ok(triple)
}
