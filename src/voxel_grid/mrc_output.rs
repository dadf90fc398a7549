use std::fs::File;
use std::io::{self, BufWriter, Result, Write};
use std::path::Path;
use std::time::Instant;

use crate::voxel_grid::grid::VoxelGrid;

/// Header size in bytes: 56 words followed by ten 80-byte labels
pub const MRC_HEADER_BYTES: usize = 1024;

/// MRC-2000 header for a byte-mode cubic occupancy volume
#[derive(Debug, Clone)]
pub struct MrcHeader {
	side: i32,
	amean: f32,
	labels: Vec<String>,
}

impl MrcHeader {
	/// Header for `grid`; up to ten labels, each truncated to 80 bytes
	pub fn new(grid: &VoxelGrid, labels: &[String]) -> Result<Self> {
		let amean = if grid.total_voxels() == 0 {
			0.0
		} else {
			grid.count_filled() as f32 / grid.total_voxels() as f32
		};
		Ok(MrcHeader {
			side: side_word(grid.side())?,
			amean,
			labels: labels.iter().take(10).cloned().collect(),
		})
	}

	/// Write the 1024-byte header, little endian
	pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
		let side = self.side;
		let length = side as f32; // one lattice unit per voxel

		// nx ny nz, mode 0 (byte), start, sampling
		for word in [side, side, side, 0, 0, 0, 0, side, side, side] {
			w.write_all(&word.to_le_bytes())?;
		}
		// cell lengths and angles
		for value in [length, length, length, 90.0, 90.0, 90.0] {
			w.write_all(&value.to_le_bytes())?;
		}
		// axis mapping
		for word in [1i32, 2, 3] {
			w.write_all(&word.to_le_bytes())?;
		}
		// amin amax amean
		for value in [0.0f32, 1.0, self.amean] {
			w.write_all(&value.to_le_bytes())?;
		}
		// ispg nsymbt, 25 extra words
		w.write_all(&[0u8; 4 * 27])?;
		// origin
		w.write_all(&[0u8; 4 * 3])?;
		w.write_all(b"MAP ")?;
		w.write_all(&[0x44, 0x44, 0x00, 0x00])?; // little-endian machine stamp
		w.write_all(&0.0f32.to_le_bytes())?; // rms
		w.write_all(&(self.labels.len() as i32).to_le_bytes())?;

		for slot in 0..10 {
			let mut label = [0u8; 80];
			if let Some(text) = self.labels.get(slot) {
				label.fill(b' ');
				let bytes = text.as_bytes();
				let n = bytes.len().min(80);
				label[..n].copy_from_slice(&bytes[..n]);
			}
			w.write_all(&label)?;
		}
		Ok(())
	}
}

/// Grid side as a header word; MRC stores dimensions as i32
fn side_word(side: usize) -> Result<i32> {
	i32::try_from(side).map_err(|_| {
		io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("grid side {side} does not fit an MRC header word"),
		)
	})
}

impl VoxelGrid {
	/// Write the grid as an MRC volume, one byte (0 or 1) per voxel, x fastest
	pub fn write_mrc<W: Write>(&self, w: &mut W, labels: &[String]) -> Result<()> {
		MrcHeader::new(self, labels)?.write_to(w)?;

		let voxel_bytes: Vec<u8> = self.bits().iter().map(|bit| u8::from(*bit)).collect();
		w.write_all(&voxel_bytes)?;
		Ok(())
	}

	/// Save the grid as an MRC file and log the save time
	pub fn write_to_mrc_file(&self, path: &Path, labels: &[String]) -> Result<()> {
		let start_time = Instant::now();

		let mut file = BufWriter::new(File::create(path)?);
		self.write_mrc(&mut file, labels)?;
		file.flush()?;

		log::info!(
			"MRC file saved: {} ({:.3} s)",
			path.display(),
			start_time.elapsed().as_secs_f64()
		);
		Ok(())
	}
}
