/*!
# dvdrip: Devices
*/

use crate::{
	BYTES_PER_BLOCK,
	RipError,
};
use std::{
	fs::{
		File,
		OpenOptions,
	},
	io::ErrorKind,
	os::unix::fs::FileExt,
	path::{
		Path,
		PathBuf,
	},
};



/// # Block Source.
///
/// The lower sector reader: something that can hand over 2048-byte logical
/// blocks by absolute disc position. The shipped implementation reads from a
/// (decrypted) disc image or block-device node; the trait exists so the
/// engine never has to care.
pub trait BlockSource {
	/// # Read Blocks.
	///
	/// Copy up to `count` whole blocks starting at `lba` into `buf`, which
	/// must hold at least `count * 2048` bytes. The engine never asks for
	/// more than `512` blocks at a time.
	///
	/// A return less than `count` signals a partial read; zero signals the
	/// end of the data.
	///
	/// ## Errors
	///
	/// An unrecoverable error at `lba`, where nothing at all could be read,
	/// is returned as [`RipError::DiscRead`].
	fn read_blocks(&mut self, lba: u64, count: u64, buf: &mut [u8])
	-> Result<u64, RipError>;
}



#[derive(Debug)]
/// # Image Source.
///
/// A [`BlockSource`] over a DVD image file or a readable block-device node.
/// Reads are positional, so the handle carries no cursor state of its own.
pub struct ImageSource(File);

impl ImageSource {
	/// # Open.
	///
	/// ## Errors
	///
	/// This will return an error if the path cannot be opened for reading.
	pub fn open<P>(src: P) -> Result<Self, RipError>
	where P: AsRef<Path> {
		let src = src.as_ref();
		File::open(src)
			.map(Self)
			.map_err(|_| RipError::Open(src.display().to_string()))
	}
}

impl BlockSource for ImageSource {
	fn read_blocks(&mut self, lba: u64, count: u64, buf: &mut [u8])
	-> Result<u64, RipError> {
		let Some(wanted) = usize::try_from(count).ok()
			.and_then(|n| n.checked_mul(BYTES_PER_BLOCK))
			.filter(|n| *n <= buf.len())
			else { return Err(RipError::Overflow); };
		let offset = lba.checked_mul(BYTES_PER_BLOCK as u64)
			.ok_or(RipError::Overflow)?;

		// Accumulate until the request is satisfied or the well runs dry.
		let mut have = 0;
		while have < wanted {
			match self.0.read_at(&mut buf[have..wanted], offset + have as u64) {
				Ok(0) => break,
				Ok(n) => { have += n; },
				Err(e) if e.kind() == ErrorKind::Interrupted => {},
				Err(_) =>
					// Whatever made it over before the error is still good;
					// only a completely empty result is unrecoverable.
					if have < BYTES_PER_BLOCK { return Err(RipError::DiscRead(lba)); }
					else { break; },
			}
		}

		// Stray trailing bytes don't count.
		Ok((have / BYTES_PER_BLOCK) as u64)
	}
}



#[derive(Debug)]
/// # Destination File.
///
/// A positional read/write wrapper around one output file. The descriptor
/// closes when this drops, error path or no.
pub(crate) struct DestFile {
	/// # Open Handle.
	file: File,

	/// # Path (for error messages).
	path: PathBuf,
}

impl DestFile {
	/// # Open Read/Write.
	///
	/// Open for reading and writing, creating the file if it does not
	/// already exist. Existing content is never truncated here.
	///
	/// ## Errors
	///
	/// This will return an error if the file cannot be opened.
	pub(crate) fn open_rw(path: &Path) -> Result<Self, RipError> {
		OpenOptions::new()
			.read(true)
			.write(true)
			.create(true)
			.open(path)
			.map(|file| Self { file, path: path.to_path_buf() })
			.map_err(|_| RipError::Open(path.display().to_string()))
	}

	/// # Open Read-Only.
	///
	/// ## Errors
	///
	/// This will return an error if the file cannot be opened.
	pub(crate) fn open_ro(path: &Path) -> Result<Self, RipError> {
		File::open(path)
			.map(|file| Self { file, path: path.to_path_buf() })
			.map_err(|_| RipError::Open(path.display().to_string()))
	}

	/// # File Length in Bytes.
	///
	/// ## Errors
	///
	/// This will return an error if the metadata cannot be read.
	pub(crate) fn len(&self) -> Result<u64, RipError> {
		self.file.metadata()
			.map(|m| m.len())
			.map_err(|_| RipError::Read(self.name()))
	}

	/// # Display Name.
	pub(crate) fn name(&self) -> String { self.path.display().to_string() }

	/// # Exact Positional Read.
	///
	/// Fill `buf` from the byte offset `offset`. Interrupted reads retry.
	///
	/// ## Errors
	///
	/// This will return an error if the region cannot be read in full.
	pub(crate) fn read_exact_at(&self, buf: &mut [u8], offset: u64)
	-> Result<(), RipError> {
		self.file.read_exact_at(buf, offset)
			.map_err(|_| RipError::Read(self.name()))
	}

	/// # Positional Block Write.
	///
	/// Write `buf`, some whole number of blocks, at the byte offset
	/// corresponding to `block`, looping until every byte has landed.
	///
	/// ## Errors
	///
	/// Short writes are fatal; this will return an error if the data cannot
	/// be written in full.
	pub(crate) fn write_blocks_at(&self, buf: &[u8], block: u64)
	-> Result<(), RipError> {
		let offset = block.checked_mul(BYTES_PER_BLOCK as u64)
			.ok_or(RipError::Overflow)?;
		self.file.write_all_at(buf, offset)
			.map_err(|_| RipError::Write(self.name()))
	}

	/// # Truncate/Extend.
	///
	/// ## Errors
	///
	/// This will return an error if the length cannot be changed.
	pub(crate) fn set_len(&self, bytes: u64) -> Result<(), RipError> {
		self.file.set_len(bytes)
			.map_err(|_| RipError::Write(self.name()))
	}
}



#[cfg(test)]
pub(crate) mod testsrc {
	/*!
	# Simulated Disc.
	*/

	use super::{
		BlockSource,
		BYTES_PER_BLOCK,
		RipError,
	};
	use std::collections::BTreeSet;

	/// # Memory-Backed Block Source.
	///
	/// A pretend disc for the tests: a flat byte vector, an optional set of
	/// unreadable blocks, and a log of every read request made.
	pub(crate) struct MemSource {
		/// # Disc Bytes.
		data: Vec<u8>,

		/// # Unreadable Blocks.
		bad: BTreeSet<u64>,

		/// # Read Log, `(lba, count)` per request.
		reads: Vec<(u64, u64)>,
	}

	impl MemSource {
		/// # New Instance.
		pub(crate) const fn new(data: Vec<u8>) -> Self {
			Self { data, bad: BTreeSet::new(), reads: Vec::new() }
		}

		/// # Mark a Block Unreadable.
		pub(crate) fn set_bad(&mut self, block: u64) { self.bad.insert(block); }

		/// # Total Blocks.
		pub(crate) fn blocks(&self) -> u64 {
			(self.data.len() / BYTES_PER_BLOCK) as u64
		}

		/// # Read Log.
		pub(crate) fn reads(&self) -> &[(u64, u64)] { &self.reads }
	}

	impl BlockSource for MemSource {
		fn read_blocks(&mut self, lba: u64, count: u64, buf: &mut [u8])
		-> Result<u64, RipError> {
			self.reads.push((lba, count));

			let total = self.blocks();
			if total <= lba { return Ok(0); }
			if self.bad.contains(&lba) { return Err(RipError::DiscRead(lba)); }

			// Stop short at the first bad block or the end of the disc.
			let mut take = u64::min(count, total - lba);
			for k in lba..lba + take {
				if self.bad.contains(&k) {
					take = k - lba;
					break;
				}
			}

			let from = lba as usize * BYTES_PER_BLOCK;
			let len = take as usize * BYTES_PER_BLOCK;
			buf[..len].copy_from_slice(&self.data[from..from + len]);
			Ok(take)
		}
	}
}
