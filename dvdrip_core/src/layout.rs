/*!
# dvdrip: Disc Layout
*/

use crate::{
	BYTES_PER_BLOCK,
	RipError,
	VOB_MAX_PARTS,
	VOB_PART_BLOCKS,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Title Set.
///
/// One numbered group of files on the disc: the info file (and its
/// byte-identical backup), the optional menu VOB, and the title VOBs. Set
/// zero is the VMG, which carries info data only.
///
/// Positions are absolute disc LBAs; sizes are bytes, as the layout
/// collaborator reports them. Everything is validated up front so the rip
/// loop never has to.
pub struct TitleSet {
	/// # Set Number (0 = VMG).
	index: u8,

	/// # Info Data: `(lba, bytes)`.
	ifo: (u64, u64),

	/// # Menu VOB: `(lba, bytes)`, zero bytes if absent.
	menu: (u64, u64),

	/// # Title VOBs: `(lba, bytes)`, zero bytes if absent.
	title: (u64, u64),
}

impl TitleSet {
	/// # New Instance.
	///
	/// ## Errors
	///
	/// This will return an error if any size is not a whole number of
	/// blocks, the info data is missing, the title data would span more
	/// than nine VOB parts, or a VMG set claims VOB data.
	pub fn new(index: u8, ifo: (u64, u64), menu: (u64, u64), title: (u64, u64))
	-> Result<Self, RipError> {
		if 99 < index {
			return Err(RipError::Layout(format!("title set {index} out of range")));
		}
		if ifo.1 == 0 {
			return Err(RipError::Layout(format!("title set {index} has no info data")));
		}
		for (label, bytes) in [("IFO", ifo.1), ("menu", menu.1), ("title", title.1)] {
			if 0 != bytes % BYTES_PER_BLOCK as u64 {
				return Err(RipError::Structure(format!(
					"title set {index} {label} size {bytes} is not a multiple of {BYTES_PER_BLOCK}",
				)));
			}
		}
		if index == 0 && (menu.1 != 0 || title.1 != 0) {
			return Err(RipError::Layout("the VMG holds info data only".to_owned()));
		}
		if VOB_MAX_PARTS * VOB_PART_BLOCKS * (BYTES_PER_BLOCK as u64) < title.1 {
			return Err(RipError::Structure(format!(
				"title set {index} spans more than {VOB_MAX_PARTS} VOB parts",
			)));
		}

		Ok(Self { index, ifo, menu, title })
	}

	#[must_use]
	/// # Set Number.
	pub const fn index(&self) -> u8 { self.index }

	/// # Output Files, In Rip Order.
	///
	/// Info first, then its backup, then the menu, then the numbered title
	/// parts, each part capped at a gigabyte.
	fn files(&self) -> Vec<OutputFile> {
		let mut out = Vec::with_capacity(4);
		let ifo_blocks = self.ifo.1 / BYTES_PER_BLOCK as u64;
		let (name_ifo, name_bup) =
			if self.index == 0 {
				("VIDEO_TS.IFO".to_owned(), "VIDEO_TS.BUP".to_owned())
			}
			else {
				(
					format!("VTS_{:02}_0.IFO", self.index),
					format!("VTS_{:02}_0.BUP", self.index),
				)
			};

		// The backup is the same disc range under a second name.
		out.push(OutputFile { name: name_ifo, lba: self.ifo.0, blocks: ifo_blocks });
		out.push(OutputFile { name: name_bup, lba: self.ifo.0, blocks: ifo_blocks });

		if 0 != self.menu.1 {
			out.push(OutputFile {
				name: format!("VTS_{:02}_0.VOB", self.index),
				lba: self.menu.0,
				blocks: self.menu.1 / BYTES_PER_BLOCK as u64,
			});
		}

		let mut remaining = self.title.1 / BYTES_PER_BLOCK as u64;
		let mut lba = self.title.0;
		let mut part = 1;
		while 0 != remaining {
			let blocks = u64::min(remaining, VOB_PART_BLOCKS);
			out.push(OutputFile {
				name: format!("VTS_{:02}_{part}.VOB", self.index),
				lba,
				blocks,
			});
			remaining -= blocks;
			lba += blocks;
			part += 1;
		}

		out
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Output File.
///
/// One destination file: its VIDEO_TS name, its absolute position on the
/// disc, and how many blocks a complete copy holds.
pub struct OutputFile {
	/// # File Name.
	name: String,

	/// # Disc Position.
	lba: u64,

	/// # Expected Blocks.
	blocks: u64,
}

impl OutputFile {
	#[must_use]
	/// # File Name.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # Disc Position.
	pub const fn lba(&self) -> u64 { self.lba }

	#[must_use]
	/// # Expected Blocks.
	pub const fn blocks(&self) -> u64 { self.blocks }
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Disc Layout.
///
/// The validated description of what is on the disc and where: a title name
/// and one or more title sets. Layout discovery itself (UDF, IFO parsing)
/// is somebody else's job; this is the hand-off format.
pub struct DiscLayout {
	/// # Disc Title.
	title: String,

	/// # Title Sets, Ascending.
	sets: Vec<TitleSet>,
}

impl DiscLayout {
	/// # New Instance.
	///
	/// ## Errors
	///
	/// This will return an error if the title is unusable as a directory
	/// name, no sets were provided, or set numbers repeat.
	pub fn new(title: String, mut sets: Vec<TitleSet>) -> Result<Self, RipError> {
		if title.is_empty() || title.contains(['/', '\0']) {
			return Err(RipError::Layout(format!("invalid disc title {title:?}")));
		}
		if sets.is_empty() {
			return Err(RipError::Layout("no title sets".to_owned()));
		}

		sets.sort_unstable_by_key(TitleSet::index);
		for pair in sets.windows(2) {
			if pair[0].index == pair[1].index {
				return Err(RipError::Layout(format!(
					"title set {} listed twice", pair[0].index,
				)));
			}
		}

		Ok(Self { title, sets })
	}

	#[must_use]
	/// # Disc Title.
	pub fn title(&self) -> &str { &self.title }

	#[must_use]
	/// # Output Files, In Rip Order.
	///
	/// Sets ascending, VMG first, and within each set info, backup, menu,
	/// title parts.
	pub fn files(&self) -> Vec<OutputFile> {
		self.sets.iter().flat_map(TitleSet::files).collect()
	}

	#[must_use]
	/// # Total Expected Blocks.
	pub fn total_blocks(&self) -> u64 {
		self.files().iter().map(OutputFile::blocks).sum()
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_title_set_vmg() {
		let set = TitleSet::new(0, (100, 4096), (0, 0), (0, 0))
			.expect("VMG set failed.");
		let files = set.files();
		assert_eq!(files.len(), 2, "The VMG should yield exactly IFO and BUP.");
		assert_eq!(files[0].name(), "VIDEO_TS.IFO");
		assert_eq!(files[1].name(), "VIDEO_TS.BUP");
		assert_eq!(files[0].lba(), files[1].lba(), "IFO and BUP share a disc range.");
		assert_eq!(files[0].blocks(), 2);

		assert!(
			TitleSet::new(0, (100, 2048), (0, 0), (200, 2048)).is_err(),
			"A VMG with VOB data should be rejected.",
		);
	}

	#[test]
	fn t_title_set_files() {
		// Two-and-a-bit parts' worth of title data.
		let title_blocks = VOB_PART_BLOCKS * 2 + 10;
		let set = TitleSet::new(
			1,
			(16, 8192),
			(300, 10 * 2048),
			(1000, title_blocks * 2048),
		).expect("Title set failed.");

		let files = set.files();
		let names: Vec<&str> = files.iter().map(OutputFile::name).collect();
		assert_eq!(
			names,
			[
				"VTS_01_0.IFO", "VTS_01_0.BUP", "VTS_01_0.VOB",
				"VTS_01_1.VOB", "VTS_01_2.VOB", "VTS_01_3.VOB",
			],
			"Unexpected file set.",
		);

		// Parts should chain across the disc without gap or overlap.
		assert_eq!(files[3].lba(), 1000);
		assert_eq!(files[3].blocks(), VOB_PART_BLOCKS);
		assert_eq!(files[4].lba(), 1000 + VOB_PART_BLOCKS);
		assert_eq!(files[4].blocks(), VOB_PART_BLOCKS);
		assert_eq!(files[5].lba(), 1000 + VOB_PART_BLOCKS * 2);
		assert_eq!(files[5].blocks(), 10);
	}

	#[test]
	fn t_title_set_structure() {
		assert!(
			TitleSet::new(1, (16, 2048), (0, 0), (1000, 2047)).is_err(),
			"A ragged VOB size should be rejected.",
		);
		assert!(
			TitleSet::new(1, (16, 0), (0, 0), (0, 0)).is_err(),
			"A set without info data should be rejected.",
		);
		assert!(
			TitleSet::new(1, (16, 2048), (0, 0), (0, (VOB_MAX_PARTS * VOB_PART_BLOCKS + 1) * 2048)).is_err(),
			"A ten-part title should be rejected.",
		);
	}

	#[test]
	fn t_layout() {
		let vmg = TitleSet::new(0, (0, 2048), (0, 0), (0, 0)).expect("VMG failed.");
		let vts = TitleSet::new(1, (16, 2048), (0, 0), (100, 4096)).expect("VTS failed.");

		// Order shouldn't matter on the way in.
		let layout = DiscLayout::new("MOVIE".to_owned(), vec![vts, vmg])
			.expect("Layout failed.");
		let files = layout.files();
		let names: Vec<&str> = files.iter().map(OutputFile::name).collect();
		assert_eq!(
			names,
			["VIDEO_TS.IFO", "VIDEO_TS.BUP", "VTS_01_0.IFO", "VTS_01_0.BUP", "VTS_01_1.VOB"],
			"The VMG should come first.",
		);
		assert_eq!(layout.total_blocks(), 1 + 1 + 1 + 1 + 2);

		assert!(
			DiscLayout::new("MOVIE".to_owned(), vec![vmg, vmg]).is_err(),
			"Duplicate set numbers should be rejected.",
		);
		assert!(
			DiscLayout::new(String::new(), vec![vmg]).is_err(),
			"An empty title should be rejected.",
		);
	}
}
