/*!
# dvdrip: Ripping
*/

pub(super) mod buf;
mod fill;
mod map;
mod order;
pub(super) mod opts;
pub(super) mod plan;
mod scan;
mod verify;

use crate::{
	BLOCKS_PER_CHUNK,
	BlockSource,
	BYTES_PER_BLOCK,
	DestFile,
	DiscLayout,
	GapPlan,
	KillSwitch,
	OutputFile,
	RipBuffer,
	RipError,
	RipOptions,
};
use dactyl::{
	NiceElapsed,
	NicePercent,
	NiceU64,
};
use fyi_msg::{
	Msg,
	Progless,
};
use map::GapMap;
use order::Segment;
use scan::scan;
use std::{
	path::{
		Path,
		PathBuf,
	},
	time::Instant,
};



/// # Rip Manager.
///
/// This holds the source, the layout, the options, and the rip-wide gap
/// map, and drives each output file through the right mode when
/// [`Ripper::rip`] is called.
pub struct Ripper<'a> {
	/// # Date Created.
	now: Instant,

	/// # Sector Source.
	src: &'a mut dyn BlockSource,

	/// # What's On the Disc.
	layout: &'a DiscLayout,

	/// # Destination Directory (`<target>/<title>/VIDEO_TS`).
	dst_dir: PathBuf,

	/// # Options.
	opts: RipOptions,

	/// # Rip-Wide Gap Map.
	map: GapMap,

	/// # Files Completed.
	done: usize,

	/// # Files Failed.
	failed: usize,
}

impl<'a> Ripper<'a> {
	/// # New!
	///
	/// The destination directory, `<target>/<title>/VIDEO_TS`, must
	/// already exist; making it is the caller's business.
	///
	/// ## Errors
	///
	/// This will return an error if the destination directory is missing.
	pub fn new(
		src: &'a mut dyn BlockSource,
		layout: &'a DiscLayout,
		target: &Path,
		opts: RipOptions,
	) -> Result<Self, RipError> {
		let dst_dir = target.join(layout.title()).join("VIDEO_TS");
		if ! dst_dir.is_dir() {
			return Err(RipError::Open(dst_dir.display().to_string()));
		}

		Ok(Self {
			now: Instant::now(),
			src,
			layout,
			dst_dir,
			opts,
			map: GapMap::new(),
			done: 0,
			failed: 0,
		})
	}

	/// # Rip!
	///
	/// Work through every output file in layout order (VMG first, and
	/// within each set info, backup, menu, title parts), copying,
	/// gap-filling, or comparing per the options. A file that fails is
	/// reported and the run moves on; the run as a whole then counts as
	/// failed.
	///
	/// ## Errors
	///
	/// This will return an error if the buffer cannot be allocated, the
	/// user aborts, or any file could not be completed.
	pub fn rip(&mut self, progress: &Progless, killed: &KillSwitch)
	-> Result<(), RipError> {
		let files = self.layout.files();
		let mut share = RipShare::new(self.opts, progress, killed)?;

		for file in &files {
			if killed.killed() { return Err(RipError::Killed); }

			let res = self.rip_one(file, &mut share);
			progress.finish();
			match res {
				Ok(()) => { self.done += 1; },
				Err(RipError::Killed) => return Err(RipError::Killed),
				Err(e) => {
					self.failed += 1;
					Msg::error(format!("{}: {e}", file.name())).eprint();
				},
			}

			// The map's global origin moves whether or not anything was
			// recorded for this file.
			self.map.advance(file.blocks());
		}

		if self.opts.gap_map() { self.print_map(); }

		if self.failed == 0 { Ok(()) }
		else { Err(RipError::Incomplete(self.failed)) }
	}

	/// # Summarize.
	///
	/// Print the final tally for the run.
	pub fn summarize(&self) {
		Msg::custom("Finished", 199, &format!(
			"{} of {} file(s), in {}.",
			self.done,
			self.done + self.failed,
			NiceElapsed::from(self.now.elapsed()),
		))
			.with_newline(true)
			.eprint();
	}
}

impl Ripper<'_> {
	/// # Rip One File.
	///
	/// Dispatch to the right mode for a single output file.
	fn rip_one(&mut self, file: &OutputFile, share: &mut RipShare<'_>)
	-> Result<(), RipError> {
		let path = self.dst_dir.join(file.name());
		if share.opts.compare() { self.compare_one(&path, file, share) }
		else if share.opts.gaps() { self.fill_one(&path, file, share) }
		else { self.fresh_one(&path, file, share) }
	}

	/// # Gap-Fill One File.
	///
	/// Scan the destination for blank runs, append the truncated tail,
	/// verify a sampling of the surviving data still matches the disc, and
	/// only then fill the holes. Ends with a best-effort rescan so the
	/// report (and gap map) reflect what actually stuck.
	fn fill_one(&mut self, path: &Path, file: &OutputFile, share: &mut RipShare<'_>)
	-> Result<(), RipError> {
		let expected = file.blocks();
		set_progress_title(share.progress, file.name(), "Scanning…");

		let dst = DestFile::open_rw(path)?;
		let before = scan(&dst, expected, &mut share.buf)?;

		let mut plan = before.plan;
		if before.full_blocks < expected {
			plan.add(before.full_blocks, expected - before.full_blocks);
		}
		let blank_before = before.blank_blocks;
		let truncated_before = expected - u64::min(before.full_blocks, expected);

		// If anything non-blank exists, a handful of its blocks must still
		// match the disc; otherwise we'd be "repairing" the wrong rip.
		if ! plan.is_empty() && plan.blocks() < expected {
			set_progress_title(share.progress, file.name(), "Verifying…");
			let samples = verify::sample_blocks(expected, &plan);
			verify::verify(&dst, &mut *self.src, file.lba(), &samples)?;
		}

		set_progress_title(share.progress, file.name(), "Filling…");
		let filled = fill::fill(&dst, &mut *self.src, file.lba(), &plan, share)?;

		// Rescan to see where things landed. This part is best-effort; the
		// fill already happened either way.
		match scan(&dst, expected, &mut share.buf) {
			Ok(after) => {
				if share.opts.gap_map() {
					for rng in after.plan.iter() {
						self.map.record(rng.start(), rng.count());
					}
					if after.full_blocks < expected {
						self.map.record(after.full_blocks, expected - after.full_blocks);
					}
				}

				let truncated_after = expected - u64::min(after.full_blocks, expected);
				share.progress.finish();
				Msg::custom("Filled", 10, &format!(
					"{}: {} block(s); blank {} \x1b[2m→\x1b[0m {}; truncated {} \x1b[2m→\x1b[0m {}.",
					file.name(),
					NiceU64::from(filled),
					nice_pct(blank_before, expected),
					nice_pct(after.blank_blocks, expected),
					nice_pct(truncated_before, expected),
					nice_pct(truncated_after, expected),
				))
					.with_newline(true)
					.eprint();
			},
			Err(_) => {
				share.progress.finish();
				Msg::warning(format!(
					"{}: {} block(s) were filled, but the follow-up scan failed.",
					file.name(),
					NiceU64::from(filled),
				)).eprint();
			},
		}

		Ok(())
	}

	#[expect(clippy::cast_possible_truncation, reason = "Chunk counts fit u32.")]
	/// # Fresh-Copy One File.
	///
	/// The baseline sequential copy: no scanning, no verification, short
	/// reads padded with zeroes per the error strategy, and a truncate to
	/// the exact size at the end. The zero runs this leaves behind are
	/// exactly what a later `--gaps` pass will go hunting for.
	fn fresh_one(&mut self, path: &Path, file: &OutputFile, share: &mut RipShare<'_>)
	-> Result<(), RipError> {
		if share.opts.no_overwrite() && path.exists() {
			return Err(RipError::Overwrite(path.display().to_string()));
		}

		let expected = file.blocks();
		set_progress_title(share.progress, file.name(), "Copying…");
		let _res = share.progress.reset(expected.div_ceil(BLOCKS_PER_CHUNK) as u32);

		let dst = DestFile::open_rw(path)?;
		let mut skips = GapPlan::new();
		let mut block = 0;
		while block < expected {
			if share.killed.killed() { return Err(RipError::Killed); }

			let chunk = u64::min(BLOCKS_PER_CHUNK, expected - block);
			fill::fill_segment(
				&dst,
				&mut *self.src,
				file.lba(),
				Segment::new(block, chunk),
				share,
				Some(&mut skips),
			)?;
			block += chunk;
			share.progress.increment();
		}

		// Pre-existing excess, if any, stops here.
		dst.set_len(expected * BYTES_PER_BLOCK as u64)?;

		if share.opts.gap_map() {
			for rng in skips.iter() { self.map.record(rng.start(), rng.count()); }
		}

		share.progress.finish();
		let padded = skips.blocks();
		Msg::custom("Copied", 10, &format!(
			"{}: {} block(s){}.",
			file.name(),
			NiceU64::from(expected),
			if padded == 0 { String::new() }
			else { format!(", {} zero-padded", NiceU64::from(padded)) },
		))
			.with_newline(true)
			.eprint();

		Ok(())
	}

	#[expect(clippy::cast_possible_truncation, reason = "Chunk counts fit u32.")]
	/// # Compare One File.
	///
	/// Check the destination against the disc without writing a thing: the
	/// size must match exactly, then every block must match byte for byte.
	fn compare_one(&mut self, path: &Path, file: &OutputFile, share: &mut RipShare<'_>)
	-> Result<(), RipError> {
		let expected = file.blocks();
		set_progress_title(share.progress, file.name(), "Comparing…");

		let dst = DestFile::open_ro(path)?;
		let bytes = dst.len()?;
		if bytes != expected * BYTES_PER_BLOCK as u64 {
			return Err(RipError::SizeMismatch(
				file.name().to_owned(),
				expected,
				bytes / BYTES_PER_BLOCK as u64,
			));
		}

		let _res = share.progress.reset(expected.div_ceil(BLOCKS_PER_CHUNK) as u32);
		let mut ours = [0_u8; BYTES_PER_BLOCK];
		let mut block = 0;
		while block < expected {
			if share.killed.killed() { return Err(RipError::Killed); }

			let chunk = u64::min(BLOCKS_PER_CHUNK, expected - block);
			let got = self.src.read_blocks(
				file.lba() + block,
				chunk,
				share.buf.blocks_mut(chunk),
			)?;
			if got != chunk {
				return Err(RipError::DiscRead(file.lba() + block + got));
			}

			for k in 0..chunk {
				dst.read_exact_at(&mut ours, (block + k) * BYTES_PER_BLOCK as u64)?;
				if share.buf.block(k) != ours.as_slice() {
					return Err(RipError::VerifyMismatch(block + k));
				}
			}

			block += chunk;
			share.progress.increment();
		}

		// The map can still tally zero runs in this mode; nothing has been
		// (or will be) written.
		if share.opts.gap_map() {
			if let Ok(state) = scan(&dst, expected, &mut share.buf) {
				for rng in state.plan.iter() {
					self.map.record(rng.start(), rng.count());
				}
			}
		}

		share.progress.finish();
		Msg::custom("Verified", 10, &format!("{} matches the disc.", file.name()))
			.with_newline(true)
			.eprint();

		Ok(())
	}

	/// # Print the Gap Map.
	fn print_map(&self) {
		if self.map.is_empty() {
			Msg::custom("Gap Map", 199, "nothing blank or missing; the rip looks complete.")
				.with_newline(true)
				.eprint();
		}
		else {
			Msg::custom("Gap Map", 199, "blank/missing regions, inner radius at top.")
				.with_newline(true)
				.eprint();
			eprintln!("{}", self.map.render());
		}
	}
}



/// # Rip Share.
///
/// The bits every per-file routine needs: the scratch buffer, the options,
/// the progress bar, and the kill switch. Grouping them spares the call
/// signatures.
pub(super) struct RipShare<'a> {
	/// # Scratch Buffer.
	pub(crate) buf: RipBuffer,

	/// # Options.
	pub(crate) opts: RipOptions,

	/// # Progress Instance.
	pub(crate) progress: &'a Progless,

	/// # Killswitch.
	pub(crate) killed: &'a KillSwitch,
}

impl<'a> RipShare<'a> {
	/// # New Instance.
	///
	/// ## Errors
	///
	/// This will return an error if the buffer cannot be allocated.
	pub(super) fn new(opts: RipOptions, progress: &'a Progless, killed: &'a KillSwitch)
	-> Result<Self, RipError> {
		Ok(Self {
			buf: RipBuffer::new()?,
			opts,
			progress,
			killed,
		})
	}
}



#[expect(clippy::cast_precision_loss, reason = "Percentages are approximate anyway.")]
/// # Nice Percentage.
///
/// Format `part / total` as a percentage, treating an empty total as zero.
fn nice_pct(part: u64, total: u64) -> NicePercent {
	if total == 0 { NicePercent::from(0.0) }
	else { NicePercent::from(part as f64 / total as f64) }
}

/// # Set Progress Title.
///
/// All the per-file progress bars share a common prefix, so this just
/// abstracts away some of the tedium of generating that.
fn set_progress_title(progress: &Progless, name: &str, msg: &str) {
	progress.set_title(Some(Msg::custom(name, 199, msg)));
}
