/*!
# dvdrip: Fill Executor
*/

use crate::{
	BLOCKS_PER_CHUNK,
	BlockSource,
	BYTES_PER_BLOCK,
	DestFile,
	GapPlan,
	ReadErrorStrategy,
	RipError,
};
use super::{
	order::{
		schedule,
		Segment,
	},
	RipShare,
};



/// # A Block of Nothing.
///
/// Zero padding for skipped regions during an initial copy.
const ZERO_BLOCK: [u8; BYTES_PER_BLOCK] = [0; BYTES_PER_BLOCK];



#[expect(clippy::cast_possible_truncation, reason = "Segment counts fit u32.")]
/// # Fill the Plan.
///
/// Schedule the plan per the configured strategy and run each segment
/// through [`fill_segment`]. Returns the number of blocks actually written.
///
/// ## Errors
///
/// This will bubble up destination I/O errors, unrecoverable disc errors
/// under the `Abort` strategy, and user aborts.
pub(super) fn fill(
	dst: &DestFile,
	src: &mut dyn BlockSource,
	dvd_offset: u64,
	plan: &GapPlan,
	share: &mut RipShare<'_>,
) -> Result<u64, RipError> {
	let segments = schedule(plan, share.opts.strategy());
	let _res = share.progress.reset(segments.len() as u32);

	let mut written = 0;
	for seg in segments {
		if share.killed.killed() { return Err(RipError::Killed); }
		written += fill_segment(dst, src, dvd_offset, seg, share, None)?;
		share.progress.increment();
	}

	Ok(written)
}

/// # Fill One Segment.
///
/// Walk the segment with a cursor, reading ≤512-block chunks from the disc
/// at `dvd_offset + block` and writing whatever actually arrives to the
/// same file-relative position. Short and failed reads are consumed by the
/// read-error strategy: abort, step past one block, or step past the rest
/// of the chunk.
///
/// When `pad` is provided (the initial-copy path), skipped blocks are
/// zero-filled on disk instead of left alone, and noted in the plan so the
/// caller knows what a later gap pass will find.
///
/// Returns the number of blocks written from the disc; padding doesn't
/// count.
///
/// ## Errors
///
/// Destination write errors are always fatal. Disc errors are fatal only
/// under [`ReadErrorStrategy::Abort`]; anything that isn't a plain read
/// error (user abort, bookkeeping overflow) aborts regardless.
pub(super) fn fill_segment(
	dst: &DestFile,
	src: &mut dyn BlockSource,
	dvd_offset: u64,
	seg: Segment,
	share: &mut RipShare<'_>,
	mut pad: Option<&mut GapPlan>,
) -> Result<u64, RipError> {
	let errors = share.opts.errors();
	let mut cursor = 0;
	let mut written = 0;

	while cursor < seg.blocks() {
		let chunk = u64::min(BLOCKS_PER_CHUNK, seg.blocks() - cursor);
		let read_block = seg.start() + cursor;

		let got = match src.read_blocks(
			dvd_offset + read_block,
			chunk,
			share.buf.blocks_mut(chunk),
		) {
			Ok(n) => u64::min(n, chunk),
			Err(e @ RipError::DiscRead(_)) =>
				if matches!(errors, ReadErrorStrategy::Abort) { return Err(e); }
				else { 0 },
			Err(e) => return Err(e),
		};

		// Keep whatever made it over.
		if 0 != got {
			dst.write_blocks_at(share.buf.blocks(got), read_block)?;
			written += got;
		}

		// A full chunk needs no ceremony.
		if got == chunk {
			cursor += chunk;
			continue;
		}

		// Short. The strategy decides how much of the remainder to give up
		// on; the initial-copy path pads the loss with zeroes.
		let skip = match errors {
			ReadErrorStrategy::Abort =>
				return Err(RipError::DiscRead(dvd_offset + read_block + got)),
			ReadErrorStrategy::SkipBlock => 1,
			ReadErrorStrategy::SkipMultiblock => chunk - got,
		};
		if let Some(skips) = pad.as_deref_mut() {
			for k in 0..skip {
				dst.write_blocks_at(&ZERO_BLOCK, read_block + got + k)?;
			}
			skips.add(read_block + got, skip);
		}
		cursor += got + skip;
	}

	Ok(written)
}
