/*!
# dvdrip: Gap Scanner
*/

use crate::{
	BLOCKS_PER_CHUNK,
	BYTES_PER_BLOCK,
	DestFile,
	GapPlan,
	RipBuffer,
	RipError,
};



#[derive(Debug)]
/// # Scan Result.
///
/// What the scanner found: the zero-run plan, how many blank blocks that
/// adds up to, and how big the file actually was. The truncated tail,
/// everything past `full_blocks`, is deliberately *not* in the plan; the
/// caller appends it so tail-adjacent runs coalesce properly.
pub(super) struct ScanResult {
	/// # Zero Runs.
	pub(super) plan: GapPlan,

	/// # Blank Blocks (within the scanned region).
	pub(super) blank_blocks: u64,

	/// # Whole Blocks Present.
	pub(super) full_blocks: u64,

	/// # File Length in Bytes.
	pub(super) existing_bytes: u64,
}



/// # Scan a Destination.
///
/// Read the file positionally in chunks and classify each block: blank iff
/// all 2048 bytes are zero. Consecutive blanks become plan ranges. A
/// trailing sub-block fragment counts as nothing at all.
///
/// ## Errors
///
/// Any read failure discards the partial plan and bubbles up; the caller
/// abandons the file.
pub(super) fn scan(dst: &DestFile, expected_blocks: u64, buf: &mut RipBuffer)
-> Result<ScanResult, RipError> {
	let existing_bytes = dst.len()?;
	let full_blocks = existing_bytes / BYTES_PER_BLOCK as u64;
	let scan_blocks = u64::min(full_blocks, expected_blocks);

	let mut plan = GapPlan::new();
	let mut blank_blocks = 0;
	let mut pending: Option<u64> = None;

	let mut block = 0;
	while block < scan_blocks {
		let chunk = u64::min(BLOCKS_PER_CHUNK, scan_blocks - block);
		dst.read_exact_at(
			buf.blocks_mut(chunk),
			block * BYTES_PER_BLOCK as u64,
		)?;

		for k in 0..chunk {
			if buf.block(k).iter().all(|&b| b == 0) {
				blank_blocks += 1;
				if pending.is_none() { pending.replace(block + k); }
			}
			else if let Some(start) = pending.take() {
				plan.add(start, block + k - start);
			}
		}

		block += chunk;
	}

	// Close out a run that made it to the end.
	if let Some(start) = pending { plan.add(start, scan_blocks - start); }

	Ok(ScanResult { plan, blank_blocks, full_blocks, existing_bytes })
}
