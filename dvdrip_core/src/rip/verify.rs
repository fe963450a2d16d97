/*!
# dvdrip: Verification Sampler
*/

use crate::{
	BlockSource,
	BYTES_PER_BLOCK,
	DestFile,
	GapPlan,
	RipError,
	SAMPLE_TARGET,
};



/// # Pick Sample Blocks.
///
/// Spread up to 32 candidates evenly across the file, then nudge each to
/// the nearest block *outside* the plan, forward first and backward as a
/// fallback, dropping candidates with nowhere to go and adjacent
/// duplicates.
///
/// These are the pre-existing blocks whose contents must still match the
/// disc before any gap is filled: if an old read and the disc disagree, we
/// have no business "fixing" anything.
pub(super) fn sample_blocks(expected_blocks: u64, plan: &GapPlan) -> Vec<u64> {
	let target = u64::min(expected_blocks, SAMPLE_TARGET);
	let mut out: Vec<u64> = Vec::with_capacity(target as usize);

	for i in 0..target {
		let candidate = (i + 1) * expected_blocks / (target + 1);

		// Forward.
		let mut pick = None;
		let mut b = candidate;
		while b < expected_blocks {
			if ! plan.contains(b) {
				pick.replace(b);
				break;
			}
			b += 1;
		}

		// Backward.
		if pick.is_none() {
			let mut b = candidate;
			loop {
				if ! plan.contains(b) {
					pick.replace(b);
					break;
				}
				if b == 0 { break; }
				b -= 1;
			}
		}

		if let Some(pick) = pick {
			if out.last() != Some(&pick) { out.push(pick); }
		}
	}

	out
}

/// # Verify Samples.
///
/// Read each sample block from both the disc and the destination and
/// require byte equality. Runs, and fails, before anything is written.
///
/// ## Errors
///
/// This will return an error if either side cannot be read, or on the first
/// sample that disagrees with the disc.
pub(super) fn verify(
	dst: &DestFile,
	src: &mut dyn BlockSource,
	dvd_offset: u64,
	samples: &[u64],
) -> Result<(), RipError> {
	let mut theirs = [0_u8; BYTES_PER_BLOCK];
	let mut ours = [0_u8; BYTES_PER_BLOCK];

	for &block in samples {
		if 1 != src.read_blocks(dvd_offset + block, 1, &mut theirs)? {
			return Err(RipError::DiscRead(dvd_offset + block));
		}
		dst.read_exact_at(&mut ours, block * BYTES_PER_BLOCK as u64)?;
		if theirs != ours {
			return Err(RipError::VerifyMismatch(block));
		}
	}

	Ok(())
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::device::testsrc::MemSource;

	/// # Tiny Test Plan.
	fn plan(ranges: &[(u64, u64)]) -> GapPlan {
		let mut out = GapPlan::new();
		for &(start, count) in ranges { out.add(start, count); }
		out
	}

	#[test]
	fn t_samples_open_field() {
		let samples = sample_blocks(100, &GapPlan::new());
		assert_eq!(samples.len(), 32, "An unplanned file should yield a full set.");
		for pair in samples.windows(2) {
			assert!(pair[0] < pair[1], "Samples should be strictly increasing.");
		}
		assert!(samples.iter().all(|&b| b < 100), "Samples must stay in range.");
	}

	#[test]
	fn t_samples_walks() {
		// Candidates landing in the plan walk forward to clear it.
		let samples = sample_blocks(10, &plan(&[(3, 2), (7, 1)]));
		assert_eq!(samples, [0, 1, 2, 5, 6, 8, 9]);

		// With the whole tail planned, the walk falls backward instead.
		let samples = sample_blocks(10, &plan(&[(5, 5)]));
		assert_eq!(samples, [0, 1, 2, 3, 4]);
	}

	#[test]
	fn t_samples_all_planned() {
		// Everything gapped: nothing to verify.
		let samples = sample_blocks(10, &plan(&[(0, 10)]));
		assert!(samples.is_empty(), "A fully-planned file has no samples.");
	}

	#[test]
	fn t_verify() {
		let dir = tempfile::tempdir().expect("Tempdir failed.");
		let mut disc = Vec::new();
		for k in 0..10_u8 { disc.extend_from_slice(&[k + 1; BYTES_PER_BLOCK]); }

		let path = dir.path().join("test.VOB");
		std::fs::write(&path, &disc).expect("Fixture write failed.");
		let dst = DestFile::open_ro(&path).expect("Open failed.");
		let mut src = MemSource::new(disc.clone());

		// Matching data sails through.
		verify(&dst, &mut src, 0, &[0, 4, 9]).expect("Verification failed.");

		// A corrupted destination block fails by index.
		let mut bad = disc;
		bad[2 * BYTES_PER_BLOCK] ^= 0xFF;
		std::fs::write(&path, &bad).expect("Fixture write failed.");
		assert_eq!(
			verify(&dst, &mut src, 0, &[0, 2, 9]),
			Err(RipError::VerifyMismatch(2)),
		);
	}
}
