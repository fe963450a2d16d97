/*!
# dvdrip: Fill Order
*/

use crate::{
	BLOCKS_PER_CHUNK,
	FillStrategy,
	GapPlan,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Fill Segment.
///
/// One contiguous run of blocks the executor should attempt, in list order.
/// Only `Forward` segments can exceed a single chunk; the executor walks
/// those a chunk at a time anyway.
pub(super) struct Segment {
	/// # First Block (file-relative).
	start: u64,

	/// # Number of Blocks.
	blocks: u64,
}

impl Segment {
	/// # New Instance.
	pub(super) const fn new(start: u64, blocks: u64) -> Self {
		Self { start, blocks }
	}

	#[must_use]
	/// # First Block.
	pub(super) const fn start(&self) -> u64 { self.start }

	#[must_use]
	/// # Number of Blocks.
	pub(super) const fn blocks(&self) -> u64 { self.blocks }
}



/// # Schedule a Plan.
///
/// Turn the plan's ranges into the ordered segment list for the chosen
/// strategy:
///
/// * `Forward` keeps each range whole, front to back;
/// * `Reverse` emits each range's chunks tail-first;
/// * `OutsideIn` alternates a front chunk and a back chunk per range until
///   the cursors meet;
/// * `Random` flattens everything into natural front-aligned chunks and
///   shuffles them, deterministically, from the seed.
pub(super) fn schedule(plan: &GapPlan, strategy: FillStrategy) -> Vec<Segment> {
	let mut out = Vec::new();

	match strategy {
		FillStrategy::Forward => for rng in plan.iter() {
			out.push(Segment { start: rng.start(), blocks: rng.count() });
		},
		FillStrategy::Reverse => for rng in plan.iter() {
			let mut remaining = rng.count();
			while 0 != remaining {
				let blocks = u64::min(BLOCKS_PER_CHUNK, remaining);
				remaining -= blocks;
				out.push(Segment { start: rng.start() + remaining, blocks });
			}
		},
		FillStrategy::OutsideIn => for rng in plan.iter() {
			let mut lo = rng.start();
			let mut hi = rng.end();
			let mut front = true;
			while lo < hi {
				let blocks = u64::min(BLOCKS_PER_CHUNK, hi - lo);
				if front {
					out.push(Segment { start: lo, blocks });
					lo += blocks;
				}
				else {
					hi -= blocks;
					out.push(Segment { start: hi, blocks });
				}
				front = ! front;
			}
		},
		FillStrategy::Random(seed) => {
			for rng in plan.iter() {
				let mut start = rng.start();
				let mut remaining = rng.count();
				while 0 != remaining {
					let blocks = u64::min(BLOCKS_PER_CHUNK, remaining);
					out.push(Segment { start, blocks });
					start += blocks;
					remaining -= blocks;
				}
			}
			shuffle(&mut out, seed);
		},
	}

	out
}



#[derive(Debug, Clone, Copy)]
/// # Linear Congruential Generator.
///
/// The classic `state * 1103515245 + 12345` generator, yielding bits
/// `16..31` of the state per draw. Quality doesn't matter here; a fixed
/// seed must simply reproduce the same read order on every platform.
struct Lcg(u32);

impl Lcg {
	/// # New Instance.
	const fn new(seed: u32) -> Self { Self(seed) }

	/// # Next Draw (15 bits).
	fn next(&mut self) -> u32 {
		self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12_345);
		(self.0 >> 16) & 0x7FFF
	}
}

/// # Fisher-Yates Shuffle.
fn shuffle(set: &mut [Segment], seed: u32) {
	let mut rng = Lcg::new(seed);
	for i in (1..set.len()).rev() {
		let j = rng.next() as usize % (i + 1);
		set.swap(i, j);
	}
}



#[cfg(test)]
mod test {
	use super::*;

	/// # Tiny Test Plan.
	fn plan(ranges: &[(u64, u64)]) -> GapPlan {
		let mut out = GapPlan::new();
		for &(start, count) in ranges { out.add(start, count); }
		out
	}

	/// # Flatten for Comparison.
	fn pairs(set: &[Segment]) -> Vec<(u64, u64)> {
		set.iter().map(|s| (s.start(), s.blocks())).collect()
	}

	#[test]
	fn t_order_forward() {
		let set = schedule(&plan(&[(3, 2), (7, 1), (100, 1000)]), FillStrategy::Forward);
		assert_eq!(pairs(&set), [(3, 2), (7, 1), (100, 1000)]);
	}

	#[test]
	fn t_order_reverse() {
		let set = schedule(&plan(&[(3, 2), (100, 1000)]), FillStrategy::Reverse);
		assert_eq!(pairs(&set), [(3, 2), (588, 512), (100, 488)]);
	}

	#[test]
	fn t_order_outside_in() {
		let set = schedule(&plan(&[(0, 1200)]), FillStrategy::OutsideIn);
		assert_eq!(pairs(&set), [(0, 512), (688, 512), (512, 176)]);

		// A small range is a single front chunk.
		let set = schedule(&plan(&[(3, 2)]), FillStrategy::OutsideIn);
		assert_eq!(pairs(&set), [(3, 2)]);
	}

	#[test]
	fn t_order_random() {
		let gaps = plan(&[(100, 2000), (3000, 1500)]);

		let a = schedule(&gaps, FillStrategy::Random(42));
		let b = schedule(&gaps, FillStrategy::Random(42));
		assert_eq!(pairs(&a), pairs(&b), "A fixed seed must reproduce its order.");

		// Same chunks, different order, for a different seed.
		let c = schedule(&gaps, FillStrategy::Random(43));
		assert_ne!(pairs(&a), pairs(&c), "Different seeds should shuffle differently.");

		let mut a2 = pairs(&a);
		let mut c2 = pairs(&c);
		a2.sort_unstable();
		c2.sort_unstable();
		assert_eq!(a2, c2, "Shuffling must not add or drop chunks.");

		// And the chunking itself should match the natural forward one.
		let mut fwd: Vec<(u64, u64)> = Vec::new();
		for s in pairs(&schedule(&gaps, FillStrategy::Forward)) {
			let (mut start, mut blocks) = s;
			while 0 != blocks {
				let n = u64::min(512, blocks);
				fwd.push((start, n));
				start += n;
				blocks -= n;
			}
		}
		fwd.sort_unstable();
		assert_eq!(a2, fwd, "Random chunking should be natural and front-aligned.");
	}

	#[test]
	fn t_lcg() {
		// The generator is pinned; spot-check the first draws from seed 1.
		let mut rng = Lcg::new(1);
		let a = rng.next();
		let b = rng.next();
		assert!(a < 32_768 && b < 32_768, "Draws must be 15-bit.");

		let mut rng2 = Lcg::new(1);
		assert_eq!(rng2.next(), a, "Same seed, same sequence.");
		assert_eq!(rng2.next(), b, "Same seed, same sequence.");
	}
}
