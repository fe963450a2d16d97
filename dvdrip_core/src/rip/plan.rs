/*!
# dvdrip: Gap Plan
*/



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Block Range.
///
/// A run of `count` consecutive blocks starting at `start`. Counts are
/// never zero; the end is exclusive.
pub(crate) struct BlockRange {
	/// # First Block.
	start: u64,

	/// # Number of Blocks.
	count: u64,
}

impl BlockRange {
	#[must_use]
	/// # First Block.
	pub(crate) const fn start(&self) -> u64 { self.start }

	#[must_use]
	/// # Number of Blocks.
	pub(crate) const fn count(&self) -> u64 { self.count }

	#[must_use]
	/// # One-Past-the-Last Block.
	pub(crate) const fn end(&self) -> u64 { self.start + self.count }
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Gap Plan.
///
/// The ordered, coalesced set of block ranges a fill pass should attempt.
///
/// Ranges are sorted ascending, disjoint, and non-adjacent; an add that
/// touches or overlaps the previous range extends it instead of starting a
/// new one. Callers are required to add in ascending start order, which the
/// scanner naturally does, so insertion stays O(1).
pub(crate) struct GapPlan(Vec<BlockRange>);

impl GapPlan {
	/// # New (Empty) Instance.
	pub(crate) const fn new() -> Self { Self(Vec::new()) }

	/// # Add a Range.
	///
	/// Append `count` blocks starting at `start`, merging into the previous
	/// range when they touch. A zero `count` is a no-op.
	pub(crate) fn add(&mut self, start: u64, count: u64) {
		if count == 0 { return; }

		if let Some(last) = self.0.last_mut() {
			if start <= last.end() {
				let end = u64::max(last.end(), start + count);
				last.count = end - last.start;
				return;
			}
		}

		self.0.push(BlockRange { start, count });
	}

	#[must_use]
	/// # Is a Block Planned?
	///
	/// Linear, but the sort lets it bail at the first range past `block`.
	pub(crate) fn contains(&self, block: u64) -> bool {
		for rng in &self.0 {
			if block < rng.start { return false; }
			if block < rng.end() { return true; }
		}
		false
	}

	#[must_use]
	/// # Any Ranges?
	pub(crate) fn is_empty(&self) -> bool { self.0.is_empty() }

	#[must_use]
	/// # Total Planned Blocks.
	pub(crate) fn blocks(&self) -> u64 {
		self.0.iter().map(BlockRange::count).sum()
	}

	/// # Range Iterator.
	pub(crate) fn iter(&self) -> std::slice::Iter<'_, BlockRange> { self.0.iter() }
}



#[cfg(test)]
mod test {
	use super::*;

	/// # Flatten for Comparison.
	fn pairs(plan: &GapPlan) -> Vec<(u64, u64)> {
		plan.iter().map(|r| (r.start(), r.count())).collect()
	}

	#[test]
	fn t_plan_add() {
		let mut plan = GapPlan::new();
		assert!(plan.is_empty());

		plan.add(3, 2);
		plan.add(7, 1);
		assert_eq!(pairs(&plan), [(3, 2), (7, 1)]);
		assert_eq!(plan.blocks(), 3);

		// Zero counts are no-ops.
		plan.add(9, 0);
		assert_eq!(pairs(&plan), [(3, 2), (7, 1)]);

		// Adjacent and overlapping adds extend the last range.
		plan.add(8, 2);
		assert_eq!(pairs(&plan), [(3, 2), (7, 3)]);
		plan.add(9, 5);
		assert_eq!(pairs(&plan), [(3, 2), (7, 7)]);

		// An add swallowed by the last range changes nothing.
		plan.add(10, 1);
		assert_eq!(pairs(&plan), [(3, 2), (7, 7)]);
	}

	#[test]
	fn t_plan_invariants() {
		let mut plan = GapPlan::new();
		for (start, count) in [(0, 1), (1, 3), (5, 2), (7, 1), (100, 50)] {
			plan.add(start, count);
		}

		// Sorted, disjoint, non-adjacent, never empty.
		for pair in pairs(&plan).windows(2) {
			assert!(pair[0].0 + pair[0].1 < pair[1].0, "Ranges touch: {pair:?}");
		}
		assert!(plan.iter().all(|r| 0 < r.count()), "Empty range in plan.");
		assert_eq!(pairs(&plan), [(0, 4), (5, 3), (100, 50)]);
	}

	#[test]
	fn t_plan_contains() {
		let mut plan = GapPlan::new();
		plan.add(3, 2);
		plan.add(7, 1);

		for block in [3, 4, 7] {
			assert!(plan.contains(block), "Block {block} should be planned.");
		}
		for block in [0, 2, 5, 6, 8, 100] {
			assert!(! plan.contains(block), "Block {block} should not be planned.");
		}
	}
}
