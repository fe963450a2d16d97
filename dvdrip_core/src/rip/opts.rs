/*!
# dvdrip: Ripping Options
*/



/// # FLAG: Gap-Fill Mode.
const FLAG_GAPS: u8 =         0b0000_0001;

/// # FLAG: Compare Mode.
const FLAG_COMPARE: u8 =      0b0000_0010;

/// # FLAG: Accumulate/Render the Gap Map.
const FLAG_GAP_MAP: u8 =      0b0000_0100;

/// # FLAG: Refuse to Overwrite.
const FLAG_NO_OVERWRITE: u8 = 0b0000_1000;



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Fill Strategy.
///
/// The order in which the fill executor attempts the planned ranges.
/// Damaged discs often give up different sectors depending on how the head
/// approaches them, so re-running with a different order is a legitimate
/// recovery tactic.
pub enum FillStrategy {
	#[default]
	/// # Front to Back.
	Forward,

	/// # Back to Front.
	Reverse,

	/// # Alternating Ends, Working Inward.
	OutsideIn,

	/// # Deterministically Shuffled (by seed).
	Random(u32),
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Read-Error Strategy.
///
/// What to do when the disc comes up short mid-chunk.
pub enum ReadErrorStrategy {
	/// # Give Up on the File.
	Abort,

	#[default]
	/// # Skip the One Bad Block.
	SkipBlock,

	/// # Skip the Rest of the Chunk.
	SkipMultiblock,
}



#[derive(Debug, Clone, Copy, Default)]
/// # Rip Options.
///
/// This struct holds the run-wide settings: which mode we're in, how fills
/// are ordered, and how short reads are handled.
///
/// Options are set using builder-style methods, like:
///
/// ```
/// use dvdrip_core::{FillStrategy, RipOptions};
///
/// let opts = RipOptions::default()
///     .with_gaps(true)
///     .with_strategy(FillStrategy::Random(42));
///
/// assert!(opts.gaps());
/// assert_eq!(opts.strategy(), FillStrategy::Random(42));
/// ```
pub struct RipOptions {
	/// # Fill Order.
	strategy: FillStrategy,

	/// # Short-Read Handling.
	errors: ReadErrorStrategy,

	/// # Boolean Switches.
	flags: u8,
}

impl RipOptions {
	#[must_use]
	/// # With Gap-Fill Mode.
	///
	/// When `true`, existing destination files are scanned, verified, and
	/// patched in place rather than rewritten. The default is `false`.
	pub const fn with_gaps(self, gaps: bool) -> Self {
		let flags =
			if gaps { self.flags | FLAG_GAPS }
			else { self.flags & ! FLAG_GAPS };

		Self {
			flags,
			..self
		}
	}

	#[must_use]
	/// # With Compare Mode.
	///
	/// When `true`, destinations are byte-compared against the disc and
	/// nothing is ever written. The default is `false`.
	pub const fn with_compare(self, compare: bool) -> Self {
		let flags =
			if compare { self.flags | FLAG_COMPARE }
			else { self.flags & ! FLAG_COMPARE };

		Self {
			flags,
			..self
		}
	}

	#[must_use]
	/// # With Gap Map.
	///
	/// When `true`, blank/missing sectors are accumulated across the whole
	/// run and rendered as a little disc map at the end. The default is
	/// `false`.
	pub const fn with_gap_map(self, gap_map: bool) -> Self {
		let flags =
			if gap_map { self.flags | FLAG_GAP_MAP }
			else { self.flags & ! FLAG_GAP_MAP };

		Self {
			flags,
			..self
		}
	}

	#[must_use]
	/// # With Overwrite Protection.
	///
	/// When `true`, a fresh (non-gap) copy refuses to clobber a destination
	/// that already exists. The default is `false`.
	pub const fn with_no_overwrite(self, no_overwrite: bool) -> Self {
		let flags =
			if no_overwrite { self.flags | FLAG_NO_OVERWRITE }
			else { self.flags & ! FLAG_NO_OVERWRITE };

		Self {
			flags,
			..self
		}
	}

	#[must_use]
	/// # With Fill Strategy.
	pub const fn with_strategy(self, strategy: FillStrategy) -> Self {
		Self {
			strategy,
			..self
		}
	}

	#[must_use]
	/// # With Read-Error Strategy.
	pub const fn with_errors(self, errors: ReadErrorStrategy) -> Self {
		Self {
			errors,
			..self
		}
	}
}

impl RipOptions {
	#[must_use]
	/// # Gap-Fill Mode?
	pub const fn gaps(&self) -> bool { FLAG_GAPS == self.flags & FLAG_GAPS }

	#[must_use]
	/// # Compare Mode?
	pub const fn compare(&self) -> bool { FLAG_COMPARE == self.flags & FLAG_COMPARE }

	#[must_use]
	/// # Gap Map?
	pub const fn gap_map(&self) -> bool { FLAG_GAP_MAP == self.flags & FLAG_GAP_MAP }

	#[must_use]
	/// # Overwrite Protection?
	pub const fn no_overwrite(&self) -> bool {
		FLAG_NO_OVERWRITE == self.flags & FLAG_NO_OVERWRITE
	}

	#[must_use]
	/// # Fill Strategy.
	pub const fn strategy(&self) -> FillStrategy { self.strategy }

	#[must_use]
	/// # Read-Error Strategy.
	pub const fn errors(&self) -> ReadErrorStrategy { self.errors }
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_rip_flags() {
		// Make sure our flags are unique.
		let mut all = vec![
			FLAG_GAPS,
			FLAG_COMPARE,
			FLAG_GAP_MAP,
			FLAG_NO_OVERWRITE,
		];
		all.sort_unstable();
		all.dedup();
		assert_eq!(all.len(), 4);
	}

	#[test]
	fn t_rip_options_switches() {
		for v in [false, true] {
			let opts = RipOptions::default().with_gaps(v);
			assert_eq!(opts.gaps(), v);

			let opts = RipOptions::default().with_compare(v);
			assert_eq!(opts.compare(), v);

			let opts = RipOptions::default().with_gap_map(v);
			assert_eq!(opts.gap_map(), v);

			let opts = RipOptions::default().with_no_overwrite(v);
			assert_eq!(opts.no_overwrite(), v);
		}
	}

	#[test]
	fn t_rip_options_strategy() {
		assert_eq!(RipOptions::default().strategy(), FillStrategy::Forward);
		for v in [
			FillStrategy::Forward,
			FillStrategy::Reverse,
			FillStrategy::OutsideIn,
			FillStrategy::Random(42),
		] {
			let opts = RipOptions::default().with_strategy(v);
			assert_eq!(opts.strategy(), v);
		}
	}

	#[test]
	fn t_rip_options_errors() {
		assert_eq!(RipOptions::default().errors(), ReadErrorStrategy::SkipBlock);
		for v in [
			ReadErrorStrategy::Abort,
			ReadErrorStrategy::SkipBlock,
			ReadErrorStrategy::SkipMultiblock,
		] {
			let opts = RipOptions::default().with_errors(v);
			assert_eq!(opts.errors(), v);
		}
	}
}
