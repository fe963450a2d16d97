/*!
# dvdrip: Kill Switch
*/

use std::sync::{
	Arc,
	atomic::{
		AtomicBool,
		Ordering::{
			Acquire,
			Relaxed,
			SeqCst,
		},
	},
};



#[derive(Debug, Clone, Default)]
/// # Kill Switch.
///
/// A shared one-way flag. The binary's CTRL-C intercept trips it, and the
/// rip loops poll it between chunks so a dying run stops at a block
/// boundary instead of mid-write, with previously written sectors intact.
///
/// Clones share the same flag, so one copy can live in the signal handler
/// while another rides along with the rip.
pub struct KillSwitch(Arc<AtomicBool>);

impl KillSwitch {
	#[must_use]
	/// # Dead?
	pub fn killed(&self) -> bool { self.0.load(Acquire) }

	/// # Trip the Switch.
	///
	/// Flag the rip for shutdown. Returns `true` for the call that actually
	/// flipped it; repeat trips are no-ops, letting the caller react (reset
	/// the progress bar, say) exactly once.
	pub fn set(&self) -> bool {
		self.0.compare_exchange(false, true, SeqCst, Relaxed).is_ok()
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_kill_switch() {
		let killed = KillSwitch::default();
		let clone = killed.clone();
		assert!(! killed.killed(), "A fresh switch should be live.");

		assert!(killed.set(), "The first trip should report the flip.");
		assert!(! killed.set(), "Repeat trips should be no-ops.");
		assert!(killed.killed());
		assert!(clone.killed(), "Clones must share the flag.");
	}
}
