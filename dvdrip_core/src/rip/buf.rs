/*!
# dvdrip: Rip Buffer.
*/

use crate::{
	BYTES_PER_BLOCK,
	CHUNK_BYTES,
	RipError,
};



#[derive(Debug)]
/// # Rip Buffer.
///
/// One megabyte of scratch, 512 blocks' worth, shared by the scanner, the
/// fill executor, and the comparator. Each borrows the front `n` blocks it
/// needs for a given read; nobody keeps anything in here between reads.
pub(crate) struct RipBuffer(Box<[u8]>);

impl RipBuffer {
	/// # New Instance.
	///
	/// ## Errors
	///
	/// A megabyte is a megabyte; if the allocation fails, that is reported
	/// rather than aborting the process.
	pub(crate) fn new() -> Result<Self, RipError> {
		let mut raw: Vec<u8> = Vec::new();
		raw.try_reserve_exact(CHUNK_BYTES).map_err(|_| RipError::Allocation)?;
		raw.resize(CHUNK_BYTES, 0);
		Ok(Self(raw.into_boxed_slice()))
	}

	/// # First `count` Blocks.
	pub(crate) fn blocks(&self, count: u64) -> &[u8] {
		&self.0[..count as usize * BYTES_PER_BLOCK]
	}

	/// # First `count` Blocks (Mutable).
	pub(crate) fn blocks_mut(&mut self, count: u64) -> &mut [u8] {
		&mut self.0[..count as usize * BYTES_PER_BLOCK]
	}

	/// # Single Block.
	///
	/// Return block `idx` of the buffer as its own slice.
	pub(crate) fn block(&self, idx: u64) -> &[u8] {
		let start = idx as usize * BYTES_PER_BLOCK;
		&self.0[start..start + BYTES_PER_BLOCK]
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_buf_slicing() {
		let mut buf = RipBuffer::new().expect("Buffer allocation failed.");
		assert_eq!(buf.blocks(512).len(), CHUNK_BYTES);
		assert_eq!(buf.blocks(1).len(), BYTES_PER_BLOCK);
		assert!(buf.blocks(0).is_empty());

		buf.blocks_mut(2)[BYTES_PER_BLOCK] = 0xAB;
		assert_eq!(buf.block(1)[0], 0xAB, "Block slicing is misaligned.");
		assert_eq!(buf.block(0)[0], 0, "Block zero should be untouched.");
	}
}
