/*!
# dvdrip: Library
*/

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
	unsafe_code,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![expect(clippy::redundant_pub_crate, reason = "Unresolvable.")]

mod abort;
mod device;
mod error;
mod layout;
mod rip;

pub use abort::KillSwitch;
pub use device::{
	BlockSource,
	ImageSource,
};
pub(crate) use device::DestFile;
pub use error::RipError;
pub use layout::{
	DiscLayout,
	OutputFile,
	TitleSet,
};
pub(crate) use rip::{
	buf::RipBuffer,
	plan::GapPlan,
};
pub use rip::{
	opts::{
		FillStrategy,
		ReadErrorStrategy,
		RipOptions,
	},
	Ripper,
};



// Block Sizes
// ---------------

/// # Bytes Per Block.
///
/// The DVD logical block (sector) size. All core bookkeeping is done in
/// blocks; byte offsets only come up at the I/O boundary.
pub const BYTES_PER_BLOCK: usize = 2048;

/// # Blocks Per Chunk.
///
/// The most blocks ever requested in a single read, from either the disc or
/// the destination.
const BLOCKS_PER_CHUNK: u64 = 512;

/// # Chunk Size in Bytes.
///
/// One full read chunk: `512 x 2048 = 1 MiB`.
const CHUNK_BYTES: usize = BYTES_PER_BLOCK * BLOCKS_PER_CHUNK as usize;



// Disc Layout
// ---------------

/// # Blocks Per VOB Part.
///
/// Title VOBs are split into numbered one-gigabyte parts on disk.
pub const VOB_PART_BLOCKS: u64 = 524_288;

/// # Maximum VOB Parts.
///
/// A title set holds at most nine parts, `VTS_ss_1.VOB` through
/// `VTS_ss_9.VOB`.
const VOB_MAX_PARTS: u64 = 9;



// Misc
// ---------------

/// # Verification Sample Target.
///
/// The most pre-existing blocks sampled (and compared against the disc)
/// before any gap is filled.
const SAMPLE_TARGET: u64 = 32;
