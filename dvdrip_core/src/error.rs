/*!
# dvdrip: Errors
*/

#[cfg(feature = "bin")]
use argyle::ArgyleError;
use fyi_msg::Msg;
use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
pub enum RipError {
	/// # Buffer allocation failure.
	Allocation,

	/// # Unrecoverable disc read error.
	DiscRead(u64),

	/// # One or more files could not be completed.
	Incomplete(usize),

	/// # User abort.
	Killed,

	/// # Invalid disc layout.
	Layout(String),

	/// # Noop.
	Noop,

	/// # Unable to open a destination file.
	Open(String),

	/// # Refusing to overwrite an existing file.
	Overwrite(String),

	/// # Numbers can't be converted to the necessary types.
	Overflow,

	/// # Unable to read a destination file.
	Read(String),

	/// # Destination size differs from the expected block count.
	SizeMismatch(String, u64, u64),

	/// # Malformed on-disc structure.
	Structure(String),

	/// # A verification sample disagreed with the disc.
	VerifyMismatch(u64),

	/// # Unable to write a destination file.
	Write(String),

	#[cfg(feature = "bin")]
	/// # Passthrough CLI error.
	Argue(ArgyleError),

	#[cfg(feature = "bin")]
	/// # Invalid CLI arg.
	CliArg(String),

	#[cfg(feature = "bin")]
	/// # CLI parsing failure.
	CliParse(&'static str),
}

impl Error for RipError {}

#[cfg(feature = "bin")]
impl From<ArgyleError> for RipError {
	#[inline]
	fn from(err: ArgyleError) -> Self { Self::Argue(err) }
}

impl From<RipError> for Msg {
	#[inline]
	fn from(src: RipError) -> Self { Self::error(src.to_string()) }
}

impl fmt::Display for RipError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Allocation => f.write_str("Unable to allocate the read buffer."),
			Self::DiscRead(lba) => write!(f, "Read error at disc block {lba}."),
			Self::Incomplete(n) =>
				if *n == 1 { f.write_str("One file could not be completed.") }
				else { write!(f, "{n} files could not be completed.") },
			Self::Killed => f.write_str("User abort."),
			Self::Layout(s) => write!(f, "Invalid disc layout: {s}."),
			Self::Noop => f.write_str("There's nothing to do!"),
			Self::Open(s) => write!(f, "Unable to open {s}."),
			Self::Overwrite(s) => write!(f, "Refusing to overwrite {s}."),
			Self::Overflow => f.write_str("The numbers are too big for this system architecture."),
			Self::Read(s) => write!(f, "Unable to read from {s}."),
			Self::SizeMismatch(s, expected, actual) => write!(
				f,
				"{s} holds {actual} blocks instead of the expected {expected}.",
			),
			Self::Structure(s) => write!(f, "Malformed structure: {s}."),
			Self::VerifyMismatch(block) => write!(
				f,
				"Verification sample mismatch at sector {block}; the existing data does not match the disc.",
			),
			Self::Write(s) => write!(f, "Unable to write to {s}."),

			#[cfg(feature = "bin")]
			Self::Argue(e) => write!(f, "{e}"),

			#[cfg(feature = "bin")]
			Self::CliArg(s) => write!(f, "Invalid CLI option: {s}"),

			#[cfg(feature = "bin")]
			Self::CliParse(s) => write!(f, "Unable to parse {s}."),
		}
	}
}
