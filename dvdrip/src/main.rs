/*!
# dvdrip
*/

#![forbid(unsafe_code)]

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
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



use argyle::{
	Argue,
	ArgyleError,
	FLAG_HELP,
	FLAG_VERSION,
};
use dactyl::{
	NiceU64,
	traits::BytesToUnsigned,
};
use dvdrip_core::{
	DiscLayout,
	FillStrategy,
	ImageSource,
	KillSwitch,
	ReadErrorStrategy,
	RipError,
	RipOptions,
	Ripper,
	TitleSet,
};
use fyi_msg::{
	Msg,
	Progless,
};
use std::path::Path;
use utc2k::FmtUtc2k;



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() {
	match _main() {
		Ok(()) => {},
		Err(RipError::Argue(ArgyleError::WantsVersion)) => {
			println!(concat!("dvdrip v", env!("CARGO_PKG_VERSION")));
		},
		Err(RipError::Argue(ArgyleError::WantsHelp)) => {
			helper();
		},
		Err(e) => {
			Msg::from(e).eprint();
			std::process::exit(1);
		},
	}
}

#[inline]
/// # Actual Main.
///
/// This does all the stuff.
fn _main() -> Result<(), RipError> {
	// Load CLI arguments, if any.
	let args = Argue::new(FLAG_HELP | FLAG_VERSION)?;

	// Check for unknown args.
	if let Some(boo) = args.check_keys(
		&[
			b"--compare",
			b"--gap-map",
			b"--gaps",
			b"--no-overwrite",
			b"--no-summary",
		],
		&[
			b"--error",
			b"--gap-random-seed",
			b"--gap-strategy",
			b"--layout",
			b"--name",
			b"--output",
			b"-d",
			b"--dev",
			b"-l",
			b"-n",
			b"-o",
		],
	) {
		return Err(RipError::CliArg(String::from_utf8_lossy(boo).into_owned()));
	}

	// The source and layout are both required.
	let dev = args.option2_os(b"-d", b"--dev")
		.ok_or(RipError::CliParse("-d/--dev"))?;
	let mut src = ImageSource::open(dev)?;
	let layout = parse_layout(
		args.option2_os(b"-l", b"--layout").ok_or(RipError::CliParse("-l/--layout"))?,
		args.option2(b"-n", b"--name"),
	)?;

	// Everything else has a sane default.
	let opts = parse_rip_options(&args)?;
	let target = args.option2_os(b"-o", b"--output").map_or_else(
		|| Path::new(".").to_path_buf(),
		|p| Path::new(p).to_path_buf(),
	);

	// Quiet?
	if ! args.switch(b"--no-summary") { rip_summary(&layout, &opts, &target); }

	// Directory creation is on us, not the engine, and only matters when
	// something might actually get written.
	if ! opts.compare() {
		let dir = target.join(layout.title()).join("VIDEO_TS");
		std::fs::create_dir_all(&dir)
			.map_err(|_| RipError::Open(dir.display().to_string()))?;
	}

	// Set up progress and killswitch in case they're needed.
	let progress = Progless::default();
	let killed = KillSwitch::default();
	sigint(killed.clone(), Some(progress.clone()));

	// Rip and rip and rip!
	let mut ripper = Ripper::new(&mut src, &layout, &target, opts)?;
	let res = ripper.rip(&progress, &killed);
	ripper.summarize();
	res?;

	if killed.killed() { Err(RipError::Killed) }
	else { Ok(()) }
}

/// # Parse Rip Options.
fn parse_rip_options(args: &Argue) -> Result<RipOptions, RipError> {
	let mut opts = RipOptions::default()
		.with_gaps(args.switch(b"--gaps"))
		.with_compare(args.switch(b"--compare"))
		.with_gap_map(args.switch(b"--gap-map"))
		.with_no_overwrite(args.switch(b"--no-overwrite"));

	// The seed only matters for the random strategy, but parse it either
	// way so typos don't pass silently.
	let mut seed = 0;
	if let Some(v) = args.option(b"--gap-random-seed") {
		seed = u32::btou(v.trim_ascii()).ok_or(RipError::CliParse("--gap-random-seed"))?;
	}

	if let Some(v) = args.option(b"--gap-strategy") {
		opts = opts.with_strategy(match v.trim_ascii() {
			b"forward" => FillStrategy::Forward,
			b"reverse" => FillStrategy::Reverse,
			b"outside-in" => FillStrategy::OutsideIn,
			b"random" => FillStrategy::Random(seed),
			_ => return Err(RipError::CliParse("--gap-strategy")),
		});
	}

	if let Some(v) = args.option(b"--error") {
		opts = opts.with_errors(match v.trim_ascii() {
			b"abort" => ReadErrorStrategy::Abort,
			b"skip" => ReadErrorStrategy::SkipBlock,
			b"skip-multiblock" => ReadErrorStrategy::SkipMultiblock,
			_ => return Err(RipError::CliParse("--error")),
		});
	}

	Ok(opts)
}

/// # Parse the Layout Manifest.
///
/// The manifest stands in for IFO/UDF discovery: an optional `title` line,
/// then one line per title set holding seven numbers: the set index, then
/// `lba bytes` pairs for the info data, menu VOB, and title VOBs. Blank
/// lines and `#` comments are skipped.
fn parse_layout<P>(src: P, name: Option<&[u8]>) -> Result<DiscLayout, RipError>
where P: AsRef<Path> {
	let src = src.as_ref();
	let raw = std::fs::read_to_string(src)
		.map_err(|_| RipError::Open(src.display().to_string()))?;

	let mut title = None;
	let mut sets = Vec::new();
	for line in raw.lines() {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') { continue; }

		if let Some(rest) = line.strip_prefix("title ") {
			title.replace(rest.trim().to_owned());
			continue;
		}

		let fields: Vec<u64> = line.split_whitespace()
			.map(|v| u64::btou(v.as_bytes()))
			.collect::<Option<Vec<u64>>>()
			.ok_or_else(|| RipError::Layout(format!("unreadable line {line:?}")))?;
		let [idx, ifo_lba, ifo_bytes, menu_lba, menu_bytes, title_lba, title_bytes] =
			fields.as_slice()
			else {
				return Err(RipError::Layout(format!("unreadable line {line:?}")));
			};
		let idx = u8::try_from(*idx)
			.map_err(|_| RipError::Layout(format!("title set {idx} out of range")))?;

		sets.push(TitleSet::new(
			idx,
			(*ifo_lba, *ifo_bytes),
			(*menu_lba, *menu_bytes),
			(*title_lba, *title_bytes),
		)?);
	}

	// A -n/--name override beats whatever the manifest said.
	if let Some(name) = name {
		title.replace(String::from_utf8_lossy(name).trim().to_owned());
	}

	DiscLayout::new(
		title.ok_or_else(|| RipError::Layout("missing disc title".to_owned()))?,
		sets,
	)
}

/// # Rip Summary.
///
/// Print the chosen settings before getting down to business.
fn rip_summary(layout: &DiscLayout, opts: &RipOptions, target: &Path) {
	let nice_mode =
		if opts.compare() { "Compare (no writes)" }
		else if opts.gaps() { "Scan, verify, and fill gaps" }
		else if opts.no_overwrite() { "Initial copy (no overwrite)" }
		else { "Initial copy" };
	let nice_strategy = match opts.strategy() {
		FillStrategy::Forward => "Forward".to_owned(),
		FillStrategy::Reverse => "Reverse".to_owned(),
		FillStrategy::OutsideIn => "Outside-In".to_owned(),
		FillStrategy::Random(seed) => format!("Random (seed {seed})"),
	};
	let nice_errors = match opts.errors() {
		ReadErrorStrategy::Abort => "Abort",
		ReadErrorStrategy::SkipBlock => "Skip Block",
		ReadErrorStrategy::SkipMultiblock => "Skip Chunk",
	};
	let nice_output = format!(
		"{}/{}/VIDEO_TS",
		target.display(),
		layout.title(),
	);

	let set = [
		("Date:", FmtUtc2k::now().to_string(), true),
		("Mode:", nice_mode.to_owned(), true),
		("Read Order:", nice_strategy, opts.gaps()),
		("Read Errors:", nice_errors.to_owned(), ! opts.compare()),
		("Gap Map:", "Yes".to_owned(), opts.gap_map()),
		("Blocks:", NiceU64::from(layout.total_blocks()).to_string(), true),
		("Destination:", nice_output, true),
	];
	let max_label = set.iter().map(|(k, _, _)| k.len()).max().unwrap_or(0);

	eprintln!("\x1b[1;38;5;199mdvdrip\x1b[0m");
	for (k, v, enabled) in set {
		if enabled {
			eprintln!("  {k:max_label$} \x1b[1m{v}\x1b[0m");
		}
		else {
			eprintln!("  \x1b[2;9m{k:max_label$} {v}\x1b[0m");
		}
	}
	eprintln!();
}

/// # Hook Up CTRL+C.
fn sigint(killed: KillSwitch, progress: Option<Progless>) {
	let _res = ctrlc::set_handler(move ||
		if killed.set() {
			if let Some(p) = &progress { p.sigint(); }
		}
	);
}

#[cold]
/// # Print Help.
fn helper() {
	println!(concat!(
		r#"
   ______
  /      \    "#, "\x1b[38;5;199mdvdrip\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
 |  ((_))  |  Incremental DVD-Video ripping
 |  \___/  |  and damaged-disc recovery.
  \______/

USAGE:
    dvdrip [OPTIONS] -d <PATH> -l <PATH>

REQUIRED:
    -d, --dev <PATH>  The DVD image or readable block device to copy from.
    -l, --layout <PATH>
                      The disc layout manifest: an optional "title <NAME>"
                      line, then one line per title set with seven numbers,
                      "ss ifo_lba ifo_bytes menu_lba menu_bytes title_lba
                      title_bytes". Sizes are bytes; positions are absolute
                      2048-byte disc blocks.

MODES:
        --gaps        Scan existing output files for blank or missing
                      sectors, verify the rest still matches the disc, and
                      fill only the holes. Without this flag, files are
                      copied fresh from start to finish.
        --compare     Verify the output tree against the disc byte-for-byte
                      without writing anything.

GAP SETTINGS:
        --gap-strategy <forward|reverse|outside-in|random>
                      The order in which missing ranges are attempted.
                      Damaged discs sometimes give up sectors to one
                      approach angle but not another. [default: forward]
        --gap-random-seed <NUM>
                      The seed for the random strategy, making its read
                      order reproducible. [default: 0]
        --gap-map     Accumulate every blank/missing sector across the run
                      and print a 20x60 map of the disc surface at the end.

GENERAL SETTINGS:
        --error <abort|skip|skip-multiblock>
                      What to do when the disc comes up short mid-read:
                      give up on the file, skip the one bad block, or skip
                      the rest of the chunk. [default: skip]
        --no-overwrite
                      Refuse to clobber existing files during an initial
                      copy.
    -n, --name <NAME> Override the manifest's disc title.
    -o, --output <DIR>
                      The directory to build <NAME>/VIDEO_TS under.
                      [default: .]

MISCELLANEOUS:
    -h, --help        Print help information to STDOUT and exit.
    -V, --version     Print version information to STDOUT and exit.
        --no-summary  Skip the settings summary and jump straight in.

Re-run with --gaps as many times as it takes; every pass keeps the good
sectors it already has and only chases what's still missing.
"#
	));
}
