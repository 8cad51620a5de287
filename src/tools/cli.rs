//! Command line interface and run-time options.
//!
use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, warn};

use crate::bwt_algorithms::circular_sort::SortConfig;

/// Verbosity of user information
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

/// Which stage(s) to run, and in which direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Burrows-Wheeler transform only
    Transform,
    /// Burrows-Wheeler inverse transform only
    Inverse,
    /// Move-To-Front encode only
    Encode,
    /// Move-To-Front decode only
    Decode,
    /// Transform followed by Move-To-Front encode
    Compress,
    /// Move-To-Front decode followed by the inverse transform
    Decompress,
}

impl Mode {
    /// File extension written by the forward modes and stripped by the reverse modes.
    pub fn extension(&self) -> &'static str {
        match self {
            Mode::Transform | Mode::Inverse => "bwt",
            Mode::Encode | Mode::Decode => "mtf",
            Mode::Compress | Mode::Decompress => "bsz",
        }
    }

    /// True for the modes that undo a transform.
    pub fn is_reverse(&self) -> bool {
        matches!(self, Mode::Inverse | Mode::Decode | Mode::Decompress)
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Block-sorting front end: Burrows-Wheeler transform and Move-To-Front coding",
    long_about = "
    Transforms each input as a single block held in memory. If no file names are given,
    input is read from standard input and written to standard output."
)]
struct Args {
    /// Files to process
    #[clap()]
    files: Vec<String>,

    /// Operation to perform
    #[clap(short = 'm', long = "mode", value_enum, default_value_t = Mode::Compress)]
    mode: Mode,

    /// Shorthand for --mode decompress
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Send output to standard out
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Suppress noncritical messages
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Never sort rotations on multiple threads
    #[clap(long = "serial")]
    serial: bool,

    /// Number of worker threads (defaults to one per core)
    #[clap(short = 'j', long = "threads")]
    threads: Option<usize>,
}

/// Define all user settable options to control program behavior
#[derive(Debug)]
pub struct BwOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Stage(s) to run
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Configuration passed to the rotation sorter
    pub sort: SortConfig,
    /// Size of the rayon pool, if not the default
    pub threads: Option<usize>,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl BwOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            op_mode: Mode::Compress,
            output: Output::File,
            sort: SortConfig::default(),
            threads: None,
            verbose: Verbosity::Errors,
        }
    }
}

impl Default for BwOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the process arguments into BwOpts and set the log level.
pub fn bwopts_init() -> BwOpts {
    let opts = opts_from_args(Args::parse());
    set_log_level(opts.verbose);
    report(&opts);
    opts
}

/// Parse an explicit argument list (the first item is the program name).
pub fn bwopts_from<I, T>(args: I) -> Result<BwOpts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args).map(opts_from_args)
}

fn opts_from_args(args: Args) -> BwOpts {
    let mut opts = BwOpts::new();
    opts.files = args.files;
    opts.op_mode = if args.decompress {
        Mode::Decompress
    } else {
        args.mode
    };
    // Reading stdin means writing stdout
    if args.stdout || opts.files.is_empty() {
        opts.output = Output::Stdout;
    }
    opts.force_overwrite = args.force;
    if args.serial {
        opts.sort = SortConfig::serial();
    }
    opts.threads = args.threads;
    opts.verbose = match (args.quiet, args.verbose) {
        (true, _) => Verbosity::Quiet,
        (false, 0) => Verbosity::Errors,
        (false, 1) => Verbosity::Warnings,
        (false, 2) => Verbosity::Info,
        (false, 3) => Verbosity::Debug,
        (false, _) => Verbosity::Trace,
    };
    opts
}

/// Set the log level
pub fn set_log_level(verbose: Verbosity) {
    match verbose {
        Verbosity::Quiet => log::set_max_level(log::LevelFilter::Off),
        Verbosity::Errors => log::set_max_level(log::LevelFilter::Error),
        Verbosity::Warnings => log::set_max_level(log::LevelFilter::Warn),
        Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
        Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
        Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
    };
}

// Below we report initialization status to the user
fn report(opts: &BwOpts) {
    info!("---- Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    if opts.files.is_empty() {
        warn!("Reading from stdin");
    }
    info!("Sending output to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.sort.parallel_threshold == usize::MAX {
        info!("Parallel sorting disabled")
    };
    info!("---- Initialization End ----\n");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_test() {
        let opts = bwopts_from(["blocksort", "a.txt"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Compress);
        assert_eq!(opts.output, Output::File);
        assert_eq!(opts.files, vec!["a.txt".to_string()]);
        assert_eq!(opts.verbose, Verbosity::Errors);
        assert_eq!(opts.sort, SortConfig::default());
    }

    #[test]
    fn mode_test() {
        let opts = bwopts_from(["blocksort", "-m", "inverse", "a.bwt"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Inverse);
        assert!(opts.op_mode.is_reverse());
        assert_eq!(opts.op_mode.extension(), "bwt");

        let opts = bwopts_from(["blocksort", "-d", "a.bsz"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Decompress);
    }

    #[test]
    fn stdin_means_stdout_test() {
        let opts = bwopts_from(["blocksort", "--mode", "encode"]).unwrap();
        assert_eq!(opts.output, Output::Stdout);
    }

    #[test]
    fn flags_test() {
        let opts = bwopts_from(["blocksort", "-vvv", "-f", "--serial", "-j", "2", "x"]).unwrap();
        assert_eq!(opts.verbose, Verbosity::Debug);
        assert!(opts.force_overwrite);
        assert_eq!(opts.sort, SortConfig::serial());
        assert_eq!(opts.threads, Some(2));
    }

    #[test]
    fn bad_mode_test() {
        assert!(bwopts_from(["blocksort", "-m", "zip"]).is_err());
    }
}
