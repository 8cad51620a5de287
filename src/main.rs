//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use blocksort::compression::compress::compress;
use blocksort::compression::decompress::decompress;
use blocksort::error::BwtError;
use blocksort::tools::cli::{bwopts_init, BwOpts, Mode};

use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The CLI narrows this down.
    // Logging goes to stderr, since stdout may carry the data.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Unable to start logging: {}", e);
    }

    let options = bwopts_init();
    set_threads(&options);

    //----- Figure how what we need to do and go do it
    let result = if options.op_mode.is_reverse() {
        decompress(&options)
    } else {
        compress(&options)
    };

    let code = exit_code(options.op_mode, &result);
    if code != 0 {
        std::process::exit(code);
    }
}

/// Log how the run ended and return the process exit status. Errors are reported here only.
fn exit_code(mode: Mode, result: &Result<(), BwtError>) -> i32 {
    match result {
        Ok(()) => {
            info!("Done.\n");
            0
        }
        Err(e) => {
            error!("{} failed: {}", mode, e);
            1
        }
    }
}

/// Size the rayon pool if the user asked for a thread count.
fn set_threads(options: &BwOpts) {
    if let Some(threads) = options.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            warn!("Could not set thread count to {}: {}", threads, e);
        }
    }
}
