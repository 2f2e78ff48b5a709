mod args;
mod report;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use args::Args;
use clap::Parser;
use engine::UciEngine;
use log::LevelFilter;
use pool::WorkerPool;
use rayon::prelude::*;
use simplelog::{Config, SimpleLogger, WriteLogger};

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    // Until the handler is installed, Ctrl-C ends the process while it waits for input.
    let positions = read_positions(args.input.as_deref())?;

    // Set up SIGINT handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = Arc::clone(&stop_flag);

    ctrlc::set_handler(move || {
        log::info!("Received SIGINT, finishing in-flight positions...");
        stop_flag_handler.store(true, Ordering::Relaxed);
    })?;

    let engine = UciEngine::new(args.engine_config());
    let pool = WorkerPool::new(args.pool_config(), Arc::new(engine))?;

    log::info!(
        "Evaluating {} positions with {} using {} workers",
        positions.len(),
        args.engine.display(),
        args.workers
    );

    // One submitter per worker keeps every engine busy without overflowing the queue.
    let submitters = rayon::ThreadPoolBuilder::new()
        .num_threads(args.workers)
        .build()?;

    submitters.install(|| {
        positions.par_iter().for_each(|fen| {
            if stop_flag.load(Ordering::Relaxed) {
                return;
            }
            let result = pool.submit(fen);
            println!("{}", report::format_result(fen, &result));
        });
    });

    pool.shutdown();

    let stats = pool.stats();
    log::info!(
        "Done: {} evaluated, {} failed, {} rejected, {} timed out, {} from memo",
        stats.completed,
        stats.failed,
        stats.rejected,
        stats.timed_out,
        stats.memo_hits
    );

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    if let Some(log_file) = &args.log_file {
        WriteLogger::init(
            LevelFilter::Debug,
            Config::default(),
            File::create(log_file)?,
        )?;
    } else {
        SimpleLogger::init(LevelFilter::Info, Config::default())?;
    }

    Ok(args)
}

/// One FEN per line. Blank lines and `#` comments are skipped.
fn read_positions(input: Option<&Path>) -> io::Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    let mut positions = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        positions.push(line.to_string());
    }

    Ok(positions)
}
