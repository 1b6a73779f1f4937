//! Stream EDN values from stdin as they complete.
//!
//! The input is wrapped in the root list, so a file of loose values works:
//!
//! ```text
//! printf '{:a 1}\n[2 3]\n' | cargo run --example stdin_stream
//! RUST_LOG=edn_core=trace cargo run --example stdin_stream < data.edn
//! ```

use std::io::{self, BufRead};
use std::process::ExitCode;

use edn_core::{ParseOptions, StreamParser, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(count) => {
            info!(count, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "parse failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<usize, Box<dyn std::error::Error>> {
    let mut parser = StreamParser::new(ParseOptions::default());
    let mut count = 0;
    let mut print = |value: Value| {
        count += 1;
        println!("{value}");
    };

    parser.feed_with("(", &mut print)?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        parser.feed_with(&line, &mut print)?;
        parser.feed_with("\n", &mut print)?;
    }
    if parser.depth() == 0 {
        parser.feed_with(")", &mut print)?;
    }
    parser.finish_with(&mut print)?;
    Ok(count)
}
