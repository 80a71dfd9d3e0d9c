use std::fs;

use clap::Parser;

/// pseudo9608 runs programs written in the 9608 pseudocode language from
/// the Cambridge A Level Computer Science syllabus.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the pseudocode source file.
    file: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|_| {
                     eprintln!("Failed to read the source file '{}'. Perhaps this file does not \
                                exist?",
                               &args.file);
                     std::process::exit(1);
                 });

    if let Err(e) = pseudo9608::run_source(&source) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
