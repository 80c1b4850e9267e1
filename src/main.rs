use std::process;

use clap::Parser;
use cipher_lab::cli::{init_logging, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}
