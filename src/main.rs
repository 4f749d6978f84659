use std::process;

use clap::Parser;

use nc2plot::cli::{self, Cli};
use nc2plot::log::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = cli::execute(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
