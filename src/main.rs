mod cli;

use colored::Colorize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries the generated code only
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    init_tracing(command_line_interface.verbose());
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
