//! The `corona` binary entry point.

mod args;
mod logging;
mod run;

use clap::Parser;

fn main() {
    let cli = args::CliArgs::parse();
    let config = match run::build_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    logging::init(config.quiet, config.debug);
    if let Err(e) = run::run(&cli, &config) {
        fail(&e);
    }
}

fn fail(e: &dyn std::error::Error) -> ! {
    eprintln!("corona: {e}");
    let mut source = e.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(1);
}
