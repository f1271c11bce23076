use registry_auth::cli::{Args, Runner};
use registry_auth::logging::Logger;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    let runner = Runner::new(args);
    if let Err(e) = runner.run() {
        Logger::new(false).error(&e.to_string());
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "registry_auth=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
