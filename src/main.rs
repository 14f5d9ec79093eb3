use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use mal::cli::Options;
use mal::repl;
use mal::session::Session;

fn main() -> miette::Result<()> {
    // Install the panic handler.
    bupropion::install(bupropion::BupropionHandlerOpts::new).into_diagnostic()?;

    // Parse the command line arguments.
    let options = Options::parse();

    if options.debug || std::env::var_os("RUST_LOG").is_some() {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mal=trace"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let session = match Session::new(options.args.clone()) {
        Ok(session) => session,
        Err(error) => {
            repl::report(error, None);
            std::process::exit(1);
        }
    };

    match &options.file {
        Some(file) => {
            if let Err(error) = session.load_file(file) {
                repl::report(error, None);
                std::process::exit(1);
            }
        }
        None => repl::run(&session, options.history_path())?,
    }

    Ok(())
}
