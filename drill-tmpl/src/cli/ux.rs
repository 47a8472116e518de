use crate::cli::error::TmplError;


/// Install the global subscriber. Logs go to stderr so generated output never mixes with them.
pub fn setup_logging(verbose: u8, quiet: bool) -> Result<(), TmplError> {
    let level = if quiet {
        tracing::Level::ERROR
    } else { match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }};

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
