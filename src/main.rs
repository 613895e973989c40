mod cli;
mod error;
mod executor;
mod model;
mod pipeline;
mod prompt;

use executor::SystemCommander;
use pipeline::KubeDebug;
use prompt::TerminalPrompter;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset. Failures are reported once by
/// `main`, so nothing at this level fires on the error path.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Colour codes are written only when `ansi` is set.
pub fn log_subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .finish()
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    log_subscriber(filter, std::io::stderr, std::io::stderr().is_terminal()).init();

    let args = cli::lossy_args(std::env::args_os());
    let mut kd = KubeDebug::new(args, SystemCommander, TerminalPrompter::new());

    match kd.run() {
        Ok(state) => {
            tracing::info!(pod = %state.pod_name, container = %state.container_name, "debug session ended");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // clap prints its own usage text; --help and --version exit 0.
            if let Some(usage) = err.usage() {
                usage.exit();
            }
            if let Some(step) = err.step() {
                tracing::debug!(%step, "aborted");
            }
            eprintln!("kubedebug failed: {:#}", anyhow::Error::new(err));
            ExitCode::FAILURE
        }
    }
}
