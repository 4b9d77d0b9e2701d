use std::{env, io, process};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use mcd::cli::dispatch::report;
use mcd::cli::{args, commands, output, CliError, Dispatcher, Resolution};
use mcd::config::{Settings, SettingsError};
use mcd::exitcode;

fn main() {
    process::exit(execute());
}

/// Run the tool against the process arguments and return the exit status.
fn execute() -> i32 {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    let registry = match commands::registry() {
        Ok(registry) => registry,
        Err(e) => return report(&mut stderr, &CliError::from(e)),
    };
    let dispatcher = Dispatcher::new(&registry);

    match dispatcher.resolve(env::args_os().skip(1)) {
        Ok(Resolution::Help(text)) => {
            output::block(&mut stdout, &text);
            exitcode::OK
        }
        Ok(Resolution::Run(invocation)) => {
            let settings = Settings::load();
            setup_logging(args::verbosity(invocation.matches()), settings.as_ref().ok());
            let invocation = match settings {
                Ok(settings) => {
                    settings.color.apply();
                    invocation.with_settings(settings)
                }
                Err(e) => {
                    warn_settings(&mut stderr, &e);
                    invocation.with_settings(Settings::default())
                }
            };
            Dispatcher::finish(invocation.run(&mut stdout), &mut stderr)
        }
        Err(e) => report(&mut stderr, &e),
    }
}

fn warn_settings(stderr: &mut dyn io::Write, e: &SettingsError) {
    tracing::warn!(error = %e, "ignoring configuration");
    output::warning(stderr, &format!("ignoring configuration: {e}"));
}

fn setup_logging(verbosity: u8, settings: Option<&Settings>) {
    let filter = match verbosity {
        0 => settings
            .and_then(|s| s.log_level.as_deref())
            .and_then(|level| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new(LevelFilter::WARN.to_string())),
        1 => EnvFilter::new(LevelFilter::INFO.to_string()),
        2 => EnvFilter::new(LevelFilter::DEBUG.to_string()),
        3 => EnvFilter::new(LevelFilter::TRACE.to_string()),
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            EnvFilter::new(LevelFilter::TRACE.to_string())
        }
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        return;
    }

    match verbosity {
        1 => tracing::info!("Debug mode: info"),
        2 => tracing::debug!("Debug mode: debug"),
        v if v >= 3 => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
