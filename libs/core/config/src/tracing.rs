use crate::Environment;
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const SERVER_PRODUCTION_FILTER: &str = "info,tower_http=info,mongodb=warn";
const SERVER_DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,mongodb=info,hyper=info";
const CLI_FILTER: &str = "warn";
const CLI_VERBOSE_FILTER: &str = "warn,domain_events=info,database=info,events=info";

/// Installs the color-eyre report hook: error locations on, environment section off.
/// Call before anything fallible. Repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// `RUST_LOG` when set, `fallback` otherwise.
fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn server_filter(environment: &Environment) -> &'static str {
    if environment.is_production() {
        SERVER_PRODUCTION_FILTER
    } else {
        SERVER_DEVELOPMENT_FILTER
    }
}

/// Tracing for long-running services, with span capture for error reports.
///
/// Production logs flattened JSON lines without targets; other environments
/// get pretty multi-line output. `RUST_LOG` replaces the default filter
/// (e.g. `domain_events=trace`). Only the first call in a process installs
/// a subscriber.
///
/// ```ignore
/// #[instrument(skip(self))]
/// pub async fn get_one(&self, id: &str) -> EventResult<Event> { ... }
/// ```
pub fn init_tracing(environment: &Environment) {
    let filter = filter_or(server_filter(environment));
    let registry = tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(filter);

    let installed = if environment.is_production() {
        registry
            .with(fmt::layer().json().with_target(false).flatten_event(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().pretty().with_file(false).with_line_number(false))
            .try_init()
    };

    match installed {
        Ok(()) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Subscriber already set"),
    }
}

/// Tracing for command-line tools: compact lines on stderr, leaving stdout
/// to command output. `verbose` raises this workspace's crates to `info`.
pub fn init_cli_tracing(verbose: bool) {
    let filter = filter_or(if verbose { CLI_VERBOSE_FILTER } else { CLI_FILTER });
    let installed = tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if installed.is_err() {
        debug!("Subscriber already set");
    }
}
