use env_logger::{Builder, Env, Target};
use std::any::Any;
use std::env;
use std::panic::{self, Location};

/// Environment variable that turns on debug logging.
pub const DEBUG_ENV: &str = "POWERPROMPT_DEBUG";

/// Install the stderr logger. `RUST_LOG` wins over `debug`.
pub fn init(debug: bool) {
    let debug = debug || env::var_os(DEBUG_ENV).is_some();
    let default_level = if debug { "debug" } else { "warn" };

    // the binary calls this once; a second call only matters in tests
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init();
}

pub fn debug_with_context(context: &str, message: &str) {
    log::debug!("{}: {}", context, message);
}

/// Report panics through the logger. The default hook writes them straight to
/// stderr, even for segment panics that are contained and shown in the prompt.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        log::error!("{}", panic_report(info.payload(), info.location()));
    }));
}

/// The message a panic payload carries.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn panic_report(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    let message = panic_message(payload);
    match location {
        Some(location) => format!("panicked at {location}: {message}"),
        None => format!("panicked: {message}"),
    }
}
