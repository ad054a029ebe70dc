//! Tracing setup for the binaries.
//!
//! `RUST_LOG` filters when set; otherwise [`LogSettings::default_filter`] applies.

use std::{any::Any, panic, path::PathBuf, sync::OnceLock};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static PANIC_HOOK: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub app_name: &'static str,
    /// Write `<log_dir>/<app_name>.log`, rotated daily, instead of stderr.
    pub log_dir: Option<PathBuf>,
    /// Also run the default panic hook (prints the backtrace when enabled).
    pub include_backtrace: bool,
    pub default_filter: String,
}

impl LogSettings {
    pub fn new(app_name: &'static str) -> Self {
        Self {
            app_name,
            log_dir: None,
            include_backtrace: false,
            default_filter: "info".to_string(),
        }
    }

    /// Reads `VM_LOG_DIR`, `VM_LOG_INCLUDE_BACKTRACE` and `VM_LOG_LEVEL`.
    pub fn from_env(app_name: &'static str) -> Self {
        let defaults = Self::new(app_name);
        Self {
            log_dir: std::env::var_os("VM_LOG_DIR").map(PathBuf::from),
            include_backtrace: std::env::var("VM_LOG_INCLUDE_BACKTRACE")
                .map(|value| is_truthy(&value))
                .unwrap_or(false),
            default_filter: std::env::var("VM_LOG_LEVEL")
                .ok()
                .filter(|level| !level.trim().is_empty())
                .unwrap_or(defaults.default_filter),
            ..defaults
        }
    }
}

/// Installs the global subscriber and the panic hook. Later calls are no-ops.
pub fn init(settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match file_writer(settings) {
        Some(writer) => {
            let _ = builder.with_writer(writer).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }

    install_panic_hook(settings.app_name, settings.include_backtrace);
}

fn file_writer(settings: &LogSettings) -> Option<BoxMakeWriter> {
    let dir = settings.log_dir.as_ref()?;
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!(
            "{}: cannot create log dir {}: {err}; logging to stderr",
            settings.app_name,
            dir.display()
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{}.log", settings.app_name));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

fn install_panic_hook(app_name: &'static str, include_backtrace: bool) {
    PANIC_HOOK.get_or_init(|| {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());

            tracing::error!(
                application = app_name,
                run_id = crate::run_id::get(),
                thread = std::thread::current().name().unwrap_or("unnamed"),
                %location,
                message = %panic_message(info.payload()),
                "panic"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
