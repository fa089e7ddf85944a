use parking_lot::Mutex;
/// Logging bridge for chatkeys.
///
/// Routes every `log::info!()`/`log::debug!()` call from all workspace crates
/// to a debug file in the system temp directory:
/// - /tmp/chatkeys_debug.log on Unix/macOS
/// - %TEMP%\chatkeys_debug.log on Windows
///
/// The level is taken from the `--log-level` flag, else `RUST_LOG`, else the
/// numeric DEBUG_LEVEL environment variable:
/// - 0 or unset: No debugging
/// - 1: Errors only
/// - 2: Info level
/// - 3: Debug level (one line per dispatched key)
/// - 4: Trace level
///
/// When RUST_LOG is set the lines are mirrored to stderr as well.
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record};

const LOG_FILE_NAME: &str = "chatkeys_debug.log";

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    /// Parse a DEBUG_LEVEL value; anything unrecognised disables logging.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_env() -> Self {
        std::env::var("DEBUG_LEVEL")
            .map(|val| Self::parse(&val))
            .unwrap_or(DebugLevel::Off)
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::Off,
            DebugLevel::Error => LevelFilter::Error,
            DebugLevel::Info => LevelFilter::Info,
            DebugLevel::Debug => LevelFilter::Debug,
            DebugLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Level named by a RUST_LOG value.
///
/// Accepts a bare level (`debug`) or directive lists such as
/// `chatkeys=debug,notify=warn`, in which case the most verbose level wins.
pub fn parse_rust_log(value: &str) -> Option<LevelFilter> {
    value
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next()?.trim();
            LevelFilter::from_str(level).ok()
        })
        .max()
}

/// Resolve the effective level: CLI flag, then RUST_LOG, then DEBUG_LEVEL.
pub fn resolve_level(cli_level: Option<LevelFilter>) -> LevelFilter {
    if let Some(level) = cli_level {
        return level;
    }
    if let Some(level) = std::env::var("RUST_LOG").ok().as_deref().and_then(parse_rust_log) {
        return level;
    }
    DebugLevel::from_env().to_level_filter()
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

struct LogBridge {
    level: LevelFilter,
    mirror_stderr: bool,
    file: Mutex<Option<File>>,
}

impl LogBridge {
    fn new(level: LevelFilter, mirror_stderr: bool) -> Self {
        let file = if level != LevelFilter::Off {
            match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
            {
                Ok(mut f) => {
                    let _ = f.write_all(
                        format!(
                            "\n{}\nchatkeys {} debug session started at {} (level={})\n{}\n",
                            "=".repeat(80),
                            crate::VERSION,
                            timestamp(),
                            level,
                            "=".repeat(80)
                        )
                        .as_bytes(),
                    );
                    Some(f)
                }
                // A missing log file must never stop the program.
                Err(_) => None,
            }
        } else {
            None
        };

        Self {
            level,
            mirror_stderr,
            file: Mutex::new(file),
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Install the bridge as the global `log` backend.
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let level = resolve_level(cli_level);
    let mirror_stderr = std::env::var_os("RUST_LOG").is_some();
    let bridge = BRIDGE.get_or_init(|| LogBridge::new(level, mirror_stderr));
    if log::set_logger(bridge).is_ok() {
        log::set_max_level(bridge.level);
    }
}
