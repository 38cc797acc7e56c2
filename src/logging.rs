use std::io::Write;

use log::LevelFilter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    /// Prefix each line with a local timestamp
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            timestamps: true,
        }
    }
}

/// Install the global logger. `RUST_LOG` overrides the configured level.
///
/// Returns `false` when a logger was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let timestamps = config.timestamps;

    env_logger::Builder::new()
        .format(move |buf, record| {
            if timestamps {
                writeln!(
                    buf,
                    "{} - {} - {}",
                    chrono::Local::now().format(TIME_FORMAT),
                    record.level(),
                    record.args()
                )
            } else {
                writeln!(buf, "{} - {}", record.level(), record.args())
            }
        })
        .filter(None, config.level)
        .parse_default_env()
        .try_init()
        .is_ok()
}
