pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{self, fmt, EnvFilter};
pub mod alias;
pub mod collection;
pub mod database;
pub mod draw;
pub mod error;
pub mod facet;
pub mod query;
pub mod stats;
pub mod store;
pub mod structs;

pub use error::{Error, Result};

pub fn setup_logger(level: &str) -> Result<()> {
    let formatter = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);
    let mut filter = EnvFilter::builder()
        .from_env()
        .map_err(|why| Error::Logger(format!("Failed to read RUST_LOG: {:?}", why)))?;
    for target in ["stardrop", "stardrop_common"] {
        let directive = format!("{}={}", target, level.to_lowercase())
            .parse()
            .map_err(|why| Error::Logger(format!("Invalid log level {}: {:?}", level, why)))?;
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .event_format(formatter)
        .with_env_filter(filter)
        .try_init()
        .map_err(|why| Error::Logger(format!("Failed to install subscriber: {:?}", why)))?;
    Ok(())
}
