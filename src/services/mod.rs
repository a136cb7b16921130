pub mod content;
pub mod detector;
pub mod fetcher;
pub mod formatter;
pub mod monitor;
pub mod resolver;
pub mod schedule;

pub use detector::{ChangeDetector, Observation};
pub use fetcher::HttpPageFetcher;
pub use formatter::MessageFormatter;
pub use monitor::Monitor;
pub use resolver::ChatIdResolver;
pub use schedule::Schedule;
