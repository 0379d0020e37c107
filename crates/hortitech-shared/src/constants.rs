//! Application-wide constants

/// Ceiling on the number of greenhouse records.
pub const MAX_GREENHOUSES: i64 = 10;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
pub const DEFAULT_LOG_FILE_PREFIX: &str = "hortitech";
