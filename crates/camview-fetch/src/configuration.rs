use std::time::Duration;

use camview_codec::PayloadPolicy;

/// Delay between the end of a fetch and the start of the next one (about 30 frames per second).
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy)]
pub struct FetchConfiguration {
    pub tick_period: Duration,
    pub connect_timeout: Duration,

    /// Upper bound for a whole request/response exchange.
    pub fetch_timeout: Duration,

    /// Transient I/O failures tolerated in a row before the connection is given up.
    pub maximum_consecutive_connection_losses: u32,

    pub payload_policy: PayloadPolicy,
}

impl Default for FetchConfiguration {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            connect_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(2),
            maximum_consecutive_connection_losses: 3,
            payload_policy: PayloadPolicy::Strict,
        }
    }
}
