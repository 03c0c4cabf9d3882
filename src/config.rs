use std::convert::TryFrom;
use std::time::Duration;

/// Per-game settings, optionally read from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Time each player may spend, rounded up to whole seconds.  `None` means unlimited.
    pub time_limit: Option<Duration>,
    /// Turns each player may take before the game counts as drawn.
    pub max_turns: u32,
    /// How often a running clock adds one second.  Shorten it to speed clocks up in tests.
    pub tick_interval: Duration,
}

/// Default turn cap for both players.
pub const DEFAULT_MAX_TURNS: u32 = 50;

/// Default clock tick, one real second.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

impl GameConfig {
    /// A default configuration with the given time limit.
    pub fn with_time_limit(time_limit: Option<Duration>) -> Self {
        GameConfig {
            time_limit,
            ..GameConfig::default()
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// * `CHESS_TIME_LIMIT_SECS`: per-player limit, unset or `0` for none
    /// * `CHESS_MAX_TURNS`: per-player turn cap
    /// * `CHESS_TICK_MILLIS`: clock tick interval
    ///
    /// Values that do not parse fall back to the defaults.
    pub fn from_env() -> Self {
        GameConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        GameConfig {
            time_limit: number("CHESS_TIME_LIMIT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            max_turns: number("CHESS_MAX_TURNS")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_MAX_TURNS),
            tick_interval: number("CHESS_TICK_MILLIS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TICK_INTERVAL),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            time_limit: None,
            max_turns: DEFAULT_MAX_TURNS,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
