use crate::use_cases::MatchSettings;
use crate::use_cases::types::RESERVED_EVENT_SLOTS;
use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

const DEFAULT_HTTP_PORT: u16 = 3001;
// 60 Hz; nanosecond resolution so the rate is not rounded to whole milliseconds.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);
const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 256;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

pub fn http_port() -> u16 {
    env_parse("PONG_SERVER_PORT").unwrap_or(DEFAULT_HTTP_PORT)
}

pub fn tick_interval() -> Duration {
    parse_tick_interval(env::var("PONG_TICK_INTERVAL_US").ok().as_deref())
}

fn parse_tick_interval(micros: Option<&str>) -> Duration {
    micros
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|us| *us > 0)
        .map(Duration::from_micros)
        .unwrap_or(DEFAULT_TICK_INTERVAL)
}

pub fn command_channel_capacity() -> usize {
    env_parse::<usize>("PONG_COMMAND_CHANNEL_CAPACITY")
        .filter(|capacity| *capacity > 0)
        .unwrap_or(DEFAULT_COMMAND_CHANNEL_CAPACITY)
}

pub fn event_channel_capacity() -> usize {
    env_parse::<usize>("PONG_EVENT_CHANNEL_CAPACITY")
        .filter(|capacity| *capacity > RESERVED_EVENT_SLOTS)
        .unwrap_or(DEFAULT_EVENT_CHANNEL_CAPACITY)
}

pub fn rng_seed() -> Option<u64> {
    env_parse("PONG_RNG_SEED")
}

pub fn match_settings() -> MatchSettings {
    MatchSettings {
        command_channel_capacity: command_channel_capacity(),
        event_channel_capacity: event_channel_capacity(),
        tick_interval: tick_interval(),
        rng_seed: rng_seed(),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
