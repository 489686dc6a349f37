use std::time::Duration;

use serde::{Deserialize, Deserializer, de::Error as _};

/// Deadline applied to engine calls when none is configured
pub(crate) const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) const fn default_engine_timeout() -> Duration {
    DEFAULT_ENGINE_TIMEOUT
}

/// Deserialize a human-readable duration such as `"30s"` or `"2m"`
pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    duration_str::parse(&raw).map_err(|e| D::Error::custom(format!("invalid duration '{raw}': {e}")))
}
