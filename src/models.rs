use crate::error::{Result, TickerError};
use crate::watcher::WatcherHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

/// Polling interval used when a request leaves `frequency` unset or zero
pub const DEFAULT_FREQUENCY_SECS: u64 = 60;

/// Longest interval a watcher sleeps between polls
pub const MAX_FREQUENCY_SECS: u64 = 86_400;

/// Body of a create request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GasRequest {
    #[serde(default)]
    pub network: String,
    #[serde(default, rename = "discord_bot_token")]
    pub token: String,
    #[serde(default, rename = "set_nickname", deserialize_with = "null_as_false")]
    pub nickname: bool,
    #[serde(default)]
    pub frequency: Option<u64>,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl GasRequest {
    /// Check the required fields are non-empty. The token is checked first.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(TickerError::InvalidInput(
                "discord_bot_token is required".to_string(),
            ));
        }
        if self.network.is_empty() {
            return Err(TickerError::InvalidInput("network is required".to_string()));
        }
        Ok(())
    }

    /// Normalize into the settings a watcher runs with
    pub fn into_spec(self) -> GasSpec {
        let frequency = match self.frequency {
            Some(0) | None => DEFAULT_FREQUENCY_SECS,
            Some(secs) => secs,
        };

        GasSpec {
            network: normalize_network(&self.network),
            token: self.token,
            nickname: self.nickname,
            frequency,
        }
    }
}

/// Registry keys are the upper-cased network name
pub fn normalize_network(network: &str) -> String {
    network.to_uppercase()
}

/// Validated settings for one watched network
#[derive(Clone, PartialEq, Eq)]
pub struct GasSpec {
    pub network: String,
    pub token: String,
    pub nickname: bool,
    pub frequency: u64,
}

impl GasSpec {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.frequency.clamp(1, MAX_FREQUENCY_SECS))
    }
}

impl fmt::Debug for GasSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GasSpec")
            .field("network", &self.network)
            .field("token", &"<redacted>")
            .field("nickname", &self.nickname)
            .field("frequency", &self.frequency)
            .finish()
    }
}

/// An actively watched network.
///
/// The token stays on the entity for the store and the watcher, but every
/// serialized form of a `Gas` leaves it out.
#[derive(Clone, Serialize)]
pub struct Gas {
    pub network: String,
    #[serde(skip_serializing)]
    pub token: String,
    #[serde(rename = "set_nickname")]
    pub nickname: bool,
    pub frequency: u64,
    pub started_at: DateTime<Utc>,
    #[serde(skip)]
    handle: WatcherHandle,
}

impl Gas {
    pub fn new(spec: GasSpec, handle: WatcherHandle) -> Self {
        Self {
            network: spec.network,
            token: spec.token,
            nickname: spec.nickname,
            frequency: spec.frequency,
            started_at: Utc::now(),
            handle,
        }
    }

    pub fn spec(&self) -> GasSpec {
        GasSpec {
            network: self.network.clone(),
            token: self.token.clone(),
            nickname: self.nickname,
            frequency: self.frequency,
        }
    }

    pub fn handle(&self) -> &WatcherHandle {
        &self.handle
    }
}

impl fmt::Debug for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gas")
            .field("network", &self.network)
            .field("token", &"<redacted>")
            .field("nickname", &self.nickname)
            .field("frequency", &self.frequency)
            .field("started_at", &self.started_at)
            .field("stopped", &self.handle.is_stopped())
            .finish()
    }
}
