//! Background pollers backing each watched network.

use crate::error::Result;
use crate::models::GasSpec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Placeholder replaced with the lower-cased network in the gas API URL
pub const NETWORK_PLACEHOLDER: &str = "{network}";

pub const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Stop signal for a running watcher.
///
/// Stopping only flips the signal; it never waits for the poller to exit.
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    shutdown: Arc<watch::Sender<bool>>,
}

impl WatcherHandle {
    pub fn channel() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                shutdown: Arc::new(tx),
            },
            rx,
        )
    }

    /// Safe to call more than once.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// Starts one independent periodic task per watched network
pub trait Watcher: Send + Sync {
    fn start(&self, spec: &GasSpec) -> WatcherHandle;
}

/// Gas price reported by the upstream API, in gwei
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasPrice {
    pub fast: f64,
    pub average: f64,
    pub slow: f64,
}

impl GasPrice {
    pub fn nickname(&self) -> String {
        format!(
            "⚡{:.0} 🚶{:.0} 🐢{:.0}",
            self.fast, self.average, self.slow
        )
    }
}

#[derive(Debug, Deserialize)]
struct Guild {
    id: String,
}

#[derive(Serialize)]
struct NicknameUpdate<'a> {
    nick: &'a str,
}

/// Watcher that polls a gas price API and mirrors it onto a Discord bot
pub struct GasWatcher {
    client: reqwest::Client,
    gas_api_url: Option<String>,
    discord_api_url: String,
}

impl GasWatcher {
    pub fn new(gas_api_url: Option<String>, discord_api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            gas_api_url,
            discord_api_url: discord_api_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl Watcher for GasWatcher {
    fn start(&self, spec: &GasSpec) -> WatcherHandle {
        let (handle, shutdown) = WatcherHandle::channel();

        let poller = GasPoller {
            client: self.client.clone(),
            gas_url: self
                .gas_api_url
                .as_deref()
                .map(|template| gas_url(template, &spec.network)),
            discord_api_url: self.discord_api_url.clone(),
            spec: spec.clone(),
            guilds: Vec::new(),
        };

        tokio::spawn(poller.run(shutdown));
        handle
    }
}

pub fn gas_url(template: &str, network: &str) -> String {
    template.replace(NETWORK_PLACEHOLDER, &network.to_lowercase())
}

struct GasPoller {
    client: reqwest::Client,
    gas_url: Option<String>,
    discord_api_url: String,
    spec: GasSpec,
    guilds: Vec<String>,
}

impl GasPoller {
    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            network = %self.spec.network,
            frequency = self.spec.frequency,
            nickname = self.spec.nickname,
            "Watching gas"
        );

        if self.spec.nickname {
            match self.fetch_guilds().await {
                Ok(guilds) => self.guilds = guilds,
                Err(e) => {
                    tracing::warn!(network = %self.spec.network, error = %e, "Unable to list bot guilds")
                },
            }
        }

        let mut interval = tokio::time::interval(self.spec.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => self.tick().await,
                changed = shutdown.changed() => {
                    // Err means every handle was dropped
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                },
            }
        }

        tracing::info!(network = %self.spec.network, "Gas watcher stopped");
    }

    async fn tick(&self) {
        let Some(url) = self.gas_url.as_deref() else {
            tracing::debug!(network = %self.spec.network, "No gas API configured, skipping poll");
            return;
        };

        let price = match self.fetch_price(url).await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(network = %self.spec.network, error = %e, "Unable to fetch gas price");
                return;
            },
        };

        tracing::info!(
            network = %self.spec.network,
            fast = price.fast,
            average = price.average,
            slow = price.slow,
            "Gas price"
        );

        if !self.spec.nickname {
            return;
        }

        let nick = price.nickname();
        for guild in &self.guilds {
            if let Err(e) = self.set_nickname(guild, &nick).await {
                tracing::warn!(
                    network = %self.spec.network,
                    guild = %guild,
                    error = %e,
                    "Unable to set nickname"
                );
            }
        }
    }

    async fn fetch_price(&self, url: &str) -> Result<GasPrice> {
        let price = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<GasPrice>()
            .await?;

        Ok(price)
    }

    async fn fetch_guilds(&self) -> Result<Vec<String>> {
        let guilds = self
            .client
            .get(format!("{}/users/@me/guilds", self.discord_api_url))
            .header("Authorization", format!("Bot {}", self.spec.token))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Guild>>()
            .await?;

        Ok(guilds.into_iter().map(|g| g.id).collect())
    }

    async fn set_nickname(&self, guild: &str, nick: &str) -> Result<()> {
        self.client
            .patch(format!(
                "{}/guilds/{}/members/@me",
                self.discord_api_url, guild
            ))
            .header("Authorization", format!("Bot {}", self.spec.token))
            .json(&NicknameUpdate { nick })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
