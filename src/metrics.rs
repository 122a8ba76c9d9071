use crate::error::Result;
use prometheus::{Encoder, IntGauge, Opts, Registry, TextEncoder};

/// Process metrics exposed on `/metrics`
#[derive(Clone)]
pub struct WatchMetrics {
    registry: Registry,
    gas_count: IntGauge,
}

impl WatchMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let gas_count = IntGauge::with_opts(Opts::new(
            "gas_watchers",
            "Number of gas networks currently being watched",
        ))?;
        registry.register(Box::new(gas_count.clone()))?;

        Ok(Self {
            registry,
            gas_count,
        })
    }

    pub fn gas_count(&self) -> &IntGauge {
        &self.gas_count
    }

    /// Render every registered metric in the prometheus text format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
