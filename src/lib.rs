pub mod cli;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod server;
pub mod store;
pub mod watcher;

#[cfg(test)]
pub mod test_utils;
