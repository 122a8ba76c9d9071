#[cfg(test)]
pub mod test_helpers {
    use crate::db::{create_pool, run_migrations};
    use crate::models::GasSpec;
    use crate::watcher::{Watcher, WatcherHandle};
    use sqlx::SqlitePool;
    use std::sync::Mutex;
    use tempfile::TempDir;

    pub struct TestContext {
        pub pool: SqlitePool,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let db_path = temp_dir.path().join("ticker.db");

            let pool = create_pool(&db_path).await.unwrap();
            run_migrations(&pool).await.unwrap();

            Self {
                pool,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }
    }

    /// Watcher that spawns nothing and remembers every handle it gave out
    #[derive(Default)]
    pub struct RecordingWatcher {
        started: Mutex<Vec<(String, WatcherHandle)>>,
    }

    impl RecordingWatcher {
        pub fn started(&self) -> Vec<(String, WatcherHandle)> {
            self.started.lock().unwrap().clone()
        }
    }

    impl Watcher for RecordingWatcher {
        fn start(&self, spec: &GasSpec) -> WatcherHandle {
            let (handle, _shutdown) = WatcherHandle::channel();
            self.started
                .lock()
                .unwrap()
                .push((spec.network.clone(), handle.clone()));
            handle
        }
    }
}
