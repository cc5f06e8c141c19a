use std::time::Duration;

use anyhow::Result;
use axum_test::TestServer;
use invitely_config::{ConfigLoader, EnvConfig, StorageBackend};
use invitely_core::RecordStore;
use invitely_server::{AppState, routes::create_app};

// Code is used by test modules, but not in this scope
#[allow(unused)]
#[derive(Debug)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Memory-backed app served over a real HTTP transport so WebSocket
/// upgrades work.
#[allow(unused)]
pub fn build_test_app() -> Result<TestApp> {
    let env = EnvConfig {
        storage_backend: Some(StorageBackend::Memory),
        ..EnvConfig::default()
    };
    let load = ConfigLoader::new().compose(None, env, None, false)?;
    let state = AppState::new(load.config, RecordStore::in_memory());

    let server = TestServer::builder()
        .http_transport()
        .build(create_app(state.clone()))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(TestApp { server, state })
}

/// Wait until the hub has exactly `count` observers. Upgrades finish on
/// the server after the client handshake returns.
#[allow(unused)]
pub async fn wait_for_observers(state: &AppState, count: usize) {
    for _ in 0..200 {
        if state.hub.len() == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {count} observers, hub has {}",
        state.hub.len()
    );
}
