//! Periodic cleanup of expired cache entries and stale rate-limit windows.
//!
//! Both stores evict lazily on read, so this task only bounds memory for
//! keys that are never touched again.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::server::app::AppState;

/// Spawn the background maintenance loop. Runs until the process exits.
pub fn spawn_maintenance(state: AppState) -> JoinHandle<()> {
    let interval = state.config.maintenance_interval;
    tokio::spawn(async move {
        run_loop(state, interval).await;
    })
}

async fn run_loop(state: AppState, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so startup stays quiet.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        run_once(&state);
    }
}

fn run_once(state: &AppState) {
    let purged_text = state.text_cache.purge_expired(state.config.cache_pdf_ttl);
    let purged_analysis = state
        .analysis_cache
        .purge_expired(state.config.cache_analysis_ttl);
    let purged_windows = state.rate_limiter.purge_stale();

    if purged_text + purged_analysis + purged_windows > 0 {
        tracing::info!(
            purged_text,
            purged_analysis,
            purged_windows,
            "maintenance sweep complete"
        );
    } else {
        tracing::debug!("maintenance sweep found nothing to purge");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use analysis::testing::MockAi;

    use crate::config::Config;

    fn test_config() -> Config {
        Config {
            port: 0,
            openai_api_key: "test-key".to_string(),
            openai_model: "gpt-4o".to_string(),
            openai_max_tokens: 4000,
            openai_temperature: 0.3,
            max_file_size: 1024,
            max_files: 5,
            cache_default_ttl: Duration::from_secs(3600),
            cache_pdf_ttl: Duration::from_secs(3600),
            cache_analysis_ttl: Duration::from_secs(3600),
            rate_limit_max_requests: 10,
            rate_limit_window: Duration::from_secs(60),
            maintenance_interval: Duration::from_secs(300),
        }
    }

    #[test]
    fn sweep_leaves_live_entries_alone() {
        let state = AppState::with_ai(test_config(), Arc::new(MockAi::returning("{}")));
        state.text_cache.insert("k", "v".to_string());

        run_once(&state);

        assert_eq!(state.text_cache.len(), 1);
    }
}
