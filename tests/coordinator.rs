mod common;

#[cfg(test)]
mod tests {
    use super::common::{configured, settle, StubSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use wsbar::api::SourceError;
    use wsbar::libs::config::{Config, Settings};
    use wsbar::libs::coordinator::{RefreshCoordinator, RefreshError};
    use wsbar::libs::summary::WorkSummary;

    fn coordinator(source: &StubSource, config: Config) -> Arc<RefreshCoordinator<StubSource>> {
        Arc::new(RefreshCoordinator::new(source.clone(), Arc::new(Settings::new(config))))
    }

    fn count_notifications(coordinator: &RefreshCoordinator<StubSource>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        coordinator.set_listener(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_summary_fetches_once_within_ttl() {
        let source = StubSource::new();
        let coordinator = coordinator(&source, configured());

        assert_eq!(coordinator.get_summary(), None);
        settle().await;
        assert_eq!(source.fetches(), 1);

        assert_eq!(coordinator.get_summary(), Some(WorkSummary::new(6.0, 85)));
        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(coordinator.get_summary(), Some(WorkSummary::new(6.0, 85)));
        settle().await;
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_summary_refetches_after_ttl() {
        let source = StubSource::new();
        source.push(Ok(WorkSummary::new(1.0, 50)));
        source.push(Ok(WorkSummary::new(2.0, 70)));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;
        assert_eq!(source.fetches(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        // the stale value is returned while the refresh runs in the background
        assert_eq!(coordinator.get_summary(), Some(WorkSummary::new(1.0, 50)));
        settle().await;

        assert_eq!(source.fetches(), 2);
        assert_eq!(coordinator.get_summary(), Some(WorkSummary::new(2.0, 70)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refreshes_share_one_fetch() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let coordinator = coordinator(&source, configured());

        let first = async {
            coordinator.refresh().await;
            coordinator.snapshot()
        };
        let second = async {
            coordinator.refresh().await;
            coordinator.snapshot()
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(source.fetches(), 1);
        assert_eq!(first, second);
        assert_eq!(second.summary, Some(WorkSummary::new(6.0, 85)));
        assert!(!second.in_progress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_summary_does_not_start_second_fetch_while_in_flight() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let coordinator = coordinator(&source, configured());

        coordinator.get_summary();
        settle().await;
        assert!(coordinator.snapshot().in_progress);

        coordinator.get_summary();
        coordinator.get_summary();
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(source.fetches(), 1);
        assert!(!coordinator.snapshot().in_progress);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_summary() {
        let source = StubSource::new();
        source.push(Ok(WorkSummary::new(6.5, 72)));
        source.push(Err(SourceError::Timeout));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;
        assert!(!coordinator.is_using_cached_data());

        coordinator.refresh().await;
        assert_eq!(coordinator.get_summary(), Some(WorkSummary::new(6.5, 72)));
        assert!(coordinator.is_using_cached_data());
        assert_eq!(coordinator.last_error(), Some(RefreshError::NetworkTimeout));
    }

    #[tokio::test]
    async fn test_failure_without_cache_is_not_stale_data() {
        let source = StubSource::new();
        source.push(Err(SourceError::Unreachable("connection refused".to_string())));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.summary, None);
        assert_eq!(snapshot.last_error, Some(RefreshError::NetworkUnreachable));
        assert!(!snapshot.using_cached_data);
    }

    #[tokio::test]
    async fn test_successful_refresh_clears_last_error() {
        let source = StubSource::new();
        source.push(Err(SourceError::Timeout));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;
        assert!(coordinator.last_error().is_some());

        coordinator.refresh().await;
        assert_eq!(coordinator.last_error(), None);
        assert!(!coordinator.is_using_cached_data());
    }

    #[tokio::test]
    async fn test_missing_token_skips_network() {
        let source = StubSource::new();
        let config = Config {
            project_id: "42".to_string(),
            ..Config::default()
        };
        let coordinator = coordinator(&source, config);
        let notifications = count_notifications(&coordinator);

        coordinator.refresh().await;

        assert_eq!(coordinator.last_error(), Some(RefreshError::ConfigurationMissing));
        assert_eq!(coordinator.get_summary(), None);
        assert_eq!(source.fetches(), 0);
        assert_eq!(source.lookups(), 0);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_summary_without_configuration_triggers_nothing() {
        let source = StubSource::new();
        let config = Config {
            api_token: "token".to_string(),
            ..Config::default()
        };
        let coordinator = coordinator(&source, config);

        assert_eq!(coordinator.get_summary(), None);
        settle().await;

        assert_eq!(source.fetches(), 0);
        assert_eq!(coordinator.last_error(), None);
    }

    #[tokio::test]
    async fn test_no_data_caches_zero_summary() {
        let source = StubSource::new();
        source.push(Err(SourceError::NoData));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;

        assert_eq!(coordinator.get_summary(), Some(WorkSummary::zero()));
        assert_eq!(coordinator.last_error(), None);
    }

    #[tokio::test]
    async fn test_auth_failure_is_unexpected_response() {
        let source = StubSource::new();
        source.push(Err(SourceError::Auth(401)));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;

        assert!(matches!(coordinator.last_error(), Some(RefreshError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_user_id_resolved_once() {
        let source = StubSource::new();
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;
        coordinator.refresh().await;

        assert_eq!(source.lookups(), 1);
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_configured_user_id_skips_lookup() {
        let source = StubSource::new();
        let config = Config {
            user_id: Some("7".to_string()),
            ..configured()
        };
        let coordinator = coordinator(&source, config);

        coordinator.refresh().await;

        assert_eq!(source.lookups(), 0);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forgets_summary_error_and_user_id() {
        let source = StubSource::new();
        source.push(Ok(WorkSummary::new(3.0, 90)));
        source.push(Err(SourceError::Timeout));
        let coordinator = coordinator(&source, configured());

        coordinator.refresh().await;
        coordinator.refresh().await;
        assert!(coordinator.is_using_cached_data());

        coordinator.clear_cache();
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.summary, None);
        assert_eq!(snapshot.last_error, None);

        coordinator.refresh().await;
        assert_eq!(source.lookups(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_started_before_clear_is_repeated() {
        let source = StubSource::new();
        source.push(Ok(WorkSummary::new(1.0, 50)));
        source.set_delay(Duration::from_secs(5));
        let coordinator = coordinator(&source, configured());
        let notifications = count_notifications(&coordinator);

        let background = Arc::clone(&coordinator);
        let handle = tokio::spawn(async move { background.refresh().await });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(coordinator.snapshot().in_progress);

        coordinator.clear_cache();
        tokio::time::sleep(Duration::from_secs(5)).await;
        // the first result was dropped and the second fetch is still running
        assert_eq!(coordinator.snapshot().summary, None);
        assert!(coordinator.snapshot().in_progress);

        handle.await.unwrap();

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.summary, Some(WorkSummary::new(6.0, 85)));
        assert!(!snapshot.in_progress);
        assert_eq!(source.fetches(), 2);
        assert_eq!(source.lookups(), 2);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_repeated_after_clear_respects_new_configuration() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let settings = Arc::new(Settings::new(configured()));
        let coordinator = Arc::new(RefreshCoordinator::new(source.clone(), Arc::clone(&settings)));

        let background = Arc::clone(&coordinator);
        let handle = tokio::spawn(async move { background.refresh().await });
        tokio::time::sleep(Duration::from_secs(1)).await;

        settings.replace(Config::default());
        coordinator.clear_cache();
        handle.await.unwrap();

        assert_eq!(source.fetches(), 1);
        assert_eq!(coordinator.last_error(), Some(RefreshError::ConfigurationMissing));
        assert!(!coordinator.snapshot().in_progress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_dropped_mid_fetch_releases_in_flight_flag() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let coordinator = coordinator(&source, configured());

        let cancelled = tokio::time::timeout(Duration::from_secs(1), coordinator.refresh()).await;
        assert!(cancelled.is_err());
        assert!(!coordinator.snapshot().in_progress);

        let second = tokio::time::timeout(Duration::from_secs(60), coordinator.refresh()).await;
        assert!(second.is_ok());
        assert_eq!(source.fetches(), 2);
        assert_eq!(coordinator.snapshot().summary, Some(WorkSummary::new(6.0, 85)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_joined_caller_returns_when_running_refresh_is_aborted() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let coordinator = coordinator(&source, configured());

        let running = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.refresh().await })
        };
        settle().await;
        assert!(coordinator.snapshot().in_progress);

        let joined = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.refresh().await })
        };
        settle().await;

        running.abort();
        let joined = tokio::time::timeout(Duration::from_secs(1), joined).await;
        assert!(joined.is_ok());
        assert!(!coordinator.snapshot().in_progress);
        assert_eq!(source.fetches(), 1);

        // the status line recovers on the next read
        coordinator.status();
        settle().await;
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_listener_notified_on_success_and_failure() {
        let source = StubSource::new();
        source.push(Ok(WorkSummary::new(1.0, 10)));
        source.push(Err(SourceError::UnexpectedResponse("status 500".to_string())));
        let coordinator = coordinator(&source, configured());
        let notifications = count_notifications(&coordinator);

        coordinator.refresh().await;
        coordinator.refresh().await;

        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_in_progress_while_fetching() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let coordinator = coordinator(&source, configured());

        let first = coordinator.status();
        assert!(!first.in_progress);
        settle().await;

        let second = coordinator.status();
        assert!(second.in_progress);
        assert_eq!(second.summary, None);
    }

    #[test]
    fn test_refresh_error_messages() {
        assert_eq!(RefreshError::ConfigurationMissing.to_string(), "API Token or Project ID not configured");
        assert_eq!(
            RefreshError::NetworkTimeout.to_string(),
            "API request timed out. The server might be slow or unavailable."
        );
        assert_eq!(RefreshError::NetworkUnreachable.to_string(), "No internet connection or server unavailable.");
    }
}
