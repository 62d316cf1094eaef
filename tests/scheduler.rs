mod common;

#[cfg(test)]
mod tests {
    use super::common::{configured, StubSource};
    use std::sync::Arc;
    use std::time::Duration;
    use wsbar::libs::config::Settings;
    use wsbar::libs::coordinator::RefreshCoordinator;
    use wsbar::libs::scheduler::Scheduler;
    use wsbar::libs::summary::WorkSummary;

    fn scheduler(source: &StubSource) -> Scheduler<StubSource> {
        let settings = Arc::new(Settings::new(configured()));
        Scheduler::new(Arc::new(RefreshCoordinator::new(source.clone(), settings)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_every_interval() {
        let source = StubSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.start(Duration::from_secs(10));
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(source.fetches(), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_wait() {
        let source = StubSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.start(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(15)).await;
        scheduler.stop();
        assert!(!scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let source = StubSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.stop();
        scheduler.start(Duration::from_secs(10));
        scheduler.stop();
        scheduler.stop();

        assert!(!scheduler.is_running());
        assert_eq!(scheduler.interval(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_running_loop() {
        let source = StubSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.start(Duration::from_secs(10));
        scheduler.start(Duration::from_secs(30));
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(30)));

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(source.fetches(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let source = StubSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.start(Duration::ZERO);
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_running_fetch_finish() {
        let source = StubSource::new();
        source.set_delay(Duration::from_secs(5));
        let settings = Arc::new(Settings::new(configured()));
        let coordinator = Arc::new(RefreshCoordinator::new(source.clone(), settings));
        let mut scheduler = Scheduler::new(Arc::clone(&coordinator));

        scheduler.start(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(coordinator.snapshot().in_progress);

        scheduler.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(source.fetches(), 1);
        assert_eq!(coordinator.snapshot().summary, Some(WorkSummary::new(6.0, 85)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_loop() {
        let source = StubSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.start(Duration::from_secs(1));
        drop(scheduler);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.fetches(), 0);
    }
}
