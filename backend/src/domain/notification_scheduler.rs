//! Periodic background runner for the calendar notifier.
//!
//! Every tick runs the upcoming pass and then the today pass. A failure in
//! one pass is logged and doesn't stop the other or any later tick. The
//! first tick fires as soon as the scheduler starts.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::domain::calendar_notifications::{CalendarNotifier, PassOutcome};

pub const DEFAULT_NOTIFICATION_INTERVAL: Duration = Duration::from_secs(3600);

/// Result of a single scheduler tick. `None` marks a pass that failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub upcoming: Option<PassOutcome>,
    pub today: Option<PassOutcome>,
}

pub struct NotificationScheduler {
    notifier: CalendarNotifier,
    interval: Duration,
}

impl NotificationScheduler {
    pub fn new(notifier: CalendarNotifier) -> Self {
        Self {
            notifier,
            interval: DEFAULT_NOTIFICATION_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run both passes once, swallowing and logging their errors
    pub async fn tick(&self) -> TickReport {
        let upcoming = match self.notifier.notify_upcoming().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("Upcoming notification pass failed: {:#}", e);
                None
            }
        };
        let today = match self.notifier.notify_today().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("Today notification pass failed: {:#}", e);
                None
            }
        };
        TickReport { upcoming, today }
    }

    /// Spawn the periodic loop. Ticks never overlap; a slow tick delays the
    /// next one instead of queueing a burst.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        info!(
            "Starting notification scheduler (interval {}s)",
            self.interval.as_secs_f64()
        );

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick().await;
                    }
                    changed = stop_rx.changed() => {
                        // A dropped sender also means stop
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Notification scheduler stopped");
        });

        SchedulerHandle {
            stop_tx,
            join: Some(join),
        }
    }
}

/// Handle to a running scheduler. Dropping it signals the loop to stop
/// without waiting for it.
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    join: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Ask the loop to exit after any in-flight tick
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// False once the loop has exited, whether stopped or panicked
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|join| !join.is_finished())
    }

    /// Signal the loop and wait for it to finish
    pub async fn stop(mut self) {
        self.signal_stop();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!("Notification scheduler task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.signal_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert_service::AlertService;
    use crate::domain::calendar_notifications::tests::Fixture;
    use crate::domain::day_window::FixedClock;
    use crate::domain::models::{DomainCalendarEvent, EventFilter};
    use crate::storage::{CalendarEventRepository, CalendarEventStorage};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Arc;

    /// Event store whose reminder-filtered range query always fails
    struct FailingUpcomingStore {
        inner: Arc<CalendarEventRepository>,
    }

    #[async_trait]
    impl CalendarEventStorage for FailingUpcomingStore {
        async fn store_event(&self, event: &DomainCalendarEvent) -> Result<()> {
            self.inner.store_event(event).await
        }

        async fn get_event(&self, event_id: &str) -> Result<Option<DomainCalendarEvent>> {
            self.inner.get_event(event_id).await
        }

        async fn list_events_for_baby(
            &self,
            baby_id: &str,
            start: Option<DateTime<Utc>>,
            end: Option<DateTime<Utc>>,
        ) -> Result<Vec<DomainCalendarEvent>> {
            self.inner.list_events_for_baby(baby_id, start, end).await
        }

        async fn find_events_in_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            filter: EventFilter,
        ) -> Result<Vec<DomainCalendarEvent>> {
            if filter.reminder == Some(true) {
                return Err(anyhow!("event store unavailable"));
            }
            self.inner.find_events_in_range(start, end, filter).await
        }

        async fn update_event(&self, event: &DomainCalendarEvent) -> Result<()> {
            self.inner.update_event(event).await
        }

        async fn delete_event(&self, event_id: &str) -> Result<bool> {
            self.inner.delete_event(event_id).await
        }
    }

    #[tokio::test]
    async fn test_tick_runs_both_passes() {
        let fx = Fixture::new().await;
        fx.add_event("event::up", fx.tomorrow().start + chrono::Duration::hours(9), true, false).await;
        fx.add_event("event::today", fx.today().start + chrono::Duration::hours(20), true, false).await;

        let scheduler = NotificationScheduler::new(fx.notifier.clone());
        let report = scheduler.tick().await;

        assert_eq!(report.upcoming.map(|o| o.created_count), Some(1));
        assert_eq!(report.today.map(|o| o.created_count), Some(1));
        assert_eq!(fx.all_alerts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_upcoming_pass_does_not_block_today() {
        let fx = Fixture::new().await;
        fx.add_event("event::today", fx.today().start + chrono::Duration::hours(20), true, false).await;

        let failing = Arc::new(FailingUpcomingStore { inner: fx.events.clone() });
        let notifier = CalendarNotifier::new(failing, AlertService::new(fx.alerts.clone()))
            .with_clock(Arc::new(FixedClock(fx.now)));
        let scheduler = NotificationScheduler::new(notifier);

        let report = scheduler.tick().await;
        assert!(report.upcoming.is_none());
        assert_eq!(report.today.map(|o| o.created_count), Some(1));

        // And the next tick still runs
        let report = scheduler.tick().await;
        assert!(report.upcoming.is_none());
        assert_eq!(report.today.map(|o| o.created_count), Some(0));
    }

    #[tokio::test]
    async fn test_trigger_once_stops_after_failed_upcoming_pass() {
        let fx = Fixture::new().await;
        fx.add_event("event::today", fx.today().start + chrono::Duration::hours(20), true, false).await;

        let failing = Arc::new(FailingUpcomingStore { inner: fx.events.clone() });
        let notifier = CalendarNotifier::new(failing, AlertService::new(fx.alerts.clone()))
            .with_clock(Arc::new(FixedClock(fx.now)));

        let err = notifier.trigger_once().await.unwrap_err();
        assert_eq!(err.to_string(), "event store unavailable");

        // The today pass never ran, so its event got no alert
        assert!(fx.all_alerts().await.is_empty());
    }

    #[tokio::test]
    async fn test_start_runs_immediately_and_stops() {
        let fx = Fixture::new().await;
        fx.add_event("event::up", fx.tomorrow().start + chrono::Duration::hours(9), true, false).await;

        let handle = NotificationScheduler::new(fx.notifier.clone())
            .with_interval(Duration::from_secs(3600))
            .start();
        assert!(handle.is_running());

        let mut created = 0;
        for _ in 0..100 {
            created = fx.all_alerts().await.len();
            if created > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(created, 1);

        handle.stop().await;
        assert_eq!(fx.all_alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_ticks_do_not_duplicate() {
        let fx = Fixture::new().await;
        fx.add_event("event::up", fx.tomorrow().start + chrono::Duration::hours(9), true, false).await;

        let handle = NotificationScheduler::new(fx.notifier.clone())
            .with_interval(Duration::from_millis(20))
            .start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.stop().await;

        assert_eq!(fx.all_alerts().await.len(), 1);
    }

    #[test]
    fn test_default_interval_is_one_hour() {
        assert_eq!(DEFAULT_NOTIFICATION_INTERVAL, Duration::from_secs(3600));
    }
}
