//! # Calendar Notifications
//!
//! Turns calendar events into reminder alerts. There are two passes:
//!
//! - **upcoming**: events on the next local calendar day with `reminder` on
//!   and not completed get one `"Upcoming: …"` alert.
//! - **today**: events on the current local calendar day that are not
//!   completed get one `"Today: …"` alert. This pass does not look at the
//!   `reminder` flag.
//!
//! Each pass looks for an existing alert before creating one. The two passes
//! scope that lookup differently, see [`UPCOMING_DEDUP_SCOPE`] and
//! [`TODAY_DEDUP_SCOPE`]. The create itself is a conditional insert on the
//! same scope, so passes racing each other cannot write duplicates.
//!
//! Errors from the store or from alert creation are returned unchanged. A pass
//! that fails halfway keeps the alerts it already wrote.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::alert_service::AlertService;
use crate::domain::day_window::{Clock, DayWindow, SystemClock};
use crate::domain::models::{DedupScope, DomainCalendarEvent, EventFilter};
use crate::storage::CalendarEventStorage;

/// Upcoming alerts are suppressed by any calendar alert for the event,
/// whatever its class.
pub const UPCOMING_DEDUP_SCOPE: DedupScope = DedupScope::AnyCalendarAlert;

/// Today alerts are suppressed only by an earlier "Today:" alert, so an
/// upcoming reminder sent yesterday doesn't block today's.
pub const TODAY_DEDUP_SCOPE: DedupScope = DedupScope::TitlePrefix(TODAY_PREFIX);

const UPCOMING_PREFIX: &str = "Upcoming:";
const TODAY_PREFIX: &str = "Today:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationClass {
    Upcoming,
    Today,
}

impl NotificationClass {
    pub fn title_prefix(&self) -> &'static str {
        match self {
            NotificationClass::Upcoming => UPCOMING_PREFIX,
            NotificationClass::Today => TODAY_PREFIX,
        }
    }

    /// Word used in the message body for the event's day
    pub fn day_phrase(&self) -> &'static str {
        match self {
            NotificationClass::Upcoming => "tomorrow",
            NotificationClass::Today => "today",
        }
    }

    /// The local day this class selects events from
    pub fn window(&self, clock: &dyn Clock) -> DayWindow {
        let now = clock.now();
        match self {
            NotificationClass::Upcoming => DayWindow::tomorrow(now),
            NotificationClass::Today => DayWindow::today(now),
        }
    }

    pub fn event_filter(&self) -> EventFilter {
        match self {
            NotificationClass::Upcoming => EventFilter {
                reminder: Some(true),
                completed: Some(false),
            },
            NotificationClass::Today => EventFilter {
                reminder: None,
                completed: Some(false),
            },
        }
    }

    pub fn dedup_scope(&self) -> DedupScope {
        match self {
            NotificationClass::Upcoming => UPCOMING_DEDUP_SCOPE,
            NotificationClass::Today => TODAY_DEDUP_SCOPE,
        }
    }

    pub fn compose_title(&self, event: &DomainCalendarEvent) -> String {
        format!("{} {}", self.title_prefix(), event.title)
    }

    /// `"{title} {day}[ at {time}][ - {description}]"`
    pub fn compose_message(&self, event: &DomainCalendarEvent) -> String {
        let mut message = format!("{} {}", event.title, self.day_phrase());
        if let Some(time) = non_blank(&event.time) {
            message.push_str(" at ");
            message.push_str(time);
        }
        if let Some(description) = non_blank(&event.description) {
            message.push_str(" - ");
            message.push_str(description);
        }
        message
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// What one notifier pass saw and did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    pub class: NotificationClass,
    /// Events that matched the window and flag filters
    pub candidate_count: u32,
    /// Alerts actually written during the pass
    pub created_count: u32,
}

/// Aggregate of a manual trigger: upcoming pass, then today pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerResult {
    pub upcoming: PassOutcome,
    pub today: PassOutcome,
}

impl TriggerResult {
    pub fn upcoming_notifications(&self) -> u32 {
        self.upcoming.candidate_count
    }

    pub fn today_notifications(&self) -> u32 {
        self.today.candidate_count
    }
}

/// Runs notification passes against the event store
#[derive(Clone)]
pub struct CalendarNotifier {
    events: Arc<dyn CalendarEventStorage>,
    alert_service: AlertService,
    clock: Arc<dyn Clock>,
}

impl CalendarNotifier {
    pub fn new(events: Arc<dyn CalendarEventStorage>, alert_service: AlertService) -> Self {
        Self {
            events,
            alert_service,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock used to compute day windows
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Alert on tomorrow's events
    pub async fn notify_upcoming(&self) -> Result<PassOutcome> {
        self.run_pass(NotificationClass::Upcoming).await
    }

    /// Alert on today's events
    pub async fn notify_today(&self) -> Result<PassOutcome> {
        self.run_pass(NotificationClass::Today).await
    }

    /// Run the upcoming pass then the today pass. Stops at the first error.
    pub async fn trigger_once(&self) -> Result<TriggerResult> {
        info!("Manual notification trigger");
        let upcoming = self.notify_upcoming().await?;
        let today = self.notify_today().await?;
        Ok(TriggerResult { upcoming, today })
    }

    async fn run_pass(&self, class: NotificationClass) -> Result<PassOutcome> {
        let window = class.window(self.clock.as_ref());
        let scope = class.dedup_scope();

        let events = self
            .events
            .find_events_in_range(window.start, window.end, class.event_filter())
            .await?;

        debug!(
            "{:?} pass: {} candidate events in [{}, {})",
            class,
            events.len(),
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        );

        // One event at a time, in store order
        let mut created_count = 0;
        for event in &events {
            if self
                .alert_service
                .find_calendar_alert(&event.id, scope)
                .await?
                .is_some()
            {
                debug!("Skipping event {}: already notified", event.id);
                continue;
            }

            let title = class.compose_title(event);
            let message = class.compose_message(event);
            let created = self
                .alert_service
                .create_calendar_alert(&event.baby_id, &event.id, &title, &message, scope)
                .await?;

            if created.is_some() {
                created_count += 1;
                info!(
                    "{:?} reminder for {} ({})",
                    class,
                    event.baby_name.as_deref().unwrap_or(&event.baby_id),
                    event.title
                );
            }
        }

        let outcome = PassOutcome {
            class,
            candidate_count: events.len() as u32,
            created_count,
        };
        info!(
            "{:?} pass finished: {} candidates, {} alerts created",
            class, outcome.candidate_count, outcome.created_count
        );
        Ok(outcome)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::day_window::FixedClock;
    use crate::domain::models::DomainBaby;
    use crate::storage::{
        AlertRepository, AlertStorage, BabyRepository, BabyStorage, CalendarEventRepository,
        DbConnection,
    };
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};

    pub(crate) struct Fixture {
        pub notifier: CalendarNotifier,
        pub events: Arc<CalendarEventRepository>,
        pub alerts: Arc<AlertRepository>,
        pub now: DateTime<Local>,
    }

    impl Fixture {
        pub async fn new() -> Self {
            let db = DbConnection::init_test().await.expect("Failed to create test database");
            Self::with_db(db).await
        }

        pub async fn with_db(db: DbConnection) -> Self {
            BabyRepository::new(db.clone())
                .store_baby(&DomainBaby {
                    id: "baby::1".to_string(),
                    name: "Mia".to_string(),
                    birthdate: "2025-01-15".to_string(),
                    created_at: "t".to_string(),
                    updated_at: "t".to_string(),
                })
                .await
                .expect("Failed to store baby");

            let events = Arc::new(CalendarEventRepository::new(db.clone()));
            let alerts = Arc::new(AlertRepository::new(db));
            let now = Local
                .with_ymd_and_hms(2025, 6, 14, 9, 30, 0)
                .earliest()
                .expect("valid local time");
            let notifier = CalendarNotifier::new(events.clone(), AlertService::new(alerts.clone()))
                .with_clock(Arc::new(FixedClock(now)));

            Self { notifier, events, alerts, now }
        }

        pub fn tomorrow(&self) -> DayWindow {
            DayWindow::tomorrow(self.now)
        }

        pub fn today(&self) -> DayWindow {
            DayWindow::today(self.now)
        }

        pub async fn add_event(&self, id: &str, date: DateTime<Utc>, reminder: bool, completed: bool) {
            let event = DomainCalendarEvent {
                id: id.to_string(),
                baby_id: "baby::1".to_string(),
                baby_name: None,
                title: "Doctor visit".to_string(),
                description: Some("bring insurance card".to_string()),
                date,
                time: Some("10:00".to_string()),
                reminder,
                completed,
                created_at: "t".to_string(),
                updated_at: "t".to_string(),
            };
            self.events.store_event(&event).await.expect("Failed to store event");
        }

        pub async fn all_alerts(&self) -> Vec<crate::domain::models::DomainAlert> {
            self.alerts.list_alerts_for_baby("baby::1").await.expect("Failed to list alerts")
        }
    }

    fn sample_event(time: Option<&str>, description: Option<&str>) -> DomainCalendarEvent {
        DomainCalendarEvent {
            id: "event::1".to_string(),
            baby_id: "baby::1".to_string(),
            baby_name: None,
            title: "Doctor visit".to_string(),
            description: description.map(str::to_string),
            date: Utc::now(),
            time: time.map(str::to_string),
            reminder: true,
            completed: false,
            created_at: "t".to_string(),
            updated_at: "t".to_string(),
        }
    }

    #[test]
    fn test_message_composition() {
        let upcoming = NotificationClass::Upcoming;

        let full = sample_event(Some("10:00"), Some("bring insurance card"));
        assert_eq!(
            upcoming.compose_message(&full),
            "Doctor visit tomorrow at 10:00 - bring insurance card"
        );
        assert_eq!(upcoming.compose_title(&full), "Upcoming: Doctor visit");

        let no_time = sample_event(None, Some("bring insurance card"));
        assert_eq!(
            upcoming.compose_message(&no_time),
            "Doctor visit tomorrow - bring insurance card"
        );

        let bare = sample_event(Some("  "), None);
        assert_eq!(upcoming.compose_message(&bare), "Doctor visit tomorrow");

        let today = NotificationClass::Today;
        assert_eq!(
            today.compose_message(&full),
            "Doctor visit today at 10:00 - bring insurance card"
        );
        assert_eq!(today.compose_title(&full), "Today: Doctor visit");
    }

    #[test]
    fn test_class_filters_and_scopes() {
        assert_eq!(
            NotificationClass::Upcoming.event_filter(),
            EventFilter { reminder: Some(true), completed: Some(false) }
        );
        assert_eq!(
            NotificationClass::Today.event_filter(),
            EventFilter { reminder: None, completed: Some(false) }
        );
        assert_eq!(NotificationClass::Upcoming.dedup_scope(), DedupScope::AnyCalendarAlert);
        assert_eq!(NotificationClass::Today.dedup_scope(), DedupScope::TitlePrefix("Today:"));
    }

    #[tokio::test]
    async fn test_upcoming_window_boundaries() {
        let fx = Fixture::new().await;
        let window = fx.tomorrow();

        fx.add_event("event::at_midnight", window.start, true, false).await;
        fx.add_event("event::just_before", window.start - Duration::milliseconds(1), true, false).await;
        fx.add_event("event::day_after", window.end, true, false).await;

        let outcome = fx.notifier.notify_upcoming().await.expect("Upcoming pass failed");
        assert_eq!(outcome.candidate_count, 1);
        assert_eq!(outcome.created_count, 1);

        let alerts = fx.all_alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].calendar_event_id.as_deref(), Some("event::at_midnight"));
        assert_eq!(alerts[0].title, "Upcoming: Doctor visit");
        assert_eq!(alerts[0].message, "Doctor visit tomorrow at 10:00 - bring insurance card");
    }

    #[tokio::test]
    async fn test_reminder_and_completed_filtering() {
        let fx = Fixture::new().await;
        let tomorrow = fx.tomorrow().start + Duration::hours(10);
        let today = fx.today().start + Duration::hours(10);

        fx.add_event("event::tomorrow_quiet", tomorrow, false, false).await;
        fx.add_event("event::tomorrow_done", tomorrow, true, true).await;
        fx.add_event("event::today_done", today, true, true).await;
        // The today pass ignores the reminder flag
        fx.add_event("event::today_quiet", today, false, false).await;

        let upcoming = fx.notifier.notify_upcoming().await.unwrap();
        assert_eq!(upcoming.candidate_count, 0);

        let today_outcome = fx.notifier.notify_today().await.unwrap();
        assert_eq!(today_outcome.candidate_count, 1);
        assert_eq!(today_outcome.created_count, 1);

        let alerts = fx.all_alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].calendar_event_id.as_deref(), Some("event::today_quiet"));
        assert_eq!(alerts[0].title, "Today: Doctor visit");
    }

    #[tokio::test]
    async fn test_passes_are_idempotent() {
        let fx = Fixture::new().await;
        fx.add_event("event::a", fx.tomorrow().start + Duration::hours(9), true, false).await;
        fx.add_event("event::b", fx.tomorrow().start + Duration::hours(15), true, false).await;
        fx.add_event("event::c", fx.today().start + Duration::hours(15), true, false).await;

        let first = fx.notifier.notify_upcoming().await.unwrap();
        let second = fx.notifier.notify_upcoming().await.unwrap();
        assert_eq!((first.candidate_count, first.created_count), (2, 2));
        assert_eq!((second.candidate_count, second.created_count), (2, 0));

        let first = fx.notifier.notify_today().await.unwrap();
        let second = fx.notifier.notify_today().await.unwrap();
        assert_eq!((first.candidate_count, first.created_count), (1, 1));
        assert_eq!((second.candidate_count, second.created_count), (1, 0));

        assert_eq!(fx.all_alerts().await.len(), 3);
    }

    #[tokio::test]
    async fn test_today_alert_follows_earlier_upcoming_alert() {
        let fx = Fixture::new().await;
        let event_date = fx.tomorrow().start + Duration::hours(10);
        fx.add_event("event::1", event_date, true, false).await;

        // Day before: upcoming reminder
        fx.notifier.notify_upcoming().await.unwrap();

        // Day of: same event, clock moved forward one day
        let next_day = fx.now + Duration::days(1);
        let notifier = fx.notifier.clone().with_clock(Arc::new(FixedClock(next_day)));
        let outcome = notifier.notify_today().await.unwrap();
        assert_eq!(outcome.candidate_count, 1);
        assert_eq!(outcome.created_count, 1);

        let mut titles: Vec<String> = fx.all_alerts().await.into_iter().map(|a| a.title).collect();
        titles.sort();
        assert_eq!(titles, vec!["Today: Doctor visit".to_string(), "Upcoming: Doctor visit".to_string()]);
    }

    #[tokio::test]
    async fn test_upcoming_scope_is_blocked_by_any_calendar_alert() {
        let fx = Fixture::new().await;
        fx.add_event("event::1", fx.tomorrow().start + Duration::hours(10), true, false).await;

        fx.notifier
            .alert_service
            .create_calendar_alert("baby::1", "event::1", "Today: Doctor visit", "m", TODAY_DEDUP_SCOPE)
            .await
            .unwrap();

        let outcome = fx.notifier.notify_upcoming().await.unwrap();
        assert_eq!(outcome.candidate_count, 1);
        assert_eq!(outcome.created_count, 0);
    }

    #[tokio::test]
    async fn test_trigger_once_aggregates_both_passes() {
        let fx = Fixture::new().await;
        fx.add_event("event::up1", fx.tomorrow().start + Duration::hours(8), true, false).await;
        fx.add_event("event::up2", fx.tomorrow().start + Duration::hours(16), true, false).await;
        fx.add_event("event::today", fx.today().start + Duration::hours(18), true, false).await;

        let result = fx.notifier.trigger_once().await.expect("Trigger failed");
        assert_eq!(result.upcoming_notifications(), 2);
        assert_eq!(result.today_notifications(), 1);
        assert_eq!(result.upcoming.created_count, 2);
        assert_eq!(result.today.created_count, 1);

        assert_eq!(fx.all_alerts().await.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_passes_do_not_duplicate() {
        let (db, path) = DbConnection::init_test_file(5)
            .await
            .expect("Failed to create test database");
        let fx = Fixture::with_db(db).await;
        for i in 0..20 {
            let date = fx.today().start + Duration::hours(8) + Duration::minutes(i);
            fx.add_event(&format!("event::{}", i), date, true, false).await;
        }

        let passes: Vec<_> = (0..4)
            .map(|_| {
                let notifier = fx.notifier.clone();
                tokio::spawn(async move { notifier.notify_today().await })
            })
            .collect();

        let mut created = 0;
        for pass in passes {
            let outcome = pass
                .await
                .expect("Pass task panicked")
                .expect("Today pass failed");
            assert_eq!(outcome.candidate_count, 20);
            created += outcome.created_count;
        }

        let alerts = fx.all_alerts().await;
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }

        assert_eq!(created, 20);
        assert_eq!(alerts.len(), 20);
    }
}
