// Periodic refresh of a mounted page
use crate::application::dashboard_service::DashboardService;
use crate::presentation::view_controller::{DashboardView, ViewUpdate};
use futures::stream::Stream;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

/// Stream of view updates, one per successful refresh.
///
/// The first refresh happens one `period` after the stream is created, since
/// the page was rendered from fresh data. Failed fetches are logged and skipped
/// so the page keeps its previous state. Dropping the stream stops the timer and
/// tears down the view along with its charts.
pub fn refresh_updates(
    service: DashboardService,
    mut view: DashboardView,
    period: Duration,
) -> impl Stream<Item = ViewUpdate> {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = IntervalStream::new(ticker);

    async_stream::stream! {
        while ticks.next().await.is_some() {
            match service.fetch_readings().await {
                Ok(readings) => yield view.apply(&readings),
                Err(e) => {
                    tracing::warn!("Refresh of {} failed, keeping previous view: {}", view.page(), e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reading_source::testing::ScriptedSource;
    use crate::domain::projection::fixtures::reading;
    use crate::domain::projection::RoomFilter;
    use crate::infrastructure::config::DisplaySettings;
    use crate::presentation::view_controller::Page;
    use std::sync::Arc;

    const PERIOD: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_first_refresh_waits_one_period() {
        let source = Arc::new(ScriptedSource::ok(vec![reading("Kitchen", 1, 40.0)]));
        let view = DashboardView::new(Page::Overview, DisplaySettings::default());
        let started = Instant::now();

        let mut updates = Box::pin(refresh_updates(
            DashboardService::new(source.clone()),
            view,
            PERIOD,
        ));
        let update = updates.next().await.unwrap();

        assert!(started.elapsed() >= PERIOD);
        assert!(update.cards.unwrap().contains("40 AQI"));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_is_skipped() {
        let source = Arc::new(ScriptedSource::new(vec![
            None,
            Some(vec![reading("Kitchen", 1, 40.0), reading("Kitchen", 2, 90.0)]),
        ]));
        let view = DashboardView::resume(
            Page::Details(RoomFilter::Room("Kitchen".to_string())),
            DisplaySettings::default(),
            Some(1),
        );
        let started = Instant::now();

        let mut updates = Box::pin(refresh_updates(
            DashboardService::new(source.clone()),
            view,
            PERIOD,
        ));
        let update = updates.next().await.unwrap();

        assert!(started.elapsed() >= PERIOD * 2);
        assert_eq!(source.calls(), 2);
        assert_eq!(update.charts[0].replaces, Some(1));
        assert_eq!(update.charts[0].handle, 2);
        assert_eq!(update.table.unwrap().matches("<tr>").count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successive_refreshes_replace_charts() {
        let source = Arc::new(ScriptedSource::ok(vec![reading("Hall", 1, 10.0)]));
        let view = DashboardView::new(Page::Overview, DisplaySettings::default());

        let mut updates = Box::pin(refresh_updates(DashboardService::new(source), view, PERIOD));
        let first = updates.next().await.unwrap();
        let second = updates.next().await.unwrap();

        assert_eq!(second.charts[0].replaces, Some(first.charts[0].handle));
        assert_eq!(first.cards, second.cards);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_refresh_replaces_rendered_chart() {
        let source = Arc::new(ScriptedSource::ok(vec![reading("Hall", 1, 10.0)]));
        let service = DashboardService::new(source);
        let readings = service.fetch_readings().await.unwrap();

        let mut rendered = DashboardView::new(Page::Overview, DisplaySettings::default());
        let initial = rendered.apply(&readings);
        let mounted = rendered.hand_off();
        assert_eq!(mounted, Some(initial.charts[0].handle));

        let view = DashboardView::resume(Page::Overview, DisplaySettings::default(), mounted);
        let mut updates = Box::pin(refresh_updates(service, view, PERIOD));
        let first = updates.next().await.unwrap();

        assert_eq!(first.charts[0].replaces, Some(initial.charts[0].handle));
        assert_ne!(first.charts[0].handle, initial.charts[0].handle);
    }
}
