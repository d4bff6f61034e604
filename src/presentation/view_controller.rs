// Per-page view controller owning the page's chart handles
use crate::domain::dashboard::{Details, Overview};
use crate::domain::projection::RoomFilter;
use crate::domain::reading::Reading;
use crate::infrastructure::config::DisplaySettings;
use crate::presentation::{charts, views};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Overview,
    Details(RoomFilter),
}

impl Page {
    pub fn chart_slot(&self) -> ChartSlot {
        match self {
            Page::Overview => ChartSlot::Overview,
            Page::Details(_) => ChartSlot::Details,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Overview => f.write_str("overview"),
            Page::Details(filter) => write!(f, "details[{}]", filter),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSlot {
    Overview,
    Details,
}

/// A chart instance mounted on the page. Handles are never reused: every
/// refresh mounts a new one and disposes the one it replaces.
#[derive(Debug)]
pub struct ChartHandle {
    slot: ChartSlot,
    generation: u64,
}

impl ChartHandle {
    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn dispose(self) {
        tracing::debug!("Disposing {:?} chart #{}", self.slot, self.generation);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartUpdate {
    pub slot: ChartSlot,
    pub handle: u64,
    /// Handle of the chart instance this one supersedes.
    pub replaces: Option<u64>,
    pub config: Value,
}

/// Everything one refresh changes on a page. `None` fragments are left as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewUpdate {
    pub cards: Option<String>,
    pub selector: Option<String>,
    pub table: Option<String>,
    pub charts: Vec<ChartUpdate>,
}

pub struct DashboardView {
    page: Page,
    display: DisplaySettings,
    charts: HashMap<ChartSlot, ChartHandle>,
    next_generation: u64,
    disposed: u64,
}

impl DashboardView {
    pub fn new(page: Page, display: DisplaySettings) -> Self {
        Self {
            page,
            display,
            charts: HashMap::new(),
            next_generation: 1,
            disposed: 0,
        }
    }

    /// Take over a page whose chart `mounted` was rendered by a view that
    /// has since been handed off.
    pub fn resume(page: Page, display: DisplaySettings, mounted: Option<u64>) -> Self {
        let mut view = Self::new(page, display);
        if let Some(generation) = mounted {
            let slot = view.page.chart_slot();
            view.charts.insert(slot, ChartHandle { slot, generation });
            view.next_generation = generation.saturating_add(1);
        }
        view
    }

    /// Release the page's charts without disposing them, returning the handle
    /// mounted in the page's slot for a later [`DashboardView::resume`].
    pub fn hand_off(mut self) -> Option<u64> {
        let slot = self.page.chart_slot();
        let mounted = self.charts.remove(&slot).map(|handle| handle.generation);
        for (_, handle) in self.charts.drain() {
            handle.dispose();
            self.disposed += 1;
        }
        mounted
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    #[cfg(test)]
    pub fn chart(&self, slot: ChartSlot) -> Option<&ChartHandle> {
        self.charts.get(&slot)
    }

    /// Number of chart instances released so far.
    #[cfg(test)]
    pub fn disposed_charts(&self) -> u64 {
        self.disposed
    }

    /// Re-derive the page from a fresh reading set, replacing DOM content and
    /// chart instances.
    pub fn apply(&mut self, readings: &[Reading]) -> ViewUpdate {
        let slot = self.page.chart_slot();
        match self.page.clone() {
            Page::Overview => {
                let overview = Overview::from_readings(readings);
                let chart = self.mount(slot, charts::overview_chart(&overview));
                ViewUpdate {
                    cards: Some(views::room_cards(&overview)),
                    selector: None,
                    table: None,
                    charts: vec![chart],
                }
            }
            Page::Details(filter) => {
                let details = Details::from_readings(readings, filter);
                let chart = self.mount(slot, charts::details_chart(&details));
                ViewUpdate {
                    cards: None,
                    selector: Some(views::room_selector(&details)),
                    table: Some(views::data_table(&details.rows, &self.display.time_format)),
                    charts: vec![chart],
                }
            }
        }
    }

    fn mount(&mut self, slot: ChartSlot, config: Value) -> ChartUpdate {
        let handle = ChartHandle {
            slot,
            generation: self.next_generation,
        };
        self.next_generation += 1;

        let generation = handle.generation;
        let replaces = self.charts.insert(slot, handle).map(|previous| {
            let replaced = previous.generation;
            previous.dispose();
            self.disposed += 1;
            replaced
        });

        ChartUpdate {
            slot,
            handle: generation,
            replaces,
            config,
        }
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        for (_, handle) in self.charts.drain() {
            handle.dispose();
            self.disposed += 1;
        }
        tracing::debug!("View {} torn down, {} charts disposed", self.page, self.disposed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::fixtures::reading;

    fn readings() -> Vec<Reading> {
        vec![
            reading("Kitchen", 1, 40.0),
            reading("Hall", 3, 120.0),
            reading("Kitchen", 2, 90.0),
        ]
    }

    #[test]
    fn test_overview_update() {
        let mut view = DashboardView::new(Page::Overview, DisplaySettings::default());
        let update = view.apply(&readings());

        assert!(update.table.is_none());
        let cards = update.cards.unwrap();
        assert_eq!(cards.matches("class=\"card fade-in\"").count(), 2);
        assert_eq!(update.charts.len(), 1);
        assert_eq!(update.charts[0].slot, ChartSlot::Overview);
        assert_eq!(update.charts[0].replaces, None);
    }

    #[test]
    fn test_refresh_replaces_chart_instance() {
        let mut view = DashboardView::new(Page::Overview, DisplaySettings::default());
        let first = view.apply(&readings());
        let second = view.apply(&readings());

        assert_eq!(second.charts[0].replaces, Some(first.charts[0].handle));
        assert_ne!(second.charts[0].handle, first.charts[0].handle);
        assert_eq!(view.chart(ChartSlot::Overview).unwrap().generation(), second.charts[0].handle);
        assert_eq!(view.disposed_charts(), 1);
    }

    #[test]
    fn test_reapplying_same_input_is_idempotent() {
        let filter = RoomFilter::Room("Kitchen".to_string());
        let mut view = DashboardView::new(Page::Details(filter), DisplaySettings::default());
        let first = view.apply(&readings());
        let second = view.apply(&readings());

        assert_eq!(first.selector, second.selector);
        assert_eq!(first.table, second.table);
        assert_eq!(first.charts[0].config, second.charts[0].config);
    }

    #[test]
    fn test_details_update() {
        let mut view = DashboardView::new(Page::Details(RoomFilter::All), DisplaySettings::default());
        let update = view.apply(&readings());

        assert!(update.cards.is_none());
        assert_eq!(update.table.unwrap().matches("<tr>").count(), 4);
        assert!(update.selector.unwrap().contains(r#"<option value="all" selected>"#));
        assert_eq!(update.charts[0].slot, ChartSlot::Details);
    }

    #[test]
    fn test_hand_off_keeps_mounted_chart() {
        let mut rendered = DashboardView::new(Page::Overview, DisplaySettings::default());
        let initial = rendered.apply(&readings());
        let mounted = rendered.hand_off();
        assert_eq!(mounted, Some(initial.charts[0].handle));

        let mut live = DashboardView::resume(Page::Overview, DisplaySettings::default(), mounted);
        let refresh = live.apply(&readings());

        assert_eq!(refresh.charts[0].replaces, Some(initial.charts[0].handle));
        assert!(refresh.charts[0].handle > initial.charts[0].handle);
        assert_eq!(live.disposed_charts(), 1);
    }

    #[test]
    fn test_resume_without_mounted_chart() {
        let filter = RoomFilter::Room("Hall".to_string());
        let mut view = DashboardView::resume(Page::Details(filter), DisplaySettings::default(), None);
        let update = view.apply(&readings());

        assert_eq!(update.charts[0].replaces, None);
        assert_eq!(update.charts[0].handle, 1);
    }

    #[test]
    fn test_serialized_update_shape() {
        let mut view = DashboardView::new(Page::Overview, DisplaySettings::default());
        let update = serde_json::to_value(view.apply(&readings())).unwrap();

        assert_eq!(update["charts"][0]["slot"], "overview");
        assert!(update["table"].is_null());
        assert!(update["cards"].is_string());
    }
}
