// Dashboard controller - Use case for loading and refreshing the dashboard
use crate::application::renderer::{ChartSurface, RenderContext, redraw};
use crate::domain::fixtures::demo_envelope;
use crate::domain::records::DashboardEnvelope;
use crate::domain::summary::Summary;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

pub const STATUS_FETCHING: &str = "Fetching latest data from Google Analytics...";
pub const STATUS_UPDATED: &str = "Dashboard updated successfully!";
pub const STATUS_DEMO: &str = "Showing demo data - check console for API connection details";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Where the dashboard gets its envelope from.
#[async_trait]
pub trait EnvelopeSource: Send + Sync {
    /// `Ok(None)` means the source answered, but not with an envelope.
    async fn fetch(&self) -> anyhow::Result<Option<DashboardEnvelope>>;
}

/// Everything on the dashboard that is not a chart.
pub trait DashboardView {
    fn set_refresh_enabled(&mut self, enabled: bool);
    fn show_status(&mut self, message: &str, kind: StatusKind);
    fn render_summary(&mut self, summary: &Summary);
    fn set_last_updated(&mut self, timestamp: &str);
}

/// User input while the dashboard is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rendered the gateway's data.
    Live,
    /// Fell back to the demo envelope.
    Demo,
}

/// What happened over one [`DashboardController::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub loads: usize,
    /// Clicks that hit the disabled refresh control.
    pub ignored_clicks: usize,
}

/// Disables the refresh control until dropped, including when the fetch
/// future is cancelled.
struct RefreshLock<'a, V: DashboardView> {
    enabled: &'a mut bool,
    view: &'a mut V,
}

impl<'a, V: DashboardView> RefreshLock<'a, V> {
    fn acquire(enabled: &'a mut bool, view: &'a mut V) -> Self {
        *enabled = false;
        view.set_refresh_enabled(false);
        Self { enabled, view }
    }
}

impl<V: DashboardView> Drop for RefreshLock<'_, V> {
    fn drop(&mut self) {
        *self.enabled = true;
        self.view.set_refresh_enabled(true);
    }
}

pub struct DashboardController<F, V, S> {
    source: F,
    view: V,
    surface: S,
    context: RenderContext,
    refresh_enabled: bool,
}

impl<F, V, S> DashboardController<F, V, S>
where
    F: EnvelopeSource,
    V: DashboardView,
    S: ChartSurface,
{
    pub fn new(source: F, view: V, surface: S) -> Self {
        Self {
            source,
            view,
            surface,
            context: RenderContext::new(),
            refresh_enabled: true,
        }
    }

    pub fn refresh_enabled(&self) -> bool {
        self.refresh_enabled
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Load the dashboard, then reload on every refresh click until a quit
    /// click or until `clicks` closes. Clicks that arrive while a load is in
    /// flight are dropped.
    pub async fn run(&mut self, mut clicks: mpsc::UnboundedReceiver<Click>) -> Session {
        let mut session = Session::default();

        loop {
            if !self.load_listening(&mut clicks, &mut session).await {
                break;
            }

            match clicks.recv().await {
                Some(Click::Refresh) => continue,
                Some(Click::Quit) | None => break,
            }
        }

        session
    }

    /// One load while still draining `clicks`. Returns false when the user
    /// quit or the input closed.
    async fn load_listening(
        &mut self,
        clicks: &mut mpsc::UnboundedReceiver<Click>,
        session: &mut Session,
    ) -> bool {
        let mut input_open = true;
        {
            let load = self.refresh();
            tokio::pin!(load);

            loop {
                tokio::select! {
                    _ = &mut load => break,
                    click = clicks.recv(), if input_open => match click {
                        Some(Click::Refresh) => {
                            tracing::debug!("Refresh ignored, fetch already in flight");
                            session.ignored_clicks += 1;
                        }
                        Some(Click::Quit) => {
                            tracing::info!("Quit while loading, cancelling fetch");
                            return false;
                        }
                        None => input_open = false,
                    },
                }
            }
        }
        session.loads += 1;

        // Clicks queued before the control came back on
        while let Ok(click) = clicks.try_recv() {
            match click {
                Click::Refresh => session.ignored_clicks += 1,
                Click::Quit => return false,
            }
        }
        input_open
    }

    /// Load (or reload) the dashboard. Any failure to fetch or draw the
    /// gateway's data falls back to the demo envelope.
    pub async fn refresh(&mut self) -> LoadOutcome {
        let envelope = match self.fetch().await {
            Ok(Some(envelope)) => envelope,
            Ok(None) => {
                tracing::warn!("Invalid data structure, showing demo data");
                self.show_demo();
                return LoadOutcome::Demo;
            }
            Err(e) => {
                tracing::error!("Failed to load data: {:#}", e);
                self.show_demo();
                return LoadOutcome::Demo;
            }
        };

        match self.render(&envelope) {
            Ok(()) => {
                self.view.show_status(STATUS_UPDATED, StatusKind::Success);
                LoadOutcome::Live
            }
            Err(e) => {
                tracing::error!("Failed to render data: {:#}", e);
                self.show_demo();
                LoadOutcome::Demo
            }
        }
    }

    async fn fetch(&mut self) -> anyhow::Result<Option<DashboardEnvelope>> {
        let mut lock = RefreshLock::acquire(&mut self.refresh_enabled, &mut self.view);
        lock.view.show_status(STATUS_FETCHING, StatusKind::Success);

        let result = self.source.fetch().await;

        drop(lock);
        if let Err(e) = &result {
            self.view.show_status(&format!("Error: {e}"), StatusKind::Error);
        }
        result
    }

    fn render(&mut self, envelope: &DashboardEnvelope) -> anyhow::Result<()> {
        self.view.render_summary(&Summary::from_cities(&envelope.city_data));
        let previous = std::mem::take(&mut self.context);
        self.context = redraw(&mut self.surface, previous, envelope)?;
        self.view.set_last_updated(&envelope.last_updated);
        Ok(())
    }

    fn show_demo(&mut self) {
        let demo = demo_envelope(Utc::now());
        if let Err(e) = self.render(&demo) {
            tracing::error!("Failed to render demo data: {:#}", e);
        }
        self.view.show_status(STATUS_DEMO, StatusKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::renderer::tests::RecordingSurface;
    use crate::domain::chart::ChartSlot;
    use crate::domain::fixtures::sample_envelope;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    enum StubSource {
        Ok(DashboardEnvelope),
        Fail(&'static str),
        Malformed,
        Pending,
    }

    #[async_trait]
    impl EnvelopeSource for StubSource {
        async fn fetch(&self) -> anyhow::Result<Option<DashboardEnvelope>> {
            match self {
                StubSource::Ok(envelope) => Ok(Some(envelope.clone())),
                StubSource::Fail(message) => anyhow::bail!("{message}"),
                StubSource::Malformed => Ok(None),
                StubSource::Pending => std::future::pending().await,
            }
        }
    }

    /// Holds every fetch until released.
    #[derive(Default)]
    struct GatedSource {
        started: Notify,
        release: Notify,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl EnvelopeSource for Arc<GatedSource> {
        async fn fetch(&self) -> anyhow::Result<Option<DashboardEnvelope>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(Some(sample_envelope(Utc::now())))
        }
    }

    #[derive(Default)]
    struct RecordingView {
        refresh_states: Vec<bool>,
        statuses: Vec<(String, StatusKind)>,
        summary: Option<Summary>,
        last_updated: Option<String>,
    }

    impl DashboardView for RecordingView {
        fn set_refresh_enabled(&mut self, enabled: bool) {
            self.refresh_states.push(enabled);
        }

        fn show_status(&mut self, message: &str, kind: StatusKind) {
            self.statuses.push((message.to_string(), kind));
        }

        fn render_summary(&mut self, summary: &Summary) {
            self.summary = Some(summary.clone());
        }

        fn set_last_updated(&mut self, timestamp: &str) {
            self.last_updated = Some(timestamp.to_string());
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_demo() {
        let mut controller = DashboardController::new(
            StubSource::Fail("HTTP error! status: 500"),
            RecordingView::default(),
            RecordingSurface::default(),
        );

        let outcome = controller.refresh().await;

        assert_eq!(outcome, LoadOutcome::Demo);
        let view = controller.view();
        assert_eq!(
            view.summary.as_ref(),
            Some(&Summary::from_cities(&demo_envelope(Utc::now()).city_data))
        );
        assert!(controller.refresh_enabled());
        assert_eq!(view.refresh_states, vec![false, true]);
        assert_eq!(
            view.statuses.last(),
            Some(&(STATUS_DEMO.to_string(), StatusKind::Error))
        );
        assert!(
            view.statuses
                .iter()
                .any(|(m, k)| m == "Error: HTTP error! status: 500" && *k == StatusKind::Error)
        );
        assert_eq!(controller.context().len(), 6);
    }

    #[tokio::test]
    async fn test_success_renders_gateway_data() {
        let envelope = sample_envelope(Utc::now());
        let mut controller = DashboardController::new(
            StubSource::Ok(envelope.clone()),
            RecordingView::default(),
            RecordingSurface::default(),
        );

        assert_eq!(controller.refresh().await, LoadOutcome::Live);
        let first = controller.context().clone();
        assert_eq!(controller.refresh().await, LoadOutcome::Live);

        let view = controller.view();
        assert_eq!(view.last_updated.as_deref(), Some(envelope.last_updated.as_str()));
        assert_eq!(
            view.statuses.last(),
            Some(&(STATUS_UPDATED.to_string(), StatusKind::Success))
        );
        assert_eq!(controller.surface().live.len(), 6);
        assert_ne!(
            controller.context().handle(ChartSlot::Platforms),
            first.handle(ChartSlot::Platforms)
        );
    }

    #[tokio::test]
    async fn test_invalid_structure_shows_demo_without_error_banner() {
        let mut controller = DashboardController::new(
            StubSource::Malformed,
            RecordingView::default(),
            RecordingSurface::default(),
        );

        assert_eq!(controller.refresh().await, LoadOutcome::Demo);

        let view = controller.view();
        assert!(!view.statuses.iter().any(|(m, _)| m.starts_with("Error:")));
        assert_eq!(
            view.statuses.last(),
            Some(&(STATUS_DEMO.to_string(), StatusKind::Error))
        );
        assert_eq!(controller.context().len(), 6);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_reenables_refresh() {
        let mut controller = DashboardController::new(
            StubSource::Pending,
            RecordingView::default(),
            RecordingSurface::default(),
        );

        let cancelled = tokio::time::timeout(Duration::from_millis(20), controller.refresh()).await;

        assert!(cancelled.is_err());
        assert!(controller.refresh_enabled());
        assert_eq!(controller.view().refresh_states, vec![false, true]);
    }

    #[tokio::test]
    async fn test_clicks_during_fetch_are_dropped() {
        let source = Arc::new(GatedSource::default());
        let mut controller = DashboardController::new(
            source.clone(),
            RecordingView::default(),
            RecordingSurface::default(),
        );
        let (tx, clicks) = mpsc::unbounded_channel();

        let clicker = async {
            source.started.notified().await;
            for _ in 0..3 {
                tx.send(Click::Refresh).unwrap();
            }
            source.release.notify_one();
            drop(tx);
        };
        let (session, ()) = tokio::join!(controller.run(clicks), clicker);

        assert_eq!(
            session,
            Session {
                loads: 1,
                ignored_clicks: 3,
            }
        );
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(controller.refresh_enabled());
        assert_eq!(controller.view().refresh_states, vec![false, true]);
        assert_eq!(controller.context().len(), 6);
    }

    #[tokio::test]
    async fn test_quit_while_loading_cancels_fetch() {
        let mut controller = DashboardController::new(
            StubSource::Pending,
            RecordingView::default(),
            RecordingSurface::default(),
        );
        let (tx, clicks) = mpsc::unbounded_channel();
        tx.send(Click::Quit).unwrap();

        let session = controller.run(clicks).await;

        assert_eq!(session.loads, 0);
        assert!(controller.refresh_enabled());
        assert!(controller.context().is_empty());
    }

    #[tokio::test]
    async fn test_draw_failure_falls_back_to_demo() {
        let surface = RecordingSurface {
            fail_on: Some(ChartSlot::BounceRate),
            ..Default::default()
        };
        let mut controller = DashboardController::new(
            StubSource::Ok(sample_envelope(Utc::now())),
            RecordingView::default(),
            surface,
        );

        assert_eq!(controller.refresh().await, LoadOutcome::Demo);
        assert!(controller.refresh_enabled());
        assert!(controller.surface().live.is_empty());
    }
}
