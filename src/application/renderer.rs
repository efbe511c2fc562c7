// Chart rendering - explicit context instead of global chart state
use crate::domain::chart::{ChartSlot, ChartSpec, build_chart_specs};
use crate::domain::records::DashboardEnvelope;
use std::collections::BTreeMap;

/// Opaque handle to a chart drawn on a [`ChartSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// Drawing backend for dashboard charts.
pub trait ChartSurface {
    fn draw(&mut self, spec: &ChartSpec) -> anyhow::Result<ChartHandle>;

    /// Release a chart and whatever it holds on the surface.
    fn destroy(&mut self, handle: ChartHandle);
}

/// The charts currently on screen, keyed by slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderContext {
    charts: BTreeMap<ChartSlot, ChartHandle>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, slot: ChartSlot) -> Option<ChartHandle> {
        self.charts.get(&slot).copied()
    }

    pub fn handles(&self) -> impl Iterator<Item = ChartHandle> + '_ {
        self.charts.values().copied()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

/// Tear down every chart in `context`, then draw the dashboard charts for
/// `envelope`. The returned context owns exactly the new handles.
///
/// If drawing fails midway, the charts drawn so far are destroyed too, so the
/// surface never keeps charts no context knows about.
pub fn redraw<S: ChartSurface + ?Sized>(
    surface: &mut S,
    context: RenderContext,
    envelope: &DashboardEnvelope,
) -> anyhow::Result<RenderContext> {
    for handle in context.charts.into_values() {
        surface.destroy(handle);
    }

    let mut next = RenderContext::new();
    for spec in build_chart_specs(envelope) {
        match surface.draw(&spec) {
            Ok(handle) => {
                next.charts.insert(spec.slot, handle);
            }
            Err(e) => {
                for handle in next.charts.into_values() {
                    surface.destroy(handle);
                }
                return Err(e.context(format!("failed to draw {:?} chart", spec.slot)));
            }
        }
    }

    Ok(next)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::fixtures::demo_envelope;
    use chrono::Utc;
    use std::collections::HashSet;

    /// Surface that records draw/destroy calls.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub next_id: u64,
        pub live: HashSet<ChartHandle>,
        pub log: Vec<String>,
        pub fail_on: Option<ChartSlot>,
    }

    impl ChartSurface for RecordingSurface {
        fn draw(&mut self, spec: &ChartSpec) -> anyhow::Result<ChartHandle> {
            if self.fail_on == Some(spec.slot) {
                anyhow::bail!("canvas unavailable");
            }
            self.next_id += 1;
            let handle = ChartHandle(self.next_id);
            self.live.insert(handle);
            self.log.push(format!("draw {}", self.next_id));
            Ok(handle)
        }

        fn destroy(&mut self, handle: ChartHandle) {
            assert!(self.live.remove(&handle), "destroyed unknown chart {handle:?}");
            self.log.push(format!("destroy {}", handle.0));
        }
    }

    #[test]
    fn test_redraw_tears_down_before_drawing() {
        let mut surface = RecordingSurface::default();
        let envelope = demo_envelope(Utc::now());

        let first = redraw(&mut surface, RenderContext::new(), &envelope).unwrap();
        assert_eq!(first.len(), 6);

        surface.log.clear();
        let second = redraw(&mut surface, first.clone(), &envelope).unwrap();

        assert_eq!(second.len(), 6);
        assert_eq!(surface.live.len(), 6);
        assert!(surface.log[..6].iter().all(|l| l.starts_with("destroy")));
        assert!(surface.log[6..].iter().all(|l| l.starts_with("draw")));
        assert!(first.handles().all(|h| !surface.live.contains(&h)));
    }

    #[test]
    fn test_failed_redraw_leaves_no_charts() {
        let mut surface = RecordingSurface {
            fail_on: Some(ChartSlot::Platforms),
            ..Default::default()
        };

        let result = redraw(&mut surface, RenderContext::new(), &demo_envelope(Utc::now()));

        assert!(result.is_err());
        assert!(surface.live.is_empty());
    }
}
