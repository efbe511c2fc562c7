// Terminal dashboard output; charts are ratatui widgets
use crate::application::dashboard_controller::{DashboardView, StatusKind};
use crate::application::renderer::{ChartHandle, ChartSurface};
use crate::domain::chart::{ChartKind, ChartSpec, ValueFormat};
use crate::domain::summary::{Summary, group_thousands};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Cell, Chart, Dataset as Series, GraphType, Row, Table,
    Widget,
};
use std::collections::HashSet;
use std::io::Write;

pub const CHART_WIDTH: u16 = 100;
const PLOT_HEIGHT: u16 = 14;
const SERIES_COLORS: [Color; 2] = [Color::Cyan, Color::Yellow];

pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!("Failed to write dashboard output: {}", e);
        }
    }
}

impl<W: Write> DashboardView for TerminalView<W> {
    fn set_refresh_enabled(&mut self, enabled: bool) {
        if enabled {
            self.line("Press Enter to refresh, q to quit.");
        }
    }

    fn show_status(&mut self, message: &str, kind: StatusKind) {
        let tag = match kind {
            StatusKind::Success => "ok",
            StatusKind::Error => "error",
        };
        self.line(&format!("[{tag}] {message}"));
    }

    fn render_summary(&mut self, summary: &Summary) {
        self.line("");
        self.line(&format!("Total Users       {}", summary.total_users_display()));
        self.line(&format!("Total Sessions    {}", summary.total_sessions_display()));
        self.line(&format!("Avg. Bounce Rate  {}", summary.avg_bounce_display()));
        self.line(&format!("Most Active City  {}", summary.most_active_city));
    }

    fn set_last_updated(&mut self, timestamp: &str) {
        self.line(&format!("Last updated: {timestamp}"));
    }
}

/// Draws each chart with ratatui into an off-screen buffer and prints it.
/// Keeps track of what is on screen.
pub struct TerminalSurface<W: Write> {
    out: W,
    next_id: u64,
    live: HashSet<ChartHandle>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_id: 0,
            live: HashSet::new(),
        }
    }

    pub fn live_charts(&self) -> usize {
        self.live.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, spec: &ChartSpec) -> std::io::Result<()> {
        let mut buf = Buffer::empty(Rect::new(0, 0, CHART_WIDTH, chart_height(spec)));
        render_chart(spec, buf.area, &mut buf);

        writeln!(self.out)?;
        for line in buffer_lines(&buf) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

impl<W: Write> ChartSurface for TerminalSurface<W> {
    fn draw(&mut self, spec: &ChartSpec) -> anyhow::Result<ChartHandle> {
        self.print(spec)?;
        self.next_id += 1;
        let handle = ChartHandle(self.next_id);
        self.live.insert(handle);
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if !self.live.remove(&handle) {
            tracing::warn!("Destroying unknown chart {:?}", handle);
        }
    }
}

/// Rows needed to draw `spec`, borders included.
pub fn chart_height(spec: &ChartSpec) -> u16 {
    let rows = u16::try_from(spec.labels.len()).unwrap_or(u16::MAX);
    match spec.kind {
        ChartKind::Bar | ChartKind::Line => PLOT_HEIGHT,
        ChartKind::HorizontalBar => rows.saturating_add(2),
        // header row
        ChartKind::Doughnut | ChartKind::Pie => rows.saturating_add(3),
    }
}

/// Draw `spec` into `area`.
pub fn render_chart(spec: &ChartSpec, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered().title(format!(" {} ", spec.title));

    match spec.kind {
        ChartKind::Bar => grouped_bars(spec).block(block).render(area, buf),
        ChartKind::HorizontalBar => labelled_bars(spec).block(block).render(area, buf),
        ChartKind::Line => render_line(spec, block, area, buf),
        ChartKind::Doughnut | ChartKind::Pie => share_table(spec).block(block).render(area, buf),
    }
}

fn bars_for<'a>(spec: &ChartSpec, index: usize) -> Vec<Bar<'a>> {
    spec.datasets
        .iter()
        .enumerate()
        .map(|(series, dataset)| {
            let value = dataset.values.get(index).copied().unwrap_or(0.0);
            Bar::default()
                .value(bar_value(value, spec.format))
                .text_value(format_value(value, spec.format))
                .style(Style::default().fg(SERIES_COLORS[series % SERIES_COLORS.len()]))
        })
        .collect()
}

/// One group per label, one bar per dataset.
fn grouped_bars(spec: &ChartSpec) -> BarChart<'_> {
    let series = spec.datasets.len().max(1);
    let bar_width = if series > 1 { 4 } else { 8 };

    spec.labels.iter().enumerate().fold(
        BarChart::default()
            .bar_width(bar_width)
            .bar_gap(1)
            .group_gap(2),
        |chart, (i, label)| {
            chart.data(
                BarGroup::default()
                    .label(Line::from(label.as_str()))
                    .bars(&bars_for(spec, i)),
            )
        },
    )
}

/// Horizontal bars labelled on the left; first dataset only.
fn labelled_bars(spec: &ChartSpec) -> BarChart<'_> {
    let bars: Vec<Bar> = spec
        .labels
        .iter()
        .enumerate()
        .filter_map(|(i, label)| {
            bars_for(spec, i)
                .into_iter()
                .next()
                .map(|bar| bar.label(Line::from(label.as_str())))
        })
        .collect();

    BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars))
}

fn render_line(spec: &ChartSpec, block: Block<'_>, area: Rect, buf: &mut Buffer) {
    let points: Vec<Vec<(f64, f64)>> = spec
        .datasets
        .iter()
        .map(|d| d.values.iter().enumerate().map(|(x, y)| (x as f64, *y)).collect())
        .collect();
    let series = spec
        .datasets
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (dataset, data))| {
            Series::default()
                .name(dataset.label.clone().unwrap_or_default())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let y_max = match spec.format {
        ValueFormat::Percent => 1.0,
        ValueFormat::Count => max_value(spec).max(1.0),
    };
    let x_max = spec.labels.len().saturating_sub(1).max(1) as f64;
    let x_labels: Vec<&str> = match (spec.labels.first(), spec.labels.last()) {
        (Some(first), Some(last)) if spec.labels.len() > 1 => vec![first.as_str(), last.as_str()],
        (Some(only), _) => vec![only.as_str()],
        _ => Vec::new(),
    };

    Chart::new(series)
        .block(block)
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(Axis::default().bounds([0.0, y_max]).labels([
            format_value(0.0, spec.format),
            format_value(y_max / 2.0, spec.format),
            format_value(y_max, spec.format),
        ]))
        .render(area, buf);
}

/// Doughnut and pie charts as a table of segments with their share.
fn share_table(spec: &ChartSpec) -> Table<'static> {
    let values = spec.datasets.first().map(|d| d.values.as_slice()).unwrap_or(&[]);
    let total: f64 = values.iter().sum();
    let colors = spec.segment_colors();

    let rows: Vec<Row> = spec
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let value = values.get(i).copied().unwrap_or(0.0);
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            let color = colors
                .get(i)
                .and_then(|hex| hex.parse::<Color>().ok())
                .unwrap_or(Color::Reset);
            Row::new(vec![
                Cell::from("■").style(Style::default().fg(color)),
                Cell::from(label.clone()),
                Cell::from(format_value(value, spec.format)),
                Cell::from(format!("{share:.1}%")),
            ])
        })
        .collect();

    let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(4);
    Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(u16::try_from(label_width).unwrap_or(u16::MAX)),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(Row::new(vec!["", "Name", "Value", "Share"]).style(Style::default().add_modifier(Modifier::BOLD)))
}

fn max_value(spec: &ChartSpec) -> f64 {
    spec.datasets
        .iter()
        .flat_map(|d| d.values.iter().copied())
        .fold(0.0, f64::max)
}

fn bar_value(value: f64, format: ValueFormat) -> u64 {
    let scaled = match format {
        ValueFormat::Percent => value * 100.0,
        ValueFormat::Count => value,
    };
    scaled.max(0.0).round() as u64
}

fn format_value(value: f64, format: ValueFormat) -> String {
    match format {
        ValueFormat::Percent => format!("{:.0}%", value * 100.0),
        ValueFormat::Count => group_thousands(value.max(0.0) as u64),
    }
}

/// Buffer rows as text, trailing blanks trimmed.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    buf.content
        .chunks(usize::from(buf.area.width.max(1)))
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}
