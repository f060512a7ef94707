//! Ratatui dashboard: temperature line chart above a tourists-per-month bar chart.
//!
//! Keys: `t` switches between max and min temperature, `←`/`→` move the first month,
//! `[`/`]` move the last month, `r` re-reads the snapshot, `q` quits.

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::watch;
use weather_tourism::{LatLon, SessionState, ViewOutcome, ViewSession, ViewUpdate, Views};

/// Runs the dashboard until the user quits. Blocks the calling thread.
pub fn run(
    session: ViewSession,
    status: watch::Receiver<String>,
    location: LatLon,
) -> io::Result<()> {
    let _guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut app = Dashboard {
        session,
        status,
        location,
    };
    app.event_loop(&mut terminal)
}

/// Restores the terminal on exit and keeps log output off the alternate screen.
struct TerminalGuard {
    log_level: LevelFilter,
}

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        let log_level = log::max_level();
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        log::set_max_level(LevelFilter::Off);
        Ok(Self { log_level })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        log::set_max_level(self.log_level);
    }
}

struct Dashboard {
    session: ViewSession,
    status: watch::Receiver<String>,
    location: LatLon,
}

impl Dashboard {
    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> io::Result<()> {
        let mut needs_redraw = true;
        let mut drawn: Option<(Option<u64>, SessionState)> = None;
        loop {
            let current = (
                self.session.latest().map(|u| u.seq),
                self.session.state(),
            );
            if self.status.has_changed().unwrap_or(false) {
                self.status.mark_unchanged();
                needs_redraw = true;
            }
            if needs_redraw || drawn != Some(current) {
                terminal.draw(|f| self.draw(f))?;
                drawn = Some(current);
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let params = self.session.params();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('t') => {
                self.session.set_params(params.with_field(params.field.toggle()));
            }
            KeyCode::Left => {
                self.session.set_params(params.with_months(params.months.shift_start(-1)));
            }
            KeyCode::Right => {
                self.session.set_params(params.with_months(params.months.shift_start(1)));
            }
            KeyCode::Char('[') => {
                self.session.set_params(params.with_months(params.months.shift_end(-1)));
            }
            KeyCode::Char(']') => {
                self.session.set_params(params.with_months(params.months.shift_end(1)));
            }
            KeyCode::Char('r') => {
                self.session.refresh();
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        let update = self.session.latest();
        self.draw_header(frame, chunks[0], update.as_ref());
        match update.map(|u| u.outcome) {
            Some(ViewOutcome::Ready(views)) => draw_views(frame, chunks[1], &views),
            Some(ViewOutcome::NoData) => draw_message(
                frame,
                chunks[1],
                "No data yet. Run `weather-tourism refresh` or start with --fetch.",
                Color::Yellow,
            ),
            Some(ViewOutcome::Failed(e)) => {
                draw_message(frame, chunks[1], &format!("Could not build views: {e}"), Color::Red)
            }
            None => draw_message(frame, chunks[1], "Loading snapshot...", Color::Yellow),
        }
        draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect, update: Option<&ViewUpdate>) {
        let params = self.session.params();
        let state = match self.session.state() {
            SessionState::Idle => Span::styled("idle", Style::default().fg(Color::Green)),
            SessionState::Recomputing => {
                Span::styled("recomputing", Style::default().fg(Color::Yellow))
            }
        };
        let shown = update
            .map(|u| format!("showing {}", u.params))
            .unwrap_or_default();
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    "weather-tourism",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "  {} | field: {} | months: {}-{} | ",
                    self.location,
                    params.field,
                    month_name(params.months.start()),
                    month_name(params.months.end()),
                )),
                state,
            ]),
            Line::from(Span::styled(
                format!("{}  {}", self.status.borrow().as_str(), shown),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_views(frame: &mut Frame<'_>, area: Rect, views: &Views) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    draw_temperature(frame, chunks[0], views);
    draw_tourism(frame, chunks[1], views);
}

fn draw_temperature(frame: &mut Frame<'_>, area: Rect, views: &Views) {
    let title = views.temperature.field.label();
    let (Some((first, _)), Some((last, _)), Some((lo, hi))) = (
        views.temperature.points.first(),
        views.temperature.points.last(),
        views.temperature.value_bounds(),
    ) else {
        draw_message(frame, area, "No days in the selected months.", Color::Yellow);
        return;
    };

    let points: Vec<(f64, f64)> = views
        .temperature
        .points
        .iter()
        .map(|(date, value)| (day_number(*date), *value))
        .collect();
    let (x0, x1) = (day_number(*first), day_number(*last).max(day_number(*first) + 1.0));
    let (y0, y1) = ((lo - 1.0).floor(), (hi + 1.0).ceil());

    let dataset = Dataset::default()
        .name(views.temperature.field.to_string())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::LightRed))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([x0, x1])
                .labels(vec![first.to_string(), last.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y0, y1])
                .labels(vec![
                    format!("{y0:.0}"),
                    format!("{:.0}", (y0 + y1) / 2.0),
                    format!("{y1:.0}"),
                ]),
        );
    frame.render_widget(chart, area);
}

fn draw_tourism(frame: &mut Frame<'_>, area: Rect, views: &Views) {
    if views.tourism.is_empty() {
        draw_message(frame, area, "No months in the selected range.", Color::Yellow);
        return;
    }
    let bars: Vec<Bar> = views
        .tourism
        .points
        .iter()
        .map(|(month, tourists)| {
            let label = month_name(month.month());
            match tourists {
                Some(count) => Bar::default()
                    .value(*count)
                    .label(Line::from(label))
                    .text_value(format!("{:.2}M", *count as f64 / 1_000_000.0)),
                None => Bar::default()
                    .value(0)
                    .label(Line::from(label))
                    .text_value("n/a".to_string()),
            }
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title("Tourists per month").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::LightBlue))
        .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue));
    frame.render_widget(chart, area);
}

fn draw_message(frame: &mut Frame<'_>, area: Rect, message: &str, color: Color) {
    let p = Paragraph::new(message)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect) {
    let help = "t: max/min  ←/→: first month  [/]: last month  r: reload  q: quit";
    let p = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES.get(month.wrapping_sub(1) as usize).copied().unwrap_or("?")
}
