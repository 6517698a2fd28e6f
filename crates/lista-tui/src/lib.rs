// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use lista_app::{BrowserCommand, BrowserEvent, CatalogBrowser, FetchPhase, Item, ListId, Row};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use time::OffsetDateTime;

const HALF_PAGE_ROWS: isize = 10;
const FULL_PAGE_ROWS: isize = 20;
const EXPANDED_MARK: &str = "▾";
const COLLAPSED_MARK: &str = "▸";

#[derive(Debug)]
pub enum InternalEvent {
    FetchCompleted {
        request_id: u64,
        outcome: Result<Vec<Item>, String>,
    },
}

/// Where the catalog comes from. Injected by the caller; the loop never
/// constructs one itself. `spawn_fetch` may run in the background and report
/// through the channel -- the default runs inline and reports immediately.
pub trait CatalogSource {
    fn fetch_items(&mut self) -> Result<Vec<Item>>;

    fn spawn_fetch(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let outcome = self.fetch_items().map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::FetchCompleted {
            request_id,
            outcome,
        })
        .map_err(|_| anyhow::anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ViewData {
    cursor: usize,
    in_flight: Option<u64>,
    next_request_id: u64,
    help_visible: bool,
}

pub fn run_app<S: CatalogSource>(browser: &mut CatalogBrowser, source: &mut S) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    start_fetch(browser, source, &mut view, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(browser, &mut view, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, browser, &view)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(browser, source, &mut view, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    browser: &mut CatalogBrowser,
    view: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::FetchCompleted {
                request_id,
                outcome,
            } => {
                if view.in_flight != Some(request_id) {
                    continue;
                }
                view.in_flight = None;

                let command = match outcome {
                    Ok(items) => BrowserCommand::FetchSucceeded {
                        items,
                        received_at: OffsetDateTime::now_utc(),
                    },
                    Err(description) => BrowserCommand::FetchFailed(description),
                };
                browser.dispatch(command);
                view.cursor = clamp_cursor(view.cursor, browser.rows().len());
            }
        }
    }
}

fn start_fetch<S: CatalogSource>(
    browser: &mut CatalogBrowser,
    source: &mut S,
    view: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = browser.dispatch(BrowserCommand::RequestFetch);
    if !events.contains(&BrowserEvent::FetchStarted) {
        return;
    }

    view.next_request_id += 1;
    let request_id = view.next_request_id;
    view.in_flight = Some(request_id);

    if let Err(error) = source.spawn_fetch(request_id, internal_tx.clone()) {
        view.in_flight = None;
        browser.dispatch(BrowserCommand::FetchFailed(format!("{error:#}")));
    }
}

fn handle_key_event<S: CatalogSource>(
    browser: &mut CatalogBrowser,
    source: &mut S,
    view: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            view.help_visible = false;
        }
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('?'), _) => {
            view.help_visible = true;
        }
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            view.cursor = move_cursor(view.cursor, browser.rows().len(), 1);
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            view.cursor = move_cursor(view.cursor, browser.rows().len(), -1);
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            view.cursor = 0;
        }
        (KeyCode::Char('G'), _) => {
            view.cursor = browser.rows().len().saturating_sub(1);
        }
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            view.cursor = move_cursor(view.cursor, browser.rows().len(), HALF_PAGE_ROWS);
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            view.cursor = move_cursor(view.cursor, browser.rows().len(), -HALF_PAGE_ROWS);
        }
        (KeyCode::PageDown, _) => {
            view.cursor = move_cursor(view.cursor, browser.rows().len(), FULL_PAGE_ROWS);
        }
        (KeyCode::PageUp, _) => {
            view.cursor = move_cursor(view.cursor, browser.rows().len(), -FULL_PAGE_ROWS);
        }
        (KeyCode::Enter, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => {
            if let Some(list_id) = toggle_target(browser.rows(), view.cursor) {
                browser.dispatch(BrowserCommand::ToggleList(list_id));
                view.cursor = header_position(browser.rows(), list_id)
                    .unwrap_or_else(|| clamp_cursor(view.cursor, browser.rows().len()));
            }
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            start_fetch(browser, source, view, internal_tx);
        }
        (KeyCode::Char('R'), _) => {
            browser.dispatch(BrowserCommand::CollapseAll);
            view.cursor = clamp_cursor(view.cursor, browser.rows().len());
            start_fetch(browser, source, view, internal_tx);
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            browser.dispatch(BrowserCommand::CollapseAll);
            view.cursor = clamp_cursor(view.cursor, browser.rows().len());
        }
        _ => {}
    }

    false
}

/// The list a toggle at `cursor` applies to: the header itself, or the list
/// an entry row belongs to.
fn toggle_target(rows: &[Row], cursor: usize) -> Option<ListId> {
    rows.get(cursor).map(Row::list_id)
}

fn header_position(rows: &[Row], list_id: ListId) -> Option<usize> {
    rows.iter()
        .position(|row| row.is_header() && row.list_id() == list_id)
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

fn move_cursor(cursor: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = (len - 1) as isize;
    (cursor as isize + delta).clamp(0, last) as usize
}

fn render(frame: &mut Frame, browser: &CatalogBrowser, view: &ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_rows(frame, chunks[1], browser, view);
    render_footer(frame, chunks[2], browser);

    if view.help_visible {
        render_help(frame, frame.area());
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(30)])
        .split(area);

    let title = Line::from(vec![
        Span::styled("lista", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" · catalog browser", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let hints = Line::from(Span::styled(
        "? help  r refresh  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(hints).alignment(ratatui::layout::Alignment::Right),
        chunks[1],
    );
}

fn render_rows(frame: &mut Frame, area: Rect, browser: &CatalogBrowser, view: &ViewData) {
    if browser.rows().is_empty() {
        let placeholder = match browser.phase() {
            FetchPhase::Loading => "fetching catalog…",
            FetchPhase::Idle => "press r to fetch the catalog",
            FetchPhase::Loaded => "catalog has no displayable items",
            FetchPhase::Failed(_) => "no catalog to show",
        };
        frame.render_widget(
            Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = browser
        .rows()
        .iter()
        .map(|row| match row {
            Row::ListHeader {
                list_id,
                member_count,
            } => ListItem::new(Line::from(Span::styled(
                header_label(
                    *list_id,
                    *member_count,
                    browser.expanded().contains(list_id),
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ))),
            Row::Entry(item) => ListItem::new(Line::from(vec![
                Span::raw(format!("    {}", item.display_name())),
                Span::styled(
                    format!("  #{}", item.id.get()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])),
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(clamp_cursor(view.cursor, browser.rows().len())));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, browser: &CatalogBrowser) {
    let style = match browser.phase() {
        FetchPhase::Failed(_) => Style::default().fg(Color::Red),
        FetchPhase::Loading => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::DarkGray),
    };
    frame.render_widget(
        Paragraph::new(status_line(browser)).style(style),
        area,
    );
}

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(44, 13, area);
    let lines = vec![
        Line::from("j/k, arrows   move"),
        Line::from("g/G           first/last row"),
        Line::from("ctrl-d/u      half page"),
        Line::from("enter, space  expand/collapse list"),
        Line::from("r             refresh"),
        Line::from("R             collapse all + refresh"),
        Line::from("c             collapse all"),
        Line::from("q, ctrl-q     quit"),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("keys")),
        popup,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn header_label(list_id: ListId, member_count: usize, expanded: bool) -> String {
    let mark = if expanded {
        EXPANDED_MARK
    } else {
        COLLAPSED_MARK
    };
    let noun = if member_count == 1 { "item" } else { "items" };
    format!("{mark} list {} · {member_count} {noun}", list_id.get())
}

fn status_line(browser: &CatalogBrowser) -> String {
    match browser.phase() {
        FetchPhase::Idle => "press r to fetch the catalog".to_owned(),
        FetchPhase::Loading => "fetching catalog…".to_owned(),
        FetchPhase::Failed(description) => {
            format!("fetch failed: {description} -- press r to retry")
        }
        FetchPhase::Loaded => {
            let updated = browser
                .fetched_at()
                .map(format_clock)
                .unwrap_or_else(|| "-".to_owned());
            format!(
                "{} of {} items · updated {updated}",
                browser.shown_total(),
                browser.fetched_total(),
            )
        }
    }
}

fn format_clock(at: OffsetDateTime) -> String {
    at.format(&time::macros::format_description!(
        "[hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| at.to_string())
}
