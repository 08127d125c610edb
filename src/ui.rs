use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventKind, EventOutcome, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::artwork;
use crate::filter::{GRID_COLS, GRID_ROWS};
use crate::state::{AppState, Pokemon};

const BG_BASE: Color = Color::Rgb(26, 22, 30);
const BG_PANEL: Color = Color::Rgb(38, 32, 44);
const BG_CARD: Color = Color::Rgb(32, 28, 38);
const TEXT_MAIN: Color = Color::Rgb(236, 230, 220);
const TEXT_DIM: Color = Color::Rgb(168, 158, 150);
const ACCENT_RED: Color = Color::Rgb(226, 106, 96);
const ACCENT_CREAM: Color = Color::Rgb(226, 198, 132);
const BORDER_DIM: Color = Color::Rgb(88, 78, 92);

pub struct GridUi {
    status_bar: StatusBar,
}

impl GridUi {
    pub fn new() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(layout[1]);
        render_grid(frame, body[0], state);
        render_detail(frame, body[1], state);
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }
}

impl Default for GridUi {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    match event {
        EventKind::Resize(width, height) => {
            EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) => handle_key(*key, state),
        _ => EventOutcome::ignored(),
    }
}

fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    if state.search.active {
        return match key.code {
            KeyCode::Esc => EventOutcome::action(Action::SearchCancel),
            KeyCode::Enter => EventOutcome::action(Action::SearchSubmit),
            KeyCode::Backspace => EventOutcome::action(Action::SearchBackspace),
            KeyCode::Char(ch) => EventOutcome::action(Action::SearchInput(ch)),
            _ => EventOutcome::ignored(),
        };
    }
    match key.code {
        KeyCode::Char('q') => EventOutcome::action(Action::Quit),
        KeyCode::Char('/') => EventOutcome::action(Action::SearchStart),
        KeyCode::Char('[') => EventOutcome::action(Action::TypeFilterPrev),
        KeyCode::Char(']') => EventOutcome::action(Action::TypeFilterNext),
        KeyCode::Char('c') => EventOutcome::action(Action::TypeFilterClear),
        KeyCode::Left | KeyCode::Char('h') => EventOutcome::action(Action::CursorMove(-1)),
        KeyCode::Right | KeyCode::Char('l') => EventOutcome::action(Action::CursorMove(1)),
        KeyCode::Up | KeyCode::Char('k') => {
            EventOutcome::action(Action::CursorMove(-(GRID_COLS as i16)))
        }
        KeyCode::Down | KeyCode::Char('j') => {
            EventOutcome::action(Action::CursorMove(GRID_COLS as i16))
        }
        KeyCode::Char('n') | KeyCode::PageDown => EventOutcome::action(Action::PageNext),
        KeyCode::Char('p') | KeyCode::PageUp => EventOutcome::action(Action::PagePrev),
        _ => EventOutcome::ignored(),
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD);
    let search = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.search.query)
    };
    let type_label = state
        .type_filter
        .as_deref()
        .map(|name| name.to_ascii_uppercase())
        .unwrap_or_else(|| "ALL".to_string());
    let match_count = state.matches().len();

    let header = Line::from(vec![
        Span::styled("POKEDEX", title_style),
        Span::raw("  |  Search: "),
        Span::styled(search, Style::default().fg(ACCENT_CREAM)),
        Span::raw("  |  Type: "),
        Span::styled(type_label, Style::default().fg(ACCENT_CREAM)),
        Span::raw("  |  "),
        Span::styled(
            format!("{match_count} matches"),
            Style::default().fg(TEXT_DIM),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(BORDER_DIM));
    frame.render_widget(Paragraph::new(header).block(block), area);
}

pub fn render_grid(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.grid_loading() {
        let dots = ".".repeat((state.tick % 3 + 1) as usize);
        let paragraph = Paragraph::new(format!("Loading pokemon{dots}"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, centered_line(inner));
        return;
    }

    let cards = state.visible_cards();
    if cards.is_empty() {
        let paragraph = Paragraph::new("[no matches]")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, centered_line(inner));
        return;
    }

    let zones = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, GRID_ROWS as u32); GRID_ROWS])
        .split(zones[0]);
    for (idx, card) in cards.iter().enumerate() {
        let row = idx / GRID_COLS;
        let col = idx % GRID_COLS;
        if row >= GRID_ROWS {
            break;
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLS as u32); GRID_COLS])
            .split(rows[row]);
        render_card(frame, cols[col], state, card, idx == state.cursor);
    }

    render_page_line(frame, zones[1], state);
}

fn render_card(frame: &mut Frame, area: Rect, state: &AppState, card: &Pokemon, selected: bool) {
    let border_style = if selected {
        Style::default().fg(ACCENT_RED)
    } else {
        Style::default().fg(BORDER_DIM)
    };
    let title_style = if selected {
        Style::default().fg(ACCENT_CREAM).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(BG_CARD))
        .title(Span::styled(capitalize(&card.name), title_style));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let lines = if let Some(art) = state.artwork.get(&card.name) {
        artwork::artwork_lines(art, inner.width, inner.height)
    } else if state.artwork_failed.contains(&card.name) {
        artwork::artwork_lines(artwork::fallback_artwork(), inner.width, inner.height)
    } else {
        vec![Line::from(Span::styled(
            "[art]",
            Style::default().fg(TEXT_DIM),
        ))]
    };
    let paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Pagination controls; hidden entirely when everything fits one page.
fn render_page_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let total = state.total_pages();
    if total <= 1 {
        return;
    }
    let line = Line::from(vec![
        Span::styled("◀ p", Style::default().fg(ACCENT_CREAM)),
        Span::styled(
            format!("  Page {}/{}  ", state.page, total),
            Style::default().fg(TEXT_MAIN),
        ),
        Span::styled("n ▶", Style::default().fg(ACCENT_CREAM)),
    ]);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

pub fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DETAIL")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(name) = state.detail_name.as_ref() else {
        render_placeholder(frame, inner, "[select a pokemon]");
        return;
    };
    let Some(detail) = state.details.get(name) else {
        if state.detail_loading {
            render_placeholder(frame, inner, "[loading pokemon]");
        } else {
            // The fetch failed; the footer carries the message.
            render_placeholder(frame, inner, "[no data]");
        }
        return;
    };

    let zones = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(6)])
        .split(inner);

    let art_lines = if let Some(art) = state.artwork.get(name) {
        artwork::artwork_lines(art, zones[0].width, zones[0].height)
    } else if state.artwork_failed.contains(name) {
        artwork::artwork_lines(artwork::fallback_artwork(), zones[0].width, zones[0].height)
    } else {
        vec![Line::from(Span::styled(
            "[art]",
            Style::default().fg(TEXT_DIM),
        ))]
    };
    frame.render_widget(
        Paragraph::new(Text::from(art_lines)).alignment(Alignment::Center),
        zones[0],
    );

    let value_style = Style::default().fg(TEXT_MAIN);
    let label_style = Style::default().fg(TEXT_DIM);
    let text = Text::from(vec![
        Line::from(Span::styled(
            format!("#{:03} {}", detail.id, capitalize(&detail.name)),
            Style::default().fg(ACCENT_CREAM).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Type: ", label_style),
            Span::styled(detail.types.join(", "), value_style),
        ]),
        Line::from(vec![
            Span::styled("Height: ", label_style),
            Span::styled(detail.height.to_string(), value_style),
            Span::styled("  Weight: ", label_style),
            Span::styled(detail.weight.to_string(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Abilities: ", label_style),
            Span::styled(detail.abilities.join(", "), value_style),
        ]),
    ]);
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), zones[1]);
}

fn render_placeholder(frame: &mut Frame, area: Rect, content: &str) {
    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(TEXT_DIM));
    frame.render_widget(paragraph, centered_line(area));
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.roster.is_loading() {
            "Loading pokemon...".to_string()
        } else if state.type_members_loading {
            "Loading type members...".to_string()
        } else if state.detail_loading {
            "Loading detail...".to_string()
        } else if !state.artwork_pending.is_empty() {
            "Loading artwork...".to_string()
        } else {
            "".to_string()
        }
    });
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status, Style::default().fg(ACCENT_CREAM));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(BORDER_DIM),
                focused_style: Some(Style::default().fg(ACCENT_RED)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, vec![StatusBarHint::new("q", "Quit")]);
    }
    let mut left = vec![
        StatusBarHint::new("arrows", "Move"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("[/]", "Type"),
        StatusBarHint::new("c", "Clear"),
    ];
    if state.total_pages() > 1 {
        left.push(StatusBarHint::new("n/p", "Page"));
    }
    (left, vec![StatusBarHint::new("q", "Quit")])
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn centered_line(area: Rect) -> Rect {
    let y = area.y + area.height / 2;
    Rect {
        x: area.x,
        y,
        width: area.width,
        height: 1.min(area.height),
    }
}
