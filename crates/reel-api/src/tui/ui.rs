//! UI rendering

use super::app::App;
use super::display::{MovieDisplay, TrendingDisplay};
use crate::catalog::Movie;
use crate::state::MainPanel;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Wrap},
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const TAGLINE: &str = "Find Movies You'll Love Without the Hassle";

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let trending_height = if app.state.show_trending() {
        app.state.trending_movies.len() as u16 + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Header
            Constraint::Length(trending_height), // Trending panel (hidden when empty)
            Constraint::Min(5),                  // Main panel
            Constraint::Length(1),               // Results count + fetch time
            Constraint::Length(1),               // Status bar
            Constraint::Length(1),               // Toast line
            Constraint::Length(1),               // Search input
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    if trending_height > 0 {
        render_trending_panel(frame, app, chunks[1]);
    }
    render_main_panel(frame, app, chunks[2]);
    render_results_count(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
    render_toast_line(frame, app, chunks[5]);
    render_search_input(frame, app, chunks[6]);

    if app.show_command_palette {
        render_command_palette(frame, app);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "  reel ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(TAGLINE, Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_trending_panel(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .state
        .trending_movies
        .iter()
        .enumerate()
        .map(|(i, entry)| TrendingDisplay::from_entry(i + 1, entry).to_tui_line())
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Trending Movies ",
            Style::default().fg(Color::Magenta),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Exactly one of: spinner, error message, movie list
fn render_main_panel(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " All Movies ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.state.main_panel() {
        MainPanel::Loading => {
            let line = Line::from(Span::styled(
                format!("  {} Loading movies...", spinner_frame(app.search_started)),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::DIM),
            ));
            frame.render_widget(Paragraph::new(line), inner);
        }
        MainPanel::Error(message) => {
            let line = Line::from(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::Red),
            ));
            frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), inner);
        }
        MainPanel::Movies(movies) => {
            render_movie_list(frame, movies, &mut app.list_state, inner);
        }
    }
}

fn render_movie_list(frame: &mut Frame, movies: &[Movie], list_state: &mut ListState, area: Rect) {
    let selection_bg = Color::Rgb(38, 38, 38);
    let selected_index = list_state.selected();

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let is_selected = selected_index == Some(i);
            let base_style = if is_selected {
                Style::default().bg(selection_bg)
            } else {
                Style::default()
            };
            let prefix_style = if is_selected {
                Style::default().fg(Color::LightRed).bg(selection_bg)
            } else {
                Style::default()
            };

            let lines = MovieDisplay::from_movie(movie).to_tui_lines(
                is_selected,
                base_style,
                prefix_style,
            );
            let item = ListItem::new(lines);
            if is_selected {
                item.style(Style::default().bg(selection_bg))
            } else {
                item
            }
        })
        .collect();

    // Reserve 1 column on the right for the scrollbar
    let list_area = Rect {
        width: area.width.saturating_sub(1),
        ..area
    };
    let scrollbar_area = Rect {
        x: area.x + area.width.saturating_sub(1),
        width: 1,
        ..area
    };

    StatefulWidget::render(List::new(items), list_area, frame.buffer_mut(), list_state);

    // Custom scrollbar keeps a stable thumb size; nothing to draw without rows
    let track = scrollbar_area.height as usize;
    if track == 0 || scrollbar_area.width == 0 {
        return;
    }
    let total = movies.len();
    let visible = track / 3;
    let max_offset = total.saturating_sub(visible);
    if max_offset > 0 {
        let offset = list_state.offset().min(max_offset);
        let thumb_len = (visible * track / total).clamp(1, track);
        let max_start = track - thumb_len;
        let start = (offset * max_start + max_offset / 2) / max_offset;

        let buf = frame.buffer_mut();
        for i in 0..track {
            let in_thumb = i >= start && i < start + thumb_len;
            buf[(scrollbar_area.x, scrollbar_area.y + i as u16)]
                .set_symbol(if in_thumb { "┃" } else { "│" })
                .set_style(Style::default().fg(if in_thumb {
                    Color::Magenta
                } else {
                    Color::DarkGray
                }));
        }
    }
}

fn render_results_count(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let query = &app.state.debounced_query;
    let label = if query.is_empty() {
        "popular".to_string()
    } else {
        format!("\"{}\"", query)
    };

    let line = match app.state.main_panel() {
        MainPanel::Movies(movies) => {
            let mut spans = vec![Span::styled(
                format!("  {} movies · {} ", movies.len(), label),
                dim,
            )];
            if let Some(d) = app.last_duration {
                spans.push(Span::styled(
                    format!("({})", format_duration(d)),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::DIM),
                ));
            }
            Line::from(spans)
        }
        MainPanel::Loading => Line::from(Span::styled(format!("  searching {}", label), dim)),
        MainPanel::Error(_) => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let bracket = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("  [", bracket),
        Span::styled("↑↓ select", dim),
        Span::styled("] [", bracket),
        Span::styled("Enter open", dim),
        Span::styled("] [", bracket),
        Span::styled("^y copy", dim),
        Span::styled("] [", bracket),
        Span::styled("^o cmds", dim),
        Span::styled("] [", bracket),
        Span::styled("Esc quit", dim),
        Span::styled("]", bracket),
    ];

    if app.is_query_pending() {
        spans.push(Span::styled(" [", bracket));
        spans.push(Span::styled(
            "typing…",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
        ));
        spans.push(Span::styled("]", bracket));
    }

    if let Some(ref store) = app.store_description {
        spans.push(Span::styled(" [", bracket));
        spans.push(Span::styled(
            store.clone(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::DIM),
        ));
        spans.push(Span::styled("]", bracket));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast_line(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref toast) = app.toast {
        let bracket = Style::default().fg(Color::DarkGray);
        let toast_style = if toast.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
        };

        let spans = vec![
            Span::styled("  [", bracket),
            Span::styled(&toast.message, toast_style),
            Span::styled("]", bracket),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Input line with a block cursor; shared by the search box and the palette
fn input_line(text: &str, cursor: usize) -> Line<'_> {
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    let (before, after) = text.split_at(cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map(|c| &after[c.len_utf8()..]).unwrap_or("");

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::Yellow))];
    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }
    match cursor_char {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", Style::default().fg(Color::White))),
    }
    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }
    Line::from(spans)
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.search_input.text.is_empty() && !app.show_command_palette {
        Line::from(vec![
            Span::styled("▌ ", Style::default().fg(Color::Yellow)),
            Span::styled("█", Style::default().fg(Color::White)),
            Span::styled(
                "Search through thousands of movies",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        input_line(&app.search_input.text, app.search_input.cursor)
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    FRAMES[(elapsed as usize) % FRAMES.len()]
}

fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

fn render_command_palette(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let width = (area.width * 40 / 100)
        .max(40)
        .min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height / 5;
    let palette_area = Rect::new(x, y, width, height);

    frame.render_widget(ratatui::widgets::Clear, palette_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Green))
        .title(" Commands ");
    let inner = block.inner(palette_area);
    frame.render_widget(block, palette_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Commands
        ])
        .split(inner);

    let input = &app.command_palette_input;
    frame.render_widget(
        Paragraph::new(input_line(&input.text, input.cursor)),
        chunks[0],
    );

    let selection_bg = Color::Rgb(38, 38, 38);
    let inner_width = chunks[2].width as usize;
    let has_selection = app.selected_movie().is_some();
    let has_store = app.has_trending_store();

    let items: Vec<ListItem> = app
        .command_palette_filtered
        .iter()
        .enumerate()
        .map(|(i, cmd)| {
            let is_selected = i == app.command_palette_index;
            let is_enabled = cmd.is_enabled(has_selection, has_store);
            let name_color = if is_enabled { Color::White } else { Color::Gray };

            if is_selected {
                let base_bg = Style::default().bg(selection_bg);
                let prefix_color = if is_enabled {
                    Color::LightRed
                } else {
                    Color::DarkGray
                };
                let prefix_style = Style::default().fg(prefix_color).bg(selection_bg);
                let name_style = if is_enabled {
                    base_bg.fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    base_bg.fg(Color::Gray).add_modifier(Modifier::BOLD)
                };

                let name_pad = inner_width.saturating_sub(2 + cmd.name().width());
                let desc_pad = inner_width.saturating_sub(2 + cmd.description().width());

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled("▌ ", prefix_style),
                        Span::styled(cmd.name(), name_style),
                        Span::styled(" ".repeat(name_pad), base_bg),
                    ]),
                    Line::from(vec![
                        Span::styled("▌ ", prefix_style),
                        Span::styled(cmd.description(), base_bg.fg(Color::DarkGray)),
                        Span::styled(" ".repeat(desc_pad), base_bg),
                    ]),
                ])
            } else {
                let mut name_style = Style::default().fg(name_color);
                let mut desc_style = Style::default().fg(Color::DarkGray);
                if !is_enabled {
                    name_style = name_style.add_modifier(Modifier::DIM);
                    desc_style = desc_style.add_modifier(Modifier::DIM);
                }

                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(cmd.name(), name_style),
                    ]),
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(cmd.description(), desc_style),
                    ]),
                ])
            }
        })
        .collect();

    frame.render_widget(List::new(items), chunks[2]);
}
