//! Formatted movie and trending rows shared between the TUI and CLI output

use crate::catalog::Movie;
use crate::trending::TrendingEntry;
use colored::Colorize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// One movie card: title line, facts line, poster line
pub struct MovieDisplay {
    pub id: u64,
    pub title: String,
    pub year: Option<String>,
    pub rating: Option<f64>,
    pub language: Option<String>,
    pub poster_url: String,
}

impl MovieDisplay {
    pub fn from_movie(movie: &Movie) -> Self {
        let title = if movie.title.is_empty() {
            "(untitled)".to_string()
        } else {
            movie.title.clone()
        };

        Self {
            id: movie.id,
            title,
            year: movie.release_year().map(str::to_string),
            rating: movie.vote_average.filter(|r| *r > 0.0),
            language: movie
                .original_language
                .as_deref()
                .filter(|l| !l.is_empty())
                .map(str::to_uppercase),
            poster_url: movie.poster_url(),
        }
    }

    fn rating_text(&self) -> String {
        self.rating
            .map(|r| format!("★ {:.1}", r))
            .unwrap_or_else(|| "★ N/A".to_string())
    }

    /// Facts joined by " · ": rating, language, id
    fn facts(&self) -> Vec<String> {
        let mut facts = vec![self.rating_text()];
        if let Some(ref lang) = self.language {
            facts.push(lang.clone());
        }
        facts.push(format!("#{}", self.id));
        facts
    }

    fn poster_text(&self) -> &str {
        if self.poster_url.is_empty() {
            "no poster"
        } else {
            &self.poster_url
        }
    }

    /// Render to CLI output using colored crate
    pub fn to_cli_lines(&self) -> Vec<String> {
        let year = self
            .year
            .as_ref()
            .map(|y| format!(" ({})", y).yellow().dimmed().to_string())
            .unwrap_or_default();
        let line1 = format!("{}{}", self.title.green().bold(), year);

        let sep = " · ".dimmed().to_string();
        let line2 = format!("  {}", self.facts().join(&sep));
        let line3 = format!("  {}", self.poster_text().dimmed());

        vec![line1, line2, line3]
    }

    /// Render to ratatui Lines for TUI
    pub fn to_tui_lines(
        &self,
        is_selected: bool,
        base_style: Style,
        prefix_style: Style,
    ) -> Vec<Line<'static>> {
        let prefix = if is_selected { "▌" } else { " " };

        let title_style = if is_selected {
            base_style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            base_style.fg(Color::White)
        };
        let year_text = self
            .year
            .as_ref()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();

        let line1 = Line::from(vec![
            Span::styled(prefix.to_string(), prefix_style),
            Span::styled(" ".to_string(), base_style),
            Span::styled(self.title.clone(), title_style),
            Span::styled(
                year_text,
                base_style.fg(Color::Yellow).add_modifier(Modifier::DIM),
            ),
        ]);

        let mut line2_spans = vec![
            Span::styled(prefix.to_string(), prefix_style),
            Span::styled("   ".to_string(), base_style),
        ];
        for (i, fact) in self.facts().into_iter().enumerate() {
            if i > 0 {
                line2_spans.push(Span::styled(
                    " · ".to_string(),
                    base_style.fg(Color::DarkGray),
                ));
            }
            let style = if i == 0 {
                base_style.fg(Color::Yellow)
            } else {
                base_style.fg(Color::Gray)
            };
            line2_spans.push(Span::styled(fact, style));
        }
        let line2 = Line::from(line2_spans);

        let line3 = Line::from(vec![
            Span::styled(prefix.to_string(), prefix_style),
            Span::styled("   ".to_string(), base_style),
            Span::styled(
                self.poster_text().to_string(),
                base_style.fg(Color::DarkGray),
            ),
        ]);

        vec![line1, line2, line3]
    }
}

/// One row of the trending panel
pub struct TrendingDisplay {
    pub rank: usize,
    pub search_term: String,
    pub count: i64,
    pub poster_url: String,
}

impl TrendingDisplay {
    pub fn from_entry(rank: usize, entry: &TrendingEntry) -> Self {
        Self {
            rank,
            search_term: entry.search_term.clone(),
            count: entry.count,
            poster_url: entry.poster_url.clone(),
        }
    }

    fn count_text(&self) -> String {
        if self.count == 1 {
            "1 search".to_string()
        } else {
            format!("{} searches", self.count)
        }
    }

    pub fn to_cli_lines(&self) -> Vec<String> {
        let line1 = format!(
            "{} {} {}",
            format!("{:>2}.", self.rank).magenta().bold(),
            self.search_term.green(),
            format!("({})", self.count_text()).dimmed()
        );
        let mut lines = vec![line1];
        if !self.poster_url.is_empty() {
            lines.push(format!("    {}", self.poster_url.dimmed()));
        }
        lines
    }

    pub fn to_tui_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!(" {:>2} ", self.rank),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.search_term.clone(), Style::default().fg(Color::White)),
            Span::styled(
                format!(" ({})", self.count_text()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  {}", self.poster_url),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
        ])
    }
}
