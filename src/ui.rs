pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use kwiz::score::{percentage, Tier};
use kwiz::session::Session;

use crate::{App, View};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn ui(app: &mut App, f: &mut Frame) {
    let view = app.view();
    screen::current_screen(&view).render(app, f);

    // The info popup overlays whichever screen is underneath
    if app.popup.is_some() {
        render_popup(app, f);
    }
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Excellent => Color::Green,
        Tier::Good => Color::Yellow,
        Tier::NeedsImprovement => Color::Red,
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn legend() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Centered sub-rectangle used for the info popup overlay
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn render_home(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // profile header
            Constraint::Length(2), // hero line
            Constraint::Min(1),    // test list
            Constraint::Length(1), // legend
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(app.profile.name.clone(), bold()),
        Span::styled(format!("  ID: {}", app.profile.id), dim()),
        Span::styled(format!("   {} pts", app.profile.points), bold().fg(Color::Blue)),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let hero = Paragraph::new(Span::styled(
        "Test Your Knowledge with Quizzes",
        bold().fg(Color::Blue),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hero, chunks[1]);

    if app.entries.is_empty() {
        let empty = Paragraph::new("No tests available.")
            .style(dim())
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[2]);
    } else {
        let rows: Vec<Line> = app
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let label = format!(
                    "Test {}  ·  {}  ·  {} Questions",
                    entry.id, entry.category, entry.question_count
                );
                if idx == app.selected {
                    Line::from(vec![
                        Span::styled("> ", bold().fg(Color::Blue)),
                        Span::styled(label, bold()),
                    ])
                } else {
                    Line::from(vec![Span::raw("  "), Span::styled(label, dim())])
                }
            })
            .collect();
        f.render_widget(Paragraph::new(rows), chunks[2]);
    }

    let hints = Paragraph::new(Span::styled(
        "↑/↓ select  (enter) start  (esc)ape",
        legend(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hints, chunks[3]);
}

pub fn render_loading(app: &mut App, f: &mut Frame) {
    let dots = ".".repeat((app.ticks / 3 % 4) as usize);
    let message = Paragraph::new(Span::styled(
        format!("Loading quiz{}", dots),
        bold().fg(Color::Blue),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(f.area());

    f.render_widget(message, chunks[1]);
}

fn answer_line<'a>(session: &Session, idx: usize, answer: &'a str) -> Line<'a> {
    let question = session.current_question();
    let key = format!("{}) ", idx + 1);

    if let Some(record) = session.current_answer() {
        let is_correct_choice = answer.starts_with(&question.correct_answer);
        let is_selected = record.selected_answer == answer;

        let style = if is_correct_choice {
            bold().fg(Color::Green)
        } else if is_selected {
            bold().fg(Color::Red)
        } else {
            dim()
        };
        let marker = if is_selected { "● " } else { "  " };
        Line::from(vec![
            Span::styled(marker, style),
            Span::styled(key, style),
            Span::styled(answer, style),
        ])
    } else {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(key, bold()),
            Span::raw(answer),
        ])
    }
}

pub fn render_quiz(app: &mut App, f: &mut Frame) {
    let Some(session) = app.session() else {
        return;
    };
    let area = f.area();
    let question = session.current_question();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let question_lines =
        ((question.question.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1) + 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),                                   // category header
            Constraint::Length(2),                                   // progress gauge
            Constraint::Length(question_lines),                      // question
            Constraint::Length(session.current_question().answers.len() as u16 + 1), // choices
            Constraint::Min(0),                                      // feedback
            Constraint::Length(1),                                   // legend
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(session.quiz().category.clone(), bold()),
        Span::styled(format!("  ·  {} Questions", session.total()), dim()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue))
        .label(format!(
            "Question: {}/{}",
            session.current_index() + 1,
            session.total()
        ))
        .ratio((session.current_index() + 1) as f64 / session.total() as f64);
    f.render_widget(progress, chunks[1]);

    let question_widget = Paragraph::new(Span::styled(question.question.clone(), bold()))
        .wrap(Wrap { trim: true });
    f.render_widget(question_widget, chunks[2]);

    let choices: Vec<Line> = question
        .answers
        .iter()
        .enumerate()
        .map(|(idx, answer)| answer_line(session, idx, answer))
        .collect();
    f.render_widget(Paragraph::new(choices), chunks[3]);

    if let Some(record) = session.current_answer() {
        let feedback = if record.is_correct {
            Span::styled("Correct!", bold().fg(Color::Green))
        } else {
            Span::styled("Incorrect", bold().fg(Color::Red))
        };
        f.render_widget(
            Paragraph::new(feedback).alignment(Alignment::Center),
            chunks[4],
        );
    }

    let next_label = if session.current_index() + 1 == session.total() {
        "finish"
    } else {
        "next"
    };
    let hints = Paragraph::new(Span::styled(
        format!("1-9 answer  ←/→ previous/{}  (i)nfo  (v)ocabulary  (esc)ape", next_label),
        legend(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hints, chunks[5]);
}

pub fn render_results(app: &mut App, f: &mut Frame) {
    let Some((score, total)) = app.final_score() else {
        return;
    };
    let pct = percentage(score, total);
    let tier = Tier::from_percentage(pct);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // score box
            Constraint::Length(1), // headline
            Constraint::Length(1), // tier message
            Constraint::Length(1), // padding
            Constraint::Length(1), // summary
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let score_box = Paragraph::new(vec![
        Line::from(Span::styled("Your Score", dim())),
        Line::from(Span::styled(
            format!("{}/{}", score, total),
            bold().fg(Color::Blue),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(score_box, chunks[0]);

    let headline = Paragraph::new(Span::styled(tier.headline(), bold())).alignment(Alignment::Center);
    f.render_widget(headline, chunks[1]);

    let message = Paragraph::new(Span::styled(
        tier.message(),
        bold().fg(tier_color(tier)),
    ))
    .alignment(Alignment::Center);
    f.render_widget(message, chunks[2]);

    let summary = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} Correct", score), bold().fg(Color::Green)),
        Span::raw("   "),
        Span::styled(
            format!("{} Wrong", total.saturating_sub(score)),
            bold().fg(Color::Red),
        ),
        Span::raw("   "),
        Span::styled(format!("{}% Score", pct), bold()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(summary, chunks[4]);

    let share_hint = if Browser::is_available() {
        "(r)etry (h)ome (s)hare (esc)ape"
    } else {
        "(r)etry (h)ome (esc)ape"
    };
    let hints = Paragraph::new(Span::styled(share_hint, legend())).alignment(Alignment::Center);
    f.render_widget(hints, chunks[5]);
}

pub fn render_not_found(app: &mut App, f: &mut Frame) {
    let test_id = app.failed.clone().unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled("Quiz Not Found", bold().fg(Color::Red)))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[1]);

    let detail = Paragraph::new(Span::styled(
        format!("No test document for id '{}'", test_id),
        dim(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(detail, chunks[2]);

    let hint = Paragraph::new(Span::styled("(enter) back to home", legend()))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[3]);
}

fn render_popup(app: &mut App, f: &mut Frame) {
    let Some(popup) = &app.popup else {
        return;
    };

    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = popup
        .items
        .iter()
        .map(|item| Line::from(Span::raw(item.clone())))
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("Nothing to show here.", dim())));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(popup.kind.title())
                .title_style(bold()),
        );
    f.render_widget(body, area);
}
