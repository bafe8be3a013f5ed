use std::rc::Rc;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{centered, dim_style, frame_block, BACKGROUND};
use crate::{lesson::Lesson, session::Session, stats::Stats};

const BOX_WIDTH: u16 = 72;
/// Room for the "Target: " label and the borders
const LABEL_WIDTH: u16 = 14;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn title_style() -> Style {
    bold().fg(Color::LightYellow)
}

pub fn render_menu(lessons: &[Rc<Lesson>], selected: usize, f: &mut Frame) {
    let mut lines = vec![
        Line::default(),
        Line::styled("Typing Tutor", title_style()).alignment(Alignment::Center),
        Line::styled("Classic terminal typing practice", dim_style())
            .alignment(Alignment::Center),
        Line::default(),
        Line::styled("Select Lesson:", title_style()),
        Line::default(),
    ];

    let names = lessons
        .iter()
        .map(|l| l.name().to_string())
        .chain(std::iter::once("Space Invaders -- Typing Game".to_string()));

    for (idx, name) in names.enumerate() {
        let entry = format!("{}. {}", idx + 1, name);
        let line = if idx == selected {
            Line::from(vec![
                Span::styled("▸ ", Style::default().fg(Color::LightCyan)),
                Span::styled(entry, bold().fg(Color::LightCyan)),
            ])
        } else {
            Line::from(vec![Span::raw("  "), Span::raw(entry)])
        };
        lines.push(line);
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        "Up/Down Select │ 1-9 Jump │ Enter Start │ Q Quit",
        dim_style(),
    ));

    let area = centered(f.area(), BOX_WIDTH, lines.len() as u16 + 2);
    f.render_widget(Paragraph::new(lines).block(frame_block(" Menu ")), area);
}

fn stat_line(stats: &Stats, errors: usize) -> Line<'static> {
    let secs = stats.elapsed.as_secs();
    Line::from(vec![
        Span::raw("Time: "),
        Span::styled(
            format!("{:02}:{:02}", secs / 60, secs % 60),
            Style::default().fg(Color::LightYellow),
        ),
        Span::raw("  Speed: "),
        Span::styled(
            format!("{:.0} CPM", stats.cpm()),
            Style::default().fg(Color::LightGreen),
        ),
        Span::raw("  Errors: "),
        Span::styled(errors.to_string(), Style::default().fg(Color::LightRed)),
        Span::raw("  Accuracy: "),
        Span::styled(
            format!("{:.1}%", stats.accuracy()),
            Style::default().fg(Color::LightCyan),
        ),
    ])
}

fn input_spans(session: &Session) -> Vec<Span<'static>> {
    let target = session.target();
    let mut spans: Vec<Span> = session
        .typed()
        .iter()
        .zip(target)
        .map(|(typed, expected)| {
            // wrong keys still show the expected char so the line stays readable
            if typed == expected {
                Span::styled(expected.to_string(), Style::default().fg(Color::LightGreen))
            } else {
                Span::styled(
                    expected.to_string(),
                    bold().fg(Color::White).bg(Color::Red),
                )
            }
        })
        .collect();

    if let Some(next) = session.expected_char(session.typed().len()) {
        spans.push(Span::styled(
            next.to_string(),
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    spans
}

pub fn render_typing(session: &Session, f: &mut Frame) {
    let target: String = session.target().iter().collect();
    let width = BOX_WIDTH.max(target.width() as u16 + LABEL_WIDTH);
    let area = centered(f.area(), width, 13);
    let block = frame_block(" Typing Practice ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let header = vec![
        Line::from(vec![
            Span::styled(session.lesson().name().to_string(), bold()),
            Span::raw(format!(
                "    Line {}/{}",
                session.line_index() + 1,
                session.line_count()
            )),
        ]),
        stat_line(&session.live_stats(), session.errors()),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    let mut input = vec![Span::styled("Input:  ", bold())];
    input.extend(input_spans(session));
    let lines = vec![
        Line::from(vec![Span::styled("Target: ", bold()), Span::raw(target)]),
        Line::from(input),
    ];
    f.render_widget(Paragraph::new(lines), chunks[2]);

    let ratio = if session.target().is_empty() {
        1.0
    } else {
        (session.typed().len() as f64 / session.target().len() as f64).min(1.0)
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::LightGreen).bg(Color::DarkGray))
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0)),
        chunks[4],
    );

    f.render_widget(
        Paragraph::new(Line::styled(
            "Backspace=Delete │ ESC=Menu │ Ctrl-C=Quit",
            dim_style(),
        )),
        chunks[6],
    );
}

pub fn render_line_complete(session: &Session, f: &mut Frame) {
    let stats = session.last_line_stats().copied().unwrap_or_default();

    let prompt = if session.all_done() {
        Line::styled("Lesson complete! Press any key for results...", title_style())
    } else {
        Line::styled("Press any key for next line...", dim_style())
    };

    let lines = vec![
        Line::default(),
        Line::styled("✓ Line Complete!", bold().fg(Color::LightGreen))
            .alignment(Alignment::Center),
        Line::default(),
        Line::from(vec![
            Span::raw("Chars: "),
            Span::styled(stats.total.to_string(), bold()),
            Span::raw("   Correct: "),
            Span::styled(stats.correct.to_string(), bold().fg(Color::LightGreen)),
            Span::raw("   Errors: "),
            Span::styled(stats.errors.to_string(), bold().fg(Color::LightRed)),
        ]),
        Line::from(vec![
            Span::raw("Time: "),
            Span::styled(
                format!("{:.1}s", stats.elapsed.as_secs_f64()),
                Style::default().fg(Color::LightYellow),
            ),
            Span::raw("   Speed: "),
            Span::styled(
                format!("{:.0} CPM", stats.cpm()),
                Style::default().fg(Color::LightGreen),
            ),
            Span::raw("   Accuracy: "),
            Span::styled(
                format!("{:.1}%", stats.accuracy()),
                Style::default().fg(Color::LightCyan),
            ),
        ]),
        Line::default(),
        prompt,
    ];

    let area = centered(f.area(), BOX_WIDTH, lines.len() as u16 + 2);
    f.render_widget(Paragraph::new(lines).block(frame_block(" Line ")), area);
}

fn report_row(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<10}")),
        Span::styled(value, style),
    ])
}

pub fn render_results(session: &Session, f: &mut Frame) {
    let total = session.total_stats();

    let lines = vec![
        Line::default(),
        report_row("Lesson:", session.lesson().name().to_string(), bold()),
        report_row("Lines:", session.line_count().to_string(), bold()),
        Line::default(),
        report_row("Chars:", total.total.to_string(), bold()),
        report_row("Correct:", total.correct.to_string(), bold().fg(Color::LightGreen)),
        report_row("Errors:", total.errors.to_string(), bold().fg(Color::LightRed)),
        report_row(
            "Time:",
            format!("{:.1}s", total.elapsed.as_secs_f64()),
            Style::default().fg(Color::LightYellow),
        ),
        report_row(
            "Speed:",
            format!("{:.0} CPM ({:.0} WPM)", total.cpm(), total.wpm()),
            bold().fg(Color::LightGreen),
        ),
        report_row(
            "Accuracy:",
            format!("{:.1}%", total.accuracy()),
            bold().fg(Color::LightCyan),
        ),
        Line::default(),
        Line::styled(format!("Grade: {}", total.grade()), title_style())
            .alignment(Alignment::Center),
        Line::default(),
        Line::styled("R=Retry │ M=Menu │ Q=Quit", dim_style()),
    ];

    let area = centered(f.area(), BOX_WIDTH, lines.len() as u16 + 2);
    f.render_widget(
        Paragraph::new(lines)
            .block(frame_block(" Score Report "))
            .style(Style::default().bg(BACKGROUND)),
        area,
    );
}
