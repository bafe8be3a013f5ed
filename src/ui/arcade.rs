use itertools::Itertools;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{centered, dim_style, frame_block};
use crate::arcade::{ArcadeGame, FIELD_HEIGHT, FIELD_WIDTH, INITIAL_LIVES};

const BOX_WIDTH: u16 = 72;
/// Every n-th cell of the field shows a star
const STAR_SPACING: usize = 37;

fn depth_style(row: u16) -> Style {
    let color = if row > FIELD_HEIGHT * 2 / 3 {
        Color::LightRed
    } else if row > FIELD_HEIGHT / 3 {
        Color::LightYellow
    } else {
        Color::LightGreen
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn status_line(game: &ArcadeGame) -> Line<'static> {
    let lives = (0..INITIAL_LIVES)
        .map(|i| if i < game.lives { "*" } else { " " })
        .join(" ");
    let bold = Style::default().add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::raw("Score: "),
        Span::styled(format!("{:5}", game.score), bold.fg(Color::LightYellow)),
        Span::raw("  Level: "),
        Span::styled(game.level.to_string(), bold.fg(Color::LightCyan)),
        Span::raw("  Lives: "),
        Span::styled(lives, bold.fg(Color::LightRed)),
        Span::raw("  Hits: "),
        Span::styled(game.hits.to_string(), bold.fg(Color::LightGreen)),
    ])
}

fn field_lines(game: &ArcadeGame) -> Vec<Line<'static>> {
    let width = FIELD_WIDTH as usize;
    let mut grid = vec![vec![None; width]; FIELD_HEIGHT as usize];
    for inv in game.alive_invaders() {
        let (row, col) = (inv.row_index() as usize, inv.col as usize);
        if row < grid.len() && col < width {
            grid[row][col] = Some(inv.letter);
        }
    }

    grid.into_iter()
        .enumerate()
        .map(|(r, cells)| {
            let spans = cells
                .into_iter()
                .enumerate()
                .map(|(c, cell)| match cell {
                    Some(letter) => Span::styled(letter.to_string(), depth_style(r as u16)),
                    None if (r * width + c) % STAR_SPACING == 0 => Span::styled("·", dim_style()),
                    None => Span::raw(" "),
                })
                .collect_vec();
            Line::from(spans)
        })
        .collect()
}

pub fn render_arcade(game: &ArcadeGame, f: &mut Frame) {
    let mut lines = vec![status_line(game), Line::default()];
    lines.extend(field_lines(game));

    let cannon_pad = " ".repeat(FIELD_WIDTH as usize / 2 - 1);
    lines.push(Line::from(vec![
        Span::raw(cannon_pad),
        Span::styled(
            "▲",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::default());

    if game.is_over() {
        lines.push(Line::styled(
            format!(
                "GAME OVER   Score: {}   Hits: {}   Missed: {}",
                game.score, game.hits, game.missed
            ),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled("R=Restart │ M=Menu │ Q=Quit", dim_style()));
    } else {
        lines.push(Line::styled(
            "Type the falling letters to shoot them │ ESC=Menu",
            dim_style(),
        ));
    }

    let area = centered(f.area(), BOX_WIDTH, lines.len() as u16 + 2);
    let block = frame_block(" Space Invaders ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    // center the field inside the box
    let pad = inner.width.saturating_sub(FIELD_WIDTH) / 2;
    let mut field_area = inner;
    field_area.x += pad;
    field_area.width -= pad;
    f.render_widget(Paragraph::new(lines), field_area);
}
