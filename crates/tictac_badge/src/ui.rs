//! Stateless drawing of the simulated badge.

use crate::display::{
    GRID_LINES, PANEL_HEIGHT, PANEL_WIDTH, Scene, TILE_SIZE, all_time_label, session_label,
    tile_origin, win_line_polygon,
};
use crate::leds::LedAnimations;
use crate::runtime::BadgeRuntime;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Circle, Context, Line as Stroke, Rectangle},
    },
};
use tictac_core::{Player, Rgb, Screen};

const INK: Color = Color::Black;
const PAPER: Color = Color::White;
const TEXT_LINE_HEIGHT: f64 = 14.0;

/// Draws LED strip, panel and status bar.
pub fn draw(frame: &mut Frame, runtime: &BadgeRuntime, a_latched: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // LEDs
            Constraint::Min(12),   // Panel
            Constraint::Length(3), // Status
        ])
        .split(frame.area());

    draw_leds(frame, chunks[0], runtime.executor().animation());
    draw_panel(frame, chunks[1], runtime.executor().renderer().shown(), runtime.address());
    draw_status(frame, chunks[2], runtime, a_latched);
}

fn to_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.channels();
    Color::Rgb(r, g, b)
}

fn draw_leds(frame: &mut Frame, area: Rect, leds: &LedAnimations) {
    let spans: Vec<Span> = leds
        .pixels()
        .iter()
        .flat_map(|p| {
            [
                Span::styled("●", Style::default().fg(to_color(*p))),
                Span::raw("  "),
            ]
        })
        .collect();
    let title = format!(" LEDs: {} ", leds.current());
    let strip = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(strip, area);
}

/// Canvas y grows upward; panel pixels grow downward.
fn flip(y: f64) -> f64 {
    f64::from(PANEL_HEIGHT) - y
}

fn print_block(ctx: &mut Context, x: f64, top: f64, text: &str) {
    for (i, line) in text.lines().enumerate() {
        ctx.print(
            x,
            flip(top + i as f64 * TEXT_LINE_HEIGHT),
            Line::styled(line.to_string(), Style::default().fg(INK)),
        );
    }
}

fn draw_panel(frame: &mut Frame, area: Rect, scene: &Scene, address: &str) {
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", scene.screen)),
        )
        .background_color(PAPER)
        .marker(Marker::Braille)
        .x_bounds([0.0, f64::from(PANEL_WIDTH)])
        .y_bounds([0.0, f64::from(PANEL_HEIGHT)])
        .paint(|ctx| match scene.screen {
            Screen::Badge => paint_badge(ctx),
            Screen::Game => paint_game(ctx, scene, address),
        });
    frame.render_widget(canvas, area);
}

fn paint_badge(ctx: &mut Context) {
    ctx.draw(&Rectangle {
        x: 4.0,
        y: 4.0,
        width: f64::from(PANEL_WIDTH) - 8.0,
        height: f64::from(PANEL_HEIGHT) - 8.0,
        color: INK,
    });
    print_block(ctx, 110.0, 30.0, "HELLO\nmy name is");
    print_block(ctx, 100.0, 72.0, "TIC-TAC-TOE");
    print_block(ctx, 70.0, 100.0, "hold A, press C to play");
}

fn paint_game(ctx: &mut Context, scene: &Scene, address: &str) {
    for (x, y, w, h) in GRID_LINES {
        ctx.draw(&Rectangle {
            x: f64::from(x),
            y: flip(f64::from(y + h)),
            width: f64::from(w),
            height: f64::from(h),
            color: INK,
        });
    }

    let tile = f64::from(TILE_SIZE);
    for (position, player) in &scene.pieces {
        let (ox, oy) = tile_origin(*position);
        let (x, y) = (f64::from(ox), f64::from(oy));
        match player {
            Player::X => {
                let (near, far) = (6.0, tile - 6.0);
                ctx.draw(&Stroke::new(x + near, flip(y + near), x + far, flip(y + far), INK));
                ctx.draw(&Stroke::new(x + near, flip(y + far), x + far, flip(y + near), INK));
            }
            Player::O => ctx.draw(&Circle {
                x: x + tile / 2.0,
                y: flip(y + tile / 2.0),
                radius: tile / 2.0 - 6.0,
                color: INK,
            }),
        }
    }

    if let Some(position) = scene.selector {
        let (ox, oy) = tile_origin(position);
        ctx.draw(&Rectangle {
            x: f64::from(ox),
            y: flip(f64::from(oy) + tile),
            width: tile,
            height: tile,
            color: Color::Blue,
        });
    }

    if let Some(line) = scene.win_line {
        let points = win_line_polygon(line);
        for (i, (x1, y1)) in points.iter().enumerate() {
            let (x2, y2) = points[(i + 1) % points.len()];
            ctx.draw(&Stroke::new(
                f64::from(*x1),
                flip(f64::from(*y1)),
                f64::from(x2),
                flip(f64::from(y2)),
                Color::Red,
            ));
        }
    }

    ctx.layer();
    print_block(ctx, 134.0, 4.0, &session_label(scene.session));
    print_block(ctx, 220.0, 4.0 + TEXT_LINE_HEIGHT, &all_time_label(scene.all_time));
    print_block(ctx, 150.0, 118.0, &format!("IP: {address}"));
}

fn draw_status(frame: &mut Frame, area: Rect, runtime: &BadgeRuntime, a_latched: bool) {
    let machine = runtime.machine();
    let mut spans = vec![
        Span::styled(
            format!("{} ", machine.mode()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "| turn {} | brightness {:.1} ",
            machine.turn(),
            machine.brightness()
        )),
    ];
    if a_latched {
        spans.push(Span::styled("| A held ", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        "| ↑/w ↓/s a b c  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    let status = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}
