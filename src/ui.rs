use crate::app::{App, Focus};
use crate::braille;
use crate::sprites;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (frame_area.width.saturating_sub(2), frame_area.height.saturating_sub(2))
    } else {
        let canvas_width = frame_area.width.saturating_sub(SIDEBAR_WIDTH + 2);
        let canvas_height = frame_area.height.saturating_sub(2);
        (canvas_width, canvas_height)
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Status
            Constraint::Length(8), // Parameters
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Disk Bounce ");

    let (status_text, status_color) = if app.is_recording() {
        ("RECORDING", Color::Red)
    } else if app.display.animate {
        ("RUNNING", BORDER_COLOR)
    } else {
        ("PAUSED", HIGHLIGHT_COLOR)
    };

    let content = vec![
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(Span::styled(
            format!("Frame {}", app.frame),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!(
                "Hits {} / Walls {}",
                app.last_report.collisions, app.last_report.wall_bounces
            ),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            app.status.clone().unwrap_or_default(),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let display = &app.display;

    let content = vec![
        make_line("Animate", on_off(display.animate), app.focus == Focus::Animate),
        make_line(
            "Colors",
            display.color_mode.name().to_string(),
            app.focus == Focus::Colors,
        ),
        make_line("Dots", on_off(display.show_dots), app.focus == Focus::Dots),
        make_line("Size", display.size.name(), app.focus == Focus::Size),
        make_line(
            "Speed",
            format!("{}x", display.steps_per_frame),
            app.focus == Focus::Speed,
        ),
        make_line(
            "Particles",
            format!("{}", app.num_particles),
            app.focus == Focus::Particles,
        ),
    ];

    // Keep the focused line visible
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2);
    let scroll = if visible_height == 0 || focus_line < visible_height {
        0
    } else {
        focus_line.saturating_sub(visible_height - 1)
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "animate"),
        make_control("C", "colors"),
        make_control("D", "center dots"),
        make_control("Z/X", "size"),
        make_control("+/-", "speed"),
        make_control("R", "new session"),
        make_control("W", "write config"),
        make_control("P", "png snapshot"),
        make_control("G", "gif record"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let background = braille::to_color(sprites::BACKGROUND);
    let block = styled_block("").style(Style::default().bg(background));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(&app.frame_view(), inner.width, inner.height);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(
                cell.char.to_string(),
                Style::default().fg(cell.color).bg(background),
            );
            frame.render_widget(Paragraph::new(Line::from(span)), cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let heading = Style::default().fg(HIGHLIGHT_COLOR);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled("ELASTIC DISKS", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Disks drift at constant speed, reflect off the walls and bounce off each other. Larger disks act heavier."),
        Line::from(""),
        Line::from(Span::styled("SIZE (Z/X):", heading)),
        Line::from("Diameter shared by every disk. 'Random' lets each disk keep its own size."),
        Line::from(""),
        Line::from(Span::styled("COLORS (C) / DOTS (D):", heading)),
        Line::from("Gold or per-disk random colors. Dots mark every disk center."),
        Line::from(""),
        Line::from(Span::styled("SPEED (+/-):", heading)),
        Line::from("Physics steps per frame."),
        Line::from(""),
        Line::from(Span::styled("SESSION:", heading)),
        Line::from("R scatters a new set. Changing the particle count or resizing the terminal also starts over."),
        Line::from(""),
        Line::from(Span::styled("EXPORT:", heading)),
        Line::from("W writes the config, P saves a PNG, G starts/stops a GIF recording."),
        Line::from(""),
        Line::from("Tab/Arrows=Adjust, Space=Animate, V=Fullscreen, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let is_scrollable = content_height > visible_height;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
