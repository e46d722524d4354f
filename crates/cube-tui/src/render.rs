use crate::app::App;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use cube_core::{Face, Phase, SolveResult};
use std::io;

/// Width of one sticker in columns
const STICKER_WIDTH: u16 = 2;
/// A face plus a one-column gap
const FACE_STRIDE_X: u16 = STICKER_WIDTH * 3 + 1;
/// A face plus a one-row gap
const FACE_STRIDE_Y: u16 = 4;
/// Width of the whole unfolded net
const NET_WIDTH: u16 = FACE_STRIDE_X * 4;
const NET_HEIGHT: u16 = FACE_STRIDE_Y * 3;
const PANEL_WIDTH: u16 = 34;

/// Where each face sits in the unfolded net, in face units
///
/// ```text
///     U
///   L F R B
///     D
/// ```
fn net_position(face: Face) -> (u16, u16) {
    match face {
        Face::U => (1, 0),
        Face::L => (0, 1),
        Face::F => (1, 1),
        Face::R => (2, 1),
        Face::B => (3, 1),
        Face::D => (1, 2),
    }
}

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    let total_width = NET_WIDTH + 3 + PANEL_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > NET_HEIGHT + 10 { 2 } else { 1 };

    render_net(stdout, app, start_x, start_y)?;
    render_info_panel(stdout, app, start_x + NET_WIDTH + 3, start_y)?;
    render_controls(stdout, app, start_x, start_y + NET_HEIGHT + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_net(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let state = app.session.state();

    for face in Face::ALL {
        let (fx, fy) = net_position(face);
        let face_x = x + fx * FACE_STRIDE_X;
        let face_y = y + fy * FACE_STRIDE_Y;

        for row in 0..3 {
            execute!(stdout, MoveTo(face_x, face_y + row as u16))?;
            for col in 0..3 {
                let color = app.theme.sticker(state.sticker(face, row, col));
                let glyph = if row == 1 && col == 1 { face.letter() } else { ' ' };
                execute!(
                    stdout,
                    SetBackgroundColor(color),
                    SetForegroundColor(app.theme.bg),
                    Print(format!("{} ", glyph))
                )?;
            }
        }
    }

    execute!(stdout, SetBackgroundColor(app.theme.bg))?;
    Ok(())
}

fn status_line(app: &App) -> String {
    let session = &app.session;
    if let Some((done, total)) = session.playback_progress() {
        return format!("Playing {}/{}", done, total);
    }
    match app.phase {
        Some(Phase::BacktrackAttempt2) => "Backtracking...".to_string(),
        Some(Phase::Attempt1) => "Solving...".to_string(),
        None if session.state().is_solved() => "Solved".to_string(),
        None => "Idle".to_string(),
    }
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.title),
        Print("═══ CUBE ═══")
    )?;

    let rows = [
        ("Solver", app.solver_name().to_string()),
        ("Status", status_line(app)),
        ("Moves", session.history().len().to_string()),
        (
            "Scramble",
            session
                .scramble_record()
                .map(|s| cube_core::format_sequence(s.moves()))
                .unwrap_or_else(|| "none".to_string()),
        ),
    ];

    let mut line = y + 2;
    for (label, value) in rows {
        for (i, chunk) in wrap_text(&value, (PANEL_WIDTH - 10) as usize).iter().enumerate() {
            let label = if i == 0 { label } else { "" };
            execute!(
                stdout,
                MoveTo(x, line),
                SetForegroundColor(theme.info),
                Print(format!("{:<10}", label)),
                SetForegroundColor(theme.fg),
                Print(chunk)
            )?;
            line += 1;
        }
    }

    let Some(result) = session.last_result() else {
        return Ok(());
    };

    line += 1;
    let color = match result {
        SolveResult::Done(_) => theme.success,
        SolveResult::Fallback(_) => theme.fallback,
        SolveResult::Error(_) => theme.error,
    };
    for chunk in wrap_text(&result.to_string(), PANEL_WIDTH as usize) {
        execute!(stdout, MoveTo(x, line), SetForegroundColor(color), Print(chunk))?;
        line += 1;
    }

    if let Some(metrics) = result.solution().and_then(|s| s.metrics.as_ref()) {
        execute!(
            stdout,
            MoveTo(x, line + 1),
            SetForegroundColor(theme.info),
            Print(format!(
                "Time {}s  Depth {}  Nodes {}",
                metrics.time, metrics.depth, metrics.nodes
            ))
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let controls = [
        ("udlrfb", "Turn"),
        ("Shift", "Reverse"),
        ("Bksp", "Undo"),
        ("m", "Random"),
        ("x", "Scramble"),
        ("s", "Solve"),
        ("Space", "Play"),
        ("Esc", "Reset"),
        ("q", "Quit"),
    ];

    // 3 columns of 3
    for (i, (key, desc)) in controls.iter().enumerate() {
        let cx = x + (i / 3) as u16 * 17;
        let cy = y + (i % 3) as u16;
        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>6}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(stdout: &mut io::Stdout, app: &App, msg: &str, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.banner_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
