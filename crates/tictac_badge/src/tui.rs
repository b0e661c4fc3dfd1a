//! Terminal front end: raw mode, key polling, and the blocking control loop.

use crate::http::PageRequest;
use crate::keys::{KeyAction, KeyMapper};
use crate::runtime::BadgeRuntime;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use tictac_core::RawEvent;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Takes over the terminal and runs the badge until the user quits.
pub fn run(
    mut runtime: BadgeRuntime,
    mut pages: mpsc::Receiver<PageRequest>,
    poll: Duration,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let reports_releases = supports_keyboard_enhancement().unwrap_or(false);
    if reports_releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!(reports_releases, "Terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut mapper = KeyMapper::new(reports_releases);

    let res = control_loop(&mut terminal, &mut runtime, &mut pages, &mut mapper, poll);

    if reports_releases {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Control loop error");
    }
    res
}

#[instrument(skip_all)]
fn control_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &mut BadgeRuntime,
    pages: &mut mpsc::Receiver<PageRequest>,
    mapper: &mut KeyMapper,
    poll: Duration,
) -> Result<()> {
    runtime.start()?;
    let mut inputs: VecDeque<RawEvent> = VecDeque::new();

    loop {
        terminal.draw(|f| ui::draw(f, runtime, mapper.a_latched()))?;

        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                match mapper.map(key) {
                    KeyAction::Quit => {
                        info!("Quit requested");
                        return Ok(());
                    }
                    KeyAction::Buttons(events) => inputs.extend(events),
                    KeyAction::Ignored => {}
                }
            }
        }

        let page = pages.try_recv().ok();
        runtime.iterate(page, inputs.pop_front())?;
    }
}
