//! The single-threaded badge control loop body.

use crate::display::TerminalDisplay;
use crate::http::{PageRequest, PageView};
use crate::leds::LedAnimations;
use crate::store::JsonScoreStore;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tictac_core::{BadgeError, Executor, ModeStateMachine, RawEvent};
use tracing::{debug, instrument, warn};

/// Executor over the simulator's collaborators.
pub type BadgeExecutor = Executor<TerminalDisplay, LedAnimations, JsonScoreStore>;

/// Mode machine and collaborators, stepped once per loop iteration.
pub struct BadgeRuntime {
    machine: ModeStateMachine<StdRng>,
    executor: BadgeExecutor,
    started: Instant,
    address: String,
}

impl BadgeRuntime {
    /// Wraps a machine and executor. `address` is shown on the game screen.
    pub fn new(
        machine: ModeStateMachine<StdRng>,
        executor: BadgeExecutor,
        address: impl Into<String>,
    ) -> Self {
        Self {
            machine,
            executor,
            started: Instant::now(),
            address: address.into(),
        }
    }

    /// Draws the initial badge screen.
    ///
    /// # Errors
    ///
    /// A display failure that survived its retry.
    pub fn start(&mut self) -> Result<(), BadgeError> {
        let commands = self.machine.startup();
        self.executor.execute(&commands)
    }

    /// Runs one iteration at the current time.
    ///
    /// # Errors
    ///
    /// A display failure that survived its retry.
    pub fn iterate(
        &mut self,
        page: Option<PageRequest>,
        input: Option<RawEvent>,
    ) -> Result<(), BadgeError> {
        let now = self.started.elapsed();
        self.iterate_at(page, input, now)
    }

    /// Runs one iteration: answers at most one page request, then steps the
    /// machine with at most one input event.
    ///
    /// # Errors
    ///
    /// A display failure that survived its retry.
    #[instrument(skip(self, page), fields(mode = %self.machine.mode()))]
    pub fn iterate_at(
        &mut self,
        page: Option<PageRequest>,
        input: Option<RawEvent>,
        now: Duration,
    ) -> Result<(), BadgeError> {
        if let Some(request) = page {
            self.answer_page(request)?;
        }
        let commands = self.machine.step(input, now);
        self.executor.execute(&commands)
    }

    fn answer_page(&mut self, request: PageRequest) -> Result<(), BadgeError> {
        if let Some(color) = request.color {
            let commands = self.machine.set_accent_color(color);
            self.executor.execute(&commands)?;
        }
        let view = PageView {
            all_time: self.machine.scores().all_time(),
        };
        if request.reply.send(view).is_err() {
            warn!("Page requester went away before the reply");
        } else {
            debug!(?view, "Page request answered");
        }
        Ok(())
    }

    /// The mode machine.
    pub fn machine(&self) -> &ModeStateMachine<StdRng> {
        &self.machine
    }

    /// The collaborators.
    pub fn executor(&self) -> &BadgeExecutor {
        &self.executor
    }

    /// HTTP address shown on the game screen.
    pub fn address(&self) -> &str {
        &self.address
    }
}
