//! Simulated NeoPixel strip running a sequence of rainbow animations.

use rand::Rng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tictac_core::{Animation, Rgb};
use tracing::{debug, info, instrument};

/// Pixels on the strip.
pub const PIXEL_COUNT: usize = 8;

/// Minimum time between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// The sequence moves to the next animation after this long.
pub const ADVANCE_INTERVAL: Duration = Duration::from_secs(45);

const COMET_TAIL: usize = 11;
const SPARKLES: usize = 5;
const SPARKLE_BACKGROUND: f32 = 0.2;
const CHASE_SIZE: usize = 5;
const CHASE_SPACING: usize = 3;
const RAINBOW_PERIOD_FRAMES: u32 = 20;

/// Animations in sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum AnimationKind {
    /// A bouncing head with a fading tail.
    #[strum(serialize = "rainbow comet")]
    RainbowComet,
    /// The whole strip cycles through the hue wheel.
    #[strum(serialize = "rainbow")]
    Rainbow,
    /// Dim rainbow with random full-brightness sparkles.
    #[strum(serialize = "rainbow sparkle")]
    RainbowSparkle,
    /// Lit bars separated by gaps, marching along the strip.
    #[strum(serialize = "rainbow chase")]
    RainbowChase,
}

/// Maps `pos` in `0..=255` onto a red, green, blue hue wheel.
pub fn color_wheel(pos: u8) -> Rgb {
    match pos {
        0..85 => Rgb::from_channels(255 - pos * 3, pos * 3, 0),
        85..170 => {
            let p = pos - 85;
            Rgb::from_channels(0, 255 - p * 3, p * 3)
        }
        _ => {
            let p = pos - 170;
            Rgb::from_channels(p * 3, 0, 255 - p * 3)
        }
    }
}

fn hue(step: usize) -> Rgb {
    color_wheel((step % 256) as u8)
}

/// LED strip with an auto-advancing animation sequence.
#[derive(Debug)]
pub struct LedAnimations {
    sequence: Vec<AnimationKind>,
    current: usize,
    pixels: [Rgb; PIXEL_COUNT],
    brightness: f32,
    frozen: bool,
    frame: u32,
    last_frame: Option<Instant>,
    switched_at: Option<Instant>,
    rng: StdRng,
}

impl LedAnimations {
    /// Creates a dark strip starting on the first animation.
    pub fn new(rng: StdRng) -> Self {
        Self {
            sequence: AnimationKind::iter().collect(),
            current: 0,
            pixels: [Rgb::BLACK; PIXEL_COUNT],
            brightness: 1.0,
            frozen: false,
            frame: 0,
            last_frame: None,
            switched_at: None,
            rng,
        }
    }

    /// Current animation.
    pub fn current(&self) -> AnimationKind {
        self.sequence[self.current]
    }

    /// True while frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Strip brightness.
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Pixel colors as they appear, after brightness.
    pub fn pixels(&self) -> [Rgb; PIXEL_COUNT] {
        self.pixels.map(|p| p.scaled(self.brightness))
    }

    /// Raw pixel colors before brightness.
    pub fn raw_pixels(&self) -> &[Rgb; PIXEL_COUNT] {
        &self.pixels
    }

    /// Advances as if the current time were `now`.
    pub fn advance_at(&mut self, now: Instant) {
        if self.frozen {
            return;
        }

        let switched_at = *self.switched_at.get_or_insert(now);
        if now.saturating_duration_since(switched_at) >= ADVANCE_INTERVAL {
            info!(from = %self.current(), "Auto-advancing animation");
            self.switch(1);
            self.switched_at = Some(now);
        }

        let due = self
            .last_frame
            .is_none_or(|last| now.saturating_duration_since(last) >= FRAME_INTERVAL);
        if due {
            self.draw_frame();
            self.frame = self.frame.wrapping_add(1);
            self.last_frame = Some(now);
        }
    }

    fn switch(&mut self, forward: isize) {
        let len = self.sequence.len() as isize;
        self.current = (self.current as isize + forward).rem_euclid(len) as usize;
        self.frame = 0;
        self.last_frame = None;
        self.switched_at = None;
        self.pixels = [Rgb::BLACK; PIXEL_COUNT];
        debug!(animation = %self.current(), "Animation selected");
    }

    fn draw_frame(&mut self) {
        let frame = self.frame as usize;
        match self.current() {
            AnimationKind::RainbowComet => self.draw_comet(frame),
            AnimationKind::Rainbow => {
                let offset = (self.frame % RAINBOW_PERIOD_FRAMES) as usize * 256
                    / RAINBOW_PERIOD_FRAMES as usize;
                for (i, pixel) in self.pixels.iter_mut().enumerate() {
                    *pixel = hue(offset + i * 256 / PIXEL_COUNT);
                }
            }
            AnimationKind::RainbowSparkle => {
                for (i, pixel) in self.pixels.iter_mut().enumerate() {
                    *pixel = hue(frame * 8 + i * 256 / PIXEL_COUNT).scaled(SPARKLE_BACKGROUND);
                }
                for _ in 0..SPARKLES {
                    let i = self.rng.random_range(0..PIXEL_COUNT);
                    self.pixels[i] = hue(frame * 8 + i * 256 / PIXEL_COUNT);
                }
            }
            AnimationKind::RainbowChase => {
                let period = CHASE_SIZE + CHASE_SPACING;
                for (i, pixel) in self.pixels.iter_mut().enumerate() {
                    *pixel = if (i + period - frame % period) % period < CHASE_SIZE {
                        hue(frame * 8 + i * 256 / PIXEL_COUNT)
                    } else {
                        Rgb::BLACK
                    };
                }
            }
        }
    }

    fn draw_comet(&mut self, frame: usize) {
        // Head bounces between the strip ends.
        let span = PIXEL_COUNT - 1;
        let phase = frame % (2 * span);
        let (head, forward) = if phase <= span {
            (phase, true)
        } else {
            (2 * span - phase, false)
        };

        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            let behind = if forward {
                head.checked_sub(i)
            } else {
                i.checked_sub(head)
            };
            *pixel = match behind {
                Some(d) if d < COMET_TAIL => {
                    let fade = 1.0 - d as f32 / COMET_TAIL as f32;
                    hue(frame * 8 + d * 16).scaled(fade)
                }
                _ => Rgb::BLACK,
            };
        }
    }
}

impl Animation for LedAnimations {
    fn advance(&mut self) {
        self.advance_at(Instant::now());
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn resume(&mut self) {
        self.frozen = false;
    }

    #[instrument(skip(self))]
    fn fill(&mut self, color: Rgb) {
        self.pixels = [color; PIXEL_COUNT];
    }

    fn next(&mut self) {
        self.switch(1);
    }

    fn previous(&mut self) {
        self.switch(-1);
    }

    fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.clamp(0.0, 1.0);
    }
}
