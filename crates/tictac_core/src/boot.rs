//! Power-on sequence: optional high-score wipe, then score load.

use crate::input::{Button, HeldButtons};
use crate::{Score, ScoreStore, StoreError, load_persisted};
use tracing::{info, instrument};

/// Buttons that, held together at power-on, wipe the all-time score.
pub const RESET_GESTURE: [Button; 3] = [Button::Up, Button::Down, Button::A];

/// Loads the all-time score, first zeroing it if the reset gesture is held.
///
/// # Errors
///
/// A store read or write failure other than first-boot `NoData`.
#[instrument(skip(store))]
pub fn boot(store: &mut dyn ScoreStore, held: HeldButtons) -> Result<Score, StoreError> {
    if held.contains_all(&RESET_GESTURE) {
        info!("Up, down and A held at boot, resetting high score");
        store.write(Score::default(), false)?;
    }
    load_persisted(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreErrorKind;

    struct OneRecord(Option<Score>);

    impl ScoreStore for OneRecord {
        fn read(&mut self) -> Result<Score, StoreError> {
            self.0.ok_or_else(|| StoreError::new(StoreErrorKind::NoData))
        }

        fn write(&mut self, score: Score, _test_run: bool) -> Result<(), StoreError> {
            self.0 = Some(score);
            Ok(())
        }
    }

    #[test]
    fn test_gesture_wipes_score() {
        let mut store = OneRecord(Some(Score::new(9, 4)));
        let held = HeldButtons::from_buttons(&RESET_GESTURE);
        assert_eq!(boot(&mut store, held).unwrap(), Score::default());
    }

    #[test]
    fn test_partial_gesture_keeps_score() {
        let mut store = OneRecord(Some(Score::new(9, 4)));
        let held = HeldButtons::from_buttons(&[Button::Up, Button::A]);
        assert_eq!(boot(&mut store, held).unwrap(), Score::new(9, 4));
    }

    #[test]
    fn test_first_boot() {
        let mut store = OneRecord(None);
        assert_eq!(boot(&mut store, HeldButtons::default()).unwrap(), Score::default());
        assert_eq!(store.0, Some(Score::default()));
    }
}
