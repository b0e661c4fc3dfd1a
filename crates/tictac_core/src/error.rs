//! Top-level error for the badge control loop.

use crate::{RenderError, StoreError};

/// Fatal conditions surfaced to the loop's owner.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum BadgeError {
    /// Score storage failed where it cannot be recovered (boot load).
    #[display("{_0}")]
    Store(StoreError),

    /// The display failed, or kept failing after a retry.
    #[display("{_0}")]
    Render(RenderError),
}
