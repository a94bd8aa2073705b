//! Observer handles.

use serde::{Deserialize, Serialize};

/// Unique handle returned by every `add_*` call on a [`Subject`](crate::Subject).
///
/// Handles issued by one subject are strictly increasing, start at 1 and are
/// never reused for the lifetime of that subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Wrap a raw handle value.
    ///
    /// Useful for removing a handle obtained out of band. A handle that was
    /// never issued is accepted by `remove_observer` and simply ignored.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

impl From<ObserverId> for u64 {
    fn from(id: ObserverId) -> Self {
        id.0
    }
}
