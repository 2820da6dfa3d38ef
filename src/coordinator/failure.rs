/// Device reachability as judged by consecutive refresh failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureState {
    /// The last refresh succeeded.
    Healthy,
    /// Exactly one refresh in a row has failed. Consumers keep getting a
    /// shaped snapshot, just zeroed.
    Degraded,
    /// Two or more refreshes in a row have failed.
    Fatal,
}

/// Counts consecutive refresh failures for one device.
///
/// Owned by the update task alone; nothing else reads or writes the count.
#[derive(Debug, Default)]
pub(crate) struct FailureTracker {
    consecutive: u32,
}

impl FailureTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a successful refresh. Always returns the tracker to
    /// `Healthy`, no matter how deep the failure streak was.
    pub(crate) fn record_success(&mut self) {
        self.consecutive = 0;
    }

    /// Records one failed refresh and returns the state it moved to.
    pub(crate) fn record_failure(&mut self) -> FailureState {
        self.consecutive = self.consecutive.saturating_add(1);
        self.state()
    }

    pub(crate) fn state(&self) -> FailureState {
        match self.consecutive {
            0 => FailureState::Healthy,
            1 => FailureState::Degraded,
            _ => FailureState::Fatal,
        }
    }

    pub(crate) fn consecutive_failures(&self) -> u32 {
        self.consecutive
    }
}
