use std::path::PathBuf;

/// Final state of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Identifier found; the image was copied into the output directory.
    Placed {
        identifier: String,
        destination: PathBuf,
        /// A `_N` suffix was added because the plain name was taken.
        renamed: bool,
    },
    /// No identifier in the recognized text; the image was moved to the error directory.
    Unmatched { moved_to: PathBuf },
    /// Extraction or placement failed. `moved_to` is `None` when the image
    /// could not be relocated (for example because it had vanished).
    Failed {
        error: String,
        moved_to: Option<PathBuf>,
    },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Placed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub source: PathBuf,
    pub outcome: ItemOutcome,
}

/// Success and failure tallies for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounters {
    pub succeeded: usize,
    pub failed: usize,
}

impl OutcomeCounters {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl std::ops::AddAssign for OutcomeCounters {
    fn add_assign(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub counters: OutcomeCounters,
    /// Items discovered in the source directory.
    pub total: usize,
    /// Items left untouched because the run was cancelled.
    pub remaining: usize,
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.counters.succeeded
    }

    pub fn failed(&self) -> usize {
        self.counters.failed
    }

    pub fn was_cancelled(&self) -> bool {
        self.remaining > 0
    }
}
