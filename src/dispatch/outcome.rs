use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Success {
        status_code: u16,
        status_text: String,
    },
    Failure {
        error_description: String,
    },
}

impl OutcomeKind {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, OutcomeKind::Success { .. })
    }
}

/// Terminal result of one task. Rendered through `Display` as the log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    sequence_number: u64,
    kind: OutcomeKind,
}

impl Outcome {
    #[must_use]
    pub const fn new(sequence_number: u64, kind: OutcomeKind) -> Self {
        Self {
            sequence_number,
            kind,
        }
    }

    #[must_use]
    pub const fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    #[must_use]
    pub const fn kind(&self) -> &OutcomeKind {
        &self.kind
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OutcomeKind::Success {
                status_code,
                status_text,
            } => {
                if status_text.is_empty() {
                    write!(f, "{} Request: {}", self.sequence_number, status_code)
                } else {
                    write!(
                        f,
                        "{} Request: {} {}",
                        self.sequence_number, status_code, status_text
                    )
                }
            }
            OutcomeKind::Failure { error_description } => write!(
                f,
                "{} Request: Error {}",
                self.sequence_number, error_description
            ),
        }
    }
}

/// One completed task together with the run's progress after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEvent {
    pub outcome: Outcome,
    /// Whole percent, `0..=100`.
    pub progress: u8,
}
