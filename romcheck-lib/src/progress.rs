/// Stage of work on a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Hashing,
    LoadingDats,
    Validating,
}

impl ValidationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hashing => "hashing",
            Self::LoadingDats => "loading-dats",
            Self::Validating => "validating",
        }
    }
}

impl std::fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress update emitted during batch validation.
///
/// Purely informational: dropping every update does not change the outcome
/// of a batch. `index` is zero-based, `total` excludes sidecar files.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationProgress {
    /// A file entered a new stage
    Stage {
        stage: ValidationStage,
        filename: String,
        index: usize,
        total: usize,
    },

    /// A file finished, with or without a match
    FileDone {
        filename: String,
        index: usize,
        total: usize,
    },

    /// The batch ended
    Finished {
        processed: usize,
        total: usize,
        cancelled: bool,
    },
}

impl ValidationProgress {
    pub fn stage(stage: ValidationStage, filename: impl Into<String>, index: usize, total: usize) -> Self {
        Self::Stage {
            stage,
            filename: filename.into(),
            index,
            total,
        }
    }

    pub fn file_done(filename: impl Into<String>, index: usize, total: usize) -> Self {
        Self::FileDone {
            filename: filename.into(),
            index,
            total,
        }
    }

    pub fn finished(processed: usize, total: usize, cancelled: bool) -> Self {
        Self::Finished {
            processed,
            total,
            cancelled,
        }
    }

    /// Share of the batch completed, 0 to 100.
    pub fn percent(&self) -> u8 {
        let (done, total) = match self {
            Self::Stage { index, total, .. } => (*index, *total),
            Self::FileDone { index, total, .. } => (index + 1, *total),
            Self::Finished { processed, total, .. } => (*processed, *total),
        };
        if total == 0 {
            return 100;
        }
        (done.min(total) * 100 / total) as u8
    }
}
