use super::BatchError;
use std::fmt;
use std::num::NonZeroUsize;

/// Campaign updates sent per remote batch unless configured otherwise
pub const DEFAULT_BATCH_LIMIT: usize = 25;

/// Maximum number of items per batch, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchLimit(NonZeroUsize);

impl BatchLimit {
    pub fn new(limit: usize) -> Result<Self, BatchError> {
        NonZeroUsize::new(limit)
            .map(Self)
            .ok_or(BatchError::InvalidLimit(0))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BatchLimit {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_BATCH_LIMIT).unwrap_or(NonZeroUsize::MIN))
    }
}

/// Config files hand us signed integers, so negatives are rejected here too
impl TryFrom<i64> for BatchLimit {
    type Error = BatchError;

    fn try_from(limit: i64) -> Result<Self, Self::Error> {
        usize::try_from(limit)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(BatchError::InvalidLimit(limit))
    }
}

impl TryFrom<usize> for BatchLimit {
    type Error = BatchError;

    fn try_from(limit: usize) -> Result<Self, Self::Error> {
        Self::new(limit)
    }
}

impl fmt::Display for BatchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
