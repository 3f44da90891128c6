//! Coarse progress notifications emitted while the engine runs.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The engine step a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stage {
    CollectMaterials,
    CollectVariants,
    ManualCombinations,
    Emit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CollectMaterials => "Material Collection",
            Self::CollectVariants => "Material Variant Conversion",
            Self::ManualCombinations => "Manual Keywords",
            Self::Emit => "Emit",
        };
        f.write_str(label)
    }
}

/// A single progress update.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressInfo {
    /// Which step is running.
    pub stage: Stage,
    /// Index of the item being processed.
    pub current: usize,
    /// Number of items in this step.
    pub total: usize,
    /// Human-readable name of the item being processed.
    pub label: String,
}

impl ProgressInfo {
    /// Completed share of the step in `0.0..=1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.current as f32 / self.total as f32).clamp(0.0, 1.0)
        }
    }
}

/// What the progress callback is told.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Update(ProgressInfo),
    /// The step finished or aborted; any indicator for it should be removed.
    Cleared(Stage),
}

/// Alias for the progress callback function type.
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Reports progress for one step and always sends `Cleared` when dropped,
/// including when the step bails out early with an error.
pub(crate) struct ProgressScope {
    stage: Stage,
    callback: Option<ProgressCallback>,
}

impl ProgressScope {
    pub(crate) fn new(stage: Stage, callback: Option<ProgressCallback>) -> Self {
        Self { stage, callback }
    }

    pub(crate) fn update(&self, current: usize, total: usize, label: impl Into<String>) {
        if let Some(callback) = &self.callback {
            callback(&ProgressEvent::Update(ProgressInfo {
                stage: self.stage,
                current,
                total,
                label: label.into(),
            }));
        }
    }
}

impl Drop for ProgressScope {
    fn drop(&mut self) {
        if let Some(callback) = &self.callback {
            callback(&ProgressEvent::Cleared(self.stage));
        }
    }
}
