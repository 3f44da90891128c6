// variant-forge-app/src/progress.rs

use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use svc_core::{CollectionError, ProgressCallback, ProgressEvent, RunSummary};

/// Trait for reporting the progress of a collection run.
///
/// Implementors can display progress information in various ways
/// (e.g., console output, GUI updates).
pub trait ProgressReporter: Send {
    /// Called with every progress event the engine emits.
    fn report(&mut self, event: &ProgressEvent) -> Result<()>;

    /// Called when the run completes successfully.
    fn finish(&mut self, summary: &RunSummary) -> Result<()>;

    /// Called when the run fails with an error.
    fn fail(&mut self, error: &CollectionError) -> Result<()>;
}

/// Logs progress through the `log` facade, at most once per interval.
#[derive(Debug)]
pub struct ConsoleProgressReporter {
    interval: Option<Duration>,
    last_report: Option<Instant>,
}

impl ConsoleProgressReporter {
    /// Without an interval every update is logged.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last_report: None,
        }
    }

    fn due(&self) -> bool {
        match (self.interval, self.last_report) {
            (Some(interval), Some(last)) => last.elapsed() >= interval,
            _ => true,
        }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, event: &ProgressEvent) -> Result<()> {
        match event {
            ProgressEvent::Update(info) => {
                if self.due() {
                    log::info!(
                        "[{}] {}/{} ({:.1}%) {}",
                        info.stage,
                        info.current + 1,
                        info.total,
                        info.fraction() * 100.0,
                        info.label
                    );
                    self.last_report = Some(Instant::now());
                }
            }
            ProgressEvent::Cleared(stage) => {
                log::debug!("[{stage}] done");
                self.last_report = None;
            }
        }
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        log::info!(
            "Collection finished: {} materials ({} filtered), {} variants ({} filtered), {} emitted",
            summary.materials_collected,
            summary.materials_filtered,
            summary.variants_collected,
            summary.variants_filtered,
            summary.variants_emitted
        );
        Ok(())
    }

    fn fail(&mut self, error: &CollectionError) -> Result<()> {
        log::error!("Collection failed: {error}");
        Ok(())
    }
}

/// Adapts a shared reporter into the engine's progress callback.
pub fn callback_for<R: ProgressReporter + 'static>(reporter: Arc<Mutex<R>>) -> ProgressCallback {
    Arc::new(move |event: &ProgressEvent| {
        let Ok(mut reporter) = reporter.lock() else {
            return;
        };
        if let Err(e) = reporter.report(event) {
            log::warn!("Progress reporting failed: {e}");
        }
    })
}
