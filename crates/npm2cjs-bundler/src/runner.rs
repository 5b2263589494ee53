//! Build Runner: drives Rolldown through one build.
//!
//! Lifecycle per invocation:
//!
//! ```text
//! Idle -> GraphBuilt -> Rendered -> Persisted -> Released
//!              \-> Failed -> Released
//! Idle -> Failed
//! ```
//!
//! `GraphBuilt` is reached once Rolldown accepted the options and owns a
//! bundler instance. From there on `close()` runs exactly once, whatever
//! happens while rendering or persisting. If the bundler could not be
//! constructed there is nothing to release.

use rolldown::{Bundler, BundlerBuilder, BundleOutput};
use rolldown_common::Output;
use tracing::{debug, error};

use crate::error::{CompileError, Error};
use crate::options::{BuildInputConfig, BuildOutputConfig};
use crate::writer::write_output_file;

/// Where a build currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    GraphBuilt,
    Rendered,
    Persisted,
    Released,
    Failed,
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BuildPhase::Idle => "idle",
            BuildPhase::GraphBuilt => "graph-built",
            BuildPhase::Rendered => "rendered",
            BuildPhase::Persisted => "persisted",
            BuildPhase::Released => "released",
            BuildPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks phase transitions of one build and logs them.
#[derive(Debug)]
struct PhaseTracker {
    phase: BuildPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: BuildPhase::Idle,
        }
    }

    fn advance(&mut self, next: BuildPhase) {
        debug!(from = %self.phase, to = %next, "build phase");
        self.phase = next;
    }
}

/// Run one build: construct, render, persist, release.
///
/// Every failure is logged with its concrete cause and returned as
/// [`CompileError::build_failed`]. No retries are attempted.
pub async fn build(
    input: &BuildInputConfig,
    output: &BuildOutputConfig,
) -> Result<(), CompileError> {
    let mut phases = PhaseTracker::new();
    debug!(
        entry = %input.entry.display(),
        file = %output.file.display(),
        stages = ?input.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
        "starting build"
    );

    let options = input.to_bundler_options(output);
    let mut bundler = match BundlerBuilder::default().with_options(options).build() {
        Ok(bundler) => bundler,
        Err(e) => {
            phases.advance(BuildPhase::Failed);
            return Err(wrap_failure(Error::from_rolldown_batch(&e)));
        }
    };
    phases.advance(BuildPhase::GraphBuilt);

    let outcome = render_and_persist(&mut bundler, output, &mut phases).await;
    if outcome.is_err() {
        phases.advance(BuildPhase::Failed);
    }

    let released = bundler
        .close()
        .await
        .map_err(|e| Error::from_rolldown_batch(&e));
    phases.advance(BuildPhase::Released);

    settle(outcome, released)
}

/// Combine the render/persist outcome with the release outcome.
///
/// The render or persist failure is the cause and is logged first; a release
/// failure on top of it is only logged.
fn settle(
    outcome: Result<(), Error>,
    released: Result<(), Error>,
) -> Result<(), CompileError> {
    match (outcome, released) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(e), released) => {
            let failure = wrap_failure(e);
            if let Err(close_err) = released {
                error!(error = %close_err, "failed to release bundler after a failed build");
            }
            Err(failure)
        }
        (Ok(()), Err(e)) => Err(wrap_failure(e)),
    }
}

async fn render_and_persist(
    bundler: &mut Bundler,
    output: &BuildOutputConfig,
    phases: &mut PhaseTracker,
) -> Result<(), Error> {
    let rendered = bundler
        .generate()
        .await
        .map_err(|e| Error::from_rolldown_batch(&e))?;
    inspect(&rendered);
    phases.advance(BuildPhase::Rendered);

    write_output_file(&rendered, &output.file)?;
    phases.advance(BuildPhase::Persisted);
    Ok(())
}

/// Log what was rendered. Diagnostic only; the output is not modified.
fn inspect(rendered: &BundleOutput) {
    for item in &rendered.assets {
        match item {
            Output::Chunk(chunk) => debug!(
                filename = %chunk.filename,
                bytes = chunk.code.len(),
                is_entry = chunk.is_entry,
                "rendered chunk"
            ),
            Output::Asset(asset) => debug!(
                filename = %asset.filename,
                bytes = asset.source.as_bytes().len(),
                "rendered asset"
            ),
        }
    }
    for warning in &rendered.warnings {
        debug!(warning = ?warning, "bundler warning");
    }
}

/// Log the concrete failure and replace it with the uniform domain error.
fn wrap_failure(err: Error) -> CompileError {
    match &err {
        Error::Bundler(diagnostics) => {
            for diag in diagnostics {
                error!(
                    kind = %diag.kind,
                    file = diag.file.as_deref().unwrap_or("-"),
                    "{}",
                    diag.message
                );
            }
        }
        other => error!(error = %other, "build failed"),
    }
    CompileError::build_failed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log lines for inspection.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.text())
    }

    #[test]
    fn test_phase_tracker_starts_idle() {
        let mut tracker = PhaseTracker::new();
        assert_eq!(tracker.phase, BuildPhase::Idle);
        tracker.advance(BuildPhase::GraphBuilt);
        assert_eq!(tracker.phase, BuildPhase::GraphBuilt);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(BuildPhase::GraphBuilt.to_string(), "graph-built");
        assert_eq!(BuildPhase::Released.to_string(), "released");
    }

    #[test]
    fn test_wrap_failure_is_uniform() {
        let io = Error::Io(std::io::Error::other("disk full"));
        let chunks = Error::UnexpectedChunks { chunks: 3 };
        assert_eq!(wrap_failure(io), CompileError::build_failed());
        assert_eq!(wrap_failure(chunks), CompileError::build_failed());
    }

    #[test]
    fn test_settle_success() {
        assert_eq!(settle(Ok(()), Ok(())), Ok(()));
    }

    #[test]
    fn test_release_failure_after_success_fails_build() {
        let released = Err(Error::Io(std::io::Error::other("close failed")));
        assert_eq!(settle(Ok(()), released), Err(CompileError::build_failed()));
    }

    #[test]
    fn test_render_cause_logged_before_release_failure() {
        let (result, logs) = with_captured_logs(|| {
            settle(
                Err(Error::UnexpectedChunks { chunks: 2 }),
                Err(Error::Io(std::io::Error::other("close failed"))),
            )
        });

        assert_eq!(result, Err(CompileError::build_failed()));
        let cause = logs
            .find("Expected a single entry chunk")
            .expect("render cause should be logged");
        let release = logs
            .find("failed to release bundler")
            .expect("release failure should be logged");
        assert!(cause < release, "cause must come first:\n{logs}");
    }
}
