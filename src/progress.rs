//! Progress-callback trait for batch and per-segment events.
//!
//! Inject an [`Arc<dyn SplitProgressCallback>`] via
//! [`crate::config::SplitConfigBuilder::progress_callback`] to receive
//! events as the batch driver works through files and segments.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log file, or a database record
//! without the library knowing anything about how the host application
//! communicates. Processing is strictly sequential, so implementations never
//! see concurrent calls, but the trait is still `Send + Sync` so callbacks can
//! be shared across threads by the host application.

use std::sync::Arc;

/// Called by the batch driver as it processes each file and segment.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in document order, one at a time.
pub trait SplitProgressCallback: Send + Sync {
    /// Called once before any file is processed.
    ///
    /// # Arguments
    /// * `total_files` — number of PDF files that will be processed
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when a file is opened, before its segments are planned.
    ///
    /// # Arguments
    /// * `file_num`    — 1-indexed file number
    /// * `total_files` — total files in the batch
    /// * `name`        — file name (no directory components)
    fn on_file_start(&self, file_num: usize, total_files: usize, name: &str) {
        let _ = (file_num, total_files, name);
    }

    /// Called once per file after segment planning, before any writing.
    fn on_segments_planned(&self, file_num: usize, segment_count: usize) {
        let _ = (file_num, segment_count);
    }

    /// Called when a segment's PDF and Markdown have both been written.
    ///
    /// # Arguments
    /// * `segment_num`    — 1-indexed segment number within the file
    /// * `total_segments` — segments planned for this file
    /// * `title`          — the segment's (unsanitised) title
    fn on_segment_complete(&self, segment_num: usize, total_segments: usize, title: &str) {
        let _ = (segment_num, total_segments, title);
    }

    /// Called when a segment fails; the remaining segments still proceed.
    fn on_segment_error(&self, segment_num: usize, total_segments: usize, error: &str) {
        let _ = (segment_num, total_segments, error);
    }

    /// Called when a file's segments have all been attempted.
    ///
    /// # Arguments
    /// * `segments_ok` — segments that produced both output files
    fn on_file_complete(&self, file_num: usize, total_files: usize, segments_ok: usize) {
        let _ = (file_num, total_files, segments_ok);
    }

    /// Called when a whole file fails (corrupt PDF, unwritable output dir).
    fn on_file_error(&self, file_num: usize, total_files: usize, error: &str) {
        let _ = (file_num, total_files, error);
    }

    /// Called once after all files have been attempted.
    fn on_run_complete(&self, total_files: usize, files_ok: usize) {
        let _ = (total_files, files_ok);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl SplitProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SplitConfig`].
pub type ProgressCallback = Arc<dyn SplitProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        files: AtomicUsize,
        segments: AtomicUsize,
        errors: AtomicUsize,
        final_ok: AtomicUsize,
    }

    impl SplitProgressCallback for TrackingCallback {
        fn on_file_start(&self, _n: usize, _total: usize, _name: &str) {
            self.files.fetch_add(1, Ordering::SeqCst);
        }

        fn on_segment_complete(&self, _n: usize, _total: usize, _title: &str) {
            self.segments.fetch_add(1, Ordering::SeqCst);
        }

        fn on_segment_error(&self, _n: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _total: usize, files_ok: usize) {
            self.final_ok.store(files_ok, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(2);
        cb.on_file_start(1, 2, "a.pdf");
        cb.on_segments_planned(1, 3);
        cb.on_segment_complete(1, 3, "Intro");
        cb.on_segment_error(2, 3, "boom");
        cb.on_file_complete(1, 2, 2);
        cb.on_file_error(2, 2, "corrupt");
        cb.on_run_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            files: AtomicUsize::new(0),
            segments: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            final_ok: AtomicUsize::new(0),
        };

        tracker.on_run_start(1);
        tracker.on_file_start(1, 1, "book.pdf");
        tracker.on_segments_planned(1, 2);
        tracker.on_segment_complete(1, 2, "Chapter 1");
        tracker.on_segment_error(2, 2, "extraction failed");
        tracker.on_file_complete(1, 1, 1);
        tracker.on_run_complete(1, 1);

        assert_eq!(tracker.files.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.segments.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.final_ok.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn SplitProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
        cb.on_file_start(1, 10, "x.pdf");
        cb.on_segment_complete(1, 4, "Preface");
    }
}
