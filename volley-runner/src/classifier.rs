//! Heuristic classification of load-generator output
//!
//! The generator is unreliable about signaling errors through its exit
//! code: a malformed invocation often prints a usage or summary text to
//! stdout and exits 0. Until a good block has been seen, each chunk is
//! screened against known error markers and a minimum length; screened-out
//! chunks are dropped and mark the whole run invalid. The thresholds and
//! markers are load-bearing for compatibility and must not be tuned.

/// Marker printed at the top of the generator's human-readable report
const SUMMARY_MARKER: &str = "Summary:";

/// Marker printed at the top of the generator's usage text
const OPTIONS_MARKER: &str = "Options:";

/// Genuine CSV output starts with a header plus at least one row; anything
/// shorter is an error message
const MIN_BLOCK_CHARS: usize = 100;

/// Screens stdout chunks and accumulates a verdict for the run
#[derive(Debug, Default)]
pub struct OutputClassifier {
    good_blocks: usize,
    invalid: bool,
}

impl OutputClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a chunk belongs in the output buffer.
    ///
    /// Returns `false` for chunks that look like an error or usage message;
    /// such chunks also flag the run invalid. Once any chunk has been
    /// admitted, all later chunks pass unscreened.
    pub fn admit(&mut self, chunk: &str) -> bool {
        if self.good_blocks == 0 && looks_like_error_text(chunk) {
            self.invalid = true;
            return false;
        }

        self.good_blocks += 1;
        true
    }

    /// Whether any screened chunk looked like an error or usage message
    pub fn invalid(&self) -> bool {
        self.invalid
    }
}

fn looks_like_error_text(chunk: &str) -> bool {
    chunk.contains(SUMMARY_MARKER) || chunk.contains(OPTIONS_MARKER) || chunk.chars().count() < MIN_BLOCK_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_block() -> String {
        let mut block = String::from("response-time,DNS+dialup,DNS,Request-write,Response-delay,Response-read\n");
        for i in 0..5 {
            block.push_str(&format!("0.{}234,0.0001,0.0000,0.0000,0.0001,0.0000\n", i));
        }
        assert!(block.chars().count() >= 100);
        block
    }

    #[test]
    fn test_admits_csv_block() {
        let mut classifier = OutputClassifier::new();
        assert!(classifier.admit(&csv_block()));
        assert!(!classifier.invalid());
    }

    #[test]
    fn test_rejects_summary_text() {
        let mut classifier = OutputClassifier::new();
        let report = format!("{}{}", "Summary:\n  Total:\t0.5173 secs\n", "x".repeat(120));
        assert!(!classifier.admit(&report));
        assert!(classifier.invalid());
    }

    #[test]
    fn test_rejects_usage_text() {
        let mut classifier = OutputClassifier::new();
        let usage = format!("Usage: hey [options...] <url>\nOptions:\n{}", "x".repeat(120));
        assert!(!classifier.admit(&usage));
        assert!(classifier.invalid());
    }

    #[test]
    fn test_rejects_short_chunk() {
        let mut classifier = OutputClassifier::new();
        assert!(!classifier.admit("flag provided but not defined"));
        assert!(classifier.invalid());
    }

    #[test]
    fn test_boundary_length() {
        let mut classifier = OutputClassifier::new();
        assert!(!classifier.admit(&"a".repeat(99)));

        let mut classifier = OutputClassifier::new();
        assert!(classifier.admit(&"a".repeat(100)));
        assert!(!classifier.invalid());
    }

    #[test]
    fn test_later_chunks_pass_unscreened() {
        let mut classifier = OutputClassifier::new();
        assert!(classifier.admit(&csv_block()));
        // A short tail chunk after a good block is still data
        assert!(classifier.admit("0.0405,0.0001,0.0000\n"));
        assert!(!classifier.invalid());
    }

    #[test]
    fn test_invalid_flag_is_sticky() {
        let mut classifier = OutputClassifier::new();
        assert!(!classifier.admit("short"));
        // The next chunk is screened again and may be admitted, but the
        // run stays flagged
        assert!(classifier.admit(&csv_block()));
        assert!(classifier.invalid());
    }
}
