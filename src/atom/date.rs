//! Parsing of Atom timestamp strings into epoch milliseconds.

use chrono::DateTime;

/// The one timestamp shape Atom feeds in the wild use for `published`:
/// four-digit year, literal `T`, numeric offset with no colon.
const ATOM_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Sink for non-fatal date-parse failures.
///
/// The parser absorbs failures into `0` rather than propagating them, but the
/// failure itself is still worth observing. Accepting the sink at
/// construction keeps reporting out of any global logger.
pub trait DateDiagnostics {
    fn date_parse_failed(&self, raw: &str, error: &chrono::ParseError);
}

/// Default sink: a structured warning log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DateDiagnostics for TracingDiagnostics {
    fn date_parse_failed(&self, raw: &str, error: &chrono::ParseError) {
        tracing::warn!(raw, %error, "unparseable atom date, falling back to 0");
    }
}

/// Parses feed date strings, tolerant of malformed input.
///
/// The configured pattern is immutable; the parser itself is cheap, so build
/// one per task rather than sharing an instance across threads.
#[derive(Debug, Default, Clone)]
pub struct AtomDateParser<D = TracingDiagnostics> {
    diagnostics: D,
}

impl AtomDateParser {
    pub fn new() -> Self {
        Self {
            diagnostics: TracingDiagnostics,
        }
    }
}

impl<D: DateDiagnostics> AtomDateParser<D> {
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    /// Returns epoch milliseconds; never fails.
    ///
    /// Absent, blank, and unparseable input all map to `0`, making them
    /// indistinguishable from an entry published at the epoch. That ambiguity
    /// is accepted; callers must not read "unknown" into a zero.
    pub fn parse(&self, raw: Option<&str>) -> i64 {
        let Some(raw) = raw else { return 0 };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return 0;
        }

        match try_parse(trimmed) {
            Ok(millis) => millis,
            Err(error) => {
                self.diagnostics.date_parse_failed(trimmed, &error);
                0
            }
        }
    }
}

fn try_parse(trimmed: &str) -> Result<i64, chrono::ParseError> {
    let parsed = DateTime::parse_from_str(trimmed, ATOM_DATE_FORMAT)?;
    Ok(parsed.timestamp() * 1000)
}
