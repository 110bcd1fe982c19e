//! Normalizing tool output and classifying native build results.

use std::io::{self, Write};

/// Marker the native build tool prints on success.
pub const BUILD_SUCCEEDED_MARKER: &str = "Build succeeded.";

/// Marker the native build tool prints on failure.
pub const BUILD_FAILED_MARKER: &str = "Build FAILED.";

/// What the native build output says about the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    Failed,
    /// Neither marker was found.
    Inconclusive,
}

/// Decode captured bytes, replacing invalid UTF-8 sequences.
pub fn decode(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Split output into lines, accepting `\r\n`, `\n` and lone `\r` terminators.
///
/// A trailing terminator does not produce an empty final line.
pub fn normalize(raw: &str) -> Vec<String> {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    unified.lines().map(str::to_string).collect()
}

/// Inspect normalized native build output for the success and failure markers.
///
/// The success marker wins if both appear.
pub fn classify_build_output(lines: &[String]) -> BuildOutcome {
    if lines.iter().any(|line| line.contains(BUILD_SUCCEEDED_MARKER)) {
        BuildOutcome::Succeeded
    } else if lines.iter().any(|line| line.contains(BUILD_FAILED_MARKER)) {
        BuildOutcome::Failed
    } else {
        BuildOutcome::Inconclusive
    }
}

/// True iff the output carries the build success marker.
///
/// Output with no marker at all counts as a failure.
pub fn classify_success(lines: &[String]) -> bool {
    classify_build_output(lines) == BuildOutcome::Succeeded
}

/// Write every diagnostic line to `out`.
pub fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
