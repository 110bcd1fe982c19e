//! Finding the main machine of a P program.
//!
//! Project generation needs the name of the machine the runtime starts
//! first. A structural pattern over the raw source stands in for a real
//! parser; [`EntryPointExtractor`] is the seam where one can be swapped in.

use std::sync::OnceLock;

use regex::Regex;

/// The designated entry unit of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub unit_name: String,
}

/// Extracts the entry unit from program source text.
pub trait EntryPointExtractor {
    /// Return the main unit, or `None` if the source declares none.
    fn extract_main_unit(&self, source: &str) -> Option<EntryPointInfo>;
}

/// Matches `main [modifiers...] machine <Name>`.
///
/// Keywords are case-sensitive; any whitespace (including newlines) may
/// separate the tokens. Only the first declaration counts: later ones,
/// including those inside comments or strings, are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainMachinePattern;

impl MainMachinePattern {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static MAIN_MACHINE_REGEX: OnceLock<Regex> = OnceLock::new();
        MAIN_MACHINE_REGEX.get_or_init(|| {
            Regex::new(r"\bmain\s+(?:\w+\s+)*?machine\s+(\w+)").expect("Invalid main machine regex")
        })
    }
}

impl EntryPointExtractor for MainMachinePattern {
    fn extract_main_unit(&self, source: &str) -> Option<EntryPointInfo> {
        let captures = Self::regex().captures(source)?;
        let name = captures.get(1)?.as_str();

        Some(EntryPointInfo {
            unit_name: name.to_string(),
        })
    }
}
