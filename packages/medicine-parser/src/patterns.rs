//! Deterministic pattern extraction.
//!
//! All patterns are compiled once when the engine is built and shared
//! read-only afterwards. Matching is leftmost-first: the first strength or
//! formulation found in the string wins.

use regex::Regex;

/// Ratio form (`5 mg/ml`, `10mg/5ml`) or bare form (`325mg`).
const STRENGTH_PATTERN: &str = r"(?i)(\d+(?:\.\d+)?)\s*(?:micrograms|mcg|mg|g|ml|%)/(?:\d+(?:\.\d+)?)?\s*(?:ml|l)?|(\d+(?:\.\d+)?)\s*(?:micrograms|mcg|mg|g|ml)";

const FORMULATION_PATTERN: &str = r"(?i)(tablets?|capsules?|(?:pre-filled\s+)?syringes?|(?:transdermal\s+)?patch(?:es)?|oral\s+solution|suspension|cream|ointment|injection|powder|liquid|ampoules?|bottles?)";

const DURATION_PATTERN: &str = r"(?i)(\d+(?:\.\d+)?)\s*(?:days|day|hours|hour|hrs|hr)";

/// Fields recovered from a raw name by patterns alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub name: String,
    pub strength: String,
    pub formulation: String,
}

/// Compiled extraction and cleanup patterns.
#[derive(Debug, Clone)]
pub struct MedicinePatterns {
    strength: Regex,
    formulation: Regex,
    duration: Regex,
    generic_prefix: Regex,
    sterile: Regex,
    whitespace: Regex,
}

impl Default for MedicinePatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicinePatterns {
    pub fn new() -> Self {
        Self {
            strength: compile(STRENGTH_PATTERN),
            formulation: compile(FORMULATION_PATTERN),
            duration: compile(DURATION_PATTERN),
            generic_prefix: compile(r"^Generic\s+"),
            sterile: compile(r"\s+sterile\s+"),
            whitespace: compile(r"\s+"),
        }
    }

    /// First strength token, verbatim from the input.
    pub fn strength<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.strength.find(raw).map(|m| m.as_str())
    }

    /// First formulation word or phrase, verbatim from the input.
    pub fn formulation<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.formulation.find(raw).map(|m| m.as_str())
    }

    /// Duration written into the name itself, e.g. `72 hour` or `7 days`.
    pub fn explicit_duration<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.duration.find(raw).map(|m| m.as_str())
    }

    /// Derive the drug name by removing the matched tokens and tidying up.
    ///
    /// Every literal occurrence of the strength is removed, then every
    /// occurrence of the formulation. Overlapping matches can leave
    /// fragments; the order is fixed so the output is reproducible.
    pub fn clean_name(&self, raw: &str, strength: &str, formulation: &str) -> String {
        let mut name = raw.to_string();
        if !strength.is_empty() {
            name = name.replace(strength, "");
        }
        if !formulation.is_empty() {
            name = name.replace(formulation, "");
        }

        let name = self.generic_prefix.replace(&name, "");
        let name = self.sterile.replace_all(&name, " ");
        let name = self.whitespace.replace_all(&name, " ");

        name.trim()
            .trim_end_matches([' ', '-', ',', '.'])
            .to_string()
    }

    /// Full pattern-only extraction.
    pub fn extract(&self, raw: &str) -> PatternMatch {
        let strength = self.strength(raw).unwrap_or_default();
        let formulation = self.formulation(raw).unwrap_or_default();

        PatternMatch {
            name: self.clean_name(raw, strength, formulation),
            strength: strength.to_string(),
            formulation: formulation.to_string(),
        }
    }
}

/// Whether the raw name describes a patch (case-insensitive).
pub fn is_patch(raw: &str) -> bool {
    raw.to_lowercase().contains("patch")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}
