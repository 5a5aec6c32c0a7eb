//! Journal template detection.
//!
//! Scores LaTeX source against the publisher pattern sets in [`patterns`] and
//! picks the best-matching family. Detection is plain substring search over the
//! raw text, so markers inside comments count too.
//!
//! Ties are resolved by declaration order of [`JournalFamily::PRIORITY`]:
//! the first family reaching the maximum score wins, regardless of which kind
//! of evidence produced it.

pub mod patterns;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use patterns::{JournalPatternSet, PATTERN_SETS};
use patterns::{
    SPRINGER_BIB_STYLES, SPRINGER_DEFAULT_BIB_STYLE, TMI_LOGO_FILE, TMI_LOGO_FRAGMENT,
};

/// Number of leading lines inspected by [`classify`].
pub const DEFAULT_LINE_LIMIT: usize = 150;

pub const UNKNOWN_CLASS: &str = "unknown";

const INCLUDE_GRAPHICS: &str = r"\includegraphics";

static RE_DOCUMENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\documentclass\s*(?:\[([^\]]*)\])?\s*\{([^}]*)\}")
        .expect("valid documentclass regex")
});
static RE_BIBLIOGRAPHY_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\bibliographystyle\s*\{([^}]*)\}").expect("valid bibliographystyle regex")
});
static RE_LOGO_GRAPHIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\includegraphics\*?\s*(?:\[[^\]]*\])?\s*\{([^}]*(?i:logo)[^}]*)\}")
        .expect("valid logo regex")
});

/// Publisher template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalFamily {
    Elsevier,
    SpringerNature,
    Ieee,
    Acm,
    Generic,
}

impl JournalFamily {
    /// Publisher families in tie-break order. `Generic` is the fallback and never scored.
    pub const PRIORITY: [JournalFamily; 4] = [
        JournalFamily::Elsevier,
        JournalFamily::SpringerNature,
        JournalFamily::Ieee,
        JournalFamily::Acm,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            JournalFamily::Elsevier => "Elsevier",
            JournalFamily::SpringerNature => "Springer Nature",
            JournalFamily::Ieee => "IEEE",
            JournalFamily::Acm => "ACM",
            JournalFamily::Generic => "Generic",
        }
    }
}

impl fmt::Display for JournalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Score accumulated by one publisher family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyScore {
    pub family: JournalFamily,
    pub score: u32,
}

/// Outcome of a classification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub journal_family: JournalFamily,
    /// Canonical class label of the matched family, or `"unknown"`.
    pub document_class: String,
    /// Raw `\documentclass` argument as written, if a declaration was found.
    pub declared_class: Option<String>,
    pub confidence_score: u32,
    pub matched_signals: Vec<String>,
    pub class_options: Vec<String>,
    pub bibliography_style: Option<String>,
    pub requires_logo: bool,
    pub logo_file_name: Option<String>,
    /// Per-family scores in priority order.
    pub family_scores: Vec<FamilyScore>,
}

impl DetectionResult {
    pub fn is_generic(&self) -> bool {
        self.journal_family == JournalFamily::Generic
    }
}

/// Options for [`classify_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Inspect only this many leading lines. `None` scans the whole text.
    pub line_limit: Option<usize>,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            line_limit: Some(DEFAULT_LINE_LIMIT),
        }
    }
}

/// Classify LaTeX source into a journal family using the leading 150 lines.
pub fn classify(text: &str) -> DetectionResult {
    classify_with(text, &ClassifierOptions::default())
}

/// Classify LaTeX source with explicit options.
///
/// Never fails: text without any recognized signal yields the `Generic` family,
/// confidence 0 and document class `"unknown"`.
pub fn classify_with(text: &str, options: &ClassifierOptions) -> DetectionResult {
    let head = match options.line_limit {
        Some(limit) => leading_lines(text, limit),
        None => text,
    };

    let (declared_class, class_options) = match parse_document_class(head) {
        Some((name, options)) => (Some(name), options),
        None => (None, Vec::new()),
    };
    let class_name = declared_class.as_deref();

    let scored: Vec<(FamilyScore, Vec<String>)> = PATTERN_SETS
        .iter()
        .map(|set| score_family(set, class_name, head))
        .collect();

    // Every matching family overwrites the class label; the last one in order wins.
    let class_family = class_name.and_then(|name| {
        PATTERN_SETS
            .iter()
            .filter(|set| set.accepts_class(name))
            .last()
    });

    let max_score = scored.iter().map(|(s, _)| s.score).max().unwrap_or(0);
    let journal_family = if max_score == 0 {
        JournalFamily::Generic
    } else {
        scored
            .iter()
            .find(|(s, _)| s.score == max_score)
            .map(|(s, _)| s.family)
            .unwrap_or(JournalFamily::Generic)
    };

    let has_graphics = head.contains(INCLUDE_GRAPHICS);
    let requires_logo = match journal_family {
        JournalFamily::Ieee => {
            has_graphics && (head.contains("LOGO-") || head.contains("logo"))
        }
        JournalFamily::SpringerNature => has_graphics,
        _ => false,
    };
    let logo_file_name = if requires_logo {
        logo_file_name(head)
    } else {
        None
    };

    let bibliography_style = explicit_bibliography_style(text)
        .or_else(|| class_family.and_then(|set| inferred_bibliography_style(set.family, head)));

    let (family_scores, signals): (Vec<_>, Vec<_>) = scored.into_iter().unzip();

    DetectionResult {
        journal_family,
        document_class: class_family
            .map(|set| set.canonical_class)
            .unwrap_or(UNKNOWN_CLASS)
            .to_string(),
        declared_class: class_name.map(str::to_string),
        confidence_score: max_score,
        matched_signals: signals.into_iter().flatten().collect(),
        class_options,
        bibliography_style,
        requires_logo,
        logo_file_name,
        family_scores,
    }
}

fn score_family(
    set: &JournalPatternSet,
    class_name: Option<&str>,
    head: &str,
) -> (FamilyScore, Vec<String>) {
    let class_signal = class_name
        .filter(|name| set.accepts_class(name))
        .map(|name| {
            (
                set.document_class_weight,
                format!(
                    "{}: document class {name} (+{})",
                    set.family, set.document_class_weight
                ),
            )
        });

    let marker_signals = set
        .command_weights
        .iter()
        .filter(|(marker, _)| head.contains(marker))
        .map(|(marker, weight)| (*weight, format!("{}: {marker} (+{weight})", set.family)));

    let (score, signals) = class_signal.into_iter().chain(marker_signals).fold(
        (0u32, Vec::new()),
        |(score, mut signals), (weight, signal)| {
            signals.push(signal);
            (score + weight, signals)
        },
    );

    (
        FamilyScore {
            family: set.family,
            score,
        },
        signals,
    )
}

/// Extract the class name and trimmed option list of the first `\documentclass`.
fn parse_document_class(text: &str) -> Option<(String, Vec<String>)> {
    let caps = RE_DOCUMENT_CLASS.captures(text)?;
    let name = caps.get(2)?.as_str().trim().to_string();
    let options = caps
        .get(1)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some((name, options))
}

fn explicit_bibliography_style(text: &str) -> Option<String> {
    RE_BIBLIOGRAPHY_STYLE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|style| !style.is_empty())
        .map(str::to_string)
}

fn inferred_bibliography_style(family: JournalFamily, head: &str) -> Option<String> {
    let style = match family {
        JournalFamily::Elsevier => "elsarticle-num",
        JournalFamily::Acm => "ACM-Reference-Format",
        JournalFamily::Ieee => "IEEEtran",
        JournalFamily::SpringerNature => SPRINGER_BIB_STYLES
            .iter()
            .find(|style| head.contains(*style))
            .copied()
            .unwrap_or(SPRINGER_DEFAULT_BIB_STYLE),
        JournalFamily::Generic => return None,
    };
    Some(style.to_string())
}

fn logo_file_name(head: &str) -> Option<String> {
    if head.contains(TMI_LOGO_FRAGMENT) {
        return Some(TMI_LOGO_FILE.to_string());
    }
    RE_LOGO_GRAPHIC
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Slice of `text` covering at most `limit` lines.
fn leading_lines(text: &str, limit: usize) -> &str {
    if limit == 0 {
        return "";
    }
    match text.match_indices('\n').nth(limit - 1) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
