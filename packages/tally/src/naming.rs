//! Agent-name normalization.
//!
//! Agents identify themselves with free-text names ("Roo Code", "GitHub
//! Copilot", "claude/code"). Before an agent name becomes a key in the
//! store it is reduced to a canonical kebab-case form so that spelling
//! variants of the same agent share one usage record.

use std::sync::LazyLock;

use regex::Regex;

/// Reduce an agent name to its canonical kebab-case key.
///
/// Lowercases the input, turns runs of whitespace, underscores, and
/// forward slashes into single hyphens, strips everything outside
/// `[a-z0-9.-]`, collapses hyphen runs, and trims hyphens from both ends.
/// Idempotent: normalizing an already-normalized name is a no-op.
pub fn normalize(raw: &str) -> String {
    static SEPARATORS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[\s_/]+").expect("compile separator regex"));
    static DISALLOWED: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9.-]").expect("compile disallowed-char regex"));
    static HYPHEN_RUNS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"-{2,}").expect("compile hyphen-run regex"));

    let lowered = raw.to_lowercase();
    let hyphenated = SEPARATORS.replace_all(&lowered, "-");
    let stripped = DISALLOWED.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUNS.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}
