//! Line normalisation: deterministic cleanup of extracted PDF text.
//!
//! PDF text extraction hands back whatever the content streams contain:
//! Windows-style `\r\n` line endings, byte-order marks, zero-width joiners
//! and raw control bytes. The last group is fatal for DOCX because XML 1.0
//! forbids most C0 control characters and Word refuses to open the file.
//!
//! Every rule here works *inside* a line. None of them merge, drop or
//! truncate lines, so the paragraph count of the output document always
//! equals the line count of the extracted text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Normalise raw extracted text and split it into lines.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Split on `\n`, keeping empty lines and a trailing empty segment
/// 3. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 4. Strip C0 control characters that XML 1.0 cannot carry
///
/// Empty input yields zero lines.
pub fn split_lines(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    normalise_line_endings(input)
        .split('\n')
        .map(clean_line)
        .collect()
}

/// Apply the per-line rules (3 and 4) to a single line.
pub fn clean_line(line: &str) -> String {
    let s = remove_invisible_chars(line);
    remove_control_chars(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Strip invisible Unicode ──────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 4: Strip XML-illegal characters ─────────────────────────────────────

// C0 controls and the U+FFFE/U+FFFF noncharacters are not XML `Char`s.
// Tab is legal in XML and meaningful in extracted text; keep it.
static RE_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x{FFFE}\x{FFFF}]").unwrap());

fn remove_control_chars(input: &str) -> String {
    RE_CONTROL.replace_all(input, "").to_string()
}
