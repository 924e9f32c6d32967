use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Normalize scraped text to NFC and collapse every whitespace run
/// (including newlines and non-breaking spaces) to a single space.
///
/// Headings on the listing pages are often split across lines in the
/// markup; accented titles ("Irmãos", "Mistério") come in either form.
pub fn clean_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    whitespace_run().replace_all(&nfc, " ").trim().to_string()
}
