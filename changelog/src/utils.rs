use once_cell::sync::Lazy;
use regex::Regex;

pub static VERSION_LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Version:\s*(\S.*?)\s*$").expect("Failed to compile version line regex")
});

pub static DATE_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Date:\s*(\S.*?)\s*$").expect("Failed to compile date line regex"));

pub static CATEGORY_HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]{1,3}([A-Za-z][A-Za-z0-9 _-]*?):\s*$")
        .expect("Failed to compile category regex")
});

pub static BULLET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-(?:\s*([^-\s].*?))?\s*$").expect("Failed to compile bullet regex")
});

pub static BLANK_BULLET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*$").expect("Failed to compile blank bullet regex"));

/// Strips the line terminator (`\n` or `\r\n`) from a raw line
pub fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l))
}

/// Returns the terminator a raw line ends with
pub fn terminator_of(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
