//! Season number detection from episode file names.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Season patterns, most specific first. Each captures the season number.
static SEASON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"s(\d{1,2})e\d",
        r"(?:^|\D)(\d{1,2})x\d{2,3}(?:\D|$)",
        r"season[ ._-]?(\d{1,2})",
        r"temporada[ ._-]?(\d{1,2})",
        r"temp[ ._-]?(\d{1,2})",
        r"\bs(\d{1,2})\b",
        r"\bt(\d{1,2})\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Detects the season a file belongs to.
///
/// Matching is case-insensitive. Season 0 counts as undetected.
pub fn detect_season(file_name: &str) -> Option<u32> {
    let name = file_name.to_lowercase();
    SEASON_PATTERNS.iter().find_map(|re| {
        re.captures(&name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|season| *season > 0)
    })
}
