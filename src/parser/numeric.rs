/// Parse a locale-formatted count such as `1,234` or `1\u{a0}234`.
///
/// Non-breaking spaces and comma thousands separators are removed before a
/// base-10 parse. Empty or non-numeric text yields `None` ("no data"), never an error.
pub fn parse_int(text: &str) -> Option<u64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '\u{a0}' && *c != ',')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u64>().ok()
}
