use once_cell::sync::Lazy;
use regex::Regex;

// Snowflakes currently run 17 to 19 digits. Mentions like `<#id>` match too.
static CHANNEL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{17,19}").unwrap());

/// Pull every channel-id-looking token out of free-form user input, keeping
/// first-seen order and dropping repeats.
///
/// Whether the ids point at real text channels is for the caller to check.
/// Zero is never a valid snowflake and is dropped.
pub fn parse_channel_ids(input: &str) -> Vec<u64> {
    let mut ids: Vec<u64> = Vec::new();
    for found in CHANNEL_ID.find_iter(input) {
        if let Ok(id) = found.as_str().parse::<u64>() {
            if id != 0 && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
