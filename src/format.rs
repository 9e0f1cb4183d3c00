//! Text helpers for rendering API data.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"https?://[^\s<]+")
}

fn paragraph_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"\n\s*\n")
}

fn inline_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"\*\*(.*?)\*\*", "<strong>$1</strong>"),
            (r"\*(.*?)\*", "<em>$1</em>"),
            (r"_(.*?)_", "<u>$1</u>"),
            (r"~~(.*?)~~", "<del>$1</del>"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("Invalid regex pattern defined in code"),
                replacement,
            )
        })
        .collect()
    })
}

fn format_inline(text: &str) -> String {
    inline_rules()
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

/// Renders the lightweight markup used in reviews and comments.
///
/// Input is HTML-escaped first. Blank lines separate paragraphs; `**bold**`,
/// `*italic*`, `_underline_` and `~~strike~~` are recognised, and bare
/// http(s) URLs become links. URLs are never touched by the inline rules.
#[must_use]
pub fn markdown_to_html(text: &str) -> String {
    let escaped = html_escape::encode_text(text);

    paragraph_regex()
        .split(&escaped)
        .map(|paragraph| {
            let mut html = String::new();
            let mut last = 0;
            for link in url_regex().find_iter(paragraph) {
                html.push_str(&format_inline(&paragraph[last..link.start()]));
                html.push_str(&format!(
                    r#"<a href="{0}" target="_blank" rel="noopener noreferrer">{0}</a>"#,
                    link.as_str()
                ));
                last = link.end();
            }
            html.push_str(&format_inline(&paragraph[last..]));
            format!("<p>{html}</p>")
        })
        .collect()
}

const CUTOFFS: [i64; 6] = [60, 3_600, 86_400, 86_400 * 7, 86_400 * 30, 86_400 * 365];
const UNITS: [&str; 7] = ["second", "minute", "hour", "day", "week", "month", "year"];

/// "3 hours ago", "yesterday", "in 2 weeks" for `date` relative to `now`.
#[must_use]
pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (date - now).num_seconds();
    let unit_index = CUTOFFS
        .iter()
        .position(|cutoff| *cutoff > delta.abs())
        .unwrap_or(CUTOFFS.len());
    let divisor = if unit_index == 0 { 1 } else { CUTOFFS[unit_index - 1] };
    let value = delta.div_euclid(divisor);
    let unit = UNITS[unit_index];

    match (unit, value) {
        ("second", 0) => "now".to_string(),
        ("day", 0) => "today".to_string(),
        ("day", -1) => "yesterday".to_string(),
        ("day", 1) => "tomorrow".to_string(),
        ("week" | "month" | "year", 0) => format!("this {unit}"),
        ("week" | "month" | "year", -1) => format!("last {unit}"),
        ("week" | "month" | "year", 1) => format!("next {unit}"),
        (_, v) if v < 0 => format!("{} ago", pluralize(unit, v.unsigned_abs())),
        (_, v) => format!("in {}", pluralize(unit, v.unsigned_abs())),
    }
}

/// `"3 games"`, `"1 game"`.
#[must_use]
pub fn pluralize(word: &str, count: u64) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Compact counts for like badges: 999, 1.2K, 12K, 3.4M.
#[must_use]
pub fn compact_count(n: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (index, (size, suffix)) in UNITS.iter().enumerate() {
        if n < *size {
            continue;
        }

        let tenth = size / 10;
        let tenths = n / tenth + u64::from(n % tenth >= tenth / 2);
        if tenths >= 100 {
            let whole = n / size + u64::from(n % size >= size / 2);
            if whole >= 1_000 && index > 0 {
                let (_, bigger) = UNITS[index - 1];
                return format!("1{bigger}");
            }
            return format!("{whole}{suffix}");
        }
        return if tenths % 10 == 0 {
            format!("{}{suffix}", tenths / 10)
        } else {
            format!("{}.{}{suffix}", tenths / 10, tenths % 10)
        };
    }

    n.to_string()
}

/// Cuts `text` to `max` characters, marking the cut with "...".
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_markdown_inline_rules() {
        assert_eq!(
            markdown_to_html("**great** and *short* with _flair_ but ~~bugs~~"),
            "<p><strong>great</strong> and <em>short</em> with <u>flair</u> but <del>bugs</del></p>"
        );
    }

    #[test]
    fn test_markdown_paragraphs_and_escaping() {
        assert_eq!(
            markdown_to_html("first <b>\n\n  \nsecond"),
            "<p>first &lt;b&gt;</p><p>second</p>"
        );
    }

    #[test]
    fn test_markdown_links_are_not_mangled() {
        let html = markdown_to_html("see https://example.com/a_b_c *now*");
        assert_eq!(
            html,
            r#"<p>see <a href="https://example.com/a_b_c" target="_blank" rel="noopener noreferrer">https://example.com/a_b_c</a> <em>now</em></p>"#
        );
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "now");
        assert_eq!(relative_time(now - Duration::seconds(30), now), "30 seconds ago");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::hours(30), now), "yesterday");
        assert_eq!(relative_time(now - Duration::days(9), now), "last week");
        assert_eq!(relative_time(now - Duration::days(400), now), "last year");
        assert_eq!(relative_time(now + Duration::days(3), now), "in 3 days");
    }

    #[test]
    fn test_compact_count() {
        assert_eq!(compact_count(0), "0");
        assert_eq!(compact_count(999), "999");
        assert_eq!(compact_count(1_000), "1K");
        assert_eq!(compact_count(1_234), "1.2K");
        assert_eq!(compact_count(12_345), "12K");
        assert_eq!(compact_count(12_450), "12K");
        assert_eq!(compact_count(12_500), "13K");
        assert_eq!(compact_count(123_456), "123K");
        assert_eq!(compact_count(3_400_000), "3.4M");
        assert_eq!(compact_count(999_999), "1M");
        assert_eq!(compact_count(999_500), "1M");
        assert_eq!(compact_count(9_960), "10K");
        assert_eq!(compact_count(9_940), "9.9K");
    }

    #[test]
    fn test_truncate_and_pluralize() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(pluralize("game", 1), "1 game");
        assert_eq!(pluralize("game", 0), "0 games");
    }
}
