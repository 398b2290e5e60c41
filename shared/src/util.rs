/// Current UTC time as RFC 3339 with second precision
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Maximum slug length in characters
pub const SLUG_MAX_LEN: usize = 100;

/// URL-friendly slug: lowercase, spaces become `-`, anything outside
/// `[a-z0-9-]` is dropped, leading/trailing `-` trimmed, capped at 100 chars.
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    slug.trim_matches('-').chars().take(SLUG_MAX_LEN).collect()
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hot Drinks"), "hot-drinks");
        assert_eq!(slugify("  Fish & Chips "), "fish--chips");
        assert_eq!(slugify("Café Latte!"), "caf-latte");
        assert_eq!(slugify("---Specials---"), "specials");
        assert_eq!(slugify("2 for 1"), "2-for-1");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "a".repeat(150);
        assert_eq!(slugify(&long).len(), SLUG_MAX_LEN);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.346), 12.35);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_now_rfc3339_shape() {
        let now = now_rfc3339();
        assert!(now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
