use chrono::{DateTime, Utc};

/// Long date such as "January 15, 2025".
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    relative_to(dt, &Utc::now())
}

/// Humanized offset of `dt` before `now`. Instants in the future
/// read as "just now".
pub fn relative_to(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*dt);

    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return ago(minutes, "minute");
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return ago(hours, "hour");
    }

    let days = diff.num_days();
    if days < 30 {
        return ago(days, "day");
    }

    let months = days / 30;
    if months < 12 {
        return ago(months, "month");
    }

    ago((days / 365).max(1), "year")
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Keeps the first `max` characters, appending "..." when anything was cut.
pub fn truncate_text(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// URL-safe slug: lowercase, punctuation dropped, separator runs
/// (whitespace, underscore, hyphen) collapsed to one hyphen.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut separator = false;

    for c in s.to_lowercase().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            separator = true;
        } else if c.is_alphanumeric() {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(c);
        }
    }

    slug
}

pub fn get_initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Abbreviates thousands and millions to one decimal place.
pub fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn format_date_is_long_form() {
        assert_eq!(format_date(&at(2025, 1, 15)), "January 15, 2025");
        assert_eq!(format_date(&at(2024, 11, 3)), "November 3, 2024");
    }

    #[test]
    fn relative_time_just_now() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(relative_to(&(now + Duration::hours(1)), &now), "just now");
    }

    #[test]
    fn relative_time_units() {
        let now = at(2025, 6, 1);
        assert_eq!(relative_to(&(now - Duration::minutes(1)), &now), "1 minute ago");
        assert_eq!(relative_to(&(now - Duration::minutes(5)), &now), "5 minutes ago");
        assert_eq!(relative_to(&(now - Duration::hours(3)), &now), "3 hours ago");
        assert_eq!(relative_to(&(now - Duration::days(3)), &now), "3 days ago");
        assert_eq!(relative_to(&(now - Duration::days(65)), &now), "2 months ago");
        assert_eq!(relative_to(&(now - Duration::days(362)), &now), "1 year ago");
        assert_eq!(relative_to(&(now - Duration::days(800)), &now), "2 years ago");
    }

    #[test]
    fn truncate_text_keeps_short_strings() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 5), "hello");
    }

    #[test]
    fn truncate_text_cuts_and_appends_ellipsis() {
        assert_eq!(truncate_text("hello world", 5), "hello...");
        assert_eq!(truncate_text("héllo wörld", 7), "héllo w...");
    }

    #[test]
    fn slugify_collapses_separators_and_drops_punctuation() {
        assert_eq!(slugify("Hello, World!  Foo_Bar"), "hello-world-foo-bar");
        assert_eq!(slugify("  --Leading and trailing--  "), "leading-and-trailing");
        assert_eq!(slugify("a - ! - b"), "a-b");
        assert_eq!(slugify("It's 100%"), "its-100");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(get_initials("ada lovelace"), "AL");
        assert_eq!(get_initials("Grace  Brewster Hopper"), "GBH");
        assert_eq!(get_initials(""), "");
    }

    #[test]
    fn format_number_abbreviates() {
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.0K");
        assert_eq!(format_number(1500), "1.5K");
        assert_eq!(format_number(2_500_000), "2.5M");
        assert_eq!(format_number(-5), "-5");
    }
}
