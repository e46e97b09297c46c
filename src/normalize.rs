//! Pure normalizers converting raw offer strings into canonical forms.
//!
//! Every function here is total: malformed input degrades to an empty
//! string or zero instead of an error, so extraction never fails on bad
//! upstream data.

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LONG_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]");
const SHORT_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]");

/// Canonicalizes a ship name.
///
/// Collapses whitespace runs to single spaces, trims, uppercases the first
/// character, and forces the literal "of the seas" (any case) to
/// "Of The Seas". Casing elsewhere is preserved as given; this is not a
/// full title-case pass.
///
/// # Examples
///
/// ```
/// use offerdeck::normalize::normalize_ship_name;
///
/// assert_eq!(normalize_ship_name("symphony of the seas"), "Symphony Of The Seas");
/// assert_eq!(normalize_ship_name("  Utopia  OF THE SEAS "), "Utopia Of The Seas");
/// assert_eq!(normalize_ship_name(""), "");
/// ```
#[must_use]
pub fn normalize_ship_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => return String::new(),
    };
    replace_ignore_ascii_case(&capitalized, "of the seas", "Of The Seas")
}

/// Canonicalizes a date string to `YYYY-MM-DD`, or returns an empty string
/// when the input cannot be parsed. Never fails.
///
/// Anything after a `T` is dropped (API timestamps carry a time-of-day
/// suffix; only the calendar date matters). The remainder is accepted as
/// ISO (`2026-09-07`) or as the long form the bounce-back exports use
/// (`October 2, 2025`, short month names included).
///
/// # Examples
///
/// ```
/// use offerdeck::normalize::normalize_date;
///
/// assert_eq!(normalize_date("2026-09-07T00:00:00.000Z"), "2026-09-07");
/// assert_eq!(normalize_date("October 2, 2025"), "2025-10-02");
/// assert_eq!(normalize_date("not a date"), "");
/// ```
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let date_part = trimmed.split('T').next().unwrap_or(trimmed).trim();
    match parse_calendar_date(date_part) {
        Some(date) => date.format(&ISO_DATE).unwrap_or_default(),
        None => String::new(),
    }
}

/// Parses a calendar date in any of the accepted input forms.
///
/// Used by [`normalize_date`] and for user-supplied filter bounds.
#[must_use]
pub fn parse_calendar_date(text: &str) -> Option<Date> {
    let text = text.trim();
    Date::parse(text, &ISO_DATE)
        .or_else(|_| Date::parse(text, &LONG_DATE))
        .or_else(|_| Date::parse(text, &SHORT_DATE))
        .ok()
}

/// Parses the leading night count from itinerary text.
///
/// Only a count at the very start of the string counts: upstream itinerary
/// names lead with the duration ("7 Night Western Caribbean"), so a number
/// elsewhere ("Miami 3 Night Getaway") is not a duration. Returns 0 when
/// no leading count is present: unknown, not a zero-night cruise.
///
/// # Examples
///
/// ```
/// use offerdeck::normalize::extract_nights;
///
/// assert_eq!(extract_nights("3 Night Miami Cruise"), 3);
/// assert_eq!(extract_nights("4 NIGHT BAHAMAS GETAWAY"), 4);
/// assert_eq!(extract_nights("Miami 3 Night Cruise"), 0);
/// assert_eq!(extract_nights(""), 0);
/// ```
#[must_use]
pub fn extract_nights(text: &str) -> u32 {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    let rest = &text[digits.len()..];
    let after_space = rest.trim_start();
    if after_space.len() == rest.len() {
        // A bare number fused to the next word is not a night count.
        return 0;
    }
    match after_space.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("night") => digits.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Replaces every occurrence of an ASCII `needle`, compared
/// case-insensitively, with `replacement`.
fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(pos) = find_ignore_ascii_case(rest, needle) {
        result.push_str(&rest[..pos]);
        result.push_str(replacement);
        rest = &rest[pos + needle.len()..];
    }
    result.push_str(rest);
    result
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| {
        haystack.is_char_boundary(i)
            && haystack.is_char_boundary(i + needle.len())
            && haystack[i..i + needle.len()].eq_ignore_ascii_case(needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_name_capitalizes_first_character() {
        assert_eq!(normalize_ship_name("utopia"), "Utopia");
        assert_eq!(normalize_ship_name("Utopia"), "Utopia");
    }

    #[test]
    fn ship_name_forces_of_the_seas_suffix() {
        assert_eq!(
            normalize_ship_name("symphony of the seas"),
            "Symphony Of The Seas"
        );
        assert_eq!(
            normalize_ship_name("SERENADE OF THE SEAS"),
            "SERENADE Of The Seas"
        );
    }

    #[test]
    fn ship_name_collapses_whitespace() {
        assert_eq!(
            normalize_ship_name("  wonder   of the   seas  "),
            "Wonder Of The Seas"
        );
    }

    #[test]
    fn ship_name_preserves_interior_casing() {
        // Not a title-case pass: only the first character and the suffix
        // are touched.
        assert_eq!(normalize_ship_name("allure oF tHe sEAs"), "Allure Of The Seas");
        assert_eq!(normalize_ship_name("grandeur X"), "Grandeur X");
    }

    #[test]
    fn ship_name_empty_input_yields_empty() {
        assert_eq!(normalize_ship_name(""), "");
        assert_eq!(normalize_ship_name("   "), "");
    }

    #[test]
    fn date_accepts_iso_input() {
        assert_eq!(normalize_date("2026-09-07"), "2026-09-07");
    }

    #[test]
    fn date_drops_time_of_day_suffix() {
        assert_eq!(normalize_date("2026-09-07T00:00:00.000Z"), "2026-09-07");
        assert_eq!(normalize_date("2025-12-31T23:59:59Z"), "2025-12-31");
    }

    #[test]
    fn date_accepts_long_month_form() {
        assert_eq!(normalize_date("October 2, 2025"), "2025-10-02");
        assert_eq!(normalize_date("january 15, 2026"), "2026-01-15");
        assert_eq!(normalize_date("Oct 2, 2025"), "2025-10-02");
    }

    #[test]
    fn date_unparseable_input_yields_empty() {
        assert_eq!(normalize_date("not a date"), "");
        assert_eq!(normalize_date("2026-13-40"), "");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn date_is_idempotent_on_canonical_values() {
        for raw in ["2026-09-07T10:00:00Z", "October 2, 2025", "garbage"] {
            let once = normalize_date(raw);
            assert_eq!(normalize_date(&once), once);
        }
    }

    #[test]
    fn nights_parses_leading_count() {
        assert_eq!(extract_nights("3 Night Miami Cruise"), 3);
        assert_eq!(extract_nights("4 NIGHT BAHAMAS GETAWAY CRUISE"), 4);
        assert_eq!(extract_nights("10 night transatlantic"), 10);
        assert_eq!(extract_nights("7  Night Alaska"), 7);
    }

    #[test]
    fn nights_requires_count_at_start() {
        assert_eq!(extract_nights("Miami 3 Night Getaway"), 0);
        assert_eq!(extract_nights("Cruise, 5 Night"), 0);
    }

    #[test]
    fn nights_requires_whitespace_before_night() {
        assert_eq!(extract_nights("3Night Miami"), 0);
    }

    #[test]
    fn nights_missing_or_garbled_text_yields_zero() {
        assert_eq!(extract_nights(""), 0);
        assert_eq!(extract_nights("Western Caribbean"), 0);
        assert_eq!(extract_nights("3 days in Miami"), 0);
    }

    #[test]
    fn nights_accepts_night_as_word_prefix() {
        // "Nightly" still begins with "night"; upstream text never does
        // this, but the anchoring rule is prefix-based.
        assert_eq!(extract_nights("3 Nights in the Bahamas"), 3);
    }

    #[test]
    fn case_insensitive_replace_handles_multiple_occurrences() {
        assert_eq!(
            replace_ignore_ascii_case("of the seas OF THE SEAS", "of the seas", "X"),
            "X X"
        );
        assert_eq!(replace_ignore_ascii_case("abc", "xyz", "!"), "abc");
    }
}
