//! Date parsing for Japanese business data
//!
//! Shipping dates arrive as `2024/01/05`, `2024-1-5`, `2024年1月5日`, or as
//! free text with a date embedded next to a marker word. Marker-only values
//! (e.g. 当日洗浄) simply yield no date.

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%Y-%m-%d", "%Y年%m月%d日"];

/// Parse a date from a shipping-date or instruction-date cell.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    // Fall back to scanning for an embedded yyyy-mm-dd shaped token after
    // normalizing the kanji and slash separators.
    let normalized: String = trimmed
        .chars()
        .map(|c| match c {
            '年' | '月' | '/' => '-',
            '日' => ' ',
            other => other,
        })
        .collect();
    let token = find_date_token(&normalized)?;
    NaiveDate::parse_from_str(&token, "%Y-%m-%d").ok()
}

fn find_date_token(s: &str) -> Option<String> {
    let chars: Vec<char> = s.chars().collect();
    for start in 0..chars.len() {
        if let Some(token) = match_date_at(&chars[start..]) {
            return Some(token);
        }
    }
    None
}

fn match_date_at(chars: &[char]) -> Option<String> {
    let mut idx = 0;
    let year = take_digits(chars, &mut idx, 4, 4)?;
    expect_char(chars, &mut idx, '-')?;
    let month = take_digits(chars, &mut idx, 1, 2)?;
    expect_char(chars, &mut idx, '-')?;
    let day = take_digits(chars, &mut idx, 1, 2)?;
    Some(format!("{}-{}-{}", year, month, day))
}

fn take_digits(chars: &[char], idx: &mut usize, min: usize, max: usize) -> Option<String> {
    let start = *idx;
    while *idx < chars.len() && *idx - start < max && chars[*idx].is_ascii_digit() {
        *idx += 1;
    }
    if *idx - start < min {
        None
    } else {
        Some(chars[start..*idx].iter().collect())
    }
}

fn expect_char(chars: &[char], idx: &mut usize, expected: char) -> Option<()> {
    if chars.get(*idx) == Some(&expected) {
        *idx += 1;
        Some(())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_slash_and_hyphen() {
        assert_eq!(parse_flexible_date("2024/01/15"), Some(date(2024, 1, 15)));
        assert_eq!(parse_flexible_date("2024-1-5"), Some(date(2024, 1, 5)));
    }

    #[test]
    fn parses_kanji_date() {
        assert_eq!(parse_flexible_date("2024年1月5日"), Some(date(2024, 1, 5)));
    }

    #[test]
    fn parses_embedded_date() {
        assert_eq!(
            parse_flexible_date("2024/01/05 午前便"),
            Some(date(2024, 1, 5))
        );
    }

    #[test]
    fn marker_text_has_no_date() {
        assert_eq!(parse_flexible_date("当日洗浄"), None);
        assert_eq!(parse_flexible_date(""), None);
    }
}
