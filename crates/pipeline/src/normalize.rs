//! Categorical normalization applied to request fields before any lookup.

use data_loader::Month;

/// Full month names, index + 1 is the month number
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month used when the request's month name doesn't resolve
pub const DEFAULT_MONTH: Month = 1;

/// Title-case a string word by word.
///
/// A cased character is upper-cased when the character before it is not
/// cased, lower-cased otherwise. Apostrophes and hyphens therefore start a
/// new word: `"o'neil"` becomes `"O'Neil"`, `"spider-man"` becomes
/// `"Spider-Man"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = is_cased(c);
    }
    out
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase()
}

/// Trim and title-case each genre name
pub fn normalize_genres(genres: &[String]) -> Vec<String> {
    genres.iter().map(|g| title_case(g.trim())).collect()
}

/// Resolve a month name to 1-12.
///
/// Matching is exact against [`MONTH_NAMES`]; anything else, including an
/// empty string or a lower-case name, resolves to January.
pub fn month_from_name(name: &str) -> Month {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as Month + 1)
        .unwrap_or(DEFAULT_MONTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("christopher nolan"), "Christopher Nolan");
        assert_eq!(title_case("QUENTIN TARANTINO"), "Quentin Tarantino");
        assert_eq!(title_case("the avengers: endgame"), "The Avengers: Endgame");
        assert_eq!(title_case("spider-man"), "Spider-Man");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("1st place"), "1St Place");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_normalize_genres() {
        let genres = vec![" action ".to_string(), "SCI-FI".to_string()];
        assert_eq!(normalize_genres(&genres), vec!["Action", "Sci-Fi"]);
    }

    #[test]
    fn test_month_from_name() {
        assert_eq!(month_from_name("January"), 1);
        assert_eq!(month_from_name("March"), 3);
        assert_eq!(month_from_name("December"), 12);
    }

    #[test]
    fn test_unmatched_month_defaults_to_january() {
        assert_eq!(month_from_name(""), DEFAULT_MONTH);
        assert_eq!(month_from_name("march"), DEFAULT_MONTH);
        assert_eq!(month_from_name("Smarch"), DEFAULT_MONTH);
    }
}
