//! Franchise detection from a movie title.

/// Franchises recognized in titles, checked in this order
pub const FRANCHISE_KEYWORDS: [&str; 7] = [
    "Avengers",
    "Batman",
    "Harry Potter",
    "Star Wars",
    "Spider-Man",
    "Frozen",
    "Toy Story",
];

/// First keyword contained in the title, compared case-insensitively
pub fn detect_franchise(title: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    FRANCHISE_KEYWORDS
        .iter()
        .copied()
        .find(|kw| title.contains(&kw.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_case_insensitive_substring() {
        assert_eq!(detect_franchise("the avengers: endgame"), Some("Avengers"));
        assert_eq!(detect_franchise("LEGO BATMAN"), Some("Batman"));
        assert_eq!(detect_franchise("Spider-Man: No Way Home"), Some("Spider-Man"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(detect_franchise("Parasite"), None);
        assert_eq!(detect_franchise(""), None);
        // Hyphen matters
        assert_eq!(detect_franchise("Spider Man"), None);
    }

    #[test]
    fn test_first_keyword_wins() {
        assert_eq!(
            detect_franchise("Batman vs the Avengers"),
            Some("Avengers"),
            "keyword order decides, not position in the title"
        );
    }
}
