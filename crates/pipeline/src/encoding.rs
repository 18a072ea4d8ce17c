//! Label and one-hot encoders rebuilt from the fitted vocabularies.

use std::collections::HashMap;
use std::fmt::Display;

/// Maps a category string to the integer code it was fitted with.
///
/// Values outside the fitted classes get `classes.len()`, one past the
/// highest valid code.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Build from the fitted class list; a class's position is its code
    pub fn new(classes: &[String]) -> Self {
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.clone(), code as i64))
            .collect();
        Self { codes }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains_key(value)
    }

    /// Code reserved for values never seen during fitting
    pub fn unknown_code(&self) -> i64 {
        self.codes.len() as i64
    }

    pub fn transform(&self, value: &str) -> i64 {
        self.codes
            .get(value)
            .copied()
            .unwrap_or_else(|| self.unknown_code())
    }
}

/// One indicator column per fitted category, named `<prefix>_<category>`.
///
/// A value outside the vocabulary sets no indicator; every column is 0.
#[derive(Debug, Clone)]
pub struct OneHotEncoder<T> {
    prefix: &'static str,
    categories: Vec<T>,
}

impl<T: PartialEq + Display> OneHotEncoder<T> {
    pub fn new(prefix: &'static str, categories: Vec<T>) -> Self {
        Self { prefix, categories }
    }

    pub fn column_name(&self, category: &T) -> String {
        format!("{}_{}", self.prefix, category)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.categories.contains(value)
    }

    /// Indicator columns in category order
    pub fn encode(&self, value: &T) -> Vec<(String, f64)> {
        self.categories
            .iter()
            .map(|category| {
                let hit = if category == value { 1.0 } else { 0.0 };
                (self.column_name(category), hit)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_label_gets_fitted_code() {
        let encoder = LabelEncoder::new(&classes(&["Ang Lee", "Bong Joon-Ho", "Sofia Coppola"]));
        assert_eq!(encoder.transform("Ang Lee"), 0);
        assert_eq!(encoder.transform("Sofia Coppola"), 2);
    }

    #[test]
    fn test_unknown_label_gets_class_count() {
        let encoder = LabelEncoder::new(&classes(&["Ang Lee", "Bong Joon-Ho"]));
        assert_eq!(encoder.unknown_code(), 2);
        assert_eq!(encoder.transform("Nobody"), 2);
        // Lookups are exact
        assert_eq!(encoder.transform("ang lee"), 2);
    }

    #[test]
    fn test_empty_encoder() {
        let encoder = LabelEncoder::new(&[]);
        assert_eq!(encoder.transform("anything"), 0);
    }

    #[test]
    fn test_one_hot_month() {
        let encoder = OneHotEncoder::new("month", vec![1u32, 2, 3]);
        let columns = encoder.encode(&2);
        assert_eq!(
            columns,
            vec![
                ("month_1".to_string(), 0.0),
                ("month_2".to_string(), 1.0),
                ("month_3".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn test_one_hot_unknown_category_sets_nothing() {
        let encoder = OneHotEncoder::new("lang", vec!["english".to_string(), "hindi".to_string()]);
        let columns = encoder.encode(&"klingon".to_string());
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|(_, v)| *v == 0.0));
        assert!(!encoder.contains(&"klingon".to_string()));
    }
}
