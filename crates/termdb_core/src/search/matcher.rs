//! Text comparison for search criteria.

use crate::config::FuzzyMode;
use crate::search::criteria::SearchCriterion;

/// A criterion with its text lowercased once.
#[derive(Debug)]
pub(crate) struct TextMatcher {
    needle: String,
    exact: bool,
    fuzzy: FuzzyMode,
}

impl TextMatcher {
    pub(crate) fn new(criterion: &SearchCriterion, fuzzy: FuzzyMode) -> Self {
        let (text, exact) = match criterion {
            SearchCriterion::ExactMatch { text, .. } => (text, true),
            SearchCriterion::FuzzyMatch { text, .. } => (text, false),
        };
        Self {
            needle: text.to_lowercase(),
            exact,
            fuzzy,
        }
    }

    pub(crate) fn matches(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        if self.exact {
            return field == self.needle;
        }
        if field.contains(&self.needle) {
            return true;
        }
        match self.fuzzy {
            FuzzyMode::Substring => false,
            FuzzyMode::EditDistance { max_distance } => {
                strsim::levenshtein(&field, &self.needle) <= max_distance
                    || field
                        .split_whitespace()
                        .any(|token| strsim::levenshtein(token, &self.needle) <= max_distance)
            }
        }
    }
}
