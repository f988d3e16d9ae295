//! Search criteria.

use crate::types::PropertyId;

/// Which fields of a term a criterion inspects, for terms of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDescriptor {
    /// Whether the lemma is inspected.
    pub lemma: bool,
    /// Language code the descriptor applies to.
    pub lang: String,
    /// Properties whose values are inspected as well: term-level values of
    /// the term, entry-level values of its entry.
    pub properties: Vec<PropertyId>,
}

impl MatchDescriptor {
    /// Inspects only the lemma of terms in `lang`.
    pub fn lemma(lang: impl Into<String>) -> Self {
        Self {
            lemma: true,
            lang: lang.into(),
            properties: Vec::new(),
        }
    }

    /// Also inspects the values of `property_id`.
    #[must_use]
    pub fn with_property(mut self, property_id: PropertyId) -> Self {
        self.properties.push(property_id);
        self
    }
}

/// One condition a term must meet. Criteria of a query are combined with
/// AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    /// A field equals `text`, ignoring case.
    ExactMatch {
        /// Text to compare with.
        text: String,
        /// Fields to inspect; one matching descriptor is enough.
        matching: Vec<MatchDescriptor>,
    },
    /// A field contains `text`, ignoring case (or is close to it, see
    /// [`crate::FuzzyMode`]).
    FuzzyMatch {
        /// Text to look for.
        text: String,
        /// Fields to inspect; one matching descriptor is enough.
        matching: Vec<MatchDescriptor>,
    },
}

impl SearchCriterion {
    /// Exact lemma match on terms of `lang`.
    pub fn exact(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::ExactMatch {
            text: text.into(),
            matching: vec![MatchDescriptor::lemma(lang)],
        }
    }

    /// Fuzzy lemma match on terms of `lang`.
    pub fn fuzzy(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::FuzzyMatch {
            text: text.into(),
            matching: vec![MatchDescriptor::lemma(lang)],
        }
    }

    pub(crate) fn matching(&self) -> &[MatchDescriptor] {
        match self {
            Self::ExactMatch { matching, .. } | Self::FuzzyMatch { matching, .. } => matching,
        }
    }
}
