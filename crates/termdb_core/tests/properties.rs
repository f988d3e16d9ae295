//! Property-based checks of the counting and search queries.

use proptest::prelude::*;
use std::collections::BTreeSet;
use termdb_core::{Database, Entry, Language, SearchCriterion, Term, TermId, Termbase, TermbaseId};

const LANGUAGES: [&str; 3] = ["en", "it", "de"];

/// Strategy for a term: entry slot, language index and a short lemma.
fn term_strategy() -> impl Strategy<Value = (usize, usize, String)> {
    (0..4usize, 0..LANGUAGES.len(), "[a-c]{1,3}( [a-c]{1,2})?")
}

fn build(terms: &[(usize, usize, String)]) -> (Database, TermbaseId) {
    let db = Database::open_in_memory().unwrap();
    let tb = db.termbases().create(&Termbase::new("generated")).unwrap();
    for code in LANGUAGES {
        db.languages().create(&Language::new(code, tb)).unwrap();
    }
    let entries: Vec<_> = (0..4)
        .map(|_| db.entries().create(&Entry::new(tb)).unwrap())
        .collect();
    let batch: Vec<Term> = terms
        .iter()
        .map(|(slot, lang, lemma)| Term::new(entries[*slot], lemma.as_str(), LANGUAGES[*lang]))
        .collect();
    db.terms().insert_all(&batch).unwrap();
    (db, tb)
}

fn ids(db: &Database, tb: TermbaseId, criteria: &[SearchCriterion]) -> BTreeSet<TermId> {
    db.search()
        .get_all(tb, "en", criteria)
        .into_iter()
        .map(|hit| hit.term.id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn language_counts_add_up(terms in prop::collection::vec(term_strategy(), 0..30)) {
        let (db, tb) = build(&terms);
        let search = db.search();
        let per_language: usize = LANGUAGES
            .iter()
            .map(|code| search.count_by_language(code, tb))
            .sum();
        prop_assert_eq!(per_language, terms.len());
        prop_assert_eq!(search.count_all(tb), terms.len());
        prop_assert_eq!(
            search.count_matching(tb, "en", &[]),
            search.count_by_language("en", tb)
        );
    }

    #[test]
    fn and_composition_is_intersection(
        terms in prop::collection::vec(term_strategy(), 1..30),
        first in "[a-c]{1,2}",
        second in "[a-c]{1,2}",
    ) {
        let (db, tb) = build(&terms);
        let a = SearchCriterion::fuzzy(first, "en");
        let b = SearchCriterion::fuzzy(second, "en");

        let both = ids(&db, tb, &[a.clone(), b.clone()]);
        let expected: BTreeSet<TermId> = ids(&db, tb, &[a])
            .intersection(&ids(&db, tb, &[b]))
            .copied()
            .collect();
        prop_assert_eq!(both, expected);
    }

    #[test]
    fn exact_hits_are_a_subset_of_fuzzy_hits(
        terms in prop::collection::vec(term_strategy(), 1..30),
        text in "[a-c]{1,3}",
    ) {
        let (db, tb) = build(&terms);
        let exact = ids(&db, tb, &[SearchCriterion::exact(text.clone(), "en")]);
        let fuzzy = ids(&db, tb, &[SearchCriterion::fuzzy(text, "en")]);
        prop_assert!(exact.is_subset(&fuzzy));
    }
}
