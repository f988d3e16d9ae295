//! Search command implementation.

use super::{open_store_read_only, OutputFormat};
use std::path::Path;
use termdb_core::{Config, FuzzyMode, SearchCriterion, TermbaseId};

/// Parsed search arguments.
#[derive(Debug)]
pub struct Query {
    /// Termbase to search.
    pub termbase: u64,
    /// Main language.
    pub lang: String,
    /// Exact lemma criteria.
    pub exact: Vec<String>,
    /// Fuzzy lemma criteria.
    pub fuzzy: Vec<String>,
    /// Edit distance for fuzzy criteria.
    pub max_distance: Option<usize>,
    /// Print only the count.
    pub count: bool,
}

impl Query {
    fn criteria(&self) -> Vec<SearchCriterion> {
        self.exact
            .iter()
            .map(|text| SearchCriterion::exact(text.as_str(), self.lang.as_str()))
            .chain(
                self.fuzzy
                    .iter()
                    .map(|text| SearchCriterion::fuzzy(text.as_str(), self.lang.as_str())),
            )
            .collect()
    }

    fn config(&self) -> Config {
        let mode = self
            .max_distance
            .map_or(FuzzyMode::Substring, |max_distance| FuzzyMode::EditDistance {
                max_distance,
            });
        Config::default().fuzzy_mode(mode)
    }
}

/// Runs the search command.
pub fn run(
    dir: &Path,
    store: &str,
    query: &Query,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store_read_only(dir, store, query.config())?;
    let termbase = TermbaseId::new(query.termbase);
    let criteria = query.criteria();
    tracing::debug!(termbase = query.termbase, lang = %query.lang, criteria = criteria.len(), "searching");

    if query.count {
        let count = db.search().count_matching(termbase, &query.lang, &criteria);
        match format {
            OutputFormat::Json => super::print_json(&count)?,
            OutputFormat::Text => println!("{count}"),
        }
        return Ok(());
    }

    let results = db.search().get_all(termbase, &query.lang, &criteria);
    match format {
        OutputFormat::Json => super::print_json(&results)?,
        OutputFormat::Text => {
            for hit in &results {
                println!("[{}] {} (entry {})", hit.term.id, hit.term.lemma, hit.entry_id);
                for other in &hit.translations {
                    println!("    {:<6} {}", other.lang, other.lemma);
                }
            }
            println!("{} result(s)", results.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> Query {
        Query {
            termbase: 1,
            lang: "en".to_string(),
            exact: vec!["test".to_string()],
            fuzzy: vec!["es".to_string(), "t".to_string()],
            max_distance: None,
            count: false,
        }
    }

    #[test]
    fn criteria_follow_main_language() {
        let criteria = query().criteria();
        assert_eq!(criteria.len(), 3);
        assert_eq!(criteria[0], SearchCriterion::exact("test", "en"));
        assert_eq!(criteria[2], SearchCriterion::fuzzy("t", "en"));
    }

    #[test]
    fn max_distance_selects_edit_distance_mode() {
        let mut q = query();
        assert_eq!(q.config().fuzzy_mode, FuzzyMode::Substring);
        q.max_distance = Some(2);
        assert_eq!(
            q.config().fuzzy_mode,
            FuzzyMode::EditDistance { max_distance: 2 }
        );
    }
}
