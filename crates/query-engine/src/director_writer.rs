//! Titles written and directed by the same living person.
//!
//! A title qualifies when its crew is exactly one director and exactly one
//! writer, both the same person id, and that person is loaded and has no
//! recorded death year. Crew ids missing from the person index never match.

use data_loader::{DataIndex, Title};
use rayon::prelude::*;
use tracing::{debug, instrument};

#[instrument(skip_all)]
pub fn titles_by_same_director_writer_alive(index: &DataIndex) -> Vec<&Title> {
    let mut titles: Vec<&Title> = index
        .titles()
        .par_iter()
        .map(|(_, title)| title)
        .filter(|title| {
            sole_director_writer(title)
                .and_then(|nconst| index.get_person(nconst))
                .is_some_and(|person| person.is_alive())
        })
        .collect();

    titles.sort_unstable_by(|a, b| a.tconst.cmp(&b.tconst));
    debug!(count = titles.len(), "Titles with a living director-writer");
    titles
}

/// The person id when the crew is one director who is also the one writer
fn sole_director_writer(title: &Title) -> Option<&str> {
    match (title.directors.as_slice(), title.writers.as_slice()) {
        ([director], [writer]) if director == writer => Some(director.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{person, title, IndexBuilder};

    #[test]
    fn test_single_living_director_writer_matches() {
        let index = IndexBuilder::new()
            .person(person("nmA", None))
            .title(title("tt1", &["Drama"], Some(2000)))
            .crew("tt1", &["nmA"], &["nmA"])
            .build();

        let titles = titles_by_same_director_writer_alive(&index);
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].tconst, "tt1");
    }

    #[test]
    fn test_multiple_directors_excluded() {
        let index = IndexBuilder::new()
            .person(person("nmA", None))
            .person(person("nmB", None))
            .title(title("tt1", &["Drama"], Some(2000)))
            .crew("tt1", &["nmA", "nmB"], &["nmA"])
            .title(title("tt2", &["Drama"], Some(2000)))
            .crew("tt2", &["nmA"], &["nmA", "nmB"])
            .build();

        assert!(titles_by_same_director_writer_alive(&index).is_empty());
    }

    #[test]
    fn test_dead_different_or_unknown_crew_excluded() {
        let index = IndexBuilder::new()
            .person(person("nmDead", Some(1990)))
            .person(person("nmA", None))
            .person(person("nmB", None))
            .title(title("tt1", &["Drama"], Some(1980)))
            .crew("tt1", &["nmDead"], &["nmDead"])
            .title(title("tt2", &["Drama"], Some(1980)))
            .crew("tt2", &["nmA"], &["nmB"])
            .title(title("tt3", &["Drama"], Some(1980)))
            .crew("tt3", &["nmGhost"], &["nmGhost"])
            .title(title("tt4", &["Drama"], Some(1980)))
            .build();

        assert!(titles_by_same_director_writer_alive(&index).is_empty());
    }
}
