//! # Query Engine Crate
//!
//! Read-only analytical queries over a loaded [`DataIndex`]:
//!
//! - **director_writer**: titles whose sole director is also their sole
//!   writer and is still alive
//! - **common_actors**: titles two given people both appear in
//! - **best_by_genre**: for a genre, the best title of every start year
//!
//! All queries borrow from the index and never block; the index is frozen
//! once ingestion finishes, so they can run from any number of threads.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DirectorySource, Ingestor};
//! use query_engine::QueryEngine;
//! use std::sync::Arc;
//!
//! let (index, _report) = Ingestor::new(DirectorySource::new("data/imdb")).run()?;
//! let engine = QueryEngine::new(Arc::new(index));
//!
//! for (year, title) in engine.best_titles_by_genre("Drama") {
//!     println!("{year}: {}", title.primary_title);
//! }
//! ```

pub mod best_by_genre;
pub mod common_actors;
pub mod director_writer;
pub mod engine;

// Re-export main types
pub use data_loader::DataIndex;
pub use engine::QueryEngine;

#[cfg(test)]
pub(crate) mod test_support {
    //! Small builder for hand-made indexes in unit tests.

    use data_loader::{DataIndex, EntityStore, Person, Title};

    pub fn person(nconst: &str, death_year: Option<u16>) -> Person {
        Person {
            nconst: nconst.to_string(),
            primary_name: format!("Person {nconst}"),
            birth_year: Some(1950),
            death_year,
            primary_profession: vec![],
            known_for_titles: vec![],
        }
    }

    pub fn title(tconst: &str, genres: &[&str], start_year: Option<u16>) -> Title {
        Title {
            tconst: tconst.to_string(),
            title_type: "movie".to_string(),
            primary_title: format!("Title {tconst}"),
            original_title: format!("Title {tconst}"),
            is_adult: false,
            start_year,
            end_year: None,
            runtime_minutes: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            directors: vec![],
            writers: vec![],
            average_rating: None,
            num_votes: None,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[derive(Default)]
    pub struct IndexBuilder {
        store: EntityStore,
    }

    impl IndexBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn person(self, person: Person) -> Self {
            self.store.put_person(person);
            self
        }

        pub fn title(self, title: Title) -> Self {
            self.store.put_title_basic(title);
            self
        }

        pub fn crew(self, tconst: &str, directors: &[&str], writers: &[&str]) -> Self {
            self.store.set_title_crew(tconst, ids(directors), ids(writers));
            self
        }

        pub fn cast(self, tconst: &str, members: &[&str]) -> Self {
            for nconst in members {
                self.store.add_title_cast(tconst, nconst);
            }
            self
        }

        pub fn rating(self, tconst: &str, average_rating: f64, num_votes: u32) -> Self {
            self.store
                .set_title_rating(tconst, Some(average_rating), Some(num_votes));
            self
        }

        pub fn build(self) -> DataIndex {
            self.store.freeze()
        }
    }
}
