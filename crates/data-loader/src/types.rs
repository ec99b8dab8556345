//! Core domain types for the IMDb datasets.
//!
//! `Person` and `Title` are the two entities; `TitleCrew`, `TitlePrincipal`
//! and `TitleRating` are the decoded rows of the files that enrich titles
//! after they exist. `DataIndex` is the frozen, read-only view the query
//! engine works against.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// IMDb person identifier (`nconst`, e.g. "nm0000001")
pub type PersonId = String;

/// IMDb title identifier (`tconst`, e.g. "tt0000001")
pub type TitleId = String;

// =============================================================================
// Entities
// =============================================================================

/// A row of `name.basics.tsv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub nconst: PersonId,
    pub primary_name: String,
    pub birth_year: Option<u16>,
    /// `None` when the dataset carries no death year
    pub death_year: Option<u16>,
    pub primary_profession: Vec<String>,
    pub known_for_titles: Vec<TitleId>,
}

impl Person {
    /// A person is considered alive when no death year is recorded.
    pub fn is_alive(&self) -> bool {
        self.death_year.is_none()
    }
}

/// A title, created from `title.basics.tsv` and enriched by the crew and
/// ratings files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub tconst: TitleId,
    pub title_type: String,
    pub primary_title: String,
    pub original_title: String,
    pub is_adult: bool,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,

    // Written by the crew load
    pub directors: Vec<PersonId>,
    pub writers: Vec<PersonId>,

    // Written by the ratings load
    pub average_rating: Option<f64>,
    pub num_votes: Option<u32>,
}

impl Title {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

// =============================================================================
// Enrichment records
// =============================================================================

/// A row of `title.crew.tsv`
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCrew {
    pub tconst: TitleId,
    pub directors: Vec<PersonId>,
    pub writers: Vec<PersonId>,
}

/// A row of `title.principals.tsv`
///
/// Only `tconst` and `nconst` feed the cast index; the remaining columns are
/// decoded so malformed rows are caught consistently.
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePrincipal {
    pub tconst: TitleId,
    pub ordering: Option<u32>,
    pub nconst: PersonId,
    pub category: Option<String>,
    pub job: Option<String>,
    pub characters: Option<String>,
}

/// A row of `title.ratings.tsv`
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRating {
    pub tconst: TitleId,
    pub average_rating: Option<f64>,
    pub num_votes: Option<u32>,
}

// =============================================================================
// DataIndex - the frozen in-memory database
// =============================================================================

/// Read-only view of everything ingestion produced.
///
/// Built once by freezing an [`EntityStore`](crate::store::EntityStore);
/// nothing mutates it afterwards, so it can be shared behind an `Arc` and
/// read from any number of threads without locking.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) persons: HashMap<PersonId, Person>,
    pub(crate) titles: HashMap<TitleId, Title>,

    // Derived indices
    pub(crate) title_directors: HashMap<TitleId, Vec<PersonId>>,
    pub(crate) title_writers: HashMap<TitleId, Vec<PersonId>>,
    /// Cast membership per title, from the principals file
    pub(crate) title_actors: HashMap<TitleId, HashSet<PersonId>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_person(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    pub fn contains_person(&self, id: &str) -> bool {
        self.persons.contains_key(id)
    }

    pub fn get_title(&self, id: &str) -> Option<&Title> {
        self.titles.get(id)
    }

    /// All titles keyed by id
    pub fn titles(&self) -> &HashMap<TitleId, Title> {
        &self.titles
    }

    /// Cast sets keyed by title id; titles without principals are absent
    pub fn title_actors(&self) -> &HashMap<TitleId, HashSet<PersonId>> {
        &self.title_actors
    }

    pub fn get_title_actors(&self, id: &str) -> Option<&HashSet<PersonId>> {
        self.title_actors.get(id)
    }

    /// Directors of a title, empty if the crew file had none
    pub fn get_title_directors(&self, id: &str) -> &[PersonId] {
        self.title_directors
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Writers of a title, empty if the crew file had none
    pub fn get_title_writers(&self, id: &str) -> &[PersonId] {
        self.title_writers
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// (persons, titles, cast links)
    pub fn counts(&self) -> (usize, usize, usize) {
        let cast_links = self.title_actors.values().map(|s| s.len()).sum();
        (self.persons.len(), self.titles.len(), cast_links)
    }
}
