//! Ingestion-time entity store.
//!
//! Every mutator takes `&self` so the store can sit behind an `Arc` and be
//! written by several load tasks at once. Each field group has a single
//! owning file (crew, ratings, principals), so two tasks never write the
//! same field of a title; the per-entry locks of `DashMap` give visibility
//! between them. Once loading is done the store is consumed by
//! [`EntityStore::freeze`] and becomes a plain [`DataIndex`].

use crate::types::*;
use dashmap::{DashMap, DashSet};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct EntityStore {
    persons: DashMap<PersonId, Person>,
    titles: DashMap<TitleId, Title>,
    title_directors: DashMap<TitleId, Vec<PersonId>>,
    title_writers: DashMap<TitleId, Vec<PersonId>>,
    title_actors: DashMap<TitleId, DashSet<PersonId>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a person
    pub fn put_person(&self, person: Person) {
        self.persons.insert(person.nconst.clone(), person);
    }

    /// Insert a title with its basic fields
    ///
    /// Only the basics load calls this, before any enrichment runs.
    pub fn put_title_basic(&self, title: Title) {
        self.titles.insert(title.tconst.clone(), title);
    }

    /// Record the directors and writers of an existing title.
    ///
    /// The title entry stays locked while the director/writer indices are
    /// written, so both representations change together. Returns `false`
    /// when the title is unknown and nothing was written.
    pub fn set_title_crew(
        &self,
        tconst: &str,
        directors: Vec<PersonId>,
        writers: Vec<PersonId>,
    ) -> bool {
        let Some(mut title) = self.titles.get_mut(tconst) else {
            return false;
        };
        title.directors = directors.clone();
        title.writers = writers.clone();
        self.title_directors.insert(tconst.to_string(), directors);
        self.title_writers.insert(tconst.to_string(), writers);
        true
    }

    /// Add a person to the cast of an existing title.
    ///
    /// Returns `false` when the title is unknown.
    pub fn add_title_cast(&self, tconst: &str, nconst: &str) -> bool {
        if !self.contains_title(tconst) {
            return false;
        }
        self.title_actors
            .entry(tconst.to_string())
            .or_default()
            .insert(nconst.to_string());
        true
    }

    /// Set the rating fields of an existing title.
    ///
    /// Returns `false` when the title is unknown.
    pub fn set_title_rating(
        &self,
        tconst: &str,
        average_rating: Option<f64>,
        num_votes: Option<u32>,
    ) -> bool {
        match self.titles.get_mut(tconst) {
            Some(mut title) => {
                title.average_rating = average_rating;
                title.num_votes = num_votes;
                true
            }
            None => false,
        }
    }

    pub fn contains_title(&self, tconst: &str) -> bool {
        self.titles.contains_key(tconst)
    }

    /// Snapshot of one person
    pub fn person(&self, nconst: &str) -> Option<Person> {
        self.persons.get(nconst).map(|p| p.value().clone())
    }

    /// Snapshot of one title
    pub fn title(&self, tconst: &str) -> Option<Title> {
        self.titles.get(tconst).map(|t| t.value().clone())
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }

    /// Consume the store and hand its contents to a read-only index
    pub fn freeze(self) -> DataIndex {
        DataIndex {
            persons: self.persons.into_iter().collect(),
            titles: self.titles.into_iter().collect(),
            title_directors: self.title_directors.into_iter().collect(),
            title_writers: self.title_writers.into_iter().collect(),
            title_actors: self
                .title_actors
                .into_iter()
                .map(|(tconst, cast)| (tconst, cast.into_iter().collect::<HashSet<_>>()))
                .collect(),
        }
    }
}
