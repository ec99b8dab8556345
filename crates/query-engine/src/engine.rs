//! `QueryEngine` ties the three read-only queries to one shared index.

use crate::{best_by_genre, common_actors, director_writer};
use data_loader::{DataIndex, Title};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serves the analytical queries over a frozen [`DataIndex`].
///
/// Cloning is cheap; every clone shares the same index.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,
}

impl QueryEngine {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    /// Titles whose only director is also their only writer, and alive
    pub fn titles_by_same_director_writer_alive(&self) -> Vec<&Title> {
        director_writer::titles_by_same_director_writer_alive(&self.data_index)
    }

    /// Titles both people appear in; empty if either person is unknown
    pub fn titles_by_two_actors(&self, actor1: &str, actor2: &str) -> Vec<&Title> {
        common_actors::titles_by_two_actors(&self.data_index, actor1, actor2)
    }

    /// Year -> best title of that year for a genre
    pub fn best_titles_by_genre(&self, genre: &str) -> BTreeMap<u16, &Title> {
        best_by_genre::best_titles_by_genre(&self.data_index, genre)
    }
}
