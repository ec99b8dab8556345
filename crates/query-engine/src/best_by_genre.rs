//! Best title per start year within a genre.
//!
//! ## Algorithm
//! 1. Keep titles tagged with the genre that have a start year, a non-zero
//!    vote count and a non-zero average rating
//! 2. Group them by start year
//! 3. Within a year the most voted title wins; equal votes go to the higher
//!    average rating, then to the smaller title id
//!
//! The grouping runs as a rayon fold/reduce: each worker keeps its own
//! year -> best map and the maps are merged pairwise.

use data_loader::{DataIndex, Title};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

#[instrument(skip(index))]
pub fn best_titles_by_genre<'a>(index: &'a DataIndex, genre: &str) -> BTreeMap<u16, &'a Title> {
    let best: HashMap<u16, &Title> = index
        .titles()
        .par_iter()
        .filter_map(|(_, title)| qualifying_year(title, genre).map(|year| (year, title)))
        .fold(HashMap::new, |mut local, (year, title)| {
            keep_better(&mut local, year, title);
            local
        })
        .reduce(HashMap::new, |mut acc, local| {
            for (year, title) in local {
                keep_better(&mut acc, year, title);
            }
            acc
        });

    debug!(years = best.len(), "Best titles by year");
    best.into_iter().collect()
}

/// Start year of a title eligible for the ranking
fn qualifying_year(title: &Title, genre: &str) -> Option<u16> {
    if !title.has_genre(genre) {
        return None;
    }
    let year = title.start_year.filter(|&year| year != 0)?;
    let votes = title.num_votes.unwrap_or(0);
    let rating = title.average_rating.unwrap_or(0.0);

    (votes > 0 && rating != 0.0).then_some(year)
}

/// Ranking within one year; `Greater` means `a` beats `b`
fn compare(a: &Title, b: &Title) -> Ordering {
    a.num_votes
        .cmp(&b.num_votes)
        .then_with(|| {
            let a_rating = a.average_rating.unwrap_or(0.0);
            let b_rating = b.average_rating.unwrap_or(0.0);
            a_rating.total_cmp(&b_rating)
        })
        .then_with(|| b.tconst.cmp(&a.tconst))
}

fn keep_better<'a>(best: &mut HashMap<u16, &'a Title>, year: u16, title: &'a Title) {
    match best.entry(year) {
        Entry::Occupied(mut current) => {
            if compare(title, current.get()) == Ordering::Greater {
                current.insert(title);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(title);
        }
    }
}
