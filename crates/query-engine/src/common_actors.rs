//! Titles two given people both appear in.

use data_loader::{DataIndex, Title};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

/// Every title whose cast contains both `actor1` and `actor2`.
///
/// Returns an empty list, not an error, when either id is not a loaded
/// person. Passing the same id twice lists that person's titles.
#[instrument(skip(index))]
pub fn titles_by_two_actors<'a>(index: &'a DataIndex, actor1: &str, actor2: &str) -> Vec<&'a Title> {
    if !index.contains_person(actor1) || !index.contains_person(actor2) {
        warn!("One or both actor IDs not found");
        return Vec::new();
    }

    let mut titles: Vec<&Title> = index
        .title_actors()
        .par_iter()
        .filter(|(_, cast)| cast.contains(actor1) && cast.contains(actor2))
        .filter_map(|(tconst, _)| index.get_title(tconst))
        .collect();

    titles.sort_unstable_by(|a, b| a.tconst.cmp(&b.tconst));
    debug!(count = titles.len(), "Titles shared by both actors");
    titles
}
