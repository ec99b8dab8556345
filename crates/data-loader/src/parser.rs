//! Record decoders for the IMDb TSV files.
//!
//! One function per schema, each taking an already tokenized row and its
//! line number:
//! - name.basics.tsv: nconst, primaryName, birthYear, deathYear, primaryProfession, knownForTitles
//! - title.basics.tsv: tconst, titleType, primaryTitle, originalTitle, isAdult, startYear, endYear, runtimeMinutes, genres
//! - title.crew.tsv: tconst, directors, writers
//! - title.principals.tsv: tconst, ordering, nconst, category, job, characters
//! - title.ratings.tsv: tconst, averageRating, numVotes
//!
//! These functions do no I/O. Reading and tokenizing lives in
//! [`crate::ingest`], which logs and skips rows that fail here.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::StringRecord;
use std::str::FromStr;

/// Token the datasets use for a missing value
pub const NULL_MARKER: &str = "\\N";

pub const PERSON_FIELDS: usize = 6;
pub const TITLE_BASIC_FIELDS: usize = 9;
pub const TITLE_CREW_FIELDS: usize = 3;
pub const TITLE_PRINCIPAL_FIELDS: usize = 3;
pub const TITLE_RATING_FIELDS: usize = 3;

/// Parse a row of name.basics.tsv
pub fn parse_person(line: usize, record: &StringRecord) -> Result<Person> {
    require_fields(line, record, PERSON_FIELDS)?;

    Ok(Person {
        nconst: field(record, 0).to_string(),
        primary_name: field(record, 1).to_string(),
        birth_year: decode_optional(line, record, 2, "birthYear")?,
        death_year: decode_optional(line, record, 3, "deathYear")?,
        primary_profession: decode_list(field(record, 4)),
        known_for_titles: decode_list(field(record, 5)),
    })
}

/// Parse a row of title.basics.tsv
///
/// Crew and rating fields start empty; later loads fill them in.
pub fn parse_title_basic(line: usize, record: &StringRecord) -> Result<Title> {
    require_fields(line, record, TITLE_BASIC_FIELDS)?;

    Ok(Title {
        tconst: field(record, 0).to_string(),
        title_type: field(record, 1).to_string(),
        primary_title: field(record, 2).to_string(),
        original_title: field(record, 3).to_string(),
        is_adult: field(record, 4).trim() == "1",
        start_year: decode_optional(line, record, 5, "startYear")?,
        end_year: decode_optional(line, record, 6, "endYear")?,
        runtime_minutes: decode_optional(line, record, 7, "runtimeMinutes")?,
        genres: decode_list(field(record, 8)),
        directors: Vec::new(),
        writers: Vec::new(),
        average_rating: None,
        num_votes: None,
    })
}

/// Parse a row of title.crew.tsv
pub fn parse_title_crew(line: usize, record: &StringRecord) -> Result<TitleCrew> {
    require_fields(line, record, TITLE_CREW_FIELDS)?;

    Ok(TitleCrew {
        tconst: field(record, 0).to_string(),
        directors: decode_list(field(record, 1)),
        writers: decode_list(field(record, 2)),
    })
}

/// Parse a row of title.principals.tsv
///
/// Only the first three columns are required; job and characters are
/// missing on a lot of rows.
pub fn parse_title_principal(line: usize, record: &StringRecord) -> Result<TitlePrincipal> {
    require_fields(line, record, TITLE_PRINCIPAL_FIELDS)?;

    Ok(TitlePrincipal {
        tconst: field(record, 0).to_string(),
        ordering: decode_optional(line, record, 1, "ordering")?,
        nconst: field(record, 2).to_string(),
        category: decode_text(field(record, 3)),
        job: decode_text(field(record, 4)),
        characters: decode_text(field(record, 5)),
    })
}

/// Parse a row of title.ratings.tsv
pub fn parse_title_rating(line: usize, record: &StringRecord) -> Result<TitleRating> {
    require_fields(line, record, TITLE_RATING_FIELDS)?;

    Ok(TitleRating {
        tconst: field(record, 0).to_string(),
        average_rating: decode_finite(line, record, 1, "averageRating")?,
        num_votes: decode_optional(line, record, 2, "numVotes")?,
    })
}

/// Join a row back into its tab-separated form for logging
pub fn raw_row(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join("\t")
}

fn require_fields(line: usize, record: &StringRecord, expected: usize) -> Result<()> {
    if record.len() < expected {
        return Err(DataLoadError::MalformedRecord {
            line,
            expected,
            found: record.len(),
            raw: raw_row(record),
        });
    }
    Ok(())
}

/// Field text, or "" past the end of a short row
fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn is_null(value: &str) -> bool {
    value.is_empty() || value == NULL_MARKER
}

/// Decode an optional numeric column
fn decode_optional<T: FromStr>(
    line: usize,
    record: &StringRecord,
    index: usize,
    name: &'static str,
) -> Result<Option<T>> {
    let value = field(record, index).trim();
    if is_null(value) {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| DataLoadError::FieldDecode {
            line,
            field: name,
            index,
            value: value.to_string(),
        })
}

/// Decode an optional float column, rejecting NaN and infinities
fn decode_finite(
    line: usize,
    record: &StringRecord,
    index: usize,
    name: &'static str,
) -> Result<Option<f64>> {
    match decode_optional::<f64>(line, record, index, name)? {
        Some(value) if !value.is_finite() => Err(DataLoadError::FieldDecode {
            line,
            field: name,
            index,
            value: field(record, index).trim().to_string(),
        }),
        value => Ok(value),
    }
}

/// Decode a comma-joined list column
///
/// Example: "Documentary,Short" -> vec!["Documentary", "Short"]
///          "\N" -> vec![]
fn decode_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if is_null(value) {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn decode_text(value: &str) -> Option<String> {
    if is_null(value.trim()) {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_person() {
        let record = row(&[
            "nm0000001",
            "Fred Astaire",
            "1899",
            "1987",
            "actor,soundtrack,miscellaneous",
            "tt0072308,tt0050419",
        ]);
        let person = parse_person(2, &record).unwrap();

        assert_eq!(person.nconst, "nm0000001");
        assert_eq!(person.birth_year, Some(1899));
        assert_eq!(person.death_year, Some(1987));
        assert_eq!(person.primary_profession.len(), 3);
        assert_eq!(person.known_for_titles, vec!["tt0072308", "tt0050419"]);
    }

    #[test]
    fn test_null_marker_decodes_to_absent() {
        let record = row(&["nm0000002", "Lauren Bacall", "1924", "\\N", "\\N", ""]);
        let person = parse_person(3, &record).unwrap();

        assert_eq!(person.death_year, None);
        assert!(person.is_alive());
        assert!(person.primary_profession.is_empty());
        assert!(person.known_for_titles.is_empty());
    }

    #[test]
    fn test_short_row_is_malformed() {
        let record = row(&["nm0000003", "Short Row", "1950"]);
        let err = parse_person(7, &record).unwrap_err();

        match err {
            DataLoadError::MalformedRecord {
                line,
                expected,
                found,
                raw,
            } => {
                assert_eq!(line, 7);
                assert_eq!(expected, PERSON_FIELDS);
                assert_eq!(found, 3);
                assert_eq!(raw, "nm0000003\tShort Row\t1950");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_is_field_decode_error() {
        let record = row(&["nm0000004", "Bad Year", "19x9", "\\N", "actor", "\\N"]);
        let err = parse_person(9, &record).unwrap_err();

        match err {
            DataLoadError::FieldDecode {
                line,
                field,
                index,
                value,
            } => {
                assert_eq!(line, 9);
                assert_eq!(field, "birthYear");
                assert_eq!(index, 2);
                assert_eq!(value, "19x9");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse_person(9, &record).unwrap_err().is_recoverable());
    }

    #[test]
    fn test_parse_title_basic() {
        let record = row(&[
            "tt0000001",
            "short",
            "Carmencita",
            "Carmencita",
            "0",
            "1894",
            "\\N",
            "1",
            "Documentary,Short",
        ]);
        let title = parse_title_basic(2, &record).unwrap();

        assert_eq!(title.tconst, "tt0000001");
        assert!(!title.is_adult);
        assert_eq!(title.start_year, Some(1894));
        assert_eq!(title.end_year, None);
        assert_eq!(title.runtime_minutes, Some(1));
        assert_eq!(title.genres, vec!["Documentary", "Short"]);
        assert!(title.directors.is_empty());
        assert_eq!(title.num_votes, None);
    }

    #[test]
    fn test_adult_flag() {
        let mut fields = vec!["tt1", "movie", "A", "A", "1", "\\N", "\\N", "\\N", "\\N"];
        assert!(parse_title_basic(2, &row(&fields)).unwrap().is_adult);

        fields[4] = "yes";
        assert!(!parse_title_basic(2, &row(&fields)).unwrap().is_adult);
    }

    #[test]
    fn test_parse_title_crew() {
        let crew = parse_title_crew(2, &row(&["tt1", "nm1,nm2", "\\N"])).unwrap();
        assert_eq!(crew.directors, vec!["nm1", "nm2"]);
        assert!(crew.writers.is_empty());

        assert!(parse_title_crew(3, &row(&["tt1", "nm1"])).is_err());
    }

    #[test]
    fn test_parse_title_principal() {
        let principal = parse_title_principal(
            2,
            &row(&["tt0000001", "1", "nm1588970", "self", "\\N", "[\"Self\"]"]),
        )
        .unwrap();
        assert_eq!(principal.ordering, Some(1));
        assert_eq!(principal.nconst, "nm1588970");
        assert_eq!(principal.category.as_deref(), Some("self"));
        assert_eq!(principal.job, None);

        // Only tconst, ordering and nconst are required
        let minimal = parse_title_principal(3, &row(&["tt2", "2", "nm2"])).unwrap();
        assert_eq!(minimal.characters, None);

        assert!(parse_title_principal(4, &row(&["tt2", "x", "nm2"])).is_err());
    }

    #[test]
    fn test_parse_title_rating() {
        let rating = parse_title_rating(2, &row(&["tt0000001", "5.6", "1600"])).unwrap();
        assert_eq!(rating.average_rating, Some(5.6));
        assert_eq!(rating.num_votes, Some(1600));

        let err = parse_title_rating(3, &row(&["tt0000001", "5.6", "many"])).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::FieldDecode { field: "numVotes", .. }
        ));
    }

    #[test]
    fn test_non_finite_rating_is_rejected() {
        for text in ["NaN", "inf", "-inf"] {
            let err = parse_title_rating(5, &row(&["tt0000001", text, "10"])).unwrap_err();
            match err {
                DataLoadError::FieldDecode { line, field, value, .. } => {
                    assert_eq!(line, 5);
                    assert_eq!(field, "averageRating");
                    assert_eq!(value, text);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_list_never_yields_empty_entry() {
        assert!(decode_list("").is_empty());
        assert!(decode_list("\\N").is_empty());
        assert_eq!(decode_list("Drama"), vec!["Drama"]);
        assert_eq!(decode_list("Drama,,Comedy"), vec!["Drama", "Comedy"]);
    }
}
