//! Parser for the historical movie table.
//!
//! The table is a headed CSV written by pandas. Column order is not fixed,
//! so the header is resolved into indices first and every row is then read
//! through those indices. Cells pandas would have read as NaN come back as
//! `None`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Prefix of the one-hot genre flag columns (`genre_Action`, ...)
pub const GENRE_COLUMN_PREFIX: &str = "genre_";

const CAST_COLUMNS: [&str; 3] = ["cast_1", "cast_2", "cast_3"];

/// Required numeric columns; `genre_seasonal_score` shares the flag prefix
const TRACK_RECORD_COLUMNS: [&str; 4] = [
    "actor_track_record",
    "director_track_record",
    "franchise_track_record",
    "genre_seasonal_score",
];

/// Cell values pandas' `read_csv` treats as missing by default
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Header indices resolved once per file
struct Columns {
    score: usize,
    director: usize,
    franchise: usize,
    actor_track_record: usize,
    director_track_record: usize,
    franchise_track_record: usize,
    genre_seasonal_score: usize,
    release_year: Option<usize>,
    release_month: Option<usize>,
    genres_list: Option<usize>,
    cast: Vec<usize>,
    /// (genre name, column index)
    genres: Vec<(String, usize)>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, file: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| DataLoadError::MissingColumn {
                file: file.to_string(),
                column: name.to_string(),
            })
        };

        let genres = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !TRACK_RECORD_COLUMNS.contains(&h.trim()))
            .filter_map(|(idx, h)| {
                h.trim()
                    .strip_prefix(GENRE_COLUMN_PREFIX)
                    .map(|name| (name.to_string(), idx))
            })
            .collect();

        Ok(Self {
            score: require("score")?,
            director: require("director")?,
            franchise: require("franchise")?,
            actor_track_record: require(TRACK_RECORD_COLUMNS[0])?,
            director_track_record: require(TRACK_RECORD_COLUMNS[1])?,
            franchise_track_record: require(TRACK_RECORD_COLUMNS[2])?,
            genre_seasonal_score: require(TRACK_RECORD_COLUMNS[3])?,
            release_year: find("release_year"),
            release_month: find("release_month"),
            genres_list: find("genres_list"),
            cast: CAST_COLUMNS.iter().filter_map(|c| find(*c)).collect(),
            genres,
        })
    }

    fn presence(&self) -> ColumnPresence {
        ColumnPresence {
            release_year: self.release_year.is_some(),
            seasonal: self.genres_list.is_some() && self.release_month.is_some(),
        }
    }
}

/// Parse the historical table from a file on disk
pub fn parse_history(path: &Path) -> Result<(Vec<HistoricalMovie>, ColumnPresence)> {
    let file = File::open(path).map_err(|e| DataLoadError::from_io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_history_reader(file, &name)
}

/// Parse the historical table from any reader.
///
/// `source` names the input in error messages.
pub fn parse_history_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<(Vec<HistoricalMovie>, ColumnPresence)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers, source)?;

    let mut movies = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = idx + 2;
        movies.push(parse_row(&record, &columns, source, line)?);
    }

    Ok((movies, columns.presence()))
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    file: &str,
    line: usize,
) -> Result<HistoricalMovie> {
    let ctx = RowContext { record, file, line };

    let cast = columns
        .cast
        .iter()
        .filter_map(|&idx| ctx.text(idx))
        .map(|name| name.trim().to_string())
        .collect();

    let mut genres = BTreeSet::new();
    for (name, idx) in &columns.genres {
        if ctx.flag(*idx, name)? {
            genres.insert(name.clone());
        }
    }

    Ok(HistoricalMovie {
        score: ctx.number(columns.score, "score")?,
        release_year: match columns.release_year {
            Some(idx) => ctx.whole(idx, "release_year")?.map(|y| y as Year),
            None => None,
        },
        release_month: match columns.release_month {
            Some(idx) => ctx.whole(idx, "release_month")?.map(|m| m as Month),
            None => None,
        },
        cast,
        director: ctx.text(columns.director).map(str::to_string),
        franchise: ctx.text(columns.franchise).map(str::to_string),
        genres,
        actor_track_record: ctx.number(columns.actor_track_record, "actor_track_record")?,
        director_track_record: ctx.number(columns.director_track_record, "director_track_record")?,
        franchise_track_record: ctx
            .number(columns.franchise_track_record, "franchise_track_record")?,
        genre_seasonal_score: ctx.number(columns.genre_seasonal_score, "genre_seasonal_score")?,
    })
}

/// Borrowed view of one record with the location needed for errors
struct RowContext<'a> {
    record: &'a csv::StringRecord,
    file: &'a str,
    line: usize,
}

impl<'a> RowContext<'a> {
    /// Raw cell text, `None` for missing cells
    fn text(&self, idx: usize) -> Option<&'a str> {
        self.record.get(idx).filter(|value| !is_missing(value))
    }

    fn error(&self, reason: String) -> DataLoadError {
        DataLoadError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason,
        }
    }

    fn number(&self, idx: usize, field: &str) -> Result<Option<f64>> {
        match self.text(idx) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse::<f64>()
                .map(|v| if v.is_nan() { None } else { Some(v) })
                .map_err(|e| self.error(format!("Invalid {}: '{}' ({})", field, value, e))),
        }
    }

    /// Integer column that pandas may have written as a float (`2019.0`)
    fn whole(&self, idx: usize, field: &str) -> Result<Option<i64>> {
        match self.number(idx, field)? {
            None => Ok(None),
            Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
            Some(v) => Err(self.error(format!("Invalid {}: {} is not a whole number", field, v))),
        }
    }

    fn flag(&self, idx: usize, genre: &str) -> Result<bool> {
        match self.text(idx).map(str::trim) {
            None => Ok(false),
            Some(value) => parse_flag(value).ok_or_else(|| {
                self.error(format!(
                    "Invalid {}{} flag: '{}'",
                    GENRE_COLUMN_PREFIX, genre, value
                ))
            }),
        }
    }
}

fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value.trim())
}

/// Parse a 0/1 indicator as pandas or numpy would have written it
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "1.0" | "true" | "True" | "TRUE" => Some(true),
        "0" | "0.0" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "title,score,release_year,release_month,cast_1,cast_2,cast_3,director,franchise,genres_list,genre_Action,genre_Drama,actor_track_record,director_track_record,franchise_track_record,genre_seasonal_score";

    fn parse(body: &str) -> Result<(Vec<HistoricalMovie>, ColumnPresence)> {
        let csv = format!("{}\n{}", HEADER, body);
        parse_history_reader(csv.as_bytes(), "test.csv")
    }

    #[test]
    fn test_parse_full_row() {
        let (movies, presence) = parse(
            "Heat,82.5,1995.0,12,Al Pacino, Robert De Niro ,,Michael Mann,,\"['Action', 'Drama']\",1,1.0,80,81,70,75\n",
        )
        .unwrap();

        assert_eq!(movies.len(), 1);
        let movie = &movies[0];
        assert_eq!(movie.score, Some(82.5));
        assert_eq!(movie.release_year, Some(1995));
        assert_eq!(movie.release_month, Some(12));
        assert_eq!(movie.cast, vec!["Al Pacino", "Robert De Niro"]);
        assert_eq!(movie.director.as_deref(), Some("Michael Mann"));
        assert_eq!(movie.franchise, None);
        assert!(movie.has_genre("Action"));
        assert!(movie.has_genre("Drama"));
        assert_eq!(movie.franchise_track_record, Some(70.0));
        assert!(presence.release_year);
        assert!(presence.seasonal);
    }

    #[test]
    fn test_missing_cells_become_none() {
        let (movies, _) = parse("Untitled,nan,,,,,,Someone,NA,[],0,0,,,,\n").unwrap();

        let movie = &movies[0];
        assert_eq!(movie.score, None);
        assert_eq!(movie.release_year, None);
        assert!(movie.cast.is_empty());
        assert_eq!(movie.franchise, None);
        assert!(movie.genres.is_empty());
        assert_eq!(movie.actor_track_record, None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "score,director\n50,Someone\n";
        let err = parse_history_reader(csv.as_bytes(), "short.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_seasonal_needs_genres_list() {
        let csv = "score,release_month,director,franchise,genre_Action,actor_track_record,director_track_record,franchise_track_record,genre_seasonal_score\n\
                   60,5,A,,1,1,1,1,1\n";
        let (movies, presence) = parse_history_reader(csv.as_bytes(), "t.csv").unwrap();
        assert_eq!(movies.len(), 1);
        assert!(!presence.seasonal);
        assert!(!presence.release_year);
    }

    #[test]
    fn test_seasonal_score_column_is_not_a_genre() {
        let csv = "score,director,franchise,genre_Action,actor_track_record,director_track_record,franchise_track_record,genre_seasonal_score\n\
                   70,A,,1,60,61,62,63.5\n";
        let (movies, _) = parse_history_reader(csv.as_bytes(), "t.csv").unwrap();

        let movie = &movies[0];
        assert_eq!(movie.genre_seasonal_score, Some(63.5));
        assert!(movie.has_genre("Action"));
        assert!(!movie.has_genre("seasonal_score"));
        assert_eq!(movie.genres.len(), 1);
    }

    #[test]
    fn test_pandas_na_spellings() {
        for na in ["#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN", "<NA>"] {
            assert!(is_missing(na), "{na} should read as missing");
        }
        let (movies, _) = parse("X,1.#QNAN,#NA,,,,,D,-1.#IND,[],0,0,1,1,1,1\n").unwrap();
        assert_eq!(movies[0].score, None);
        assert_eq!(movies[0].release_year, None);
        assert_eq!(movies[0].franchise, None);
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = parse("X,great,2000,1,,,,D,,[],0,0,1,1,1,1\n").unwrap_err();
        match err {
            DataLoadError::ParseError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("0.0"), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }
}
