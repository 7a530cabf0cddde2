/// CSV reading: turns a spend report into highlights, row by row.
///
/// Expected header: at least `civ`, `date` and `spend` (any order, any
/// case). Extra columns such as `developer_id` are ignored. `date` is a
/// zero-based day-of-year index; `spend` is a non-negative amount.
use super::aggregator::Aggregator;
use super::AnalysisError;
use crate::model::Highlights;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Highest accepted day-of-year index (leap years have 366 days).
pub const MAX_DAY_OF_YEAR: u32 = 365;

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    civ: usize,
    date: usize,
    spend: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, AnalysisError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(AnalysisError::MissingColumn(name))
        };
        Ok(Self {
            civ: find("civ")?,
            date: find("date")?,
            spend: find("spend")?,
        })
    }
}

/// Analyse the report at `path`.
///
/// `on_partial` is called with a snapshot every `rows_per_partial` rows
/// (never when `rows_per_partial` is zero). Returns `Ok(None)` if `cancel`
/// was raised before the file was fully read.
pub fn analyse_file(
    path: &Path,
    rows_per_partial: usize,
    cancel: &AtomicBool,
    mut on_partial: impl FnMut(Highlights),
) -> Result<Option<Highlights>, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| AnalysisError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader.headers().map_err(AnalysisError::Header)?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut aggregator = Aggregator::new();
    let mut record = csv::StringRecord::new();

    loop {
        if cancel.load(Ordering::Relaxed) {
            debug!("Analysis of {} cancelled after {} rows", path.display(), aggregator.rows());
            return Ok(None);
        }

        let more = reader
            .read_record(&mut record)
            .map_err(|source| AnalysisError::Read {
                line: source.position().map(|p| p.line()).unwrap_or(0),
                source,
            })?;
        if !more {
            break;
        }

        // Blank lines surface as a single empty field.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let (civ, day, spend) = parse_row(&record, columns)
            .map_err(|reason| AnalysisError::MalformedRow { line, reason })?;
        aggregator.add_row(civ, day, spend);

        if rows_per_partial > 0 && aggregator.rows() % rows_per_partial as u64 == 0 {
            on_partial(aggregator.snapshot());
        }
    }

    if aggregator.rows() == 0 {
        return Err(AnalysisError::Empty);
    }
    Ok(Some(aggregator.snapshot()))
}

/// Validate and extract the three required fields of one record.
fn parse_row(record: &csv::StringRecord, columns: Columns) -> Result<(&str, u32, f64), String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| format!("missing `{name}` field"))
    };

    let civ = field(columns.civ, "civ")?;
    if civ.is_empty() {
        return Err("empty `civ` value".to_string());
    }

    let raw_day = field(columns.date, "date")?;
    let day: u32 = raw_day
        .parse()
        .map_err(|_| format!("`date` must be a day-of-year number, got {raw_day:?}"))?;
    if day > MAX_DAY_OF_YEAR {
        return Err(format!("`date` {day} is outside 0..={MAX_DAY_OF_YEAR}"));
    }

    let raw_spend = field(columns.spend, "spend")?;
    let spend: f64 = raw_spend
        .parse()
        .map_err(|_| format!("`spend` must be a number, got {raw_spend:?}"))?;
    if !spend.is_finite() || spend < 0.0 {
        return Err(format!("`spend` must be a non-negative number, got {raw_spend}"));
    }

    Ok((civ, day, spend))
}
