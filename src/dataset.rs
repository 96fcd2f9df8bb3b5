//! The fixed sailboat list the search page filters over.
//!
//! The list ships inside the binary (`sailboats.csv`) and is parsed at most
//! once per thread; every caller after the first gets the same shared copy.

use log::{debug, info};
use once_cell::unsync::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

const EMBEDDED_CSV: &str = include_str!("sailboats.csv");

/// One sailboat class as listed in the dataset.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Sailboat {
    pub id: String,
    pub name: String,
    pub designer: String,
    pub builder: String,
    /// Year the first hull was launched, when known.
    pub first_built: Option<u16>,
    /// Length overall in feet.
    pub loa_ft: Option<f32>,
    pub rig: String,
    pub hull: String,
}

/// The loaded dataset, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SailData {
    pub data: Vec<Rc<Sailboat>>,
}

impl SailData {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// The CSV source itself could not be read (bad header, invalid UTF-8, ...).
    Csv(String),
    /// Parsing finished but no usable row was left.
    Empty,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Csv(msg) => write!(f, "Failed to read sailboat data: {}", msg),
            DatasetError::Empty => write!(f, "Sailboat data contains no usable rows"),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Csv(err.to_string())
    }
}

/// Parse a headed CSV of sailboats.
///
/// Rows that fail to deserialize, have a blank `id` or `name`, or repeat an
/// earlier `id` are skipped. Only a broken source or an empty result is an
/// error.
pub fn read_sailboats_from_csv_str(csv_content: &str) -> Result<SailData, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    // Surface a malformed header as a hard failure before touching rows.
    reader.headers()?;

    let mut seen_ids = HashSet::new();
    let mut data = Vec::new();

    for (i, record) in reader.deserialize::<Sailboat>().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let boat = match record {
            Ok(boat) => boat,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Warning: skipping line {}: {}", line, e);
                continue;
            }
        };

        if boat.id.is_empty() || boat.name.is_empty() {
            debug!("Warning: line {} is missing an id or name, skipping", line);
            continue;
        }

        if !seen_ids.insert(boat.id.clone()) {
            debug!(
                "Warning: Duplicate ID '{}' found on line {}, skipping",
                boat.id, line
            );
            continue;
        }

        data.push(Rc::new(boat));
    }

    if data.is_empty() {
        return Err(DatasetError::Empty);
    }

    info!("Successfully loaded {} sailboats from CSV content", data.len());
    Ok(SailData { data })
}

thread_local! {
    static SAIL_DATA: OnceCell<Rc<SailData>> = OnceCell::new();
}

/// The embedded dataset, parsed on first use and shared afterwards.
pub fn get_sail_data() -> Result<Rc<SailData>, DatasetError> {
    SAIL_DATA.with(|cell| {
        cell.get_or_try_init(|| read_sailboats_from_csv_str(EMBEDDED_CSV).map(Rc::new))
            .cloned()
    })
}
