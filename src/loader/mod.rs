//! Incident dataset loading.
//!
//! Reads a delimited text file with a header row, parses the start date
//! of every record and derives its year. Unparseable dates become `None`
//! instead of aborting the load.

pub mod dates;

pub use dates::parse_start_date;

use crate::error::{PipelineError, Result};
use crate::models::Incident;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Options controlling how the dataset is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Header of the start date column.
    pub date_column: String,
    /// Header of the incident type column.
    pub type_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_column: "start_date".to_string(),
            type_column: "incident_type".to_string(),
        }
    }
}

impl TryFrom<&crate::config::InputConfig> for LoadOptions {
    type Error = PipelineError;

    fn try_from(config: &crate::config::InputConfig) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            date_column: config.date_column.clone(),
            type_column: config.type_column.clone(),
        })
    }
}

/// Loaded incidents plus load diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub incidents: Vec<Incident>,
    /// Records whose start date could not be parsed.
    pub unparsed_dates: usize,
    /// Records with an empty incident type.
    pub missing_types: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

/// Load incidents from a file.
pub fn load_incidents(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound(path.to_path_buf()));
    }

    info!("Loading incidents from {}", path.display());

    let file = std::fs::File::open(path).map_err(|e| PipelineError::Csv {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    let dataset = load_from_reader(file, options).map_err(|e| match e {
        PipelineError::Csv { source, .. } => PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!(
        "Loaded {} incidents ({} without a parseable date)",
        dataset.len(),
        dataset.unparsed_dates
    );
    if dataset.missing_types > 0 {
        warn!("{} incidents have no incident type", dataset.missing_types);
    }

    Ok(dataset)
}

/// Load incidents from any reader, e.g. an in-memory buffer.
pub fn load_from_reader<R: Read>(input: R, options: &LoadOptions) -> Result<Dataset> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(input);

    read_records(reader, options).map_err(|e| match e {
        LoadError::Csv(source) => PipelineError::Csv {
            path: "<reader>".into(),
            source,
        },
        LoadError::MissingColumn(name) => PipelineError::MissingColumn(name),
    })
}

enum LoadError {
    Csv(csv::Error),
    MissingColumn(String),
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e)
    }
}

fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    options: &LoadOptions,
) -> std::result::Result<Dataset, LoadError> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    debug!("Columns: {:?}", headers);

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let date_idx = column(options.date_column.as_str())?;
    let type_idx = column(options.type_column.as_str())?;

    let mut dataset = Dataset::default();

    for result in reader.records() {
        let record = result?;

        let start_date = record.get(date_idx).and_then(parse_start_date);
        if start_date.is_none() {
            dataset.unparsed_dates += 1;
        }

        let incident_type = record
            .get(type_idx)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);
        if incident_type.is_none() {
            dataset.missing_types += 1;
        }

        dataset.incidents.push(Incident::new(incident_type, start_date));
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_reader() {
        let csv = "id,incident_type,start_date\n\
                   1,Ransomware,05/03/2020\n\
                   2,Data theft,2021-07-14\n\
                   3,Espionage,not a date\n\
                   4,,2019-01-01\n";

        let dataset = load_from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.unparsed_dates, 1);
        assert_eq!(dataset.missing_types, 1);

        let years: Vec<Option<i32>> = dataset.incidents.iter().map(|i| i.year).collect();
        assert_eq!(years, vec![Some(2020), Some(2021), None, Some(2019)]);
        assert_eq!(
            dataset.incidents[0].start_date,
            chrono::NaiveDate::from_ymd_opt(2020, 3, 5)
        );
        assert_eq!(dataset.incidents[3].incident_type, None);
    }

    #[test]
    fn test_quoted_fields_and_short_rows() {
        let csv = "incident_type,start_date,notes\n\
                   \"Hijacking, with misuse\",2018-02-01,x\n\
                   Disruption\n";

        let dataset = load_from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.incidents[0].incident_type.as_deref(),
            Some("Hijacking, with misuse")
        );
        assert_eq!(dataset.incidents[1].year, None);
    }

    #[test]
    fn test_missing_column() {
        let csv = "incident_type,date\nRansomware,2020-01-01\n";
        let err = load_from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "start_date"));
    }

    #[test]
    fn test_custom_columns_and_delimiter() {
        let options = LoadOptions {
            delimiter: b';',
            date_column: "begin".to_string(),
            type_column: "kind".to_string(),
        };
        let csv = "kind;begin\nPhishing;01.02.2016\n";

        let dataset = load_from_reader(csv.as_bytes(), &options).unwrap();
        assert_eq!(dataset.incidents[0].year, Some(2016));
    }

    #[test]
    fn test_options_from_input_config() {
        let mut input = crate::config::InputConfig::default();
        input.delimiter = ";".to_string();
        let options = LoadOptions::try_from(&input).unwrap();
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.date_column, "start_date");

        input.delimiter = ";;".to_string();
        assert!(matches!(
            LoadOptions::try_from(&input),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_incidents_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "incident_type,start_date").unwrap();
        writeln!(file, "Ransomware,2020-01-01").unwrap();
        writeln!(file, "Ransomware,2020-06-01").unwrap();

        let dataset = load_incidents(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_incidents(Path::new("does/not/exist.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound(_)));
    }
}
