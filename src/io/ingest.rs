//! Experimental data ingest.
//!
//! Turns either a CSV file or four pasted text columns into a validated
//! [`TimeSeries`].
//!
//! CSV schema (header row required, extra columns ignored):
//!
//! | column     | alias       | meaning                      |
//! |------------|-------------|------------------------------|
//! | `tiempo`   | `time`      | sampling time (h)            |
//! | `biomasa`  | `biomass`   | biomass (g/L)                |
//! | `sustrato` | `substrate` | substrate (g/L)              |
//! | `oxigeno`  | `oxygen`    | dissolved oxygen (%)         |
//!
//! A kinetics sheet has a handful of rows and every row matters, so a bad
//! cell fails the whole ingest instead of being skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{SeriesSource, TimeSeries};
use crate::error::{CoreResult, KineticsError};
use crate::io::parse::parse_series;

/// Column name plus its accepted alias.
const COLUMNS: [(&str, &str); 4] = [
    ("tiempo", "time"),
    ("biomasa", "biomass"),
    ("sustrato", "substrate"),
    ("oxigeno", "oxygen"),
];

/// Reference data set: a *Pseudomonas* batch culture sampled over 72 h.
pub const DEMO_TIME: &str = "0\n4\n8\n12\n16\n20\n24\n48\n72";
pub const DEMO_BIOMASS: &str = "0.26567\n2.3\n5.5333\n5.6\n5.733\n5.2667\n5.4467\n5.5677\n3.43";
pub const DEMO_SUBSTRATE: &str = "10\n9.21\n8.7\n2.98\n0\n0\n0\n0\n0";
pub const DEMO_OXYGEN: &str = "100\n71.1\n8.0\n2.8\n4.8\n56.3\n62.2\n100\n100";

/// Load a time series from whichever source the run was configured with.
pub fn load_series(source: &SeriesSource) -> CoreResult<TimeSeries> {
    match source {
        SeriesSource::Text {
            time,
            biomass,
            substrate,
            oxygen,
        } => series_from_text(time, biomass, substrate, oxygen),
        SeriesSource::Csv(path) => read_series_csv(path),
        SeriesSource::Demo => demo_series(),
    }
}

/// Parse four delimited text columns.
pub fn series_from_text(time: &str, biomass: &str, substrate: &str, oxygen: &str) -> CoreResult<TimeSeries> {
    TimeSeries::new(
        parse_series(time)?,
        parse_series(biomass)?,
        parse_series(substrate)?,
        parse_series(oxygen)?,
    )
}

pub fn demo_series() -> CoreResult<TimeSeries> {
    series_from_text(DEMO_TIME, DEMO_BIOMASS, DEMO_SUBSTRATE, DEMO_OXYGEN)
}

/// Read a CSV file from disk.
pub fn read_series_csv(path: &Path) -> CoreResult<TimeSeries> {
    let file = File::open(path).map_err(|source| KineticsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let series = read_series_from(file)?;
    debug!(path = %path.display(), samples = series.len(), "loaded CSV series");
    Ok(series)
}

/// Read CSV data from any reader (file, stdin, in-memory buffer).
pub fn read_series_from<R: Read>(reader: R) -> CoreResult<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);

    let mut indices = [0usize; 4];
    for (slot, (name, alias)) in indices.iter_mut().zip(COLUMNS) {
        *slot = header_map
            .get(name)
            .or_else(|| header_map.get(alias))
            .copied()
            .ok_or(KineticsError::MissingColumn(name))?;
    }

    let mut columns: [Vec<f64>; 4] = Default::default();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        // +2: records start after the header and lines are 1-based.
        let line = row_idx + 2;
        for ((col, &idx), (name, _)) in columns.iter_mut().zip(&indices).zip(COLUMNS) {
            col.push(parse_cell(&record, idx, name, line)?);
        }
    }

    let [time, biomass, substrate, oxygen] = columns;
    TimeSeries::new(time, biomass, substrate, oxygen)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_cell(record: &StringRecord, idx: usize, column: &'static str, line: usize) -> CoreResult<f64> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| KineticsError::CsvCell {
            line,
            column,
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_spanish_column_names() {
        let data = "tiempo,biomasa,sustrato,oxigeno\n0,0.5,10,100\n4,1.0,9,80\n";
        let ts = read_series_from(data.as_bytes()).unwrap();
        assert_eq!(ts.time(), &[0.0, 4.0]);
        assert_eq!(ts.biomass(), &[0.5, 1.0]);
        assert_eq!(ts.oxygen(), &[100.0, 80.0]);
    }

    #[test]
    fn accepts_aliases_bom_and_column_order() {
        let data = "\u{feff}Oxygen, Substrate ,extra,Biomass,Time\n100,10,x,0.5,0\n90,8,y,0.9,2\n";
        let ts = read_series_from(data.as_bytes()).unwrap();
        assert_eq!(ts.time(), &[0.0, 2.0]);
        assert_eq!(ts.substrate(), &[10.0, 8.0]);
    }

    #[test]
    fn missing_column_is_named() {
        let data = "tiempo,biomasa,sustrato\n0,1,2\n";
        let err = read_series_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, KineticsError::MissingColumn("oxigeno")));
    }

    #[test]
    fn bad_cell_fails_whole_ingest() {
        let data = "tiempo,biomasa,sustrato,oxigeno\n0,1,2,3\n4,oops,2,3\n";
        let err = read_series_from(data.as_bytes()).unwrap_err();
        assert!(format!("{err}").contains("line 3"));
    }

    #[test]
    fn demo_series_is_valid() {
        let ts = demo_series().unwrap();
        assert_eq!(ts.len(), 9);
        assert_eq!(ts.time()[8], 72.0);
    }

    #[test]
    fn text_source_length_mismatch() {
        let err = series_from_text("0,1,2", "1,2", "1,2,3", "1,2,3").unwrap_err();
        assert!(matches!(err, KineticsError::ShapeMismatch { .. }));
    }
}
