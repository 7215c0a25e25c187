//! Inventory loading from an uploaded perfume list
//!
//! The shop's list arrives as a `.csv` or `.xlsx` upload with a header row
//! containing a "perfumes" column (any casing). Loading never touches the
//! session itself; the caller replaces the held list only on success so a
//! bad upload leaves the previous inventory intact.

use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Header matched case-insensitively against the upload's columns
const INVENTORY_COLUMN: &str = "perfumes";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("unsupported file format \"{0}\", expected .csv or .xlsx")]
    UnsupportedFormat(String),

    #[error("the uploaded file must contain a column named \"perfumes\"")]
    MissingColumn,

    #[error("error reading the file: {0}")]
    Parse(String),
}

/// Extract the perfume names from an uploaded file
///
/// Returns the "perfumes" column's non-empty values in source order. The
/// format is picked from the filename extension; anything that is not
/// `.csv` or `.xlsx` fails fast with [`InventoryError::UnsupportedFormat`]
/// rather than silently keeping prior state.
pub fn load(filename: &str, bytes: &[u8]) -> Result<Vec<String>, InventoryError> {
    let extension = Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let perfumes = match extension.as_str() {
        "csv" => load_csv(bytes)?,
        "xlsx" => load_xlsx(bytes)?,
        other => return Err(InventoryError::UnsupportedFormat(format!(".{other}"))),
    };

    info!(file = %filename, count = perfumes.len(), "Inventory loaded");
    Ok(perfumes)
}

fn load_csv(bytes: &[u8]) -> Result<Vec<String>, InventoryError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| InventoryError::Parse(e.to_string()))?;
    let column = headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(INVENTORY_COLUMN))
        .ok_or(InventoryError::MissingColumn)?;

    let mut perfumes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InventoryError::Parse(e.to_string()))?;
        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                perfumes.push(value.to_string());
            }
        }
    }

    Ok(perfumes)
}

fn load_xlsx(bytes: &[u8]) -> Result<Vec<String>, InventoryError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| InventoryError::Parse(e.to_string()))?;

    // The original form reads the first sheet only
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InventoryError::Parse("workbook has no sheets".to_string()))?
        .map_err(|e| InventoryError::Parse(e.to_string()))?;

    let mut rows = range.rows();
    let headers = rows.next().ok_or(InventoryError::MissingColumn)?;
    let column = headers
        .iter()
        .position(|cell| cell.to_string().trim().eq_ignore_ascii_case(INVENTORY_COLUMN))
        .ok_or(InventoryError::MissingColumn)?;

    let mut perfumes = Vec::new();
    for row in rows {
        match row.get(column) {
            Some(Data::Empty) | None => {}
            Some(cell) => {
                let value = cell.to_string();
                let value = value.trim();
                if !value.is_empty() {
                    perfumes.push(value.to_string());
                }
            }
        }
    }

    Ok(perfumes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_lowercase_header() {
        let csv = b"perfumes\nChanel No.5\nBleu de Chanel\n";
        let perfumes = load("list.csv", csv).unwrap();
        assert_eq!(perfumes, vec!["Chanel No.5", "Bleu de Chanel"]);
    }

    #[test]
    fn test_csv_header_case_insensitive() {
        for header in ["Perfumes", "PERFUMES", "pErFuMeS"] {
            let csv = format!("{header}\nDior Sauvage\n");
            let perfumes = load("list.csv", csv.as_bytes()).unwrap();
            assert_eq!(perfumes, vec!["Dior Sauvage"]);
        }
    }

    #[test]
    fn test_csv_drops_empty_cells_keeps_order() {
        let csv = b"perfumes\nChanel No.5\n\nBleu de Chanel\n   \nAcqua di Gio\n";
        let perfumes = load("list.csv", csv).unwrap();
        assert_eq!(perfumes, vec!["Chanel No.5", "Bleu de Chanel", "Acqua di Gio"]);
    }

    #[test]
    fn test_csv_picks_matching_column_among_many() {
        let csv = b"price,Perfumes,stock\n120,Chanel No.5,3\n95,,1\n80,Terre d'Hermes,0\n";
        let perfumes = load("list.csv", csv).unwrap();
        assert_eq!(perfumes, vec!["Chanel No.5", "Terre d'Hermes"]);
    }

    #[test]
    fn test_csv_missing_column() {
        let csv = b"name,price\nChanel No.5,120\n";
        let err = load("list.csv", csv).unwrap_err();
        assert!(matches!(err, InventoryError::MissingColumn));
    }

    #[test]
    fn test_csv_invalid_utf8_is_parse_error() {
        let bytes = [b'p', b'e', b'r', 0xff, 0xfe, b'\n', b'x', b'\n'];
        let err = load("list.csv", &bytes).unwrap_err();
        assert!(matches!(err, InventoryError::Parse(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load("list.txt", b"perfumes\nChanel No.5\n").unwrap_err();
        assert!(matches!(err, InventoryError::UnsupportedFormat(ref ext) if ext == ".txt"));
    }

    #[test]
    fn test_no_extension() {
        let err = load("list", b"perfumes\n").unwrap_err();
        assert!(matches!(err, InventoryError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_xlsx_matches_header_and_drops_blanks() {
        // Fixture sheet: "Price, PERFUMES" header, a price-only row in the
        // middle, perfume names as inline strings.
        let bytes = include_bytes!("../tests/fixtures/perfume_list.xlsx");
        let perfumes = load("list.xlsx", bytes).unwrap();
        assert_eq!(perfumes, vec!["Chanel No.5", "Bleu de Chanel"]);
    }

    #[test]
    fn test_xlsx_garbage_is_parse_error() {
        let err = load("list.xlsx", b"this is not a zip archive").unwrap_err();
        assert!(matches!(err, InventoryError::Parse(_)));
    }
}
