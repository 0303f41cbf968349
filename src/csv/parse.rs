//! CSV format parsing implementation.
//!
//! This module handles the low-level parsing of CSV formatted text into a [`Table`].

use crate::DataFormat;
use crate::csv::config::CsvConfig;
use crate::error::{ParseError, ValueError};
use crate::table::Table;
use csv::{ReaderBuilder, StringRecord};

/// Parse the content of a CSV formatted file, returning a table.
///
/// The first record is the header. Empty cells become `None`.
pub fn csv_parse<S: AsRef<str>>(csv_text: S, config: &CsvConfig) -> Result<Table, ParseError> {
    let text = csv_text.as_ref();

    if text.trim().is_empty() {
        return Ok(Table::default());
    }

    // Validate configuration
    config.validate().map_err(|msg| {
        ParseError::without_position(
            DataFormat::Csv,
            ValueError::Syntax(format!("Invalid CSV configuration: {}", msg)),
        )
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .quote(config.quote)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .flexible(config.flexible)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| {
            ParseError::at_line(
                1,
                DataFormat::Csv,
                ValueError::Syntax(format!("Header parsing error: {}", e)),
            )
        })?
        .iter()
        .map(String::from)
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(ParseError::at_line(
            1,
            DataFormat::Csv,
            ValueError::Syntax("No headers found in CSV".to_string()),
        ));
    }

    let mut table = Table::new(headers);
    let mut line_number = 2; // Start counting from data lines

    for result in reader.records() {
        let record = result.map_err(|e| {
            // Extract position information from csv::Error if available
            let line = e
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(line_number);
            ParseError::at_line(
                line,
                DataFormat::Csv,
                ValueError::Syntax(format!("CSV parsing error: {}", e)),
            )
        })?;

        if let Some(position) = record.position() {
            line_number = position.line() as usize;
        }

        table.push_row(row_from_record(&record));
        line_number += 1;
    }

    Ok(table)
}

fn row_from_record(record: &StringRecord) -> crate::table::Row {
    record
        .iter()
        .map(|value| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_parse_basic() {
        let input = "atccode,drug\nA04AD,DIPHENHYDRAMINE\nS03AA,TETRACYCLINE";
        let table = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(table.columns(), &["atccode", "drug"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "drug"), Some("TETRACYCLINE"));
    }

    #[test]
    fn test_csv_parse_empty_cells_are_missing() {
        let input = "id,scientific_title,date,journal\nNCT04188184,Tranexamic Acid,27 April 2020,";
        let table = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(table.get(0, "journal"), None);
        assert_eq!(table.get(0, "date"), Some("27 April 2020"));
    }

    #[test]
    fn test_csv_parse_custom_delimiter() {
        let input = "id;title\n1;A title";
        let mut config = CsvConfig::new();
        config.set_delimiter(b';');

        let table = csv_parse(input, &config).unwrap();
        assert_eq!(table.get(0, "title"), Some("A title"));
    }

    #[test]
    fn test_csv_parse_trims_fields() {
        let input = "id, title \n 1 ,  Padded title  ";
        let table = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(table.columns(), &["id", "title"]);
        assert_eq!(table.get(0, "title"), Some("Padded title"));
    }

    #[test]
    fn test_csv_parse_empty_input() {
        let table = csv_parse("", &CsvConfig::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_csv_parse_header_only() {
        let table = csv_parse("atccode,drug\n", &CsvConfig::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["atccode", "drug"]);
    }

    #[test]
    fn test_csv_parse_flexible_mode() {
        let input = "id,title\n1,A title,Extra Field\n2";
        let mut config = CsvConfig::new();
        config.set_flexible(true);

        let table = csv_parse(input, &config).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.get(1, "title"), None);
    }

    #[test]
    fn test_csv_parse_malformed_strict() {
        let input = "id,title\n1,A title,Extra Field";
        let result = csv_parse(input, &CsvConfig::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_parse_with_quotes() {
        let input = r#"id,title
1,"Tranexamic acid, a review""#;
        let table = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(table.get(0, "title"), Some("Tranexamic acid, a review"));
    }

    #[test]
    fn test_csv_parse_line_numbers_in_errors() {
        let input = "id,title\n1,fine\n2"; // Missing field on line 3
        match csv_parse(input, &CsvConfig::new()) {
            Err(parse_err) if parse_err.line.is_some() => {
                assert_eq!(parse_err.line.unwrap(), 3);
                assert_eq!(parse_err.format, DataFormat::Csv);
            }
            _ => panic!("Expected ParseError with line number"),
        }
    }

    #[test]
    fn test_csv_parse_invalid_config() {
        let mut config = CsvConfig::new();
        config.set_delimiter(b'\r');
        assert!(csv_parse("a,b\n1,2", &config).is_err());
    }
}
