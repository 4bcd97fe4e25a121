//! Load past prepayment history from CSV
//!
//! Expected columns: `date` (YYYY-MM-DD) and `amount` (currency).

use super::PastPrepayment;
use chrono::NaiveDate;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: NaiveDate,
    amount: f64,
}

impl CsvRow {
    fn to_prepayment(self, line: usize) -> Result<PastPrepayment, Box<dyn Error>> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(format!("Invalid prepayment amount {} on row {}", self.amount, line).into());
        }
        Ok(PastPrepayment::new(self.date, self.amount))
    }
}

/// Load past prepayments from a CSV file
pub fn load_prepayments<P: AsRef<Path>>(path: P) -> Result<Vec<PastPrepayment>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load past prepayments from any reader (e.g., string buffer, stdin)
pub fn load_prepayments_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PastPrepayment>, Box<dyn Error>> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<PastPrepayment>, Box<dyn Error>> {
    let mut prepayments = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is row 1
        prepayments.push(row.to_prepayment(i + 2)?);
    }

    Ok(prepayments)
}
