//! In-memory sheet model shared by the memory and file stores.

use serde::{Deserialize, Serialize};

use rc_domain::error::{Error, Result};

/// Header row plus data rows, each padded to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Sheet row number of the first data row.
pub const FIRST_DATA_ROW: usize = 2;

impl Sheet {
    pub fn append(&mut self, mut values: Vec<String>) -> Result<String> {
        let key = values
            .first()
            .filter(|k| !k.is_empty())
            .cloned()
            .ok_or_else(|| Error::Schema("row has no key cell".into()))?;
        if values.len() < self.headers.len() {
            values.resize(self.headers.len(), String::new());
        }
        self.rows.push(values);
        Ok(key)
    }

    /// Linear scan of the key column.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.first().map(String::as_str) == Some(key))
            .map(|i| i + FIRST_DATA_ROW)
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| Error::Schema(format!("no column named \"{column}\"")))
    }

    pub fn update(&mut self, row: usize, column: &str, value: &str) -> Result<()> {
        let col = self.column_index(column)?;
        let cells = row
            .checked_sub(FIRST_DATA_ROW)
            .and_then(|i| self.rows.get_mut(i))
            .ok_or_else(|| Error::Ledger(format!("row {row} out of range")))?;
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_owned();
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<Vec<String>> {
        row.checked_sub(FIRST_DATA_ROW)
            .and_then(|i| self.rows.get(i))
            .cloned()
    }

    /// Reorder data rows by the values under `column`, the way a person
    /// sorting the spreadsheet would.
    pub fn sort_by_column(&mut self, column: &str) -> Result<()> {
        let col = self.column_index(column)?;
        self.rows
            .sort_by(|a, b| a.get(col).cmp(&b.get(col)));
        Ok(())
    }

    /// Replace the header row, keeping data rows in place.
    pub fn set_headers(&mut self, headers: &[String]) {
        self.headers = headers.to_vec();
        for row in &mut self.rows {
            if row.len() < self.headers.len() {
                row.resize(self.headers.len(), String::new());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Sheet {
        let mut s = Sheet::default();
        s.set_headers(&["KEY".into(), "NAME".into(), "TIME".into()]);
        s
    }

    #[test]
    fn append_pads_and_finds() {
        let mut s = sheet();
        s.append(vec!["b".into(), "Bea".into()]).unwrap();
        s.append(vec!["a".into()]).unwrap();
        assert_eq!(s.find("a"), Some(3));
        assert_eq!(s.row(3).unwrap().len(), 3);
        assert_eq!(s.find("zzz"), None);
    }

    #[test]
    fn update_by_header_name() {
        let mut s = sheet();
        s.append(vec!["a".into()]).unwrap();
        s.update(2, "TIME", "08:15").unwrap();
        assert_eq!(s.row(2).unwrap()[2], "08:15");
        assert!(matches!(s.update(2, "NOPE", "x"), Err(Error::Schema(_))));
        assert!(matches!(s.update(9, "TIME", "x"), Err(Error::Ledger(_))));
    }

    #[test]
    fn sorting_moves_rows() {
        let mut s = sheet();
        s.append(vec!["k1".into(), "Zoe".into()]).unwrap();
        s.append(vec!["k2".into(), "Ana".into()]).unwrap();
        assert_eq!(s.find("k2"), Some(3));
        s.sort_by_column("NAME").unwrap();
        assert_eq!(s.find("k2"), Some(2));
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut s = sheet();
        assert!(matches!(s.append(vec![String::new()]), Err(Error::Schema(_))));
    }
}
