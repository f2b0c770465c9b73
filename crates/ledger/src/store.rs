use async_trait::async_trait;

use rc_domain::error::Result;

/// Abstraction over the external spreadsheet.
///
/// Row numbers are 1-based with the header in row 1, so the first data row
/// is row 2.  They are only valid until the sheet is next reordered; callers
/// resolve by key before every write.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Header row; empty when the sheet has never been initialized.
    async fn read_headers(&self) -> Result<Vec<String>>;

    async fn write_headers(&self, headers: &[String]) -> Result<()>;

    /// Append a row and return its key (the first cell).
    async fn create_row(&self, values: Vec<String>) -> Result<String>;

    /// Row number of the row whose first cell equals `key`.
    async fn find_row(&self, key: &str) -> Result<Option<usize>>;

    /// Overwrite the cell under header `column` in row `row`.
    async fn update_cell(&self, row: usize, column: &str, value: &str) -> Result<()>;

    async fn read_row(&self, row: usize) -> Result<Option<Vec<String>>>;
}
