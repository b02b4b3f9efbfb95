//! Read-path operations.

use crate::error::Result;
use crate::io::scanner;
use crate::store::TaskStore;
use crate::types::{Entry, ListFilter};

impl TaskStore {
    /// Scan every record and return the entries passing `filter`, in stream
    /// (= insertion) order.
    pub fn list(&mut self, filter: ListFilter) -> Result<Vec<Entry>> {
        let header = self.header()?;
        let outcome = scanner::scan(&mut self.file, &header, None)?;
        Ok(outcome
            .entries
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect())
    }
}
