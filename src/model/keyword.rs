//! Keyword count table.

use super::{ElementRecord, ElementTable};

/// An element row extended with one count per keyword column.
///
/// `None` is the empty value: the keyword was not found, or the row was not
/// searched. Zero is never stored once a scan has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRow {
    /// The inventory entry this row was copied from
    pub element: ElementRecord,
    /// Counts in keyword column order
    pub counts: Vec<Option<u64>>,
}

/// A copy of an [`ElementTable`] with one count column per keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    keywords: Vec<String>,
    rows: Vec<KeywordRow>,
}

impl KeywordTable {
    /// Copy `elements` and add an empty column for each distinct keyword.
    ///
    /// Duplicate keywords share one column; the first occurrence fixes its
    /// position.
    pub fn from_elements(elements: &ElementTable, keywords: &[String]) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            if !columns.contains(keyword) {
                columns.push(keyword.clone());
            }
        }

        let rows = elements
            .iter()
            .map(|element| KeywordRow {
                element: element.clone(),
                counts: vec![None; columns.len()],
            })
            .collect();

        Self {
            keywords: columns,
            rows,
        }
    }

    /// Keyword columns in order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Rows in element table order.
    pub fn rows(&self) -> &[KeywordRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count for `keyword` on row `row`, if the column exists.
    pub fn count(&self, row: usize, keyword: &str) -> Option<u64> {
        let column = self.keywords.iter().position(|k| k == keyword)?;
        self.rows.get(row)?.counts[column]
    }

    /// Current counts of a row as plain numbers, empty cells read as zero.
    ///
    /// Scanners seed their counters from this so that a later pass adds to
    /// what an earlier pass found.
    pub fn seed(&self, row: usize) -> Vec<u64> {
        self.rows[row]
            .counts
            .iter()
            .map(|count| count.unwrap_or(0))
            .collect()
    }

    /// Store counters for a row.
    pub fn store(&mut self, row: usize, counts: &[u64]) {
        let target = &mut self.rows[row].counts;
        for (slot, count) in target.iter_mut().zip(counts) {
            *slot = Some(*count);
        }
    }

    /// Rewrite every zero count to the empty value.
    pub fn normalize(&mut self) {
        for row in &mut self.rows {
            for count in &mut row.counts {
                if *count == Some(0) {
                    *count = None;
                }
            }
        }
    }

    /// Column headers: the inventory columns followed by the keywords.
    pub fn headers(&self) -> Vec<&str> {
        ElementTable::HEADERS
            .iter()
            .copied()
            .chain(self.keywords.iter().map(String::as_str))
            .collect()
    }
}
