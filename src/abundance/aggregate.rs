use std::collections::HashMap;

use crate::error::ToolsError;

/// Per-label sums, iterated in ascending-value order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    entries: Vec<(String, f64)>,
}

impl AggregateResult {
    /// Iterate `(label, sum)` pairs in ascending-value order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, f64)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    /// Sum over all labels. Equals the grand total of the aggregated matrix
    /// when the label set covers every column.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum a sample matrix by category label.
///
/// `labels` carries one label per data column (duplicates permitted); every
/// matrix row must have exactly `labels.len()` values, else
/// [`ToolsError::ShapeMismatch`]. The matrix is column-summed across rows,
/// then column sums are folded into their labels. Every distinct label is
/// seeded with 0.0 before accumulation, so labels never seen in data still
/// appear; an empty matrix yields an all-zero result. Entries come back
/// sorted ascending by value, ties by label.
pub fn aggregate(labels: &[String], matrix: &[Vec<f64>]) -> Result<AggregateResult, ToolsError> {
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != labels.len() {
            return Err(ToolsError::ShapeMismatch {
                row: i,
                expected: labels.len(),
                got: row.len(),
            });
        }
    }

    let mut colsum = vec![0.0; labels.len()];
    for row in matrix {
        for (j, value) in row.iter().enumerate() {
            colsum[j] += value;
        }
    }

    // Seed every distinct label first, then accumulate, so zero-count labels
    // stay visible and duplicate-label columns fold by summation.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, f64)> = Vec::new();
    for label in labels {
        if !index.contains_key(label.as_str()) {
            index.insert(label.as_str(), entries.len());
            entries.push((label.clone(), 0.0));
        }
    }
    for (j, label) in labels.iter().enumerate() {
        entries[index[label.as_str()]].1 += colsum[j];
    }

    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(AggregateResult { entries })
}
