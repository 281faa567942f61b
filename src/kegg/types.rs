use serde::{Deserialize, Serialize};

/// One entry of the mapper's reconstruct result list.
///
/// Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayRecord {
    /// Pathway/module identifier (anchor text).
    pub id: String,
    /// Absolute link to the entry page.
    pub link: String,
    /// Entry name.
    pub text: String,
    /// Completion state shown next to the entry.
    pub state: String,
    /// Section heading the entry sits under.
    pub title: String,
    /// Top-level heading above the section.
    pub big_title: String,
}
