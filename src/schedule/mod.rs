//! Schedule B hierarchy: wire model, arena tree and description labels.

pub mod describe;
pub mod node;
pub mod tree;

use serde::{Deserialize, Serialize};

pub use describe::{combine_nested_descriptions, normalize_capitalization};
pub use node::{digits_only, format_code, is_leaf_code, ScheduleNode, ScheduleResponse};
pub use tree::{Row, ScheduleTree, TreeNode};

/// A leaf code the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCode {
    /// The ten-digit code as the vendor wrote it.
    pub code: String,
    /// Description, or the node name when there is none.
    pub description: String,
    /// Unit of measure.
    #[serde(rename = "uom", default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,
}
