//! JSON export documents and the import boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::types::{Edge, GraphSnapshot, Node};

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

/// The file written by "Export → JSON".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub meta: ExportMeta,
}

impl ExportDocument {
    pub fn new(snapshot: GraphSnapshot, exported_at: DateTime<Utc>) -> Self {
        Self {
            nodes: snapshot.nodes,
            edges: snapshot.edges,
            meta: ExportMeta {
                exported_at,
                version: EXPORT_VERSION.to_string(),
            },
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json(&self) -> Result<String, TransferError> {
        serde_json::to_string_pretty(self).map_err(TransferError::Export)
    }

    /// `mindflow_<YYYY-MM-DD>.json`, dated by the export time.
    pub fn file_name(&self) -> String {
        export_file_name(self.meta.exported_at)
    }
}

pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("mindflow_{}.json", at.format("%Y-%m-%d"))
}

/// Parse caller-supplied text into a graph.
///
/// The boundary only checks that `nodes` and `edges` are present and are
/// arrays of well-formed records. Structural checks happen later, in
/// [`crate::validate`]. Extra fields such as `meta` are ignored.
pub fn parse_import(text: &str) -> Result<GraphSnapshot, TransferError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(TransferError::Parse)?;
    parse_import_value(value)
}

pub fn parse_import_value(mut value: serde_json::Value) -> Result<GraphSnapshot, TransferError> {
    let Some(object) = value.as_object_mut() else {
        return Err(TransferError::InvalidFormat(
            "expected a JSON object with `nodes` and `edges`".into(),
        ));
    };

    let nodes = take_array(object, "nodes")?;
    let edges = take_array(object, "edges")?;

    let nodes: Vec<Node> = serde_json::from_value(nodes)
        .map_err(|e| TransferError::InvalidFormat(format!("bad node record: {e}")))?;
    let edges: Vec<Edge> = serde_json::from_value(edges)
        .map_err(|e| TransferError::InvalidFormat(format!("bad edge record: {e}")))?;

    Ok(GraphSnapshot { nodes, edges })
}

fn take_array(
    object: &mut serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<serde_json::Value, TransferError> {
    match object.remove(field) {
        Some(value @ serde_json::Value::Array(_)) => Ok(value),
        Some(_) => Err(TransferError::InvalidFormat(format!(
            "`{field}` must be an array"
        ))),
        None => Err(TransferError::InvalidFormat(format!("missing `{field}`"))),
    }
}
