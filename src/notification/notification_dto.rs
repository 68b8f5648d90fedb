use serde::Deserialize;

/// `?isReadType=all` marks everything; any other value marks `id` only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadQuery {
    pub is_read_type: Option<String>,
    pub id: Option<String>,
}
