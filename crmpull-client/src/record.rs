use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One CRM record, passed through exactly as the upstream sent it.
pub type Record = Map<String, Value>;

/// What to fetch and how many records at most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub endpoint: String,
    pub limit: usize,
}

impl FetchRequest {
    pub fn new(endpoint: impl Into<String>, limit: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            limit,
        }
    }
}

/// Body of one `*.list` call.
#[derive(Debug, Clone, Serialize)]
pub struct ListRequest<'a> {
    pub start: usize,
    pub order: BTreeMap<&'a str, &'a str>,
    pub select: &'a [String],
}

impl<'a> ListRequest<'a> {
    /// Page starting at `start`, ordered by ascending `ID`.
    pub fn by_id(start: usize, select: &'a [String]) -> Self {
        let mut order = BTreeMap::new();
        order.insert("ID", "ASC");
        Self {
            start,
            order,
            select,
        }
    }
}

/// A successfully parsed page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub records: Vec<Record>,
    pub total: Option<u64>,
}

/// Parse an upstream list body.
///
/// Returns `None` when the body is not JSON or its `result` field is missing,
/// null, or not an array of objects.
pub fn parse_list_page(body: &str) -> Option<ListPage> {
    let mut value: Value = serde_json::from_str(body).ok()?;
    let total = value.get("total").and_then(Value::as_u64);
    let result = value.get_mut("result")?.take();
    let records = serde_json::from_value::<Vec<Record>>(result).ok()?;

    Some(ListPage { records, total })
}

/// Reported after each page is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    pub page: usize,
    pub start: usize,
    pub received: usize,
    pub accumulated: usize,
}
