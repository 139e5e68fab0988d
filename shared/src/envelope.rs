//! Response-envelope parsing for the external record store
//!
//! The backend answers list calls with a bare array, with `{data: [...]}`, or
//! with `{success: false, message}`; the approval-request call hides its link
//! token in one of six places. Every call site goes through these functions so
//! the rules are applied identically everywhere.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::ApproverInfo;

/// A normalized list response
#[derive(Debug, Clone, PartialEq)]
pub struct RecordList<T> {
    /// Records in backend order; empty when the shape was not a list
    pub records: Vec<T>,
    /// Backend-provided message when the response was not a list
    pub error: Option<String>,
    /// The response was an explicit `success: false`
    pub rejected: bool,
}

impl<T> RecordList<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the backend refused the call rather than returning a list
    pub fn is_failure(&self) -> bool {
        self.rejected || self.error.is_some()
    }
}

/// Normalizes a list response
///
/// Precedence: bare array, then an array under `data`, then anything else as
/// an empty list with its `message` (if any) surfaced as the error. Rows that
/// do not deserialize are a shape failure and fail the whole list.
pub fn normalize_list<T: DeserializeOwned>(body: &Value) -> Result<RecordList<T>, serde_json::Error> {
    let rows = match body {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => map.get("data").and_then(Value::as_array),
        _ => None,
    };

    match rows {
        Some(rows) => {
            let records = rows
                .iter()
                .map(|row| T::deserialize(row))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RecordList {
                records,
                error: None,
                rejected: false,
            })
        }
        None => Ok(RecordList {
            records: Vec::new(),
            error: message_of(body),
            rejected: is_explicit_failure(body),
        }),
    }
}

/// `message` field of an object body, if it is a non-empty string
pub fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// True when the body carries an explicit `success: false`
pub fn is_explicit_failure(body: &Value) -> bool {
    matches!(body.get("success"), Some(Value::Bool(false)))
}

/// Outcome of looking for an approval link token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLookup {
    Found(String),
    NotFound,
}

/// Where a token rule looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    /// First element of a bare array
    FirstElement,
    /// The body object itself
    Root,
    /// The object under `data`
    Data,
}

/// One extraction rule: a scope and a field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRule {
    pub scope: TokenScope,
    pub field: &'static str,
}

/// Extraction rules in priority order; the first non-empty match wins
pub const LINK_TOKEN_RULES: [TokenRule; 6] = [
    TokenRule { scope: TokenScope::FirstElement, field: "linkCode" },
    TokenRule { scope: TokenScope::FirstElement, field: "LinkCode" },
    TokenRule { scope: TokenScope::Root, field: "linkCode" },
    TokenRule { scope: TokenScope::Root, field: "LinkCode" },
    TokenRule { scope: TokenScope::Data, field: "linkCode" },
    TokenRule { scope: TokenScope::Data, field: "LinkCode" },
];

impl TokenRule {
    fn apply(&self, body: &Value) -> Option<String> {
        let holder = match self.scope {
            TokenScope::FirstElement => body.as_array().and_then(|rows| rows.first()),
            TokenScope::Root => body.is_object().then_some(body),
            TokenScope::Data => body.get("data").filter(|d| d.is_object()),
        }?;

        match holder.get(self.field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Finds the approval link token in a create-approval response
pub fn extract_link_token(body: &Value) -> TokenLookup {
    LINK_TOKEN_RULES
        .iter()
        .find_map(|rule| rule.apply(body))
        .map_or(TokenLookup::NotFound, TokenLookup::Found)
}

/// Approver metadata from a link-metadata response
///
/// A non-empty array yields its first element; an object yields itself unless
/// it is an explicit failure. Anything else (or an unreadable row) is `None`.
pub fn approver_info_from(body: &Value) -> Option<ApproverInfo> {
    let holder = match body {
        Value::Array(rows) => rows.first()?,
        Value::Object(_) if !is_explicit_failure(body) => body,
        _ => return None,
    };
    ApproverInfo::deserialize(holder).ok()
}
