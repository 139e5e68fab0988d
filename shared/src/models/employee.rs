//! Employee Model

use serde::{Deserialize, Serialize};

/// Directory entry, used only as a selection option for evaluators and approvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "EMPL_CODE")]
    pub code: String,
    #[serde(rename = "TNAME")]
    pub name: String,
}

impl Employee {
    /// Label shown in pickers: `"<code> - <name>"`
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }

    /// Case-insensitive match on code or label
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.code.to_lowercase().contains(&query) || self.label().to_lowercase().contains(&query)
    }
}

/// Admin roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOption {
    #[serde(rename = "EmplCode_Admin")]
    pub code: String,
    #[serde(rename = "FullnameTH_Admin", default)]
    pub name: String,
}
