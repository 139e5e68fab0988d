//! Evaluation record model

use serde::{Deserialize, Serialize};

/// One row per evaluated employee
///
/// The three evaluator slots are independent. The same evaluator code may
/// appear in more than one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: i64,
    #[serde(rename = "EmplCode")]
    pub empl_code: String,
    #[serde(rename = "FullnameTHEmpl", default)]
    pub full_name: String,
    #[serde(rename = "MainOrgOrgShort", default)]
    pub org_unit: String,
    #[serde(rename = "MainPositionOrgShort", default)]
    pub position: String,
    #[serde(rename = "EmplCode_Evaluator1", default, skip_serializing_if = "Option::is_none")]
    pub evaluator1_code: Option<String>,
    #[serde(rename = "FullnameTH1", default, skip_serializing_if = "Option::is_none")]
    pub evaluator1_name: Option<String>,
    #[serde(rename = "EmplCode_Evaluator2", default, skip_serializing_if = "Option::is_none")]
    pub evaluator2_code: Option<String>,
    #[serde(rename = "FullnameTH2", default, skip_serializing_if = "Option::is_none")]
    pub evaluator2_name: Option<String>,
    #[serde(rename = "EmplCode_Evaluator3", default, skip_serializing_if = "Option::is_none")]
    pub evaluator3_code: Option<String>,
    #[serde(rename = "FullnameTH3", default, skip_serializing_if = "Option::is_none")]
    pub evaluator3_name: Option<String>,
    #[serde(rename = "EmplCode_AdminUpdate", default, skip_serializing_if = "Option::is_none")]
    pub admin_update_code: Option<String>,
    #[serde(rename = "EmplCode_AdminUpdateTH", default, skip_serializing_if = "Option::is_none")]
    pub admin_update_name: Option<String>,
    #[serde(rename = "UpdateDate", default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    /// Grouping key scoping an approval batch
    #[serde(rename = "CCTR", default, skip_serializing_if = "Option::is_none")]
    pub cctr: Option<String>,
    #[serde(rename = "ApproverName", default, skip_serializing_if = "Option::is_none")]
    pub approver_name: Option<String>,
    #[serde(rename = "ApproverPosition", default, skip_serializing_if = "Option::is_none")]
    pub approver_position: Option<String>,
}

impl EvaluationRecord {
    /// Evaluator codes in slot order, blanks as empty strings
    pub fn evaluator_codes(&self) -> [String; 3] {
        [
            self.evaluator1_code.clone().unwrap_or_default(),
            self.evaluator2_code.clone().unwrap_or_default(),
            self.evaluator3_code.clone().unwrap_or_default(),
        ]
    }
}

/// Grouping key of a record list: `CCTR` of the first record, or empty
pub fn group_key_of(records: &[EvaluationRecord]) -> String {
    records
        .first()
        .and_then(|r| r.cctr.clone())
        .unwrap_or_default()
}

/// Body of the record-store save call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAssignment {
    pub id: i64,
    #[serde(rename = "EmplCode_Evaluator1")]
    pub evaluator1: String,
    #[serde(rename = "EmplCode_Evaluator2")]
    pub evaluator2: String,
    #[serde(rename = "EmplCode_Evaluator3")]
    pub evaluator3: String,
    #[serde(rename = "EmplCode_AdminUpdate")]
    pub admin_code: String,
}

/// Body of the record-store list call for one owner
#[derive(Debug, Clone, Serialize)]
pub struct OwnerQuery<'a> {
    #[serde(rename = "EmplCode")]
    pub owner_code: &'a str,
}
