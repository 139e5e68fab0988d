//! Approval link models
//!
//! An approval link binds a batch of records (selected by grouping key) to one
//! approver. Its status moves once, from pending to approved or rejected.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Bangkok wall clock, the organization's display timezone
const DISPLAY_OFFSET_SECS: i32 = 7 * 3600;
/// Thai solar calendar year = Gregorian year + 543
const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Status of an approval link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    /// Absent or unrecognized status; never offers a decision
    Unknown,
}

impl ApprovalStatus {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Pending,
            Some(1) => Self::Approved,
            Some(2) => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    /// Wire value sent when creating a request
    pub const PENDING_CODE: i64 = 0;

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Thai badge text for resolved links
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Approved => Some("อนุมัติแล้ว"),
            Self::Rejected => Some("ไม่อนุมัติ"),
            Self::Pending | Self::Unknown => None,
        }
    }
}

/// Approver's decision on a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn code(&self) -> u8 {
        match self {
            Self::Accept => 1,
            Self::Reject => 2,
        }
    }

    /// Thai action text used in prompts and messages
    pub fn action_text(&self) -> &'static str {
        match self {
            Self::Accept => "อนุมัติ",
            Self::Reject => "ไม่อนุมัติ",
        }
    }

    /// Question the approver must answer yes to before the decision is sent
    pub fn confirmation_prompt(&self) -> String {
        format!("คุณต้องการ{}รายการนี้หรือไม่?", self.action_text())
    }

    pub fn success_message(&self) -> String {
        format!("{}เรียบร้อยแล้ว", self.action_text())
    }

    pub fn failure_message(&self) -> String {
        format!("เกิดข้อผิดพลาดในการ{}", self.action_text())
    }
}

impl TryFrom<u8> for Decision {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Accept),
            2 => Ok(Self::Reject),
            other => Err(other),
        }
    }
}

/// Approver metadata of one link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApproverInfo {
    #[serde(rename = "FullnameTH", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "MainPositionOrgShort", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(
        rename = "ApproveStatus",
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<i64>,
    #[serde(rename = "ApproveDate", default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<String>,
}

impl ApproverInfo {
    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::from_code(self.status_code)
    }
}

/// Accepts `1` and `"1"`; anything else becomes `None`
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Body of the record-store call that creates a pending approval request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateApprovalRequest {
    #[serde(rename = "Approver")]
    pub approver: String,
    #[serde(rename = "EmplCode_Admin")]
    pub admin_id: String,
    #[serde(rename = "CCTR")]
    pub group_key: String,
    #[serde(rename = "ApproveStatus")]
    pub status: i64,
    #[serde(rename = "ApproverName")]
    pub approver_name: String,
    #[serde(rename = "ApproverPosition")]
    pub approver_position: String,
}

impl CreateApprovalRequest {
    pub fn pending(
        approver: impl Into<String>,
        admin_id: impl Into<String>,
        group_key: impl Into<String>,
    ) -> Self {
        Self {
            approver: approver.into(),
            admin_id: admin_id.into(),
            group_key: group_key.into(),
            status: ApprovalStatus::PENDING_CODE,
            approver_name: String::new(),
            approver_position: String::new(),
        }
    }
}

/// Body of the token-keyed reads
#[derive(Debug, Clone, Serialize)]
pub struct LinkQuery<'a> {
    #[serde(rename = "linkCode")]
    pub token: &'a str,
}

/// Body of the decision call
#[derive(Debug, Clone, Serialize)]
pub struct DecisionSubmission<'a> {
    #[serde(rename = "ApproveLinkCode")]
    pub token: &'a str,
    #[serde(rename = "Result")]
    pub decision: u8,
}

/// Formats a decision timestamp in Thai long form: `DD/MM/YYYY HH:mm`, Buddhist-era year
///
/// Timestamps without an offset are taken as Bangkok wall time. Absent values
/// render as `-`; values that do not parse are returned verbatim.
pub fn format_thai_datetime(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };

    let naive = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => FixedOffset::east_opt(DISPLAY_OFFSET_SECS)
            .map(|tz| dt.with_timezone(&tz).naive_local()),
        Err(_) => ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok()),
    };

    match naive {
        Some(dt) => {
            use chrono::Datelike;
            format!(
                "{}/{}/{} {}",
                dt.format("%d"),
                dt.format("%m"),
                dt.year() + BUDDHIST_ERA_OFFSET,
                dt.format("%H:%M")
            )
        }
        None => raw.to_string(),
    }
}
