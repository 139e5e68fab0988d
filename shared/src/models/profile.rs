//! Signed-in user profile

use serde::{Deserialize, Serialize};

/// Extended profile fetched once at sign-in and held for the session lifetime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Organization employee code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// `data:` URL of the profile photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl UserProfile {
    /// Employee code, if the identity provider supplied a non-blank one
    pub fn employee_code(&self) -> Option<&str> {
        self.employee_id
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}
