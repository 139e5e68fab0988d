//! Evaluator assignment editor

use serde::Deserialize;
use thiserror::Error;

use eva_client::{ClientError, EvaApi};
use shared::error::{AppError, ErrorCode};
use shared::models::SaveAssignment;

use crate::error::remote_failure_code;

pub const SAVE_SUCCESS_MESSAGE: &str = "บันทึกข้อมูลสำเร็จ";
const SAVE_TRANSPORT_MESSAGE: &str = "เกิดข้อผิดพลาดในการบันทึกข้อมูล";

/// Three evaluator slots; a blank slot unassigns it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluatorAssignment {
    #[serde(default)]
    pub evaluator1: String,
    #[serde(default)]
    pub evaluator2: String,
    #[serde(default)]
    pub evaluator3: String,
}

impl EvaluatorAssignment {
    fn into_save(self, record_id: i64, admin_code: &str) -> SaveAssignment {
        SaveAssignment {
            id: record_id,
            evaluator1: self.evaluator1.trim().to_string(),
            evaluator2: self.evaluator2.trim().to_string(),
            evaluator3: self.evaluator3.trim().to_string(),
            admin_code: admin_code.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ClientError,
    },
}

impl From<SaveError> for AppError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Failed { message, source } => {
                AppError::with_message(remote_failure_code(&source, ErrorCode::SaveFailed), message)
            }
        }
    }
}

/// Persists the evaluator slots of one record in a single update call
pub async fn save_evaluators(
    api: &EvaApi,
    record_id: i64,
    assignment: EvaluatorAssignment,
    admin_code: &str,
) -> Result<(), SaveError> {
    let save = assignment.into_save(record_id, admin_code);
    tracing::debug!(?save, "Saving evaluator assignment");

    match api.save_evaluators(&save).await {
        Ok(_) => {
            tracing::info!(record_id, admin_code, "Evaluator assignment saved");
            Ok(())
        }
        Err(source) => {
            let message = match source.remote_message() {
                Some(message) => message.to_string(),
                None => SAVE_TRANSPORT_MESSAGE.to_string(),
            };
            tracing::warn!(record_id, error = %source, "Evaluator assignment failed");
            Err(SaveError::Failed { message, source })
        }
    }
}
