use std::io::{self, BufRead};
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use thiserror::Error;


const MODULE: &str = "PROCESSOR";

/// Result of handing one webhook body to a processor:
/// `Ok(Some(text))` is a reply to return, `Ok(None)` needs no reply.
pub type ProcessingOutcome = Result<Option<String>, ProcessingError>;

/// Reasons a payload could not be processed
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("could not read body: {0}")]
    Read(#[from] io::Error),

    #[error("malformed update: {0}")]
    Malformed(String),

    #[error("processing fault: {0}")]
    Fault(String),
}

pub trait PayloadProcessor: Send + Sync {
    /// Consume the webhook body and produce an optional reply
    fn process(&self, body: &mut dyn BufRead) -> ProcessingOutcome;
}


/// Acknowledges well-formed bot updates without replying.
///
/// The body must be a JSON object with a numeric `update_id`; anything else
/// is reported as malformed.
#[derive(Debug, Default)]
pub struct UpdateProcessor;

impl PayloadProcessor for UpdateProcessor {
    fn process(&self, body: &mut dyn BufRead) -> ProcessingOutcome {
        let mut content = String::new();
        body.read_to_string(&mut content)?;

        let update: Value = serde_json::from_str(&content)
            .map_err(|e| ProcessingError::Malformed(e.to_string()))?;
        let fields = update.as_object()
            .ok_or_else(|| ProcessingError::Malformed("update is not a JSON object".to_string()))?;
        let update_id = fields.get("update_id").and_then(Value::as_i64)
            .ok_or_else(|| ProcessingError::Malformed("update_id is missing".to_string()))?;
        let kind = fields.keys().find(|k| k.as_str() != "update_id").map(String::as_str).unwrap_or("empty");

        debug!("[{}] Update {} received: {}", MODULE, update_id, kind);
        Ok(None)
    }
}

/// Process-wide processor shared by every dispatcher built with defaults
pub fn default_processor() -> Arc<dyn PayloadProcessor> {
    static INSTANCE: OnceLock<Arc<dyn PayloadProcessor>> = OnceLock::new();
    INSTANCE.get_or_init(|| Arc::new(UpdateProcessor)).clone()
}
