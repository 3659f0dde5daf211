use quiz_core::model::Question;
use serde_json::Value;

use crate::repository::{QuestionRecord, StorageError};

fn malformed<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Malformed(e.to_string())
}

/// Decode a JSON question pool.
///
/// The document must be an array. Entries that fail to deserialize or violate a
/// question invariant are skipped; the rest keep their order.
///
/// # Errors
///
/// Returns `StorageError::Malformed` if the bytes are not JSON or not an array.
pub fn decode_pool(bytes: &[u8]) -> Result<Vec<Question>, StorageError> {
    let document: Value = serde_json::from_slice(bytes).map_err(malformed)?;
    let Value::Array(entries) = document else {
        return Err(StorageError::Malformed("expected a JSON array".into()));
    };

    let mut pool = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let record = match serde_json::from_value::<QuestionRecord>(entry) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(position, error = %err, "skipping undecodable question");
                continue;
            }
        };
        match record.into_question() {
            Ok(question) => pool.push(question),
            Err(err) => {
                tracing::warn!(position, error = %err, "skipping invalid question");
            }
        }
    }

    Ok(pool)
}
