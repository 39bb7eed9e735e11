//! Broadcast response classification.
//!
//! A submitted transaction passes through two stages on the receiving
//! chain: mempool admission (check) and block execution (deliver). Either
//! stage can reject it. The classifier reduces the raw two-stage response
//! to a single normalized outcome; admission failure takes precedence and
//! execution fields are never inspected in that case.

/// Result fields of one processing stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxStageResult {
    /// Zero means the stage accepted the transaction.
    pub code: u32,
    pub log: String,
    pub data: Option<Vec<u8>>,
}

/// Raw submission response as produced by the transport.
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    /// Transaction hash from the outer response envelope.
    pub hash: Vec<u8>,
    /// Inclusion height; zero when the transaction never reached a block.
    pub height: u64,
    pub check_tx: TxStageResult,
    /// Absent when admission failed, so no execution happened.
    pub deliver_tx: Option<TxStageResult>,
}

/// Normalized outcome of one submission attempt.
///
/// Check and deliver failures are expected outcomes the caller branches
/// on, not errors; insufficient fees or a stale sequence land here.
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastOutcome {
    Success {
        height: u64,
        tx_hash: String,
        raw_log: Option<String>,
        data: Option<Vec<u8>>,
    },
    /// Rejected at mempool admission; never made it into a block.
    CheckFailure {
        height: u64,
        code: u32,
        tx_hash: String,
        raw_log: String,
        data: Option<Vec<u8>>,
    },
    /// Admitted but rejected during block execution.
    DeliverFailure {
        height: u64,
        code: u32,
        tx_hash: String,
        raw_log: Option<String>,
        data: Option<Vec<u8>>,
    },
}

impl BroadcastOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BroadcastOutcome::Success { .. })
    }

    /// Stage result code; zero for success.
    pub fn code(&self) -> u32 {
        match self {
            BroadcastOutcome::Success { .. } => 0,
            BroadcastOutcome::CheckFailure { code, .. } => *code,
            BroadcastOutcome::DeliverFailure { code, .. } => *code,
        }
    }

    /// Uppercase hex transaction hash.
    pub fn tx_hash(&self) -> &str {
        match self {
            BroadcastOutcome::Success { tx_hash, .. } => tx_hash,
            BroadcastOutcome::CheckFailure { tx_hash, .. } => tx_hash,
            BroadcastOutcome::DeliverFailure { tx_hash, .. } => tx_hash,
        }
    }

    pub fn height(&self) -> u64 {
        match self {
            BroadcastOutcome::Success { height, .. } => *height,
            BroadcastOutcome::CheckFailure { height, .. } => *height,
            BroadcastOutcome::DeliverFailure { height, .. } => *height,
        }
    }
}

/// Classify a raw submission response into a normalized outcome.
///
/// Hash and height always come from the outer envelope; the hash is
/// normalized to fixed-width uppercase hex. A missing deliver result with a
/// clean admission counts as success (no code means code zero).
pub fn classify(response: &SubmitResponse) -> BroadcastOutcome {
    let tx_hash = hex::encode_upper(&response.hash);
    let height = response.height;

    if response.check_tx.code != 0 {
        return BroadcastOutcome::CheckFailure {
            height,
            code: response.check_tx.code,
            tx_hash,
            raw_log: response.check_tx.log.clone(),
            data: response.check_tx.data.clone(),
        };
    }

    match &response.deliver_tx {
        Some(deliver) if deliver.code != 0 => BroadcastOutcome::DeliverFailure {
            height,
            code: deliver.code,
            tx_hash,
            raw_log: (!deliver.log.is_empty()).then(|| deliver.log.clone()),
            data: deliver.data.clone(),
        },
        Some(deliver) => BroadcastOutcome::Success {
            height,
            tx_hash,
            raw_log: (!deliver.log.is_empty()).then(|| deliver.log.clone()),
            data: deliver.data.clone(),
        },
        None => BroadcastOutcome::Success {
            height,
            tx_hash,
            raw_log: None,
            data: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(check_code: u32, deliver: Option<TxStageResult>) -> SubmitResponse {
        SubmitResponse {
            hash: vec![0xab; 32],
            height: 9001,
            check_tx: TxStageResult {
                code: check_code,
                log: if check_code != 0 {
                    "admission rejected".to_string()
                } else {
                    String::new()
                },
                data: None,
            },
            deliver_tx: deliver,
        }
    }

    #[test]
    fn check_failure_wins() {
        let outcome = classify(&response(5, None));
        match outcome {
            BroadcastOutcome::CheckFailure { code, raw_log, .. } => {
                assert_eq!(code, 5);
                assert_eq!(raw_log, "admission rejected");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn check_failure_never_inspects_deliver_fields() {
        // Garbage in the deliver slot must not leak into the outcome.
        let garbage = TxStageResult {
            code: 99,
            log: "garbage".to_string(),
            data: Some(vec![0xff]),
        };
        let outcome = classify(&response(5, Some(garbage)));
        match outcome {
            BroadcastOutcome::CheckFailure { code, raw_log, data, .. } => {
                assert_eq!(code, 5);
                assert_eq!(raw_log, "admission rejected");
                assert_eq!(data, None);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn clean_check_and_deliver_is_success() {
        let deliver = TxStageResult {
            code: 0,
            log: "executed".to_string(),
            data: Some(vec![1, 2]),
        };
        let outcome = classify(&response(0, Some(deliver)));
        assert!(outcome.is_success());
        assert_eq!(outcome.code(), 0);
        match outcome {
            BroadcastOutcome::Success { raw_log, data, .. } => {
                assert_eq!(raw_log.as_deref(), Some("executed"));
                assert_eq!(data, Some(vec![1, 2]));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn deliver_failure_is_classified() {
        let deliver = TxStageResult {
            code: 11,
            log: "out of gas".to_string(),
            data: None,
        };
        let outcome = classify(&response(0, Some(deliver)));
        match outcome {
            BroadcastOutcome::DeliverFailure { code, raw_log, .. } => {
                assert_eq!(code, 11);
                assert_eq!(raw_log.as_deref(), Some("out of gas"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn missing_deliver_result_counts_as_success() {
        let outcome = classify(&response(0, None));
        assert!(outcome.is_success());
    }

    #[test]
    fn hash_is_normalized_to_uppercase_hex() {
        let outcome = classify(&response(0, None));
        let hash = outcome.tx_hash();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash.to_uppercase());
        assert_eq!(outcome.height(), 9001);
    }
}
