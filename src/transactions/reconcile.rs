//! Normalization of provider entries into cached records.

use crate::transactions::explorer::{ExplorerError, RawTransaction};
use crate::transactions::types::TransactionRecord;

/// Result of filtering and normalizing one provider page.
#[derive(Debug, Default)]
pub struct Reconciled {
    /// Well-formed records in provider order.
    pub records: Vec<TransactionRecord>,
    /// Entries skipped because the on-chain execution failed.
    pub dropped: usize,
}

/// Drop execution-errored entries and normalize the rest.
///
/// A surviving entry with a non-numeric `gasUsed` or `timeStamp` makes the
/// whole page malformed.
pub fn reconcile(raw: Vec<RawTransaction>) -> Result<Reconciled, ExplorerError> {
    let mut out = Reconciled::default();

    for entry in raw {
        if entry.is_error.as_deref() != Some("0") {
            out.dropped += 1;
            continue;
        }
        out.records.push(normalize(entry)?);
    }

    Ok(out)
}

fn normalize(entry: RawTransaction) -> Result<TransactionRecord, ExplorerError> {
    let gas_used = entry.gas_used.trim().parse::<u64>().map_err(|_| {
        ExplorerError::Malformed(format!("gasUsed '{}' of {}", entry.gas_used, entry.hash))
    })?;
    let created_ts = entry.time_stamp.trim().parse::<i64>().map_err(|_| {
        ExplorerError::Malformed(format!("timeStamp '{}' of {}", entry.time_stamp, entry.hash))
    })?;
    let value = entry.value.trim().parse::<u128>().unwrap_or(0);

    Ok(TransactionRecord {
        hash: entry.hash,
        block_number: entry.block_number,
        sender: entry.from,
        receiver: non_empty(entry.to),
        contract_address: non_empty(entry.contract_address),
        value,
        gas_used,
        created_ts,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(hash: &str, is_error: &str) -> RawTransaction {
        RawTransaction {
            hash: hash.to_string(),
            block_number: "17000000".to_string(),
            time_stamp: "1681000000".to_string(),
            from: "0xfrom".to_string(),
            to: Some("0xto".to_string()),
            value: "1000".to_string(),
            gas_used: "21000".to_string(),
            contract_address: Some(String::new()),
            is_error: Some(is_error.to_string()),
        }
    }

    #[test]
    fn test_drops_errored_entries() {
        let mut missing_flag = raw("0x4", "0");
        missing_flag.is_error = None;

        let out = reconcile(vec![raw("0x1", "0"), raw("0x2", "1"), raw("0x3", "0"), missing_flag]).unwrap();
        let hashes: Vec<&str> = out.records.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0x1", "0x3"]);
        assert_eq!(out.dropped, 2);
    }

    #[test]
    fn test_normalizes_fields() {
        let out = reconcile(vec![raw("0x1", "0")]).unwrap();
        let record = &out.records[0];
        assert_eq!(record.sender, "0xfrom");
        assert_eq!(record.receiver.as_deref(), Some("0xto"));
        assert_eq!(record.contract_address, None);
        assert_eq!(record.value, 1000);
        assert_eq!(record.gas_used, 21000);
        assert_eq!(record.created_ts, 1_681_000_000);
    }

    #[test]
    fn test_contract_creation() {
        let mut entry = raw("0x1", "0");
        entry.to = Some(String::new());
        entry.contract_address = Some("0xcontract".to_string());

        let out = reconcile(vec![entry]).unwrap();
        assert_eq!(out.records[0].receiver, None);
        assert_eq!(out.records[0].contract_address.as_deref(), Some("0xcontract"));
    }

    #[test]
    fn test_value_defaults_to_zero() {
        let mut entry = raw("0x1", "0");
        entry.value = "not-a-number".to_string();
        let out = reconcile(vec![entry]).unwrap();
        assert_eq!(out.records[0].value, 0);

        let mut entry = raw("0x2", "0");
        entry.value = "340282366920938463463374607431768211455".to_string();
        let out = reconcile(vec![entry]).unwrap();
        assert_eq!(out.records[0].value, u128::MAX);
    }

    #[test]
    fn test_malformed_gas_fails_page() {
        let mut entry = raw("0x1", "0");
        entry.gas_used = "lots".to_string();
        assert!(matches!(reconcile(vec![entry]), Err(ExplorerError::Malformed(_))));

        // Errored entries are never parsed.
        let mut entry = raw("0x2", "1");
        entry.gas_used = "lots".to_string();
        assert_eq!(reconcile(vec![entry]).unwrap().dropped, 1);
    }
}
