//! Operational status read-out.
//!
//! Scans the dex's `SafeMode` and `HotPathOpen` events in fixed block windows
//! and reports them newest first, together with the state the latest of each
//! leaves the dex in. Read-only: needs an RPC URL, never a key.

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolEvent;
use serde::Serialize;
use tracing::{debug, info};

use crate::contracts::CrocEvents;
use crate::errors::GovernError;
use crate::rpc::{ChainClient, ChainLog};

/// One status-relevant event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "camelCase")]
pub enum StatusChange {
    SafeMode(bool),
    HotPathOpen(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub block_number: u64,
    pub transaction_hash: B256,
    pub log_index: u64,
    pub change: StatusChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalStatus {
    pub dex: Address,
    pub from_block: u64,
    pub to_block: u64,
    /// From the newest `SafeMode` event; `None` if none was seen
    pub safe_mode: Option<bool>,
    /// From the newest `HotPathOpen` event; `None` if none was seen
    pub hot_path_open: Option<bool>,
    /// Newest first
    pub events: Vec<StatusEvent>,
}

/// Scan `dex` from `from_block` to the head in windows of `window` blocks.
pub async fn fetch_operational_status(
    chain: &dyn ChainClient,
    dex: Address,
    from_block: u64,
    window: u64,
) -> Result<OperationalStatus, GovernError> {
    let head = chain.block_number().await?;
    let window = window.max(1);
    let signatures = [CrocEvents::SafeMode::SIGNATURE_HASH, CrocEvents::HotPathOpen::SIGNATURE_HASH];

    let mut events = Vec::new();
    let mut start = from_block;
    while start <= head {
        let end = head.min(start.saturating_add(window - 1));
        let logs = chain.logs(dex, &signatures, start, end).await?;
        debug!(start, end, count = logs.len(), "scanned dex events");
        for log in &logs {
            if let Some(change) = decode(log)? {
                events.push(StatusEvent {
                    block_number: log.block_number,
                    transaction_hash: log.transaction_hash,
                    log_index: log.log_index,
                    change,
                });
            }
        }
        if end == head {
            break;
        }
        start = end + 1;
    }

    events.sort_by(|a, b| (b.block_number, b.log_index).cmp(&(a.block_number, a.log_index)));
    events.dedup_by_key(|e| (e.transaction_hash, e.log_index));

    let safe_mode = events.iter().find_map(|e| match e.change {
        StatusChange::SafeMode(on) => Some(on),
        StatusChange::HotPathOpen(_) => None,
    });
    let hot_path_open = events.iter().find_map(|e| match e.change {
        StatusChange::HotPathOpen(open) => Some(open),
        StatusChange::SafeMode(_) => None,
    });

    info!(%dex, from_block, head, events = events.len(), "fetched operational status");
    Ok(OperationalStatus { dex, from_block, to_block: head, safe_mode, hot_path_open, events })
}

fn decode(log: &ChainLog) -> Result<Option<StatusChange>, GovernError> {
    let bad = |e: alloy_sol_types::Error| {
        GovernError::Encoding(format!("bad status event in {}: {e}", log.transaction_hash))
    };
    match log.data.topics().first() {
        Some(topic) if *topic == CrocEvents::SafeMode::SIGNATURE_HASH => {
            let ev = CrocEvents::SafeMode::decode_log_data(&log.data).map_err(bad)?;
            Ok(Some(StatusChange::SafeMode(ev.inSafeMode)))
        }
        Some(topic) if *topic == CrocEvents::HotPathOpen::SIGNATURE_HASH => {
            let ev = CrocEvents::HotPathOpen::decode_log_data(&log.data).map_err(bad)?;
            Ok(Some(StatusChange::HotPathOpen(ev.open)))
        }
        _ => Ok(None),
    }
}
