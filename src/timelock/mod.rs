//! Timelock call builder.
//!
//! A governance action reaches its target in two transactions sent by the
//! same multisig to a `TimelockAccepts` contract:
//!
//! 1. `schedule(target, 0, data, 0x0, salt, delay)`
//! 2. after `delay` seconds, `execute(target, 0, data, 0x0, salt)`
//!
//! The timelock identifies the operation by hashing `(target, value, data,
//! predecessor, salt)`, so both blobs must carry the identical tuple.

pub mod salt;

pub use salt::{HashedNonceSalt, SaltSource, WallClockSalt};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::debug;

use crate::contracts::TimelockAccepts;
use crate::errors::GovernError;

/// The paired calldata for one timelocked operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelockCallPair {
    pub timelock_addr: Address,
    pub target: Address,
    pub data: Bytes,
    pub schedule_calldata: Bytes,
    pub exec_calldata: Bytes,
    pub delay: u64,
    pub salt: B256,
}

/// Builds [`TimelockCallPair`]s against one salt source.
pub struct TimelockCallBuilder {
    salts: Box<dyn SaltSource + Send>,
    max_delay: Option<u64>,
}

impl TimelockCallBuilder {
    pub fn new(salts: impl SaltSource + Send + 'static) -> Self {
        Self { salts: Box::new(salts), max_delay: None }
    }

    /// Reject delays above `max_delay` seconds.
    pub fn with_max_delay(mut self, max_delay: u64) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Produce schedule and execute calldata for calling `target` with `data`
    /// through `timelock` after `delay` seconds.
    pub fn build(
        &mut self,
        timelock: Address,
        target: Address,
        data: Bytes,
        delay: u64,
    ) -> Result<TimelockCallPair, GovernError> {
        check_delay(delay, self.max_delay)?;

        let salt = self.salts.next_salt(target, &data, delay);
        let schedule = TimelockAccepts::scheduleCall {
            target,
            value: U256::ZERO,
            data: data.clone(),
            predecessor: B256::ZERO,
            salt,
            delay: U256::from(delay),
        };
        let execute = TimelockAccepts::executeCall {
            target,
            value: U256::ZERO,
            data: data.clone(),
            predecessor: B256::ZERO,
            salt,
        };
        debug!(%timelock, %target, delay, %salt, "built timelock call pair");

        Ok(TimelockCallPair {
            timelock_addr: timelock,
            target,
            data,
            schedule_calldata: schedule.abi_encode().into(),
            exec_calldata: execute.abi_encode().into(),
            delay,
            salt,
        })
    }
}

/// Fail with `PolicyViolation` when `delay` exceeds the ceiling.
pub fn check_delay(delay: u64, max_delay: Option<u64>) -> Result<(), GovernError> {
    match max_delay {
        Some(max) if delay > max => {
            Err(GovernError::PolicyViolation { what: "timelock delay", value: delay, max })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TIMELOCK_DELAY;
    use alloy_primitives::{address, bytes};

    const TIMELOCK: Address = address!("7237C120FCA2081f1A36AB933B065389174962B7");
    const DEX: Address = address!("AaAaAAAaA24eEeb8d57D431224f73832bC34f688");

    fn builder() -> TimelockCallBuilder {
        TimelockCallBuilder::new(HashedNonceSalt::with_entropy(B256::repeat_byte(9)))
    }

    #[test]
    fn test_execute_decodes_to_expected_tuple() {
        let pair = builder().build(TIMELOCK, DEX, bytes!("aabbcc"), 172800).unwrap();

        let exec = TimelockAccepts::executeCall::abi_decode(&pair.exec_calldata).unwrap();
        assert_eq!(exec.target, DEX);
        assert_eq!(exec.value, U256::ZERO);
        assert_eq!(exec.data, bytes!("aabbcc"));
        assert_eq!(exec.predecessor, B256::ZERO);
        assert_eq!(exec.salt, pair.salt);
    }

    #[test]
    fn test_schedule_is_execute_plus_delay() {
        let pair = builder().build(TIMELOCK, DEX, bytes!("aabbcc"), 172800).unwrap();

        let sched = TimelockAccepts::scheduleCall::abi_decode(&pair.schedule_calldata).unwrap();
        let exec = TimelockAccepts::executeCall::abi_decode(&pair.exec_calldata).unwrap();
        assert_eq!(sched.target, exec.target);
        assert_eq!(sched.value, exec.value);
        assert_eq!(sched.data, exec.data);
        assert_eq!(sched.predecessor, exec.predecessor);
        assert_eq!(sched.salt, exec.salt);
        assert_eq!(sched.delay, U256::from(172800u64));
    }

    #[test]
    fn test_calldata_starts_with_selectors() {
        let pair = builder().build(TIMELOCK, DEX, bytes!("aabbcc"), 30).unwrap();
        assert_eq!(&pair.schedule_calldata[..4], &TimelockAccepts::scheduleCall::SELECTOR);
        assert_eq!(&pair.exec_calldata[..4], &TimelockAccepts::executeCall::SELECTOR);
        assert_eq!(pair.timelock_addr, TIMELOCK);
    }

    #[test]
    fn test_delay_ceiling_boundary() {
        let mut capped = builder().with_max_delay(MAX_TIMELOCK_DELAY);
        assert!(capped.build(TIMELOCK, DEX, bytes!("00"), 604800).is_ok());

        let err = capped.build(TIMELOCK, DEX, bytes!("00"), 604801).unwrap_err();
        assert!(matches!(
            err,
            GovernError::PolicyViolation { value: 604801, max: 604800, .. }
        ));
    }

    #[test]
    fn test_uncapped_builder_accepts_any_delay() {
        assert!(builder().build(TIMELOCK, DEX, bytes!("00"), u64::MAX).is_ok());
    }

    #[test]
    fn test_timestamp_salts_collide_hashed_salts_do_not() {
        let mut clocked = TimelockCallBuilder::new(WallClockSalt::with_clock(|| 1_700_000_000_000));
        let a = clocked.build(TIMELOCK, DEX, bytes!("aabbcc"), 60).unwrap();
        let b = clocked.build(TIMELOCK, DEX, bytes!("aabbcc"), 60).unwrap();
        assert_eq!(a.salt, b.salt);
        assert_eq!(a.schedule_calldata, b.schedule_calldata);

        let mut hashed = builder();
        let c = hashed.build(TIMELOCK, DEX, bytes!("aabbcc"), 60).unwrap();
        let d = hashed.build(TIMELOCK, DEX, bytes!("aabbcc"), 60).unwrap();
        assert_ne!(c.salt, d.salt);
        assert_ne!(c.schedule_calldata, d.schedule_calldata);
    }
}
