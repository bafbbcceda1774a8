use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the 32-byte salt that ties a timelock `schedule` to its `execute`.
///
/// The timelock rejects a schedule whose operation id is already pending, and
/// the id is derived from the salt, so a source must not repeat for the same
/// call on the same timelock.
pub trait SaltSource {
    fn next_salt(&mut self, target: Address, data: &Bytes, delay: u64) -> B256;
}

/// Milliseconds since the epoch, left-padded to 32 bytes.
///
/// Two calls inside the same millisecond get the same salt; two identical
/// resolutions built that close together collide on-chain. Prefer
/// [`HashedNonceSalt`].
pub struct WallClockSalt {
    clock: Box<dyn Fn() -> u64 + Send>,
}

impl WallClockSalt {
    pub fn new() -> Self {
        Self::with_clock(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        })
    }

    /// Use a custom millisecond clock.
    pub fn with_clock(clock: impl Fn() -> u64 + Send + 'static) -> Self {
        Self { clock: Box::new(clock) }
    }
}

impl Default for WallClockSalt {
    fn default() -> Self {
        Self::new()
    }
}

impl SaltSource for WallClockSalt {
    fn next_salt(&mut self, _target: Address, _data: &Bytes, _delay: u64) -> B256 {
        B256::from(U256::from((self.clock)()).to_be_bytes())
    }
}

/// `keccak256(abi.encode(target, data, delay, nonce, entropy))`.
///
/// `nonce` increments on every call and `entropy` is drawn once per instance,
/// so salts are distinct regardless of call rate and across processes.
#[derive(Debug, Clone)]
pub struct HashedNonceSalt {
    nonce: u64,
    entropy: B256,
}

impl HashedNonceSalt {
    /// Fresh instance with random entropy.
    pub fn new() -> Self {
        Self::with_entropy(B256::random())
    }

    pub fn with_entropy(entropy: B256) -> Self {
        Self { nonce: 0, entropy }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

impl Default for HashedNonceSalt {
    fn default() -> Self {
        Self::new()
    }
}

impl SaltSource for HashedNonceSalt {
    fn next_salt(&mut self, target: Address, data: &Bytes, delay: u64) -> B256 {
        let nonce = self.nonce;
        self.nonce += 1;
        let encoded =
            (target, data.clone(), U256::from(delay), U256::from(nonce), self.entropy).abi_encode();
        keccak256(encoded)
    }
}
