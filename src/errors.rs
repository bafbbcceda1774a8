use thiserror::Error;

/// Errors raised while building resolutions or running deployment steps.
///
/// Nothing is recovered locally: every variant aborts the current command.
/// Transactions that were already mined stay mined; the operator resumes from
/// the registry.
#[derive(Debug, Error)]
pub enum GovernError {
    /// Required environment variable, flag or registry entry is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Salt or address lookup miss
    #[error("No {kind} found for {key}")]
    NotFound {
        /// What was being looked up (e.g. "CREATE2 salt")
        kind: &'static str,
        /// The lookup key as given by the caller
        key: String,
    },

    /// A caller-supplied parameter exceeds a hard-coded business ceiling
    #[error("Policy violation: {what} {value} exceeds maximum {max}")]
    PolicyViolation {
        /// The parameter that was rejected
        what: &'static str,
        /// The rejected value
        value: u64,
        /// The configured ceiling
        max: u64,
    },

    /// RPC call, submission or confirmation failure
    #[error("Network error: {0}")]
    Network(String),

    /// On-chain call or transaction reverted
    #[error("Contract reverted during {context}: {reason}")]
    ContractRevert {
        /// Label of the call that reverted
        context: String,
        /// Revert reason as reported by the node (may be empty)
        reason: String,
    },

    /// An argument does not fit its declared ABI type
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The operator declined a confirmation prompt
    #[error("Declined by operator: {0}")]
    Declined(String),
}

impl GovernError {
    /// Shorthand for a missing registry slot.
    pub fn missing_role(role: &str) -> Self {
        GovernError::Configuration(format!("registry has no address for `{role}`"))
    }
}
