//! Colored console output for operators.
//!
//! Everything an operator acts on goes to stdout through here; logs go to
//! stderr through `tracing`. Color scheme: blue+bold headers, cyan values,
//! green success, yellow warnings, dimmed secondary text. Calldata is never
//! colored so that copying it out of a terminal yields exactly the bytes.

use alloy_primitives::{Address, B256};
use colored::{ColoredString, Colorize};
use std::fmt;

use crate::deploy::DeploymentLedger;
use crate::errors::GovernError;
use crate::registry::Network;
use crate::resolution::GovernanceResolution;
use crate::status::OperationalStatus;

// ── Helpers ────────────────────────────────────────────────────────

/// Format a delay in seconds as `"172800s (2d)"`.
///
/// - Under a minute → `"30s"`
/// - Otherwise the largest units, e.g. `"5400s (1h 30m)"`
pub fn format_delay(secs: u64) -> String {
    if secs < 60 {
        return format!("{secs}s");
    }
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let mins = secs % 3_600 / 60;
    let rest = secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if mins > 0 {
        parts.push(format!("{mins}m"));
    }
    if rest > 0 {
        parts.push(format!("{rest}s"));
    }
    format!("{secs}s ({})", parts.join(" "))
}

// ── Resolutions ────────────────────────────────────────────────────

/// Operator instructions for one resolution.
///
/// Step 1 schedules, step 2 executes after the delay. Each calldata blob is
/// on its own uncolored line.
pub struct Instructions<'a> {
    pub resolution: &'a GovernanceResolution,
    pub tag: &'a str,
}

impl fmt::Display for Instructions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let res = self.resolution;
        let call = &res.timelock_call;

        writeln!(f)?;
        writeln!(f, "-----")?;
        writeln!(f, "{}", "Presenting instructions for governance resolution".yellow().bold())?;
        writeln!(f)?;
        writeln!(f, "Description: {}", self.tag)?;
        writeln!(f, "Execution instructions for {} resolution", res.kind)?;
        writeln!(f)?;
        writeln!(f, "Will execute {}", res.effect())?;
        writeln!(f, "Policy call target: {}", call.target)?;
        writeln!(f)?;

        writeln!(f, "{}", format!("Step 1: Use the Gnosis Safe at {}", res.multisig_origin).blue())?;
        writeln!(f, "Transaction to timelock contract at {}", call.timelock_addr)?;
        writeln!(f, "(Message value: 0)")?;
        writeln!(f, "With the following calldata:")?;
        writeln!(f, "{}", call.schedule_calldata)?;
        writeln!(f)?;

        writeln!(f, "{}", format!("Step 2: Wait at least {}", format_delay(call.delay)).blue())?;
        writeln!(f, "{}", format!("Use same Gnosis Safe at {}", res.multisig_origin).blue())?;
        writeln!(f, "Transaction to timelock contract at {}", call.timelock_addr)?;
        writeln!(f, "(Message value: 0)")?;
        writeln!(f, "With the following calldata:")?;
        writeln!(f, "{}", call.exec_calldata)?;
        writeln!(f, "{}", format!("Salt: {}", call.salt).dimmed())?;
        writeln!(f, "-----")
    }
}

/// Render the operator instructions for one resolution.
pub fn render_resolution(res: &GovernanceResolution, tag: &str) -> String {
    Instructions { resolution: res, tag }.to_string()
}

/// Print the instructions for one resolution to stdout.
pub fn print_resolution(res: &GovernanceResolution, tag: &str) {
    print!("{}", render_resolution(res, tag));
}

/// Resolutions as pretty JSON, each paired with its description.
pub fn render_resolutions_json(
    items: &[(String, GovernanceResolution)],
) -> Result<String, GovernError> {
    let entries: Vec<_> = items
        .iter()
        .map(|(tag, res)| serde_json::json!({ "description": tag, "resolution": res }))
        .collect();
    serde_json::to_string_pretty(&entries)
        .map_err(|e| GovernError::Encoding(format!("cannot serialize resolution: {e}")))
}

// ── Chain Context ──────────────────────────────────────────────────

/// Print the selected network and, when present, the signing account.
pub fn print_banner(network: Network, signer: Option<Address>) {
    println!();
    println!("{}", "=== CrocSwap Operations ===".blue().bold());
    println!("  Network:  {}", network.to_string().cyan());
    println!("  Chain ID: {}", network.chain_id().to_string().cyan());
    match signer {
        Some(addr) => println!("  Signer:   {}", format!("{addr}").cyan()),
        None => println!("  Signer:   {}", "none (read-only)".dimmed()),
    }
}

/// Print the address record as JSON for the operator to commit.
pub fn print_registry(network: Network, json: &str) {
    println!();
    println!("{}", format!("Address registry for {network}:").blue().bold());
    println!("{json}");
}

/// Print a salt registry entry in registry-file form.
pub fn print_salt_entry(deployer: &Address, salt: &B256) {
    println!("  \"{}\": \"{}\"", format!("{deployer:#x}").cyan(), salt);
}

// ── Deployment ─────────────────────────────────────────────────────

/// Print the heading of a rollout step.
pub fn print_step(index: usize, name: &str) {
    println!();
    println!("{}", format!("Step {index}: {name}").blue().bold());
}

/// Print that an existing contract is reused.
pub fn print_attached(name: &str, addr: &Address) {
    println!(
        "  {} {} already at {}",
        "SKIP".dimmed(),
        name.cyan(),
        format!("{addr}").cyan()
    );
}

/// Print a freshly deployed contract.
pub fn print_deployed(name: &str, addr: &Address) {
    println!(
        "  {} {} deployed at {}",
        "OK".green().bold(),
        name.cyan(),
        format!("{addr}").cyan()
    );
}

/// Print a mined transaction.
pub fn print_tx_confirmed(label: &str, hash: &B256) {
    println!(
        "  {} {} {}",
        "OK".green().bold(),
        label,
        format!("{hash}").dimmed()
    );
}

/// Print every role the run touched with its lifecycle state.
pub fn print_ledger(ledger: &DeploymentLedger) {
    println!();
    println!("{}", "Deployment ledger:".blue().bold());
    for (role, state) in ledger.iter() {
        println!("  {:<20} {}", role.to_string(), state.to_string().cyan());
    }
}

// ── Status ─────────────────────────────────────────────────────────

fn flag(value: Option<bool>, yes: ColoredString, no: ColoredString) -> String {
    match value {
        Some(true) => yes.to_string(),
        Some(false) => no.to_string(),
        None => "no events".dimmed().to_string(),
    }
}

/// Print the dex's operational status, newest event first.
pub fn print_status(status: &OperationalStatus) {
    println!();
    println!("{}", format!("Operational status of {}", status.dex).blue().bold());
    println!("  Blocks:    {}", format!("{}..={}", status.from_block, status.to_block).cyan());
    println!("  Safe mode: {}", flag(status.safe_mode, "ON".yellow().bold(), "off".green()));
    println!("  Hot path:  {}", flag(status.hot_path_open, "open".green(), "CLOSED".yellow().bold()));
    for ev in &status.events {
        println!(
            "    {} {:?} {}",
            format!("#{}", ev.block_number).dimmed(),
            ev.change,
            format!("{}", ev.transaction_hash).dimmed()
        );
    }
}

/// Status as pretty JSON.
pub fn render_status_json(status: &OperationalStatus) -> Result<String, GovernError> {
    serde_json::to_string_pretty(status)
        .map_err(|e| GovernError::Encoding(format!("cannot serialize status: {e}")))
}

/// Print a warning.
pub fn print_warning(msg: &str) {
    println!("  {} {}", "WARNING:".yellow().bold(), msg);
}

/// Print a generic informational message.
pub fn print_info(msg: &str) {
    println!("  {} {}", "INFO".blue().bold(), msg);
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::opcodes;
    use crate::registry::AddressRegistry;
    use crate::resolution::Resolutions;
    use crate::timelock::{HashedNonceSalt, TimelockCallBuilder};

    fn sample() -> GovernanceResolution {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls =
            TimelockCallBuilder::new(HashedNonceSalt::with_entropy(B256::repeat_byte(5)));
        let mut flows = Resolutions::new(&registry, &mut calls);
        flows.disable_safe_mode(172800).unwrap()
    }

    #[test]
    fn test_format_delay_short() {
        assert_eq!(format_delay(0), "0s");
        assert_eq!(format_delay(30), "30s");
    }

    #[test]
    fn test_format_delay_units() {
        assert_eq!(format_delay(172800), "172800s (2d)");
        assert_eq!(format_delay(5400), "5400s (1h 30m)");
        assert_eq!(format_delay(604801), "604801s (7d 1s)");
    }

    #[test]
    fn test_calldata_printed_verbatim_on_own_line() {
        let res = sample();
        let text = render_resolution(&res, "disable safe mode");
        let lines: Vec<&str> = text.lines().collect();

        let schedule = format!("{}", res.timelock_call.schedule_calldata);
        let exec = format!("{}", res.timelock_call.exec_calldata);
        assert!(schedule.starts_with("0x"));
        assert_eq!(schedule, schedule.to_lowercase());
        assert!(lines.contains(&schedule.as_str()));
        assert!(lines.contains(&exec.as_str()));
    }

    #[test]
    fn test_steps_are_ordered() {
        let res = sample();
        let text = render_resolution(&res, "disable safe mode");

        let step1 = text.find("Step 1").unwrap();
        let schedule = text.find(&res.timelock_call.schedule_calldata.to_string()).unwrap();
        let step2 = text.find("Step 2").unwrap();
        let exec = text.find(&res.timelock_call.exec_calldata.to_string()).unwrap();
        assert!(step1 < schedule && schedule < step2 && step2 < exec);
        assert!(text.contains("Description: disable safe mode"));
        assert!(text.contains("treasury resolution"));
        assert!(text.contains("172800s (2d)"));
    }

    #[test]
    fn test_json_output_carries_calldata() {
        let res = sample();
        let json = render_resolutions_json(&[("halt".to_string(), res.clone())]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &parsed[0];
        assert_eq!(entry["description"], "halt");
        assert_eq!(
            entry["resolution"]["timelockCall"]["execCalldata"],
            res.timelock_call.exec_calldata.to_string()
        );
        assert_eq!(entry["resolution"]["kind"], "treasury");
    }

    #[test]
    fn test_install_effect_names_callpath() {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls = TimelockCallBuilder::new(HashedNonceSalt::with_entropy(B256::ZERO));
        let mut flows = Resolutions::new(&registry, &mut calls);
        let cmd = opcodes::install_proxy(Address::with_last_byte(1), 2).unwrap();
        let res = flows.treasury_resolution(cmd, 30).unwrap();
        assert!(res.effect().contains("callpath 0"));
        assert!(res.effect().contains("sudo true"));
    }

    #[test]
    fn test_instructions_display_matches_render() {
        let res = sample();
        let shown = Instructions { resolution: &res, tag: "halt" }.to_string();
        assert_eq!(shown, render_resolution(&res, "halt"));
        assert!(shown.ends_with("-----\n"));
    }

    #[test]
    fn test_status_json_reports_unknown_state_as_null() {
        let status = OperationalStatus {
            dex: Address::with_last_byte(0xDE),
            from_block: 5_000_000,
            to_block: 5_000_100,
            safe_mode: Some(true),
            hot_path_open: None,
            events: vec![],
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&render_status_json(&status).unwrap()).unwrap();
        assert_eq!(parsed["safeMode"], true);
        assert!(parsed["hotPathOpen"].is_null());
        assert_eq!(parsed["toBlock"], 5_000_100);
    }
}
