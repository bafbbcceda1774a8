use croc_ops::cli::{Cli, Command, GlobalArgs, ResolutionCommand, SaltCommand};
use croc_ops::codec::{self, opcodes, ProtocolCommand};
use croc_ops::config::{self, ChainContext};
use croc_ops::constants::{LOG_BLOCK_RANGE, MAX_TIMELOCK_DELAY};
use croc_ops::deploy::{AutoApprove, Confirm, HardhatArtifacts, Sequencer, StdinPrompt};
use croc_ops::errors::GovernError;
use croc_ops::output;
use croc_ops::registry::{derive_salt, AddressRegistry, Role};
use croc_ops::resolution::{GovernanceResolution, ResolutionKind, Resolutions};
use croc_ops::rpc::{self, ChainClient, JsonRpcChain};
use croc_ops::status::fetch_operational_status;
use croc_ops::timelock::check_delay;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Entry point for the CrocSwap operations tool
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.log_json);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only operator output.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> eyre::Result<()> {
    let global = cli.global;
    match cli.command {
        Command::Salt { action } => salt(&global, action),
        Command::Registry => {
            let ctx = ChainContext::load(&global)?;
            output::print_registry(ctx.network, &ctx.registry.to_json()?);
            Ok(())
        }
        Command::Deploy { step, all, target_delay } => {
            deploy(&global, step, all, target_delay).await
        }
        Command::Status { from } => status(&global, from).await,
        Command::Resolution { action } => resolution(&global, action).await,
    }
}

// ── Salts ──────────────────────────────────────────────────────────

fn salt(global: &GlobalArgs, action: SaltCommand) -> eyre::Result<()> {
    match action {
        SaltCommand::Generate { deployer } => {
            output::print_salt_entry(&deployer, &derive_salt(deployer));
        }
        SaltCommand::Show { deployer } => {
            let salts = config::load_salts(global.salts.as_deref())?;
            match deployer {
                Some(raw) => {
                    let salt = salts.resolve(&raw)?;
                    let addr = raw.trim().to_lowercase().parse()?;
                    output::print_salt_entry(&addr, &salt);
                }
                None => {
                    for (deployer, salt) in salts.iter() {
                        output::print_salt_entry(deployer, salt);
                    }
                }
            }
        }
    }
    Ok(())
}

// ── Deployment ─────────────────────────────────────────────────────

async fn deploy(
    global: &GlobalArgs,
    step: Option<croc_ops::deploy::DeployStep>,
    all: bool,
    target_delay: u64,
) -> eyre::Result<()> {
    let ctx = ChainContext::load(global)?;
    let url = ctx.require_rpc_url()?;
    let wallet = ctx.require_wallet()?.clone();
    output::print_banner(ctx.network, Some(wallet.address()));

    let chain =
        JsonRpcChain::connect(url, ctx.network.chain_id(), Some(wallet), ctx.confirm_timeout)
            .await?;
    let artifacts = HardhatArtifacts::new(&global.artifacts);
    let confirm: Box<dyn Confirm> =
        if global.yes { Box::new(AutoApprove) } else { Box::new(StdinPrompt) };

    let mut seq = Sequencer::new(
        &chain,
        &artifacts,
        confirm.as_ref(),
        &ctx.salts,
        global.salt_strategy.call_builder(),
        ctx.registry.clone(),
    )
    .with_target_delay(target_delay)
    .with_pool_idx(global.pool_idx);

    let result = match (step, all) {
        (_, true) => seq.run_all().await,
        (Some(step), false) => seq.run(step).await,
        (None, false) => Err(GovernError::Configuration("no deployment step given".into())),
    };

    // The registry is printed even after a failure so the run can be resumed.
    output::print_ledger(seq.ledger());
    if result.is_err() {
        output::print_warning("deployment stopped; rerun from the failed step with the registry below");
    }
    let registry = seq.into_registry();
    finish_registry(global, &registry)?;
    let outcome = result?;
    present(global, &outcome.resolutions)?;
    Ok(())
}

fn finish_registry(global: &GlobalArgs, registry: &AddressRegistry) -> eyre::Result<()> {
    output::print_registry(registry.network(), &registry.to_json()?);
    if let Some(path) = &global.registry_out {
        registry.write_file(path)?;
        output::print_info(&format!("registry written to {}", path.display()));
    }
    Ok(())
}

// ── Status ─────────────────────────────────────────────────────────

async fn status(global: &GlobalArgs, from: u64) -> eyre::Result<()> {
    let ctx = ChainContext::load(global)?;
    let dex = ctx.registry.require(Role::Dex)?;
    let chain =
        JsonRpcChain::connect(ctx.require_rpc_url()?, ctx.network.chain_id(), None, ctx.confirm_timeout)
            .await?;
    let status = fetch_operational_status(&chain, dex, from, LOG_BLOCK_RANGE).await?;
    if global.json {
        println!("{}", output::render_status_json(&status)?);
    } else {
        output::print_status(&status);
    }
    Ok(())
}

// ── Resolutions ────────────────────────────────────────────────────

async fn resolution(global: &GlobalArgs, action: ResolutionCommand) -> eyre::Result<()> {
    let ctx = ChainContext::load(global)?;
    let mut calls = global.salt_strategy.call_builder();

    let kind = match &action {
        ResolutionCommand::ProtocolCmd { kind, .. } | ResolutionCommand::UpdateDelay { kind, .. } => {
            *kind
        }
        ResolutionCommand::PoolParams => ResolutionKind::Ops,
        _ => ResolutionKind::Treasury,
    };
    // An out-of-range delay fails before any registry or RPC lookup.
    if let ResolutionCommand::UpdateDelay { new_delay, .. } = &action {
        check_delay(*new_delay, Some(MAX_TIMELOCK_DELAY))?;
    }
    let delay = current_delay(global, &ctx, kind).await?;

    let mut flows = Resolutions::new(&ctx.registry, &mut calls);
    let items: Vec<(String, GovernanceResolution)> = match action {
        ResolutionCommand::ProtocolCmd { kind, callpath, opcode, sudo, args } => {
            let payload = codec::encode(opcode, &args)?;
            let cmd = ProtocolCommand::new(callpath, payload, sudo);
            let tag = format!("Protocol command {opcode} on callpath {callpath}");
            vec![(tag, flows.resolution(kind, cmd, delay)?)]
        }
        ResolutionCommand::InstallProxy { proxy, index } => {
            let cmd = opcodes::install_proxy(proxy, index)?;
            let tag = format!("Install proxy {proxy} at callpath {index}");
            vec![(tag, flows.treasury_resolution(cmd, delay)?)]
        }
        ResolutionCommand::PoolParams => {
            let params = ctx.network.pool_params(global.pool_idx)?;
            vec![
                (
                    "Set pool init liquidity".to_string(),
                    flows.ops_resolution(opcodes::init_liquidity(&params)?, delay)?,
                ),
                (
                    "Set standard pool template".to_string(),
                    flows.ops_resolution(opcodes::pool_template(&params)?, delay)?,
                ),
            ]
        }
        ResolutionCommand::EmergencyHalt { reason } => {
            vec![("Emergency halt".to_string(), flows.emergency_halt(&reason, delay)?)]
        }
        ResolutionCommand::RestoreOperations => {
            let mut res = flows.restore_operations(delay)?.into_iter();
            let hot = res.next();
            let safe = res.next();
            [("Reopen hot path", hot), ("Disable safe mode", safe)]
                .into_iter()
                .filter_map(|(tag, r)| r.map(|r| (tag.to_string(), r)))
                .collect()
        }
        ResolutionCommand::DisableSafeMode => {
            vec![("Disable safe mode".to_string(), flows.disable_safe_mode(delay)?)]
        }
        ResolutionCommand::UpdateDelay { kind, new_delay } => {
            let tag = format!("Set {kind} timelock delay to {new_delay}s");
            vec![(tag, flows.update_timelock_delay(kind, new_delay, delay)?)]
        }
    };

    present(global, &items)
}

/// `--current-delay`, or `getMinDelay()` of the timelock that will schedule.
async fn current_delay(
    global: &GlobalArgs,
    ctx: &ChainContext,
    kind: ResolutionKind,
) -> eyre::Result<u64> {
    if let Some(delay) = global.current_delay {
        return Ok(delay);
    }
    let timelock = ctx.registry.require(kind.timelock_role())?;
    let chain =
        JsonRpcChain::connect(ctx.require_rpc_url()?, ctx.network.chain_id(), None, ctx.confirm_timeout)
            .await?;
    let delay = rpc::timelock_min_delay(&chain as &dyn ChainClient, timelock).await?;
    tracing::info!(%timelock, delay, "read current timelock delay");
    Ok(delay)
}

fn present(global: &GlobalArgs, items: &[(String, GovernanceResolution)]) -> eyre::Result<()> {
    if global.json {
        println!("{}", output::render_resolutions_json(items)?);
    } else {
        for (tag, res) in items {
            output::print_resolution(res, tag);
        }
    }
    Ok(())
}
