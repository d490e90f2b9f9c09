//! Composition root: turns a [`Config`] into wired services.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use tracing::info;

use crate::adapter::outbound::agent::StaticStrategyEngine;
use crate::adapter::outbound::evm::{
    Erc20Allowance, EvmConnection, LocalReportSigner, OAquaBridge, OAquaSubmitter,
};
use crate::adapter::outbound::feed::HttpFeedSource;
use crate::adapter::outbound::store::JsonDispatchStore;
use crate::application::{
    ChainContext, CrisisCycle, DispatchSettings, FeeQuoter, PayloadBuilder, SwapDispatcher,
};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::port::{BridgeLayer, DispatchStore};

/// Fully wired services for one process.
pub struct Runtime {
    pub cycle: Arc<CrisisCycle>,
    pub dispatcher: Arc<SwapDispatcher>,
    pub context: ChainContext,
    pub wallet: Address,
}

/// Connect to the source chain and check it is the configured one.
///
/// # Errors
///
/// Missing key, unreachable RPC, or a chain id mismatch.
pub async fn connect(config: &Config) -> Result<EvmConnection> {
    let signer = config.wallet.signer()?;
    let conn = EvmConnection::new(config.rpc_url()?, signer);

    let chain_id = conn.chain_id().await?;
    if chain_id != config.source.chain_id {
        return Err(ConfigError::InvalidValue {
            field: "source.chain_id",
            reason: format!(
                "configured {} but RPC reports {chain_id}",
                config.source.chain_id
            ),
        }
        .into());
    }

    info!(
        chain_id,
        wallet = %conn.address(),
        sender = %config.source.sender_address,
        "Connected to source chain"
    );
    Ok(conn)
}

/// Per-dispatch context from configuration.
///
/// # Errors
///
/// Invalid salt or fee override.
pub fn chain_context(config: &Config) -> Result<ChainContext> {
    Ok(ChainContext {
        destination: config.destination(),
        spender: config.source.sender_address,
        salt: config.salt()?,
        fee_override: config.fee_override()?,
    })
}

/// Build the dispatcher on top of `conn`.
///
/// # Errors
///
/// Invalid maker traits, taker data or metadata.
pub fn build_dispatcher(config: &Config, conn: &EvmConnection) -> Result<SwapDispatcher> {
    let retry = config.retry.policy();
    let bridge: Arc<dyn BridgeLayer> = Arc::new(OAquaBridge::new(
        conn.clone(),
        config.source.sender_address,
        config.source.stargate_pool,
    ));

    let builder = PayloadBuilder::new(
        config.maker_traits()?,
        config.slippage(),
        config.dispatch.token_order,
    )
    .with_taker_data(config.taker_data()?)
    .with_metadata(config.metadata()?);
    let fee = FeeQuoter::new(Arc::clone(&bridge), config.fee_buffer(), retry);

    let settings = DispatchSettings {
        compose_gas_limit: u128::from(config.dispatch.compose_gas_limit),
        gas_limit: config.dispatch.gas_limit,
        approval: config.dispatch.approval,
        confirmation_timeout: config.retry.confirmation_timeout(),
        dry_run: config.dry_run,
    };

    Ok(SwapDispatcher::new(
        builder,
        bridge,
        fee,
        Arc::new(Erc20Allowance::new(conn.clone(), config.source.token_address)),
        Arc::new(LocalReportSigner::new(conn.signer().clone())),
        Arc::new(OAquaSubmitter::new(conn.clone(), config.source.sender_address)),
        retry,
        settings,
    ))
}

#[must_use]
pub fn build_store(config: &Config) -> Arc<dyn DispatchStore> {
    Arc::new(JsonDispatchStore::new(config.store.path.clone()))
}

/// Wire the scheduled crisis cycle.
///
/// # Errors
///
/// Connection or configuration failures.
pub async fn build_runtime(config: &Config) -> Result<Runtime> {
    let conn = connect(config).await?;
    let dispatcher = Arc::new(build_dispatcher(config, &conn)?);
    let context = chain_context(config)?;

    let feed = Arc::new(HttpFeedSource::new(
        config.feed_url()?,
        Duration::from_secs(config.feed.timeout_secs),
    )?);

    let mut engine = StaticStrategyEngine::new(config.bridge_params()?);
    if let Some(program) = config.program()? {
        engine = engine.with_program(program);
    }

    let cycle = Arc::new(CrisisCycle::new(
        feed,
        Arc::new(engine),
        Arc::clone(&dispatcher),
        build_store(config),
        context.clone(),
        config.retry.policy(),
    ));

    info!(
        dry_run = config.dry_run,
        interval_secs = config.schedule.interval_secs,
        feed = %config.feed.url,
        "Runtime ready"
    );

    Ok(Runtime {
        cycle,
        dispatcher,
        context,
        wallet: conn.address(),
    })
}
