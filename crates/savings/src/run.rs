use {
    crate::{
        aggregator::Aggregator,
        arguments::Arguments,
        config::Config,
        dialog::SavingsDialog,
        plugin,
    },
    anyhow::{Result, bail},
    clap::Parser,
    shared::{
        ethrpc::Web3,
        sources::{
            PairFetching,
            aave::{AaveDataProvider, AaveSource},
            lido::LidoPairs,
            yearn::{YearnSource, api::YearnApiClient},
        },
        token_info::{CachedTokenInfoFetcher, TokenInfoFetcher, TokenInfoFetching},
        wallet::Web3Wallet,
    },
    std::{collections::HashMap, sync::Arc},
};

pub async fn start(args: impl Iterator<Item = String>) {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&observe::tracing::Config::new(
        &args.log_filter,
        args.use_json_logs,
    ));
    tracing::info!("running savings with validated arguments:\n{}", args);
    if let Err(err) = run(args).await {
        tracing::error!(?err, "savings failed");
        std::process::exit(1);
    }
}

pub async fn run(args: Arguments) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => Config::default(),
    };
    tracing::debug!(?config, "loaded configuration");

    let chains = plugin::available_chains(&plugin::definition(), &config.networks);
    if !chains.contains(&args.chain_id) {
        bail!(
            "chain {} is not available for savings, available: {chains:?}",
            args.chain_id
        );
    }

    let web3 = Arc::new(Web3::new(
        &HashMap::from([(args.chain_id, args.node_url.clone())]),
        None,
    ));
    let token_infos: Arc<dyn TokenInfoFetching> =
        Arc::new(CachedTokenInfoFetcher::new(Arc::new(TokenInfoFetcher {
            web3: web3.clone(),
        })));
    let sources: Vec<Arc<dyn PairFetching>> = vec![
        Arc::new(LidoPairs),
        Arc::new(AaveSource::new(
            Arc::new(AaveDataProvider::new(web3.clone(), config.aave.addresses())),
            token_infos.clone(),
            config.pairing_policy,
        )),
        Arc::new(YearnSource::new(
            Arc::new(YearnApiClient::new(
                reqwest::Client::new(),
                config.yearn.base_url()?,
                config.yearn.timeout,
            )),
            token_infos,
            config.pairing_policy,
        )),
    ];
    let wallet = Arc::new(Web3Wallet::new(web3, args.chain_id, args.account));
    let aggregator = Arc::new(Aggregator::new(
        sources,
        wallet,
        config.adapter_failure_policy,
    ));

    let mut dialog = SavingsDialog::new(aggregator, chains, args.chain_id, args.account);
    dialog.refresh().await;
    for failure in dialog.failures() {
        tracing::warn!(kind = %failure.kind, error = ?failure.error, "protocol source unavailable");
    }
    for protocol in dialog.protocols(args.tab) {
        let derivative = protocol.derivative_token();
        println!(
            "{}\t{}\t{}\t{}",
            protocol.kind,
            protocol.display_token().symbol(),
            derivative.symbol(),
            number::format_units(protocol.balance, derivative.decimals),
        );
    }
    Ok(())
}
