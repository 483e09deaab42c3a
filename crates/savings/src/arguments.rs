use {
    alloy::primitives::Address,
    model::Tab,
    std::{fmt, path::PathBuf},
    url::Url,
};

#[derive(clap::Parser, Debug)]
#[command(about = "List the savings protocols available to an account")]
pub struct Arguments {
    /// JSON-RPC node of the chain to list.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// TOML configuration file. Defaults apply when omitted.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    #[clap(long, env, default_value = "warn,savings=debug,shared=debug")]
    pub log_filter: String,

    #[clap(long, env)]
    pub use_json_logs: bool,

    #[clap(long, env, default_value = "1")]
    pub chain_id: u64,

    /// Account whose positions are shown. Without one every balance is zero.
    #[clap(long, env)]
    pub account: Option<Address>,

    /// `deposit` lists every protocol, `withdraw` only those holding a
    /// balance.
    #[clap(long, env, default_value = "deposit")]
    pub tab: Tab,
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            node_url,
            config,
            log_filter,
            use_json_logs,
            chain_id,
            account,
            tab,
        } = self;

        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "config: {config:?}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        writeln!(f, "chain_id: {chain_id}")?;
        writeln!(f, "account: {account:?}")?;
        writeln!(f, "tab: {tab}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[test]
    fn parses_defaults_and_flags() {
        let args = Arguments::try_parse_from([
            "savings",
            "--chain-id",
            "250",
            "--tab",
            "withdraw",
            "--account",
            "0x1111111111111111111111111111111111111111",
        ])
        .unwrap();
        assert_eq!(args.chain_id, 250);
        assert_eq!(args.tab, Tab::Withdraw);
        assert_eq!(args.account, Some(Address::repeat_byte(0x11)));
        assert_eq!(args.node_url.as_str(), "http://localhost:8545/");
        assert!(args.config.is_none());
    }
}
