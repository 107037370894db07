use clap::Parser;
use spfcheck_lib::{DEFAULT_MAX_DEPTH, ResolverErrorPolicy, ResolverOptions, SpfOptions};

#[derive(Parser)]
#[command(name = "spfcheck-cli", version, about = "Resolve SPF records into authorized networks")]
pub struct Cli {
    /// domaines à résoudre
    pub domains: Vec<String>,

    /// lit des domaines depuis stdin (un par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (format choisi par --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// profondeur maximale include/redirect
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// serveur DNS à interroger (répétable, IP)
    #[arg(long = "nameserver")]
    pub nameservers: Vec<String>,

    /// timeout par requête DNS (ms)
    #[arg(long = "timeout-ms", default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// nombre de tentatives par requête DNS
    #[arg(long, default_value_t = 2)]
    pub attempts: usize,

    /// une erreur DNS interrompt toute la résolution du domaine
    #[arg(long = "abort-on-error")]
    pub abort_on_error: bool,

    /// récupère le texte pointé par exp=
    #[arg(long)]
    pub explain: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn spf_options(&self) -> SpfOptions {
        let policy = if self.abort_on_error {
            ResolverErrorPolicy::Abort
        } else {
            ResolverErrorPolicy::Tolerate
        };
        SpfOptions::new()
            .with_max_depth(self.max_depth)
            .with_resolver_errors(policy)
            .fetch_explanation(self.explain)
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::new()
            .with_nameservers(self.nameservers.iter().cloned())
            .with_timeout_ms(self.timeout_ms)
            .with_attempts(self.attempts)
    }
}
