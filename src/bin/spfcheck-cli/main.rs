mod args;
mod output;

use anyhow::{Context, Result};
use spfcheck_lib::SystemResolver;

use std::io::{self, BufRead};

use crate::args::Cli;
use crate::output::DomainReport;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut domains: Vec<String> = cli.domains.clone();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                domains.push(trimmed.to_string());
            }
        }
    }

    if domains.is_empty() {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    let resolver =
        SystemResolver::with_options(&cli.resolver_options()).context("build DNS resolver")?;
    let options = cli.spf_options();

    let reports: Vec<DomainReport> = domains
        .iter()
        .map(|domain| DomainReport::resolve(&resolver, domain, &options))
        .collect();

    output::write_reports(&reports, &cli)?;

    // codes de sortie : 0 OK, 2 domaines à signaler, 1 fatal
    if output::any_flagged(&reports) {
        std::process::exit(2);
    }
    Ok(())
}
