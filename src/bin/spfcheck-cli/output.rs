use anyhow::{Context, Result, bail};

use spfcheck_lib::{DnsResolver, SpfError, SpfOptions, SpfRecord, resolve_with_resolver};

use crate::args::Cli;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct DomainReport {
    pub domain: String,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub records: Vec<SpfRecord>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub skipped: Option<String>,
}

impl DomainReport {
    pub fn resolve<R>(resolver: &R, domain: &str, options: &SpfOptions) -> Self
    where
        R: DnsResolver + ?Sized,
    {
        let mut report = Self {
            domain: domain.to_string(),
            records: Vec::new(),
            error: None,
            skipped: None,
        };
        match resolve_with_resolver(resolver, domain, options) {
            Ok(records) => report.records = records,
            Err(SpfError::EmptyDomain) => report.skipped = Some("domain missing".to_string()),
            Err(err) => report.error = Some(err.to_string()),
        }
        report
    }

    pub fn missing_policy(&self) -> bool {
        self.error.is_none() && self.skipped.is_none() && self.records.is_empty()
    }

    /// No policy, a failed resolution, invalid entries or expansion issues.
    pub fn flagged(&self) -> bool {
        self.missing_policy()
            || self.error.is_some()
            || self
                .records
                .iter()
                .any(|record| record.has_invalid_entries() || !record.issues().is_empty())
    }

    fn human_lines(&self) -> Vec<String> {
        if let Some(error) = &self.error {
            return vec![format!("error: {error}")];
        }
        if let Some(reason) = &self.skipped {
            return vec![format!("skipped: {reason}")];
        }
        if self.records.is_empty() {
            return vec!["no SPF record".to_string()];
        }

        let mut lines = Vec::new();
        for record in &self.records {
            let indent = "  ".repeat(record.depth());
            lines.push(format!(
                "{indent}{} depth={} action={} version={}",
                record.source(),
                record.depth(),
                record.final_action(),
                record.version()
            ));
            for entry in record.entries() {
                lines.push(format!("{indent}  entry {entry}"));
            }
            for address in record.ip_addresses() {
                lines.push(format!("{indent}  address {address} ({})", address.source()));
            }
            for network in record.ip_networks() {
                lines.push(format!("{indent}  network {network} ({})", network.source()));
            }
            if let Some(explanation) = record.explanation() {
                lines.push(format!("{indent}  explanation {explanation}"));
            }
            for issue in record.issues() {
                lines.push(format!("{indent}  issue {issue}"));
            }
        }
        lines
    }
}

pub fn write_reports(reports: &[DomainReport], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(reports, cli),
        "json" => write_json(reports, cli),
        "ndjson" => write_ndjson(reports, cli),
        "csv" => write_csv(reports, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_flagged(reports: &[DomainReport]) -> bool {
    reports.iter().any(DomainReport::flagged)
}

fn write_human(reports: &[DomainReport], cli: &Cli) -> Result<()> {
    let s = render_human(reports);
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        print!("{s}");
    }
    Ok(())
}

fn render_human(reports: &[DomainReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let status = if report.flagged() { "[CHECK]" } else { "[OK]   " };
        out.push_str(&format!("{status} {}\n", report.domain));
        for line in report.human_lines() {
            out.push_str(&format!("        {line}\n"));
        }
    }
    out
}

#[cfg(feature = "with-serde")]
fn write_json(reports: &[DomainReport], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(reports)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[DomainReport], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(reports: &[DomainReport], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for report in reports {
            let line = serde_json::to_string(report)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for report in reports {
            println!("{}", serde_json::to_string(report)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[DomainReport], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv(reports: &[DomainReport], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv_rows(&mut wtr, reports)?;
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        write_csv_rows(&mut wtr, reports)?;
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[DomainReport], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

/// One row per resolved address or network, plus one row per domain error.
#[cfg(feature = "with-csv")]
fn write_csv_rows<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    reports: &[DomainReport],
) -> Result<()> {
    wtr.write_record(["domain", "source", "depth", "action", "kind", "value", "origin"])?;
    for report in reports {
        if let Some(error) = &report.error {
            wtr.write_record([report.domain.as_str(), "", "", "", "error", error.as_str(), ""])?;
            continue;
        }
        for record in &report.records {
            let depth = record.depth().to_string();
            let action = record.final_action().as_str();
            for address in record.ip_addresses() {
                let value = address.to_string();
                wtr.write_record([
                    report.domain.as_str(),
                    record.source(),
                    depth.as_str(),
                    action,
                    "address",
                    value.as_str(),
                    address.source(),
                ])?;
            }
            for network in record.ip_networks() {
                let value = network.to_string();
                wtr.write_record([
                    report.domain.as_str(),
                    record.source(),
                    depth.as_str(),
                    action,
                    "network",
                    value.as_str(),
                    network.source(),
                ])?;
            }
        }
    }
    Ok(())
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn report(domain: &str) -> DomainReport {
        DomainReport {
            domain: domain.to_string(),
            records: Vec::new(),
            error: None,
            skipped: None,
        }
    }

    #[test]
    fn human_report_marks_flagged_domains() {
        let failed = DomainReport {
            error: Some("lookup failed".to_string()),
            ..report("broken.example")
        };
        let skipped = DomainReport {
            skipped: Some("domain missing".to_string()),
            ..report("")
        };
        let rendered = render_human(&[failed, skipped]);
        assert_eq!(
            rendered,
            "[CHECK] broken.example\n        error: lookup failed\n\
             [OK]    \n        skipped: domain missing\n"
        );
    }

    #[test]
    fn human_report_is_written_to_out_file() {
        let path = std::env::temp_dir().join(format!("spfcheck-{}.txt", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["spfcheck-cli", "--format", "human", "--out", &path])
            .expect("valid args");

        write_reports(&[report("example.com")], &cli).expect("writes report");
        let written = std::fs::read_to_string(&path).expect("report file");
        std::fs::remove_file(&path).ok();
        assert_eq!(written, "[CHECK] example.com\n        no SPF record\n");
    }
}
