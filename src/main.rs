use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod dataset;
mod filter;
mod kpi;
mod models;
mod overview;
mod report;

use dataset::Dataset;
use filter::FilterSpec;

#[derive(Parser)]
#[command(name = "chat-metrics-dashboard")]
#[command(about = "KPI dashboard over a chat metrics CSV export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    agent: Option<String>,
    #[arg(long)]
    team_leader: Option<String>,
    #[arg(long)]
    supervisor: Option<String>,
    /// Inclusive range start, YYYY-MM-DD. Ignored unless --to-date is also given.
    #[arg(long)]
    from_date: Option<String>,
    /// Inclusive range end, YYYY-MM-DD. Ignored unless --from-date is also given.
    #[arg(long)]
    to_date: Option<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec::from_params(
            self.agent.as_deref(),
            self.team_leader.as_deref(),
            self.supervisor.as_deref(),
            self.from_date.as_deref(),
            self.to_date.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the ten catalog KPIs, trends, and filter domains
    Kpis {
        #[arg(long, default_value = "data/chat_metrics.csv")]
        csv: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Unfiltered headline aggregates and chart series
    Overview {
        #[arg(long, default_value = "data/chat_metrics.csv")]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Dump the raw record list as a JSON array
    Data {
        #[arg(long, default_value = "data/chat_metrics.csv")]
        csv: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "data/chat_metrics.csv")]
        csv: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Kpis { csv, filter, json } => {
            let dataset = Dataset::from_csv(&csv)?;
            let data = kpi::compute(&dataset, &filter.to_spec());
            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                for result in &data.kpis {
                    println!("- {}: {}", result.label, result.value);
                }
            }
        }
        Commands::Overview { csv, json } => {
            let dataset = Dataset::from_csv(&csv)?;
            let overview = overview::build_overview(&dataset);
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                println!("- Total Chats: {}", overview.total_chats);
                println!("- Avg Response Time: {}", overview.avg_response);
                println!("- Avg CSAT: {}", overview.avg_csat);
                println!("- Active Agents: {}", overview.avg_agents);
                println!(
                    "- Category Mix: support {:.2}, sales {:.2}, tech {:.2}",
                    overview.category_mix.support,
                    overview.category_mix.sales,
                    overview.category_mix.tech
                );
            }
        }
        Commands::Data { csv } => {
            let dataset = Dataset::from_csv(&csv)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&dataset.to_json_records())?
            );
        }
        Commands::Report { csv, filter, out } => {
            let dataset = Dataset::from_csv(&csv)?;
            let spec = filter.to_spec();
            let data = kpi::compute(&dataset, &spec);
            let source = csv.display().to_string();
            let report = report::build_report(&source, &spec, &data);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
