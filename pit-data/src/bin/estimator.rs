use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pit_core::calculations::common::amount_from_f64;
use pit_core::{
    DateRange, EstimateService, InMemoryRuleStore, OwnerProfile, RuleStore, TaxRuleSet,
    business_estimate, estimate_f64, estimate_with_gains_f64,
};
use pit_data::logging::init_logging;
use pit_data::{CsvLedger, EstimatorConfig, RuleSetLoader};
use serde::Serialize;
use tracing::debug;

/// Estimate personal income tax from a versioned rule set.
///
/// Rule sets are JSON documents with a version, an optional effective date,
/// a contiguous band table and a rent relief policy. Results are printed to
/// stdout as JSON; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "pit-estimator")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rule document, or a directory of rule documents
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Rule version to use (defaults to the latest effective date)
    #[arg(long, global = true)]
    rule_version: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Personal income tax on income, deductible expenses and rent
    Estimate {
        #[arg(long, allow_negative_numbers = true)]
        income: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        expenses: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        rent: f64,
    },

    /// Personal income tax with net capital gains added to income
    Gains {
        #[arg(long, allow_negative_numbers = true)]
        income: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        expenses: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        rent: f64,
        #[arg(long, allow_negative_numbers = true)]
        gains: f64,
    },

    /// Business tax for a sole proprietor or a company
    Business {
        #[arg(long, allow_negative_numbers = true)]
        turnover: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        cogs: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        ops: f64,
        /// `sole_proprietor`; anything else is taxed as a company
        #[arg(long, default_value = "sole_proprietor")]
        profile: String,
    },

    /// Estimate from a ledger CSV, optionally limited to a date range
    Report {
        /// Ledger CSV (date,kind,amount,deductible,description)
        #[arg(short, long)]
        ledger: Option<PathBuf>,
        /// First date included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        rent: f64,
    },

    /// List stored rule versions, or show one
    Rules {
        #[arg(long)]
        show: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionSummary {
    version: String,
    effective_date: Option<NaiveDate>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}

async fn resolve_rule_set(
    store: &InMemoryRuleStore,
    version: Option<&str>,
) -> Result<TaxRuleSet> {
    let rule_set = match version {
        Some(version) => store
            .rule_set(version)
            .await
            .with_context(|| format!("Rule version '{version}' not found"))?,
        None => store
            .latest_rule_set()
            .await
            .context("No rule sets loaded")?,
    };
    debug!(version = %rule_set.version, "using rule set");
    Ok(rule_set)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EstimatorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EstimatorConfig::default(),
    };
    init_logging(config.logging.level.as_deref(), args.verbose);

    let Some(rules_path) = args.rules.clone().or(config.rules.path.clone()) else {
        bail!("No rules given; pass --rules or set [rules] path in the config file");
    };
    let version = args.rule_version.clone().or(config.rules.version.clone());

    let rule_sets = RuleSetLoader::load_path(&rules_path)
        .with_context(|| format!("Failed to load rules from: {}", rules_path.display()))?;
    let store = InMemoryRuleStore::new();
    RuleSetLoader::load_into(&store, rule_sets)
        .await
        .context("Failed to store rule sets")?;

    match args.command {
        Command::Estimate {
            income,
            expenses,
            rent,
        } => {
            let rule_set = resolve_rule_set(&store, version.as_deref()).await?;
            let result = estimate_f64(income, expenses, rent, &rule_set)?;
            print_json(&result)
        }
        Command::Gains {
            income,
            expenses,
            rent,
            gains,
        } => {
            let rule_set = resolve_rule_set(&store, version.as_deref()).await?;
            let result = estimate_with_gains_f64(income, expenses, rent, gains, &rule_set)?;
            print_json(&result)
        }
        Command::Business {
            turnover,
            cogs,
            ops,
            profile,
        } => {
            let rule_set = resolve_rule_set(&store, version.as_deref()).await?;
            let profile: OwnerProfile = profile.parse()?;
            let result = business_estimate(
                amount_from_f64("turnover", turnover)?,
                amount_from_f64("cogs", cogs)?,
                amount_from_f64("deductible_ops", ops)?,
                profile,
                &rule_set,
            )?;
            print_json(&result)
        }
        Command::Report {
            ledger,
            from,
            to,
            rent,
        } => {
            let Some(ledger_path) = ledger.or(config.ledger.path) else {
                bail!("No ledger given; pass --ledger or set [ledger] path in the config file");
            };
            let ledger = CsvLedger::from_path(&ledger_path)
                .with_context(|| format!("Failed to load ledger: {}", ledger_path.display()))?;
            let range = (from.is_some() || to.is_some()).then(|| DateRange::new(from, to));
            let rent = amount_from_f64("annual_rent_paid", rent)?;

            let service = EstimateService::new(store, ledger);
            let report = service.report(range, rent, version.as_deref()).await?;
            print_json(&report)
        }
        Command::Rules { show: Some(show) } => {
            let rule_set = resolve_rule_set(&store, Some(&show)).await?;
            print_json(&rule_set)
        }
        Command::Rules { show: None } => {
            let mut summaries = Vec::new();
            for version in store.list_versions().await? {
                let rule_set = store.rule_set(&version).await?;
                summaries.push(VersionSummary {
                    version,
                    effective_date: rule_set.effective_date,
                });
            }
            print_json(&summaries)
        }
    }
}
