use anyhow::{Context, Result};
use std::env;

use fairness_eval::config::ColumnSpec;
use fairness_eval::data::{columnar::records_from_dataframe, loader::load_table};
use fairness_eval::metrics::bootstrap::{bootstrap, BootstrapOptions};
use fairness_eval::plot::bars::write_rate_bars;
use fairness_eval::report::table::{group_table, report_table};
use fairness_eval::{evaluate, Record};

const USAGE: &str = "Usage: fairness_eval <compute|plot> <table.json> \
                     [--group-col NAME] [--bootstrap N]";

fn load_records(path: &str, cols: &ColumnSpec) -> Result<Vec<Record>> {
    let df = load_table(path, cols)?;
    records_from_dataframe(&df, cols)
}

fn compute(path: &str, cols: &ColumnSpec, n_bootstrap: Option<usize>) -> Result<()> {
    let records = load_records(path, cols)?;
    let report = evaluate(&records)?;

    println!("{}", group_table(&report.groups));
    println!("{}", report_table(&report));

    if let Some(n_resamples) = n_bootstrap {
        let opts = BootstrapOptions {
            n_resamples,
            ..BootstrapOptions::default()
        };
        let intervals = bootstrap(&records, &opts)?;
        println!(
            "bootstrap ({} resamples, {:.0}% CI):",
            intervals.n_resamples,
            intervals.confidence * 100.0
        );
        for (name, iv) in [
            ("demographic parity gap", intervals.demographic_parity_gap),
            ("equalized odds gap", intervals.equalized_odds_gap),
            ("disparate impact ratio", intervals.disparate_impact_ratio),
        ] {
            match iv {
                Some(iv) => println!("  {name}: [{:.4}, {:.4}]", iv.lo, iv.hi),
                None => println!("  {name}: n/a"),
            }
        }
    }

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write("fairness_report.json", json)?;
    println!("Saved report to fairness_report.json");
    Ok(())
}

fn plot(path: &str, cols: &ColumnSpec) -> Result<()> {
    let records = load_records(path, cols)?;
    let report = evaluate(&records)?;
    write_rate_bars(&report.groups, "rate_bars.html")?;
    println!("Wrote rate_bars.html");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("{USAGE}");
        return Ok(());
    }

    let mut cols = ColumnSpec::default();
    let mut n_bootstrap = None;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--group-col" => {
                let name = args.get(i + 1).context("--group-col needs a value")?;
                cols = cols.with_group_column(name);
                i += 2;
            }
            "--bootstrap" => {
                let n = args.get(i + 1).context("--bootstrap needs a value")?;
                n_bootstrap = Some(n.parse().context("--bootstrap takes a count")?);
                i += 2;
            }
            other => {
                println!("Unknown option '{other}'. {USAGE}");
                return Ok(());
            }
        }
    }

    match args[1].as_str() {
        "compute" => compute(&args[2], &cols, n_bootstrap)?,
        "plot" => plot(&args[2], &cols)?,
        other => println!("Unknown command '{other}'. Use 'compute' or 'plot'."),
    }

    Ok(())
}
