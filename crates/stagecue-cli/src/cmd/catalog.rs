use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use stagecue_core::catalog::{Catalog, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// Validate the catalog and report findings
    Check,

    /// List catalog actions and membership plans
    Show,
}

pub fn run(
    catalog_path: Option<&Path>,
    subcommand: CatalogSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let path =
        catalog_path.context("no catalog file given (use --catalog or STAGECUE_CATALOG)")?;
    let catalog =
        Catalog::load(path).with_context(|| format!("failed to load catalog '{}'", path.display()))?;

    match subcommand {
        CatalogSubcommand::Check => {
            let findings = catalog.validate();
            if json {
                print_json(&findings)?;
            } else if findings.is_empty() {
                println!(
                    "catalog ok: {} action(s), {} membership plan(s)",
                    catalog.actions.len(),
                    catalog.membership_plans.len()
                );
            } else {
                for finding in &findings {
                    let level = match finding.level {
                        WarnLevel::Warning => "warning",
                        WarnLevel::Error => "error",
                    };
                    println!("{level}: {}", finding.message);
                }
            }
            if findings.iter().any(|f| f.level == WarnLevel::Error) {
                anyhow::bail!("catalog has errors");
            }
        }
        CatalogSubcommand::Show => {
            if json {
                print_json(&catalog)?;
                return Ok(());
            }
            let action_rows: Vec<Vec<String>> = catalog
                .actions
                .iter()
                .map(|a| {
                    vec![
                        a.key.clone(),
                        a.kind.to_string(),
                        if a.enabled { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["KEY", "TYPE", "ENABLED"], &action_rows);
            if !catalog.membership_plans.is_empty() {
                println!();
                let plan_rows: Vec<Vec<String>> = catalog
                    .membership_plans
                    .iter()
                    .map(|p| vec![p.id.clone(), p.name.clone()])
                    .collect();
                print_table(&["PLAN", "NAME"], &plan_rows);
            }
        }
    }
    Ok(())
}
