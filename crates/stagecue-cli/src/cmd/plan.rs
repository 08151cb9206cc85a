use crate::output::{print_json, print_table};
use anyhow::Context;
use stagecue_core::catalog::Catalog;
use stagecue_core::{plan, PlanRequest, Step};
use std::path::Path;

pub fn run(
    catalog_path: Option<&Path>,
    instruction: &str,
    max_steps: Option<usize>,
    display_name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = match catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog '{}'", path.display()))?,
        None => Catalog::default(),
    };
    for finding in catalog.validate() {
        tracing::warn!("catalog: {}", finding.message);
    }

    let request = PlanRequest {
        instruction,
        actions: &catalog.actions,
        membership_plans: &catalog.membership_plans,
        max_steps,
        display_name,
    };
    let plan = plan(&request).context("planning failed")?;

    if json {
        print_json(&plan)?;
        return Ok(());
    }

    println!("Summary:  {}", plan.summary);
    println!();
    let rows: Vec<Vec<String>> = plan
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let (kind, detail) = step_cells(step);
            vec![(i + 1).to_string(), kind.to_string(), detail]
        })
        .collect();
    print_table(&["#", "KIND", "DETAIL"], &rows);
    for warning in &plan.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

fn step_cells(step: &Step) -> (&'static str, String) {
    match step {
        Step::Effect { action_key } => ("effect", action_key.clone()),
        Step::Donation {
            amount_base_units,
            message,
            ..
        } => {
            let mut detail = format!("{amount_base_units} base units");
            if let Some(message) = message {
                detail.push_str(&format!(" \"{message}\""));
            }
            ("donation", detail)
        }
        Step::Qa { message, tier, .. } => ("qa", format!("[{tier}] {message}")),
        Step::Membership { plan_id } => ("membership", plan_id.clone()),
    }
}
