use crate::error::Result;
use crate::types::{Action, MembershipPlan};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// CatalogWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

fn warning(message: impl Into<String>) -> CatalogWarning {
    CatalogWarning {
        level: WarnLevel::Warning,
        message: message.into(),
    }
}

fn error(message: impl Into<String>) -> CatalogWarning {
    CatalogWarning {
        level: WarnLevel::Error,
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The per-channel catalog the hosting service supplies with each request:
/// triggerable effects plus purchasable membership plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub membership_plans: Vec<MembershipPlan>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Catalog> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Catalog> {
        let catalog: Catalog = serde_yaml::from_str(content)?;
        Ok(catalog)
    }

    /// Sanity findings that don't prevent planning but usually indicate a
    /// misconfigured channel.
    pub fn validate(&self) -> Vec<CatalogWarning> {
        let mut findings = Vec::new();

        let mut keys: HashSet<&str> = HashSet::new();
        for action in &self.actions {
            if action.key.is_empty() {
                findings.push(error("action with empty key"));
                continue;
            }
            if !keys.insert(action.key.as_str()) {
                findings.push(error(format!("duplicate action key '{}'", action.key)));
            }
        }

        if !self.actions.is_empty() && self.actions.iter().all(|a| !a.enabled) {
            findings.push(warning(
                "every action is disabled; effect cues will never resolve",
            ));
        }

        let mut plan_ids: HashSet<&str> = HashSet::new();
        for plan in &self.membership_plans {
            if plan.id.is_empty() {
                findings.push(error("membership plan with empty id"));
                continue;
            }
            if !plan_ids.insert(plan.id.as_str()) {
                findings.push(error(format!("duplicate membership plan id '{}'", plan.id)));
            }
            if plan.name.is_empty() {
                findings.push(warning(format!(
                    "membership plan '{}' has an empty name and can only match as the default",
                    plan.id
                )));
            }
        }

        findings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
