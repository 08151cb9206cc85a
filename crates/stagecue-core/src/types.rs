use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EffectKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Sticker,
    Flash,
    Sound,
}

impl EffectKind {
    pub fn all() -> &'static [EffectKind] {
        &[EffectKind::Sticker, EffectKind::Flash, EffectKind::Sound]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Sticker => "sticker",
            EffectKind::Flash => "flash",
            EffectKind::Sound => "sound",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EffectKind {
    type Err = crate::error::CueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sticker" => Ok(EffectKind::Sticker),
            "flash" => Ok(EffectKind::Flash),
            "sound" => Ok(EffectKind::Sound),
            _ => Err(crate::error::CueError::InvalidEffectKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Action / MembershipPlan (caller-supplied catalog entries)
// ---------------------------------------------------------------------------

/// One triggerable broadcast effect. Read-only to the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Action {
    pub fn new(key: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            key: key.into(),
            kind,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: String,
    pub name: String,
}

impl MembershipPlan {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// QaTier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaTier {
    Normal,
    Priority,
}

impl QaTier {
    pub fn as_str(self) -> &'static str {
        match self {
            QaTier::Normal => "normal",
            QaTier::Priority => "priority",
        }
    }
}

impl fmt::Display for QaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One resolved, chargeable action within a plan.
///
/// `Donation::amount_base_units` is a base-10 integer string counting
/// millionths of the reference currency unit, always strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Effect {
        action_key: String,
    },
    Donation {
        amount_base_units: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    Qa {
        message: String,
        tier: QaTier,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    Membership {
        plan_id: String,
    },
}

impl Step {
    /// Semantic dedup key: two steps with equal signatures are the same
    /// intent and only the first survives assembly. Display names are
    /// presentation-only and excluded.
    pub fn signature(&self) -> String {
        match self {
            Step::Effect { action_key } => format!("effect:{action_key}"),
            Step::Donation {
                amount_base_units,
                message,
                ..
            } => format!(
                "donation:{amount_base_units}:{}",
                message.as_deref().unwrap_or("")
            ),
            Step::Qa { message, tier, .. } => format!("qa:{tier}:{message}"),
            Step::Membership { plan_id } => format!("membership:{plan_id}"),
        }
    }

    /// Short label used by the plan summary.
    pub fn label(&self) -> String {
        match self {
            Step::Effect { action_key } => format!("effect({action_key})"),
            Step::Donation {
                amount_base_units, ..
            } => format!("donation({amount_base_units})"),
            Step::Qa { tier, .. } => format!("qa({tier})"),
            Step::Membership { .. } => "membership".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Finished output for one instruction: ordered, deduplicated steps, a
/// one-line diagnostic summary, and a warning per heuristic fallback taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// PlanRequest
// ---------------------------------------------------------------------------

/// Input to the planner. The catalog slices are request-scoped and treated
/// as immutable for the duration of the call.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    pub instruction: &'a str,
    pub actions: &'a [Action],
    pub membership_plans: &'a [MembershipPlan],
    /// Step ceiling; defaults to 5, clamped to [1, 10].
    pub max_steps: Option<usize>,
    /// Viewer handle passed through to donation and question steps.
    pub display_name: Option<&'a str>,
}

impl<'a> PlanRequest<'a> {
    pub fn new(instruction: &'a str) -> Self {
        Self {
            instruction,
            actions: &[],
            membership_plans: &[],
            max_steps: None,
            display_name: None,
        }
    }

    pub fn with_actions(mut self, actions: &'a [Action]) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_membership_plans(mut self, plans: &'a [MembershipPlan]) -> Self {
        self.membership_plans = plans;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_display_name(mut self, display_name: &'a str) -> Self {
        self.display_name = Some(display_name);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_kind_roundtrip() {
        for &kind in EffectKind::all() {
            let parsed: EffectKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn effect_kind_rejects_unknown() {
        assert!("confetti".parse::<EffectKind>().is_err());
    }

    #[test]
    fn action_enabled_defaults_true() {
        let action: Action = serde_yaml::from_str("key: boom\ntype: sound").unwrap();
        assert!(action.enabled);
        assert_eq!(action.kind, EffectKind::Sound);
    }

    #[test]
    fn step_signatures_ignore_display_name() {
        let a = Step::Donation {
            amount_base_units: "50000".to_string(),
            message: Some("hi".to_string()),
            display_name: Some("alice".to_string()),
        };
        let b = Step::Donation {
            amount_base_units: "50000".to_string(),
            message: Some("hi".to_string()),
            display_name: None,
        };
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature(), "donation:50000:hi");
    }

    #[test]
    fn step_labels() {
        assert_eq!(
            Step::Effect {
                action_key: "horn_01".to_string()
            }
            .label(),
            "effect(horn_01)"
        );
        assert_eq!(
            Step::Qa {
                message: "why".to_string(),
                tier: QaTier::Priority,
                display_name: None,
            }
            .label(),
            "qa(priority)"
        );
        assert_eq!(
            Step::Membership {
                plan_id: "p1".to_string()
            }
            .label(),
            "membership"
        );
    }

    #[test]
    fn step_json_is_kind_tagged() {
        let step = Step::Effect {
            action_key: "boom".to_string(),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["kind"], "effect");
        assert_eq!(json["action_key"], "boom");
    }

    #[test]
    fn donation_json_skips_absent_message() {
        let step = Step::Donation {
            amount_base_units: "1000000".to_string(),
            message: None,
            display_name: None,
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(!json.contains("message"));
        assert!(!json.contains("display_name"));
    }
}
