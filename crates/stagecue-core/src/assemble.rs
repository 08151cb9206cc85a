use crate::amount::parse_amount;
use crate::error::{CueError, Result};
use crate::normalize::normalize;
use crate::pick::pick_action;
use crate::scan::{qa_tier, scan, Occurrence, OccurrenceKind};
use crate::summary::summarize;
use crate::types::{Plan, PlanRequest, QaTier, Step};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const DEFAULT_MAX_STEPS: usize = 5;
pub const MAX_STEPS_CEILING: usize = 10;

/// Substituted when a donation cue carries no parseable amount: 0.05 units.
pub const DEFAULT_DONATION_BASE_UNITS: &str = "50000";

/// How far past a donation cue the amount/message search looks, in chars.
const DONATION_WINDOW_CHARS: usize = 60;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Convert one free-text instruction into an ordered, bounded, deduplicated
/// sequence of chargeable steps.
///
/// Pure and deterministic: identical arguments always produce an identical
/// plan. Recoverable interpretation problems degrade into `warnings`; only
/// `EmptyInput` and `NoViablePlan` abort the call.
pub fn plan(req: &PlanRequest) -> Result<Plan> {
    let normalized = normalize(req.instruction)?;
    let lower = normalized.to_lowercase();
    let max_steps = req
        .max_steps
        .unwrap_or(DEFAULT_MAX_STEPS)
        .clamp(1, MAX_STEPS_CEILING);
    let tier = qa_tier(&lower);
    let display_name = req.display_name.map(str::to_string);

    let occurrences = scan(&normalized, req.actions);

    let mut steps: Vec<Step> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if occurrences.is_empty() {
        // Guarantee: every non-empty instruction yields some plan.
        warnings.push(
            "no intent cue recognized; treating the whole instruction as a question".to_string(),
        );
        steps.push(Step::Qa {
            message: normalized.clone(),
            tier,
            display_name,
        });
    } else {
        let mut seen: HashSet<String> = HashSet::new();
        for occ in &occurrences {
            if steps.len() >= max_steps {
                break;
            }
            let step = match occ.kind {
                OccurrenceKind::Effect => effect_step(occ, &lower, req),
                OccurrenceKind::Donation => Some(donation_step(
                    occ,
                    &normalized,
                    display_name.clone(),
                    &mut warnings,
                )),
                OccurrenceKind::Qa => qa_step(occ, &normalized, tier, display_name.clone()),
                OccurrenceKind::Membership => membership_step(&lower, req),
            };
            if let Some(step) = step {
                if seen.insert(step.signature()) {
                    steps.push(step);
                }
            }
        }
        if steps.is_empty() {
            return Err(CueError::NoViablePlan(format!(
                "{} cue(s) detected but none produced a usable step",
                occurrences.len()
            )));
        }
    }

    let summary = summarize(&steps);
    Ok(Plan {
        steps,
        summary,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Per-kind conversion
// ---------------------------------------------------------------------------

fn effect_step(occ: &Occurrence, lower: &str, req: &PlanRequest) -> Option<Step> {
    let action_key = match &occ.action_key {
        Some(key) => key.clone(),
        None => pick_action(lower, req.actions, occ.desired)?.key.clone(),
    };
    Some(Step::Effect { action_key })
}

fn donation_step(
    occ: &Occurrence,
    normalized: &str,
    display_name: Option<String>,
    warnings: &mut Vec<String>,
) -> Step {
    let window = trailing_window(normalized, occ.end(), DONATION_WINDOW_CHARS);
    let amount_base_units = match first_digit_run(window) {
        Some(run) => match parse_amount(run) {
            Ok(units) => units,
            Err(e) => {
                warnings.push(format!(
                    "donation amount '{run}' not usable ({e}); defaulting to 0.05"
                ));
                DEFAULT_DONATION_BASE_UNITS.to_string()
            }
        },
        None => {
            warnings.push("donation cue has no amount; defaulting to 0.05".to_string());
            DEFAULT_DONATION_BASE_UNITS.to_string()
        }
    };
    Step::Donation {
        amount_base_units,
        message: first_quoted(window),
        display_name,
    }
}

fn qa_step(
    occ: &Occurrence,
    normalized: &str,
    tier: QaTier,
    display_name: Option<String>,
) -> Option<Step> {
    let rest = normalized[occ.end()..].trim();
    let message = match leading_quoted(rest) {
        Some(quoted) => quoted,
        None => strip_leading_separator(rest).to_string(),
    };
    if message.is_empty() {
        return None;
    }
    Some(Step::Qa {
        message,
        tier,
        display_name,
    })
}

fn membership_step(lower: &str, req: &PlanRequest) -> Option<Step> {
    let plans = req.membership_plans;
    if plans.is_empty() {
        return None;
    }
    let plan = plans
        .iter()
        .find(|p| !p.name.is_empty() && lower.contains(&p.name.to_lowercase()))
        .unwrap_or(&plans[0]);
    Some(Step::Membership {
        plan_id: plan.id.clone(),
    })
}

// ---------------------------------------------------------------------------
// Text-window heuristics
// ---------------------------------------------------------------------------

/// Up to `max_chars` characters of `text` starting at byte offset `from`
/// (which must be a char boundary — occurrence ends always are).
fn trailing_window(text: &str, from: usize, max_chars: usize) -> &str {
    let rest = &text[from..];
    match rest.char_indices().nth(max_chars) {
        Some((i, _)) => &rest[..i],
        None => rest,
    }
}

static DIGIT_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn digit_run_re() -> &'static Regex {
    DIGIT_RUN_RE.get_or_init(|| Regex::new(r"[0-9][0-9,]*(\.[0-9]{1,6})?").unwrap())
}

/// First run of digits (thousands separators allowed, at most one decimal
/// point with up to six fractional digits) in the window, if any.
fn first_digit_run(window: &str) -> Option<&str> {
    digit_run_re().find(window).map(|m| m.as_str())
}

const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}'), ('\u{2018}', '\u{2019}')];

/// Content of the first closed quote pair in `text`, scanning the straight
/// and curly single/double styles. An opener with no closer is skipped and
/// the scan continues with later quote styles.
fn first_quoted(text: &str) -> Option<String> {
    for (i, c) in text.char_indices() {
        let Some(&(_, close)) = QUOTE_PAIRS.iter().find(|&&(open, _)| open == c) else {
            continue;
        };
        let start = i + c.len_utf8();
        if let Some(rel) = text[start..].find(close) {
            return Some(text[start..start + rel].to_string());
        }
    }
    None
}

/// Like `first_quoted`, but only when the text begins with the quote.
fn leading_quoted(text: &str) -> Option<String> {
    let first = text.chars().next()?;
    if QUOTE_PAIRS.iter().any(|&(open, _)| open == first) {
        first_quoted(text)
    } else {
        None
    }
}

/// Strip at most one leading colon or dash (ASCII and CJK variants), then
/// surrounding whitespace.
fn strip_leading_separator(s: &str) -> &str {
    const SEPARATORS: &[char] = &[
        ':',
        '\u{ff1a}', // ：
        '-',
        '\u{2010}', // ‐
        '\u{2013}', // –
        '\u{2014}', // —
        '\u{ff0d}', // －
    ];
    let trimmed = s.trim_start();
    match trimmed.strip_prefix(SEPARATORS) {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
