use crate::types::{Action, EffectKind, QaTier};
use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Occurrence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceKind {
    Effect,
    Donation,
    Qa,
    Membership,
}

/// One detected textual cue. `index`/`len` are byte offsets into the
/// normalized text and always fall on regex match boundaries, so slicing
/// the remainder at `index + len` is char-safe.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub kind: OccurrenceKind,
    pub index: usize,
    pub len: usize,
    /// Set when an explicit catalog key matched; bypasses the picker.
    pub action_key: Option<String>,
    /// Type hint from an effect-type keyword match.
    pub desired: Option<EffectKind>,
}

impl Occurrence {
    pub fn end(&self) -> usize {
        self.index + self.len
    }
}

// ---------------------------------------------------------------------------
// Keyword sets
//
// English alternatives carry word boundaries; CJK alternatives do not (CJK
// neighbours are word characters, so \b would never match). Longest
// alternative first: the regex engine picks the leftmost-first branch.
// ---------------------------------------------------------------------------

static DONATION_RE: OnceLock<Regex> = OnceLock::new();

fn donation_re() -> &'static Regex {
    // Bare "send" is not a cue: gifting verbs are common in effect
    // requests. It only counts with a dollar sign directly after.
    DONATION_RE.get_or_init(|| {
        Regex::new(r"(?i)\bdonation\b|\bdonate\b|\btip\b|\bsupport\b|\bsend\b ?\$|打赏|赞助")
            .unwrap()
    })
}

static QA_RE: OnceLock<Regex> = OnceLock::new();

fn qa_re() -> &'static Regex {
    QA_RE.get_or_init(|| {
        Regex::new(r"(?i)\bquestion\b|\bq&a\b|\bqa\b|\bask\b|提问|问题").unwrap()
    })
}

static MEMBERSHIP_RE: OnceLock<Regex> = OnceLock::new();

fn membership_re() -> &'static Regex {
    MEMBERSHIP_RE.get_or_init(|| {
        Regex::new(r"(?i)\bmembership\b|\bmember\b|\bsubscribe\b|\bsub\b|会员|订阅").unwrap()
    })
}

static STICKER_RE: OnceLock<Regex> = OnceLock::new();
static FLASH_RE: OnceLock<Regex> = OnceLock::new();
static SOUND_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn effect_kind_re(kind: EffectKind) -> &'static Regex {
    match kind {
        EffectKind::Sticker => STICKER_RE.get_or_init(|| {
            Regex::new(r"(?i)\bsticker\b|\bemoji\b|\bemote\b|贴纸|表情").unwrap()
        }),
        EffectKind::Flash => {
            FLASH_RE.get_or_init(|| Regex::new(r"(?i)\bflash\b|\bblink\b|闪光|闪").unwrap())
        }
        EffectKind::Sound => SOUND_RE.get_or_init(|| {
            Regex::new(r"(?i)\bairhorn\b|\bhorn\b|\bsound\b|喇叭|音效").unwrap()
        }),
    }
}

static PRIORITY_RE: OnceLock<Regex> = OnceLock::new();

fn priority_re() -> &'static Regex {
    PRIORITY_RE.get_or_init(|| {
        Regex::new(r"(?i)\bpriority\b|\bprio\b|\burgent\b|加急|优先").unwrap()
    })
}

/// Tier is a global property of the whole instruction, not of one cue.
pub fn qa_tier(lower: &str) -> QaTier {
    if priority_re().is_match(lower) {
        QaTier::Priority
    } else {
        QaTier::Normal
    }
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

pub(crate) struct ScanContext<'a> {
    pub normalized: &'a str,
    pub actions: &'a [Action],
}

/// Fixed detector sequence. Registration order is the tie-break between
/// occurrences at the same offset (stable sort below), so explicit catalog
/// matches outrank keyword heuristics.
const DETECTORS: &[fn(&ScanContext, &mut Vec<Occurrence>)] = &[
    detect_explicit_keys,
    detect_effect_types,
    detect_donations,
    detect_questions,
    detect_memberships,
];

fn detect_explicit_keys(ctx: &ScanContext, out: &mut Vec<Occurrence>) {
    for action in ctx.actions.iter().filter(|a| a.enabled) {
        if action.key.is_empty() {
            continue;
        }
        let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(&action.key))) else {
            continue;
        };
        for m in re.find_iter(ctx.normalized) {
            out.push(Occurrence {
                kind: OccurrenceKind::Effect,
                index: m.start(),
                len: m.len(),
                action_key: Some(action.key.clone()),
                desired: None,
            });
        }
    }
}

fn detect_effect_types(ctx: &ScanContext, out: &mut Vec<Occurrence>) {
    for &kind in EffectKind::all() {
        for m in effect_kind_re(kind).find_iter(ctx.normalized) {
            out.push(Occurrence {
                kind: OccurrenceKind::Effect,
                index: m.start(),
                len: m.len(),
                action_key: None,
                desired: Some(kind),
            });
        }
    }
}

fn detect_donations(ctx: &ScanContext, out: &mut Vec<Occurrence>) {
    for m in donation_re().find_iter(ctx.normalized) {
        out.push(Occurrence {
            kind: OccurrenceKind::Donation,
            index: m.start(),
            len: m.len(),
            action_key: None,
            desired: None,
        });
    }
}

fn detect_questions(ctx: &ScanContext, out: &mut Vec<Occurrence>) {
    for m in qa_re().find_iter(ctx.normalized) {
        out.push(Occurrence {
            kind: OccurrenceKind::Qa,
            index: m.start(),
            len: m.len(),
            action_key: None,
            desired: None,
        });
    }
}

fn detect_memberships(ctx: &ScanContext, out: &mut Vec<Occurrence>) {
    for m in membership_re().find_iter(ctx.normalized) {
        out.push(Occurrence {
            kind: OccurrenceKind::Membership,
            index: m.start(),
            len: m.len(),
            action_key: None,
            desired: None,
        });
    }
}

/// Run every detector over the normalized text and return all occurrences
/// sorted by ascending offset. An empty result means no intent cue was
/// found anywhere; the assembler turns that into the whole-input question
/// fallback.
pub fn scan(normalized: &str, actions: &[Action]) -> Vec<Occurrence> {
    let ctx = ScanContext {
        normalized,
        actions,
    };
    let mut found = Vec::new();
    for detect in DETECTORS {
        detect(&ctx, &mut found);
    }
    // Stable: equal offsets keep detector registration order.
    found.sort_by_key(|o| o.index);
    found
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(occs: &[Occurrence]) -> Vec<OccurrenceKind> {
        occs.iter().map(|o| o.kind).collect()
    }

    #[test]
    fn finds_every_non_overlapping_donation_cue() {
        let occs = scan("donate $1 donate $1", &[]);
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].index, 0);
        assert_eq!(occs[1].index, 10);
        assert!(occs.iter().all(|o| o.kind == OccurrenceKind::Donation));
    }

    #[test]
    fn bare_send_is_not_a_donation_cue() {
        assert!(scan("send a hug please", &[]).is_empty());
        let occs = scan("send $5", &[]);
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].kind, OccurrenceKind::Donation);
    }

    #[test]
    fn word_boundary_keeps_keywords_out_of_identifiers() {
        // "sticker_01" must not trigger the sticker type keyword; the
        // underscore is a word character on both sides of the boundary.
        assert!(scan("sticker_01", &[]).is_empty());
        assert_eq!(
            kinds(&scan("a sticker please", &[])),
            vec![OccurrenceKind::Effect]
        );
    }

    #[test]
    fn explicit_key_matches_case_insensitively() {
        let actions = [Action::new("Boom_Horn", EffectKind::Sound)];
        let occs = scan("play BOOM_horn twice boom_horn", &actions);
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].action_key.as_deref(), Some("Boom_Horn"));
        assert_eq!(occs[0].index, 5);
        assert_eq!(occs[1].index, 21);
    }

    #[test]
    fn disabled_actions_are_invisible() {
        let mut action = Action::new("boom", EffectKind::Sound);
        action.enabled = false;
        assert!(scan("boom", std::slice::from_ref(&action)).is_empty());
    }

    #[test]
    fn explicit_key_registers_before_type_keyword_at_same_offset() {
        // A catalog key that is itself a type keyword matches twice at the
        // same offset; the explicit match must come first after the stable
        // sort.
        let actions = [Action::new("flash", EffectKind::Flash)];
        let occs = scan("flash now", &actions);
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].index, occs[1].index);
        assert_eq!(occs[0].action_key.as_deref(), Some("flash"));
        assert_eq!(occs[1].desired, Some(EffectKind::Flash));
    }

    #[test]
    fn occurrences_sort_by_text_offset() {
        let occs = scan("flash then donate $2", &[]);
        assert_eq!(
            kinds(&occs),
            vec![OccurrenceKind::Effect, OccurrenceKind::Donation]
        );
        assert!(occs[0].index < occs[1].index);
    }

    #[test]
    fn cjk_cues_match_without_boundaries() {
        let occs = scan("请打赏一下然后提问", &[]);
        assert_eq!(
            kinds(&occs),
            vec![OccurrenceKind::Donation, OccurrenceKind::Qa]
        );
    }

    #[test]
    fn membership_cues() {
        assert_eq!(
            kinds(&scan("I want to subscribe", &[])),
            vec![OccurrenceKind::Membership]
        );
        assert_eq!(
            kinds(&scan("sub please", &[])),
            vec![OccurrenceKind::Membership]
        );
        // "subscribe" must not double-match via "sub".
        assert_eq!(scan("subscribe", &[]).len(), 1);
    }

    #[test]
    fn question_cues() {
        assert_eq!(kinds(&scan("q&a: hi", &[])), vec![OccurrenceKind::Qa]);
        assert_eq!(
            kinds(&scan("ASK - anything", &[])),
            vec![OccurrenceKind::Qa]
        );
    }

    #[test]
    fn sound_keywords() {
        for text in ["airhorn", "play a horn", "a sound please", "放个喇叭"] {
            let occs = scan(text, &[]);
            assert_eq!(occs.len(), 1, "no match in {text:?}");
            assert_eq!(occs[0].desired, Some(EffectKind::Sound));
        }
    }

    #[test]
    fn no_cue_means_empty_scan() {
        assert!(scan("hello there", &[]).is_empty());
    }

    #[test]
    fn tier_detection_is_global() {
        assert_eq!(qa_tier("a question"), QaTier::Normal);
        assert_eq!(qa_tier("urgent question"), QaTier::Priority);
        assert_eq!(qa_tier("prio please"), QaTier::Priority);
        assert_eq!(qa_tier("加急提问"), QaTier::Priority);
    }
}
