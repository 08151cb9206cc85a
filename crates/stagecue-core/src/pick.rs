use crate::scan::effect_kind_re;
use crate::types::{Action, EffectKind};

/// Resolve a concrete catalog action for an effect occurrence that did not
/// name one explicitly. The tier order is load-bearing and must not change:
///
/// 1. any enabled action whose key appears in the lower-cased input
///    (first catalog-order match wins),
/// 2. the first enabled action of the desired type, if a hint was given,
/// 3. re-scan the input for the type keyword sets (sound, then flash, then
///    sticker) and take the first enabled action of the first set that
///    also has a catalog entry,
/// 4. the first enabled action in catalog order.
///
/// Returns `None` only when no enabled action exists.
pub fn pick_action<'a>(
    lower: &str,
    actions: &'a [Action],
    desired: Option<EffectKind>,
) -> Option<&'a Action> {
    let enabled = || actions.iter().filter(|a| a.enabled);

    if let Some(action) =
        enabled().find(|a| !a.key.is_empty() && lower.contains(&a.key.to_lowercase()))
    {
        return Some(action);
    }

    if let Some(kind) = desired {
        if let Some(action) = enabled().find(|a| a.kind == kind) {
            return Some(action);
        }
    }

    for kind in [EffectKind::Sound, EffectKind::Flash, EffectKind::Sticker] {
        if effect_kind_re(kind).is_match(lower) {
            if let Some(action) = enabled().find(|a| a.kind == kind) {
                return Some(action);
            }
        }
    }

    enabled().next()
}
