//! Picking the presets a request honours.

use std::collections::HashSet;

use reply_core::InstructionPreset;

/// Look up `refs` in request order. Unknown and repeated ids are skipped,
/// and at most `limit` presets are returned.
pub fn select_presets<'a>(
    available: &'a [InstructionPreset],
    refs: &[String],
    limit: usize,
) -> Vec<&'a InstructionPreset> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    if limit == 0 {
        return selected;
    }

    for id in refs.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !seen.insert(id) {
            continue;
        }
        match available.iter().find(|preset| preset.id == id) {
            Some(preset) => selected.push(preset),
            None => log::debug!("Ignoring unknown instruction preset '{}'", id),
        }
        if selected.len() == limit {
            break;
        }
    }
    selected
}

/// Lightning presets: the request's ids when any are given, otherwise every
/// preset flagged for Lightning in stored order.
pub fn lightning_presets<'a>(
    available: &'a [InstructionPreset],
    refs: &[String],
    limit: usize,
) -> Vec<&'a InstructionPreset> {
    if refs.iter().any(|id| !id.trim().is_empty()) {
        return select_presets(available, refs, limit);
    }
    available
        .iter()
        .filter(|preset| preset.use_in_lightning)
        .take(limit)
        .collect()
}
