//! Migration of overrides saved by older releases.
//!
//! Covers:
//! - the two-chord pinChat override (`Meta+Shift+P` plus `Alt+Shift+P`),
//!   which is reset to the current default
//! - uploadFiles overrides still carrying the retired `Shift` variants

use super::{PartialSettings, Settings};
use crate::defaults;
use crate::types::{KeyBinding, Platform, ShortcutId};

/// Apply every migration whose source value came from `saved` and is not
/// being replaced by `partial`.
pub(super) fn apply(
    settings: &mut Settings,
    saved: &PartialSettings,
    partial: &PartialSettings,
    platform: Platform,
) {
    let replaced = |id: ShortcutId| partial.shortcuts.contains(id);

    if let Some(pin) = saved.shortcuts.get(ShortcutId::PinChat)
        && is_legacy_pin_chat(pin)
        && !replaced(ShortcutId::PinChat)
    {
        log::info!("Migrating legacy pinChat binding to the current default");
        settings.shortcuts.set(
            ShortcutId::PinChat,
            defaults::shortcut_bindings(ShortcutId::PinChat, platform),
        );
    }

    if let Some(upload) = saved.shortcuts.get(ShortcutId::UploadFiles)
        && !replaced(ShortcutId::UploadFiles)
    {
        let cleaned = clean_upload_bindings(upload, platform);
        if cleaned.len() != upload.len() {
            log::info!("Removed retired uploadFiles bindings");
        }
        settings.shortcuts.set(ShortcutId::UploadFiles, cleaned);
    }
}

/// True if the binding targets `letter` by key label or by its `Key*` code.
fn matches_letter(binding: &KeyBinding, letter: char) -> bool {
    let code = format!("Key{}", letter.to_ascii_uppercase());
    binding.key().eq_ignore_ascii_case(&letter.to_string()) || binding.code() == Some(code.as_str())
}

fn is_legacy_pin_chat(bindings: &[KeyBinding]) -> bool {
    if bindings.len() != 2 {
        return false;
    }
    let is_set = |flag: Option<bool>| flag == Some(true);

    let meta_variant = bindings.iter().any(|b| {
        matches_letter(b, 'p')
            && b.shift()
            && is_set(b.explicit_meta())
            && !is_set(b.explicit_mod())
            && !is_set(b.explicit_ctrl())
            && !b.alt()
    });
    let alt_variant = bindings.iter().any(|b| {
        matches_letter(b, 'p')
            && b.shift()
            && b.alt()
            && !is_set(b.explicit_mod())
            && !is_set(b.explicit_ctrl())
            && !is_set(b.explicit_meta())
    });
    meta_variant && alt_variant
}

fn clean_upload_bindings(bindings: &[KeyBinding], platform: Platform) -> Vec<KeyBinding> {
    let retired = |b: &KeyBinding| {
        matches_letter(b, 'u')
            && b.shift()
            && (b.explicit_mod() == Some(true) || b.explicit_meta() == Some(true))
    };
    let filtered: Vec<KeyBinding> = bindings.iter().filter(|b| !retired(b)).cloned().collect();

    if filtered.len() == bindings.len() || !filtered.is_empty() {
        filtered
    } else {
        defaults::shortcut_bindings(ShortcutId::UploadFiles, platform)
    }
}
