//! Conflict detection for binding edits.
//!
//! Runs when a user assigns a new chord, never during dispatch. A clash with
//! another enabled shortcut blocks the edit; a clash with a host-owned chord
//! only produces a warning.

use crate::matcher::bindings_equal;
use crate::parser::format_binding;
use crate::registry::{HostDefaultShortcut, ShortcutDefinition, ShortcutRegistry};
use crate::validator::{InvalidBinding, validate_binding};
use chatkeys_config::{KeyBinding, PartialSettings, Settings, ShortcutId};
use thiserror::Error;

/// Outcome of checking a candidate binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict<'a> {
    None,
    User(&'a ShortcutDefinition),
    Host(&'a HostDefaultShortcut),
}

/// Why a binding edit was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingEditError {
    #[error(transparent)]
    Invalid(#[from] InvalidBinding),
    #[error("\"{chord}\" is already assigned to \"{conflicting}\"")]
    UserConflict {
        chord: String,
        conflicting: ShortcutId,
    },
}

/// A successful edit: the new settings plus an optional host-clash warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingUpdate {
    pub settings: Settings,
    /// The change alone, ready to persist.
    pub partial: PartialSettings,
    pub warning: Option<HostDefaultShortcut>,
}

/// First other shortcut in an enabled category already using `binding`.
pub fn find_user_conflict<'a>(
    registry: &'a ShortcutRegistry,
    binding: &KeyBinding,
    excluding: ShortcutId,
    settings: &Settings,
) -> Option<&'a ShortcutDefinition> {
    let is_mac = registry.is_mac();
    registry.definitions().iter().find(|definition| {
        definition.id != excluding
            && settings.feature_toggles.is_enabled(definition.category)
            && registry
                .effective_bindings(definition.id, &settings.shortcuts)
                .iter()
                .any(|existing| bindings_equal(existing, binding, is_mac))
    })
}

/// First host-owned chord equal to `binding`.
pub fn find_host_conflict<'a>(
    registry: &'a ShortcutRegistry,
    binding: &KeyBinding,
) -> Option<&'a HostDefaultShortcut> {
    registry
        .host_defaults()
        .iter()
        .find(|host| bindings_equal(&host.binding, binding, registry.is_mac()))
}

/// User conflicts take precedence over host conflicts.
pub fn check_conflicts<'a>(
    registry: &'a ShortcutRegistry,
    binding: &KeyBinding,
    excluding: ShortcutId,
    settings: &Settings,
) -> Conflict<'a> {
    if let Some(definition) = find_user_conflict(registry, binding, excluding, settings) {
        return Conflict::User(definition);
    }
    match find_host_conflict(registry, binding) {
        Some(host) => Conflict::Host(host),
        None => Conflict::None,
    }
}

/// Assign `binding` as the only binding of `id`.
///
/// The input settings are never modified; on success the caller receives a
/// new snapshot with the override in place.
pub fn assign_binding(
    registry: &ShortcutRegistry,
    settings: &Settings,
    id: ShortcutId,
    binding: KeyBinding,
) -> Result<BindingUpdate, BindingEditError> {
    let is_mac = registry.is_mac();
    validate_binding(&binding, is_mac)?;

    if let Some(definition) = find_user_conflict(registry, &binding, id, settings) {
        log::debug!("Rejected {} for {}: used by {}", format_binding(&binding, is_mac), id, definition.id);
        return Err(BindingEditError::UserConflict {
            chord: format_binding(&binding, is_mac),
            conflicting: definition.id,
        });
    }

    let warning = find_host_conflict(registry, &binding).cloned();
    let partial = PartialSettings::shortcut(id, vec![binding]);
    let mut next = settings.clone();
    next.shortcuts.extend_from(&partial.shortcuts);

    log::info!("Assigned new binding to {}", id);
    Ok(BindingUpdate {
        settings: next,
        partial,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_binding;
    use crate::validator::RejectReason;
    use chatkeys_config::{FeatureCategory, Platform};

    #[test]
    fn test_duplicate_is_user_conflict() {
        let registry = ShortcutRegistry::new(Platform::Linux);
        let settings = registry.default_settings();
        let binding = parse_binding("Mod+Shift+P").unwrap();

        let err = assign_binding(&registry, &settings, ShortcutId::ScrollTop, binding).unwrap_err();
        assert_eq!(
            err,
            BindingEditError::UserConflict {
                chord: "Ctrl + Shift + P".to_string(),
                conflicting: ShortcutId::PinChat,
            }
        );
        assert_eq!(settings, registry.default_settings());
    }

    #[test]
    fn test_reassigning_own_chord_is_fine() {
        let registry = ShortcutRegistry::new(Platform::Linux);
        let settings = registry.default_settings();
        let binding = parse_binding("Mod+Shift+P").unwrap();
        assert!(assign_binding(&registry, &settings, ShortcutId::PinChat, binding).is_ok());
    }

    #[test]
    fn test_disabled_category_is_not_a_conflict() {
        let registry = ShortcutRegistry::new(Platform::Mac);
        let mut settings = registry.default_settings();
        settings.feature_toggles.set(FeatureCategory::VimScroll, false);

        let binding = parse_binding("J").unwrap();
        assert!(find_user_conflict(&registry, &binding, ShortcutId::PinChat, &settings).is_none());

        settings.feature_toggles.set(FeatureCategory::VimScroll, true);
        assert_eq!(
            find_user_conflict(&registry, &binding, ShortcutId::PinChat, &settings).map(|d| d.id),
            Some(ShortcutId::ScrollDown)
        );
    }

    #[test]
    fn test_host_conflict_is_a_warning() {
        let registry = ShortcutRegistry::new(Platform::Mac);
        let settings = registry.default_settings();
        let binding = parse_binding("Mod+Shift+O").unwrap();

        let update = assign_binding(&registry, &settings, ShortcutId::PinChat, binding.clone()).unwrap();
        let warning = update.warning.expect("host conflict");
        assert_eq!(warning.fallback_label, "New chat");
        assert_eq!(
            update.settings.shortcuts.get(ShortcutId::PinChat).unwrap(),
            &[binding][..]
        );
        assert_eq!(update.partial.shortcuts.len(), 1);
    }

    #[test]
    fn test_check_conflicts_tri_state() {
        let registry = ShortcutRegistry::new(Platform::Linux);
        let settings = registry.default_settings();

        let user = parse_binding("Mod+I").unwrap();
        assert!(matches!(
            check_conflicts(&registry, &user, ShortcutId::PinChat, &settings),
            Conflict::User(def) if def.id == ShortcutId::TemporaryChat
        ));

        let host = parse_binding("Mod+Shift+S").unwrap();
        assert!(matches!(
            check_conflicts(&registry, &host, ShortcutId::PinChat, &settings),
            Conflict::Host(_)
        ));

        let free = parse_binding("Mod+Shift+L").unwrap();
        assert_eq!(
            check_conflicts(&registry, &free, ShortcutId::PinChat, &settings),
            Conflict::None
        );
    }

    #[test]
    fn test_invalid_binding_rejected_before_conflicts() {
        let registry = ShortcutRegistry::new(Platform::Linux);
        let settings = registry.default_settings();
        let err = assign_binding(
            &registry,
            &settings,
            ShortcutId::PinChat,
            parse_binding("Esc").unwrap(),
        )
        .unwrap_err();
        match err {
            BindingEditError::Invalid(invalid) => {
                assert_eq!(invalid.reason(), RejectReason::RequiresModifier)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
