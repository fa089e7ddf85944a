//! End-to-end dispatch through `ShortcutEngine` with default and edited
//! settings.

mod common;

use chatkeys::engine::{
    Action, ActionError, EventDisposition, KeyContext, NotifyLevel, ScrollDirection, ScrollKind,
    ScrollMetrics, ScrollMotion, ShortcutEngine, Trigger,
};
use chatkeys::i18n::{MessageKey, Messages};
use chatkeys_config::{FeatureCategory, KeyBinding, Platform, Settings, ShortcutId};
use chatkeys_keybindings::{KeyEvent, ShortcutRegistry, assign_binding};
use common::Recorder;
use std::collections::HashMap;
use std::time::Duration;

fn engine_with(settings: Settings, platform: Platform) -> ShortcutEngine<Recorder> {
    ShortcutEngine::new(settings, platform, Recorder::default())
}

fn engine(platform: Platform) -> ShortcutEngine<Recorder> {
    engine_with(Settings::defaults(platform), platform)
}

fn page() -> KeyContext {
    KeyContext::default()
}

// ── Priority ────────────────────────────────────────────────────────────────

#[test]
fn test_safe_send_enter_blocks_later_categories() {
    // Bind Enter-with-mod to scrollBottom as well; the send gate still wins.
    let mut settings = Settings::defaults(Platform::Linux);
    settings.shortcuts.set(
        ShortcutId::ScrollBottom,
        vec![KeyBinding::new("Enter").with_mod(true)],
    );
    let mut engine = engine_with(settings, Platform::Linux);

    let dispatch = engine.on_key_down(
        &KeyEvent::new("Enter", "Enter").with_ctrl(),
        &KeyContext::editable(),
    );
    assert_eq!(dispatch.trigger, Some(Trigger::Send));
    assert_eq!(dispatch.disposition, EventDisposition::CONSUME);
    assert_eq!(engine.handler().performed, vec![Action::Send]);
}

#[test]
fn test_enter_outside_editable_reaches_other_categories() {
    let mut settings = Settings::defaults(Platform::Linux);
    settings.shortcuts.set(
        ShortcutId::ScrollBottom,
        vec![KeyBinding::new("Enter").with_mod(true)],
    );
    let mut engine = engine_with(settings, Platform::Linux);

    let dispatch = engine.on_key_down(&KeyEvent::new("Enter", "Enter").with_ctrl(), &page());
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::ScrollBottom));
}

#[test]
fn test_safe_send_disabled_leaves_enter_alone() {
    let mut settings = Settings::defaults(Platform::Mac);
    settings.feature_toggles.set(FeatureCategory::SafeSend, false);
    let mut engine = engine_with(settings, Platform::Mac);

    let dispatch = engine.on_key_down(&KeyEvent::new("Enter", "Enter"), &KeyContext::editable());
    assert!(!dispatch.is_handled());
    assert_eq!(dispatch.disposition, EventDisposition::NONE);
}

#[test]
fn test_default_j_dispatches_scroll_down_only() {
    for platform in [Platform::Mac, Platform::Windows, Platform::Linux] {
        let mut engine = engine(platform);
        let dispatch = engine.on_key_down(&KeyEvent::new("j", "KeyJ"), &page());
        assert_eq!(dispatch.shortcut(), Some(ShortcutId::ScrollDown), "{platform}");
        assert_eq!(
            engine.handler().performed,
            vec![Action::Scroll(ScrollKind::Down)],
            "{platform}"
        );
    }
}

#[test]
fn test_mod_j_is_scroll_bottom() {
    let mut engine = engine(Platform::Mac);
    let dispatch = engine.on_key_down(&KeyEvent::new("j", "KeyJ").with_meta(), &page());
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::ScrollBottom));
    // Jumps do not start continuous scrolling.
    assert_eq!(engine.scrolling_key(), None);
}

#[test]
fn test_physical_key_matches_other_layouts() {
    // A layout that produces "о" at the J position still scrolls.
    let mut engine = engine(Platform::Linux);
    let dispatch = engine.on_key_down(&KeyEvent::new("о", "KeyJ"), &page());
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::ScrollDown));
}

// ── Category gating ─────────────────────────────────────────────────────────

#[test]
fn test_other_shortcuts_off_ignores_delete_chat() {
    let mut settings = Settings::defaults(Platform::Linux);
    settings.feature_toggles.set(FeatureCategory::OtherShortcuts, false);
    // Even a custom binding stays inert while the category is off.
    settings.shortcuts.set(
        ShortcutId::DeleteChat,
        vec![KeyBinding::new("d").with_code("KeyD").with_mod(true).with_alt(true)],
    );
    let mut engine = engine_with(settings, Platform::Linux);

    let default_chord = KeyEvent::new("Backspace", "Backspace").with_ctrl().with_shift();
    let custom_chord = KeyEvent::new("d", "KeyD").with_ctrl().with_alt();
    for event in [default_chord, custom_chord] {
        let dispatch = engine.on_key_down(&event, &page());
        assert!(!dispatch.is_handled());
    }
    assert!(engine.handler().performed.is_empty());
}

#[test]
fn test_default_delete_chat_binding_belongs_to_host() {
    let mut engine = engine(Platform::Linux);
    let dispatch = engine.on_key_down(
        &KeyEvent::new("Backspace", "Backspace").with_ctrl().with_shift(),
        &page(),
    );
    assert!(!dispatch.is_handled());
}

#[test]
fn test_assigned_binding_dispatches() {
    let platform = Platform::Mac;
    let registry = ShortcutRegistry::new(platform);
    let update = assign_binding(
        &registry,
        &Settings::defaults(platform),
        ShortcutId::DeleteChat,
        KeyBinding::new("Backspace").with_code("Backspace").with_mod(true).with_alt(true),
    )
    .unwrap();
    let mut engine = engine_with(update.settings, platform);

    let dispatch = engine.on_key_down(
        &KeyEvent::new("Backspace", "Backspace").with_meta().with_alt(),
        &page(),
    );
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::DeleteChat));
    assert_eq!(dispatch.disposition, EventDisposition::CONSUME);
    assert_eq!(engine.handler().performed, vec![Action::DeleteChat]);
}

#[test]
fn test_vim_scroll_off_lets_letters_through() {
    let mut settings = Settings::defaults(Platform::Linux);
    settings.feature_toggles.set(FeatureCategory::VimScroll, false);
    let mut engine = engine_with(settings, Platform::Linux);
    assert!(!engine.on_key_down(&KeyEvent::new("k", "KeyK"), &page()).is_handled());
}

#[test]
fn test_toggle_shortcuts_ignores_category_toggles() {
    let mut settings = Settings::defaults(Platform::Linux);
    for category in FeatureCategory::ALL {
        settings.feature_toggles.set(category, false);
    }
    let mut engine = engine_with(settings, Platform::Linux);
    let dispatch = engine.on_key_down(&KeyEvent::new("/", "Slash").with_ctrl(), &page());
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::ToggleShortcuts));
    assert!(engine.handler().help.is_some());
}

// ── Handler outcomes ────────────────────────────────────────────────────────

#[test]
fn test_handler_error_becomes_notification() {
    let mut engine = engine(Platform::Linux);
    engine.handler_mut().fail_with = Some(ActionError::Failed("menu never opened".into()));

    let dispatch = engine.on_key_down(
        &KeyEvent::new("ArrowDown", "ArrowDown").with_ctrl().with_shift(),
        &page(),
    );
    // Still handled: the key must not leak to the page.
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::ToggleModel));
    assert_eq!(
        engine.handler().notices,
        vec![(
            MessageKey::ToastModelSwitchFailed.fallback().to_string(),
            NotifyLevel::Error
        )]
    );
}

#[test]
fn test_handler_error_uses_translated_toast() {
    let messages = Messages::with_overrides(HashMap::from([(
        "toast_no_chat_selected".to_string(),
        "Kein Chat ausgewählt".to_string(),
    )]));
    let mut settings = Settings::defaults(Platform::Linux);
    settings.shortcuts.set(
        ShortcutId::PinChat,
        vec![KeyBinding::new("l").with_code("KeyL").with_mod(true).with_alt(true)],
    );
    let mut engine = engine_with(settings, Platform::Linux).with_messages(messages);
    engine.handler_mut().fail_with = Some(ActionError::NoChatSelected);

    engine.on_key_down(&KeyEvent::new("l", "KeyL").with_ctrl().with_alt(), &page());
    assert_eq!(engine.handler().notices[0].0, "Kein Chat ausgewählt");
}

#[test]
fn test_scroll_decline_falls_through() {
    let mut engine = engine(Platform::Linux);
    engine.handler_mut().decline_scroll = true;

    let dispatch = engine.on_key_down(&KeyEvent::new("j", "KeyJ"), &page());
    assert!(!dispatch.is_handled());
    assert_eq!(dispatch.disposition, EventDisposition::NONE);
    assert_eq!(engine.scrolling_key(), None);
}

#[test]
fn test_scroll_decline_reaches_later_category() {
    // Shift+Space doubles as a scroll binding here; declining the scroll
    // lets the focus toggle take it.
    let mut settings = Settings::defaults(Platform::Linux);
    settings.shortcuts.set(
        ShortcutId::ScrollHalfDown,
        vec![KeyBinding::new(" ").with_code("Space").with_shift(true)],
    );
    let mut engine = engine_with(settings, Platform::Linux);
    engine.handler_mut().decline_scroll = true;

    let dispatch = engine.on_key_down(&KeyEvent::new(" ", "Space").with_shift(), &page());
    assert_eq!(dispatch.shortcut(), Some(ShortcutId::ToggleFocus));
    assert_eq!(engine.handler().performed, vec![Action::ToggleFocus]);
}

// ── Scroll planning ─────────────────────────────────────────────────────────

const HISTORY: ScrollMetrics = ScrollMetrics {
    scroll_top: 1000.0,
    scroll_height: 5000.0,
    client_height: 1000.0,
    viewport_height: 800.0,
};

#[test]
fn test_default_scroll_keys_plan_motions() {
    let mut engine = ShortcutEngine::new(
        Settings::defaults(Platform::Linux),
        Platform::Linux,
        Recorder::with_page(HISTORY),
    );
    let keys = [
        KeyEvent::new("k", "KeyK").with_ctrl(),
        KeyEvent::new("j", "KeyJ").with_ctrl(),
        KeyEvent::new("K", "KeyK").with_shift(),
        KeyEvent::new("J", "KeyJ").with_shift(),
        KeyEvent::new("k", "KeyK"),
        KeyEvent::new("j", "KeyJ"),
    ];
    for key in &keys {
        engine.on_key_down(key, &page());
        engine.on_key_up(key);
    }

    let smooth = Duration::from_millis(200);
    let fast = Duration::from_millis(100);
    assert_eq!(
        engine.handler().motions,
        vec![
            ScrollMotion::Animate { target: 0.0, duration: smooth },
            ScrollMotion::Animate { target: 4000.0, duration: smooth },
            ScrollMotion::Animate { target: 600.0, duration: smooth },
            ScrollMotion::Animate { target: 1400.0, duration: smooth },
            ScrollMotion::Animate { target: 940.0, duration: fast },
            ScrollMotion::Animate { target: 1060.0, duration: fast },
        ]
    );
}

#[test]
fn test_held_scroll_keys_plan_repeat_motions() {
    let mut engine = ShortcutEngine::new(
        Settings::defaults(Platform::Mac),
        Platform::Mac,
        Recorder::with_page(HISTORY),
    );
    engine.on_key_down(&KeyEvent::new("j", "KeyJ").repeated(), &page());
    engine.on_key_down(&KeyEvent::new("j", "KeyJ").with_meta().repeated(), &page());
    engine.on_key_down(&KeyEvent::new("K", "KeyK").with_shift().repeated(), &page());

    assert_eq!(
        engine.handler().motions,
        vec![
            ScrollMotion::Continuous(ScrollDirection::Down),
            ScrollMotion::Jump { target: 4000.0 },
            ScrollMotion::Jump { target: 600.0 },
        ]
    );
}

// ── Continuous scroll ───────────────────────────────────────────────────────

#[test]
fn test_repeat_key_release_stops_scrolling() {
    let mut engine = engine(Platform::Mac);
    let held = KeyEvent::new("k", "KeyK").repeated();
    engine.on_key_down(&held, &page());
    engine.on_key_down(&held, &page());
    assert_eq!(engine.scrolling_key(), Some("k"));

    assert!(engine.on_key_up(&KeyEvent::new("k", "KeyK")));
    assert_eq!(engine.handler().stops, 1);
    assert_eq!(engine.scrolling_key(), None);
    // A second release has nothing left to stop.
    assert!(!engine.on_key_up(&KeyEvent::new("k", "KeyK")));
}

#[test]
fn test_disabling_vim_scroll_stops_scrolling() {
    let mut engine = engine(Platform::Linux);
    engine.on_key_down(&KeyEvent::new("j", "KeyJ").repeated(), &page());
    assert!(engine.scrolling_key().is_some());

    let mut settings = Settings::defaults(Platform::Linux);
    settings.feature_toggles.set(FeatureCategory::VimScroll, false);
    engine.update_settings(settings);

    assert_eq!(engine.handler().stops, 1);
    assert_eq!(engine.scrolling_key(), None);
}

#[test]
fn test_update_settings_keeps_scroll_when_still_enabled() {
    let mut engine = engine(Platform::Linux);
    engine.on_key_down(&KeyEvent::new("j", "KeyJ").repeated(), &page());
    engine.update_settings(Settings::defaults(Platform::Linux));
    assert_eq!(engine.handler().stops, 0);
    assert_eq!(engine.scrolling_key(), Some("j"));
}
