//! Command-line interface for chatkeys.
//!
//! Inspects and edits the shortcut settings file and replays key chords
//! through the dispatch engine.

use crate::engine::scroll::{ScrollMetrics, ScrollMotion, plan_scroll};
use crate::engine::{
    Action, ActionError, ActionHandler, KeyContext, NotifyLevel, ShortcutEngine, Trigger,
};
use crate::help::HelpPanel;
use crate::i18n::{MessageKey, Messages};
use anyhow::{Context, Result};
use chatkeys_config::watcher::SettingsWatcher;
use chatkeys_config::{KeyBinding, Platform, Settings, ShortcutId, defaults};
use chatkeys_keybindings::{
    BindingEditError, Conflict, InvalidBinding, KeyEvent, RejectReason, ShortcutDefinition,
    ShortcutRegistry, assign_binding, bindings_equal, check_conflicts, find_host_conflict,
    format_binding, normalize_binding, parse_binding, validate_binding,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// chatkeys - Keyboard shortcut engine for chat web applications
#[derive(Parser)]
#[command(name = "chatkeys")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Settings file (default: platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Translated messages file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub messages: Option<PathBuf>,

    /// Platform whose modifier conventions apply (default: this machine)
    #[arg(long, global = true, value_enum, value_name = "PLATFORM")]
    pub platform: Option<PlatformArg>,

    /// Set debug log level (overrides RUST_LOG and DEBUG_LEVEL)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Platform argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PlatformArg {
    Mac,
    Windows,
    Linux,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Mac => Platform::Mac,
            PlatformArg::Windows => Platform::Windows,
            PlatformArg::Linux => Platform::Linux,
        }
    }
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List every shortcut with its effective bindings (default)
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a chord can be used as a shortcut
    Validate {
        /// Chord such as "Mod+Shift+P" or "Ctrl+[KeyZ]"
        combo: String,

        /// Shortcut that would receive the chord (excluded from conflicts)
        #[arg(long, value_name = "ID")]
        r#for: Option<String>,
    },

    /// Bind a chord to a shortcut and save it
    Assign {
        /// Shortcut id, e.g. "pinChat"
        id: String,
        /// Chord such as "Mod+Shift+L"
        combo: String,
    },

    /// Restore default toggles and bindings
    Reset,

    /// Feed a chord through the dispatch engine and show what happens
    Simulate {
        combo: String,

        /// The key is typed into a text field
        #[arg(long)]
        editable: bool,

        /// The key is auto-repeating
        #[arg(long)]
        repeat: bool,
    },

    /// Print the shortcut list whenever the settings file changes
    Watch,
}

/// Runtime options passed from CLI to the application
#[derive(Clone)]
pub struct RuntimeOptions {
    pub command: Commands,
    pub config_path: PathBuf,
    pub messages_path: PathBuf,
    pub platform: Platform,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

/// Parse CLI arguments
pub fn process_cli() -> RuntimeOptions {
    let cli = Cli::parse();
    RuntimeOptions {
        command: cli.command.unwrap_or(Commands::List { json: false }),
        config_path: cli.config.unwrap_or_else(Settings::settings_path),
        messages_path: cli.messages.unwrap_or_else(Settings::locale_path),
        platform: cli.platform.map(Into::into).unwrap_or_else(Platform::current),
        log_level: cli.log_level.map(|l| l.to_level_filter()),
    }
}

/// Run the selected subcommand and return the process exit code.
pub fn run(options: RuntimeOptions) -> Result<i32> {
    let messages = Messages::load_or_default(&options.messages_path);
    match &options.command {
        Commands::List { json } => list(&options, &messages, *json),
        Commands::Validate { combo, r#for } => validate(&options, &messages, combo, r#for.as_deref()),
        Commands::Assign { id, combo } => assign(&options, &messages, id, combo),
        Commands::Reset => reset(&options, &messages),
        Commands::Simulate {
            combo,
            editable,
            repeat,
        } => simulate(&options, messages, combo, *editable, *repeat),
        Commands::Watch => watch(&options, messages),
    }
}

fn load_settings(options: &RuntimeOptions) -> Result<Settings> {
    Settings::load_from(&options.config_path, options.platform)
        .with_context(|| format!("Could not load settings from {:?}", options.config_path))
}

fn parse_combo(combo: &str) -> Result<KeyBinding> {
    parse_binding(combo).with_context(|| format!("Invalid chord {:?}", combo))
}

fn parse_id(id: &str) -> Result<ShortcutId> {
    id.parse::<ShortcutId>()
        .with_context(|| format!("Unknown shortcut {:?}", id))
}

/// One shortcut as shown by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutRow {
    pub id: &'static str,
    pub label: String,
    pub category: &'static str,
    /// Effective bindings in display form.
    pub bindings: Vec<String>,
    pub enabled: bool,
    pub custom: bool,
}

/// Rows for every shortcut in registry order.
pub fn shortcut_rows(
    registry: &ShortcutRegistry,
    settings: &Settings,
    messages: &Messages,
) -> Vec<ShortcutRow> {
    let is_mac = registry.is_mac();
    registry
        .definitions()
        .iter()
        .map(|definition| ShortcutRow {
            id: definition.id.as_str(),
            label: definition.label(messages),
            category: definition.category.as_str(),
            bindings: registry
                .effective_bindings(definition.id, &settings.shortcuts)
                .iter()
                .map(|b| format_binding(b, is_mac))
                .collect(),
            enabled: settings.feature_toggles.is_enabled(definition.category)
                || definition.id == ShortcutId::ToggleShortcuts,
            custom: registry.has_custom_binding(definition.id, &settings.shortcuts),
        })
        .collect()
}

fn list(options: &RuntimeOptions, messages: &Messages, json: bool) -> Result<i32> {
    let settings = load_settings(options)?;
    let registry = ShortcutRegistry::new(options.platform);
    let rows = shortcut_rows(&registry, &settings, messages);

    if json {
        let out = serde_json::to_string_pretty(&rows).context("Failed to serialize shortcut list")?;
        println!("{out}");
        return Ok(0);
    }

    println!("Settings: {}", options.config_path.display());
    println!("Platform: {}", options.platform);
    println!();
    for row in &rows {
        let mut notes = Vec::new();
        if !row.enabled {
            notes.push("disabled");
        }
        if row.custom {
            notes.push("custom");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!("  ({})", notes.join(", "))
        };
        println!(
            "  {:<16} {:<24} {}{}",
            row.id,
            row.label,
            row.bindings.join(", "),
            notes
        );
    }
    Ok(0)
}

fn invalid_message(messages: &Messages, err: &InvalidBinding, chord: &str) -> String {
    match err.reason() {
        RejectReason::DisallowedKey => messages.get(MessageKey::ShortcutForbiddenKey, &[chord]),
        RejectReason::RequiresModifier => {
            messages.get(MessageKey::ShortcutRequiresModifier, &[chord])
        }
    }
}

fn find_any_user_conflict<'a>(
    registry: &'a ShortcutRegistry,
    binding: &KeyBinding,
    settings: &Settings,
) -> Option<&'a ShortcutDefinition> {
    registry.definitions().iter().find(|definition| {
        settings.feature_toggles.is_enabled(definition.category)
            && registry
                .effective_bindings(definition.id, &settings.shortcuts)
                .iter()
                .any(|existing| bindings_equal(existing, binding, registry.is_mac()))
    })
}

fn validate(
    options: &RuntimeOptions,
    messages: &Messages,
    combo: &str,
    target: Option<&str>,
) -> Result<i32> {
    let binding = parse_combo(combo)?;
    let registry = ShortcutRegistry::new(options.platform);
    let chord = format_binding(&binding, registry.is_mac());

    if let Err(err) = validate_binding(&binding, registry.is_mac()) {
        println!("{}", invalid_message(messages, &err, &chord));
        return Ok(1);
    }

    let settings = load_settings(options)?;
    let conflict = match target.map(parse_id).transpose()? {
        Some(id) => check_conflicts(&registry, &binding, id, &settings),
        // Without a target every shortcut counts.
        None => match find_any_user_conflict(&registry, &binding, &settings) {
            Some(definition) => Conflict::User(definition),
            None => find_host_conflict(&registry, &binding).map_or(Conflict::None, Conflict::Host),
        },
    };

    match conflict {
        Conflict::User(definition) => {
            println!(
                "{}",
                messages.get(
                    MessageKey::ShortcutConflictUser,
                    &[chord.as_str(), definition.label(messages).as_str()]
                )
            );
            Ok(1)
        }
        Conflict::Host(host) => {
            println!(
                "{}",
                messages.get(MessageKey::ShortcutConflictHost, &[chord.as_str(), host.label(messages).as_str()])
            );
            Ok(0)
        }
        Conflict::None => {
            println!("{chord}: OK");
            Ok(0)
        }
    }
}

fn assign(options: &RuntimeOptions, messages: &Messages, id: &str, combo: &str) -> Result<i32> {
    let id = parse_id(id)?;
    let binding = parse_combo(combo)?;
    let registry = ShortcutRegistry::new(options.platform);
    let settings = load_settings(options)?;
    let chord = format_binding(&binding, registry.is_mac());

    let update = match assign_binding(&registry, &settings, id, binding) {
        Ok(update) => update,
        Err(BindingEditError::Invalid(err)) => {
            println!("{}", invalid_message(messages, &err, &chord));
            return Ok(1);
        }
        Err(BindingEditError::UserConflict { conflicting, .. }) => {
            let label = registry.get(conflicting).label(messages);
            println!(
                "{}",
                messages.get(MessageKey::ShortcutConflictUser, &[chord.as_str(), label.as_str()])
            );
            return Ok(1);
        }
    };

    if let Err(e) = Settings::update(&options.config_path, &update.partial, options.platform) {
        log::error!("Failed to save shortcut: {:#}", e);
        println!("{}", messages.text(MessageKey::ShortcutError));
        return Ok(1);
    }

    if let Some(host) = &update.warning {
        println!(
            "{}",
            messages.get(MessageKey::ShortcutConflictHost, &[chord.as_str(), host.label(messages).as_str()])
        );
    }
    let label = registry.get(id).label(messages);
    println!("{}", messages.get(MessageKey::ShortcutSuccess, &[label.as_str()]));
    Ok(0)
}

fn reset(options: &RuntimeOptions, messages: &Messages) -> Result<i32> {
    Settings::defaults(options.platform)
        .save_to(&options.config_path)
        .with_context(|| format!("Could not reset {:?}", options.config_path))?;
    println!("{}", messages.text(MessageKey::ResetSuccess));
    Ok(0)
}

/// Key event a binding produces when pressed on `platform`.
pub fn event_for_binding(binding: &KeyBinding, platform: Platform) -> KeyEvent {
    let normalized = normalize_binding(binding, platform.is_mac());
    KeyEvent {
        key: binding.key().to_string(),
        code: binding.code().unwrap_or_default().to_string(),
        ctrl: normalized.ctrl,
        meta: normalized.meta,
        shift: normalized.shift,
        alt: normalized.alt,
        ..KeyEvent::default()
    }
}

/// Chat history geometry the console pretends to scroll.
const SAMPLE_PAGE: ScrollMetrics = ScrollMetrics {
    scroll_top: 1200.0,
    scroll_height: 6000.0,
    client_height: 800.0,
    viewport_height: 900.0,
};

/// Handler that reports to stdout.
#[derive(Debug)]
struct ConsoleHandler {
    help_open: bool,
    page: ScrollMetrics,
    last_motion: Option<ScrollMotion>,
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self {
            help_open: false,
            page: SAMPLE_PAGE,
            last_motion: None,
        }
    }
}

impl ActionHandler for ConsoleHandler {
    fn perform(&mut self, action: Action, event: &KeyEvent) -> Result<bool, ActionError> {
        println!("  action: {:?}", action);
        if let Action::Scroll(kind) = action {
            let motion = plan_scroll(kind, &self.page, event.repeat);
            println!("  scroll: {motion} (from {}px)", self.page.scroll_top);
            self.last_motion = Some(motion);
        }
        Ok(true)
    }

    fn stop_continuous_scroll(&mut self) {
        println!("  continuous scroll stopped");
    }

    fn help_visible(&self) -> bool {
        self.help_open
    }

    fn show_help(&mut self, panel: HelpPanel) {
        self.help_open = true;
        println!("{panel}");
    }

    fn close_help(&mut self) {
        self.help_open = false;
        println!("  help closed");
    }

    fn notify(&mut self, message: &str, level: NotifyLevel) {
        println!("  toast ({:?}): {}", level, message);
    }
}

fn simulate(
    options: &RuntimeOptions,
    messages: Messages,
    combo: &str,
    editable: bool,
    repeat: bool,
) -> Result<i32> {
    let binding = parse_combo(combo)?;
    let settings = load_settings(options)?;
    let mut event = event_for_binding(&binding, options.platform);
    event.repeat = repeat;

    let mut engine = ShortcutEngine::new(settings, options.platform, ConsoleHandler::default())
        .with_messages(messages);
    let ctx = KeyContext {
        editable_target: editable,
    };

    println!("{}:", format_binding(&binding, options.platform.is_mac()));
    let dispatch = engine.on_key_down(&event, &ctx);
    match dispatch.trigger {
        None => println!("  no shortcut matched; the page receives the key"),
        Some(Trigger::Shortcut(id)) => println!("  matched: {}", id),
        Some(Trigger::Send) => println!("  matched: send"),
        Some(Trigger::Newline) => println!("  newline inserted, hidden from the page"),
    }
    println!(
        "  preventDefault: {}, stopPropagation: {}",
        dispatch.disposition.prevent_default, dispatch.disposition.stop_propagation
    );
    if engine.on_key_up(&event) {
        log::debug!("Simulated key release ended scrolling");
    }
    Ok(0)
}

fn watch(options: &RuntimeOptions, messages: Messages) -> Result<i32> {
    let settings = load_settings(options)?;
    let watcher = SettingsWatcher::new(&options.config_path, defaults::reload_debounce_ms())?;
    let mut engine = ShortcutEngine::new(settings, options.platform, ConsoleHandler::default())
        .with_messages(messages);

    println!("Watching {} (Ctrl+C to stop)", watcher.path().display());
    println!("{}", engine.help_panel());
    loop {
        if let Some(settings) = watcher.reload_if_changed(options.platform) {
            engine.update_settings(settings);
            println!("{}", engine.help_panel());
        }
        std::thread::sleep(Duration::from_millis(200));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScrollKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from([
            "chatkeys",
            "--platform",
            "mac",
            "assign",
            "pinChat",
            "Mod+Shift+L",
        ])
        .unwrap();
        assert!(matches!(cli.platform, Some(PlatformArg::Mac)));
        assert!(matches!(
            cli.command,
            Some(Commands::Assign { ref id, ref combo }) if id == "pinChat" && combo == "Mod+Shift+L"
        ));

        let cli =
            Cli::try_parse_from(["chatkeys", "simulate", "Enter", "--editable", "--log-level", "debug"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Simulate {
                editable: true,
                repeat: false,
                ..
            })
        ));
        assert_eq!(
            cli.log_level.map(LogLevelArg::to_level_filter),
            Some(log::LevelFilter::Debug)
        );
    }

    #[test]
    fn test_list_flag() {
        let cli = Cli::try_parse_from(["chatkeys", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }

    #[test]
    fn test_console_handler_plans_scroll() {
        let mut handler = ConsoleHandler::default();
        let half_down = KeyEvent::new("J", "KeyJ").with_shift();
        assert!(
            handler
                .perform(Action::Scroll(ScrollKind::HalfDown), &half_down)
                .unwrap()
        );
        assert_eq!(
            handler.last_motion,
            Some(ScrollMotion::Animate {
                target: 1650.0,
                duration: Duration::from_millis(200)
            })
        );

        handler.perform(Action::ToggleFocus, &KeyEvent::new(" ", "Space")).unwrap();
        assert!(handler.last_motion.is_some());
    }

    #[test]
    fn test_event_for_binding() {
        let binding = parse_binding("Mod+Shift+P").unwrap();
        let mac = event_for_binding(&binding, Platform::Mac);
        assert!(mac.meta && mac.shift && !mac.ctrl);
        let linux = event_for_binding(&binding, Platform::Linux);
        assert!(linux.ctrl && !linux.meta);
        assert_eq!(linux.key.to_lowercase(), "p");
    }
}
