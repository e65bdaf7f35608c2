//! `appdrawer` - Package reconciliation sandbox
//!
//! Drives the drawer engine against an in-memory platform. Commands mutate
//! the fake installed set and deliver the matching broadcasts, so the full
//! reconciliation pipeline (gate, controller event loop, resync workers) runs
//! exactly as it would against a real package manager.

use anyhow::{Context, Result};
use appdrawer::{
    adapter::BufferedAdapter,
    broadcast::{BroadcastGate, PackageAction, PackageChange},
    config::ConfigManager,
    controller::DrawerController,
    gestures::{GestureAction, GestureSlot, app_picker_entries},
    platform::{InstalledApp, MemoryPlatform, package_of},
    utils,
};
use parking_lot::Mutex;
use std::io::{BufRead, Write};
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tracing::{info, warn};

/// Package identifier the drawer itself runs under
const SELF_PACKAGE: &str = "org.drawer.shell";

/// How long to let the event loop settle after a broadcast before printing
const SETTLE: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    info!("appdrawer v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ConfigManager::load().context("Failed to load drawer configuration")?;
    info!(
        "Configuration loaded with {} hidden apps",
        config.hidden_apps.len()
    );

    let platform = seed_platform();
    let (package_tx, package_rx) = mpsc::sync_channel(32);
    let gate = BroadcastGate::new(package_tx);

    info!("Creating drawer controller");
    let controller = DrawerController::new(
        config,
        platform.clone(),
        Arc::new(Mutex::new(BufferedAdapter::new())),
        gate.registration(),
        package_rx,
        SELF_PACKAGE,
    );
    let controller = Arc::new(Mutex::new(controller));

    info!("Starting drawer controller thread");
    let _loop_handle = DrawerController::spawn_event_loop(Arc::clone(&controller));

    controller.lock().attach();
    std::thread::sleep(SETTLE);

    println!("appdrawer sandbox. Type 'help' for commands.");
    print_list(&controller);
    run_repl(&controller, &gate, &platform)?;

    controller.lock().detach();
    info!("appdrawer shutting down");
    Ok(())
}

/// Populate the fake platform with a small starter set
fn seed_platform() -> Arc<MemoryPlatform> {
    let platform = Arc::new(MemoryPlatform::new());
    platform.set_profiles(vec![0, 10]);

    platform.install(0, InstalledApp::new("com.example.mail/.Inbox", "Mail"));
    platform.install(0, InstalledApp::new("com.example.clock/.AlarmClock", "Clock"));
    platform.install(0, InstalledApp::new("com.example.browser/.Main", "Browser"));
    platform.install(0, InstalledApp::new("com.example.camera/.Shutter", "Camera"));
    platform.install(10, InstalledApp::new("com.example.mail/.Inbox", "Mail"));

    // Resolvable but not launcher-visible, like a settings trampoline
    let mut hidden = InstalledApp::new("com.example.provision/.Setup", "Provisioning");
    hidden.launcher_entry = false;
    platform.install(0, hidden);

    platform
}

/// Read commands from stdin until quit or EOF
fn run_repl(
    controller: &Arc<Mutex<DrawerController>>,
    gate: &BroadcastGate,
    platform: &MemoryPlatform,
) -> Result<()> {
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        if !handle_command(controller, gate, platform, line.trim()) {
            break;
        }
    }
    Ok(())
}

/// Execute one command line. Returns false when the session should end.
fn handle_command(
    controller: &Arc<Mutex<DrawerController>>,
    gate: &BroadcastGate,
    platform: &MemoryPlatform,
    line: &str,
) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };
    let args: Vec<&str> = parts.collect();

    match command {
        "help" => print_help(),
        "list" | "ls" => print_list(controller),
        "count" => {
            println!("{} packages installed", controller.lock().package_count());
        }
        "install" => {
            if let Some((component, label)) = component_and_label(&args) {
                platform.install(0, InstalledApp::new(component, label));
                deliver(gate, package_of(component), PackageAction::Added);
                print_list(controller);
            }
        }
        "update" => {
            if let Some((component, label)) = component_and_label(&args) {
                platform.relabel(component, &label);
                deliver(gate, package_of(component), PackageAction::Changed);
                print_list(controller);
            }
        }
        "uninstall" => {
            if let Some(package) = args.first() {
                platform.uninstall(package);
                deliver(gate, package, PackageAction::Removed);
                print_list(controller);
            } else {
                println!("usage: uninstall <package>");
            }
        }
        "sideload" => {
            // Install into a profile without a broadcast; 'resume' picks it up
            let serial = args.first().and_then(|s| s.parse::<u64>().ok());
            let rest = args.get(1..).unwrap_or_default();
            match (serial, component_and_label(rest)) {
                (Some(serial), Some((component, label))) => {
                    platform.install(serial, InstalledApp::new(component, label));
                    println!("installed silently into profile {serial}; run 'resume'");
                }
                _ => println!("usage: sideload <serial> <component> <label...>"),
            }
        }
        "resume" => {
            controller.lock().request_resync();
            std::thread::sleep(SETTLE);
            print_list(controller);
        }
        "hide" => {
            if let Some(position) = args.first().and_then(|s| s.parse::<usize>().ok()) {
                controller.lock().hide_app(position);
                print_list(controller);
            } else {
                println!("usage: hide <index>");
            }
        }
        "unhide" => {
            if let Some(key) = args.first() {
                controller.lock().unhide_app(key);
                print_list(controller);
            } else {
                println!("usage: unhide <wire-key>");
            }
        }
        "rename" => {
            if let Some(position) = args.first().and_then(|s| s.parse::<usize>().ok()) {
                let label = args[1..].join(" ");
                controller.lock().set_shorthand(position, &label);
                print_list(controller);
            } else {
                println!("usage: rename <index> <label...> (empty label clears)");
            }
        }
        "invert" => {
            let mut guard = controller.lock();
            let inverted = guard.config.lock().preferences.inverted_order;
            guard.set_inverted(!inverted);
            drop(guard);
            print_list(controller);
        }
        "gestures" => {
            let guard = controller.lock();
            let config = guard.config.lock();
            for slot in GESTURE_SLOTS {
                let action = config
                    .preferences
                    .gestures
                    .get(&slot)
                    .map_or(GestureAction::Nothing, |value| GestureAction::parse(value));
                println!("  {slot:?}: {}", action.summary(platform));
            }
        }
        "bind" => match (args.first().and_then(|s| parse_slot(s)), args.get(1)) {
            (Some(slot), Some(value)) => {
                let action = GestureAction::parse(value);
                let config = {
                    let guard = controller.lock();
                    let mut config = guard.config.lock();
                    config
                        .preferences
                        .gestures
                        .insert(slot, action.value().to_string());
                    config.clone()
                };
                if let Err(e) = ConfigManager::save(&config) {
                    warn!("failed to save gesture binding: {e}");
                }
                println!("{slot:?} -> {}", action.summary(platform));
            }
            _ => println!("usage: bind <swipe_up|swipe_down|double_tap|pinch> <action|component>"),
        },
        "targets" => {
            for entry in app_picker_entries(platform, SELF_PACKAGE) {
                println!("  {:<24} {}", entry.label, entry.value);
            }
        }
        "quit" | "exit" => return false,
        other => println!("unknown command '{other}'; type 'help'"),
    }
    true
}

/// Every bindable gesture slot, in display order
const GESTURE_SLOTS: [GestureSlot; 4] = [
    GestureSlot::SwipeUp,
    GestureSlot::SwipeDown,
    GestureSlot::DoubleTap,
    GestureSlot::Pinch,
];

/// Parse a gesture slot by its stored name
fn parse_slot(raw: &str) -> Option<GestureSlot> {
    match raw {
        "swipe_up" => Some(GestureSlot::SwipeUp),
        "swipe_down" => Some(GestureSlot::SwipeDown),
        "double_tap" => Some(GestureSlot::DoubleTap),
        "pinch" => Some(GestureSlot::Pinch),
        _ => None,
    }
}

/// First arg as component, rest joined as label
fn component_and_label<'a>(args: &[&'a str]) -> Option<(&'a str, String)> {
    let component = args.first()?;
    if !component.contains('/') {
        println!("component must look like package/class");
        return None;
    }
    let label = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        component.to_string()
    };
    Some((component, label))
}

/// Forward a broadcast through the gate and let the loop settle
fn deliver(gate: &BroadcastGate, package: &str, action: PackageAction) {
    if gate.deliver(PackageChange::new(package, action)) {
        std::thread::sleep(SETTLE);
    } else {
        println!("broadcast dropped at the gate");
    }
}

fn print_list(controller: &Arc<Mutex<DrawerController>>) {
    let controller = controller.lock();
    for (position, entry) in controller.entries().iter().enumerate() {
        let icon = if entry.icon.is_some() { "*" } else { " " };
        println!(
            "{position:3} {icon} {:<24} {}",
            entry.sort_label(),
            entry.key
        );
    }
    println!("    ({} packages installed)", controller.package_count());
}

fn print_help() {
    println!("commands:");
    println!("  list                               show the drawer");
    println!("  count                              installed package count");
    println!("  install <component> [label...]     install + broadcast added");
    println!("  update <component> [label...]      relabel + broadcast changed");
    println!("  uninstall <package>                remove + broadcast removed");
    println!("  sideload <serial> <component> [label...]  silent install");
    println!("  resume                             resync against the platform");
    println!("  hide <index>                       exclude an entry");
    println!("  unhide <wire-key>                  restore an excluded entry");
    println!("  rename <index> [label...]          set or clear a shorthand");
    println!("  invert                             flip sort order");
    println!("  gestures                           show gesture bindings");
    println!("  bind <slot> <action|component>     bind a gesture");
    println!("  targets                            bindable launch targets");
    println!("  quit                               exit");
}
