//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `chief_core` linkage without the Flutter/FFI runtime.
//! - Print the demo week before and after one auto-fix pass.

use chief_core::{CalendarEvent, CommandCenter, CommandError, PlannerConfig, SystemClock};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("chief_core ping={}", chief_core::ping());
    println!("chief_core version={}", chief_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("chief_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CommandError> {
    let mut config = PlannerConfig::default();
    config.apply_overrides(|key| std::env::var(key).ok())?;
    let mut center = CommandCenter::demo(config, Box::new(SystemClock))?;

    println!("week of {}", center.week().monday());
    print_events("before", &center.list_events()?);

    let outcome = center.trigger_reconciliation()?;
    print_events("after", &center.list_events()?);
    println!(
        "removed={} added={} skipped={} avoided_minutes={}",
        outcome.removed.len(),
        outcome.added.len(),
        outcome.skipped.len(),
        center.avoided_minutes()
    );

    if let Some(message) = center.chat().last() {
        println!("assistant: {}", message.text);
    }
    println!("{}", center.weekly_report()?);
    Ok(())
}

fn print_events(label: &str, events: &[CalendarEvent]) {
    println!("[{label}] {} event(s)", events.len());
    for event in events {
        println!(
            "  {} {}-{} {:<6} {}",
            event.start.format("%a"),
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.alignment.as_str(),
            event.title
        );
    }
}
