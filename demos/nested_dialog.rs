//! Nested Dialog Transition
//!
//! A dialog with a backdrop and a panel: entering runs all three together,
//! leaving waits for both children before the dialog itself fades out.
//!
//! Key concepts:
//! - Concurrent enter across a tree
//! - Bottom-up leave
//! - Driving the machine the way a UI binding would
//! - Checkpointing a tree mid-transition
//!
//! Run with: cargo run --example nested_dialog

use transition_tree::{Actions, Direction, Event, TransitionMachine, TransitionMachineBuilder};

fn node(id: &'static str) -> TransitionMachine {
    TransitionMachineBuilder::new()
        .id(id)
        .actions(
            Actions::new()
                .on_start(move |d: Direction| println!("  [{id}] {d} animation started"))
                .on_stop(move |d: Direction| println!("  [{id}] {d} animation finished")),
        )
        .build()
        .expect("static ids are valid")
}

/// What a binding does once the DOM transition for `machine` has begun and ended.
fn animate(machine: &TransitionMachine) {
    machine.send(Event::Start);
    machine.send(Event::Stop);
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Nested Dialog Transition ===\n");

    let dialog = node("dialog");
    let backdrop = node("backdrop");
    let panel = node("panel");
    dialog.add(&backdrop);
    dialog.add(&panel);

    println!("Opening:");
    dialog.send(Event::Enter);
    dialog.send(Event::Start);
    println!("  backdrop is {}, panel is {}", backdrop.status(), panel.status());
    dialog.send(Event::Stop);
    animate(&backdrop);
    animate(&panel);
    println!("  dialog is {}\n", dialog.status());

    for machine in [&dialog, &backdrop, &panel] {
        machine.send(Event::Reset);
    }

    println!("Closing:");
    dialog.send(Event::Leave);
    dialog.send(Event::Start);
    println!("  dialog is {} until its children finish", dialog.status());

    let checkpoint = dialog.checkpoint();
    match checkpoint.to_json() {
        Ok(json) => println!("  checkpoint is {} bytes of JSON", json.len()),
        Err(e) => println!("  checkpoint failed: {e}"),
    }

    animate(&backdrop);
    animate(&panel);
    dialog.send(Event::Stop);
    println!("  dialog is {}", dialog.status());

    println!("\n=== Example Complete ===");
}
