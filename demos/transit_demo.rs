//! Basic demonstration of the Solar System transit simulation.
//!
//! Run with: cargo run --example transit_demo

use voyager_sim::{TransitEvent, TransitWorld};

fn main() {
    println!("=== Solar System Transit - Simulation Demo ===\n");

    let mut sim = TransitWorld::new().expect("built-in config is valid");
    sim.launch();

    println!("Departing the Sun. Throttling up each frame...\n");

    // Simulated 60fps host; push the ladder to the top as a player would.
    let dt = 1.0 / 60.0;
    let mut frames: u64 = 0;
    while !sim.ended() && frames < 2_000_000 {
        sim.faster();
        let snapshot = sim.advance(dt);
        frames += 1;

        for event in &snapshot.events {
            match event {
                TransitEvent::Arrived { name, facts } => {
                    println!("--- Arrived at {} (frame {}) ---", name, frames);
                    println!("    elapsed:  {}", snapshot.elapsed_label);
                    println!("    distance: {}", snapshot.distance_label);
                    if !facts.fun_fact.is_empty() {
                        println!("    fact:     {}", facts.fun_fact);
                    }
                }
                TransitEvent::Departed { name } => {
                    println!("    leaving {}", name);
                }
            }
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    println!("{}", sim.snapshot().to_json_pretty().unwrap());
}
