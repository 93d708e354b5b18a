//! Synthetic file-14 traces for integration tests.

#![allow(dead_code)]

use std::fmt::Write;

/// Event marker plus the five header rows the parameter offsets point into
pub fn event_header(event: u32, total_time: f64, timestep: f64) -> String {
    format!(
        "UQMD version: 30400 30400 output_file 14\n\
projectile: (mass, char) 197 79 target: (mass, char) 197 79\n\
transformation betas (NN,lab,pro) 0.0000000 0.9999999 -0.0000000\n\
impact_parameter_real/min/max(fm): 1.51 0.00 3.00 total_cross_section(mbarn): 0.00\n\
equation_of_state: 0 E_lab(GeV/u): 0.3551E+05 sqrt(s)(GeV): 0.2000E+03 p_lab(GeV/u): 0.3551E+05\n\
event# {event} random seed: 1477219191 (auto) total_time(fm/c): {total_time} Delta(t)_O(fm/c): {timestep}\n"
    )
}

/// Momentum of particle `i` in timestep `step`
pub fn momentum(step: usize, i: usize) -> (f64, f64, f64) {
    let k = (i + 1) as f64;
    (0.1 * k, -0.05 * k, 0.3 * (step + 1) as f64 - 0.2 * k)
}

/// Separator row, collision-counter row and `n` particle rows at time `t`
pub fn timestep_block(n: usize, t: f64, step: usize) -> String {
    let mut text = format!("{n} {t}\n0 0 0 0 0 0 0 0\n");
    for i in 0..n {
        let (px, py, pz) = momentum(step, i);
        writeln!(
            text,
            "{t} {x} {y} {z} 1.2 {px} {py} {pz} 0.938 {ityp} 1 1 0 0 0 0 0",
            x = i as f64,
            y = -(i as f64),
            z = 0.5 * i as f64,
            ityp = 1 + i % 3,
        )
        .unwrap();
    }
    text
}

/// `events` events of `steps` timesteps with `n` particles each
pub fn synthetic_trace(events: u32, steps: usize, n: usize, timestep: f64) -> String {
    let mut text = String::new();
    for event in 1..=events {
        text.push_str(&event_header(event, steps as f64 * timestep, timestep));
        for step in 0..steps {
            text.push_str(&timestep_block(n, (step + 1) as f64 * timestep, step));
        }
    }
    text
}
