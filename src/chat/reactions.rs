//! Reaction flavor tables.
//!
//! Repeated names weight the draw toward the plain variant.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loading,
    Success,
    Failure,
    Welcome,
}

pub fn choices(outcome: Outcome) -> &'static [&'static str] {
    match outcome {
        Outcome::Loading => &["beachball"],
        Outcome::Success => &["sad-cat-thumbs-up", "thumbsup", "thumbsup_all", "thumbsup-dino", "ok"],
        Outcome::Failure => &[
            "x",
            "x",
            "x",
            "x",
            "nooo",
            "no",
            "tw_no_entry",
            "tw_no_entry",
            "tw_x",
            "x_1",
            "x_x",
        ],
        Outcome::Welcome => &[
            "wave",
            "wave-pikachu",
            "doggo_wave",
            "hyper-dino-wave",
            "tw_wave",
            "heydino",
        ],
    }
}

/// Uniform draw from the outcome's table. Pure apart from the RNG
/// argument-free convenience; no shared tables are mutated.
pub fn pick(outcome: Outcome) -> &'static str {
    let table = choices(outcome);
    table[rand::thread_rng().gen_range(0..table.len())]
}
