#![forbid(unsafe_code)]

//! Decoding of the client's effect definition ids into finishes and flares.
//!
//! Definition ids are CamelCase (`GoldFoil`, `GlimmerRed`). They are
//! converted to snake case and split on the first underscore: the head names
//! the effect, the remainder (flares only) names a color.

use crate::Error;
use std::fmt;

/// Surface finish of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Finish {
    Bananas,
    Cosmic,
    Foil,
    FrostedGlass,
    Gold,
    Ink,
    Metallic,
    Prism,
    Psychedelic,
    Rays,
    Refraction,
}

impl Finish {
    const TOKENS: [(&'static str, Finish); 11] = [
        ("bananas", Finish::Bananas),
        ("space", Finish::Cosmic),
        ("foil", Finish::Foil),
        ("frosted", Finish::FrostedGlass),
        ("gold", Finish::Gold),
        ("ink", Finish::Ink),
        ("metallic", Finish::Metallic),
        ("prism", Finish::Prism),
        ("psychedelic", Finish::Psychedelic),
        ("rays", Finish::Rays),
        ("refraction", Finish::Refraction),
    ];

    pub fn from_def(def_id: &str) -> Result<Self, Error> {
        let snake = snake_case(def_id);
        let (head, _) = split_first_token(&snake);
        lookup(&Self::TOKENS, head).ok_or_else(|| Error::UnknownEffect(def_id.to_owned()))
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlareEffect {
    Bananas,
    Bubbles,
    Confetti,
    Cosmic,
    Glimmer,
    Tone,
    Snow,
    Stardust,
    Krackle,
}

impl FlareEffect {
    const TOKENS: [(&'static str, FlareEffect); 9] = [
        ("bananas", FlareEffect::Bananas),
        ("bubbles", FlareEffect::Bubbles),
        ("confetti", FlareEffect::Confetti),
        ("space", FlareEffect::Cosmic),
        ("glimmer", FlareEffect::Glimmer),
        ("comic", FlareEffect::Tone),
        ("snow", FlareEffect::Snow),
        ("sparkle", FlareEffect::Stardust),
        ("kirby", FlareEffect::Krackle),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlareColor {
    White,
    Black,
    Blue,
    Gold,
    Red,
    Purple,
    Green,
    Rainbow,
}

impl FlareColor {
    const TOKENS: [(&'static str, FlareColor); 8] = [
        ("white", FlareColor::White),
        ("black", FlareColor::Black),
        ("blue", FlareColor::Blue),
        ("gold", FlareColor::Gold),
        ("red", FlareColor::Red),
        ("purple", FlareColor::Purple),
        ("green", FlareColor::Green),
        ("rainbow", FlareColor::Rainbow),
    ];
}

/// Reveal flare of a variant: an effect, optionally colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Flare {
    pub effect: FlareEffect,
    pub color: Option<FlareColor>,
}

impl Flare {
    pub fn from_def(def_id: &str) -> Result<Self, Error> {
        let snake = snake_case(def_id);
        let unknown = || Error::UnknownEffect(def_id.to_owned());
        let (head, rest) = split_first_token(&snake);
        let effect = lookup(&FlareEffect::TOKENS, head).ok_or_else(unknown)?;
        let color = match rest {
            Some(color) => Some(lookup(&FlareColor::TOKENS, color).ok_or_else(unknown)?),
            None => None,
        };
        Ok(Self { effect, color })
    }
}

fn lookup<T: Copy>(tokens: &[(&str, T)], token: &str) -> Option<T> {
    tokens
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, value)| *value)
}

fn split_first_token(snake: &str) -> (&str, Option<&str>) {
    match snake.split_once('_') {
        Some((head, rest)) => (head, Some(rest)),
        None => (snake, None),
    }
}

/// `GoldFoil` -> `gold_foil`, `Glimmer-Red` -> `glimmer_red`.
pub(crate) fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        match c {
            '-' | '.' | ' ' => out.push('_'),
            c if c.is_ascii_uppercase() => {
                if i > 0 {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}
