//! Command declarations shared by the integration suites.

#![allow(dead_code, reason = "each suite uses a subset of the shared commands")]

use argot_core::{FromToken, command};

command! {
    /// Every binding kind, with a multi-valued positional field.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Archive {
        pub flag verbose: bool,
        pub option level: u8 = 6,
        pub option name: Option<String>,
        pub multi_option exclude: Vec<String>,
        pub multi_input paths: Vec<String>,
    }
}

command! {
    /// Flag and option sharing a first letter, declared option first.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Shared {
        pub option count: Option<u32>,
        pub flag compact: bool,
    }
}

/// Playback mode accepted as a single positional input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Start,
    Pause,
    Stop,
}

impl FromToken for Mode {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "start" => Some(Self::Start),
            "pause" => Some(Self::Pause),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}

command! {
    /// Single positional input with a strict flag.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Player {
        pub flag(strict) loud: bool,
        pub input mode: Mode,
    }
}
