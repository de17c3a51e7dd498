//! Game configuration: defaults, `SNAKE_*` environment variables, then flags.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::types::{
    Direction, Orientation, DEFAULT_LENGTH, DEFAULT_POINT_SIZE, DEFAULT_SCORE_STEP,
    DEFAULT_SPEED_MS, SPLASH_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Pixels per grid cell edge
    pub point_size: usize,
    pub length: usize,
    pub direction: Direction,
    pub score_step: u32,
    /// Initial tick interval in milliseconds
    pub speed_ms: u32,
    pub wrap: bool,
    pub orientation: Orientation,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u32>,
    pub splash_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            point_size: DEFAULT_POINT_SIZE,
            length: DEFAULT_LENGTH,
            direction: Direction::Right,
            score_step: DEFAULT_SCORE_STEP,
            speed_ms: DEFAULT_SPEED_MS,
            wrap: true,
            orientation: Orientation::Normal,
            seed: None,
            splash_ms: SPLASH_MS,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `SNAKE_*` variables; unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let num = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            point_size: num("SNAKE_POINT_SIZE")
                .map(|v| v as usize)
                .unwrap_or(d.point_size),
            length: num("SNAKE_LENGTH").map(|v| v as usize).unwrap_or(d.length),
            direction: lookup("SNAKE_DIRECTION")
                .and_then(|s| Direction::from_str(s.trim()))
                .unwrap_or(d.direction),
            score_step: num("SNAKE_SCORE_STEP")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(d.score_step),
            speed_ms: num("SNAKE_SPEED_MS")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(d.speed_ms),
            wrap: lookup("SNAKE_WRAP")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(d.wrap),
            orientation: lookup("SNAKE_ORIENTATION")
                .and_then(|s| Orientation::from_str(s.trim()))
                .unwrap_or(d.orientation),
            seed: num("SNAKE_SEED")
                .and_then(|v| u32::try_from(v).ok())
                .or(d.seed),
            splash_ms: num("SNAKE_SPLASH_MS").unwrap_or(d.splash_ms),
        }
    }

    /// Apply command-line flags on top of `self`.
    ///
    /// Flags take their value as the next argument or after `=`.
    pub fn parse_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            let (flag, inline) = match args[i].split_once('=') {
                Some((f, v)) => (f, Some(v.to_string())),
                None => (args[i].as_str(), None),
            };
            let mut value = || take_value(args, &mut i, &inline, flag);
            match flag {
                "--point-size" => self.point_size = parse_num(flag, &value()?)?,
                "--length" => self.length = parse_num(flag, &value()?)?,
                "--score-step" => self.score_step = parse_num(flag, &value()?)?,
                "--speed" => self.speed_ms = parse_num(flag, &value()?)?,
                "--seed" => self.seed = Some(parse_num(flag, &value()?)?),
                "--splash-ms" => self.splash_ms = parse_num(flag, &value()?)?,
                "--direction" => {
                    let v = value()?;
                    self.direction = Direction::from_str(&v)
                        .ok_or_else(|| anyhow!("invalid --direction value: {}", v))?;
                }
                "--orientation" => {
                    let v = value()?;
                    self.orientation = Orientation::from_str(&v)
                        .ok_or_else(|| anyhow!("invalid --orientation value: {}", v))?;
                }
                "--wrap" if inline.is_none() => self.wrap = true,
                "--no-wrap" if inline.is_none() => self.wrap = false,
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 1;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values no round could start with.
    pub fn validate(&self) -> Result<()> {
        if self.point_size == 0 {
            return Err(anyhow!("point size must be positive"));
        }
        if self.length == 0 {
            return Err(anyhow!("length must be positive"));
        }
        if self.score_step == 0 {
            return Err(anyhow!("score step must be positive"));
        }
        Ok(())
    }
}

/// Value of a flag: the `=` part, or else the next argument.
fn take_value(args: &[String], i: &mut usize, inline: &Option<String>, flag: &str) -> Result<String> {
    if let Some(v) = inline {
        return Ok(v.clone());
    }
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_num<T: FromStr>(flag: &str, v: &str) -> Result<T> {
    v.trim()
        .parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
