use crate::utils::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static BITRATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)([kKmM]?)$").expect("valid bitrate regex"));

/// An encoder bitrate as written in configuration (`"3500k"`, `"12M"`),
/// together with its value in bits per second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bitrate {
    raw: String,
    bits_per_second: u64,
}

impl Bitrate {
    pub fn parse(value: &str) -> Result<Self> {
        let raw = value.trim();
        let captures = BITRATE_REGEX
            .captures(raw)
            .ok_or_else(|| Error::parse(format!("Invalid bitrate: '{}'", value)))?;

        let number: f64 = captures[1]
            .parse()
            .map_err(|_| Error::parse(format!("Invalid bitrate: '{}'", value)))?;
        let multiplier = match &captures[2] {
            "k" | "K" => 1_000.0,
            "m" | "M" => 1_000_000.0,
            _ => 1.0,
        };

        let bits_per_second = (number * multiplier).round() as u64;
        if bits_per_second == 0 {
            return Err(Error::parse(format!("Bitrate must be positive: '{}'", value)));
        }

        Ok(Self {
            raw: raw.to_string(),
            bits_per_second,
        })
    }

    pub fn from_kbps(kbps: u64) -> Self {
        Self {
            raw: format!("{}k", kbps),
            bits_per_second: kbps * 1_000,
        }
    }

    pub fn bits_per_second(&self) -> u64 {
        self.bits_per_second
    }

    /// The value passed to `-b:v` / `-b:a`.
    pub fn as_ffmpeg_arg(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<String> for Bitrate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Bitrate> for String {
    fn from(bitrate: Bitrate) -> Self {
        bitrate.raw
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
