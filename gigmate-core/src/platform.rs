//! Gig platforms and earning provenance tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported gig platforms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Swiggy,
    Zomato,
    Uber,
    Rapido,
    Zepto,
    Blinkit,
}

impl Platform {
    /// All platforms in declaration order.
    pub const ALL: [Platform; 6] = [
        Platform::Swiggy,
        Platform::Zomato,
        Platform::Uber,
        Platform::Rapido,
        Platform::Zepto,
        Platform::Blinkit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Swiggy => "Swiggy",
            Platform::Zomato => "Zomato",
            Platform::Uber => "Uber",
            Platform::Rapido => "Rapido",
            Platform::Zepto => "Zepto",
            Platform::Blinkit => "Blinkit",
        }
    }

    /// What a single unit of work is called on this platform's payout messages.
    pub fn unit_label(&self) -> &'static str {
        match self {
            Platform::Swiggy | Platform::Blinkit => "orders",
            Platform::Zomato => "deliveries",
            Platform::Uber => "trips",
            Platform::Rapido => "rides",
            Platform::Zepto => "batches",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| anyhow::anyhow!("unknown platform: {s}"))
    }
}

/// How an earning record entered the system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportMethod {
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "PHOTO")]
    Photo,
}
