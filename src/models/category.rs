use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// The fixed set of things that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Water,
    Urinate,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Water, Category::Urinate];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Category::Water => "water",
            Category::Urinate => "urinate",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "water" => Some(Category::Water),
            "urinate" => Some(Category::Urinate),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Water => "💧",
            Category::Urinate => "🚽",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Water => "Water",
            Category::Urinate => "Urinate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
