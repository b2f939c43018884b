pub mod options;
pub mod submission;
pub mod workbook;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Protocol development site the form is being filled for. BJIC gets its
/// dropdowns from the shared workbook; MBIC and RIC use the built-in lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "BJIC")]
    Bjic,
    #[serde(rename = "MBIC")]
    Mbic,
    #[serde(rename = "RIC")]
    Ric,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::Bjic, Site::Mbic, Site::Ric];

    pub fn label(&self) -> &'static str {
        match self {
            Site::Bjic => "BJIC",
            Site::Mbic => "MBIC",
            Site::Ric => "RIC",
        }
    }

    /// Pre-filled Background section for the site.
    pub fn background(&self) -> &'static str {
        match self {
            Site::Bjic => "BJIC Background Text",
            Site::Mbic => "MBIC Background Text",
            Site::Ric => "",
        }
    }

    /// Pre-filled DESIGN section for the site.
    pub fn design(&self) -> &'static str {
        match self {
            Site::Bjic => "BJIC DESIGN Text",
            Site::Mbic => "MBIC DESIGN Text",
            Site::Ric => "",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
