//! Project path mode
//!
//! QGIS projects declare in `properties/Paths/Absolute` whether they store
//! their datasource paths absolute or relative.

use serde::Serialize;

/// How a project declares it stores its source paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    Absolute,
    Relative,
    /// Not parsed yet, missing, or an unexpected value
    #[default]
    Unknown,
}

impl PathMode {
    /// Interpret the text of the `Absolute` property
    pub fn from_declaration(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            Some("true") => PathMode::Absolute,
            Some("false") => PathMode::Relative,
            _ => PathMode::Unknown,
        }
    }

    /// Value written to the `Absolute` property
    pub fn from_write_relative(write_relative: bool) -> Self {
        if write_relative {
            PathMode::Relative
        } else {
            PathMode::Absolute
        }
    }

    /// Text of the `Absolute` property, `None` for [`PathMode::Unknown`]
    pub fn declaration(self) -> Option<&'static str> {
        match self {
            PathMode::Absolute => Some("true"),
            PathMode::Relative => Some("false"),
            PathMode::Unknown => None,
        }
    }
}

impl std::fmt::Display for PathMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PathMode::Absolute => "absolute",
            PathMode::Relative => "relative",
            PathMode::Unknown => "unknown",
        };
        f.write_str(label)
    }
}
