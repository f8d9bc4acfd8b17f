use serde::Deserialize;

use crate::dates::is_valid_format;
use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Which roster row represents a staff member in the "No Record" group when
/// they appear more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterTieBreak {
    /// Last occurrence in roster order wins.
    #[default]
    #[serde(alias = "keep_last")]
    Last,
    /// First occurrence in roster order wins.
    #[serde(alias = "keep_first")]
    First,
}

impl std::fmt::Display for RosterTieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Last => write!(f, "last"),
            Self::First => write!(f, "first"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconOptions {
    #[serde(default)]
    pub roster_tie_break: RosterTieBreak,
    /// Extra chrono formats tried before the built-in ones.
    #[serde(default)]
    pub date_formats: Vec<String>,
}

// ---------------------------------------------------------------------------
// Run config (*.flexi.toml)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub inputs: InputConfig,
    #[serde(default)]
    pub options: ReconOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Master employment export, relative to the config file.
    pub employment: String,
    pub roster: String,
    #[serde(default)]
    pub employment_sheet: Option<String>,
    #[serde(default)]
    pub roster_sheet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

impl RunConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.inputs.employment.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "inputs.employment must not be empty".into(),
            ));
        }
        if self.inputs.roster.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "inputs.roster must not be empty".into(),
            ));
        }
        if self.inputs.employment == self.inputs.roster {
            return Err(ReconError::ConfigValidation(format!(
                "inputs.employment and inputs.roster both point at '{}'",
                self.inputs.roster
            )));
        }

        for fmt in &self.options.date_formats {
            if !is_valid_format(fmt) {
                return Err(ReconError::ConfigValidation(format!(
                    "invalid date format '{fmt}'"
                )));
            }
        }

        if let (Some(csv), Some(json)) = (&self.output.csv, &self.output.json) {
            if csv == json {
                return Err(ReconError::ConfigValidation(format!(
                    "output.csv and output.json both point at '{csv}'"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
