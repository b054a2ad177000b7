use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::input::toml_input::{self, Details};
use crate::input::LaborEntry;
use crate::utils;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing `[person]` table")]
    MissingPersonTable,
    #[error("missing required key `person.{0}`")]
    MissingPersonKey(&'static str),
    #[error("labor entry {index} is missing required key `{key}`")]
    MissingLaborKey { index: usize, key: &'static str },
    #[error("`person.name` does not contain a single word")]
    EmptyName,
    #[error("last name `{0}` can not be part of a file name, it contains a path separator")]
    PathInLastName(String),
}

/// The data of one person for one timesheet cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonConfig {
    name: String,
    a_number: String,
    position_number: String,
    title: String,
    department: String,
    home_labor: String,
    fte: String,
    labor: Vec<LaborEntry>,
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    value.ok_or(ConfigError::MissingPersonKey(key))
}

impl PersonConfig {
    /// Parses the contents of a `details.toml` file.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let details: Details = toml::from_str(input)?;
        Self::try_from(details)
    }

    /// Loads and validates the config file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = utils::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&input)?;
        debug!(
            "loaded config for `{}` with {} labor entries",
            config.name(),
            config.labor().len()
        );

        Ok(config)
    }

    /// The full display name, as it will appear in the signature.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last word of the name, used in the pdf file names.
    #[must_use]
    pub fn last_name(&self) -> &str {
        // validated on construction, the name has at least one word
        self.name.split_whitespace().last().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn a_number(&self) -> &str {
        &self.a_number
    }

    #[must_use]
    pub fn position_number(&self) -> &str {
        &self.position_number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    #[must_use]
    pub fn home_labor(&self) -> &str {
        &self.home_labor
    }

    #[must_use]
    pub fn fte(&self) -> &str {
        &self.fte
    }

    /// The labor distribution, one entry per row of the timesheet.
    #[must_use]
    pub fn labor(&self) -> &[LaborEntry] {
        &self.labor
    }
}

impl TryFrom<Details> for PersonConfig {
    type Error = ConfigError;

    fn try_from(details: Details) -> Result<Self, Self::Error> {
        let person = details.person().ok_or(ConfigError::MissingPersonTable)?;

        let name = required(person.name(), "name")?;
        let Some(last_name) = name.split_whitespace().last() else {
            return Err(ConfigError::EmptyName);
        };

        if last_name.contains(['/', '\\']) {
            return Err(ConfigError::PathInLastName(last_name.to_string()));
        }

        let labor = details
            .labor()
            .enumerate()
            .map(|(index, labor)| LaborEntry::try_from_toml(index, labor))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            a_number: required(person.a_number(), "a_number")?.to_string(),
            position_number: required(person.position_number(), "position_number")?.to_string(),
            title: required(person.title(), "title")?.to_string(),
            department: required(person.department(), "department")?.to_string(),
            home_labor: required(person.home_labor(), "home_labor")?.to_string(),
            fte: required(person.fte(), "fte")?.to_string(),
            labor,
        })
    }
}

impl LaborEntry {
    fn try_from_toml(index: usize, labor: &toml_input::Labor) -> Result<Self, ConfigError> {
        let missing = |key| ConfigError::MissingLaborKey { index, key };

        Ok(Self::new(
            labor.org_index().ok_or_else(|| missing("org_index"))?,
            labor.account_code().ok_or_else(|| missing("account_code"))?,
            labor.percent().ok_or_else(|| missing("percent"))?,
        ))
    }
}

/// Loads the config file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<PersonConfig, ConfigError> {
    PersonConfig::from_file(path)
}
