use serde::Deserialize;

use crate::input::toml_input::{Labor, Person};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Details {
    person: Option<Person>,
    #[serde(default)]
    labor: Vec<Labor>,
}

impl Details {
    #[must_use]
    pub fn person(&self) -> Option<&Person> {
        self.person.as_ref()
    }

    /// The `[[labor]]` entries in the order they appear in the file.
    pub fn labor(&self) -> impl Iterator<Item = &Labor> {
        self.labor.iter()
    }
}
