use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    name: Option<String>,
    a_number: Option<String>,
    position_number: Option<String>,
    title: Option<String>,
    department: Option<String>,
    home_labor: Option<String>,
    fte: Option<String>,
}

impl Person {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The university issued employee id, for example `A12345678`.
    pub fn a_number(&self) -> Option<&str> {
        self.a_number.as_deref()
    }

    pub fn position_number(&self) -> Option<&str> {
        self.position_number.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// The account the position is paid from when no labor distribution applies.
    pub fn home_labor(&self) -> Option<&str> {
        self.home_labor.as_deref()
    }

    pub fn fte(&self) -> Option<&str> {
        self.fte.as_deref()
    }
}
