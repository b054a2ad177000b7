use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Labor {
    org_index: Option<String>,
    account_code: Option<String>,
    percent: Option<String>,
}

impl Labor {
    pub fn org_index(&self) -> Option<&str> {
        self.org_index.as_deref()
    }

    pub fn account_code(&self) -> Option<&str> {
        self.account_code.as_deref()
    }

    pub fn percent(&self) -> Option<&str> {
        self.percent.as_deref()
    }
}
