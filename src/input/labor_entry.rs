/// One line of the labor distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaborEntry {
    org_index: String,
    account_code: String,
    percent: String,
}

impl LaborEntry {
    #[must_use]
    pub fn new(
        org_index: impl Into<String>,
        account_code: impl Into<String>,
        percent: impl Into<String>,
    ) -> Self {
        Self {
            org_index: org_index.into(),
            account_code: account_code.into(),
            percent: percent.into(),
        }
    }

    pub fn org_index(&self) -> &str {
        &self.org_index
    }

    pub fn account_code(&self) -> &str {
        &self.account_code
    }

    /// The share of the position paid from this account, as written in the config.
    ///
    /// Usually a number like `"50"` or `".5"`, but it is not validated.
    pub fn percent(&self) -> &str {
        &self.percent
    }
}
