use anyhow::{Context, Result};

pub const HITS_TABLE_NAME: &str = "HITS_TABLE_NAME";
pub const DOWNSTREAM_FUNCTION_NAME: &str = "DOWNSTREAM_FUNCTION_NAME";

/// Deployment settings, read once at cold start and handed to the collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub hits_table_name: String,
    pub downstream_function_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .with_context(|| format!("{} not set", name))
        };

        Ok(Self {
            hits_table_name: require(HITS_TABLE_NAME)?,
            downstream_function_name: require(DOWNSTREAM_FUNCTION_NAME)?,
        })
    }
}
