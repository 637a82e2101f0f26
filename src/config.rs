use std::env;

pub const URL_ENV: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub service_key: String,
}

impl Config {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Both values are required; blank counts as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let base_url = non_blank(lookup(URL_ENV))?;
        let service_key = non_blank(lookup(KEY_ENV))?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }
}

/// `.env.local` wins over `.env`; dotenvy never overrides variables that are
/// already set.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
