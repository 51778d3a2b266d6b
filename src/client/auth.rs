use std::fmt;

/// Credential sent with every page request
#[derive(Clone)]
pub enum Auth {
    /// Pass an API key as the `apiKey` query parameter
    Apikey(String),
    /// Don't send any credential
    None,
}

impl Auth {
    pub fn new(apikey: Option<String>) -> Self {
        match apikey {
            Some(apikey) if !apikey.is_empty() => Self::Apikey(apikey),
            _ => Self::None,
        }
    }

    /// Query parameter carrying the credential, if any
    pub fn query_pair(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Apikey(apikey) => Some(("apiKey", apikey.as_str())),
            Self::None => None,
        }
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apikey(_) => write!(f, "Apikey"),
            Self::None => write!(f, "None"),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
