pub mod factory;
pub use factory::ClientFactory;

/// Where completions are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// llama.cpp linked into this process (feature `local`)
    Local,
    /// A llama.cpp server reached over HTTP
    Server,
}

impl BackendType {
    /// Parse backend type from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" | "inprocess" | "in-process" => Some(Self::Local),
            "server" | "llama" | "llamacpp" | "llama.cpp" | "llama-cpp" | "http" => {
                Some(Self::Server)
            }
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Server => "server",
        }
    }

    /// Whether this build can construct the backend
    pub fn is_available(&self) -> bool {
        match self {
            Self::Local => cfg!(feature = "local"),
            Self::Server => true,
        }
    }

    /// In-process inference when compiled in, the HTTP server otherwise
    pub fn default_for_build() -> Self {
        if Self::Local.is_available() {
            Self::Local
        } else {
            Self::Server
        }
    }
}

/// Normalize a llama.cpp server URL down to its base (no trailing slash, no API path)
pub fn normalize_server_url(url: &str) -> String {
    let mut base = url.trim().trim_end_matches('/');

    for suffix in ["/v1/completions", "/completions", "/v1"] {
        if let Some(stripped) = base.strip_suffix(suffix) {
            base = stripped.trim_end_matches('/');
            break;
        }
    }

    base.to_string()
}
