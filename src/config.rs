/*
 * Responsibility
 * - Load settings from the environment (.env is honoured via dotenvy)
 * - Validate them up front: a missing Keycloak setting stops the process at startup
 * - Built once in app::run() and passed by reference; nothing reads env at request time
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Role names that grant administrative rights to authorization code layered
/// on top of the gate. Either may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminRoles {
    pub client: Option<String>,
    pub realm: Option<String>,
}

/// Everything the authentication pipeline needs to talk to Keycloak.
#[derive(Clone)]
pub struct KeycloakConfig {
    pub server_url: String,
    // Server-to-server base URL (e.g. cluster-internal DNS); falls back to server_url
    pub internal_url: Option<String>,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,

    pub exempt_uris: Vec<String>,
    pub decode_token: bool,
    pub realm_public_key: Option<String>,
    pub allow_anonymous: bool,
    pub timeout_seconds: u64,

    pub admin_roles: AdminRoles,
}

impl fmt::Debug for KeycloakConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the client secret
        f.debug_struct("KeycloakConfig")
            .field("server_url", &self.server_url)
            .field("internal_url", &self.internal_url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("exempt_uris", &self.exempt_uris)
            .field("decode_token", &self.decode_token)
            .field("allow_anonymous", &self.allow_anonymous)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("admin_roles", &self.admin_roles)
            .finish()
    }
}

impl KeycloakConfig {
    /// Base URL used for calls from this process to Keycloak.
    pub fn provider_base_url(&self) -> &str {
        self.internal_url.as_deref().unwrap_or(&self.server_url)
    }

    /// Issuer Keycloak writes into tokens of this realm (always the public URL).
    pub fn issuer(&self) -> String {
        format!(
            "{}/realms/{}",
            self.server_url.trim_end_matches('/'),
            self.realm
        )
    }

    /// Build from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str| -> Option<String> {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_url = required("KEYCLOAK_SERVER_URL")?;
        let realm = required("KEYCLOAK_REALM")?;
        let client_id = required("KEYCLOAK_CLIENT_ID")?;
        let client_secret = required("KEYCLOAK_CLIENT_SECRET")?;

        let internal_url = optional("KEYCLOAK_INTERNAL_URL");

        for (key, value) in [
            ("KEYCLOAK_SERVER_URL", Some(&server_url)),
            ("KEYCLOAK_INTERNAL_URL", internal_url.as_ref()),
        ] {
            if let Some(v) = value
                && url::Url::parse(v).is_err()
            {
                return Err(ConfigError::Invalid(key));
            }
        }

        let exempt_uris = split_patterns(&get("KEYCLOAK_EXEMPT_URIS").unwrap_or_default());

        let decode_token = parse_bool(get("KEYCLOAK_DECODE_TOKEN"), false)
            .ok_or(ConfigError::Invalid("KEYCLOAK_DECODE_TOKEN"))?;

        let allow_anonymous = parse_bool(get("KEYCLOAK_ALLOW_ANONYMOUS"), false)
            .ok_or(ConfigError::Invalid("KEYCLOAK_ALLOW_ANONYMOUS"))?;

        let timeout_seconds = match optional("KEYCLOAK_TIMEOUT_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("KEYCLOAK_TIMEOUT_SECONDS"))?,
            None => 5,
        };

        let realm_public_key =
            optional("KEYCLOAK_REALM_PUBLIC_KEY").map(|v| v.replace("\\n", "\n"));

        let admin_roles = AdminRoles {
            client: optional("KEYCLOAK_CLIENT_ADMIN_ROLE"),
            realm: optional("KEYCLOAK_REALM_ADMIN_ROLE"),
        };

        Ok(Self {
            server_url,
            internal_url,
            realm,
            client_id,
            client_secret,
            exempt_uris,
            decode_token,
            realm_public_key,
            allow_anonymous,
            timeout_seconds,
            admin_roles,
        })
    }
}

// None => unparseable
fn parse_bool(value: Option<String>, default: bool) -> Option<bool> {
    let Some(value) = value else {
        return Some(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,
    pub http_timeout_seconds: u64,

    pub keycloak: KeycloakConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let http_timeout_seconds = std::env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let keycloak = KeycloakConfig::from_lookup(|key| std::env::var(key).ok())?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            http_timeout_seconds,
            keycloak,
        })
    }
}

// Comma separated regexes. Commas inside `{m,n}` belong to the pattern.
fn split_patterns(raw: &str) -> Vec<String> {
    let mut patterns = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut escaped = false;

    for c in raw.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                patterns.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    patterns.push(current);

    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
