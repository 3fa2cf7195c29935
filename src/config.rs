use std::time::Duration;

use anyhow::{bail, Context};

/// Signing material and lifetimes for access and refresh tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub access_ttl: Duration,
    pub refresh_secret: String,
    pub refresh_ttl: Duration,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match var(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => bail!("{key} must be set"),
            }
        };

        let database_url = required("DATABASE_URL")?;
        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DB_MAX_CONNECTIONS")?,
            None => 10,
        };

        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match var("APP_PORT") {
                Some(v) => v.parse().context("APP_PORT")?,
                None => 8080,
            },
        };

        let jwt = JwtConfig {
            access_secret: required("ACCESS_TOKEN_SECRET")?,
            access_ttl: parse_expiry(&var("ACCESS_TOKEN_EXPIRED").unwrap_or_else(|| "15m".into()))
                .context("ACCESS_TOKEN_EXPIRED")?,
            refresh_secret: required("REFRESH_TOKEN_SECRET")?,
            refresh_ttl: parse_expiry(&var("REFRESH_TOKEN_EXPIRED").unwrap_or_else(|| "1d".into()))
                .context("REFRESH_TOKEN_EXPIRED")?,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "auth-service".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "auth-service-users".into()),
        };

        if jwt.access_secret == jwt.refresh_secret {
            bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }

        Ok(Self {
            database_url,
            max_connections,
            server,
            jwt,
        })
    }
}

/// Longest accepted token lifetime: ten years.
pub const MAX_EXPIRY: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Parses a token lifetime such as `30s`, `15m`, `12h`, `7d` or a bare number of seconds.
pub fn parse_expiry(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    if digits.is_empty() {
        bail!("invalid expiry {raw:?}: missing amount");
    }
    let amount: u64 = digits
        .parse()
        .with_context(|| format!("invalid expiry {raw:?}"))?;
    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        other => bail!("invalid expiry {raw:?}: unknown unit {other:?}"),
    };
    let secs = amount
        .checked_mul(multiplier)
        .with_context(|| format!("invalid expiry {raw:?}: out of range"))?;
    let expiry = Duration::from_secs(secs);
    if expiry > MAX_EXPIRY {
        bail!("invalid expiry {raw:?}: longer than {} days", MAX_EXPIRY.as_secs() / 86_400);
    }
    Ok(expiry)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        vars(&[
            ("DATABASE_URL", "postgres://localhost/auth"),
            ("ACCESS_TOKEN_SECRET", "access-secret"),
            ("REFRESH_TOKEN_SECRET", "refresh-secret"),
        ])
    }

    #[test]
    fn parses_expiry_units() {
        assert_eq!(parse_expiry("45").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_expiry("20s").unwrap(), Duration::from_secs(20));
        assert_eq!(parse_expiry("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_expiry("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_expiry("1d").unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn rejects_bad_expiry() {
        assert!(parse_expiry("").is_err());
        assert!(parse_expiry("m").is_err());
        assert!(parse_expiry("10w").is_err());
    }

    #[test]
    fn rejects_oversized_expiry() {
        assert!(parse_expiry("18446744073709551615d").is_err());
        assert!(parse_expiry("9999999999d").is_err());
        assert!(parse_expiry("3651d").is_err());
        assert_eq!(parse_expiry("3650d").unwrap(), MAX_EXPIRY);
    }

    #[test]
    fn oversized_refresh_expiry_fails_config() {
        let mut env = base();
        env.insert("REFRESH_TOKEN_EXPIRED".into(), "9999999999d".into());
        let err = AppConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("REFRESH_TOKEN_EXPIRED"));
    }

    #[test]
    fn applies_defaults() {
        let env = base();
        let cfg = AppConfig::from_vars(|k| env.get(k).cloned()).expect("config");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.jwt.access_ttl, Duration::from_secs(15 * 60));
        assert_eq!(cfg.jwt.refresh_ttl, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn reads_explicit_values() {
        let mut env = base();
        env.extend(vars(&[
            ("ACCESS_TOKEN_EXPIRED", "20s"),
            ("REFRESH_TOKEN_EXPIRED", "7d"),
            ("APP_PORT", "9000"),
            ("JWT_ISSUER", "iss"),
        ]));
        let cfg = AppConfig::from_vars(|k| env.get(k).cloned()).expect("config");
        assert_eq!(cfg.jwt.access_ttl, Duration::from_secs(20));
        assert_eq!(cfg.jwt.refresh_ttl, Duration::from_secs(7 * 86_400));
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.jwt.issuer, "iss");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let mut env = base();
        env.remove("REFRESH_TOKEN_SECRET");
        let err = AppConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("REFRESH_TOKEN_SECRET"));
    }

    #[test]
    fn identical_secrets_are_rejected() {
        let mut env = base();
        env.insert("REFRESH_TOKEN_SECRET".into(), "access-secret".into());
        assert!(AppConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }
}
