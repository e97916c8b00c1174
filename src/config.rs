//! Configuration management for the planning service.
//!
//! Configuration can be set via environment variables:
//! - `SOLVER_API_URL` - Required for planning. URL of the constraint solver (e.g. `http://localhost:8000/solve`).
//!   The server starts without it, but every plan request then fails with a configuration error.
//! - `SOLVER_TIMEOUT_SECS` - Optional. Bound on a solver call. Defaults to `120`.
//! - `AI_MODEL_API` - Optional. URL of the explanation service (e.g. `http://localhost:8001/explain`).
//!   When unset, explanations are generated locally.
//! - `AI_MODEL_TIMEOUT_SECS` - Optional. Bound on an explanation call. Defaults to `60`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::util::env_var_nonempty;

pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_EXPLAINER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Solver service configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Solver endpoint. Planning is impossible without it.
    pub endpoint: Option<Url>,

    /// Bound on a single solver call
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_SOLVER_TIMEOUT,
        }
    }
}

/// Explanation service configuration.
#[derive(Debug, Clone)]
pub struct ExplainerConfig {
    /// Explanation endpoint. `None` selects the local fallback.
    pub endpoint: Option<Url>,

    /// Bound on a single explanation call
    pub timeout: Duration,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_EXPLAINER_TIMEOUT,
        }
    }
}

impl ExplainerConfig {
    /// Check if the remote explanation service is enabled
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Everything the planning pipeline needs, handed over at construction time.
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub solver: SolverConfig,
    pub explainer: ExplainerConfig,
}

impl PlannerConfig {
    /// Build a config pointing at the given endpoints with default timeouts.
    pub fn with_endpoints(solver: Option<Url>, explainer: Option<Url>) -> Self {
        Self {
            solver: SolverConfig {
                endpoint: solver,
                ..SolverConfig::default()
            },
            explainer: ExplainerConfig {
                endpoint: explainer,
                ..ExplainerConfig::default()
            },
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Planning pipeline configuration
    pub planner: PlannerConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot be parsed.
    /// A missing `SOLVER_API_URL` is not an error here; it is reported per request.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var_nonempty)
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// `lookup` must return `None` for unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let solver = SolverConfig {
            endpoint: parse_endpoint("SOLVER_API_URL", lookup("SOLVER_API_URL"))?,
            timeout: parse_timeout(
                "SOLVER_TIMEOUT_SECS",
                lookup("SOLVER_TIMEOUT_SECS"),
                DEFAULT_SOLVER_TIMEOUT,
            )?,
        };

        let explainer = ExplainerConfig {
            endpoint: parse_endpoint("AI_MODEL_API", lookup("AI_MODEL_API"))?,
            timeout: parse_timeout(
                "AI_MODEL_TIMEOUT_SECS",
                lookup("AI_MODEL_TIMEOUT_SECS"),
                DEFAULT_EXPLAINER_TIMEOUT,
            )?,
        };

        Ok(Self {
            host,
            port,
            planner: PlannerConfig { solver, explainer },
        })
    }

    /// Create a config with custom endpoints (useful for testing).
    pub fn new(solver: Option<Url>, explainer: Option<Url>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            planner: PlannerConfig::with_endpoints(solver, explainer),
        }
    }
}

fn parse_endpoint(name: &str, value: Option<String>) -> Result<Option<Url>, ConfigError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let url = Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("unsupported scheme '{}'", other),
        )),
    }
}

fn parse_timeout(
    name: &str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    let secs: u64 = raw
        .parse()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            "timeout must be at least one second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(config.planner.solver.endpoint.is_none());
        assert!(!config.planner.explainer.is_enabled());
        assert_eq!(config.planner.solver.timeout, Duration::from_secs(120));
        assert_eq!(config.planner.explainer.timeout, Duration::from_secs(60));
    }

    #[test]
    fn reads_endpoints_and_timeouts() {
        let config = Config::from_lookup(lookup_from(&[
            ("SOLVER_API_URL", "http://localhost:8000/solve"),
            ("SOLVER_TIMEOUT_SECS", "30"),
            ("AI_MODEL_API", "http://localhost:8001/explain"),
            ("AI_MODEL_TIMEOUT_SECS", "5"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.planner.solver.endpoint.as_ref().map(Url::as_str),
            Some("http://localhost:8000/solve")
        );
        assert_eq!(config.planner.solver.timeout, Duration::from_secs(30));
        assert!(config.planner.explainer.is_enabled());
        assert_eq!(config.planner.explainer.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "PORT"));

        let err = Config::from_lookup(lookup_from(&[("SOLVER_API_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "SOLVER_API_URL"));

        let err =
            Config::from_lookup(lookup_from(&[("AI_MODEL_API", "ftp://host/explain")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "AI_MODEL_API"));

        let err = Config::from_lookup(lookup_from(&[("SOLVER_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue(ref name, _) if name == "SOLVER_TIMEOUT_SECS")
        );
    }
}
