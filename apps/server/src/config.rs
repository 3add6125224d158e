//! Application configuration.

use scanner_alerts::NotifierConfig;
use scanner_core::{NetworkSpec, Registry, RegistryError, Token, TokenPair};
use scanner_engine::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Deployment used when no config file is present.
const DEFAULT_CONFIG: &str = include_str!("../config.default.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("environment variable {var} referenced by {network} RPC URL is not set")]
    MissingEnv { network: String, var: String },
    #[error("unterminated ${{...}} placeholder in {0} RPC URL")]
    UnterminatedPlaceholder(String),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("min_spread_pct must be a non-negative number, got {0}")]
    InvalidSpread(f64),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Networks in scan and dispatch order.
    pub networks: Vec<NetworkSpec>,
    pub tokens: Vec<Token>,
    /// Pairs in scan order.
    pub pairs: Vec<TokenPair>,
    #[serde(default)]
    pub scanner: ScannerSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
    /// Logging level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Time between cycle starts in milliseconds.
    pub scan_interval_ms: u64,
    /// Minimum spread in percent that counts as an opportunity.
    pub min_spread_pct: f64,
    /// Per-call quote timeout in milliseconds.
    pub quote_timeout_ms: u64,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            scan_interval_ms: 45_000,
            min_spread_pct: 0.5,
            quote_timeout_ms: 10_000,
        }
    }
}

impl ScannerSettings {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn quote_timeout(&self) -> Duration {
        Duration::from_millis(self.quote_timeout_ms)
    }
}

impl From<&ScannerSettings> for DetectorConfig {
    fn from(settings: &ScannerSettings) -> Self {
        DetectorConfig {
            min_spread_pct: settings.min_spread_pct,
        }
    }
}

/// Alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Minimum time between alert dispatches in milliseconds.
    pub cooldown_ms: u64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self { cooldown_ms: 2000 }
    }
}

impl From<&AlertSettings> for NotifierConfig {
    fn from(settings: &AlertSettings) -> Self {
        NotifierConfig {
            cooldown: Duration::from_millis(settings.cooldown_ms),
        }
    }
}

impl AppConfig {
    /// Built-in deployment: ethereum, polygon, arbitrum and bsc.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(DEFAULT_CONFIG)?)
    }

    /// Load `path`, or the built-in deployment if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::builtin(),
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Replace `${VAR}` placeholders in RPC URLs using `lookup`.
    pub fn expand_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        for network in &mut self.networks {
            network.rpc_url = expand_placeholders(&network.rpc_url, network.chain.as_str(), &lookup)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.scan_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("scan_interval_ms"));
        }
        if self.scanner.quote_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("quote_timeout_ms"));
        }
        let spread = self.scanner.min_spread_pct;
        if !spread.is_finite() || spread < 0.0 {
            return Err(ConfigError::InvalidSpread(spread));
        }
        Ok(())
    }

    /// Validate and build the registry.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        self.validate()?;
        Ok(Registry::new(
            self.networks.clone(),
            self.tokens.clone(),
            self.pairs.clone(),
        )?)
    }
}

fn expand_placeholders(
    input: &str,
    network: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| ConfigError::UnterminatedPlaceholder(network.to_string()))?;
        let var = &after[..end];
        let value = lookup(var).ok_or_else(|| ConfigError::MissingEnv {
            network: network.to_string(),
            var: var.to_string(),
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scanner_core::Chain;

    fn infura(var: &str) -> Option<String> {
        (var == "INFURA_KEY").then(|| "abc123".to_string())
    }

    #[test]
    fn test_builtin_deployment() {
        let config = AppConfig::builtin().unwrap();
        let chains: Vec<Chain> = config.networks.iter().map(|n| n.chain).collect();
        assert_eq!(
            chains,
            vec![Chain::Ethereum, Chain::Polygon, Chain::Arbitrum, Chain::Bsc]
        );
        assert_eq!(config.tokens.len(), 8);
        assert_eq!(config.pairs.len(), 7);
        assert_eq!(config.scanner.scan_interval_ms, 45_000);
        assert_eq!(config.scanner.min_spread_pct, 0.5);
        assert_eq!(config.alerts.cooldown_ms, 2000);
    }

    #[test]
    fn test_builtin_registry_resolves_pairs() {
        let mut config = AppConfig::builtin().unwrap();
        config.expand_env(infura).unwrap();
        let registry = config.registry().unwrap();

        assert_eq!(
            registry.network(Chain::Ethereum).unwrap().rpc_url,
            "https://mainnet.infura.io/v3/abc123"
        );
        // WBNB/BUSD only exists on bsc, LINK/USDC only on ethereum.
        assert_eq!(registry.pairs_on(Chain::Bsc).len(), 1);
        assert_eq!(registry.pairs_on(Chain::Ethereum).len(), 5);
        assert_eq!(registry.pairs_on(Chain::Polygon).len(), 5);
    }

    #[test]
    fn test_expand_env_missing_var() {
        let mut config = AppConfig::builtin().unwrap();
        let err = config.expand_env(|_| None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnv { ref network, ref var } if network == "ethereum" && var == "INFURA_KEY"
        ));
    }

    #[test]
    fn test_expand_placeholders() {
        assert_eq!(
            expand_placeholders("http://${HOST}:${PORT}/rpc", "ethereum", &|v: &str| {
                Some(if v == "HOST" { "node".into() } else { "8545".into() })
            })
            .unwrap(),
            "http://node:8545/rpc"
        );
        assert_eq!(
            expand_placeholders("https://bsc-dataseed.binance.org/", "bsc", &|_: &str| None).unwrap(),
            "https://bsc-dataseed.binance.org/"
        );
        assert!(matches!(
            expand_placeholders("http://${HOST", "bsc", &|_: &str| None),
            Err(ConfigError::UnterminatedPlaceholder(_))
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{
            "networks": [{
                "chain": "ethereum",
                "rpc_url": "http://localhost:8545",
                "venues": [{ "id": "uniswapV2", "router": "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D" }]
            }],
            "tokens": [],
            "pairs": []
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.scanner.quote_timeout_ms, 10_000);
        assert_eq!(config.alerts.cooldown_ms, 2000);
        assert_eq!(config.log_level, "info");
        assert!(config.registry().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = AppConfig::builtin().unwrap();
        config.scanner.scan_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDuration(_))));

        let mut config = AppConfig::builtin().unwrap();
        config.scanner.min_spread_pct = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpread(_))));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = AppConfig::load("/nonexistent/dex-scanner.json").unwrap();
        assert_eq!(config.networks.len(), 4);
    }

    #[test]
    fn test_settings_conversions() {
        let settings = ScannerSettings::default();
        let detector: DetectorConfig = (&settings).into();
        assert_eq!(detector.min_spread_pct, 0.5);

        let notifier: NotifierConfig = (&AlertSettings::default()).into();
        assert_eq!(notifier.cooldown, Duration::from_millis(2000));
    }
}
