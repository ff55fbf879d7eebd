use crate::Result;
use crate::metrics::{EvaluationPolicy, MetricDef};
use crate::misc::sanitize_filename;
use crate::session::Labels;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;

// Written by `save_default_with_comments`; a test pins it to `Config::default()`.
const DEFAULT_CONFIG_TOML: &str = r#"# slometer configuration.
#
# Measurement stays off until `enabled` is set to true; every field below
# shows its default value.

# Whether measurement sessions run at all.
enabled = false

# Directory receiving result artifacts.
artifacts_dir = "/tmp"

# Artifact file name used when no run identity is available.
artifact_name = "sli-summary.json"

# Identifier of the CI run, folded into artifact names. Usually set per
# invocation with --run-id instead.
run_id = ""

# Upper bound in seconds on a single snapshot fetch.
fetch_timeout_secs = 120

# Series tracked by each session. A bare name matches the sum the parser
# keeps over all label variants; a full identity like 'foo_total{pod="a"}'
# matches one series. Scope is "global" or "scoped".
[[metrics]]
name = "controller_runtime_reconcile_total"
scope = "global"

# How globally scoped series are treated while parallel runs are allowed:
# "skip", "warn", or "fail".
[policy]
allow_parallel = false
on_global_in_parallel = "warn"

# Extra labels stamped onto every session result.
[labels]
"#;

fn default_artifacts_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("/tmp")
}

fn default_artifact_name() -> String {
    "sli-summary.json".to_string()
}

const fn default_fetch_timeout_secs() -> u64 {
    120
}

fn default_metrics() -> Vec<MetricDef> {
    MetricDef::common_set()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Whether measurement sessions run at all. Off by default so the tool
    /// is inert until configuration turns it on.
    #[serde(default)]
    pub enabled: bool,

    /// Directory receiving result artifacts.
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: Utf8PathBuf,

    /// Artifact file name used when no run identity is available.
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,

    /// Identifier of the CI run or invocation, folded into artifact names.
    #[serde(default)]
    pub run_id: String,

    /// Upper bound in seconds on a single snapshot fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Series tracked by each session.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricDef>,

    /// How global series are treated when work runs in parallel.
    #[serde(default)]
    pub policy: EvaluationPolicy,

    /// Extra labels stamped onto every session result.
    #[serde(default)]
    pub labels: Labels,
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(root: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading slometer configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let candidates = [
                root.join("slometer.toml"),
                root.join("slometer.yml"),
                root.join("slometer.yaml"),
                root.join("slometer.json"),
            ];

            let mut found = None;
            for path in &candidates {
                match fs::read_to_string(path) {
                    Ok(text) => {
                        found = Some((path.clone(), text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading slometer configuration from {path}")),
                }
            }

            let Some(result) = found else {
                return Ok((Self::default(), Vec::new()));
            };
            result
        };

        let extension = final_path.extension().unwrap_or_default();
        let config: Self = match extension {
            "toml" => toml::from_str(&text).into_app_err_with(|| format!("parsing TOML configuration from {final_path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing YAML configuration from {final_path}"))?,
            "json" => serde_json::from_str(&text).into_app_err_with(|| format!("parsing JSON configuration from {final_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        Ok((config, warnings))
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Save the default configuration with explanatory comments.
    ///
    /// TOML output uses a commented template; other formats fall back to
    /// plain serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default_with_comments(&self, output_path: &Utf8Path) -> Result<()> {
        if output_path.extension() == Some("toml") {
            fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        } else {
            self.save(output_path)?;
        }

        Ok(())
    }

    /// Upper bound on a single snapshot fetch.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Full path of the artifact for one test case.
    ///
    /// When both the run id and the test case are known the file name
    /// encodes them, so artifacts from one CI run never collide across
    /// cases. Otherwise the configured artifact name is used as-is.
    #[must_use]
    pub fn artifact_path(&self, test_case: &str) -> Utf8PathBuf {
        let name = if self.run_id.is_empty() || test_case.is_empty() {
            self.artifact_name.clone()
        } else {
            format!("sli-summary.{}.{}.json", sanitize_filename(&self.run_id), sanitize_filename(test_case))
        };

        self.artifacts_dir.join(name)
    }

    /// Validate the configuration to detect settings that cannot work
    fn validate(&self, warnings: &mut Vec<String>) {
        if self.fetch_timeout_secs == 0 {
            warnings.push("fetch_timeout_secs is 0, every snapshot fetch will time out immediately".to_string());
        }

        if self.enabled && self.metrics.is_empty() {
            warnings.push("measurement is enabled but no metrics are configured".to_string());
        }

        let mut seen = BTreeSet::new();
        for def in &self.metrics {
            if !seen.insert(def.name.as_str()) {
                warnings.push(format!("metric '{}' is configured more than once", def.name));
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: false,
            artifacts_dir: default_artifacts_dir(),
            artifact_name: default_artifact_name(),
            run_id: String::new(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            metrics: default_metrics(),
            policy: EvaluationPolicy::default(),
            labels: Labels::new(),
        }
    }
}
