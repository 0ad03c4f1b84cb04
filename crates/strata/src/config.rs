//! `strata.toml`.
//!
//! ```toml
//! [pipeline]
//! transformers = ["strata.RenameField", "strata.TraceCalls"]
//! order = [["strata.RenameField", "strata.TraceCalls"]]
//! remap = "exact"
//!
//! [rename-field]
//! from = "i"
//! to = "count"
//!
//! [trace-calls]
//! receiver = "Log"
//! ```
//!
//! An empty name inside an order list is a gap.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use strata_track::RemapPolicy;
use strata_transform::SourceTransformer;
use strata_transform::transformers::{RenameField, TraceCalls};

const RENAME_FIELD: &str = "strata.RenameField";
const TRACE_CALLS: &str = "strata.TraceCalls";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read `{path}`")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in `{path}`")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown transformer `{0}`")]
    UnknownTransformer(String),
    #[error("transformer `{transformer}` needs a `[{table}]` table")]
    MissingSettings { transformer: &'static str, table: &'static str },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) pipeline: PipelineConfig,
    pub(crate) rename_field: Option<RenameFieldConfig>,
    pub(crate) trace_calls: Option<TraceCallsConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PipelineConfig {
    #[serde(default)]
    pub(crate) transformers: Vec<String>,
    #[serde(default)]
    pub(crate) order: Vec<Vec<String>>,
    #[serde(default)]
    pub(crate) remap: Remap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RenameFieldConfig {
    pub(crate) from: String,
    pub(crate) to: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TraceCallsConfig {
    pub(crate) receiver: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Remap {
    #[default]
    Exact,
    Nearest,
}

impl From<Remap> for RemapPolicy {
    fn from(remap: Remap) -> Self {
        match remap {
            Remap::Exact => Self::Exact,
            Remap::Nearest => Self::NearestMappedAncestor,
        }
    }
}

impl Config {
    pub(crate) fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let config = Self::from_toml(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })?;
        tracing::debug!(%path, transformers = ?config.pipeline.transformers, "loaded config");
        Ok(config)
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Sets up `RenameField`, enabling it if the file did not.
    pub(crate) fn rename(&mut self, from: String, to: String) {
        self.rename_field = Some(RenameFieldConfig { from, to });
        self.enable(RENAME_FIELD);
    }

    /// Sets up `TraceCalls`, enabling it if the file did not.
    pub(crate) fn trace(&mut self, receiver: String) {
        self.trace_calls = Some(TraceCallsConfig { receiver });
        self.enable(TRACE_CALLS);
    }

    fn enable(&mut self, name: &str) {
        if !self.pipeline.transformers.iter().any(|it| it == name) {
            self.pipeline.transformers.push(name.to_owned());
        }
    }

    pub(crate) fn policy(&self) -> RemapPolicy {
        self.pipeline.remap.into()
    }

    pub(crate) fn orders(&self) -> Vec<Vec<Option<String>>> {
        self.pipeline
            .order
            .iter()
            .map(|order| {
                order.iter().map(|name| (!name.is_empty()).then(|| name.clone())).collect()
            })
            .collect()
    }

    pub(crate) fn transformers(&self) -> Result<Vec<Box<dyn SourceTransformer>>, ConfigError> {
        self.pipeline
            .transformers
            .iter()
            .map(|name| -> Result<Box<dyn SourceTransformer>, ConfigError> {
                match name.as_str() {
                    RENAME_FIELD => {
                        let settings = self.rename_field.as_ref().ok_or(
                            ConfigError::MissingSettings {
                                transformer: RENAME_FIELD,
                                table: "rename-field",
                            },
                        )?;
                        Ok(Box::new(RenameField::new(&settings.from, &settings.to)))
                    }
                    TRACE_CALLS => {
                        let settings = self.trace_calls.as_ref().ok_or(
                            ConfigError::MissingSettings {
                                transformer: TRACE_CALLS,
                                table: "trace-calls",
                            },
                        )?;
                        Ok(Box::new(TraceCalls::new(&settings.receiver)))
                    }
                    _ => Err(ConfigError::UnknownTransformer(name.clone())),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    const FULL: &str = r#"
[pipeline]
transformers = ["strata.TraceCalls", "strata.RenameField"]
order = [["strata.RenameField", "", "strata.TraceCalls"]]
remap = "nearest"

[rename-field]
from = "i"
to = "count"

[trace-calls]
receiver = "Log"
"#;

    #[test]
    fn full_config() {
        let config = Config::from_toml(FULL).unwrap();
        assert_eq!(config.policy(), RemapPolicy::NearestMappedAncestor);
        assert_eq!(
            config.orders(),
            [vec![Some(RENAME_FIELD.to_owned()), None, Some(TRACE_CALLS.to_owned())]]
        );
        let names: Vec<String> =
            config.transformers().unwrap().iter().map(|it| it.qualified_name()).collect();
        assert_eq!(names, ["strata.TraceCalls, strata", "strata.RenameField, strata"]);
    }

    #[test]
    fn empty_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.policy(), RemapPolicy::Exact);
        assert!(config.orders().is_empty());
        assert!(config.transformers().unwrap().is_empty());
    }

    #[test]
    fn flags_enable_transformers() {
        let mut config = Config::from_toml("[pipeline]\ntransformers = [\"strata.TraceCalls\"]")
            .unwrap();
        config.rename("a".to_owned(), "b".to_owned());
        config.trace("Log".to_owned());
        assert_eq!(config.pipeline.transformers, [TRACE_CALLS, RENAME_FIELD]);
        assert_eq!(config.transformers().unwrap().len(), 2);
    }

    #[test]
    fn missing_settings() {
        let config =
            Config::from_toml("[pipeline]\ntransformers = [\"strata.RenameField\"]").unwrap();
        let error = config.transformers().err().unwrap();
        expect!["transformer `strata.RenameField` needs a `[rename-field]` table"]
            .assert_eq(&error.to_string());
    }

    #[test]
    fn unknown_transformer() {
        let config = Config::from_toml("[pipeline]\ntransformers = [\"Nope\"]").unwrap();
        let error = config.transformers().err().unwrap();
        expect!["unknown transformer `Nope`"].assert_eq(&error.to_string());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("[pipeline]\nremap = \"fuzzy\"").is_err());
        assert!(Config::from_toml("[pipeline]\nretries = 3").is_err());
    }
}
