use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use svc_core::collaborators::KeywordFilterRule;
use svc_core::ComponentConfig;
use svc_rules::ManualCombination;

/// Log level for everything except progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level used for progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Command line configuration for the Variant Forge application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the shader catalog (RON or JSON).
    #[arg(short, long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Path to the project manifest listing materials and scenes (RON or JSON).
    #[arg(short, long, value_name = "FILE")]
    pub project: PathBuf,

    /// Optional TOML file describing collectors, filters and manual keywords.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path of the variant archive to write.
    #[arg(short, long, value_name = "FILE", default_value = "variants.ron")]
    pub output: PathBuf,

    /// Replace the archive content instead of merging into it.
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Info)]
    pub global_log_level: GlobalLogLevel,

    #[arg(long, value_enum, default_value_t = ProgressLogLevel::Info)]
    pub progress_log_level: ProgressLogLevel,
}

/// What to collect and how to filter it.
///
/// Layered from built-in defaults, the `--config` TOML file, and `SVC_`
/// prefixed environment variables, later sources winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub collectors: Vec<ComponentConfig>,
    pub material_filters: Vec<ComponentConfig>,
    pub variant_filters: Vec<ComponentConfig>,
    pub manual_combinations: Vec<ManualCombination>,
    pub keyword_filters: Vec<KeywordFilterRule>,
    pub overwrite: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            collectors: vec![ComponentConfig::new("all_materials")],
            material_filters: Vec::new(),
            variant_filters: vec![ComponentConfig::new("keyword")],
            manual_combinations: Vec::new(),
            keyword_filters: Vec::new(),
            overwrite: false,
        }
    }
}

impl ToolConfig {
    /// The figment every `ToolConfig` is extracted from.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("SVC_"))
    }

    /// Loads the tool configuration. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }
        let config: Self = Self::figment(path)
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        log::debug!("Tool configuration: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_basic_args() {
        let args = vec![
            "variant-forge",
            "--catalog",
            "catalog.ron",
            "--project",
            "project.json",
        ];
        let config = AppConfig::try_parse_from(args).unwrap();
        assert_eq!(config.catalog, PathBuf::from("catalog.ron"));
        assert_eq!(config.project, PathBuf::from("project.json"));
        assert_eq!(config.output, PathBuf::from("variants.ron")); // Default
        assert!(!config.overwrite);
        assert_eq!(config.config, None);
        assert_eq!(config.report_progress_interval, None);
        assert_eq!(config.global_log_level, GlobalLogLevel::Info);
    }

    #[test]
    fn test_missing_required_args() {
        assert!(AppConfig::try_parse_from(["variant-forge", "--catalog", "c.ron"]).is_err());
    }

    #[test]
    fn test_progress_interval_and_levels() {
        let args = vec![
            "variant-forge",
            "-c",
            "c.ron",
            "-p",
            "p.ron",
            "--report-progress-interval",
            "250ms",
            "--progress-log-level",
            "debug",
            "--overwrite",
        ];
        let config = AppConfig::try_parse_from(args).unwrap();
        assert_eq!(
            config.report_progress_interval,
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.progress_log_level, ProgressLogLevel::Debug);
        assert!(config.overwrite);

        let bad = vec![
            "variant-forge",
            "-c",
            "c.ron",
            "-p",
            "p.ron",
            "--progress-log-level",
            "loud",
        ];
        assert!(AppConfig::try_parse_from(bad).is_err());
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ToolConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config, ToolConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "forge.toml",
                r#"
                overwrite = false

                [[collectors]]
                kind = "scene_dependency"
                options = { only_enabled = "false" }

                [[manual_combinations]]
                keywords = "FOG_LINEAR _NORMALMAP"

                [[keyword_filters]]
                keywords = "DEBUG_VIEW"
                include_all_combinations = true
                "#,
            )?;
            jail.set_env("SVC_OVERWRITE", "true");

            let config =
                ToolConfig::load(Some(Path::new("forge.toml"))).map_err(|e| e.to_string())?;
            assert!(config.overwrite);
            assert_eq!(config.collectors.len(), 1);
            assert_eq!(config.collectors[0].kind, "scene_dependency");
            assert!(config.collectors[0].enabled);
            assert_eq!(
                config.collectors[0].options.get("only_enabled").map(String::as_str),
                Some("false")
            );
            assert!(config.manual_combinations[0].enabled);
            assert!(config.keyword_filters[0].include_all_combinations);
            // Untouched sections keep their defaults.
            assert_eq!(config.variant_filters, vec![ComponentConfig::new("keyword")]);
            Ok(())
        });
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = ToolConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
