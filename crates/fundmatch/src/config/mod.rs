use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::question::QuestionConfig;

/// Distinguishes runtime behavior for different stages of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the recommender.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub catalog_path: Option<PathBuf>,
    pub questions: QuestionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let catalog_path = env::var("FUNDMATCH_CATALOG_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let defaults = QuestionConfig::default();
        let questions = QuestionConfig {
            max_questions: read_count("FUNDMATCH_MAX_QUESTIONS", defaults.max_questions)?,
            core_questions: read_count("FUNDMATCH_CORE_QUESTIONS", defaults.core_questions)?,
            overlay_questions: read_count("FUNDMATCH_OVERLAY_QUESTIONS", defaults.overlay_questions)?,
            overlay_min_programs: read_count(
                "FUNDMATCH_OVERLAY_MIN_PROGRAMS",
                defaults.overlay_min_programs,
            )?,
        };

        if questions.core_questions > questions.max_questions {
            return Err(ConfigError::CoreExceedsCap {
                core: questions.core_questions,
                max: questions.max_questions,
            });
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            catalog_path,
            questions,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn read_count(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str },
    CoreExceedsCap { core: usize, max: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::CoreExceedsCap { core, max } => write!(
                f,
                "FUNDMATCH_CORE_QUESTIONS ({core}) cannot exceed FUNDMATCH_MAX_QUESTIONS ({max})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
