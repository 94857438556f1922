//! Configuration primitives and loader for the cook-annotate toolkit.
//!
//! The loader resolves configuration using a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures so downstream
//! crates never touch raw TOML, and every resolved value remembers which
//! layer supplied it for use in validation messages.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cook_annotate::{StepSeparator, UnitCatalog, UnitDef};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".cook-annotate.toml";

const DEFAULT_TIME_MINUTES: u32 = 30;

const DEFAULT_COURSES: &[&str] = &["Frühstück", "Warme Mahlzeit", "Snack", "Kuchen"];

const DEFAULT_UNITS: &[(&str, Option<&str>)] = &[
    ("Stück", None),
    ("Esslöffel (EL)", Some("EL")),
    ("Teelöffel (TL)", Some("TL")),
    ("Gramm (g)", Some("g")),
    ("Milliliter (ml)", Some("ml")),
    ("Tassen (cup)", Some("cup")),
    ("Prise", None),
    ("Dose", None),
];

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub recipe: RecipeSettings,
    pub metadata: MetadataSettings,
    pub units: UnitCatalog,
    pub sources: ConfigSources,
}

/// Settings that govern how raw recipe text is interpreted.
#[derive(Clone, Debug)]
pub struct RecipeSettings {
    pub separator: StepSeparator,
}

/// Settings feeding the metadata header: the time value shown to the user
/// before they touch the field, and the course names offered to them.
#[derive(Clone, Debug)]
pub struct MetadataSettings {
    pub default_time: u32,
    pub courses: Vec<String>,
}

impl MetadataSettings {
    pub fn is_known_course(&self, course: &str) -> bool {
        self.courses.iter().any(|known| known == course)
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn default_layer() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed
    /// settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let mut merged = PartialConfig::default();
        let mut source_layers = vec![ConfigSource::default_layer()];

        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            recipe: resolved.recipe,
            metadata: resolved.metadata,
            units: resolved.units,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::load(LoadOptions::default()).unwrap_or_else(|err| {
            panic!("failed to load cook-annotate defaults: {err}");
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    separator: Option<Located<String>>,
    default_time: Option<Located<u32>>,
    courses: Option<Located<Vec<String>>>,
    units: Option<Located<Vec<RawUnit>>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.separator.is_some() {
            self.separator = other.separator;
        }
        if other.default_time.is_some() {
            self.default_time = other.default_time;
        }
        if other.courses.is_some() {
            self.courses = other.courses;
        }
        if other.units.is_some() {
            self.units = other.units;
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let separator = match self.separator {
            Some(located) => match located.value.parse::<StepSeparator>() {
                Ok(separator) => separator,
                Err(_) => {
                    errors.push(ConfigValidationError::new(
                        Some(located.source.clone()),
                        format!(
                            "recipe.separator must be '.', ';' or 'newline' (received '{}')",
                            located.value
                        ),
                    ));
                    StepSeparator::default()
                }
            },
            None => StepSeparator::default(),
        };

        let default_time = match self.default_time {
            Some(located) => {
                if located.value == 0 {
                    errors.push(ConfigValidationError::new(
                        Some(located.source.clone()),
                        "metadata.default_time must be greater than 0".into(),
                    ));
                }
                located.value
            }
            None => DEFAULT_TIME_MINUTES,
        };

        let courses = match self.courses {
            Some(located) => {
                let mut courses = Vec::new();
                for course in &located.value {
                    let trimmed = course.trim();
                    if trimmed.is_empty() {
                        errors.push(ConfigValidationError::new(
                            Some(located.source.clone()),
                            "metadata.courses entries cannot be blank".into(),
                        ));
                    } else {
                        courses.push(trimmed.to_string());
                    }
                }
                courses
            }
            None => DEFAULT_COURSES.iter().map(|c| c.to_string()).collect(),
        };

        let units = match self.units {
            Some(located) => finalize_units(located, &mut errors),
            None => UnitCatalog::new(
                DEFAULT_UNITS
                    .iter()
                    .map(|(label, abbreviation)| match abbreviation {
                        Some(short) => UnitDef::abbreviated(*label, *short),
                        None => UnitDef::new(*label),
                    })
                    .collect(),
            ),
        };

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            recipe: RecipeSettings { separator },
            metadata: MetadataSettings {
                default_time,
                courses,
            },
            units,
        })
    }
}

fn finalize_units(
    located: Located<Vec<RawUnit>>,
    errors: &mut Vec<ConfigValidationError>,
) -> UnitCatalog {
    let mut defs: Vec<UnitDef> = Vec::new();

    for unit in located.value {
        let label = unit.label.trim().to_string();
        if label.is_empty() {
            errors.push(ConfigValidationError::new(
                Some(located.source.clone()),
                "units entries must carry a non-empty label".into(),
            ));
            continue;
        }

        if defs.iter().any(|existing| existing.label == label) {
            errors.push(ConfigValidationError::new(
                Some(located.source.clone()),
                format!("duplicate unit label '{label}'"),
            ));
            continue;
        }

        defs.push(UnitDef {
            label,
            abbreviation: unit.abbreviation,
        });
    }

    UnitCatalog::new(defs)
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    recipe: RecipeSettings,
    metadata: MetadataSettings,
    units: UnitCatalog,
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError { source, message }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    recipe: Option<RawRecipe>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(default)]
    units: Option<Vec<RawUnit>>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();

        if let Some(recipe) = self.recipe {
            partial.separator = recipe
                .separator
                .map(|value| Located::new(value, source.clone()));
        }

        if let Some(metadata) = self.metadata {
            partial.default_time = metadata
                .default_time
                .map(|value| Located::new(value, source.clone()));
            partial.courses = metadata
                .courses
                .map(|value| Located::new(value, source.clone()));
        }

        partial.units = self.units.map(|value| Located::new(value, source));

        partial
    }
}

#[derive(Debug, Deserialize)]
struct RawRecipe {
    #[serde(default)]
    separator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    default_time: Option<u32>,
    #[serde(default)]
    courses: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawUnit {
    label: String,
    #[serde(default)]
    abbreviation: Option<String>,
}
