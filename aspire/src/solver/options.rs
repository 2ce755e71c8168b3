use crate::error::AspireError;
use crate::resource_limits::ResourceLimits;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the solver binary when none is configured
pub const CLINGO_ENV: &str = "ASPIRE_CLINGO";

/// How to run the solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOptions {
    /// Number of models to ask for; 0 asks for all of them
    pub nb_model: u32,
    /// Extra solver arguments, passed through untouched
    pub options: Vec<String>,
    /// Program constants, each passed as `-c name=value`
    pub constants: BTreeMap<String, String>,
    pub clingo_path: PathBuf,
    /// Seconds, passed as `--time-limit`
    pub time_limit: Option<u64>,
    pub limits: ResourceLimits,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            nb_model: 0,
            options: Vec::new(),
            constants: BTreeMap::new(),
            clingo_path: default_clingo_path(),
            time_limit: None,
            limits: ResourceLimits::default(),
        }
    }
}

fn default_clingo_path() -> PathBuf {
    std::env::var_os(CLINGO_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("clingo"))
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nb_model(mut self, nb_model: u32) -> Self {
        self.nb_model = nb_model;
        self
    }

    /// Append solver options; a string holding several options is split on whitespace
    pub fn with_options(mut self, options: &str) -> Self {
        self.options
            .extend(options.split_whitespace().map(str::to_string));
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn with_clingo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.clingo_path = path.into();
        self
    }

    pub fn with_time_limit(mut self, seconds: u64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Solver arguments for a run over `files`, reading stdin too when `inline`
    pub fn arguments(&self, files: &[PathBuf], inline: bool) -> Vec<String> {
        let mut args: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
        if inline {
            args.push("-".to_string());
        }
        args.push("-n".to_string());
        args.push(self.nb_model.to_string());
        for (name, value) in &self.constants {
            args.push("-c".to_string());
            args.push(format!("{}={}", name, value));
        }
        if let Some(seconds) = self.time_limit {
            args.push(format!("--time-limit={}", seconds));
        }
        args.extend(self.options.iter().cloned());
        args
    }

    /// The full argv, binary first
    pub fn command<P: AsRef<Path>>(&self, files: &[P], inline: bool) -> Vec<String> {
        let files: Vec<PathBuf> = files.iter().map(|f| f.as_ref().to_path_buf()).collect();
        let mut argv = vec![self.clingo_path.display().to_string()];
        argv.extend(self.arguments(&files, inline));
        argv
    }

    /// Reject constants the solver would misread
    pub fn validate(&self) -> Result<(), AspireError> {
        for (name, value) in &self.constants {
            if !is_identifier(name) {
                return Err(AspireError::launch(
                    format!("constant name '{}' is not an identifier", name),
                    "",
                ));
            }
            if value.trim().is_empty() {
                return Err(AspireError::launch(
                    format!("constant '{}' has an empty value", name),
                    "",
                ));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.trim_start_matches('_').chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'')
}
