use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using HouseError
pub type Result<T> = std::result::Result<T, HouseError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically (and that the CLI prints alongside the message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registry
    DuplicateName,
    HouseNotFound,
    ModuleConflict,
    PathNotFound,

    // Resolution
    PartNotFound,
    PartNameInvalid,
    PartConstruction,

    // Fetcher / filesystem
    FetchFailed,
    RemovalFailed,

    // Input
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::HouseNotFound => "ERR_HOUSE_NOT_FOUND",
            ExErrorKind::ModuleConflict => "ERR_MODULE_CONFLICT",
            ExErrorKind::PathNotFound => "ERR_PATH_NOT_FOUND",
            ExErrorKind::PartNotFound => "ERR_PART_NOT_FOUND",
            ExErrorKind::PartNameInvalid => "ERR_PART_NAME",
            ExErrorKind::PartConstruction => "ERR_PART_CONSTRUCTION",
            ExErrorKind::FetchFailed => "ERR_FETCH",
            ExErrorKind::RemovalFailed => "ERR_REMOVAL_FAILED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the context
/// (operation, entity name, filesystem path) needed to render a user-facing
/// message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    path: Option<PathBuf>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity (house or part name) context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (name: {})", entity)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for house and part operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HouseError {
    /// A house with this name is already registered
    #[error("A house named '{name}' already exists, please choose another name")]
    HouseNameRepeat { name: String },

    /// No house with this name is registered
    #[error("House not found: '{name}'")]
    HouseNotFound { name: String },

    /// The local house directory name shadows another importable package
    #[error(
        "House name '{house_name}' conflicts with the package at '{}', please rename the house directory ('{}')",
        conflict_path.display(),
        house_path.display()
    )]
    ModuleConflict {
        house_name: String,
        conflict_path: PathBuf,
        house_path: PathBuf,
    },

    /// The house name cannot be used as a single directory name
    #[error("Invalid house name: '{name}', a house name must be a single directory name")]
    InvalidHouseName { name: String },

    /// A fetch destination that is not a direct child of the cache directory
    #[error(
        "Refusing to fetch into '{}', it is not a directory directly under '{}'",
        path.display(),
        cache_dir.display()
    )]
    FetchTargetOutsideCache { path: PathBuf, cache_dir: PathBuf },

    /// A path given by the caller does not exist
    #[error("Path not found: '{}'", path.display())]
    PathNotFound { path: PathBuf },

    /// The part is unknown or its component could not be loaded
    #[error("Part not found: \"{name}\", {cause}")]
    PartNotFound { name: String, cause: String },

    /// The part name is malformed (missing or unknown category segment)
    #[error("Invalid part name: \"{name}\"")]
    PartNameInvalid { name: String },

    /// The part factory refused the supplied parameters
    #[error("Part \"{name}\" could not be constructed: {reason}")]
    PartConstruction { name: String, reason: String },

    /// Cloning a remote house failed
    #[error("Failed to fetch '{url}', please check the network or whether the URL is correct: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Forced directory removal failed even after fixing permissions
    #[error("Unable to remove directory '{}', please delete it manually", path.display())]
    RemovalFailed { path: PathBuf },

    /// Filesystem failure outside the cases above
    #[error("IO error during {operation}: {message}")]
    Io { operation: String, message: String },

    /// Manifest or JSON (de)serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not happen)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HouseError {
    /// Build an Io variant from a std::io::Error
    pub fn io(operation: impl Into<String>, err: &std::io::Error) -> Self {
        HouseError::Io {
            operation: operation.into(),
            message: err.to_string(),
        }
    }
}

/// Conversion from HouseError to ExError
///
/// Maps each domain variant to its kind and carries the structured context.
impl From<HouseError> for ExError {
    fn from(err: HouseError) -> Self {
        let message = err.to_string();
        match err {
            HouseError::HouseNameRepeat { name } => ExError::new(ExErrorKind::DuplicateName)
                .with_entity(name)
                .with_message(message),

            HouseError::HouseNotFound { name } => ExError::new(ExErrorKind::HouseNotFound)
                .with_entity(name)
                .with_message(message),

            HouseError::ModuleConflict {
                house_name,
                house_path,
                ..
            } => ExError::new(ExErrorKind::ModuleConflict)
                .with_entity(house_name)
                .with_path(house_path)
                .with_message(message),

            HouseError::InvalidHouseName { name } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity(name)
                .with_message(message),

            HouseError::FetchTargetOutsideCache { path, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_path(path)
                    .with_message(message)
            }

            HouseError::PathNotFound { path } => ExError::new(ExErrorKind::PathNotFound)
                .with_path(path)
                .with_message(message),

            HouseError::PartNotFound { name, .. } => ExError::new(ExErrorKind::PartNotFound)
                .with_entity(name)
                .with_message(message),

            HouseError::PartNameInvalid { name } => ExError::new(ExErrorKind::PartNameInvalid)
                .with_entity(name)
                .with_message(message),

            HouseError::PartConstruction { name, .. } => {
                ExError::new(ExErrorKind::PartConstruction)
                    .with_entity(name)
                    .with_message(message)
            }

            HouseError::FetchFailed { url, .. } => ExError::new(ExErrorKind::FetchFailed)
                .with_entity(url)
                .with_message(message),

            HouseError::RemovalFailed { path } => ExError::new(ExErrorKind::RemovalFailed)
                .with_path(path)
                .with_message(message),

            HouseError::Io { operation, .. } => ExError::new(ExErrorKind::Io)
                .with_op(operation)
                .with_message(message),

            HouseError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            HouseError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}

impl From<serde_json::Error> for HouseError {
    fn from(err: serde_json::Error) -> Self {
        HouseError::Serialization {
            message: err.to_string(),
        }
    }
}
