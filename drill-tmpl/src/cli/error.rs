use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use tracing::subscriber::SetGlobalDefaultError;


#[derive(Debug)]
pub struct TmplError {
    pub kind: TmplErrorKind
}

impl fmt::Display for TmplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TmplError: {}", self.kind)
    }
}

impl Error for TmplError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum TmplErrorKind {
    Format { cmd: String, stderr: String },
    InvalidFormatter(String),
    IoFileRead { source: std::io::Error, path: PathBuf },
    IoFileWrite { source: std::io::Error, path: PathBuf },
    Json { source: serde_json::Error, path: PathBuf },
    MissingExtension(String),
    Process { source: std::io::Error, cmd: String },
    Render { source: minijinja::Error, path: PathBuf },
    SetGlobalDefault(SetGlobalDefaultError),
    TemplateParse { source: minijinja::Error, path: PathBuf },
}

impl fmt::Display for TmplErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format { cmd, stderr } => write!(f, "Formatter '{cmd}' failed: '{}'", stderr.trim()),
            Self::InvalidFormatter(cmd) => write!(f, "Invalid formatter command: '{cmd}'"),
            Self::IoFileRead { path, .. } => write!(f, "Failed to read file: '{path:?}'"),
            Self::IoFileWrite { path, .. } => write!(f, "Failed to write to file: '{path:?}'"),
            Self::Json { path, source } => write!(f, "Failed to parse JSON data in '{path:?}': {source}"),
            Self::MissingExtension(path) => write!(f, "template file '{path}' must have .tmpl extension"),
            Self::Process { cmd, .. } => write!(f, "Failed to run a command: '{cmd}'"),
            Self::Render { path, source } => write!(f, "Failed to render template '{path:?}': {source}"),
            Self::SetGlobalDefault(error) => write!(f, "Failed to set global default subscriber: {}", error),
            Self::TemplateParse { path, source } => write!(f, "Failed to parse template '{path:?}': {source}"),
        }
    }
}

impl Error for TmplErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::IoFileRead { source, .. } => Some(source),
			Self::IoFileWrite { source, .. } => Some(source),
			Self::Json { source, .. } => Some(source),
			Self::Process { source, .. } => Some(source),
			Self::Render { source, .. } => Some(source),
			Self::TemplateParse { source, .. } => Some(source),
			_ => None,
		}
	}
}

impl From<SetGlobalDefaultError> for TmplError {
    fn from(error: SetGlobalDefaultError) -> Self {
        TmplError { kind: TmplErrorKind::SetGlobalDefault(error) }
    }
}

impl From<TmplErrorKind> for TmplError {
    fn from(kind: TmplErrorKind) -> Self {
        TmplError { kind }
    }
}
