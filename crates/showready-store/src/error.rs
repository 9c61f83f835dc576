use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    NotFound { resource: &'static str, id: String },
    EmptyPatch,
    Constraint(String),
    Sqlite(rusqlite::Error),
}

impl StoreError {
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{resource} with identifier '{id}' not found")
            }
            Self::EmptyPatch => write!(f, "no fields to update"),
            Self::Constraint(msg) => write!(f, "constraint violated: {msg}"),
            Self::Sqlite(e) => write!(f, "storage failure: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &e {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                return Self::Constraint(
                    message
                        .clone()
                        .unwrap_or_else(|| "unique or foreign key constraint".to_string()),
                );
            }
        }
        Self::Sqlite(e)
    }
}
