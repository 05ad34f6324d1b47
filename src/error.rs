use crate::types::TypeKey;

pub type MenuResult<T> = Result<T, MenuError>;

#[derive(thiserror::Error, Debug)]
pub enum MenuError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("type {0} is not declared in the catalog")]
    UndeclaredType(TypeKey),
    #[error("type {0} is declared more than once")]
    DuplicateType(TypeKey),
    #[error("type {ty} names undeclared parent {parent}")]
    UnknownParent { ty: TypeKey, parent: TypeKey },
    #[error("capability {0} requires a default instance but none is registered")]
    MissingDefault(TypeKey),
    #[error("capability {capability} has no instance with id {id:?}")]
    UnknownStrategy { capability: TypeKey, id: String },
    #[error("contributor {contributor} failed: {message}")]
    Contributor {
        contributor: String,
        message: String,
    },
}

impl From<std::io::Error> for MenuError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl MenuError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn contributor(contributor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Contributor {
            contributor: contributor.into(),
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UndeclaredType(_)
                | Self::DuplicateType(_)
                | Self::UnknownParent { .. }
                | Self::MissingDefault(_)
                | Self::UnknownStrategy { .. }
        )
    }
}
