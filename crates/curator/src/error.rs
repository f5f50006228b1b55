pub type CuratorResult<T> = Result<T, CuratorError>;

macro_rules! bail {
    ($($arg:tt)*) => {{
        return Err($crate::error::CuratorError::Other(format!($($arg)*)));
    }};
}

pub(crate) use bail;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CuratorError {
    #[error("invalid incident id '{0}'")]
    InvalidId(String),

    #[error("ambiguous join: {count} rows of '{table}' refer to id '{key}'")]
    AmbiguousJoin {
        table: String,
        key: String,
        count: usize,
    },

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("{0}")]
    Other(String),
}

impl CuratorError {
    #[inline]
    pub fn other<T: ToString>(s: T) -> Self {
        Self::Other(s.to_string())
    }
}
