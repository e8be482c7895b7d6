use crate::error::CheckitError;

pub type CheckitResult<T> = Result<T, CheckitError>;
