use crate::error::SchemaError;

pub type SchemaResult<T> = Result<T, SchemaError>;
