//! Error types for the attrition engine.
//!
//! The computation itself is total and never fails; these cover the
//! configuration and input-document edges around it.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("target fraction must be finite, got {0}")] NonFiniteTargetFraction(f64),
    #[error("group name must not be empty: {0}")] EmptyGroupName(&'static str),
    #[error("partition and others groups share the name {0}")] DuplicateGroupName(String),
    #[error("alias {alias} maps to both {first} and {second}")] ConflictingAlias { alias: String, first: String, second: String },
    #[error("{0} is used both as an alias and as a canonical unit")] AliasChain(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("malformed document: {0}")] Malformed(String),
    #[error("expected an array of rows, found {0}")] NotAnArray(&'static str),
    #[error("row {0} is not an object")] RowNotAnObject(usize),
}

#[derive(Error, Debug)]
pub enum AttritionError {
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Input(#[from] InputError),
}
