//! graphql_typegen library - GraphQL type generation from ORM entity metadata
//!
//! Maps entity fields and associations to GraphQL type tokens and writes one
//! object type declaration per entity as YAML, asking the operator before
//! generating each entity and before replacing existing files.

pub mod cli;
pub mod commands;
pub mod config;
pub mod generator;
pub mod mapper;
pub mod metadata;
pub mod output;
pub mod prompt;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
