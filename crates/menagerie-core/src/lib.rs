//! Menagerie Core Types and Definitions
//!
//! This crate provides the foundational types of the Menagerie model
//! assembler. It includes:
//!
//! - **Identifiers**: string-interned names ([`identifier::Id`])
//! - **Syntax**: the parsed trees handed to the assembler ([`syntax`] module)
//! - **Descriptions**: resolved model, species and experiment nodes
//!   ([`description`] and [`model`] modules)
//! - **Built-ins**: the process-wide registry of predefined descriptions
//!   ([`builtin`] module)
//! - **Types**: the species type table of an assembled model ([`types`] module)

pub mod builtin;
pub mod description;
pub mod facet;
pub mod identifier;
pub mod keyword;
pub mod model;
pub mod syntax;
pub mod types;
