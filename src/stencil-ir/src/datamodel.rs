// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Serializable description of a computational grid: its Dimensions,
//! Functions and SubDomains, plus the lowering options.  Names refer to
//! each other by string here; [`crate::grid::Grid`] resolves them into the
//! shared runtime objects.
//!
//! ```
//! use stencil_ir::datamodel;
//!
//! let json = r#"{
//!     "dimensions": [{"name": "x", "kind": "space"}],
//!     "functions": [{"name": "f", "dimensions": ["x"], "halo": [[4, 4]]}]
//! }"#;
//! let grid = datamodel::Grid::from_json(json)?;
//! assert_eq!(1, grid.functions.len());
//! # Ok::<(), stencil_ir::common::Error>(())
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::compiler::LoweringOptions;
use crate::config_err;

fn is_empty_vec<T>(val: &[T]) -> bool {
    val.is_empty()
}

fn is_default<T: Default + PartialEq>(val: &T) -> bool {
    *val == T::default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    #[default]
    Basic,
    Space,
    Time,
    Stepping,
    Conditional {
        factor: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Dimension {
    pub name: String,
    #[serde(skip_serializing_if = "is_default", default)]
    pub kind: DimensionKind,
    /// required for `stepping` and `conditional`, rejected otherwise
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Function,
    TimeFunction,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Function {
    pub name: String,
    #[serde(skip_serializing_if = "is_default", default)]
    pub kind: FunctionKind,
    pub dimensions: Vec<String>,
    /// `[left, right]` per axis; empty means no halo
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub halo: Vec<[u32; 2]>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub padding: Vec<[u32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Thickness {
    Middle { left: u32, right: u32 },
    Left(u32),
    Right(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubDomainDimension {
    pub name: String,
    pub thickness: Thickness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubDomain {
    pub name: String,
    pub dimensions: Vec<SubDomainDimension>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Grid {
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub dimensions: Vec<Dimension>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub functions: Vec<Function>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub subdomains: Vec<SubDomain>,
    #[serde(skip_serializing_if = "is_default", default)]
    pub lowering: LoweringOptions,
}

impl Grid {
    pub fn from_json(json: &str) -> Result<Grid> {
        match serde_json::from_str(json) {
            Ok(grid) => Ok(grid),
            Err(err) => config_err!(JsonDeserialization, err.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        match serde_json::to_string_pretty(self) {
            Ok(json) => Ok(json),
            Err(err) => config_err!(Generic, err.to_string()),
        }
    }
}

/// Generate the JSON Schema for grid descriptions
#[cfg(feature = "schema")]
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Grid)
}
