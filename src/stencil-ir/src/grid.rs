// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::compiler::{Lowering, LoweringOptions};
use crate::config_err;
use crate::datamodel;
use crate::dimensions::{Dimension, Thickness};
use crate::function::{Function, FunctionKind};
use crate::subdomain::SubDomain;

/// The resolved, validated form of a [`datamodel::Grid`].
#[derive(Clone, Debug, Default)]
pub struct Grid {
    dimensions: BTreeMap<String, Dimension>,
    functions: BTreeMap<String, Function>,
    subdomains: BTreeMap<String, SubDomain>,
    options: LoweringOptions,
}

impl Grid {
    pub fn from_json(json: &str) -> Result<Grid> {
        Grid::from_datamodel(&datamodel::Grid::from_json(json)?)
    }

    pub fn from_datamodel(grid: &datamodel::Grid) -> Result<Grid> {
        let mut dimensions = resolve_dimensions(&grid.dimensions)?;

        let mut functions = BTreeMap::new();
        for decl in grid.functions.iter() {
            if functions.contains_key(&decl.name) {
                return config_err!(DuplicateFunction, decl.name.clone());
            }
            let function = resolve_function(decl, &dimensions)?;
            functions.insert(decl.name.clone(), function);
        }

        let mut subdomains = BTreeMap::new();
        for decl in grid.subdomains.iter() {
            if subdomains.contains_key(&decl.name) {
                return config_err!(BadSubDomain, format!("duplicate subdomain {}", decl.name));
            }
            let subdomain = resolve_subdomain(decl, &dimensions)?;
            // sub-Dimensions become addressable by name like any other
            for sub in subdomain.dimension_map().values() {
                if dimensions.contains_key(sub.name()) {
                    return config_err!(DuplicateDimension, sub.name().to_owned());
                }
                dimensions.insert(sub.name().to_owned(), sub.clone());
            }
            subdomains.insert(decl.name.clone(), subdomain);
        }

        debug!(
            dimensions = dimensions.len(),
            functions = functions.len(),
            subdomains = subdomains.len(),
            "resolved grid"
        );

        Ok(Grid {
            dimensions,
            functions,
            subdomains,
            options: grid.lowering.clone(),
        })
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn subdomain(&self, name: &str) -> Option<&SubDomain> {
        self.subdomains.get(name)
    }

    /// Like [`Grid::dimension`], for names the caller expects to exist.
    pub fn get_dimension(&self, name: &str) -> Result<&Dimension> {
        self.dimensions.get(name).ok_or_else(|| {
            Error::new(
                ErrorKind::Config,
                ErrorCode::UnknownDimension,
                Some(name.to_owned()),
            )
        })
    }

    pub fn get_function(&self, name: &str) -> Result<&Function> {
        self.functions.get(name).ok_or_else(|| {
            Error::new(
                ErrorKind::Config,
                ErrorCode::UnknownFunction,
                Some(name.to_owned()),
            )
        })
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn options(&self) -> &LoweringOptions {
        &self.options
    }

    /// A lowering pass configured with this grid's options.
    pub fn lowering(&self) -> Lowering {
        Lowering::new().with_options(self.options.clone())
    }
}

/// Resolve every declared Dimension, parents first, independent of the
/// order they were declared in.
fn resolve_dimensions(decls: &[datamodel::Dimension]) -> Result<BTreeMap<String, Dimension>> {
    let mut all_decls: HashMap<&str, &datamodel::Dimension> = HashMap::new();
    for decl in decls.iter() {
        if all_decls.insert(decl.name.as_str(), decl).is_some() {
            return config_err!(DuplicateDimension, decl.name.clone());
        }
    }

    fn resolve_inner(
        name: &str,
        all_decls: &HashMap<&str, &datamodel::Dimension>,
        processing: &mut BTreeSet<String>,
        resolved: &mut BTreeMap<String, Dimension>,
    ) -> Result<Dimension> {
        if let Some(dim) = resolved.get(name) {
            return Ok(dim.clone());
        }
        let Some(decl) = all_decls.get(name) else {
            return config_err!(UnknownDimension, name.to_owned());
        };

        processing.insert(name.to_owned());

        let parent = match decl.parent.as_deref() {
            Some(parent) => {
                if processing.contains(parent) {
                    return config_err!(
                        DimensionParentCycle,
                        format!("{name} -> {parent}")
                    );
                }
                Some(resolve_inner(parent, all_decls, processing, resolved)?)
            }
            None => None,
        };

        use crate::datamodel::DimensionKind as Kind;
        let dim = match (&decl.kind, parent) {
            (Kind::Basic, None) => Dimension::new(name),
            (Kind::Space, None) => Dimension::space(name),
            (Kind::Time, None) => Dimension::time(name),
            (Kind::Stepping, Some(parent)) => Dimension::stepping(name, &parent),
            (Kind::Conditional { factor }, Some(parent)) => {
                Dimension::conditional(name, &parent, *factor)
            }
            (Kind::Stepping | Kind::Conditional { .. }, None) => {
                return config_err!(MissingParent, name.to_owned());
            }
            (_, Some(_)) => {
                return config_err!(UnexpectedParent, name.to_owned());
            }
        };

        processing.remove(name);
        resolved.insert(name.to_owned(), dim.clone());

        Ok(dim)
    }

    let mut processing = BTreeSet::new();
    let mut resolved = BTreeMap::new();
    for decl in decls.iter() {
        resolve_inner(&decl.name, &all_decls, &mut processing, &mut resolved)?;
    }

    Ok(resolved)
}

fn lookup(dimensions: &BTreeMap<String, Dimension>, name: &str) -> Result<Dimension> {
    match dimensions.get(name) {
        Some(dim) => Ok(dim.clone()),
        None => config_err!(UnknownDimension, name.to_owned()),
    }
}

fn resolve_function(
    decl: &datamodel::Function,
    dimensions: &BTreeMap<String, Dimension>,
) -> Result<Function> {
    let dims = decl
        .dimensions
        .iter()
        .map(|name| lookup(dimensions, name))
        .collect::<Result<Vec<_>>>()?;

    let kind = match decl.kind {
        datamodel::FunctionKind::Function => FunctionKind::Function,
        datamodel::FunctionKind::TimeFunction => FunctionKind::TimeFunction,
        datamodel::FunctionKind::Array => FunctionKind::Array,
    };

    Function::build(&decl.name, kind, dims, pairs(&decl.halo), pairs(&decl.padding))
}

fn pairs(extents: &[[u32; 2]]) -> Vec<(u32, u32)> {
    extents.iter().map(|[left, right]| (*left, *right)).collect()
}

fn resolve_subdomain(
    decl: &datamodel::SubDomain,
    dimensions: &BTreeMap<String, Dimension>,
) -> Result<SubDomain> {
    let mut restrictions: Vec<(Dimension, Thickness)> = Vec::with_capacity(decl.dimensions.len());
    for restriction in decl.dimensions.iter() {
        let dim = lookup(dimensions, &restriction.name)?;
        if restrictions.iter().any(|(d, _)| *d == dim) {
            return config_err!(
                BadSubDomain,
                format!("{} restricts {} twice", decl.name, restriction.name)
            );
        }
        let thickness = match restriction.thickness {
            datamodel::Thickness::Middle { left, right } => Thickness::Middle(left, right),
            datamodel::Thickness::Left(n) => Thickness::Left(n),
            datamodel::Thickness::Right(n) => Thickness::Right(n),
        };
        restrictions.push((dim, thickness));
    }

    Ok(SubDomain::new(&decl.name, &restrictions))
}
