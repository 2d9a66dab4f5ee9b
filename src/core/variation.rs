//! Variation specs - the generation requests a run exercises.
//!
//! A variation is one concrete parameterization of a generator. Component
//! variations cover the full boolean option matrix plus a few path-only
//! cases; slice variations are a short curated list since path variety
//! matters more there than boolean coverage.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::errors::HarnessError;

/// Name prefix for generated test components.
pub const COMPONENT_NAME_BASE: &str = "GeneratorTestingComponent";

/// Name prefix for generated test slices.
pub const SLICE_NAME_BASE: &str = "generatorTestingSlice";

/// Component option names, in matrix axis order.
pub const COMPONENT_AXES: [&str; 5] = [
    "wantLoadable",
    "wantMemo",
    "wantStyledComponents",
    "wantTests",
    "wantTranslations",
];

/// Paths exercised on top of the boolean matrix.
pub const COMPONENT_PATHS: [&str; 3] = [
    "/components",
    "/pages/HomePage/Features",
    "/pages/HomePage/Features/GithubRepoForm",
];

/// Which template family a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Component,
    Slice,
}

impl GeneratorKind {
    /// All kinds, in the order a run processes them.
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::Component, GeneratorKind::Slice];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Component => "component",
            GeneratorKind::Slice => "slice",
        }
    }

    /// Key the generator expects the target name under.
    pub fn name_key(&self) -> &'static str {
        match self {
            GeneratorKind::Component => "componentName",
            GeneratorKind::Slice => "sliceName",
        }
    }

    /// The curated variation set for this kind.
    pub fn variations(&self) -> Vec<VariationSpec> {
        match self {
            GeneratorKind::Component => component_variations(),
            GeneratorKind::Slice => slice_variations(),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "component" | "components" => Ok(GeneratorKind::Component),
            "slice" | "slices" => Ok(GeneratorKind::Slice),
            _ => Err(format!(
                "invalid generator kind '{}'; expected 'component' or 'slice'",
                s
            )),
        }
    }
}

/// One generation request.
///
/// Identity is the `(path, name)` pair. Options keep their insertion order
/// so listings and generator input are reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationSpec {
    kind: GeneratorKind,
    name: String,
    path: String,
    options: Vec<(String, bool)>,
}

impl VariationSpec {
    /// Create a spec with no options set.
    pub fn new(kind: GeneratorKind, name: impl Into<String>, path: impl Into<String>) -> Self {
        VariationSpec {
            kind,
            name: name.into(),
            path: path.into(),
            options: Vec::new(),
        }
    }

    /// Set a boolean option, replacing any earlier value.
    pub fn with_option(mut self, key: impl Into<String>, value: bool) -> Self {
        let key = key.into();
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.options.push((key, value)),
        }
        self
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output path relative to the generator base, e.g. `/pages/HomePage`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &[(String, bool)] {
        &self.options
    }

    /// Look up an option value.
    pub fn option(&self, key: &str) -> Option<bool> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// The identity pair used to detect collisions.
    pub fn identity(&self) -> (&str, &str) {
        (&self.path, &self.name)
    }

    /// Render the configuration object handed to the generator.
    pub fn to_generator_input(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.kind.name_key().to_string(), Value::from(self.name.clone()));
        map.insert("path".to_string(), Value::from(self.path.clone()));
        for (key, value) in &self.options {
            map.insert(key.clone(), Value::Bool(*value));
        }
        Value::Object(map)
    }
}

impl fmt::Display for VariationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.path)
        }
    }
}

/// Enumerate every boolean vector of the given length.
///
/// Vector `i` is the big-endian binary representation of `i`: the first
/// element holds bit `length - 1`, the last holds bit `0`.
pub fn permutate_booleans(length: usize) -> Vec<Vec<bool>> {
    (0..1usize << length)
        .map(|i| (0..length).rev().map(|bit| i & (1 << bit) != 0).collect())
        .collect()
}

/// Expand boolean axes into one spec per element of their cartesian product.
///
/// `name_for` receives the index of the combination and returns the spec name.
pub fn expand(
    kind: GeneratorKind,
    axes: &[&str],
    path: &str,
    name_for: impl Fn(usize) -> String,
) -> Vec<VariationSpec> {
    permutate_booleans(axes.len())
        .into_iter()
        .enumerate()
        .map(|(i, values)| {
            axes.iter()
                .zip(values)
                .fold(VariationSpec::new(kind, name_for(i), path), |spec, (axis, value)| {
                    spec.with_option(*axis, value)
                })
        })
        .collect()
}

/// All component generation requests for one run.
pub fn component_variations() -> Vec<VariationSpec> {
    let mut variations = expand(GeneratorKind::Component, &COMPONENT_AXES, "", |i| {
        format!("{}{}", COMPONENT_NAME_BASE, i)
    });

    for (i, path) in COMPONENT_PATHS.iter().enumerate() {
        let spec = COMPONENT_AXES.iter().fold(
            VariationSpec::new(
                GeneratorKind::Component,
                format!("{}{}", COMPONENT_NAME_BASE, i),
                *path,
            ),
            |spec, axis| spec.with_option(*axis, true),
        );
        variations.push(spec);
    }

    variations
}

/// All slice generation requests for one run.
pub fn slice_variations() -> Vec<VariationSpec> {
    let slice = |n: usize, path: &str, saga: bool| {
        VariationSpec::new(GeneratorKind::Slice, format!("{}{}", SLICE_NAME_BASE, n), path)
            .with_option("wantSaga", saga)
    };

    vec![
        slice(1, "", true),
        slice(2, "/pages/HomePage", false),
        slice(3, "/pages/HomePage/Features", true),
    ]
}

/// Ensure no two specs share a `(path, name)` pair.
pub fn check_unique(specs: &[VariationSpec]) -> Result<(), HarnessError> {
    let mut seen = HashSet::new();
    for spec in specs {
        if !seen.insert(spec.identity()) {
            return Err(HarnessError::DuplicateVariation {
                kind: spec.kind(),
                name: spec.name().to_string(),
                path: spec.path().to_string(),
            });
        }
    }
    Ok(())
}
