//! Geometry policies: which geometries may be generated.

use std::collections::HashSet;

use crate::config::PolicyConfig;
use crate::error::ConfigError;
use crate::geometry::Geometry;

/// Decides whether a canonical geometry string may be generated.
///
/// Consulted before any filesystem or codec work.
pub trait GeometryPolicy: Send + Sync {
    fn is_allowed(&self, geometry: &str) -> bool;
}

impl<F> GeometryPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_allowed(&self, geometry: &str) -> bool {
        self(geometry)
    }
}

/// Accepts every geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl GeometryPolicy for AllowAny {
    fn is_allowed(&self, _geometry: &str) -> bool {
        true
    }
}

/// Accepts geometries from a fixed set, compared in canonical form.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allow_any: bool,
    allowed: HashSet<String>,
}

impl AllowList {
    /// Build an allow-list from geometry strings.
    ///
    /// Entries are canonicalized, so `64` and `64x` are the same entry.
    pub fn new<I, S>(geometries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = geometries
            .into_iter()
            .map(|g| {
                let g = g.as_ref();
                Geometry::parse(g).map(|parsed| parsed.to_string()).map_err(|e| {
                    ConfigError::ValidationError(format!(
                        "policy.allowed_geometries entry {g:?}: {e}"
                    ))
                })
            })
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self {
            allow_any: false,
            allowed,
        })
    }

    /// Build the policy described by the `[policy]` config section.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let mut list = Self::new(&config.allowed_geometries)?;
        list.allow_any = config.allow_any;
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl GeometryPolicy for AllowList {
    fn is_allowed(&self, geometry: &str) -> bool {
        self.allow_any || self.allowed.contains(geometry)
    }
}
