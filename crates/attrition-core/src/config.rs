//! Engine configuration: threshold fraction, unit alias table, and the
//! two-way group partition.
//!
//! [`EngineConfig`] deserializes from JSON with a default for every field, so
//! an empty object `{}` is a complete configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OTHERS_NAME, DEFAULT_PARTITION_NAME, DEFAULT_TARGET_FRACTION};
use crate::error::{AttritionError, ConfigError, InputError};
use crate::normalize::{canonical_unit, collapse_identifier};

/// Maps alias spellings of unit identifiers to one canonical token.
///
/// Both sides are stored collapsed and uppercased, so lookups ignore case and
/// spacing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct AliasTable {
    lookup: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as a spelling of `canonical`.
    ///
    /// Fails if the alias is already registered for a different canonical
    /// token, or if the insert would make a chain: a token may be an alias or
    /// a canonical, never both. Lookups are therefore a single step, and
    /// [`canonical_unit`] gives the same answer when applied again.
    /// Registering an alias that equals its canonical form is a no-op.
    pub fn insert(&mut self, canonical: &str, alias: &str) -> Result<(), ConfigError> {
        let canonical = collapse_identifier(canonical);
        let alias = collapse_identifier(alias);
        if alias.is_empty() || alias == canonical {
            return Ok(());
        }
        if self.lookup.contains_key(&canonical) {
            return Err(ConfigError::AliasChain(canonical));
        }
        if self.lookup.values().any(|existing| *existing == alias) {
            return Err(ConfigError::AliasChain(alias));
        }
        match self.lookup.get(&alias) {
            Some(existing) if *existing != canonical => Err(ConfigError::ConflictingAlias {
                alias,
                first: existing.clone(),
                second: canonical,
            }),
            Some(_) => Ok(()),
            None => {
                self.lookup.insert(alias, canonical);
                Ok(())
            }
        }
    }

    /// Builder form of [`AliasTable::insert`] for a batch of aliases.
    pub fn with_aliases<I, S>(mut self, canonical: &str, aliases: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for alias in aliases {
            self.insert(canonical, alias.as_ref())?;
        }
        Ok(self)
    }

    /// Canonical token for an already collapsed identifier, if it is an alias.
    pub fn resolve(&self, collapsed: &str) -> Option<&str> {
        self.lookup.get(collapsed).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for AliasTable {
    type Error = ConfigError;

    fn try_from(groups: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        groups
            .iter()
            .try_fold(AliasTable::new(), |table, (canonical, aliases)| {
                table.with_aliases(canonical, aliases)
            })
    }
}

impl From<AliasTable> for BTreeMap<String, Vec<String>> {
    fn from(table: AliasTable) -> Self {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (alias, canonical) in table.lookup {
            groups.entry(canonical).or_default().push(alias);
        }
        groups
    }
}

/// The fixed two-way split used for group summaries: a named subset of
/// units, and everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupPartition {
    pub name: String,
    pub members: Vec<String>,
    pub others_name: String,
}

impl Default for GroupPartition {
    fn default() -> Self {
        Self {
            name: DEFAULT_PARTITION_NAME.to_string(),
            members: Vec::new(),
            others_name: DEFAULT_OTHERS_NAME.to_string(),
        }
    }
}

impl GroupPartition {
    /// Member identifiers folded through the same canonicalization as rows.
    pub fn canonical_members(&self, aliases: &AliasTable) -> BTreeSet<String> {
        self.members
            .iter()
            .map(|m| canonical_unit(m, aliases))
            .collect()
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fraction of on-hand strength used as the day-to-threshold target.
    pub target_fraction: f64,
    pub aliases: AliasTable,
    pub partition: GroupPartition,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fraction: DEFAULT_TARGET_FRACTION,
            aliases: AliasTable::default(),
            partition: GroupPartition::default(),
        }
    }
}

impl EngineConfig {
    /// Check the parts the engine cannot normalize on its own.
    ///
    /// Out-of-range fractions are legal (the projector has a branch for
    /// each side); only NaN and infinities are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_fraction.is_finite() {
            return Err(ConfigError::NonFiniteTargetFraction(self.target_fraction));
        }
        let name = self.partition.name.trim();
        let others = self.partition.others_name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyGroupName("partition"));
        }
        if others.is_empty() {
            return Err(ConfigError::EmptyGroupName("others"));
        }
        if name == others {
            return Err(ConfigError::DuplicateGroupName(name.to_string()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(document: &str) -> Result<Self, AttritionError> {
        let config: EngineConfig =
            serde_json::from_str(document).map_err(|e| InputError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
