//! Cache keys: an entity tag plus the scope of the read.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Cache namespace of one entity type. Invalidation works per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
  Owners,
  Pets,
  Vaccines,
  VaccineStocks,
  VaccineRecords,
  Codes,
  Veterinarians,
  SpeciesOptions,
  Breeds,
}

impl EntityTag {
  pub fn as_str(self) -> &'static str {
    match self {
      EntityTag::Owners => "owners",
      EntityTag::Pets => "pets",
      EntityTag::Vaccines => "vaccines",
      EntityTag::VaccineStocks => "vaccine_stocks",
      EntityTag::VaccineRecords => "vaccine_records",
      EntityTag::Codes => "codes",
      EntityTag::Veterinarians => "veterinarians",
      EntityTag::SpeciesOptions => "species_options",
      EntityTag::Breeds => "breeds",
    }
  }

  /// Tags whose cached entries are derived from, or embed, this one.
  pub fn dependents(self) -> &'static [EntityTag] {
    match self {
      EntityTag::Codes => &[EntityTag::SpeciesOptions, EntityTag::Breeds, EntityTag::Pets],
      EntityTag::Owners => &[EntityTag::Pets, EntityTag::VaccineRecords],
      EntityTag::Pets => &[EntityTag::VaccineRecords],
      EntityTag::Vaccines => &[EntityTag::VaccineStocks, EntityTag::VaccineRecords],
      EntityTag::VaccineStocks | EntityTag::Veterinarians => &[EntityTag::VaccineRecords],
      _ => &[],
    }
  }

  /// This tag followed by its dependents.
  pub fn with_dependents(self) -> impl Iterator<Item = EntityTag> {
    std::iter::once(self).chain(self.dependents().iter().copied())
  }
}

/// What part of a tag's data a read covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryScope {
  All,
  /// Serialized search criteria
  Search(String),
  One(String),
  /// Lookup keyed by a parameter, e.g. the breeds of a species
  Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
  pub tag: EntityTag,
  pub scope: QueryScope,
}

impl QueryKey {
  pub fn all(tag: EntityTag) -> Self {
    Self {
      tag,
      scope: QueryScope::All,
    }
  }

  pub fn search<S: Serialize>(tag: EntityTag, criteria: &S) -> Self {
    Self {
      tag,
      scope: QueryScope::Search(serde_json::to_string(criteria).unwrap_or_default()),
    }
  }

  pub fn one(tag: EntityTag, id: impl ToString) -> Self {
    Self {
      tag,
      scope: QueryScope::One(id.to_string()),
    }
  }

  pub fn param(tag: EntityTag, param: impl ToString) -> Self {
    Self {
      tag,
      scope: QueryScope::Param(param.to_string()),
    }
  }

  /// SHA-256 hex of the key, used as the storage key.
  pub fn cache_hash(&self) -> String {
    let input = match &self.scope {
      QueryScope::All => format!("{}:all", self.tag.as_str()),
      QueryScope::Search(criteria) => format!("{}:search:{}", self.tag.as_str(), criteria),
      QueryScope::One(id) => format!("{}:one:{}", self.tag.as_str(), id),
      QueryScope::Param(p) => format!("{}:param:{}", self.tag.as_str(), p),
    };

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
  }

  pub fn description(&self) -> String {
    match &self.scope {
      QueryScope::All => format!("all {}", self.tag.as_str()),
      QueryScope::Search(criteria) => format!("{} matching {}", self.tag.as_str(), criteria),
      QueryScope::One(id) => format!("{} #{}", self.tag.as_str(), id),
      QueryScope::Param(p) => format!("{} for {}", self.tag.as_str(), p),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::OwnerSearch;

  #[test]
  fn test_hash_is_stable_hex() {
    let key = QueryKey::all(EntityTag::Owners);
    assert_eq!(key.cache_hash(), QueryKey::all(EntityTag::Owners).cache_hash());
    assert_eq!(key.cache_hash().len(), 64);
  }

  #[test]
  fn test_scopes_hash_differently() {
    let criteria = OwnerSearch {
      first_name: Some("Ali".to_string()),
      ..Default::default()
    };
    let all = QueryKey::all(EntityTag::Owners).cache_hash();
    let search = QueryKey::search(EntityTag::Owners, &criteria).cache_hash();
    let pets = QueryKey::all(EntityTag::Pets).cache_hash();
    assert_ne!(all, search);
    assert_ne!(all, pets);
  }

  #[test]
  fn test_codes_cover_lookup_tags() {
    let tags: Vec<_> = EntityTag::Codes.with_dependents().collect();
    assert!(tags.contains(&EntityTag::Codes));
    assert!(tags.contains(&EntityTag::SpeciesOptions));
    assert!(tags.contains(&EntityTag::Breeds));
  }
}
