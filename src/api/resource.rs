use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Display};

use crate::cache::EntityTag;
use crate::models::SearchCriteria;

/// A REST collection served under `PATH` with the usual CRUD + search routes:
///
/// - `GET {PATH}` / `GET {PATH}/{id}`
/// - `PUT {PATH}/{id}` / `DELETE {PATH}/{id}`
/// - `POST {PATH}/Search`
pub trait Resource: Send + Sync + 'static {
  const PATH: &'static str;
  /// Cache namespace invalidated when this collection is mutated.
  const TAG: EntityTag;
  /// Singular, lowercase name used in user-facing messages.
  const NAME: &'static str;

  type Id: Display + Debug + Clone + Send + Sync + 'static;
  type Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static;
  type Update: Serialize + Send + Sync + 'static;
  type Search: SearchCriteria;
}

/// Resources that accept `POST {PATH}`.
pub trait Creatable: Resource {
  type Create: Serialize + Send + Sync + 'static;
}
