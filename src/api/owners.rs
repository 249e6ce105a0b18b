use crate::cache::EntityTag;
use crate::models::{Owner, OwnerCreate, OwnerSearch, OwnerUpdate};

use super::resource::{Creatable, Resource};

pub struct Owners;

impl Resource for Owners {
  const PATH: &'static str = "/Owners";
  const TAG: EntityTag = EntityTag::Owners;
  const NAME: &'static str = "owner";

  type Id = i64;
  type Entity = Owner;
  type Update = OwnerUpdate;
  type Search = OwnerSearch;
}

impl Creatable for Owners {
  type Create = OwnerCreate;
}
