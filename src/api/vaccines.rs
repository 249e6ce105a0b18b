use crate::cache::EntityTag;
use crate::models::{Vaccine, VaccineCreate, VaccineSearch, VaccineUpdate};

use super::resource::{Creatable, Resource};

pub struct Vaccines;

impl Resource for Vaccines {
  const PATH: &'static str = "/Vaccines";
  const TAG: EntityTag = EntityTag::Vaccines;
  const NAME: &'static str = "vaccine";

  type Id = i64;
  type Entity = Vaccine;
  type Update = VaccineUpdate;
  type Search = VaccineSearch;
}

impl Creatable for Vaccines {
  type Create = VaccineCreate;
}
