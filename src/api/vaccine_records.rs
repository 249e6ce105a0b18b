use crate::cache::EntityTag;
use crate::models::{VaccineRecord, VaccineRecordCreate, VaccineRecordSearch, VaccineRecordUpdate};

use super::resource::{Creatable, Resource};

pub struct VaccineRecords;

impl Resource for VaccineRecords {
  const PATH: &'static str = "/VaccineRecords";
  const TAG: EntityTag = EntityTag::VaccineRecords;
  const NAME: &'static str = "vaccine record";

  type Id = i64;
  type Entity = VaccineRecord;
  type Update = VaccineRecordUpdate;
  type Search = VaccineRecordSearch;
}

impl Creatable for VaccineRecords {
  type Create = VaccineRecordCreate;
}
