use crate::cache::EntityTag;
use crate::models::{VaccineStock, VaccineStockCreate, VaccineStockSearch, VaccineStockUpdate};

use super::resource::{Creatable, Resource};

pub struct VaccineStocks;

impl Resource for VaccineStocks {
  const PATH: &'static str = "/VaccineStocks";
  const TAG: EntityTag = EntityTag::VaccineStocks;
  const NAME: &'static str = "vaccine stock";

  type Id = i64;
  type Entity = VaccineStock;
  type Update = VaccineStockUpdate;
  type Search = VaccineStockSearch;
}

impl Creatable for VaccineStocks {
  type Create = VaccineStockCreate;
}
