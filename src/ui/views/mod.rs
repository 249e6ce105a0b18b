mod codes;
pub mod detail;
pub mod forms;
pub mod list;
mod login;
mod owners;
mod pets;
mod register;
mod vaccine_records;
mod vaccine_stocks;
mod vaccines;
mod veterinarians;

pub use codes::CodeList;
pub use login::LoginView;
pub use owners::OwnerList;
pub use pets::PetList;
pub use vaccine_records::VaccineRecordList;
pub use vaccine_stocks::VaccineStockList;
pub use vaccines::VaccineList;
pub use veterinarians::VeterinarianList;

use crate::api::CachedClient;
use crate::ui::view::View;
use list::ListView;

/// The view a `:` command opens at the root of the stack.
pub fn root_view(command: &str, client: &CachedClient) -> Option<Box<dyn View>> {
  let view: Box<dyn View> = match command {
    "owners" => Box::new(ListView::<OwnerList>::new(client)),
    "pets" => Box::new(ListView::<PetList>::new(client)),
    "vaccines" => Box::new(ListView::<VaccineList>::new(client)),
    "stocks" => Box::new(ListView::<VaccineStockList>::new(client)),
    "records" => Box::new(ListView::<VaccineRecordList>::new(client)),
    "codes" => Box::new(ListView::<CodeList>::new(client)),
    "vets" => Box::new(ListView::<VeterinarianList>::new(client)),
    _ => return None,
  };
  Some(view)
}

/// Root view after signing in
pub fn home(client: &CachedClient) -> Box<dyn View> {
  Box::new(ListView::<OwnerList>::new(client))
}
