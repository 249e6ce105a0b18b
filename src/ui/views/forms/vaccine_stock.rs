use super::{lookup, sync_choices, FormSpec};
use crate::api::{ApiError, CachedClient, VaccineStocks, Vaccines};
use crate::models::{
  date_part, parse_id, Vaccine, VaccineStock, VaccineStockCreate, VaccineStockUpdate,
};
use crate::query::Query;
use crate::ui::components::{Choice, Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

pub struct VaccineStockForm {
  vaccines: Query<Vec<Vaccine>>,
}

impl FormSpec for VaccineStockForm {
  type R = VaccineStocks;

  fn fields() -> Vec<Field> {
    vec![
      Field::select("vaccineId", "Vaccine", "Select vaccine")
        .rules(vec![Rule::Required("Vaccine is required")]),
      Field::text("serialId", "Serial ID").max_len(255).rules(vec![
        Rule::Required("Serial ID is required"),
        Rule::MinLen(3, "Minimum 3 characters"),
        Rule::MaxLen(255, "Maximum 255 characters"),
      ]),
      Field::text("quantity", "Quantity").rules(vec![
        Rule::Required("Quantity is required"),
        Rule::Digits {
          min: 1,
          max: 9,
          message: "Quantity must be a whole number",
        },
        Rule::MinNumber(1.0, "Minimum quantity is 1"),
      ]),
      Field::text("unitPrice", "Unit price").rules(vec![
        Rule::Required("Unit price is required"),
        Rule::MinNumber(0.01, "Minimum price is 0.01"),
      ]),
      Field::text("stockDate", "Stock date (YYYY-MM-DD)")
        .max_len(10)
        .rules(vec![
          Rule::Required("Stock date is required"),
          Rule::Date("Use YYYY-MM-DD"),
        ]),
      Field::text("expirationDate", "Expires (YYYY-MM-DD)")
        .max_len(10)
        .rules(vec![
          Rule::Required("Expiration date is required"),
          Rule::Date("Use YYYY-MM-DD"),
        ]),
    ]
  }

  fn open(client: &CachedClient) -> Self {
    let client = client.clone();
    Self {
      vaccines: lookup(move || {
        let client = client.clone();
        async move { client.list::<Vaccines>(None).await.map_err(|e| e.user_message()) }
      }),
    }
  }

  fn fill(&mut self, form: &mut Form, stock: &VaccineStock) {
    form.set_value("vaccineId", &stock.vaccine_id.to_string());
    form.set_value("serialId", &stock.serial_id);
    form.set_value("quantity", &stock.quantity.to_string());
    form.set_value("unitPrice", &stock.unit_price.to_string());
    form.set_value("stockDate", date_part(&stock.stock_date));
    form.set_value("expirationDate", date_part(&stock.expiration_date));
  }

  fn tick(&mut self, form: &mut Form) {
    sync_choices(&mut self.vaccines, form, "vaccineId", |v| {
      Choice::new(v.id, format!("{} ({})", v.name, v.manufacturer))
    });
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&VaccineStock>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let vaccine_id = parse_id(form.value("vaccineId")).unwrap_or_default();
    let serial_id = form.value("serialId").trim().to_string();
    let quantity = form.value("quantity").trim().parse().unwrap_or_default();
    let unit_price = form.value("unitPrice").trim().parse().unwrap_or_default();
    let stock_date = form.value("stockDate").trim().to_string();
    let expiration_date = form.value("expirationDate").trim().to_string();

    match editing {
      None => {
        let payload = VaccineStockCreate {
          vaccine_id,
          stock_date,
          serial_id,
          quantity,
          unit_price,
          expiration_date,
        };
        async move { client.create::<VaccineStocks>(&payload).await.map(drop) }.boxed()
      }
      Some(stock) => {
        let id = stock.id;
        let payload = VaccineStockUpdate {
          vaccine_id,
          stock_date,
          serial_id,
          quantity,
          unit_price,
          expiration_date,
          version: stock.version,
        };
        async move { client.update::<VaccineStocks>(&id, &payload).await.map(drop) }.boxed()
      }
    }
  }
}
