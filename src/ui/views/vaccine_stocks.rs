use crate::api::{CachedClient, VaccineStocks};
use crate::models::{date_part, non_empty, parse_id, VaccineStock, VaccineStockSearch};
use crate::ui::components::{Field, Form};
use crate::ui::view::View;
use crate::ui::views::forms::{EntityForm, VaccineStockForm};
use crate::ui::views::list::ListSpec;
use crate::validation::{parse_date, Rule};
use chrono::NaiveDate;
use ratatui::prelude::*;

const EXPIRING_SOON_DAYS: i64 = 30;

/// Shelf state of a stock lot by its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
  Expired,
  ExpiringSoon,
  Active,
}

impl Expiry {
  pub fn classify(expiration_date: &str, today: NaiveDate) -> Self {
    let Some(expires) = parse_date(date_part(expiration_date)) else {
      return Expiry::Active;
    };
    let days = (expires - today).num_days();
    if days < 0 {
      Expiry::Expired
    } else if days <= EXPIRING_SOON_DAYS {
      Expiry::ExpiringSoon
    } else {
      Expiry::Active
    }
  }

  fn label(self) -> &'static str {
    match self {
      Expiry::Expired => "Expired",
      Expiry::ExpiringSoon => "Expiring Soon",
      Expiry::Active => "Active",
    }
  }

  fn color(self) -> Color {
    match self {
      Expiry::Expired => Color::Red,
      Expiry::ExpiringSoon => Color::Yellow,
      Expiry::Active => Color::Green,
    }
  }
}

fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

pub struct VaccineStockList;

impl ListSpec for VaccineStockList {
  type R = VaccineStocks;

  const TITLE: &'static str = "Vaccine stocks";
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("ID", 5),
    ("Vaccine", 16),
    ("Serial ID", 14),
    ("Qty", 5),
    ("Unit price", 10),
    ("Stocked", 10),
    ("Expires", 10),
    ("Status", 13),
  ];

  fn cells(stock: &VaccineStock) -> Vec<String> {
    vec![
      stock.id.to_string(),
      stock.vaccine_name().to_string(),
      stock.serial_id.clone(),
      stock.quantity.to_string(),
      format!("{:.2}", stock.unit_price),
      date_part(&stock.stock_date).to_string(),
      date_part(&stock.expiration_date).to_string(),
      Expiry::classify(&stock.expiration_date, today()).label().to_string(),
    ]
  }

  fn cell_style(stock: &VaccineStock, column: usize) -> Style {
    if column == 7 {
      Style::default().fg(Expiry::classify(&stock.expiration_date, today()).color())
    } else {
      Style::default()
    }
  }

  fn search_fields() -> Vec<Field> {
    vec![
      Field::text("vaccineId", "Vaccine ID"),
      Field::text("serialId", "Serial ID"),
      Field::text("stockDate", "Stock date")
        .max_len(10)
        .rules(vec![Rule::Date("Use YYYY-MM-DD")]),
      Field::text("expirationDate", "Expires")
        .max_len(10)
        .rules(vec![Rule::Date("Use YYYY-MM-DD")]),
    ]
  }

  fn criteria(form: &Form) -> VaccineStockSearch {
    VaccineStockSearch {
      id: None,
      vaccine_id: parse_id(form.value("vaccineId")),
      serial_id: non_empty(form.value("serialId")),
      stock_date: non_empty(form.value("stockDate")),
      expiration_date: non_empty(form.value("expirationDate")),
    }
  }

  fn id(stock: &VaccineStock) -> i64 {
    stock.id
  }

  fn describe(stock: &VaccineStock) -> String {
    format!("stock {}", stock.serial_id)
  }

  fn create_view(client: &CachedClient) -> Option<Box<dyn View>> {
    Some(Box::new(EntityForm::<VaccineStockForm>::create(client)))
  }

  fn edit_view(client: &CachedClient, stock: &VaccineStock) -> Box<dyn View> {
    Box::new(EntityForm::<VaccineStockForm>::edit(client, stock.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
  }

  #[test]
  fn test_expiry_classification() {
    let today = day("2024-06-01");
    assert_eq!(Expiry::classify("2024-05-31T00:00:00", today), Expiry::Expired);
    assert_eq!(Expiry::classify("2024-06-01", today), Expiry::ExpiringSoon);
    assert_eq!(Expiry::classify("2024-07-01", today), Expiry::ExpiringSoon);
    assert_eq!(Expiry::classify("2024-07-02", today), Expiry::Active);
    assert_eq!(Expiry::classify("", today), Expiry::Active);
  }
}
