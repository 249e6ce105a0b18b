//! In-process fake of the clinic API for tests.
//!
//! Serves canned fixtures for every collection, records each request as
//! `"METHOD /path"` and shuts down when dropped.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::{ApiClient, CachedClient};
use crate::cache::{CacheLayer, MemoryStorage};
use crate::ui::view::{View, ViewAction};

/// National id the fake rejects with a failed envelope.
pub const DUPLICATE_NATIONAL_ID: &str = "00000000000";
pub const NOTIFICATIONS_PATH: &str = "/hubs/notifications";

#[derive(Debug, Clone)]
struct Recorded {
  route: String,
  auth: Option<String>,
  body: Option<Value>,
}

#[derive(Default)]
struct Shared {
  requests: Mutex<Vec<Recorded>>,
}

pub struct FakeBackend {
  addr: SocketAddr,
  shared: Arc<Shared>,
  shutdown: Option<oneshot::Sender<()>>,
}

impl FakeBackend {
  pub async fn start() -> Self {
    let shared = Arc::new(Shared::default());
    let router = Router::new().fallback(handle).with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
      let _ = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
          let _ = shutdown_rx.await;
        })
        .await;
    });

    Self {
      addr,
      shared,
      shutdown: Some(shutdown_tx),
    }
  }

  pub fn base_url(&self) -> String {
    format!("http://{}", self.addr)
  }

  /// Cached client against this backend with an in-memory cache.
  pub fn client(&self) -> CachedClient {
    let api = ApiClient::new(&self.base_url()).unwrap();
    CachedClient::new(api, CacheLayer::new(MemoryStorage::new()))
  }

  fn requests(&self) -> Vec<Recorded> {
    self.shared.requests.lock().unwrap().clone()
  }

  /// Number of requests seen for a `"METHOD /path"` route.
  pub fn count(&self, route: &str) -> usize {
    self.requests().iter().filter(|r| r.route == route).count()
  }

  pub fn total(&self) -> usize {
    self.requests().len()
  }

  pub fn last_body(&self, route: &str) -> Option<Value> {
    self
      .requests()
      .into_iter()
      .rev()
      .find(|r| r.route == route)
      .and_then(|r| r.body)
  }

  pub fn last_auth(&self) -> Option<String> {
    self.requests().last().and_then(|r| r.auth.clone())
  }
}

impl Drop for FakeBackend {
  fn drop(&mut self) {
    if let Some(tx) = self.shutdown.take() {
      let _ = tx.send(());
    }
  }
}

/// Tick `view` until `done` holds or it asks the App for something.
pub async fn tick_until<V: View>(view: &mut V, done: impl Fn(&V) -> bool) -> ViewAction {
  for _ in 0..300 {
    tokio::time::sleep(Duration::from_millis(10)).await;
    let action = view.tick();
    if done(view) || !matches!(action, ViewAction::None) {
      return action;
    }
  }
  panic!("view did not settle");
}

async fn handle(
  State(shared): State<Arc<Shared>>,
  method: Method,
  uri: Uri,
  headers: HeaderMap,
  body: Bytes,
) -> Response {
  let path = uri.path().to_string();
  let body: Option<Value> = serde_json::from_slice(&body).ok();
  shared.requests.lock().unwrap().push(Recorded {
    route: format!("{} {}", method, path),
    auth: headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .map(String::from),
    body: body.clone(),
  });

  let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
  match (method.as_str(), segments.as_slice()) {
    ("GET", ["hubs", "notifications"]) => (
      [(header::CONTENT_TYPE, "text/event-stream")],
      "data: {\"message\":\"Low stock: Rabies\"}\n\n: keep-alive\n\ndata: Clinic closes at 18:00\n\n",
    )
      .into_response(),
    ("GET", ["Cache", "Codes", "Species", "Options"]) => Json(json!([
      {"value": 1, "label": "Cat"},
      {"value": 2, "label": "Dog"}
    ]))
    .into_response(),
    ("POST", ["Account", "Login"]) => login(body.as_ref()),
    ("POST", ["Account", "Register"]) => {
      Json(json!({"success": true, "message": "Registration successful"})).into_response()
    }
    ("GET", ["Pets", "OwnerId", _]) => Json(fixtures("Pets")).into_response(),
    ("POST", ["Codes", "Search"]) => codes_search(body.as_ref()),
    ("POST", ["Veterinarians", _, "Activate" | "Deactivate"]) => StatusCode::OK.into_response(),
    ("POST", [collection, "Search"]) => {
      let first: Vec<Value> = as_list(fixtures(collection)).into_iter().take(1).collect();
      Json(Value::Array(first)).into_response()
    }
    ("GET", [collection]) => Json(fixtures(collection)).into_response(),
    ("GET" | "PUT" | "DELETE", [collection, "404"]) => not_found(collection),
    ("GET", [collection, id]) => match find(collection, id) {
      Some(entity) => Json(entity).into_response(),
      None => not_found(collection),
    },
    ("POST", ["Owners"]) if national_id(body.as_ref()) == Some(DUPLICATE_NATIONAL_ID) => Json(
      json!({"success": false, "message": "An owner with this TC Kimlik No already exists"}),
    )
    .into_response(),
    ("POST", [collection]) => {
      let mut created = as_list(fixtures(collection))
        .into_iter()
        .next()
        .unwrap_or_else(|| json!({}));
      created["id"] = json!(3);
      Json(json!({"success": true, "message": "Created", "data": created})).into_response()
    }
    ("PUT", [collection, id]) => Json(json!({
      "success": true,
      "message": "Updated",
      "data": find(collection, id)
    }))
    .into_response(),
    ("DELETE", [_, _]) => StatusCode::NO_CONTENT.into_response(),
    _ => not_found(""),
  }
}

fn not_found(collection: &str) -> Response {
  let entity = collection.trim_end_matches('s');
  (
    StatusCode::NOT_FOUND,
    Json(json!({"message": format!("{} not found", entity)})),
  )
    .into_response()
}

fn national_id(body: Option<&Value>) -> Option<&str> {
  body.and_then(|b| b.get("tcKimlikNo")).and_then(Value::as_str)
}

fn login(body: Option<&Value>) -> Response {
  let password = body.and_then(|b| b.get("password")).and_then(Value::as_str);
  if password != Some("Secret1!") {
    return (
      StatusCode::UNAUTHORIZED,
      Json(json!({"message": "Invalid username or password"})),
    )
      .into_response();
  }
  let user_name = body
    .and_then(|b| b.get("userName"))
    .and_then(Value::as_str)
    .unwrap_or_default();
  Json(json!({
    "userId": "vet-1",
    "userName": user_name,
    "token": "tok-123",
    "expiresIn": 3600,
    "role": "Veterinarian"
  }))
  .into_response()
}

fn codes_search(body: Option<&Value>) -> Response {
  let parent = body.and_then(|b| b.get("parentId")).and_then(Value::as_i64);
  let code_type = body.and_then(|b| b.get("codeType")).and_then(Value::as_str);
  let codes: Vec<Value> = as_list(fixtures("Codes"))
    .into_iter()
    .filter(|c| parent.is_none() || c["parentId"].as_i64() == parent)
    .filter(|c| code_type.is_none() || c["codeType"].as_str() == code_type)
    .collect();
  Json(Value::Array(codes)).into_response()
}

fn as_list(value: Value) -> Vec<Value> {
  match value {
    Value::Array(items) => items,
    _ => Vec::new(),
  }
}

fn find(collection: &str, id: &str) -> Option<Value> {
  as_list(fixtures(collection)).into_iter().find(|e| match &e["id"] {
    Value::Number(n) => n.to_string() == id,
    Value::String(s) => s == id,
    _ => false,
  })
}

pub fn fixtures(collection: &str) -> Value {
  match collection {
    "Owners" => json!([
      {
        "id": 1, "firstName": "Ali", "lastName": "Kaya", "tcKimlikNo": "12345678901",
        "address": "Atatürk Cad. No 5 Ankara", "phoneNumber": "5551234567", "version": 1
      },
      {
        "id": 2, "firstName": "Ayşe", "lastName": "Yılmaz", "tcKimlikNo": "10987654321",
        "address": "Bağdat Cad. No 12 İstanbul", "phoneNumber": "05321234567",
        "emergencyPerson": "Mehmet Yılmaz", "emergencyPhone": "05329876543", "version": 4
      }
    ]),
    "Pets" => json!([
      {
        "id": 1, "name": "Pamuk", "microchipNumber": "123456789012345", "gender": 1,
        "color": "White", "speciesId": 1, "breedId": 11, "ownerId": 1, "version": 2,
        "species": {"id": 1, "codeType": "Species", "codeName": "Cat"},
        "breed": {"id": 11, "codeType": "Breed", "codeName": "Van", "parentId": 1},
        "owner": {"id": 1, "firstName": "Ali", "lastName": "Kaya"}
      }
    ]),
    "Codes" => json!([
      {"id": 1, "codeType": "Species", "codeName": "Cat", "version": 1},
      {"id": 2, "codeType": "Species", "codeName": "Dog", "version": 1},
      {"id": 11, "codeType": "Breed", "codeName": "Van", "parentId": 1, "version": 1},
      {"id": 12, "codeType": "Breed", "codeName": "Tekir", "parentId": 1, "version": 1},
      {"id": 21, "codeType": "Breed", "codeName": "Kangal", "parentId": 2, "version": 1}
    ]),
    "Vaccines" => json!([
      {"id": 1, "name": "Rabies", "manufacturer": "Zoetis", "version": 1},
      {"id": 2, "name": "Leptospirosis", "manufacturer": "MSD", "version": 1}
    ]),
    "VaccineStocks" => json!([
      {
        "id": 5, "vaccineId": 1, "stockDate": "2024-01-10T00:00:00", "serialId": "RB-001",
        "quantity": 20, "unitPrice": 150.5, "expirationDate": "2025-01-10T00:00:00",
        "version": 1, "vaccine": {"id": 1, "name": "Rabies", "manufacturer": "Zoetis"}
      }
    ]),
    "VaccineRecords" => json!([
      {
        "id": 9, "petId": 1, "vaccineId": 1, "veterinarianId": "vet-1", "vaccineStockId": 5,
        "vaccinationDate": "2024-02-01T00:00:00", "nextDueDate": "2025-02-01T00:00:00",
        "version": 1,
        "pet": {"id": 1, "name": "Pamuk", "owner": {"firstName": "Ali", "lastName": "Kaya"}},
        "vaccine": {"id": 1, "name": "Rabies", "manufacturer": "Zoetis"},
        "veterinarian": {"id": "vet-1", "firstName": "Mehmet", "lastName": "Demir"}
      }
    ]),
    "Veterinarians" => json!([
      {
        "id": "vet-1", "userName": "mdemir", "firstName": "Mehmet", "lastName": "Demir",
        "licenseNumber": "TR-4411", "version": 1, "isActive": true
      },
      {
        "id": "vet-2", "userName": "zcelik", "firstName": "Zeynep", "lastName": "Çelik",
        "version": 1, "isActive": false
      }
    ]),
    _ => json!([]),
  }
}
