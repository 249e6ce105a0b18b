//! Async reads and writes polled from the UI tick.
//!
//! `Query<T>` owns a fetcher closure and re-runs it on `fetch`/`refetch`;
//! `Mutation<T>` runs one write at a time. Both hand results back through
//! a channel so the event loop never blocks on the network.
//!
//! ```ignore
//! let client = client.clone();
//! let mut query = Query::new(move || {
//!     let client = client.clone();
//!     async move { client.list::<Owners>(None).await.map_err(|e| e.user_message()) }
//! });
//! query.fetch();
//!
//! // In the tick handler
//! if query.poll() {
//!     // State changed, re-render
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Async read with Idle/Loading/Success/Error state.
pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time `fetch()` or `refetch()` is invoked.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
    }
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// Check if the query is currently loading.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Check if the query failed.
  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  /// Get the error message if the query failed.
  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Start fetching data if not already loading.
  ///
  /// This is a no-op if the query is already loading.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Start over, discarding any fetch still in flight.
  pub fn refetch(&mut self) {
    self.receiver = None;
    self.start_fetch();
  }

  /// Returns `true` when a result arrived since the last poll.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };
    match receiver.try_recv() {
      Ok(Ok(data)) => self.state = QueryState::Success(data),
      Ok(Err(error)) => self.state = QueryState::Error(error),
      Err(mpsc::error::TryRecvError::Empty) => return false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        self.state = QueryState::Error("Query was cancelled".to_string())
      }
    }
    self.receiver = None;
    true
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)();
    tokio::spawn(async move {
      let _ = tx.send(future.await);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

/// The state of a mutation
#[derive(Debug, Clone)]
pub enum MutationState<T> {
  Idle,
  Pending,
  Success(T),
  Error(String),
}

/// One-shot async write.
///
/// Only one write runs at a time; `mutate` while pending is ignored so a
/// double submit sends a single request.
pub struct Mutation<T> {
  state: MutationState<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> Default for Mutation<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Send + 'static> Mutation<T> {
  pub fn new() -> Self {
    Self {
      state: MutationState::Idle,
      receiver: None,
    }
  }

  pub fn state(&self) -> &MutationState<T> {
    &self.state
  }

  pub fn is_pending(&self) -> bool {
    matches!(self.state, MutationState::Pending)
  }

  pub fn error(&self) -> Option<&str> {
    match &self.state {
      MutationState::Error(e) => Some(e),
      _ => None,
    }
  }

  /// Start the write unless one is already pending.
  pub fn mutate<Fut>(&mut self, future: Fut)
  where
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    if self.is_pending() {
      return;
    }
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = MutationState::Pending;
    tokio::spawn(async move {
      let _ = tx.send(future.await);
    });
  }

  /// Returns `true` if the write finished since the last poll.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };
    match receiver.try_recv() {
      Ok(Ok(data)) => self.state = MutationState::Success(data),
      Ok(Err(error)) => self.state = MutationState::Error(error),
      Err(mpsc::error::TryRecvError::Empty) => return false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        self.state = MutationState::Error("Request was cancelled".to_string())
      }
    }
    self.receiver = None;
    true
  }

  /// Take the result of a successful write, returning to idle.
  pub fn take_success(&mut self) -> Option<T> {
    match std::mem::replace(&mut self.state, MutationState::Idle) {
      MutationState::Success(data) => Some(data),
      other => {
        self.state = other;
        None
      }
    }
  }

  pub fn reset(&mut self) {
    self.state = MutationState::Idle;
    self.receiver = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  #[tokio::test]
  async fn test_owner_rows_arrive_on_poll() {
    let mut query = Query::new(|| async { Ok::<_, String>(vec!["Ali Kaya", "Ayse Demir"]) });
    assert!(matches!(query.state(), QueryState::Idle));
    assert!(!query.poll());

    query.fetch();
    assert!(query.is_loading());
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.data().map(Vec::len), Some(2));
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_failed_fetch_keeps_user_message() {
    let mut query: Query<Vec<String>> =
      Query::new(|| async { Err("Unable to connect to server.".to_string()) });
    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    query.poll();
    assert!(query.is_error());
    assert!(query.data().is_none());
    assert_eq!(query.error(), Some("Unable to connect to server."));
  }

  #[tokio::test]
  async fn test_fetch_during_load_does_not_call_twice() {
    let calls = Arc::new(AtomicU32::new(0));
    let counted = calls.clone();
    let mut query = Query::new(move || {
      let calls = counted.clone();
      async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok::<_, String>(())
      }
    });

    query.fetch();
    query.fetch();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(query.poll());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refetch_drops_stale_result() {
    let generation = Arc::new(AtomicU32::new(0));
    let source = generation.clone();
    let mut query = Query::new(move || {
      let seen = source.fetch_add(1, Ordering::SeqCst);
      async move {
        // the first request is slower than the retry
        let delay = if seen == 0 { 60 } else { 5 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok::<_, String>(seen)
      }
    });

    query.fetch();
    query.refetch();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(query.poll());
    assert_eq!(query.data(), Some(&1));
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_mutation_success_is_taken_once() {
    let mut mutation = Mutation::new();
    mutation.mutate(async { Ok::<_, String>("saved") });
    assert!(mutation.is_pending());

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(mutation.poll());
    assert_eq!(mutation.take_success(), Some("saved"));
    assert_eq!(mutation.take_success(), None);
    assert!(matches!(mutation.state(), MutationState::Idle));
  }

  #[tokio::test]
  async fn test_mutation_ignores_double_submit() {
    let counter = Arc::new(AtomicU32::new(0));
    let mut mutation = Mutation::new();

    for _ in 0..2 {
      let counter = counter.clone();
      mutation.mutate(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>(())
      });
    }

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(mutation.poll());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_mutation_error_keeps_message() {
    let mut mutation: Mutation<()> = Mutation::new();
    mutation.mutate(async { Err("Duplicate microchip".to_string()) });

    tokio::time::sleep(Duration::from_millis(10)).await;
    mutation.poll();
    assert_eq!(mutation.error(), Some("Duplicate microchip"));
    assert_eq!(mutation.take_success(), None);
    assert_eq!(mutation.error(), Some("Duplicate microchip"));

    mutation.reset();
    assert!(mutation.error().is_none());
  }
}
