//! Persistencia con debounce del borrador en curso.
//!
//! Cada `save` reemplaza la escritura pendiente y reprograma el único
//! temporizador del componente; sólo el último snapshot de una ráfaga llega
//! al almacén. `load` nunca falla: ausente, corrupto o caducado es "sin borrador".

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, now_millis};
use crate::domain::SubmissionDraft;
use crate::errors::CoreError;
use crate::ports::DraftStore;

pub const DEFAULT_DRAFT_KEY: &str = "release-draft";
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(1000);

struct PendingWrite {
  generation: u64,
  payload: String,
}

#[derive(Default)]
struct Slot {
  generation: u64,
  pending: Option<PendingWrite>,
  timer: Option<JoinHandle<()>>,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
  slot.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct DraftCache<S: DraftStore + 'static> {
  store: Arc<S>,
  key: String,
  quiet: Duration,
  slot: Arc<Mutex<Slot>>,
  /// Serializa las operaciones contra el almacén (escritura vs. borrado).
  io: Arc<tokio::sync::Mutex<()>>,
}

impl<S: DraftStore + 'static> DraftCache<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self::with_options(store, DEFAULT_DRAFT_KEY, DEFAULT_QUIET_WINDOW)
  }

  pub fn with_options(store: Arc<S>, key: impl Into<String>, quiet: Duration) -> Self {
    Self {
      store,
      key: key.into(),
      quiet,
      slot: Arc::new(Mutex::new(Slot::default())),
      io: Arc::new(tokio::sync::Mutex::new(())),
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn has_pending(&self) -> bool {
    lock(&self.slot).pending.is_some()
  }

  /// Programa la escritura del snapshot tras la ventana de silencio.
  ///
  /// Debe llamarse dentro de un runtime de tokio.
  pub fn save(&self, draft: &SubmissionDraft) -> Result<(), CoreError> {
    let entry = CacheEntry::persistent(draft, now_millis());
    let payload = serde_json::to_string(&entry).map_err(|e| CoreError::DraftStore(e.to_string()))?;

    let mut slot = lock(&self.slot);
    slot.generation += 1;
    let generation = slot.generation;
    slot.pending = Some(PendingWrite { generation, payload });
    if let Some(previous) = slot.timer.take() {
      previous.abort();
    }

    let store = Arc::clone(&self.store);
    let shared = Arc::clone(&self.slot);
    let io = Arc::clone(&self.io);
    let key = self.key.clone();
    let quiet = self.quiet;

    slot.timer = Some(tokio::spawn(async move {
      tokio::time::sleep(quiet).await;
      let _io = io.lock().await;
      let write = {
        let mut slot = lock(&shared);
        let write = slot.pending.take_if(|p| p.generation == generation);
        if write.is_some() {
          slot.timer = None;
        }
        write
      };
      if let Some(write) = write {
        match store.set(&key, &write.payload).await {
          Ok(()) => debug!(key = %key, bytes = write.payload.len(), "draft saved"),
          Err(e) => warn!(key = %key, error = %e, "draft save failed"),
        }
      }
    }));

    Ok(())
  }

  /// Escribe ya el snapshot pendiente, si lo hay.
  pub async fn flush(&self) -> Result<(), CoreError> {
    let _io = self.io.lock().await;
    let write = {
      let mut slot = lock(&self.slot);
      if let Some(timer) = slot.timer.take() {
        timer.abort();
      }
      slot.pending.take()
    };
    if let Some(write) = write {
      self.store.set(&self.key, &write.payload).await.map_err(|e| CoreError::DraftStore(e.to_string()))?;
      debug!(key = %self.key, "draft flushed");
    }
    Ok(())
  }

  pub async fn load(&self) -> Option<SubmissionDraft> {
    let raw = match self.store.get(&self.key).await {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        debug!(key = %self.key, "no saved draft");
        return None;
      }
      Err(e) => {
        warn!(key = %self.key, error = %e, "draft store unreadable");
        return None;
      }
    };

    match serde_json::from_str::<CacheEntry<SubmissionDraft>>(&raw) {
      Ok(entry) if entry.is_valid_at(now_millis()) => Some(entry.payload),
      Ok(_) => {
        warn!(key = %self.key, "saved draft expired");
        self.purge().await;
        None
      }
      Err(e) => {
        warn!(key = %self.key, error = %e, "saved draft is corrupt");
        self.purge().await;
        None
      }
    }
  }

  async fn purge(&self) {
    if let Err(e) = self.store.remove(&self.key).await {
      debug!(key = %self.key, error = %e, "could not purge saved draft");
    }
  }

  /// Descarta la escritura pendiente y borra el borrador guardado. Idempotente.
  pub async fn clear(&self) -> Result<(), CoreError> {
    {
      let mut slot = lock(&self.slot);
      slot.generation += 1;
      slot.pending = None;
      if let Some(timer) = slot.timer.take() {
        timer.abort();
      }
    }
    let _io = self.io.lock().await;
    self.store.remove(&self.key).await.map_err(|e| CoreError::DraftStore(e.to_string()))?;
    debug!(key = %self.key, "draft cleared");
    Ok(())
  }
}

impl<S: DraftStore + 'static> Drop for DraftCache<S> {
  fn drop(&mut self) {
    if let Some(timer) = lock(&self.slot).timer.take() {
      timer.abort();
    }
  }
}
