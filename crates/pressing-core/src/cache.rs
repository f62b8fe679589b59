//! Entradas con caducidad y una caché en memoria basada en ellas.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Milisegundos desde UNIX epoch según el reloj del sistema.
pub fn now_millis() -> u64 {
  SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Valor cacheado con su marca de escritura y su ttl.
///
/// Es válida si `ttl_ms` es `None` o si `now - written_at_ms < ttl_ms`.
/// Una entrada inválida se trata como ausente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
  pub payload: T,
  pub written_at_ms: u64,
  pub ttl_ms: Option<u64>,
}

impl<T> CacheEntry<T> {
  pub fn new(payload: T, written_at_ms: u64, ttl: Option<Duration>) -> Self {
    Self { payload, written_at_ms, ttl_ms: ttl.map(|d| d.as_millis() as u64) }
  }

  /// Entrada sin caducidad.
  pub fn persistent(payload: T, written_at_ms: u64) -> Self {
    Self::new(payload, written_at_ms, None)
  }

  pub fn is_valid_at(&self, now_ms: u64) -> bool {
    match self.ttl_ms {
      None => true,
      // Un reloj que retrocede no resucita entradas viejas ni caduca nuevas.
      Some(ttl) => now_ms.saturating_sub(self.written_at_ms) < ttl,
    }
  }
}

/// Caché clave → valor con ttl fijo, pensada para crearse una vez e
/// inyectarse donde haga falta (en lugar de un singleton de módulo).
///
/// Las entradas caducadas se purgan al leerlas.
pub struct TtlCache<K, V> {
  ttl: Duration,
  entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
  K: Eq + Hash,
  V: Clone,
{
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: Mutex::new(HashMap::new()) }
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  pub fn get(&self, key: &K) -> Option<V> {
    self.get_at(key, now_millis())
  }

  pub fn get_at(&self, key: &K, now_ms: u64) -> Option<V> {
    let mut entries = self.entries.lock().ok()?;
    match entries.get(key) {
      Some(entry) if entry.is_valid_at(now_ms) => Some(entry.payload.clone()),
      Some(_) => {
        entries.remove(key);
        None
      }
      None => None,
    }
  }

  pub fn insert(&self, key: K, value: V) {
    self.insert_at(key, value, now_millis());
  }

  pub fn insert_at(&self, key: K, value: V, now_ms: u64) {
    if let Ok(mut entries) = self.entries.lock() {
      entries.insert(key, CacheEntry::new(value, now_ms, Some(self.ttl)));
    }
  }

  pub fn invalidate(&self, key: &K) {
    if let Ok(mut entries) = self.entries.lock() {
      entries.remove(key);
    }
  }

  /// Elimina todas las entradas caducadas; devuelve cuántas se borraron.
  pub fn purge_expired(&self) -> usize {
    self.purge_expired_at(now_millis())
  }

  pub fn purge_expired_at(&self, now_ms: u64) -> usize {
    let Ok(mut entries) = self.entries.lock() else {
      return 0;
    };
    let before = entries.len();
    entries.retain(|_, e| e.is_valid_at(now_ms));
    before - entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.lock().map(|e| e.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn entry_validity_boundary() {
    let entry = CacheEntry::new("x", 1_000, Some(Duration::from_millis(500)));
    assert!(entry.is_valid_at(1_000));
    assert!(entry.is_valid_at(1_499));
    assert!(!entry.is_valid_at(1_500));
    assert!(entry.is_valid_at(10));
  }

  #[test]
  fn persistent_entry_never_expires() {
    assert!(CacheEntry::persistent(1, 0).is_valid_at(u64::MAX));
  }

  #[test]
  fn stale_entries_are_absent_and_purged_on_read() {
    let cache = TtlCache::new(Duration::from_secs(60));
    cache.insert_at("artist", 7, 0);

    assert_eq!(cache.get_at(&"artist", 59_999), Some(7));
    assert_eq!(cache.get_at(&"artist", 60_000), None);
    assert!(cache.is_empty());
  }

  #[test]
  fn purge_only_drops_expired() {
    let cache = TtlCache::new(Duration::from_secs(1));
    cache.insert_at(1, "old", 0);
    cache.insert_at(2, "new", 5_000);

    assert_eq!(cache.purge_expired_at(5_500), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get_at(&2, 5_500), Some("new"));
  }
}
