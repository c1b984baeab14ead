use async_trait::async_trait;
use burrow_core::error::StoreError;
use burrow_core::{Fingerprint, MappingRecord, MappingStore, NewMapping, UrlKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

type Result<T> = std::result::Result<T, StoreError>;

/// In-memory implementation of the [`MappingStore`] contract using DashMap.
///
/// DashMap's sharded locks allow concurrent reads and writes to different
/// buckets without blocking. Key reservation goes through the entry API, so
/// two concurrent inserts of the same key cannot both win. Expired rows are
/// purged lazily when a lookup touches them.
#[derive(Debug)]
pub struct InMemoryStore {
    records: DashMap<u64, MappingRecord>,
    by_key: DashMap<UrlKey, u64>,
    by_fingerprint: DashMap<Fingerprint, u64>,
    next_identifier: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new empty store. Identifiers start at 1.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            by_key: DashMap::new(),
            by_fingerprint: DashMap::new(),
            next_identifier: AtomicU64::new(1),
        }
    }

    fn allocate_identifier(&self) -> u64 {
        self.next_identifier.fetch_add(1, Ordering::SeqCst)
    }

    fn purge(&self, record: &MappingRecord) {
        self.records.remove(&record.identifier);
        if let Some(key) = &record.key {
            self.by_key
                .remove_if(key, |_, mapped| *mapped == record.identifier);
        }
        self.by_fingerprint
            .remove_if(&record.fingerprint, |_, mapped| {
                *mapped == record.identifier
            });
    }

    fn load(&self, identifier: u64) -> Option<MappingRecord> {
        let record = self.records.get(&identifier)?.clone();
        if record.is_expired() {
            self.purge(&record);
            return None;
        }
        Some(record)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingStore for InMemoryStore {
    async fn find_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<MappingRecord>> {
        let Some(identifier) = self.by_fingerprint.get(fingerprint).map(|entry| *entry) else {
            return Ok(None);
        };

        let Some(record) = self.load(identifier) else {
            return Ok(None);
        };

        // A keyless row is mid two-phase insert and not yet reachable.
        if record.key.is_none() {
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn find_by_key(&self, key: &UrlKey) -> Result<Option<MappingRecord>> {
        let Some(identifier) = self.by_key.get(key).map(|entry| *entry) else {
            return Ok(None);
        };

        Ok(self.load(identifier))
    }

    async fn insert(&self, mapping: NewMapping) -> Result<u64> {
        let identifier = match &mapping.key {
            Some(key) => match self.by_key.entry(key.clone()) {
                Entry::Occupied(_) => return Err(StoreError::Conflict(key.to_string())),
                Entry::Vacant(slot) => {
                    let identifier = self.allocate_identifier();
                    slot.insert(identifier);
                    identifier
                }
            },
            None => self.allocate_identifier(),
        };

        let record = MappingRecord {
            identifier,
            target_url: mapping.target_url,
            fingerprint: mapping.fingerprint,
            key: mapping.key,
            delete_on_use: mapping.delete_on_use,
            valid_until: mapping.valid_until,
            hit_count: 0,
        };

        self.by_fingerprint
            .entry(record.fingerprint)
            .or_insert(identifier);
        self.records.insert(identifier, record);

        Ok(identifier)
    }

    async fn update_key(&self, identifier: u64, key: &UrlKey) -> Result<()> {
        match self.by_key.entry(key.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(key.to_string())),
            Entry::Vacant(slot) => {
                let Some(mut record) = self.records.get_mut(&identifier) else {
                    return Err(StoreError::Operation(format!(
                        "no mapping with identifier {identifier}"
                    )));
                };
                record.key = Some(key.clone());
                slot.insert(identifier);
                Ok(())
            }
        }
    }

    async fn delete_by_key(&self, key: &UrlKey) -> Result<bool> {
        // Removal from the key index is the linearization point: of two
        // concurrent deletes, only one remove succeeds.
        let Some((_, identifier)) = self.by_key.remove(key) else {
            return Ok(false);
        };

        if let Some((_, record)) = self.records.remove(&identifier) {
            self.by_fingerprint
                .remove_if(&record.fingerprint, |_, mapped| *mapped == identifier);
        }

        Ok(true)
    }

    async fn increment_hit_count(&self, key: &UrlKey) -> Result<()> {
        let Some(identifier) = self.by_key.get(key).map(|entry| *entry) else {
            return Ok(());
        };

        if let Some(mut record) = self.records.get_mut(&identifier) {
            record.hit_count += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};

    fn key(value: &str) -> UrlKey {
        UrlKey::new_unchecked(value)
    }

    fn mapping(url: &str, key: Option<UrlKey>, valid_until: Option<Timestamp>) -> NewMapping {
        NewMapping {
            target_url: url.to_string(),
            fingerprint: Fingerprint::of(url),
            key,
            delete_on_use: false,
            valid_until,
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_fingerprint() {
        let store = InMemoryStore::new();

        store
            .insert(mapping("https://example.com", Some(key("abc")), None))
            .await
            .unwrap();

        let found = store
            .find_by_fingerprint(&Fingerprint::of("https://example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.target_url, "https://example.com");
        assert_eq!(found.key, Some(key("abc")));
        assert_eq!(found.hit_count, 0);
    }

    #[tokio::test]
    async fn find_by_fingerprint_misses_unknown_url() {
        let store = InMemoryStore::new();

        let found = store
            .find_by_fingerprint(&Fingerprint::of("https://nope.example"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn identifiers_are_monotonic_and_never_reused() {
        let store = InMemoryStore::new();

        let first = store
            .insert(mapping("https://a.example", Some(key("a")), None))
            .await
            .unwrap();
        let second = store
            .insert(mapping("https://b.example", Some(key("b")), None))
            .await
            .unwrap();

        assert!(second > first);

        store.delete_by_key(&key("b")).await.unwrap();
        let third = store
            .insert(mapping("https://c.example", Some(key("c")), None))
            .await
            .unwrap();
        assert!(third > second);
    }

    #[tokio::test]
    async fn insert_conflicts_on_reserved_key() {
        let store = InMemoryStore::new();

        store
            .insert(mapping("https://one.example", Some(key("taken")), None))
            .await
            .unwrap();

        let err = store
            .insert(mapping("https://two.example", Some(key("taken")), None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // The losing insert must not leave a row behind.
        let found = store
            .find_by_fingerprint(&Fingerprint::of("https://two.example"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn keyless_row_is_invisible_until_key_assignment() {
        let store = InMemoryStore::new();

        let identifier = store
            .insert(mapping("https://example.com", None, None))
            .await
            .unwrap();

        let found = store
            .find_by_fingerprint(&Fingerprint::of("https://example.com"))
            .await
            .unwrap();
        assert!(found.is_none());

        store
            .update_key(identifier, &key("assigned"))
            .await
            .unwrap();

        let found = store
            .find_by_fingerprint(&Fingerprint::of("https://example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.key, Some(key("assigned")));
    }

    #[tokio::test]
    async fn update_key_conflicts_on_taken_key() {
        let store = InMemoryStore::new();

        store
            .insert(mapping("https://one.example", Some(key("taken")), None))
            .await
            .unwrap();
        let identifier = store
            .insert(mapping("https://two.example", None, None))
            .await
            .unwrap();

        let err = store.update_key(identifier, &key("taken")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_key_rejects_unknown_identifier() {
        let store = InMemoryStore::new();

        let err = store.update_key(999, &key("ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));
    }

    #[tokio::test]
    async fn delete_by_key_reports_whether_a_row_was_removed() {
        let store = InMemoryStore::new();

        store
            .insert(mapping("https://example.com", Some(key("once")), None))
            .await
            .unwrap();

        assert!(store.delete_by_key(&key("once")).await.unwrap());
        assert!(!store.delete_by_key(&key("once")).await.unwrap());
        assert!(store.find_by_key(&key("once")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_frees_the_fingerprint() {
        let store = InMemoryStore::new();

        store
            .insert(mapping("https://example.com", Some(key("gone")), None))
            .await
            .unwrap();
        store.delete_by_key(&key("gone")).await.unwrap();

        let found = store
            .find_by_fingerprint(&Fingerprint::of("https://example.com"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn expired_rows_are_absent_for_lookups() {
        let store = InMemoryStore::new();
        let expired = Timestamp::now() - SignedDuration::from_secs(1);

        store
            .insert(mapping("https://example.com", Some(key("old")), Some(expired)))
            .await
            .unwrap();

        assert!(store.find_by_key(&key("old")).await.unwrap().is_none());
        assert!(store
            .find_by_fingerprint(&Fingerprint::of("https://example.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn not_yet_expired_rows_resolve() {
        let store = InMemoryStore::new();
        let future = Timestamp::now() + SignedDuration::from_hours(1);

        store
            .insert(mapping("https://example.com", Some(key("live")), Some(future)))
            .await
            .unwrap();

        let found = store.find_by_key(&key("live")).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn hit_count_increments() {
        let store = InMemoryStore::new();

        store
            .insert(mapping("https://example.com", Some(key("hits")), None))
            .await
            .unwrap();

        store.increment_hit_count(&key("hits")).await.unwrap();
        store.increment_hit_count(&key("hits")).await.unwrap();

        let found = store.find_by_key(&key("hits")).await.unwrap().unwrap();
        assert_eq!(found.hit_count, 2);
    }

    #[tokio::test]
    async fn hit_count_for_unknown_key_is_a_noop() {
        let store = InMemoryStore::new();
        store.increment_hit_count(&key("ghost")).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_inserts_of_the_same_key_yield_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for i in 0..8u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(mapping(
                        &format!("https://example{i}.com"),
                        Some(key("contested")),
                        None,
                    ))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn concurrent_deletes_of_the_same_key_yield_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryStore::new());
        store
            .insert(mapping("https://example.com", Some(key("once")), None))
            .await
            .unwrap();

        let mut handles = vec![];
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(
                async move { store.delete_by_key(&key("once")).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
