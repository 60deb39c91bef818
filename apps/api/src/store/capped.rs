use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{KeyValueStore, StoreError};

/// A typed, retention-capped list persisted under string keys.
///
/// Oldest items are dropped first once a list exceeds `capacity`. All read-modify-write
/// sequences run under one lock so eviction stays atomic on a multi-threaded runtime.
pub struct CappedCollection<T> {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    write_lock: Mutex<()>,
    _item: PhantomData<fn() -> T>,
}

impl<T> CappedCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity,
            write_lock: Mutex::new(()),
            _item: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All retained items under `key`, in storage (insertion) order.
    pub async fn list(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.load(key).await
    }

    pub async fn append(&self, key: &str, item: T) -> Result<(), StoreError> {
        let item = serde_json::to_value(&item)?;
        let _guard = self.write_lock.lock().await;
        self.store.append(key, item, self.capacity).await
    }

    /// Loads the list, hands it to `f`, and writes it back. Returns whatever `f` returns.
    pub async fn modify<R, F>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> R + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load(key).await?;
        let result = f(&mut items);
        if items.len() > self.capacity {
            let overflow = items.len() - self.capacity;
            items.drain(..overflow);
        }
        self.store.set(key, serde_json::to_value(&items)?).await?;
        Ok(result)
    }

    async fn load(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.store.get(key).await? {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn collection(capacity: usize) -> CappedCollection<u32> {
        CappedCollection::new(Arc::new(MemoryStore::new()), capacity)
    }

    #[tokio::test]
    async fn test_list_of_unknown_key_is_empty() {
        let c = collection(3);
        assert!(c.list("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_keeps_newest_within_capacity() {
        let c = collection(3);
        for i in 1..=5 {
            c.append("k", i).await.unwrap();
        }
        assert_eq!(c.list("k").await.unwrap(), vec![3, 4, 5]);
        assert_eq!(c.capacity(), 3);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let c = collection(10);
        c.append("a", 1).await.unwrap();
        c.append("b", 2).await.unwrap();
        assert_eq!(c.list("a").await.unwrap(), vec![1]);
        assert_eq!(c.list("b").await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_modify_writes_back_and_returns_closure_result() {
        let c = collection(10);
        for i in 1..=4 {
            c.append("k", i).await.unwrap();
        }
        let removed = c
            .modify("k", |items| {
                let before = items.len();
                items.retain(|&i| i % 2 == 0);
                before - items.len()
            })
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(c.list("k").await.unwrap(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_never_exceed_capacity() {
        let c = Arc::new(collection(50));
        let mut handles = Vec::new();
        for i in 0..200u32 {
            let c = c.clone();
            handles.push(tokio::spawn(async move { c.append("k", i).await }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(c.list("k").await.unwrap().len(), 50);
    }
}
