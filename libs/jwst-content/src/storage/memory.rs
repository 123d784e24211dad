use std::collections::HashMap;

use nanoid::nanoid;
use tokio::sync::RwLock;

use super::*;

#[derive(Debug, Clone, Default)]
struct Collection {
    records: Vec<Map<String, Value>>,
    /// Ids currently related to each owning record.
    related: HashMap<String, Vec<Value>>,
}

impl Collection {
    fn find(&self, id: &Value) -> Option<&Map<String, Value>> {
        self.records.iter().find(|record| record.get(constants::ID) == Some(id))
    }

    fn upsert(&mut self, record: Map<String, Value>) {
        let id = record.get(constants::ID);
        match self.records.iter_mut().find(|r| r.get(constants::ID) == id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }
}

/// In-memory [MutationStore] keyed by block path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, assigning an id when it has none. Returns the id.
    pub async fn insert(&self, path: &str, record: Value) -> ContentResult<Value> {
        let record = Self::with_id(path, record)?;
        let id = record[constants::ID].clone();
        self.collections
            .write()
            .await
            .entry(path.to_owned())
            .or_default()
            .upsert(record);
        Ok(id)
    }

    pub async fn get(&self, path: &str, id: &Value) -> Option<Value> {
        let collections = self.collections.read().await;
        collections
            .get(path)
            .and_then(|c| c.find(id))
            .map(|record| Value::Object(record.clone()))
    }

    /// Ids related to `owner` under `path`.
    pub async fn related(&self, owner: &str, path: &str) -> Vec<Value> {
        let collections = self.collections.read().await;
        collections
            .get(path)
            .and_then(|c| c.related.get(owner))
            .cloned()
            .unwrap_or_default()
    }

    fn with_id(path: &str, record: Value) -> ContentResult<Map<String, Value>> {
        let Value::Object(mut record) = record else {
            return Err(ContentError::Storage(format!("{path}: expected an object, found {record}")));
        };
        record
            .entry(constants::ID)
            .or_insert_with(|| Value::String(nanoid!()));
        Ok(record)
    }

    fn entry_id(path: &str, entry: &Value) -> ContentResult<Value> {
        entry
            .get(constants::ID)
            .and_then(join_id)
            .ok_or_else(|| ContentError::Storage(format!("{path}: entry without id: {entry}")))
    }

    fn apply(
        owner: &str,
        path: &str,
        batch: &MutationBatch,
        collection: &mut Collection,
    ) -> ContentResult<ActionResults> {
        let mut results = ActionResults::default();
        let mut related = if batch.disconnect_all {
            vec![]
        } else {
            collection.related.get(owner).cloned().unwrap_or_default()
        };

        for entry in &batch.create {
            let record = Self::with_id(path, entry.clone())?;
            related.push(record[constants::ID].clone());
            results.create.push(Value::Object(record.clone()));
            collection.upsert(record);
        }

        for entry in &batch.connect {
            let id = Self::entry_id(path, entry)?;
            let record = collection
                .find(&id)
                .ok_or_else(|| ContentError::Storage(format!("{path}: no record {id} to connect")))?;
            results.connect.push(Value::Object(record.clone()));
            related.push(id);
        }

        for entry in &batch.disconnect {
            let id = Self::entry_id(path, entry)?;
            related.retain(|r| *r != id);
            let mut disconnected = Map::new();
            disconnected.insert(constants::ID.into(), id);
            results.disconnect.push(Value::Object(disconnected));
        }

        collection.related.insert(owner.to_owned(), related);
        Ok(results)
    }
}

#[async_trait]
impl MutationStore for MemoryStore {
    async fn execute(&self, owner: &str, batches: &MutationBatches) -> ContentResult<ExecutedMutations> {
        let mut collections = self.collections.write().await;

        // applied to copies first so a failing batch leaves nothing behind
        let mut staged = HashMap::new();
        let mut executed = ExecutedMutations::new();
        for (path, batch) in batches {
            let mut collection = collections.get(path).cloned().unwrap_or_default();
            let results = Self::apply(owner, path, batch, &mut collection)?;
            debug!(
                "executed {} of {}: {} created, {} connected, {} disconnected",
                path,
                owner,
                results.create.len(),
                results.connect.len(),
                results.disconnect.len()
            );
            staged.insert(path.clone(), collection);
            executed.insert(path.clone(), results);
        }

        collections.extend(staged);
        Ok(executed)
    }

    async fn fetch(&self, ids: &BTreeMap<String, Vec<Value>>) -> ContentResult<FetchedRecords> {
        let collections = self.collections.read().await;

        Ok(ids
            .iter()
            .map(|(path, ids)| {
                let records = collections
                    .get(path)
                    .map(|c| {
                        ids.iter()
                            .filter_map(|id| c.find(id))
                            .map(|record| Value::Object(record.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                (path.clone(), records)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batches(value: Value) -> MutationBatches {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_execute_create_and_connect() {
        let store = MemoryStore::new();
        store.insert("posts", json!({ "id": "p1", "title": "One" })).await.unwrap();

        let executed = store
            .execute("doc-1", &batches(json!({
                "images": { "disconnectAll": true, "create": [{ "file": "a" }, { "id": "fixed", "file": "b" }] },
                "posts": { "disconnectAll": true, "connect": [{ "id": "p1" }] }
            })))
            .await
            .unwrap();

        let created = &executed["images"].create;
        assert_eq!(created.len(), 2);
        assert!(created[0]["id"].is_string());
        assert_eq!(created[1]["id"], json!("fixed"));
        assert_eq!(executed["posts"].connect, vec![json!({ "id": "p1", "title": "One" })]);

        assert_eq!(store.related("doc-1", "images").await, vec![created[0]["id"].clone(), json!("fixed")]);
        assert_eq!(store.get("images", &json!("fixed")).await, Some(json!({ "id": "fixed", "file": "b" })));
    }

    #[tokio::test]
    async fn test_execute_disconnect() {
        let store = MemoryStore::new();
        store.insert("posts", json!({ "id": "p1" })).await.unwrap();
        store.insert("posts", json!({ "id": "p2" })).await.unwrap();

        store
            .execute("doc-1", &batches(json!({
                "posts": { "disconnectAll": true, "connect": [{ "id": "p1" }, { "id": "p2" }] }
            })))
            .await
            .unwrap();
        let executed = store
            .execute("doc-1", &batches(json!({
                "posts": { "disconnectAll": false, "disconnect": [{ "id": "p1" }] }
            })))
            .await
            .unwrap();

        assert_eq!(executed["posts"].disconnect, vec![json!({ "id": "p1" })]);
        assert_eq!(store.related("doc-1", "posts").await, vec![json!("p2")]);
    }

    #[tokio::test]
    async fn test_related_sets_per_owner() {
        let store = MemoryStore::new();
        store.insert("posts", json!({ "id": "p1" })).await.unwrap();
        store.insert("posts", json!({ "id": "p2" })).await.unwrap();

        for (owner, id) in [("doc-1", "p1"), ("doc-2", "p2")] {
            store
                .execute(owner, &batches(json!({ "posts": { "disconnectAll": true, "connect": [{ "id": id }] } })))
                .await
                .unwrap();
        }

        assert_eq!(store.related("doc-1", "posts").await, vec![json!("p1")]);
        assert_eq!(store.related("doc-2", "posts").await, vec![json!("p2")]);
        assert!(store.related("doc-3", "posts").await.is_empty());
    }

    #[tokio::test]
    async fn test_execute_failure_is_atomic() {
        let store = MemoryStore::new();
        let err = store
            .execute("doc-1", &batches(json!({
                "images": { "disconnectAll": true, "create": [{ "file": "a" }] },
                "posts": { "disconnectAll": true, "connect": [{ "id": "nope" }] }
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::Storage(_)));
        assert!(store.related("doc-1", "images").await.is_empty());

        let err = store
            .execute("doc-1", &batches(json!({ "images": { "disconnectAll": true, "create": ["not an object"] } })))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Storage(_)));
    }

    #[tokio::test]
    async fn test_fetch_in_requested_order() {
        let store = MemoryStore::new();
        store.insert("images", json!({ "id": "a" })).await.unwrap();
        store.insert("images", json!({ "id": "b" })).await.unwrap();

        let mut ids = BTreeMap::new();
        ids.insert("images".to_owned(), vec![json!("b"), json!("gone"), json!("a")]);
        ids.insert("posts".to_owned(), vec![json!("p1")]);

        let records = store.fetch(&ids).await.unwrap();
        assert_eq!(records["images"], vec![json!({ "id": "b" }), json!({ "id": "a" })]);
        assert!(records["posts"].is_empty());
    }
}
