//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Map, Value};

use sg_api::{Backend, Collection, Url};
use sg_core::config::{AppConfig, ConfigHandle};
use sg_core::error::{SgError, SgResult};
use sg_models::{
    Account, Document, DocumentList, FileInfo, FileUpload, LocalStorage, PreviewOptions, Query,
    Session, UserProfile,
};
use sg_services::{EventBus, ServiceRegistry};

/// In-memory backend that records every call.
///
/// Documents live in per-collection vectors in creation order; creation
/// timestamps advance one second per document so ordering queries are
/// deterministic.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    failing: HashSet<String>,
    garbled: HashSet<String>,
    accounts: HashMap<String, (String, Account)>,
    signed_in: Option<Account>,
    documents: HashMap<Collection, Vec<Value>>,
    files: HashMap<String, FileInfo>,
    clock: i64,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every later call of `operation` fail with a 500.
    pub fn fail_on(&self, operation: &str) {
        self.state.lock().unwrap().failing.insert(operation.to_string());
    }

    /// Let later calls of `operation` succeed but reply with attributes of
    /// the wrong type, so the reply cannot be decoded.
    pub fn garble_replies(&self, operation: &str) {
        self.state.lock().unwrap().garbled.insert(operation.to_string());
    }

    /// Every call so far as `operation` or `operation:detail`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls whose operation name is `operation`.
    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c == operation || c.starts_with(&format!("{operation}:")))
            .collect()
    }

    pub fn file_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.lock().unwrap().files.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn document_count(&self, collection: Collection) -> usize {
        self.state
            .lock()
            .unwrap()
            .documents
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// Register an account and sign it in, without recording calls.
    pub fn sign_in_as(&self, account_id: &str, name: &str, email: &str) -> Account {
        let account = make_account(account_id, name, email);
        let mut state = self.state.lock().unwrap();
        state
            .accounts
            .insert(email.to_string(), ("password".into(), account.clone()));
        state.signed_in = Some(account.clone());
        account
    }

    /// Insert a document directly, without recording calls. Returns its id.
    pub fn seed(&self, collection: Collection, id: &str, data: Value) -> String {
        let mut state = self.state.lock().unwrap();
        let doc = state.make_document(collection, id, data);
        state.documents.entry(collection).or_default().push(doc);
        id.to_string()
    }

    /// Insert a stored file directly.
    pub fn seed_file(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(id.to_string(), make_file(id, "seeded.png", 1));
    }

    fn enter(&self, operation: &str, detail: &str) -> SgResult<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation}:{detail}")
        });
        if state.failing.contains(operation) {
            return Err(SgError::ServerError {
                status: 500,
                code: "general_unknown".into(),
                message: format!("{operation} failed"),
            });
        }
        Ok(state)
    }
}

impl MockState {
    fn reply(&self, operation: &str, doc: &Value) -> SgResult<Document> {
        if !self.garbled.contains(operation) {
            return to_document(doc);
        }
        let mut garbled = doc.clone();
        if let Value::Object(map) = &mut garbled {
            map.insert("caption".into(), json!(42));
            map.insert("name".into(), json!(42));
        }
        to_document(&garbled)
    }

    fn make_document(&mut self, collection: Collection, id: &str, data: Value) -> Value {
        self.clock += 1;
        let stamp = timestamp(self.clock);
        let mut object = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        object.insert("$id".into(), json!(id));
        object.insert("$collectionId".into(), json!(collection.as_str()));
        object.insert("$databaseId".into(), json!("db"));
        object.insert("$createdAt".into(), json!(stamp));
        object.insert("$updatedAt".into(), json!(stamp));
        object.insert("$permissions".into(), json!([]));
        Value::Object(object)
    }
}

fn timestamp(offset_secs: i64) -> String {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (base + Duration::seconds(offset_secs)).to_rfc3339()
}

fn make_account(id: &str, name: &str, email: &str) -> Account {
    serde_json::from_value(json!({
        "$id": id,
        "name": name,
        "email": email,
        "status": true
    }))
    .unwrap()
}

fn make_file(id: &str, name: &str, size: u64) -> FileInfo {
    serde_json::from_value(json!({
        "$id": id,
        "bucketId": "media",
        "name": name,
        "mimeType": "image/png",
        "sizeOriginal": size
    }))
    .unwrap()
}

fn to_document(value: &Value) -> SgResult<Document> {
    Ok(serde_json::from_value(value.clone())?)
}

fn matches_equal(value: Option<&Value>, wanted: &[Value]) -> bool {
    let Some(value) = value else {
        return false;
    };
    match value {
        Value::Array(items) => items.iter().any(|item| wanted.contains(item)),
        other => wanted.contains(other),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> SgResult<Account> {
        let mut state = self.enter("create_account", email)?;
        if state.accounts.contains_key(email) {
            return Err(SgError::Validation("user_already_exists".into()));
        }
        let account = make_account(user_id, name, email);
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), account.clone()));
        Ok(account)
    }

    async fn get_account(&self) -> SgResult<Account> {
        let state = self.enter("get_account", "")?;
        state
            .signed_in
            .clone()
            .ok_or_else(|| SgError::AuthFailed("missing scope (account)".into()))
    }

    async fn create_email_password_session(&self, email: &str, password: &str) -> SgResult<Session> {
        let mut state = self.enter("create_email_password_session", email)?;
        let account = match state.accounts.get(email) {
            Some((stored, account)) if stored == password => account.clone(),
            _ => return Err(SgError::AuthFailed("Invalid credentials.".into())),
        };
        let session: Session = serde_json::from_value(json!({
            "$id": format!("session-{}", account.id),
            "userId": account.id,
            "provider": "email",
            "current": true
        }))?;
        state.signed_in = Some(account);
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str) -> SgResult<()> {
        let mut state = self.enter("delete_session", session_id)?;
        if state.signed_in.take().is_none() {
            return Err(SgError::AuthFailed("no session".into()));
        }
        Ok(())
    }

    async fn create_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document> {
        let mut state = self.enter("create_document", collection.as_str())?;
        let doc = state.make_document(collection, document_id, data);
        state.documents.entry(collection).or_default().push(doc.clone());
        state.reply("create_document", &doc)
    }

    async fn list_documents(&self, collection: Collection, queries: &[Query]) -> SgResult<DocumentList> {
        let state = self.enter("list_documents", collection.as_str())?;
        let mut docs: Vec<Value> = state.documents.get(&collection).cloned().unwrap_or_default();

        let mut limit = 25usize;
        let mut cursor: Option<String> = None;
        for query in queries {
            match query {
                Query::Equal(attr, values) => docs.retain(|d| matches_equal(d.get(attr), values)),
                Query::Search(attr, term) => docs.retain(|d| {
                    d.get(attr)
                        .and_then(Value::as_str)
                        .is_some_and(|s| s.contains(term.as_str()))
                }),
                Query::OrderDesc(attr) => {
                    docs.sort_by(|a, b| b[attr].as_str().cmp(&a[attr].as_str()))
                }
                Query::OrderAsc(attr) => docs.sort_by(|a, b| a[attr].as_str().cmp(&b[attr].as_str())),
                Query::Limit(n) => limit = *n as usize,
                Query::Offset(n) => {
                    docs = docs.into_iter().skip(*n as usize).collect();
                }
                Query::CursorAfter(id) => cursor = Some(id.clone()),
            }
        }

        if let Some(cursor) = cursor {
            let position = docs
                .iter()
                .position(|d| d["$id"] == cursor.as_str())
                .ok_or_else(|| SgError::Validation(format!("invalid cursor {cursor}")))?;
            docs = docs.split_off(position + 1);
        }

        let total = docs.len() as u64;
        let documents = docs
            .iter()
            .take(limit)
            .map(to_document)
            .collect::<SgResult<Vec<_>>>()?;
        Ok(DocumentList { total, documents })
    }

    async fn get_document(&self, collection: Collection, document_id: &str) -> SgResult<Document> {
        let state = self.enter("get_document", document_id)?;
        state
            .documents
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d["$id"] == document_id))
            .ok_or_else(|| SgError::NotFound(format!("document {document_id}")))
            .and_then(to_document)
    }

    async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document> {
        let mut state = self.enter("update_document", document_id)?;
        state.clock += 1;
        let stamp = timestamp(state.clock);
        let doc = state
            .documents
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d["$id"] == document_id))
            .ok_or_else(|| SgError::NotFound(format!("document {document_id}")))?;
        if let (Value::Object(target), Value::Object(changes)) = (&mut *doc, data) {
            for (key, value) in changes {
                target.insert(key, value);
            }
            target.insert("$updatedAt".into(), json!(stamp));
        }
        let doc = doc.clone();
        state.reply("update_document", &doc)
    }

    async fn delete_document(&self, collection: Collection, document_id: &str) -> SgResult<()> {
        let mut state = self.enter("delete_document", document_id)?;
        let docs = state.documents.entry(collection).or_default();
        let before = docs.len();
        docs.retain(|d| d["$id"] != document_id);
        if docs.len() == before {
            return Err(SgError::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    async fn create_file(&self, file_id: &str, file: FileUpload) -> SgResult<FileInfo> {
        let mut state = self.enter("create_file", &file.file_name)?;
        let info = make_file(file_id, &file.file_name, file.len() as u64);
        state.files.insert(file_id.to_string(), info.clone());
        Ok(info)
    }

    fn file_preview_url(&self, file_id: &str, options: &PreviewOptions) -> SgResult<Url> {
        let _state = self.enter("file_preview_url", file_id)?;
        let gravity = options
            .gravity
            .as_ref()
            .map(|g| format!("&gravity={g}"))
            .unwrap_or_default();
        Url::parse(&format!(
            "https://mock.test/v1/storage/buckets/media/files/{file_id}/preview?width={}&height={}{gravity}&quality={}&project=mock",
            options.width, options.height, options.quality
        ))
        .map_err(|e| SgError::Internal(e.to_string()))
    }

    async fn delete_file(&self, file_id: &str) -> SgResult<()> {
        let mut state = self.enter("delete_file", file_id)?;
        state
            .files
            .remove(file_id)
            .map(|_| ())
            .ok_or_else(|| SgError::NotFound(format!("file {file_id}")))
    }

    fn initials_avatar_url(&self, name: &str) -> SgResult<Url> {
        let _state = self.enter("initials_avatar_url", name)?;
        let mut url = Url::parse("https://mock.test/v1/avatars/initials")
            .map_err(|e| SgError::Internal(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("project", "mock");
        Ok(url)
    }
}

/// Create a default test configuration.
pub fn create_test_config() -> AppConfig {
    AppConfig::default()
}

/// Create a ConfigHandle wrapping a default config.
pub fn create_test_config_handle() -> ConfigHandle {
    ConfigHandle::new(create_test_config())
}

/// Create an EventBus with a small buffer suitable for tests.
pub fn create_test_event_bus() -> EventBus {
    EventBus::new(64)
}

/// In-memory local storage.
pub fn create_test_storage() -> LocalStorage {
    LocalStorage::in_memory().expect("failed to open in-memory storage")
}

/// Registry over a fresh mock backend, with services initialized.
pub async fn create_test_registry() -> (ServiceRegistry, Arc<MockBackend>) {
    let backend = MockBackend::new();
    let mut registry = ServiceRegistry::new(
        create_test_config_handle(),
        backend.clone(),
        create_test_storage(),
    )
    .await;
    registry.init_all().expect("failed to init services");
    (registry, backend)
}

/// Seed a user document for `account_id` and return its id.
pub fn seed_user(backend: &MockBackend, user_id: &str, account_id: &str, name: &str) -> String {
    backend.seed(
        Collection::Users,
        user_id,
        json!({
            "accountId": account_id,
            "name": name,
            "username": name.to_lowercase(),
            "email": format!("{}@example.com", name.to_lowercase()),
            "imageUrl": format!("https://mock.test/avatars/{user_id}"),
            "bio": null
        }),
    )
}

/// Profile expected for a user seeded by [`seed_user`].
pub fn seeded_profile(user_id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: user_id.to_string(),
        name: name.to_string(),
        username: name.to_lowercase(),
        email: format!("{}@example.com", name.to_lowercase()),
        image_url: format!("https://mock.test/avatars/{user_id}"),
        bio: String::new(),
    }
}
