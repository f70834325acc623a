use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};

pub const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum FirestoreError {
    #[error("firestore request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("firestore error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("malformed firestore response: {0}")]
    Malformed(String),
}

/// REST client for the document store. Documents travel as flat JSON objects;
/// the typed-field wire format stays inside this module.
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl FirestoreClient {
    pub fn new(project_id: &str, api_key: SecretString) -> Self {
        let base_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            FIRESTORE_API_BASE, project_id
        );
        Self::with_base_url(base_url, api_key)
    }

    /// Point the client at an arbitrary documents endpoint, used by tests.
    pub fn with_base_url(base_url: String, api_key: SecretString) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    pub async fn create_document(
        &self,
        collection: &str,
        data: &Value,
    ) -> Result<Value, FirestoreError> {
        let url = format!(
            "{}/{}?key={}",
            self.base_url,
            collection,
            self.api_key.expose_secret()
        );
        let response = self
            .http
            .post(&url)
            .json(&json!({ "fields": to_firestore_fields(data) }))
            .send()
            .await?;
        let doc = Self::read_document(response).await?;
        document_to_object(&doc, None)
    }

    pub async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Value>, FirestoreError> {
        let url = format!(
            "{}/{}/{}?key={}",
            self.base_url,
            collection,
            doc_id,
            self.api_key.expose_secret()
        );
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc = Self::read_document(response).await?;
        document_to_object(&doc, Some(doc_id)).map(Some)
    }

    pub async fn update_document(
        &self,
        collection: &str,
        doc_id: &str,
        data: &Value,
    ) -> Result<Value, FirestoreError> {
        let url = format!(
            "{}/{}/{}?key={}",
            self.base_url,
            collection,
            doc_id,
            self.api_key.expose_secret()
        );
        let response = self
            .http
            .patch(&url)
            .json(&json!({ "fields": to_firestore_fields(data) }))
            .send()
            .await?;
        let doc = Self::read_document(response).await?;
        document_to_object(&doc, Some(doc_id))
    }

    pub async fn delete_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<(), FirestoreError> {
        let url = format!(
            "{}/{}/{}?key={}",
            self.base_url,
            collection,
            doc_id,
            self.api_key.expose_secret()
        );
        let response = self.http.delete(&url).send().await?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(FirestoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Equality query over one collection. Multiple filters combine with AND.
    pub async fn query_documents(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Value>, FirestoreError> {
        let url = format!("{}:runQuery?key={}", self.base_url, self.api_key.expose_secret());

        let mut structured_query = json!({
            "from": [{ "collectionId": collection }],
        });
        let mut field_filters: Vec<Value> = filters
            .iter()
            .filter_map(|(field, value)| {
                to_firestore_value(value).map(|typed| {
                    json!({
                        "fieldFilter": {
                            "field": { "fieldPath": field },
                            "op": "EQUAL",
                            "value": typed,
                        }
                    })
                })
            })
            .collect();
        if !field_filters.is_empty() {
            structured_query["where"] = if field_filters.len() == 1 {
                field_filters.remove(0)
            } else {
                json!({
                    "compositeFilter": { "op": "AND", "filters": field_filters }
                })
            };
        }

        let response = self
            .http
            .post(&url)
            .json(&json!({ "structuredQuery": structured_query }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirestoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let results: Vec<Value> = response.json().await?;
        results
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(|doc| document_to_object(doc, None))
            .collect()
    }

    async fn read_document(response: reqwest::Response) -> Result<Value, FirestoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirestoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

/// Flatten a REST document into `{id, ...fields}`. The id comes from the
/// document path unless the caller already knows it.
fn document_to_object(doc: &Value, known_id: Option<&str>) -> Result<Value, FirestoreError> {
    let id = match known_id {
        Some(id) => id.to_string(),
        None => doc
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.rsplit('/').next())
            .map(str::to_string)
            .ok_or_else(|| FirestoreError::Malformed("document without a name path".into()))?,
    };

    let mut object = match doc.get("fields") {
        Some(fields) => match from_firestore_fields(fields) {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        None => Map::new(),
    };
    object.insert("id".to_string(), Value::String(id));
    Ok(Value::Object(object))
}

/// JSON object -> Firestore typed fields. Null fields are dropped.
pub fn to_firestore_fields(data: &Value) -> Value {
    let mut fields = Map::new();
    if let Value::Object(map) = data {
        for (key, value) in map {
            if let Some(typed) = to_firestore_value(value) {
                fields.insert(key.clone(), typed);
            }
        }
    }
    Value::Object(fields)
}

fn to_firestore_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(json!({ "stringValue": s })),
        Value::Bool(b) => Some(json!({ "booleanValue": b })),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(json!({ "integerValue": i }))
            } else {
                Some(json!({ "doubleValue": n.as_f64() }))
            }
        }
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().filter_map(to_firestore_value).collect();
            Some(json!({ "arrayValue": { "values": values } }))
        }
        Value::Object(_) => Some(json!({ "mapValue": { "fields": to_firestore_fields(value) } })),
    }
}

/// Firestore typed fields -> JSON object.
pub fn from_firestore_fields(fields: &Value) -> Value {
    let mut object = Map::new();
    if let Value::Object(map) = fields {
        for (key, value) in map {
            object.insert(key.clone(), from_firestore_value(value));
        }
    }
    Value::Object(object)
}

fn from_firestore_value(value: &Value) -> Value {
    if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(int) = value.get("integerValue") {
        // The REST format returns integers as strings
        let parsed = match int {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        if let Some(i) = parsed {
            return json!(i);
        }
    }
    if let Some(d) = value.get("doubleValue").and_then(Value::as_f64) {
        return json!(d);
    }
    if let Some(b) = value.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(ts) = value.get("timestampValue").and_then(Value::as_str) {
        return Value::String(ts.to_string());
    }
    if let Some(array) = value.get("arrayValue") {
        let items = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(from_firestore_value).collect())
            .unwrap_or_default();
        return Value::Array(items);
    }
    if let Some(map) = value.get("mapValue") {
        return from_firestore_fields(map.get("fields").unwrap_or(&Value::Null));
    }
    Value::Null
}
