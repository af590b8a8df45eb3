use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::auth::FirebaseAuth;

const BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Minimal Firestore REST client: read and overwrite whole documents.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    auth: FirebaseAuth,
    project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Document {
    pub name: String,
    pub fields: Option<Map<String, Value>>,
    #[serde(rename = "updateTime")]
    pub update_time: Option<String>,
}

impl FirestoreClient {
    pub fn new(auth: FirebaseAuth, project_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            auth,
            project_id: project_id.into(),
        }
    }

    fn documents_base(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            BASE_URL, self.project_id
        )
    }

    /// Fetch a document. A missing document is `Ok(None)`.
    pub async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        let token = self.auth.get_id_token().await?;
        let url = format!("{}/{}", self.documents_base(), path);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("GET {} failed: {} - {}", path, status, body));
        }

        Ok(Some(resp.json().await?))
    }

    /// Replace every field of a document, creating it if needed.
    pub async fn set_document(&self, path: &str, fields: Map<String, Value>) -> Result<Document> {
        let token = self.auth.get_id_token().await?;
        let url = format!("{}/{}", self.documents_base(), path);

        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&token)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("PATCH {} failed: {} - {}", path, status, text));
        }

        Ok(resp.json().await?)
    }

    /// Read a document into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.get_document(path).await? {
            Some(doc) => decode_document(&doc).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite a document with `value`, which must serialize to an object.
    pub async fn set<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let fields = encode_fields(&serde_json::to_value(value)?)?;
        self.set_document(path, fields).await?;
        Ok(())
    }
}

/// Convert plain JSON into Firestore's typed value format.
pub fn encode_value(val: &Value) -> Value {
    match val {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({"integerValue": i.to_string()}),
            None => json!({"doubleValue": n.as_f64()}),
        },
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(arr) => {
            let values: Vec<Value> = arr.iter().map(encode_value).collect();
            json!({"arrayValue": {"values": values}})
        }
        Value::Object(map) => json!({"mapValue": {"fields": encode_map(map)}}),
    }
}

fn encode_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Encode a JSON object as document fields.
pub fn encode_fields(obj: &Value) -> Result<Map<String, Value>> {
    obj.as_object()
        .map(encode_map)
        .ok_or_else(|| anyhow!("document body must be a JSON object"))
}

/// Convert a Firestore typed value back into plain JSON.
pub fn decode_value(val: &Value) -> Value {
    let Some((kind, inner)) = val.as_object().and_then(|o| o.iter().next()) else {
        return val.clone();
    };
    match kind.as_str() {
        // integers arrive as strings
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map_or_else(|| inner.clone(), |n| json!(n)),
        "nullValue" => Value::Null,
        "mapValue" => inner
            .get("fields")
            .map_or_else(|| json!({}), decode_fields),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => inner.clone(),
    }
}

/// Decode document fields into a plain JSON object.
pub fn decode_fields(fields: &Value) -> Value {
    match fields.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), decode_value(v)))
                .collect(),
        ),
        None => Value::Null,
    }
}

/// Deserialize a document's fields into `T`.
pub fn decode_document<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    let fields = doc.fields.clone().unwrap_or_default();
    let plain = decode_fields(&Value::Object(fields));
    serde_json::from_value(plain).with_context(|| format!("decoding document {}", doc.name))
}
