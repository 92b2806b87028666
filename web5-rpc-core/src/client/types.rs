use crate::http_transport::service::DataStream;
use bytes::Bytes;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned, ser::SerializeMap,
};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// The DID operations a transport client can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DidRpcMethod {
    #[serde(rename = "did.create")]
    Create,
    #[serde(rename = "did.resolve")]
    Resolve,
}

impl DidRpcMethod {
    /// Returns the JSON-RPC method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DidRpcMethod::Create => "did.create",
            DidRpcMethod::Resolve => "did.resolve",
        }
    }
}

impl std::fmt::Display for DidRpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for a DID operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidRpcRequest {
    /// The DID operation to perform.
    pub method: DidRpcMethod,
    /// The URL of the server handling the request.
    pub url: String,
    /// Opaque request payload, sent as `params.data`.
    pub data: String,
}

/// Outcome status reported by a DID server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    pub code: i64,
    pub message: String,
}

/// The `result` of a DID JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidRpcResponse {
    pub ok: bool,
    pub status: RpcStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A request to be processed by a DWN server.
#[derive(Debug, Clone, PartialEq)]
pub struct DwnRpcRequest {
    /// The URL of the DWN server the request is sent to.
    pub dwn_url: String,
    /// The DID the message is addressed to.
    pub target_did: String,
    /// The DWN message, in its serialized JSON form.
    pub message: Value,
    /// Optional raw payload sent as the HTTP body.
    pub data: Option<Bytes>,
}

impl DwnRpcRequest {
    /// Creates a request carrying `message` for `target_did`, without a payload.
    pub fn new(dwn_url: impl Into<String>, target_did: impl Into<String>, message: Value) -> Self {
        Self {
            dwn_url: dwn_url.into(),
            target_did: target_did.into(),
            message,
            data: None,
        }
    }

    /// Attaches a raw payload to the request.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Status of a DWN reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwnReplyStatus {
    pub code: i64,
    pub detail: String,
    /// Any other status field, kept verbatim.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl DwnReplyStatus {
    /// Creates a status without extra fields.
    pub fn new(code: i64, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
            other: Map::new(),
        }
    }
}

/// The reply of a DWN server to a processed message.
///
/// Covers the generic message reply (`status`, `entries`, `cursor`) and the records-read
/// reply (`record`). A member only lands in its typed field when it is present, non-null and
/// well-formed. Everything else (unknown fields, explicit nulls, members of an unexpected
/// shape) is kept verbatim in `other`, so serializing a reply gives back what the server sent.
#[derive(Debug, Default)]
pub struct DwnRpcResponse {
    pub status: Option<DwnReplyStatus>,
    pub entries: Option<Vec<Value>>,
    pub cursor: Option<Value>,
    pub record: Option<DwnRecord>,
    pub other: Map<String, Value>,
}

impl DwnRpcResponse {
    /// Creates a reply holding only a status.
    pub fn with_status(status: DwnReplyStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Sets `record.data` to the given stream, creating the record if the reply has none.
    ///
    /// Any data already present at `record.data` is replaced.
    pub fn attach_record_data(&mut self, stream: DataStream) {
        if let Some(Value::Null) = self.other.get("record") {
            self.other.remove("record");
        }
        self.record.get_or_insert_with(DwnRecord::default).data = Some(RecordData::Stream(stream));
    }

    /// Moves the record payload out of the reply, if there is one.
    pub fn take_record_data(&mut self) -> Option<RecordData> {
        self.record.as_mut().and_then(|record| record.data.take())
    }
}

impl<'de> Deserialize<'de> for DwnRpcResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut other: Map<String, Value> = Map::deserialize(deserializer)?;

        Ok(Self {
            status: take_typed(&mut other, "status"),
            entries: take_typed(&mut other, "entries"),
            cursor: take_typed(&mut other, "cursor"),
            record: take_typed(&mut other, "record"),
            other,
        })
    }
}

impl Serialize for DwnRpcResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if let Some(status) = &self.status {
            map.serialize_entry("status", status)?;
        }
        if let Some(entries) = &self.entries {
            map.serialize_entry("entries", entries)?;
        }
        if let Some(cursor) = &self.cursor {
            map.serialize_entry("cursor", cursor)?;
        }
        if let Some(record) = &self.record {
            map.serialize_entry("record", record)?;
        }

        let typed = [
            ("status", self.status.is_some()),
            ("entries", self.entries.is_some()),
            ("cursor", self.cursor.is_some()),
            ("record", self.record.is_some()),
        ];
        for (key, value) in &self.other {
            if !typed.iter().any(|(name, set)| *set && name == key) {
                map.serialize_entry(key, value)?;
            }
        }

        map.end()
    }
}

/// A record returned by a records-read reply.
#[derive(Debug, Default)]
pub struct DwnRecord {
    /// The record payload.
    pub data: Option<RecordData>,
    /// Every other record field (`descriptor`, `recordId`, `authorization`, ...).
    pub fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for DwnRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;
        let data = take_typed(&mut fields, "data").map(RecordData::Inline);

        Ok(Self { data, fields })
    }
}

impl Serialize for DwnRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if let Some(data) = &self.data {
            map.serialize_entry("data", data)?;
        }
        for (key, value) in &self.fields {
            if !(self.data.is_some() && key == "data") {
                map.serialize_entry(key, value)?;
            }
        }

        map.end()
    }
}

// Moves `key` out of `map` when it holds a non-null `T`; anything else stays where it is.
fn take_typed<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key).filter(|value| !value.is_null())?;
    let typed = T::deserialize(value).ok()?;
    map.remove(key);
    Some(typed)
}

/// The payload of a [`DwnRecord`].
pub enum RecordData {
    /// Data that came inside the JSON reply.
    Inline(Value),
    /// Data streamed in the HTTP response body, not yet consumed.
    Stream(DataStream),
}

impl RecordData {
    /// Returns the stream if the data was streamed.
    pub fn into_stream(self) -> Option<DataStream> {
        match self {
            RecordData::Stream(stream) => Some(stream),
            RecordData::Inline(_) => None,
        }
    }

    /// Whether the data is an unconsumed stream rather than inline JSON.
    pub fn is_stream(&self) -> bool {
        matches!(self, RecordData::Stream(_))
    }
}

impl Debug for RecordData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordData::Inline(value) => f.debug_tuple("Inline").field(value).finish(),
            RecordData::Stream(stream) => f.debug_tuple("Stream").field(stream).finish(),
        }
    }
}

// A stream has no JSON form; it serializes as null and must be taken out beforehand.
impl Serialize for RecordData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordData::Inline(value) => value.serialize(serializer),
            RecordData::Stream(_) => serializer.serialize_none(),
        }
    }
}
