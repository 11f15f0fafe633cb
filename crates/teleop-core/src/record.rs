use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single typed value carried in an observation or action field.
///
/// The tagged representation doubles as the wire encoding, so an environment,
/// the remote policy service, and any recording subscriber all agree on what
/// a field looks like without sharing code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    Scalar {
        value: f64,
    },
    Vector {
        values: Vec<f64>,
    },
    Text {
        value: String,
    },
    /// Raw interleaved pixel data, row-major, `channels` bytes per pixel.
    Image {
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    },
}

impl Value {
    pub fn scalar(value: f64) -> Self {
        Value::Scalar { value }
    }

    pub fn vector(values: impl Into<Vec<f64>>) -> Self {
        Value::Vector {
            values: values.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Text {
            value: value.into(),
        }
    }

    pub fn image(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Self {
        Value::Image {
            width,
            height,
            channels,
            data,
        }
    }

    /// The vector payload, if this value is a vector.
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector { values } => Some(values),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar { value } => Some(*value),
            _ => None,
        }
    }
}

/// An immutable snapshot of the environment at one step: named fields
/// (sensor images, joint state, ...) tagged with the schema convention the
/// producing environment follows.
///
/// Only environments (and the wire decoder replaying what an environment
/// produced) construct observations; everything else reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    schema: String,
    fields: BTreeMap<String, Value>,
}

impl Observation {
    pub fn new(schema: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Schema tag naming the environment/policy field convention, e.g.
    /// `"scripted/v1"`.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One control command: an immutable named-field record produced by an agent
/// and consumed by the environment and every subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    fields: BTreeMap<String, Value>,
}

impl Action {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Convenience constructor for the common single-field command.
    pub fn single(name: impl Into<String>, value: Value) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(name.into(), value);
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered, fixed-length sequence of actions returned by one inference
/// call. Owned exclusively by the broker from the moment it is received
/// until its last dispensed element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionChunk {
    actions: Vec<Action>,
}

impl ActionChunk {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}
