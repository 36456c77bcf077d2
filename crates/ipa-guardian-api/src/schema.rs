// Response schema declarations for structured output
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive types understood by the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// Shape the service must produce, in its own wire format
///
/// Built with the helper constructors and then refined:
/// `Schema::string().with_description("...").with_enum(["a", "b"])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Field order the service should emit; a BTreeMap alone would sort them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl Schema {
    fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            enum_values: Vec::new(),
            nullable: None,
            items: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            property_ordering: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    pub fn array(items: Schema) -> Self {
        let mut schema = Self::of(SchemaType::Array);
        schema.items = Some(Box::new(items));
        schema
    }

    /// Object whose properties are all required, in the given order
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let mut schema = Self::of(SchemaType::Object);
        for (name, property) in properties {
            let name = name.into();
            schema.required.push(name.clone());
            schema.property_ordering.push(name.clone());
            schema.properties.insert(name, property);
        }
        schema
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    /// Look up a property of an object schema
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.get(name)
    }
}
