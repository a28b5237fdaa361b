#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Definition of the normalized output model.
//!
//! These structs are built once per run from the input documents and serialized as the
//! grouped endpoints artifact. Field names serialize in camelCase so the artifact reads
//! the same as the description documents it came from.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The normalized kind of a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `object`; carries `properties`.
    Object,
    /// `array`; carries `items`.
    Array,
    /// `union`; carries `oneOf`.
    Union,
}

impl FieldType {
    /// Maps a declared JSON Schema `type` keyword to a field type.
    ///
    /// Unknown or missing types fall back to `Object`.
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword {
            Some("integer") => FieldType::Integer,
            Some("number") => FieldType::Number,
            Some("string") => FieldType::String,
            Some("boolean") => FieldType::Boolean,
            Some("array") => FieldType::Array,
            _ => FieldType::Object,
        }
    }
}

/// `additionalProperties` of an object field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`
    Allowed(bool),
    /// `additionalProperties: { schema }`
    Schema(Box<SchemaField>),
}

/// One normalized property.
///
/// The shape member (`items`, `properties`, `oneOf`) always agrees with `ty`;
/// use the constructors rather than building the struct by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    /// Property name (or `items` / `<parent>_variant_<n>` for nested positions).
    pub name: String,
    /// Normalized kind.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Declared `format` (e.g. `uuid`, `int64`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Declared description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the enclosing object lists this property as required.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Allowed values, in declaration order.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Element schema, present iff `ty` is `Array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaField>>,
    /// Nested properties, present iff `ty` is `Object`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaField>>,
    /// Map-value schema or flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Union members, present iff `ty` is `Union`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaField>>,
}

impl SchemaField {
    fn bare(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            format: None,
            description: None,
            required: false,
            enum_values: None,
            items: None,
            properties: None,
            additional_properties: None,
            one_of: None,
        }
    }

    /// A scalar field (`integer`, `number`, `string`, `boolean`).
    ///
    /// Shape-carrying kinds are routed to their own constructors with empty shapes.
    pub fn scalar(name: impl Into<String>, ty: FieldType) -> Self {
        match ty {
            FieldType::Object => Self::object(name, IndexMap::new()),
            FieldType::Array => Self::array(name, Self::object("items", IndexMap::new())),
            FieldType::Union => Self::union(name, Vec::new()),
            _ => Self::bare(name, ty),
        }
    }

    /// An object field with the given properties.
    pub fn object(name: impl Into<String>, properties: IndexMap<String, SchemaField>) -> Self {
        let mut field = Self::bare(name, FieldType::Object);
        field.properties = Some(properties);
        field
    }

    /// An array field with the given element schema.
    pub fn array(name: impl Into<String>, items: SchemaField) -> Self {
        let mut field = Self::bare(name, FieldType::Array);
        field.items = Some(Box::new(items));
        field
    }

    /// A union field with the given members.
    pub fn union(name: impl Into<String>, variants: Vec<SchemaField>) -> Self {
        let mut field = Self::bare(name, FieldType::Union);
        field.one_of = Some(variants);
        field
    }

    /// Sets the description, returning self.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// One normalized named type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaType {
    /// Type name (reference name, `title`, or `Object`).
    pub name: String,
    /// Declared description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flattened fields keyed by property name.
    #[serde(default)]
    pub fields: IndexMap<String, SchemaField>,
    /// Required field names, de-duplicated in first-seen order.
    #[serde(default)]
    pub required: IndexSet<String>,
    /// Variants of a discriminated union.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaType>>,
}

impl SchemaType {
    /// A type carrying only its name. Used to cut reference cycles.
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Drops required names with no matching field and syncs per-field flags.
    ///
    /// Union types keep their declared list untouched since variants own their fields.
    pub(crate) fn reconcile_required(&mut self) {
        if self.one_of.is_none() {
            let fields = &self.fields;
            self.required.retain(|name| fields.contains_key(name));
        }
        for (name, field) in self.fields.iter_mut() {
            field.required = self.required.contains(name);
        }
    }
}

/// HTTP methods recognized under a path item, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `get`
    Get,
    /// `post`
    Post,
    /// `put`
    Put,
    /// `delete`
    Delete,
    /// `patch`
    Patch,
    /// `options`
    Options,
    /// `head`
    Head,
}

impl HttpMethod {
    /// All recognized methods in the order operations are extracted.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// The lower-case key used in path items.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Case-insensitive, so artifacts written with `GET` still load.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown HTTP method: {}", s))
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single operation reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Declared `operationId`, or one synthesized from method and path.
    pub operation_id: String,
    /// Templated path, e.g. `/pets/{id}`.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
}

impl Endpoint {
    /// True when both endpoints address the same route.
    pub fn same_route(&self, other: &Endpoint) -> bool {
        self.path == other.path && self.method == other.method
    }
}

/// All endpoints sharing one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedEndpointGroup {
    /// PascalCase identifier derived from the tag.
    pub table_name: String,
    /// Endpoints in insertion order, unique by (path, method).
    pub endpoints: Vec<Endpoint>,
    /// Name of the representative type, when one was inferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,
    /// The representative type itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaType>,
}

impl TaggedEndpointGroup {
    /// An empty group for the given table name.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            endpoints: Vec::new(),
            underlying_type: None,
            schema: None,
        }
    }
}

/// Tag name -> group, in first-seen tag order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedEndpoints(pub IndexMap<String, TaggedEndpointGroup>);

impl GroupedEndpoints {
    /// Iterates groups as `(tag, group)`.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TaggedEndpointGroup> {
        self.0.iter()
    }

    /// Looks up a group by tag.
    pub fn get(&self, tag: &str) -> Option<&TaggedEndpointGroup> {
        self.0.get(tag)
    }

    /// Number of tag groups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no group exists.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of endpoints across all groups.
    pub fn total_endpoints(&self) -> usize {
        self.0.values().map(|g| g.endpoints.len()).sum()
    }
}
