//! JSON-Schema-ish documents ⇄ shapes.
//!
//! Only the structural keywords are read: `type`, `properties`, `items`,
//! `prefixItems`, `minItems`, `oneOf`, `anyOf`, `$ref`, `$defs` and
//! `definitions`. Everything else is ignored and scalar schemas become leaves.
//! Tuples are read from `prefixItems` or from the older array form of `items`.
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{Definitions, Key, Shape};
use crate::error::SchemaError;
use crate::keypaths::{Enumerator, Options, PathSet};

/// Name under which a root-recursive schema (`"$ref": "#"`) stores its root.
const ROOT_REF: &str = "#";

/// A root shape together with the named shapes it may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub root: Shape,
    pub defs: Definitions,
}

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENT MODEL
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    #[serde(rename = "type")]
    ty: Option<TypeNames>,
    properties: Option<IndexMap<String, Sub>>,
    items: Option<Items>,
    prefix_items: Option<Vec<Sub>>,
    min_items: Option<u64>,
    one_of: Option<Vec<Sub>>,
    any_of: Option<Vec<Sub>>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(rename = "$defs")]
    defs: Option<IndexMap<String, Sub>>,
    definitions: Option<IndexMap<String, Sub>>,
}

/// A subschema: a schema object, or `true` (anything) / `false` (nothing).
#[derive(Debug)]
enum Sub {
    Bool(bool),
    Node(Box<Node>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeNames {
    One(String),
    Many(Vec<String>),
}

/// `items`: the older positional array form, or one schema for every element.
#[derive(Debug)]
enum Items {
    Tuple(Vec<Sub>),
    One(Sub),
}

// Hand-written so that errors inside a subschema keep their document path;
// `#[serde(untagged)]` buffers the input and reports only "no variant matched".
impl<'de> Deserialize<'de> for Sub {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        de.deserialize_any(SubVisitor)
    }
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        de.deserialize_any(ItemsVisitor)
    }
}

struct SubVisitor;

impl<'de> Visitor<'de> for SubVisitor {
    type Value = Sub;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a schema object or a boolean")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Sub, E> {
        Ok(Sub::Bool(b))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Sub, A::Error> {
        Node::deserialize(MapAccessDeserializer::new(map)).map(|n| Sub::Node(Box::new(n)))
    }
}

struct ItemsVisitor;

impl<'de> Visitor<'de> for ItemsVisitor {
    type Value = Items;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a schema object, a boolean or an array of schemas")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Items, E> {
        Ok(Items::One(Sub::Bool(b)))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Items, A::Error> {
        SubVisitor.visit_map(map).map(Items::One)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Items, A::Error> {
        Vec::<Sub>::deserialize(SeqAccessDeserializer::new(seq)).map(Items::Tuple)
    }
}

impl TypeNames {
    fn has(&self, name: &str) -> bool {
        match self {
            TypeNames::One(t) => t == name,
            TypeNames::Many(ts) => ts.iter().any(|t| t == name),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let de = &mut serde_json::Deserializer::from_str(src);
        let doc: Sub = serde_path_to_error::deserialize(de).map_err(malformed)?;
        Self::from_document(doc)
    }
}

impl Schema {
    pub fn new(root: Shape) -> Self {
        Self { root, defs: Definitions::default() }
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let doc: Sub = serde_path_to_error::deserialize(value).map_err(malformed)?;
        Self::from_document(doc)
    }

    fn from_document(doc: Sub) -> Result<Self, SchemaError> {
        match doc {
            Sub::Bool(_) => Ok(Self::new(Shape::Leaf)),
            Sub::Node(node) => Self::from_node(*node),
        }
    }

    fn from_node(mut node: Node) -> Result<Self, SchemaError> {
        let mut named = IndexMap::<String, Sub>::new();
        named.extend(node.definitions.take().unwrap_or_default());
        named.extend(node.defs.take().unwrap_or_default());

        let mut refs = BTreeSet::<String>::new();
        let mut defs = Definitions::new();
        for (name, def) in &named {
            defs.insert(name.clone(), lower_sub(def, &mut refs)?);
        }
        let root = lower_node(&node, &mut refs)?;

        for reference in &refs {
            let name = ref_name(reference)?;
            if name == ROOT_REF {
                if !defs.contains(ROOT_REF) {
                    defs.insert(ROOT_REF, root.clone());
                }
            } else if !defs.contains(&name) {
                return Err(SchemaError::UnknownDefinition { reference: reference.clone(), name });
            }
        }
        Ok(Self { root, defs })
    }

    /// Key paths of the root shape.
    pub fn key_paths(&self, options: Options) -> PathSet {
        Enumerator::new(&self.defs).enumerate(&self.root, options.start())
    }

    /// JSON-Schema-ish rendering, loadable again with `from_str`/`from_value`.
    pub fn to_json(&self) -> Value {
        let mut out = emit(&self.root);
        let named: Map<String, Value> = self
            .defs
            .iter()
            .filter(|(name, _)| *name != ROOT_REF)
            .map(|(name, shape)| (name.to_owned(), emit(shape)))
            .collect();
        if !named.is_empty() {
            // every emitted shape is a JSON object
            if let Value::Object(obj) = &mut out {
                obj.insert("$defs".into(), Value::Object(named));
            }
        }
        out
    }
}

fn malformed<E: fmt::Display>(err: serde_path_to_error::Error<E>) -> SchemaError {
    SchemaError::Malformed {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}

/// `false` is only meaningful where it removes something (`items`, a property,
/// a `oneOf` arm); anywhere else both booleans are plain leaves.
fn lower_sub(sub: &Sub, refs: &mut BTreeSet<String>) -> Result<Shape, SchemaError> {
    match sub {
        Sub::Bool(_) => Ok(Shape::Leaf),
        Sub::Node(node) => lower_node(node, refs),
    }
}

fn lower_node(node: &Node, refs: &mut BTreeSet<String>) -> Result<Shape, SchemaError> {
    if let Some(reference) = &node.reference {
        // validate eagerly so the error names the offending $ref
        let name = ref_name(reference)?;
        refs.insert(reference.clone());
        return Ok(Shape::Ref(name));
    }

    let mut arms = Vec::<Shape>::new();

    let is_object = match &node.ty {
        Some(ty) => ty.has("object"),
        None => node.properties.is_some(),
    };
    let is_array = match &node.ty {
        Some(ty) => ty.has("array"),
        None => node.items.is_some() || node.prefix_items.is_some(),
    };

    if is_array {
        let positional = match (&node.prefix_items, &node.items) {
            (Some(prefix), _) => Some(prefix),
            (None, Some(Items::Tuple(elems))) => Some(elems),
            _ => None,
        };
        // a single `items` schema covers every position after the prefix
        let rest = match &node.items {
            Some(Items::One(Sub::Bool(false))) | Some(Items::Tuple(_)) => None,
            Some(Items::One(item)) => Some(lower_sub(item, refs)?),
            None if positional.is_none() => Some(Shape::Leaf),
            None => None,
        };
        if let Some(elems) = positional {
            let elems = elems.iter().map(|e| lower_sub(e, refs)).collect::<Result<Vec<_>, _>>()?;
            let min_items = node.min_items.unwrap_or(0).min(elems.len() as u64) as usize;
            arms.push(Shape::Tuple { elems, min_items });
        }
        match rest {
            Some(item) => arms.push(Shape::list(item)),
            // `items: false` without a prefix: always empty
            None if positional.is_none() => arms.push(Shape::tuple(Vec::new())),
            None => {}
        }
    }

    if is_object {
        let mut fields = Vec::new();
        for (name, child) in node.properties.iter().flatten() {
            if matches!(child, Sub::Bool(false)) {
                continue;
            }
            fields.push(super::Field { key: Key::Str(name.clone()), shape: lower_sub(child, refs)? });
        }
        arms.push(Shape::Object { fields });
    }

    for alternatives in [&node.one_of, &node.any_of].into_iter().flatten() {
        for alt in alternatives {
            if matches!(alt, Sub::Bool(false)) {
                continue;
            }
            arms.push(lower_sub(alt, refs)?);
        }
    }

    Ok(Shape::union(arms))
}

/// Definition name targeted by a local `$ref`.
fn ref_name(reference: &str) -> Result<String, SchemaError> {
    if reference == ROOT_REF {
        return Ok(ROOT_REF.to_owned());
    }
    let raw = reference
        .strip_prefix("#/$defs/")
        .or_else(|| reference.strip_prefix("#/definitions/"))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .ok_or_else(|| SchemaError::UnsupportedRef(reference.to_owned()))?;
    Ok(raw.replace("~1", "/").replace("~0", "~"))
}

// ————————————————————————————————————————————————————————————————————————————
// EMISSION
// ————————————————————————————————————————————————————————————————————————————

fn emit(shape: &Shape) -> Value {
    match shape {
        Shape::Leaf => json!({}),
        Shape::Object { fields } => {
            let mut props = Map::new();
            for field in fields {
                if let Some(name) = field.key.path_name() {
                    props.insert(name.into_owned(), emit(&field.shape));
                }
            }
            json!({ "type": "object", "properties": props })
        }
        Shape::Tuple { elems, min_items } => json!({
            "type": "array",
            "prefixItems": elems.iter().map(emit).collect::<Vec<_>>(),
            "minItems": min_items,
            "maxItems": elems.len(),
        }),
        Shape::List { item } => json!({ "type": "array", "items": emit(item) }),
        Shape::Union(arms) => json!({ "oneOf": arms.iter().map(emit).collect::<Vec<_>>() }),
        Shape::Ref(name) if name == ROOT_REF => json!({ "$ref": ROOT_REF }),
        Shape::Ref(name) => {
            let escaped = name.replace('~', "~0").replace('/', "~1");
            json!({ "$ref": format!("#/$defs/{escaped}") })
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
