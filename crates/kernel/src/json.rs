#![forbid(unsafe_code)]

//! Recursive walks over [`serde_json::Value`] trees.

use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a document, e.g. `Players[0].PlayerInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Callback for [`walk`]: receives every object with its location.
pub trait Visitor<'a> {
    fn visit_object(&mut self, path: &JsonPath, object: &'a Map<String, Value>);
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(&JsonPath, &'a Map<String, Value>),
{
    fn visit_object(&mut self, path: &JsonPath, object: &'a Map<String, Value>) {
        self(path, object)
    }
}

/// Depth-first walk calling `visitor` for every object, outermost first.
pub fn walk<'a>(value: &'a Value, visitor: &mut impl Visitor<'a>) {
    fn go<'a>(value: &'a Value, path: &mut JsonPath, visitor: &mut impl Visitor<'a>) {
        match value {
            Value::Object(object) => {
                visitor.visit_object(path, object);
                for (key, child) in object {
                    path.push(PathSegment::Key(key.clone()));
                    go(child, path, visitor);
                    path.pop();
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    go(child, path, visitor);
                    path.pop();
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    go(value, &mut JsonPath::default(), visitor);
}

/// Every occurrence of `key` in objects of the tree, with the location of
/// the owning object.
pub fn find_key<'a>(value: &'a Value, key: &str) -> Vec<(JsonPath, &'a Value)> {
    let mut found = Vec::new();
    walk(value, &mut |path: &JsonPath, object: &'a Map<String, Value>| {
        if let Some(hit) = object.get(key) {
            found.push((path.clone(), hit));
        }
    });
    found
}

/// Key form accepted by document stores: every `$` becomes `_` (`$type` ->
/// `_type`, `a$b` -> `a_b`), and a resulting `_id` becomes `id_` so it does
/// not collide with the primary key.
pub fn storable_key(key: &str) -> String {
    let key = key.replace('$', "_");
    if key == "_id" { "id_".to_owned() } else { key }
}

/// Rewrite every object key in the tree with [`storable_key`].
pub fn rewrite_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, child)| (storable_key(&key), rewrite_keys(child)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(rewrite_keys).collect()),
        scalar => scalar,
    }
}
