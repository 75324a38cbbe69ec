//! Canonical JSON + hash de contenido.
//!
//! Los snapshots de auditoría estampan un hash del contenido tal como el
//! usuario lo vio; si el contenido vivo cambia después, el hash delata la
//! diferencia. La forma canónica ordena las claves de objetos para que el
//! hash no dependa del orden de serialización.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree
                .into_iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(&k).unwrap(), v))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

/// Hashea la forma canónica de un valor JSON y devuelve hex (sha256).
pub fn content_hash(value: &Value) -> String {
    let canonical = to_canonical_json(value);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
