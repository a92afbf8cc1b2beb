use serde_json::Value;

/// Default depth searched for a vector in a provider response
pub const DEFAULT_SEARCH_DEPTH: usize = 5;

/// Find the first non-empty, all-numeric array in `value`.
///
/// Every element must also fit in a finite `f32`; arrays that overflow are
/// skipped like any other non-vector.
///
/// Walks depth-first in document order. The root sits at depth 0 and nodes
/// deeper than `max_depth` are never inspected, so malformed or hostile
/// payloads cost at most a bounded walk.
pub fn extract_vector(value: &Value, max_depth: usize) -> Option<Vec<f32>> {
    search(value, 0, max_depth)
}

fn search(value: &Value, depth: usize, max_depth: usize) -> Option<Vec<f32>> {
    if depth > max_depth {
        return None;
    }

    match value {
        Value::Array(items) => {
            if let Some(vector) = as_numeric(items) {
                return Some(vector);
            }
            items
                .iter()
                .find_map(|item| search(item, depth + 1, max_depth))
        }
        Value::Object(map) => map
            .values()
            .find_map(|child| search(child, depth + 1, max_depth)),
        _ => None,
    }
}

fn as_numeric(items: &[Value]) -> Option<Vec<f32>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_f64().map(|n| n as f32).filter(|n| n.is_finite()))
        .collect()
}
