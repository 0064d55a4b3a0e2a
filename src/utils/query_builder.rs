use std::collections::HashMap;

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::FindOptions;

const RESERVED_KEYS: [&str; 5] = ["searchTerm", "sort", "page", "limit", "fields"];
const DEFAULT_SORT: &str = "-createdAt";
const DEFAULT_LIMIT: i64 = 10;

/// Filter and find options built from list-endpoint query parameters.
#[derive(Debug)]
pub struct ListQuery {
    pub filter: Document,
    pub options: FindOptions,
}

/// Builds a find query from `searchTerm`, `sort`, `page`, `limit`, `fields`
/// and equality filters on any remaining key. `base` is merged into the filter.
pub fn build_list_query(params: &HashMap<String, String>, searchable: &[&str], base: Document) -> ListQuery {
    let mut filter = base;

    if let Some(term) = params.get("searchTerm").map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !searchable.is_empty() {
            let pattern = escape_regex(term);
            let clauses: Vec<Bson> = searchable
                .iter()
                .map(|field| {
                    let mut clause = Document::new();
                    clause.insert(*field, doc! { "$regex": pattern.clone(), "$options": "i" });
                    Bson::Document(clause)
                })
                .collect();
            filter.insert("$or", clauses);
        }
    }

    let mut keys: Vec<&String> = params.keys().filter(|k| !RESERVED_KEYS.contains(&k.as_str())).collect();
    keys.sort();
    for key in keys {
        if key.starts_with('$') {
            continue;
        }
        filter.insert(key.clone(), equality_value(&params[key]));
    }

    let sort = parse_sort(params.get("sort").map(String::as_str).unwrap_or(DEFAULT_SORT));
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<i64>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LIMIT);
    let page = params
        .get("page")
        .and_then(|p| p.parse::<u64>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let projection = params.get("fields").map(|f| parse_projection(f)).filter(|p| !p.is_empty());

    let options = FindOptions::builder()
        .sort(sort)
        .skip((page - 1) * limit as u64)
        .limit(limit)
        .projection(projection)
        .build();

    ListQuery { filter, options }
}

/// `"-createdAt,name"` -> `{ createdAt: -1, name: 1 }`
pub fn parse_sort(sort: &str) -> Document {
    let mut out = Document::new();
    for field in sort.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        match field.strip_prefix('-') {
            Some(name) if !name.is_empty() => out.insert(name, -1),
            Some(_) => None,
            None => out.insert(field, 1),
        };
    }
    if out.is_empty() {
        out.insert("createdAt", -1);
    }
    out
}

pub fn parse_projection(fields: &str) -> Document {
    let mut out = Document::new();
    for field in fields.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        match field.strip_prefix('-') {
            Some(name) if !name.is_empty() => out.insert(name, 0),
            Some(_) => None,
            None => out.insert(field, 1),
        };
    }
    out
}

/// Query strings carry no types, so a value that also reads as a number,
/// boolean or id matches either representation.
fn equality_value(raw: &str) -> Bson {
    let mut candidates = vec![Bson::String(raw.to_string())];
    match raw {
        "true" => candidates.push(Bson::Boolean(true)),
        "false" => candidates.push(Bson::Boolean(false)),
        _ => {
            if let Ok(n) = raw.parse::<f64>() {
                if n.is_finite() {
                    candidates.push(Bson::Double(n));
                }
            }
            if raw.len() == 24 {
                if let Ok(id) = ObjectId::parse_str(raw) {
                    candidates.push(Bson::ObjectId(id));
                }
            }
        }
    }
    if candidates.len() == 1 {
        candidates.remove(0)
    } else {
        Bson::Document(doc! { "$in": candidates })
    }
}

fn escape_regex(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
