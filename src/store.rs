use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::models::{
    coerce_points, coerce_points_str, new_id, truncate_name, Assignment, Category,
};

/// Loads the assignment list from the blob file. A missing file, an
/// unparseable blob, or a blob that is not an array all degrade to an empty
/// list; individual records are sanitized field by field.
pub fn load(path: &Path) -> Vec<Assignment> {
    match std::fs::read_to_string(path) {
        Ok(raw) => parse_blob(&raw),
        Err(_) => Vec::new(),
    }
}

pub fn save(path: &Path, assignments: &[Assignment]) -> anyhow::Result<()> {
    let blob = serde_json::to_string_pretty(assignments)?;
    std::fs::write(path, blob)
        .with_context(|| format!("failed to write store file {}", path.display()))?;
    Ok(())
}

pub fn parse_blob(raw: &str) -> Vec<Assignment> {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return Vec::new();
    };
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| !item.is_null())
        .map(sanitize_record)
        .collect()
}

fn sanitize_record(value: &Value) -> Assignment {
    let id = match value.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => new_id(),
    };
    let name = value.get("name").and_then(Value::as_str).unwrap_or("");
    let category = value
        .get("type")
        .and_then(Value::as_str)
        .map_or(Category::Formative, Category::parse_or_default);

    Assignment {
        id,
        name: truncate_name(name),
        category,
        earned: coerce_point_value(value.get("earned")),
        possible: coerce_point_value(value.get("possible")),
    }
}

fn coerce_point_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => coerce_points(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => coerce_points_str(s),
        _ => 0.0,
    }
}

pub fn remove(assignments: &mut Vec<Assignment>, id: &str) -> bool {
    let before = assignments.len();
    assignments.retain(|a| a.id != id);
    assignments.len() != before
}

/// Field-level edit: the raw value is sanitized per the field's coercion
/// rule before it is stored.
pub fn update_field(
    assignments: &mut [Assignment],
    id: &str,
    field: &str,
    value: &str,
) -> anyhow::Result<()> {
    let assignment = assignments
        .iter_mut()
        .find(|a| a.id == id)
        .with_context(|| format!("no assignment with id {id}"))?;

    match field {
        "name" => assignment.name = truncate_name(value),
        "category" => assignment.category = Category::parse_or_default(value),
        "earned" => assignment.earned = coerce_points_str(value),
        "possible" => assignment.possible = coerce_points_str(value),
        other => anyhow::bail!("unknown field {other}"),
    }
    Ok(())
}

pub fn import_csv(csv_path: &Path) -> anyhow::Result<Vec<Assignment>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<String>,
        name: Option<String>,
        category: Option<String>,
        earned: Option<String>,
        possible: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut imported = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        imported.push(Assignment {
            id: row.id.filter(|s| !s.is_empty()).unwrap_or_else(new_id),
            name: truncate_name(row.name.as_deref().unwrap_or("")),
            category: Category::parse_or_default(row.category.as_deref().unwrap_or("")),
            earned: coerce_points_str(row.earned.as_deref().unwrap_or("")),
            possible: coerce_points_str(row.possible.as_deref().unwrap_or("")),
        });
    }

    Ok(imported)
}

/// Inserts sample assignments with fixed ids, skipping ids already present.
pub fn seed(assignments: &mut Vec<Assignment>) -> usize {
    let samples = [
        ("seed-001", "Vocabulary Check", Category::Formative, 9.0, 10.0),
        ("seed-002", "Unit 1 Quiz", Category::Minor, 27.0, 30.0),
        ("seed-003", "Sample Assignment", Category::Major, 45.0, 50.0),
    ];

    let mut inserted = 0;
    for (id, name, category, earned, possible) in samples {
        if assignments.iter().any(|a| a.id == id) {
            continue;
        }
        assignments.push(Assignment {
            id: id.to_string(),
            name: name.to_string(),
            category,
            earned,
            possible,
        });
        inserted += 1;
    }
    inserted
}
