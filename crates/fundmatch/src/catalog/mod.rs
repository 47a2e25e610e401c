mod domain;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

pub use domain::{
    Decisiveness, FundingBounds, Program, RequirementCategory, RequirementItem, RequirementValue,
    ValueRange,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read program catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("program catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("program catalog must be a JSON array or an object with a `programs` array")]
    Shape,
}

/// Read-only program list shared by every session.
#[derive(Debug, Clone)]
pub struct ProgramCatalog {
    programs: Arc<[Program]>,
}

impl ProgramCatalog {
    pub fn new(programs: Vec<Program>) -> Self {
        Self {
            programs: programs.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), programs = catalog.len(), "loaded program catalog");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_value(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_value(document)
    }

    /// Entries that do not deserialize as a program are skipped with a warning.
    pub fn from_value(document: Value) -> Result<Self, CatalogError> {
        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove("programs") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(CatalogError::Shape),
            },
            _ => return Err(CatalogError::Shape),
        };

        let mut programs = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Program>(entry) {
                Ok(program) => {
                    warn_unstructured(&program);
                    programs.push(program);
                }
                Err(err) => warn!(index, error = %err, "skipping malformed program entry"),
            }
        }

        Ok(Self::new(programs))
    }

    pub fn programs(&self) -> Arc<[Program]> {
        Arc::clone(&self.programs)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.id == id)
    }
}

fn warn_unstructured(program: &Program) {
    for (category, items) in &program.categorized_requirements {
        for item in items.iter().filter(|item| item.value.as_text().is_none()) {
            warn!(
                program = %program.id,
                %category,
                kind = %item.kind,
                "requirement value without a readable shape will be ignored"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wrapped_and_bare_arrays() {
        let bare = ProgramCatalog::from_json_str(r#"[{"id":"a","name":"A"}]"#).expect("bare array");
        assert_eq!(bare.len(), 1);

        let wrapped =
            ProgramCatalog::from_json_str(r#"{"programs":[{"id":"a","name":"A"},{"id":"b","name":"B"}]}"#)
                .expect("wrapped array");
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped.get("b").map(|program| program.name.as_str()), Some("B"));
    }

    #[test]
    fn skips_entries_that_are_not_programs() {
        let catalog = ProgramCatalog::from_json_str(r#"[{"id":"a","name":"A"},{"name":"missing id"},42]"#)
            .expect("catalog loads");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn noisy_requirement_items_do_not_drop_programs() {
        let catalog = ProgramCatalog::from_json_str(
            r#"[
                {
                    "id": "textual-confidence",
                    "name": "Textual confidence",
                    "region": "Austria",
                    "categorized_requirements": {
                        "geographic": [{"type": "location", "value": "Austria", "confidence": "high"}],
                        "team": [{"type": null, "value": "at least 2", "confidence": 0.6}, "free text rule"]
                    }
                },
                {
                    "id": "null-category",
                    "name": "Null category",
                    "funding_types": null,
                    "funding_amount": {"min": "50000", "max": null},
                    "categorized_requirements": {
                        "impact": null,
                        "eligibility": [{"type": "company_type", "value": "SME", "confidence": 0.9}]
                    }
                }
            ]"#,
        )
        .expect("catalog loads");
        assert_eq!(catalog.len(), 2);

        let textual = catalog.get("textual-confidence").expect("program kept");
        let location = &textual.requirements(&RequirementCategory::Geographic)[0];
        assert_eq!(location.decisiveness(), Decisiveness::Hard);
        let team = textual.requirements(&RequirementCategory::Team);
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].kind, "");

        let nulls = catalog.get("null-category").expect("program kept");
        assert!(nulls.funding_types.is_empty());
        assert!(nulls.requirements(&RequirementCategory::Impact).is_empty());
        assert_eq!(nulls.requirements(&RequirementCategory::Eligibility).len(), 1);
        assert_eq!(nulls.funding_amount.as_ref().and_then(|bounds| bounds.min), Some(50_000.0));
    }

    #[test]
    fn rejects_documents_without_programs() {
        assert!(matches!(
            ProgramCatalog::from_json_str(r#"{"items":[]}"#),
            Err(CatalogError::Shape)
        ));
        assert!(matches!(ProgramCatalog::from_json_str("not json"), Err(CatalogError::Json(_))));
        assert!(matches!(
            ProgramCatalog::from_path("/definitely/missing/catalog.json"),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn parses_snake_case_pipeline_output() {
        let catalog = ProgramCatalog::from_json_str(
            r#"[{
                "id": "aws-preseed",
                "name": "Preseed",
                "type": "grant",
                "funding_types": ["grant"],
                "funding_amount": {"min": 0, "max": 100000, "currency": "EUR"},
                "categorized_requirements": {
                    "geographic": [{"type": "location", "value": "Austria", "confidence": 0.9}],
                    "team": [{"type": "team_size", "value": {"min": 2}, "confidence": 0.6}],
                    "impact": [{"type": "impact", "value": {"kpis": ["jobs"]}}]
                }
            }]"#,
        )
        .expect("catalog loads");

        let program = catalog.get("aws-preseed").expect("program");
        assert_eq!(program.funding_types, vec!["grant".to_string()]);
        assert_eq!(program.requirements(&RequirementCategory::Geographic).len(), 1);
        let team = &program.requirements(&RequirementCategory::Team)[0];
        assert_eq!(
            team.value,
            RequirementValue::Range(ValueRange { min: Some(2.0), max: None })
        );
        let impact = &program.requirements(&RequirementCategory::Impact)[0];
        assert!(matches!(impact.value, RequirementValue::Unstructured(_)));
    }
}
