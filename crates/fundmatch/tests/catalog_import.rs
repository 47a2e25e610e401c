use std::path::PathBuf;

use fundmatch::catalog::{CatalogError, ProgramCatalog, RequirementCategory, RequirementValue};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/programs.json")
}

#[test]
fn loads_pipeline_export_and_skips_malformed_entries() {
    let catalog = ProgramCatalog::from_path(fixture()).expect("fixture catalog loads");
    assert_eq!(catalog.len(), 4, "entry without id should be skipped");

    let ffg = catalog.get("ffg-general-programmes").expect("ffg program present");
    assert_eq!(ffg.funding_types, vec!["grant".to_string(), "loan".to_string()]);
    let eligibility = ffg.requirements(&RequirementCategory::Eligibility);
    assert!(matches!(eligibility[0].value, RequirementValue::List(ref kinds) if kinds.len() == 3));
    assert_eq!(ffg.requirements(&RequirementCategory::CoFinancing).len(), 1);
}

#[test]
fn unreadable_requirement_shapes_are_kept_but_unstructured() {
    let catalog = ProgramCatalog::from_path(fixture()).expect("fixture catalog loads");
    let eic = catalog.get("eic-accelerator").expect("eic program present");
    let impact = eic.requirements(&RequirementCategory::Impact);
    assert_eq!(impact.len(), 1);
    assert!(matches!(impact[0].value, RequirementValue::Unstructured(_)));
    assert!(impact[0].value.as_text().is_none());
}

#[test]
fn missing_file_reports_its_path() {
    let err = ProgramCatalog::from_path("does/not/exist.json").expect_err("missing file fails");
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("does/not/exist.json"));
}
