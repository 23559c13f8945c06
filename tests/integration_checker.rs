// tests/integration_checker.rs
//! Full-bundle pass over a project exercising several rules at once.

use anyhow::Result;
use cartocheck::checks::Checker;
use cartocheck::config::CheckerConfig;
use cartocheck::project::{
    Field, GeometryKind, Group, Layer, LayerKind, Project, RasterProperties, VectorProperties,
};
use cartocheck::types::CheckCategory;
use std::fs;

fn sample_project() -> Result<Project> {
    let root = tempfile::tempdir()?;
    // Keep the tempdir alive for the duration of the test process.
    let base = root.keep();

    let mut project = Project::new(&base)?;

    // PostgreSQL layer with a service file and a stale bigint key.
    project.add_layer(Layer {
        id: "pg1".to_string(),
        name: "Roads ".to_string(),
        provider: "postgres".to_string(),
        source: "service='prod' key='id' table=\"p\".\"roads\"".to_string(),
        kind: LayerKind::Vector(VectorProperties {
            geometry: GeometryKind::Other,
            fields: vec![Field::new("id", "int8")],
            primary_key_attributes: vec!["id".to_string()],
            simplify_force_local: true,
        }),
    });

    // Big raster without pyramids inside the project folder.
    let raster_path = base.join("ortho.tif");
    fs::write(&raster_path, b"tif")?;
    project.add_layer(Layer {
        id: "r1".to_string(),
        name: "Ortho".to_string(),
        provider: "gdal".to_string(),
        source: raster_path.to_string_lossy().into_owned(),
        kind: LayerKind::Raster(RasterProperties {
            has_pyramids: false,
            width: 20_000,
            height: 20_000,
        }),
    });

    // Two layers over one datasource, different filters, duplicated name.
    for (id, filter) in [("f1", "a = 1"), ("f2", "a = 2")] {
        project.add_layer(Layer {
            id: id.to_string(),
            name: "Filtered".to_string(),
            provider: "postgres".to_string(),
            source: format!("dbname='gis' table=\"p\".\"t\" sql={filter}"),
            kind: LayerKind::Vector(VectorProperties {
                geometry: GeometryKind::Other,
                ..VectorProperties::default()
            }),
        });
    }

    project.root_mut().add_layer("pg1");
    project.root_mut().add_layer("r1");
    let mut group = Group::new("Filtered");
    group.add_layer("f1");
    group.add_layer("f2");
    project.root_mut().add_group(group);

    Ok(project)
}

fn checker() -> Result<Checker> {
    let mut config = CheckerConfig::new();
    config.prevent_service = true;
    Ok(Checker::new(config)?)
}

#[test]
fn test_review_bundles_every_rule_family() -> Result<()> {
    let project = sample_project()?;
    let report = checker()?.review(&project);

    assert!(report.has_findings());
    assert_eq!(report.safeguards.len(), 2);
    let categories: Vec<CheckCategory> = report
        .safeguards
        .iter()
        .map(|finding| finding.category)
        .collect();
    assert!(categories.contains(&CheckCategory::PgService));
    assert!(categories.contains(&CheckCategory::RasterWithoutPyramid));

    assert!(report.autogenerated_keys.is_empty());
    assert_eq!(report.int8_primary_keys.len(), 1);

    assert_eq!(report.duplicated_names.get("Filtered"), Some(&3));
    assert!(report.duplicated_filters.is_some());
    assert_eq!(report.trailing_names.len(), 1);
    assert_eq!(report.legend_items.len(), 5);

    assert_eq!(report.simplification.len(), 1);
    assert!(report.estimated_metadata.len() >= 1);
    assert!(!report.trust_metadata);
    assert_eq!(report.fixed_count(), 0);
    Ok(())
}

#[test]
fn test_repair_fixes_and_marks() -> Result<()> {
    let mut project = sample_project()?;
    let report = checker()?.repair(&mut project);

    assert!(report.trust_metadata);
    assert!(report.simplification.iter().all(|finding| finding.fixed));
    assert!(report.estimated_metadata.iter().all(|finding| finding.fixed));
    assert!(report.fixed_count() >= 2);

    // Non-fixable findings are reported but untouched.
    assert!(report.safeguards.iter().all(|finding| !finding.fixed));

    // A second repair pass finds nothing left to fix.
    let report = checker()?.repair(&mut project);
    assert!(report.simplification.is_empty());
    assert!(report.estimated_metadata.is_empty());
    Ok(())
}

#[test]
fn test_report_serializes_to_json() -> Result<()> {
    let project = sample_project()?;
    let report = checker()?.review(&project);

    let json = serde_json::to_value(&report)?;
    assert!(json.get("safeguards").is_some());
    assert!(json.get("duplicated_names").is_some());
    assert_eq!(
        json["int8_primary_keys"][0]["category"],
        serde_json::json!("InvalidInt8PrimaryKey")
    );
    Ok(())
}
