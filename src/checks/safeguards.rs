// src/checks/safeguards.rs
//! Per-layer safeguard pass: unsafe publishing configurations.
//!
//! Rules run in a fixed order per layer. A PostgreSQL layer that trips a
//! credential rule short-circuits the rest of its rules: leaked or
//! misplaced credentials outrank every other problem the same layer could
//! have.

use crate::collector::ResultCollector;
use crate::config::CheckerConfig;
use crate::paths::{PathSafetyEvaluator, PathVerdict};
use crate::project::{Layer, Project};
use crate::types::{CheckCategory, Entity};

/// Whether the remaining safeguard rules still run for the current layer.
enum RuleFlow {
    Continue,
    ShortCircuit,
}

pub fn run(project: &Project, config: &CheckerConfig, collector: &mut ResultCollector) {
    for layer in project.layers() {
        run_layer(project, layer, config, collector);
    }
}

fn run_layer(
    project: &Project,
    layer: &Layer,
    config: &CheckerConfig,
    collector: &mut ResultCollector,
) {
    let entity = Entity::layer(&layer.name, &layer.id);

    ecw_rule(layer, config, collector, &entity);

    if layer.is_vector_postgres(false) {
        if let RuleFlow::ShortCircuit = credential_rules(layer, config, collector, &entity) {
            return;
        }
    }

    file_rules(project, layer, config, collector, entity);
}

fn ecw_rule(
    layer: &Layer,
    config: &CheckerConfig,
    collector: &mut ResultCollector,
    entity: &Entity,
) {
    if !config.prevent_ecw || !layer.is_raster() {
        return;
    }
    if layer.source.to_ascii_lowercase().ends_with("ecw") {
        collector.record(entity.clone(), CheckCategory::PreventEcw);
    }
}

fn credential_rules(
    layer: &Layer,
    config: &CheckerConfig,
    collector: &mut ResultCollector,
    entity: &Entity,
) -> RuleFlow {
    let uri = layer.datasource();

    if !uri.authcfg.is_empty() && config.prevent_auth_config {
        collector.record(entity.clone(), CheckCategory::AuthenticationDb);
        return RuleFlow::ShortCircuit;
    }

    if !uri.service.is_empty() && config.prevent_service {
        collector.record(entity.clone(), CheckCategory::PgService);
        return RuleFlow::ShortCircuit;
    }

    if uri.service.is_empty() {
        let managed_host =
            !config.cloud_domain.is_empty() && uri.host.ends_with(&config.cloud_domain);
        if managed_host || config.force_pg_user_pass {
            if uri.user.is_empty() || uri.password.is_empty() {
                collector.record(entity.clone(), CheckCategory::PgForceUserPass);
            }
            // Credentials were inspected either way; nothing further
            // applies to this layer.
            return RuleFlow::ShortCircuit;
        }
    }

    RuleFlow::Continue
}

fn file_rules(
    project: &Project,
    layer: &Layer,
    config: &CheckerConfig,
    collector: &mut ResultCollector,
    entity: Entity,
) {
    let Some(path) = layer.file_path() else {
        return;
    };

    // Missing and unprobeable paths (virtual/streamed sources, platform
    // path-syntax errors) are skipped; existence is the host's concern.
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) | Err(_) => return,
    }

    let evaluator = PathSafetyEvaluator::new(
        project.base_directory(),
        config.allow_parent_folder,
        &config.parent_folder,
        config.prevent_other_drive,
        config.cloud_hosting,
    );

    match evaluator.evaluate(&path) {
        PathVerdict::CrossDrive { flagged: true } => {
            collector.record(entity, CheckCategory::PreventDrive);
            return;
        }
        // Known gap, preserved: with no drive policy enabled the layer is
        // skipped entirely, parent-folder rule included.
        PathVerdict::CrossDrive { flagged: false } => return,
        PathVerdict::ParentFolderEscape => {
            collector.record(entity.clone(), CheckCategory::PreventParentFolder);
        }
        PathVerdict::Contained => {}
    }

    pyramid_rule(layer, config, collector, entity);
}

fn pyramid_rule(
    layer: &Layer,
    config: &CheckerConfig,
    collector: &mut ResultCollector,
    entity: Entity,
) {
    let Some(raster) = layer.raster() else {
        return;
    };
    if !raster.has_pyramids && raster.cell_count() >= config.raster_cell_threshold {
        collector.record(entity, CheckCategory::RasterWithoutPyramid);
    }
}
