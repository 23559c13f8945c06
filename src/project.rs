// src/project.rs
//! Read-mostly snapshot of the host project: layers, group tree, flags.
//!
//! The host constructs and owns this model; the checker borrows it for one
//! pass and only mutates the handful of fields touched by fix-mode rules
//! (simplification flag, datasource string, trust-metadata flag).

use crate::datasource::{DataSourceDescriptor, ProviderKind};
use crate::error::{CheckerError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Geometry-less table.
    None,
    Point,
    /// Lines, polygons, collections — anything simplifiable.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Provider-declared type name, e.g. `int8`, `varchar`.
    pub type_name: String,
}

impl Field {
    #[must_use]
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorProperties {
    pub geometry: GeometryKind,
    pub fields: Vec<Field>,
    /// Attribute names of the declared primary key: 0, 1 or more entries.
    pub primary_key_attributes: Vec<String>,
    /// True when geometry simplification is forced to run client-side.
    pub simplify_force_local: bool,
}

impl Default for VectorProperties {
    fn default() -> Self {
        Self {
            geometry: GeometryKind::Other,
            fields: Vec::new(),
            primary_key_attributes: Vec::new(),
            simplify_force_local: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterProperties {
    pub has_pyramids: bool,
    pub width: u64,
    pub height: u64,
}

impl RasterProperties {
    /// Total pixel count, the size measure for the pyramid rule.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.width.saturating_mul(self.height)
    }
}

/// Kind tag plus kind-specific payload; rules match on this before touching
/// any kind-specific field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    Vector(VectorProperties),
    Raster(RasterProperties),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Stable id, unique within the project.
    pub id: String,
    /// Display name; may carry stray whitespace, which the checker flags.
    pub name: String,
    /// Provider key, e.g. `postgres`, `ogr`, `gdal`.
    pub provider: String,
    /// Raw connection string as the provider stores it.
    pub source: String,
    pub kind: LayerKind,
}

impl Layer {
    #[must_use]
    pub fn is_vector(&self) -> bool {
        matches!(self.kind, LayerKind::Vector(_))
    }

    #[must_use]
    pub fn is_raster(&self) -> bool {
        matches!(self.kind, LayerKind::Raster(_))
    }

    /// True for vector layers served by PostgreSQL. With `geometry_check`
    /// set, geometry-less tables are excluded as well.
    #[must_use]
    pub fn is_vector_postgres(&self, geometry_check: bool) -> bool {
        let LayerKind::Vector(ref vector) = self.kind else {
            return false;
        };
        if ProviderKind::classify(&self.provider) != ProviderKind::Postgres {
            return false;
        }
        if geometry_check && vector.geometry == GeometryKind::None {
            return false;
        }
        true
    }

    #[must_use]
    pub fn vector(&self) -> Option<&VectorProperties> {
        match self.kind {
            LayerKind::Vector(ref vector) => Some(vector),
            LayerKind::Raster(_) => None,
        }
    }

    #[must_use]
    pub fn raster(&self) -> Option<&RasterProperties> {
        match self.kind {
            LayerKind::Raster(ref raster) => Some(raster),
            LayerKind::Vector(_) => None,
        }
    }

    /// Parses the connection string into its structured form. Lenient; never
    /// fails.
    #[must_use]
    pub fn datasource(&self) -> DataSourceDescriptor {
        DataSourceDescriptor::parse(&self.source)
    }

    /// Replaces the connection string from a descriptor. This is the explicit
    /// refresh step fix rules go through after editing a descriptor, so the
    /// provider-facing string and the structured view never diverge.
    pub fn set_datasource(&mut self, descriptor: &DataSourceDescriptor) {
        self.source = descriptor.to_connection_string(true);
    }

    /// Filesystem path of a file-based layer, decoded from the source string.
    /// `None` for database and other non-file providers.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        crate::datasource::decode_file_path(&self.provider, &self.source)
    }
}

/// One node of the legend tree: either a reference to a layer held in the
/// project's layer table, or a nested group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Layer(String),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub children: Vec<TreeNode>,
}

impl Group {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn add_layer(&mut self, layer_id: &str) {
        self.children.push(TreeNode::Layer(layer_id.to_string()));
    }

    pub fn add_group(&mut self, group: Group) {
        self.children.push(TreeNode::Group(group));
    }
}

/// The project snapshot handed over by the host.
#[derive(Debug, Clone)]
pub struct Project {
    base_directory: PathBuf,
    layers: BTreeMap<String, Layer>,
    root: Group,
    trust_metadata: bool,
}

impl Project {
    /// Creates an empty project anchored at `base_directory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory is not absolute; relative-path
    /// safety cannot be decided against a relative anchor.
    pub fn new(base_directory: impl Into<PathBuf>) -> Result<Self> {
        let base_directory = base_directory.into();
        if !base_directory.is_absolute() {
            return Err(CheckerError::RelativeBaseDirectory {
                path: base_directory,
            });
        }
        Ok(Self {
            base_directory,
            layers: BTreeMap::new(),
            root: Group::new(""),
            trust_metadata: false,
        })
    }

    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Registers a layer. A second layer with the same id replaces the first.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.insert(layer.id.clone(), layer);
    }

    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.get_mut(id)
    }

    /// All layers, in deterministic (id) order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    #[must_use]
    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    #[must_use]
    pub fn trust_metadata(&self) -> bool {
        self.trust_metadata
    }

    pub fn set_trust_metadata(&mut self, trust: bool) {
        self.trust_metadata = trust;
    }
}
