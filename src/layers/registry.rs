//! Read-only project and layer configuration
//!
//! Projects are declared in order; the ones carrying both a source and a layer
//! descriptor can be mounted as previews, the rest (custom renderers) are only
//! listed as markers.

use crate::core::geo::LatLng;
use crate::{Error, Result};
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;

/// Source descriptor handed to the facade as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl SourceSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }
}

/// Layer descriptor; paint/layout/filter keys stay opaque
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        rename = "source-layer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_layer: Option<String>,
    #[serde(flatten)]
    pub style: Map<String, Value>,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            source: None,
            source_layer: None,
            style: Map::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A project as declared in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerSpec>,
    /// Tag for projects drawn by a custom renderer instead of a map layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
}

impl ProjectConfig {
    pub fn position(&self) -> LatLng {
        LatLng::from_lng_lat(self.coordinates)
    }
}

/// A mountable project: one source plus one layer
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayerConfig {
    pub id: String,
    pub label: String,
    pub unit: String,
    pub info: String,
    pub source: SourceSpec,
    pub layer: LayerSpec,
}

impl ProjectLayerConfig {
    fn from_project(project: &ProjectConfig) -> Option<Self> {
        match (&project.source, &project.layer) {
            (Some(source), Some(layer)) => Some(Self {
                id: project.id.clone(),
                label: project.title.clone(),
                unit: project.unit.clone(),
                info: project.info.clone(),
                source: source.clone(),
                layer: layer.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: Vec<ProjectConfig>,
    layers: Vec<ProjectLayerConfig>,
}

impl ProjectRegistry {
    pub fn new(projects: Vec<ProjectConfig>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for project in &projects {
            if !seen.insert(project.id.as_str()) {
                return Err(Error::DuplicateProject(project.id.clone()));
            }
        }

        let layers = projects
            .iter()
            .filter_map(ProjectLayerConfig::from_project)
            .collect();

        Ok(Self { projects, layers })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let projects: Vec<ProjectConfig> = serde_json::from_str(json)?;
        Self::new(projects)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn projects(&self) -> &[ProjectConfig] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Mountable projects, in declaration order
    pub fn layers(&self) -> &[ProjectLayerConfig] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&ProjectLayerConfig> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Ids of every mountable project
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.id.as_str())
    }

    /// Copy of the project's layer renamed to `<id><suffix>` and bound to the
    /// source registered under the project id
    pub fn preview_layer(&self, id: &str, suffix: &str) -> Option<LayerSpec> {
        self.layer(id).map(|config| LayerSpec {
            id: format!("{}{}", id, suffix),
            source: Some(id.to_string()),
            ..config.layer.clone()
        })
    }

    /// GeoJSON point collection feeding the base marker layer
    pub fn marker_collection(&self) -> Value {
        let features: Vec<Value> = self
            .projects
            .iter()
            .map(|p| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": p.coordinates },
                    "properties": {
                        "id": p.id,
                        "title": p.title,
                        "description": p.description,
                        "unit": p.unit,
                        "info": p.info,
                        "category": p.category,
                        "year": p.year,
                        "preview": p.preview,
                        "zoom": p.zoom,
                        "pitch": p.pitch,
                        "renderer": p.renderer,
                    }
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
