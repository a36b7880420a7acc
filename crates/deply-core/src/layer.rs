//! Layer assembly: runs each layer's collectors and maps every collected
//! element to the layer that owns it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collector::{create_collector, CollectorBox, ElementSet};
use crate::config::{ConfigError, DeplyConfig};
use crate::source::SourceScope;
use crate::types::CodeElement;

/// A named set of elements and the collectors that produced it.
pub struct Layer {
    name: String,
    elements: ElementSet,
    collectors: Vec<CollectorBox>,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name)
            .field("elements", &self.elements.len())
            .field("collectors", &self.collectors.len())
            .finish()
    }
}

impl Layer {
    /// Creates a layer and populates it by unioning the results of all
    /// `collectors`.
    #[must_use]
    pub fn new(name: impl Into<String>, collectors: Vec<CollectorBox>) -> Self {
        let name = name.into();
        let mut elements = ElementSet::new();
        for collector in &collectors {
            let collected = collector.collect();
            debug!(
                "Layer {}: {} collected {} elements",
                name,
                collector.name(),
                collected.len()
            );
            elements.extend(collected);
        }
        Self {
            name,
            elements,
            collectors,
        }
    }

    /// Layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every element the layer's collectors admitted.
    #[must_use]
    pub fn elements(&self) -> &ElementSet {
        &self.elements
    }

    /// The collectors that populated this layer.
    #[must_use]
    pub fn collectors(&self) -> &[CollectorBox] {
        &self.collectors
    }
}

/// All layers of a run plus the element → layer index.
#[derive(Debug, Default)]
pub struct Layers {
    layers: Vec<Layer>,
    owners: BTreeMap<CodeElement, String>,
}

impl Layers {
    /// Builds and populates every configured layer in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a collector entry is invalid.
    pub fn assemble(config: &DeplyConfig, scope: &Arc<SourceScope>) -> Result<Self, ConfigError> {
        let mut layers = Vec::with_capacity(config.layers.len());
        for layer_config in &config.layers {
            let collectors = layer_config
                .collectors
                .iter()
                .map(|c| create_collector(c, scope))
                .collect::<Result<Vec<_>, _>>()?;
            layers.push(Layer::new(layer_config.name.clone(), collectors));
        }
        Ok(Self::from_layers(layers))
    }

    /// Indexes already populated layers. When two layers claim the same
    /// element, the later one owns it.
    #[must_use]
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let mut owners = BTreeMap::new();
        for layer in &layers {
            for element in &layer.elements {
                if let Some(previous) = owners.insert(element.clone(), layer.name.clone()) {
                    if previous != layer.name {
                        warn!(
                            "{} is collected by layers '{}' and '{}'; assigning it to '{}'",
                            element, previous, layer.name, layer.name
                        );
                    }
                }
            }
            info!("Layer {}: {} elements", layer.name, layer.elements.len());
        }
        Self { layers, owners }
    }

    /// Name of the layer that owns `element`.
    #[must_use]
    pub fn layer_of(&self, element: &CodeElement) -> Option<&str> {
        self.owners.get(element).map(String::as_str)
    }

    /// Every element that belongs to some layer, with its owner.
    pub fn assignments(&self) -> impl Iterator<Item = (&CodeElement, &str)> {
        self.owners.iter().map(|(e, l)| (e, l.as_str()))
    }

    /// Every element that belongs to some layer.
    pub fn elements(&self) -> impl Iterator<Item = &CodeElement> {
        self.owners.keys()
    }

    /// Number of elements that belong to some layer.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.owners.len()
    }

    /// Layers in configuration order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up a layer by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }
}
