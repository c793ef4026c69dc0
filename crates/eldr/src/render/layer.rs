//! Render layers and the service that owns them.
//!
//! A layer is a named drawing plane with its own coordinate [`Space`] and
//! clear policy. Layers draw in registration order within a frame, so
//! "background" then "gameplay" then "ui" composites the way a painter would
//! stack them.

use std::collections::HashMap;

use log::info;

use crate::error::LayerNotFoundError;
use crate::space::Space;

/// Whether a layer wipes itself at the start of its pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearStrategy {
    #[default]
    Clear,
    /// Keep last frame's contents. Useful for trail effects and for layers
    /// drawn over by an earlier layer's pass.
    Preserve,
}

/// A named drawing plane.
#[derive(Debug)]
pub struct RenderLayer {
    name: String,
    pub space: Space,
    pub clear_strategy: ClearStrategy,
    /// RGBA, components in [0, 1].
    pub clear_color: [f64; 4],
}

impl RenderLayer {
    pub fn new(name: &str, width: f32, height: f32) -> Self {
        Self {
            name: name.to_string(),
            space: Space::new(width, height),
            clear_strategy: ClearStrategy::Clear,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn with_clear_strategy(mut self, strategy: ClearStrategy) -> Self {
        self.clear_strategy = strategy;
        self
    }

    pub fn with_clear_color(mut self, color: [f64; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry of render layers, keyed by name.
///
/// Also tracks the window size so layers can follow window resizes by
/// default while still allowing a fixed-size layer (pixel-art viewports).
pub struct LayerService {
    layers: HashMap<String, RenderLayer>,
    /// Registration order; layers draw in this order.
    order: Vec<String>,
    window_size: (f32, f32),
}

impl LayerService {
    pub fn new(window_width: f32, window_height: f32) -> Self {
        Self {
            layers: HashMap::new(),
            order: Vec::new(),
            window_size: (window_width, window_height),
        }
    }

    /// Register a layer sized to the current window.
    pub fn register(&mut self, name: &str) -> &mut RenderLayer {
        self.register_layer(RenderLayer::new(name, self.window_size.0, self.window_size.1))
    }

    /// Register a pre-built layer. Re-registering a name replaces the layer
    /// but keeps its original position in draw order.
    pub fn register_layer(&mut self, layer: RenderLayer) -> &mut RenderLayer {
        let name = layer.name().to_string();
        info!("registering render layer `{name}`");
        if !self.layers.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.layers.insert(name.clone(), layer);
        self.layers.get_mut(&name).unwrap()
    }

    pub fn get_layer(&self, name: &str) -> Result<&RenderLayer, LayerNotFoundError> {
        self.layers
            .get(name)
            .ok_or_else(|| LayerNotFoundError(name.to_string()))
    }

    pub fn get_layer_mut(&mut self, name: &str) -> Result<&mut RenderLayer, LayerNotFoundError> {
        self.layers
            .get_mut(name)
            .ok_or_else(|| LayerNotFoundError(name.to_string()))
    }

    /// Layer names in draw order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn window_size(&self) -> (f32, f32) {
        self.window_size
    }

    /// Record a new window size. Call [`resize_all_layers`](Self::resize_all_layers)
    /// to propagate it.
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window_size = (width, height);
    }

    /// Resize every layer's space. `size` of `None` means "follow the
    /// window"; `Some` forces an explicit size on all layers.
    pub fn resize_all_layers(&mut self, size: Option<(f32, f32)>) {
        let (width, height) = size.unwrap_or(self.window_size);
        for layer in self.layers.values_mut() {
            layer.space.set_size(width, height);
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_layer_is_an_error() {
        let service = LayerService::new(800.0, 600.0);
        let err = service.get_layer("background").unwrap_err();
        assert_eq!(err.to_string(), "Layer background not found");
    }

    #[test]
    fn registered_layer_matches_window_size() {
        let mut service = LayerService::new(800.0, 600.0);
        service.register("background");
        let layer = service.get_layer("background").unwrap();
        assert_eq!(layer.space.width(), 800.0);
        assert_eq!(layer.space.height(), 600.0);
    }

    #[test]
    fn names_preserve_registration_order() {
        let mut service = LayerService::new(800.0, 600.0);
        service.register("background");
        service.register("gameplay");
        service.register("ui");
        assert_eq!(service.names(), ["background", "gameplay", "ui"]);
    }

    #[test]
    fn resize_follows_window_by_default() {
        let mut service = LayerService::new(800.0, 600.0);
        service.register("a");
        service.register("b");

        service.set_window_size(1024.0, 768.0);
        service.resize_all_layers(None);

        for name in ["a", "b"] {
            let layer = service.get_layer(name).unwrap();
            assert_eq!(layer.space.width(), 1024.0);
            assert_eq!(layer.space.height(), 768.0);
        }
    }

    #[test]
    fn resize_with_explicit_size_overrides_window() {
        let mut service = LayerService::new(800.0, 600.0);
        service.register("pixel-art");
        service.resize_all_layers(Some((320.0, 240.0)));

        let layer = service.get_layer("pixel-art").unwrap();
        assert_eq!(layer.space.width(), 320.0);
        assert_eq!(layer.space.height(), 240.0);
    }
}
