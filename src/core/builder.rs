//! Builder for fluent [`TerrainMap`] configuration

use crate::{
    core::{
        config::MapConfig,
        geo::{Point, Size},
        map::TerrainMap,
        viewport::ViewState,
    },
    input::events::MapEvent,
    Result,
};

type Listener = (String, Box<dyn Fn(&MapEvent) + Send + Sync>);

/// Builder for creating and configuring [`TerrainMap`] instances
#[derive(Default)]
pub struct TerrainMapBuilder {
    config: Option<MapConfig>,
    config_json: Option<String>,
    min_scale: Option<f64>,
    max_scale: Option<f64>,
    detail_threshold: Option<f64>,
    view: Option<ViewState>,
    size: Option<Size>,
    host_origin: Option<Point>,
    listeners: Vec<Listener>,
}

impl TerrainMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Configuration as JSON; parsed and validated in [`build`](Self::build)
    pub fn with_config_json(mut self, json: impl Into<String>) -> Self {
        self.config_json = Some(json.into());
        self
    }

    pub fn with_scale_limits(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = Some(min_scale);
        self.max_scale = Some(max_scale);
        self
    }

    pub fn with_detail_threshold(mut self, threshold: f64) -> Self {
        self.detail_threshold = Some(threshold);
        self
    }

    /// View applied before any scene is rendered
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_host_origin(mut self, origin: Point) -> Self {
        self.host_origin = Some(origin);
        self
    }

    pub fn on<F>(mut self, event_type: &str, callback: F) -> Self
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .push((event_type.to_string(), Box::new(callback)));
        self
    }

    pub fn build(self) -> Result<TerrainMap> {
        let mut config = match (self.config, self.config_json) {
            (_, Some(json)) => MapConfig::from_json_str(&json)?,
            (Some(config), None) => config,
            (None, None) => MapConfig::default(),
        };
        if let (Some(min), Some(max)) = (self.min_scale, self.max_scale) {
            config = config.with_scale_limits(min, max);
        }
        if let Some(threshold) = self.detail_threshold {
            config = config.with_detail_threshold(threshold);
        }

        let mut map = TerrainMap::new(config)?;
        for (event_type, callback) in self.listeners {
            map.on(&event_type, callback);
        }
        if let Some(origin) = self.host_origin {
            map.set_host_origin(origin);
        }
        if let Some(size) = self.size {
            map.resize(size);
        }
        if let Some(view) = self.view {
            map.set_view(view);
        }
        Ok(map)
    }
}
