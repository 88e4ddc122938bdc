//! Runtime settings, overridable from the page URL (`?progress=0.4&gui=0`).

use log::LevelFilter;

use crate::error::DemoError;
use crate::viewport::SQUARE_ASPECT;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub canvas_selector: String,
    pub target_aspect: f32,
    pub max_pixel_ratio: f64,
    pub initial_progress: f32,
    pub show_gui: bool,
    pub log_level: LevelFilter,
    pub matcap_one: String,
    pub matcap_two: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas.webgl".into(),
            target_aspect: SQUARE_ASPECT,
            max_pixel_ratio: 2.0,
            initial_progress: 0.0,
            show_gui: true,
            log_level: LevelFilter::Info,
            matcap_one: "./textures/matcaps/7.png".into(),
            matcap_two: "./textures/matcaps/2.png".into(),
        }
    }
}

impl DemoConfig {
    /// Query keys understood by [`DemoConfig::apply`].
    pub const QUERY_KEYS: [&'static str; 5] = ["progress", "aspect", "pixelRatio", "gui", "log"];

    /// Applies a single `key=value` override. Unknown keys are ignored.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), DemoError> {
        let invalid = || DemoError::invalid(key, value);
        match key {
            "progress" => {
                let v: f32 = value.trim().parse().map_err(|_| invalid())?;
                if !(0.0..=1.0).contains(&v) {
                    return Err(invalid());
                }
                self.initial_progress = v;
            }
            "aspect" => self.target_aspect = positive(value).ok_or_else(invalid)? as f32,
            "pixelRatio" => self.max_pixel_ratio = positive(value).ok_or_else(invalid)?,
            "gui" => {
                self.show_gui = match value.trim() {
                    "1" | "true" => true,
                    "0" | "false" => false,
                    _ => return Err(invalid()),
                }
            }
            "log" => self.log_level = value.trim().parse().map_err(|_| invalid())?,
            _ => {}
        }
        Ok(())
    }

    /// Builds a config from query pairs, keeping defaults for rejected values.
    /// Returns the config together with every rejected override.
    pub fn from_pairs<'a, I>(pairs: I) -> (Self, Vec<DemoError>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        let rejected = pairs
            .into_iter()
            .filter_map(|(k, v)| config.apply(k, v).err())
            .collect();
        (config, rejected)
    }
}

fn positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
