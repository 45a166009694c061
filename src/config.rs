//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::WakeResult;
use crate::farm::aggregator::DEFAULT_AIR_DENSITY;
use crate::farm::{Turbine, WindFarm};
use crate::field::{Grid, GridCoord, WakeFieldParams};
use crate::io::field::read_field_csv;
use crate::layout::{LayoutEvaluator, SpacingPenalty};
use crate::power_curve::PowerCurve;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Point-model wind farm.
    #[serde(default)]
    pub farm: FarmConfig,
    /// Grid-model ambient field, wake parameters, and layout.
    #[serde(default)]
    pub field: FieldConfig,
    /// Tabulated power curve for the power study.
    #[serde(default)]
    pub power_curve: PowerCurveConfig,
    /// Weibull power study parameters.
    #[serde(default)]
    pub study: StudyConfig,
}

/// Global parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Point-model farm: flow parameters and turbine list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FarmConfig {
    /// Free-stream wind speed (m/s).
    pub free_stream_speed: f64,
    /// Wake expansion coefficient (-).
    pub wake_expansion: f64,
    /// Air density (kg/m³).
    pub air_density: f64,
    /// Turbines, in meters.
    pub turbines: Vec<TurbineConfig>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            free_stream_speed: 10.0,
            wake_expansion: 0.04,
            air_density: DEFAULT_AIR_DENSITY,
            turbines: grid_layout(3, 3, 500.0, 500.0, 0.0),
        }
    }
}

/// One turbine of the point-model farm.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurbineConfig {
    /// Position along the flow axis (m).
    pub x: f64,
    /// Lateral position (m).
    pub y: f64,
    /// Rotor diameter (m).
    pub rotor_diameter: f64,
    /// Thrust coefficient (0.0 to < 1.0).
    pub thrust_coefficient: f64,
    /// Rated power (kW).
    pub rated_power_kw: f64,
}

impl Default for TurbineConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotor_diameter: 80.0,
            thrust_coefficient: 0.8,
            rated_power_kw: 2000.0,
        }
    }
}

/// Grid-model configuration. Lengths and coordinates are in grid cells.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Number of rows (flow axis) of a uniform ambient field.
    pub rows: usize,
    /// Number of columns (lateral axis) of a uniform ambient field.
    pub cols: usize,
    /// Ambient wind speed of a uniform field (m/s).
    pub ambient_speed: f64,
    /// Optional CSV file with the ambient field; overrides rows/cols/ambient_speed.
    pub path: Option<PathBuf>,
    /// Rotor diameter (cells).
    pub rotor_diameter: f64,
    /// Thrust coefficient (0.0 to < 1.0).
    pub thrust_coefficient: f64,
    /// Wake expansion coefficient (-).
    pub wake_expansion: f64,
    /// Turbine cells as `[x, y]` (column, row).
    pub layout: Vec<[usize; 2]>,
    /// Minimum turbine spacing before the penalty applies (cells).
    pub min_spacing: f64,
    /// Penalty per cell of spacing shortfall.
    pub spacing_weight: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let params = WakeFieldParams::default();
        let spacing = SpacingPenalty::default();
        Self {
            rows: 200,
            cols: 200,
            ambient_speed: 11.0,
            path: None,
            rotor_diameter: params.rotor_diameter(),
            thrust_coefficient: params.thrust_coefficient(),
            wake_expansion: params.wake_expansion(),
            layout: vec![[50, 50], [120, 60], [80, 140]],
            min_spacing: spacing.min_spacing,
            spacing_weight: spacing.weight,
        }
    }
}

/// Tabulated power curve.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerCurveConfig {
    /// Wind-speed breakpoints, strictly increasing (m/s).
    pub speeds: Vec<f64>,
    /// Power at each breakpoint (kW).
    pub power_kw: Vec<f64>,
}

impl Default for PowerCurveConfig {
    fn default() -> Self {
        let curve = PowerCurve::reference();
        Self {
            speeds: curve.speeds_ms().to_vec(),
            power_kw: curve.power_values_kw().to_vec(),
        }
    }
}

/// Weibull power study parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudyConfig {
    /// Weibull shape parameter `k`.
    pub weibull_shape: f64,
    /// Weibull scale parameter `c` (m/s).
    pub weibull_scale: f64,
    /// Number of wind-speed samples.
    pub samples: usize,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            weibull_shape: 2.0,
            weibull_scale: 8.0,
            samples: 10_000,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"farm.free_stream_speed"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Regular `rows × cols` turbine grid; every other column shifted laterally
/// by `stagger` meters.
fn grid_layout(cols: usize, rows: usize, dx: f64, dy: f64, stagger: f64) -> Vec<TurbineConfig> {
    let mut turbines = Vec::with_capacity(cols * rows);
    for i in 0..cols {
        let shift = if i % 2 == 1 { stagger } else { 0.0 };
        for j in 0..rows {
            turbines.push(TurbineConfig {
                x: i as f64 * dx,
                y: j as f64 * dy + shift,
                ..TurbineConfig::default()
            });
        }
    }
    turbines
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a 3×3 grid at 500 m spacing.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            farm: FarmConfig::default(),
            field: FieldConfig::default(),
            power_curve: PowerCurveConfig::default(),
            study: StudyConfig::default(),
        }
    }

    /// Returns the aligned-pair preset: two turbines 300 m apart on the flow axis.
    pub fn aligned_pair() -> Self {
        Self {
            farm: FarmConfig {
                turbines: vec![
                    TurbineConfig::default(),
                    TurbineConfig {
                        x: 300.0,
                        ..TurbineConfig::default()
                    },
                ],
                ..FarmConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the staggered preset: middle column shifted by half a row.
    pub fn staggered() -> Self {
        Self {
            farm: FarmConfig {
                turbines: grid_layout(3, 3, 500.0, 500.0, 250.0),
                ..FarmConfig::default()
            },
            field: FieldConfig {
                layout: vec![[40, 20], [100, 20], [160, 20], [70, 110], [130, 110]],
                ..FieldConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "aligned_pair", "staggered"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "aligned_pair" => Ok(Self::aligned_pair()),
            "staggered" => Ok(Self::staggered()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// A relative `field.path` is resolved against the scenario file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(field_path), Some(dir)) = (cfg.field.path.as_mut(), path.parent()) {
            if field_path.is_relative() {
                *field_path = dir.join(&*field_path);
            }
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let farm = &self.farm;
        if !(farm.free_stream_speed > 0.0) {
            errors.push(ConfigError::new("farm.free_stream_speed", "must be > 0"));
        }
        if !(farm.wake_expansion > 0.0) {
            errors.push(ConfigError::new("farm.wake_expansion", "must be > 0"));
        }
        if !(farm.air_density > 0.0) {
            errors.push(ConfigError::new("farm.air_density", "must be > 0"));
        }
        for (i, t) in farm.turbines.iter().enumerate() {
            if !(t.rotor_diameter > 0.0) {
                errors.push(ConfigError::new(
                    format!("farm.turbines[{i}].rotor_diameter"),
                    "must be > 0",
                ));
            }
            if !(0.0..1.0).contains(&t.thrust_coefficient) {
                errors.push(ConfigError::new(
                    format!("farm.turbines[{i}].thrust_coefficient"),
                    "must be in [0.0, 1.0)",
                ));
            }
            if !(t.rated_power_kw > 0.0) {
                errors.push(ConfigError::new(
                    format!("farm.turbines[{i}].rated_power_kw"),
                    "must be > 0",
                ));
            }
            if let Some(j) = farm.turbines[..i]
                .iter()
                .position(|o| o.x == t.x && o.y == t.y)
            {
                errors.push(ConfigError::new(
                    format!("farm.turbines[{i}]"),
                    format!("same position as farm.turbines[{j}] ({}, {})", t.x, t.y),
                ));
            }
        }

        let field = &self.field;
        if field.path.is_none() {
            if field.rows == 0 {
                errors.push(ConfigError::new("field.rows", "must be > 0"));
            }
            if field.cols == 0 {
                errors.push(ConfigError::new("field.cols", "must be > 0"));
            }
            if !field.ambient_speed.is_finite() || field.ambient_speed < 0.0 {
                errors.push(ConfigError::new(
                    "field.ambient_speed",
                    "must be finite and >= 0",
                ));
            }
            for (i, [x, y]) in field.layout.iter().enumerate() {
                if *x >= field.cols || *y >= field.rows {
                    errors.push(ConfigError::new(
                        format!("field.layout[{i}]"),
                        format!("[{x}, {y}] lies outside the {}x{} field", field.cols, field.rows),
                    ));
                }
            }
        }
        if let Err(e) = self.wake_field_params() {
            errors.push(ConfigError::new("field", e.to_string()));
        }
        if !(field.min_spacing >= 0.0) {
            errors.push(ConfigError::new("field.min_spacing", "must be >= 0"));
        }
        if !(field.spacing_weight >= 0.0) {
            errors.push(ConfigError::new("field.spacing_weight", "must be >= 0"));
        }

        if let Err(e) = self.power_curve() {
            errors.push(ConfigError::new("power_curve", e.to_string()));
        }

        let study = &self.study;
        if !(study.weibull_shape > 0.0) {
            errors.push(ConfigError::new("study.weibull_shape", "must be > 0"));
        }
        if !(study.weibull_scale > 0.0) {
            errors.push(ConfigError::new("study.weibull_scale", "must be > 0"));
        }
        if study.samples == 0 {
            errors.push(ConfigError::new("study.samples", "must be > 0"));
        }

        errors
    }

    /// Builds the point-model farm.
    ///
    /// # Errors
    ///
    /// Returns the first turbine or farm validation error.
    pub fn build_farm(&self) -> WakeResult<WindFarm> {
        let turbines = self
            .farm
            .turbines
            .iter()
            .map(|t| {
                Turbine::new(
                    t.x,
                    t.y,
                    t.rotor_diameter,
                    t.thrust_coefficient,
                    t.rated_power_kw,
                )
            })
            .collect::<WakeResult<Vec<_>>>()?;
        WindFarm::new(
            turbines,
            self.farm.free_stream_speed,
            self.farm.wake_expansion,
            self.farm.air_density,
        )
    }

    /// Builds the ambient field: read from `field.path` if set, uniform otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV file cannot be read or is malformed.
    pub fn build_ambient_field(&self) -> WakeResult<Grid> {
        match &self.field.path {
            Some(path) => read_field_csv(path),
            None => Ok(Grid::filled(
                self.field.rows,
                self.field.cols,
                self.field.ambient_speed,
            )),
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidParameter` for invalid grid wake parameters.
    pub fn wake_field_params(&self) -> WakeResult<WakeFieldParams> {
        WakeFieldParams::new(
            self.field.rotor_diameter,
            self.field.thrust_coefficient,
            self.field.wake_expansion,
        )
    }

    /// Grid-model turbine cells.
    pub fn layout_coords(&self) -> Vec<GridCoord> {
        self.field
            .layout
            .iter()
            .map(|&[x, y]| GridCoord::new(x, y))
            .collect()
    }

    pub fn spacing_penalty(&self) -> SpacingPenalty {
        SpacingPenalty {
            min_spacing: self.field.min_spacing,
            weight: self.field.spacing_weight,
        }
    }

    /// Builds the layout fitness evaluator over `ambient`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for invalid grid wake parameters.
    pub fn layout_evaluator(&self, ambient: Grid) -> WakeResult<LayoutEvaluator> {
        Ok(LayoutEvaluator::new(
            ambient,
            self.wake_field_params()?,
            self.spacing_penalty(),
        ))
    }

    /// # Errors
    ///
    /// Returns `InvalidParameter` for a malformed curve.
    pub fn power_curve(&self) -> WakeResult<PowerCurve> {
        PowerCurve::new(
            self.power_curve.speeds.clone(),
            self.power_curve.power_kw.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn baseline_is_three_by_three() {
        let cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.farm.turbines.len(), 9);
        assert_eq!(cfg.build_farm().map(|f| f.len()).ok(), Some(9));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
seed = 7

[farm]
free_stream_speed = 9.0
wake_expansion = 0.05

[[farm.turbines]]
x = 0.0
y = 0.0

[[farm.turbines]]
x = 400.0
y = 10.0
rotor_diameter = 100.0
thrust_coefficient = 0.75
rated_power_kw = 3000.0

[field]
rows = 50
cols = 60
ambient_speed = 9.5
layout = [[10, 10], [40, 30]]

[power_curve]
speeds = [0.0, 4.0, 13.0, 25.0]
power_kw = [0.0, 0.0, 3000.0, 3000.0]

[study]
weibull_shape = 2.2
weibull_scale = 9.0
samples = 500
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.as_ref().err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.farm.turbines.len()), Some(2));
        assert_eq!(
            cfg.as_ref().map(|c| c.farm.turbines[1].rated_power_kw),
            Some(3000.0)
        );
        // defaults fill in unspecified turbine fields
        assert_eq!(
            cfg.as_ref().map(|c| c.farm.turbines[0].rotor_diameter),
            Some(80.0)
        );
        assert_eq!(cfg.as_ref().map(|c| c.field.cols), Some(60));
        assert!(cfg.as_ref().map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[farm]
free_stream_speed = 10.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.farm.free_stream_speed), Some(10.0));
        assert_eq!(cfg.as_ref().map(|c| c.field.rows), Some(200));
    }

    #[test]
    fn validation_catches_thrust_coefficient_of_one() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.farm.turbines[2].thrust_coefficient = 1.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "farm.turbines[2].thrust_coefficient")
        );
    }

    #[test]
    fn validation_catches_duplicate_positions() {
        let mut cfg = ScenarioConfig::aligned_pair();
        cfg.farm.turbines[1].x = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "farm.turbines[1]"));
    }

    #[test]
    fn validation_catches_zero_free_stream() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.farm.free_stream_speed = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "farm.free_stream_speed"));
    }

    #[test]
    fn validation_catches_infinite_ambient_speed() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.field.ambient_speed = f64::INFINITY;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "field.ambient_speed"));
    }

    #[test]
    fn validation_catches_layout_outside_field() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.field.layout.push([200, 0]);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "field.layout[3]"));
    }

    #[test]
    fn validation_catches_non_monotonic_curve() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.power_curve.speeds = vec![0.0, 5.0, 4.0];
        cfg.power_curve.power_kw = vec![0.0, 1.0, 2.0];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "power_curve"));
    }

    #[test]
    fn staggered_differs_from_baseline() {
        let base = ScenarioConfig::baseline();
        let stag = ScenarioConfig::staggered();
        assert_ne!(base.farm.turbines[3].y, stag.farm.turbines[3].y);
    }
}
