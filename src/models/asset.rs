//! Asset catalog model.
//!
//! An asset is a piece of site infrastructure (battery storage, substation,
//! O&M building, ...) with physical dimensions and placement constraints.
//! The optimizer places a catalog of asset definitions onto the site.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The closed set of placeable asset types.
///
/// Used both as identity (in placement ids) and as a lookup key
/// (inter-type spacing rules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Battery Energy Storage System.
    Bess,
    Substation,
    /// Operations & Maintenance building.
    OAndM,
    Parking,
    /// Construction laydown area.
    Laydown,
    InverterPad,
    TransformerPad,
    WeatherStation,
    Fence,
    AccessRoad,
}

impl AssetType {
    /// Stable string form, used in placement ids and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Bess => "bess",
            AssetType::Substation => "substation",
            AssetType::OAndM => "o_and_m",
            AssetType::Parking => "parking",
            AssetType::Laydown => "laydown",
            AssetType::InverterPad => "inverter_pad",
            AssetType::TransformerPad => "transformer_pad",
            AssetType::WeatherStation => "weather_station",
            AssetType::Fence => "fence",
            AssetType::AccessRoad => "access_road",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical dimensions of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDimensions {
    /// Width in meters. Must be > 0.
    pub width: f64,
    /// Length in meters. Must be > 0.
    pub length: f64,
    /// Height in meters (clearance calculations).
    pub height: f64,
    /// Whether the footprint may be rotated.
    pub rotation_allowed: bool,
    /// Rotation increment in degrees. Must divide 360 when rotation
    /// is allowed.
    pub rotation_step: f64,
}

impl AssetDimensions {
    /// Creates dimensions with the default 90° rotation step.
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
            rotation_allowed: true,
            rotation_step: 90.0,
        }
    }

    /// Locks the footprint orientation.
    pub fn fixed_orientation(mut self) -> Self {
        self.rotation_allowed = false;
        self
    }

    /// Sets the rotation increment in degrees.
    pub fn with_rotation_step(mut self, step_deg: f64) -> Self {
        self.rotation_step = step_deg;
        self
    }
}

/// Placement constraints for an asset. All distances in meters, ≥ 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConstraints {
    /// Minimum distance from the footprint centroid to the site boundary.
    pub min_setback: f64,
    /// Maximum tolerable terrain slope in degrees.
    pub max_slope: f64,
    /// Whether the asset needs an access road.
    pub requires_road_access: bool,
    /// Maximum distance to the nearest road when access is required.
    pub max_road_distance: f64,
    /// Minimum spacing between instances of the same type.
    pub min_distance_to_same: f64,
    /// Minimum spacing to instances of other specific types.
    pub min_distance_to_other: HashMap<AssetType, f64>,
    /// Whether the footprint must stay clear of exclusion zones.
    pub avoid_exclusion_zones: bool,
}

impl Default for AssetConstraints {
    fn default() -> Self {
        Self {
            min_setback: 10.0,
            max_slope: 5.0,
            requires_road_access: true,
            max_road_distance: 50.0,
            min_distance_to_same: 0.0,
            min_distance_to_other: HashMap::new(),
            avoid_exclusion_zones: true,
        }
    }
}

impl AssetConstraints {
    /// Creates constraints with the given setback and slope limits.
    pub fn new(min_setback: f64, max_slope: f64) -> Self {
        Self {
            min_setback,
            max_slope,
            ..Self::default()
        }
    }

    /// Sets the road-access requirement and its maximum distance.
    pub fn with_road_access(mut self, required: bool, max_distance: f64) -> Self {
        self.requires_road_access = required;
        self.max_road_distance = max_distance;
        self
    }

    /// Sets the same-type minimum spacing.
    pub fn with_same_type_spacing(mut self, distance: f64) -> Self {
        self.min_distance_to_same = distance;
        self
    }

    /// Sets the minimum spacing to another asset type.
    pub fn with_spacing_to(mut self, other: AssetType, distance: f64) -> Self {
        self.min_distance_to_other.insert(other, distance);
        self
    }
}

/// A catalog entry: everything the optimizer needs to place one asset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    /// Asset type (identity).
    pub asset_type: AssetType,
    /// Human-readable name.
    pub name: String,
    /// Physical dimensions.
    pub dimensions: AssetDimensions,
    /// Placement constraints.
    pub constraints: AssetConstraints,
    /// Number of instances to place. Must be ≥ 1.
    pub quantity: u32,
    /// Decode ordering priority (higher = decoded first). Does not
    /// bias gene values.
    pub priority: i32,
    /// Whether the asset must be placed.
    pub required: bool,
}

impl AssetDefinition {
    /// Creates a definition with default constraints and quantity 1.
    pub fn new(asset_type: AssetType, name: impl Into<String>, dimensions: AssetDimensions) -> Self {
        Self {
            asset_type,
            name: name.into(),
            dimensions,
            constraints: AssetConstraints::default(),
            quantity: 1,
            priority: 1,
            required: true,
        }
    }

    /// Sets the placement constraints.
    pub fn with_constraints(mut self, constraints: AssetConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the instance quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the decode-ordering priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Marks the asset as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// The standard solar-site catalog.
///
/// Dimensions and constraints follow typical utility-scale values; callers
/// override quantities (or supply their own definitions) per project.
pub fn default_catalog() -> Vec<AssetDefinition> {
    vec![
        AssetDefinition::new(
            AssetType::Bess,
            "Battery Energy Storage System",
            AssetDimensions::new(50.0, 80.0, 3.0),
        )
        .with_constraints(AssetConstraints::new(30.0, 2.0).with_road_access(true, 30.0))
        .with_priority(10),
        AssetDefinition::new(
            AssetType::Substation,
            "Electrical Substation",
            AssetDimensions::new(40.0, 60.0, 8.0),
        )
        .with_constraints(AssetConstraints::new(50.0, 1.0).with_road_access(true, 20.0))
        .with_priority(9),
        AssetDefinition::new(
            AssetType::OAndM,
            "O&M Building",
            AssetDimensions::new(20.0, 30.0, 5.0),
        )
        .with_constraints(AssetConstraints::new(20.0, 3.0).with_road_access(true, 10.0))
        .with_priority(7),
        AssetDefinition::new(
            AssetType::Parking,
            "Parking Area",
            AssetDimensions::new(30.0, 50.0, 0.0),
        )
        .with_constraints(AssetConstraints::new(10.0, 5.0).with_road_access(true, 5.0))
        .with_priority(5),
        AssetDefinition::new(
            AssetType::Laydown,
            "Construction Laydown",
            AssetDimensions::new(60.0, 100.0, 0.0),
        )
        .with_constraints(AssetConstraints::new(15.0, 3.0).with_road_access(true, 20.0))
        .with_priority(4)
        .optional(),
        AssetDefinition::new(
            AssetType::InverterPad,
            "Inverter Pad",
            AssetDimensions::new(5.0, 8.0, 2.0),
        )
        .with_constraints(AssetConstraints::new(10.0, 3.0).with_road_access(false, 100.0))
        .with_quantity(10)
        .with_priority(6),
        AssetDefinition::new(
            AssetType::WeatherStation,
            "Weather Station",
            AssetDimensions::new(3.0, 3.0, 10.0).fixed_orientation(),
        )
        .with_constraints(
            AssetConstraints::new(20.0, 10.0)
                .with_road_access(false, 200.0)
                .with_same_type_spacing(500.0),
        )
        .with_quantity(2)
        .with_priority(3)
        .optional(),
    ]
}

/// Builds a catalog by overriding standard-catalog quantities.
///
/// Each `(type, quantity)` request takes the standard definition for
/// that type with the quantity replaced. Types without a standard
/// definition are skipped.
pub fn catalog_with_quantities(requests: &[(AssetType, u32)]) -> Vec<AssetDefinition> {
    let catalog = default_catalog();
    requests
        .iter()
        .filter_map(|&(asset_type, quantity)| {
            catalog
                .iter()
                .find(|def| def.asset_type == asset_type)
                .map(|def| def.clone().with_quantity(quantity))
        })
        .collect()
}

/// The default asset set placed when no catalog override is given:
/// substation, battery storage, O&M building, and parking.
pub fn default_site_assets() -> Vec<AssetDefinition> {
    default_catalog()
        .into_iter()
        .filter(|a| {
            matches!(
                a.asset_type,
                AssetType::Substation | AssetType::Bess | AssetType::OAndM | AssetType::Parking
            )
        })
        .collect()
}
