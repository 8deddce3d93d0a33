//! The design brief supplied by the caller.

use crate::errors::BriefError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of the brief's spatial dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionUnit {
    /// Metric.
    #[default]
    Meters,
    /// Imperial.
    Feet,
}

impl fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters => write!(f, "meters"),
            Self::Feet => write!(f, "feet"),
        }
    }
}

/// Overall footprint and height of the project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length.
    pub length: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Unit for all three values.
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl Dimensions {
    /// Creates dimensions in meters.
    #[must_use]
    pub fn meters(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            unit: DimensionUnit::Meters,
        }
    }

    /// Footprint area in square units.
    #[must_use]
    pub fn footprint(&self) -> f64 {
        self.length * self.width
    }
}

/// Room counts for a residential flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatConfiguration {
    /// Number of bedrooms (the "B" in BHK).
    pub bhk: u32,
    /// Number of bathrooms.
    pub num_bathrooms: u32,
    /// Number of balconies.
    pub num_balconies: u32,
}

impl FlatConfiguration {
    /// Interior rooms that must each get a dedicated rendering.
    ///
    /// Living room and kitchen always; the first bedroom is the master;
    /// three or more bedrooms add a study; the first balcony is the main one.
    #[must_use]
    pub fn required_rooms(&self) -> Vec<String> {
        let mut rooms = vec!["Living Room".to_string(), "Kitchen".to_string()];
        for i in 1..=self.bhk {
            rooms.push(if i == 1 {
                "Master Bedroom".to_string()
            } else {
                format!("Bedroom {i}")
            });
        }
        if self.bhk >= 3 {
            rooms.push("Study Room".to_string());
        }
        for i in 1..=self.num_balconies {
            rooms.push(if i == 1 {
                "Main Balcony".to_string()
            } else {
                format!("Balcony {i}")
            });
        }
        rooms
    }
}

/// Immutable input to a pipeline run.
///
/// The caller owns business validation; the core only checks structural
/// completeness via [`Brief::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    /// Project name.
    pub project_name: String,
    /// Top-level space type (e.g. "Residential").
    pub space_type: String,
    /// Selected sub-spaces of the space type.
    pub sub_spaces: Vec<String>,
    /// Free-text preferences.
    #[serde(default)]
    pub custom_preference: String,
    /// Spatial dimensions.
    pub dimensions: Dimensions,
    /// Free-text structural constraints.
    #[serde(default)]
    pub structural_constraints: String,
    /// Project location, used for compliance and cost context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Optional flat configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_configuration: Option<FlatConfiguration>,
}

impl Brief {
    /// Creates a brief with the required fields.
    #[must_use]
    pub fn new(
        project_name: impl Into<String>,
        space_type: impl Into<String>,
        sub_spaces: Vec<String>,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            space_type: space_type.into(),
            sub_spaces,
            custom_preference: String::new(),
            dimensions,
            structural_constraints: String::new(),
            location: None,
            flat_configuration: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the free-text preferences.
    #[must_use]
    pub fn with_preference(mut self, preference: impl Into<String>) -> Self {
        self.custom_preference = preference.into();
        self
    }

    /// Sets the structural constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.structural_constraints = constraints.into();
        self
    }

    /// Sets the flat configuration.
    #[must_use]
    pub fn with_flat_configuration(mut self, flat: FlatConfiguration) -> Self {
        self.flat_configuration = Some(flat);
        self
    }

    /// Location text for prompts, or "Not specified".
    #[must_use]
    pub fn location_or_default(&self) -> &str {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("Not specified")
    }

    /// Rooms that need interior renders, if a flat configuration is present.
    #[must_use]
    pub fn required_rooms(&self) -> Vec<String> {
        self.flat_configuration
            .map(|flat| flat.required_rooms())
            .unwrap_or_default()
    }

    /// Checks structural completeness.
    ///
    /// Required text fields are the caller's concern and are not checked.
    pub fn validate(&self) -> Result<(), BriefError> {
        if self.sub_spaces.iter().all(|s| s.trim().is_empty()) {
            return Err(BriefError::NoSubSpaces);
        }
        for (name, value) in [
            ("length", self.dimensions.length),
            ("width", self.dimensions.width),
            ("height", self.dimensions.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(BriefError::NonPositiveDimension(name));
            }
        }
        Ok(())
    }
}
