use serde::{Deserialize, Serialize};

/// Kilograms per pound.
pub const LBS_TO_KG: f64 = 0.453_592;

/// Unit a set's weight was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Multiplier converting a weight in this unit to kilograms.
    pub fn factor(self) -> f64 {
        match self {
            WeightUnit::Lbs => LBS_TO_KG,
            WeightUnit::Kg => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            WeightUnit::Lbs => WeightUnit::Kg,
            WeightUnit::Kg => WeightUnit::Lbs,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

/// Convert an optional weight to kilograms. A missing weight counts as zero.
pub fn to_kilograms(weight: Option<f64>, unit: WeightUnit) -> f64 {
    weight.map_or(0.0, |w| w * unit.factor())
}
