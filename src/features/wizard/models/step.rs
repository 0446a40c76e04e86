use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wizard pages in the order they are filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    General,
    Meters,
    Rooms,
    Keys,
    PrivateAreas,
    OtherEquipment,
    EnergyEquipment,
    HeatingEquipment,
    Finalize,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        WizardStep::General,
        WizardStep::Meters,
        WizardStep::Rooms,
        WizardStep::Keys,
        WizardStep::PrivateAreas,
        WizardStep::OtherEquipment,
        WizardStep::EnergyEquipment,
        WizardStep::HeatingEquipment,
        WizardStep::Finalize,
    ];

    pub const FIRST: WizardStep = WizardStep::General;
    pub const LAST: WizardStep = WizardStep::Finalize;

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stored `current_step` values outside the range clamp to the ends
    pub fn from_stored(value: i32) -> Self {
        if value <= 0 {
            Self::FIRST
        } else {
            Self::from_index(value as usize).unwrap_or(Self::LAST)
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::General => "Informations générales",
            WizardStep::Meters => "Relevés de compteurs",
            WizardStep::Rooms => "Pièces",
            WizardStep::Keys => "Clés",
            WizardStep::PrivateAreas => "Parties privatives",
            WizardStep::OtherEquipment => "Autres équipements",
            WizardStep::EnergyEquipment => "Équipements énergétiques",
            WizardStep::HeatingEquipment => "Équipements de chauffage",
            WizardStep::Finalize => "Finalisation",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::General.next(), Some(WizardStep::Meters));
        assert_eq!(WizardStep::Meters.next(), Some(WizardStep::Rooms));
        assert_eq!(WizardStep::HeatingEquipment.next(), Some(WizardStep::Finalize));
        assert_eq!(WizardStep::Finalize.next(), None);
        assert_eq!(WizardStep::General.previous(), None);
        assert_eq!(WizardStep::Finalize.index(), 8);
    }

    #[test]
    fn test_from_stored_clamps() {
        assert_eq!(WizardStep::from_stored(-3), WizardStep::General);
        assert_eq!(WizardStep::from_stored(2), WizardStep::Rooms);
        assert_eq!(WizardStep::from_stored(42), WizardStep::Finalize);
    }
}
