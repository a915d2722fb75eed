use serde::{Deserialize, Serialize};

/// Electrolysis technology catalogue.
///
/// Each technology fixes the unit capital cost, the maximum ramp rate and the
/// hydrogen yield of the stack. The values are per-MW (respectively per-MWh of
/// consumed electricity) figures for utility-scale installations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElectrolyserTechnology {
    /// Alkaline electrolysis
    Ael,
    /// Proton exchange membrane electrolysis
    #[default]
    Pem,
    /// Solid oxide electrolysis
    Soec,
}

impl ElectrolyserTechnology {
    /// Capital cost of the electrolyser stack in currency units per MW installed
    pub fn capex_per_mw(&self) -> f64 {
        match self {
            Self::Ael => 900_000.0,
            Self::Pem => 1_400_000.0,
            Self::Soec => 2_500_000.0,
        }
    }

    /// Maximum allowed change of electrolyser power between consecutive hours (MW/h)
    pub fn ramp_limit_mw_per_h(&self) -> f64 {
        match self {
            Self::Ael => 300.0,
            Self::Pem => 600.0,
            Self::Soec => 100.0,
        }
    }

    /// Hydrogen yield of the stack in kg of H2 per MWh of electricity,
    /// before applying the overall plant efficiency
    pub fn yield_kg_per_mwh(&self) -> f64 {
        match self {
            Self::Ael => 20.0,
            Self::Pem => 18.0,
            Self::Soec => 27.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_catalogue_values() {
        assert_eq!(ElectrolyserTechnology::Ael.capex_per_mw(), 900_000.0);
        assert_eq!(ElectrolyserTechnology::Pem.capex_per_mw(), 1_400_000.0);
        assert_eq!(ElectrolyserTechnology::Soec.capex_per_mw(), 2_500_000.0);

        assert_eq!(ElectrolyserTechnology::Ael.ramp_limit_mw_per_h(), 300.0);
        assert_eq!(ElectrolyserTechnology::Pem.ramp_limit_mw_per_h(), 600.0);
        assert_eq!(ElectrolyserTechnology::Soec.ramp_limit_mw_per_h(), 100.0);

        assert_eq!(ElectrolyserTechnology::Ael.yield_kg_per_mwh(), 20.0);
        assert_eq!(ElectrolyserTechnology::Pem.yield_kg_per_mwh(), 18.0);
        assert_eq!(ElectrolyserTechnology::Soec.yield_kg_per_mwh(), 27.0);
    }

    #[test]
    fn test_default_technology_is_pem() {
        assert_eq!(
            ElectrolyserTechnology::default(),
            ElectrolyserTechnology::Pem
        );
    }
}
