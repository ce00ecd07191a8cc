// SPDX-License-Identifier: MIT

//! Static per-model trait table (C5). One record per supported model; no
//! per-radio source file sprawl.

use super::traits::{ModelId, ModelTraits, PowerUnits, VfoModel};

pub fn traits_for(model: ModelId) -> ModelTraits {
    match model {
        ModelId::Ic7100 => {
            ModelTraits::civ(ModelId::Ic7100, 0x88, VfoModel::Targetable, false, true, 19200, true)
        }
        ModelId::Ic705 => {
            ModelTraits::civ(ModelId::Ic705, 0xA4, VfoModel::Targetable, false, true, 115200, false)
        }
        ModelId::Ic7600 => ModelTraits::civ(
            ModelId::Ic7600,
            0x7A,
            VfoModel::MainSub,
            true,
            true,
            19200,
            true,
        )
        .with_dual_receiver(),
        ModelId::Ic9700 => ModelTraits::civ(
            ModelId::Ic9700,
            0xA2,
            VfoModel::MainSubDualVfo,
            false,
            true,
            19200,
            false,
        )
        .with_dual_receiver(),
        ModelId::Ic9100 => {
            ModelTraits::civ(ModelId::Ic9100, 0x7C, VfoModel::MainSub, true, false, 19200, false)
        }
        ModelId::Ic706 => {
            ModelTraits::civ(ModelId::Ic706, 0x58, VfoModel::Targetable, false, false, 9600, false)
        }
        ModelId::Ic746 => {
            ModelTraits::civ(ModelId::Ic746, 0x56, VfoModel::Targetable, false, false, 9600, false)
        }
        ModelId::ElecraftK2 => {
            ModelTraits::elecraft(ModelId::ElecraftK2, PowerUnits::DirectWatts0To15, 4800)
        }
        ModelId::ElecraftK3 => {
            ModelTraits::elecraft(ModelId::ElecraftK3, PowerUnits::Percentage, 38400)
        }
        ModelId::ElecraftK4 => {
            ModelTraits::elecraft(ModelId::ElecraftK4, PowerUnits::Percentage, 38400)
        }
    }
}

pub const ALL_MODELS: &[ModelId] = &[
    ModelId::Ic7100,
    ModelId::Ic705,
    ModelId::Ic7600,
    ModelId::Ic9700,
    ModelId::Ic9100,
    ModelId::Ic706,
    ModelId::Ic746,
    ModelId::ElecraftK2,
    ModelId::ElecraftK3,
    ModelId::ElecraftK4,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::traits::Dialect;

    #[test]
    fn ic9700_has_dual_vfo_and_dual_receiver() {
        let t = traits_for(ModelId::Ic9700);
        assert_eq!(t.vfo_model, VfoModel::MainSubDualVfo);
        assert!(t.dual_receiver);
        assert!(t.echoes_commands);
    }

    #[test]
    fn k2_uses_direct_watts() {
        let t = traits_for(ModelId::ElecraftK2);
        assert_eq!(t.power_units, PowerUnits::DirectWatts0To15);
        assert_eq!(t.dialect, Dialect::ElecraftAscii);
    }

    #[test]
    fn ic7600_alternate_layout_and_dual_receiver() {
        let t = traits_for(ModelId::Ic7600);
        assert!(t.alternate_response_layout);
        assert!(t.dual_receiver);
    }

    #[test]
    fn every_model_has_a_record() {
        for &m in ALL_MODELS {
            let t = traits_for(m);
            assert_eq!(t.model, m);
        }
    }
}
