// SPDX-License-Identifier: MIT

//! Capabilities registry (C6): a static table the controller consults on
//! every operation to refuse unsupported operations, clamp numeric inputs,
//! and pick legal VFOs and a default baud rate.

use crate::error::{CatError, CatResult};
use crate::model::{Mode, ModelId, Vfo};

#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub max_power_watts: u32,
    pub min_frequency_hz: u64,
    pub max_frequency_hz: u64,
    pub supported_modes: &'static [Mode],
    pub legal_vfos: &'static [Vfo],
    pub supports_split: bool,
    pub memory_channel_count: u16,
}

impl Capabilities {
    pub fn check_frequency(&self, hz: u64) -> CatResult<()> {
        if hz < self.min_frequency_hz || hz > self.max_frequency_hz {
            return Err(CatError::FrequencyOutOfRange);
        }
        Ok(())
    }

    pub fn check_mode(&self, mode: Mode) -> CatResult<()> {
        if self.supported_modes.contains(&mode) {
            Ok(())
        } else {
            Err(CatError::ModeNotSupported)
        }
    }

    pub fn check_vfo(&self, vfo: Vfo) -> CatResult<()> {
        if self.legal_vfos.contains(&vfo) {
            Ok(())
        } else {
            Err(CatError::UnsupportedOperation(format!(
                "vfo {:?} not legal for this model",
                vfo
            )))
        }
    }

    pub fn check_memory_channel(&self, channel: u16) -> CatResult<()> {
        if channel == 0 || channel > self.memory_channel_count {
            return Err(CatError::InvalidParameter(format!(
                "memory channel {channel} out of range"
            )));
        }
        Ok(())
    }

    /// `set_power(0)` is always legal; anything above `max_power_watts` is
    /// rejected rather than silently clamped (§8 boundary behaviors).
    pub fn check_power_watts(&self, watts: u32) -> CatResult<()> {
        if watts > self.max_power_watts {
            return Err(CatError::InvalidParameter(format!(
                "power {watts}W exceeds model maximum of {}W",
                self.max_power_watts
            )));
        }
        Ok(())
    }
}

const HF_VHF_MODES: &[Mode] = &[
    Mode::Lsb,
    Mode::Usb,
    Mode::Cw,
    Mode::CwReverse,
    Mode::Am,
    Mode::Fm,
    Mode::Rtty,
    Mode::RttyReverse,
    Mode::PktUsb,
    Mode::PktLsb,
];

const VHF_UHF_MODES: &[Mode] = &[
    Mode::Lsb,
    Mode::Usb,
    Mode::Cw,
    Mode::CwReverse,
    Mode::Am,
    Mode::Fm,
    Mode::FmNarrow,
    Mode::PktUsb,
    Mode::PktFm,
];

const K_SERIES_MODES: &[Mode] = &[
    Mode::Lsb,
    Mode::Usb,
    Mode::Cw,
    Mode::CwReverse,
    Mode::Fm,
    Mode::Am,
    Mode::PktUsb,
    Mode::Rtty,
];

pub fn capabilities_for(model: ModelId) -> Capabilities {
    match model {
        ModelId::Ic7100 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 30_000,
            max_frequency_hz: 470_000_000,
            supported_modes: HF_VHF_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 99,
        },
        ModelId::Ic705 => Capabilities {
            max_power_watts: 10,
            min_frequency_hz: 30_000,
            max_frequency_hz: 470_000_000,
            supported_modes: HF_VHF_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 99,
        },
        ModelId::Ic7600 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 30_000,
            max_frequency_hz: 60_000_000,
            supported_modes: HF_VHF_MODES,
            legal_vfos: &[Vfo::Main, Vfo::Sub],
            supports_split: true,
            memory_channel_count: 101,
        },
        ModelId::Ic9700 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 144_000_000,
            max_frequency_hz: 1_300_000_000,
            supported_modes: VHF_UHF_MODES,
            legal_vfos: &[Vfo::A, Vfo::B, Vfo::Main, Vfo::Sub],
            supports_split: true,
            memory_channel_count: 99,
        },
        ModelId::Ic9100 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 30_000,
            max_frequency_hz: 1_300_000_000,
            supported_modes: VHF_UHF_MODES,
            legal_vfos: &[Vfo::Main, Vfo::Sub],
            supports_split: true,
            memory_channel_count: 99,
        },
        ModelId::Ic706 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 30_000,
            max_frequency_hz: 470_000_000,
            supported_modes: HF_VHF_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 103,
        },
        ModelId::Ic746 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 30_000,
            max_frequency_hz: 470_000_000,
            supported_modes: HF_VHF_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 99,
        },
        ModelId::ElecraftK2 => Capabilities {
            max_power_watts: 15,
            min_frequency_hz: 1_800_000,
            max_frequency_hz: 30_000_000,
            supported_modes: K_SERIES_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 100,
        },
        ModelId::ElecraftK3 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 500_000,
            max_frequency_hz: 54_000_000,
            supported_modes: K_SERIES_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 100,
        },
        ModelId::ElecraftK4 => Capabilities {
            max_power_watts: 100,
            min_frequency_hz: 100_000,
            max_frequency_hz: 54_000_000,
            supported_modes: K_SERIES_MODES,
            legal_vfos: &[Vfo::A, Vfo::B],
            supports_split: true,
            memory_channel_count: 100,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ic9700_rejects_hf_frequency() {
        let caps = capabilities_for(ModelId::Ic9700);
        assert_eq!(caps.check_frequency(14_230_000), Err(CatError::FrequencyOutOfRange));
        assert!(caps.check_frequency(146_000_000).is_ok());
    }

    #[test]
    fn power_above_max_is_rejected() {
        let caps = capabilities_for(ModelId::ElecraftK2);
        assert!(caps.check_power_watts(16).is_err());
        assert!(caps.check_power_watts(15).is_ok());
        assert!(caps.check_power_watts(0).is_ok());
    }

    #[test]
    fn ic7600_rejects_a_b_vfo() {
        let caps = capabilities_for(ModelId::Ic7600);
        assert!(caps.check_vfo(Vfo::A).is_err());
        assert!(caps.check_vfo(Vfo::Main).is_ok());
    }

    #[test]
    fn memory_channel_bounds() {
        let caps = capabilities_for(ModelId::ElecraftK3);
        assert!(caps.check_memory_channel(0).is_err());
        assert!(caps.check_memory_channel(101).is_err());
        assert!(caps.check_memory_channel(1).is_ok());
    }
}
