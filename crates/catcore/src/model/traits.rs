// SPDX-License-Identifier: MIT

//! Model trait records (C5): the data side of what used to be a deep
//! inheritance hierarchy. A [`ModelTraits`] value plus the free functions in
//! [`super::ops`] stand in for virtual dispatch — overrides are just
//! different field values, not different subclasses.

/// Which wire dialect a model speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    CivIcom,
    ElecraftAscii,
}

/// VFO addressing scheme, per §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfoModel {
    /// A and B are independently selectable by code.
    Targetable,
    /// Only one VFO is ever "current"; operations act on it implicitly.
    CurrentOnly,
    /// Main/Sub, 2-state (IC-7600, IC-9100).
    MainSub,
    /// Main/Sub crossed with A/B, 4-state (IC-9700).
    MainSubDualVfo,
}

/// How a model represents transmit power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUnits {
    /// 0..100 percent of `max_power_watts`.
    Percentage,
    /// Direct watts, 0..15 (Elecraft K2).
    DirectWatts0To15,
}

/// Identifies a supported transceiver model. Matches the tag used by the
/// capability registry (C6) and the rigctld `dump_caps` model number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    Ic7100,
    Ic705,
    Ic7600,
    Ic9700,
    Ic9100,
    Ic706,
    Ic746,
    ElecraftK2,
    ElecraftK3,
    ElecraftK4,
}

/// The per-model trait record described in spec §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTraits {
    pub model: ModelId,
    pub dialect: Dialect,
    pub civ_address: Option<u8>,
    pub vfo_model: VfoModel,
    pub requires_mode_filter: bool,
    pub echoes_commands: bool,
    pub power_units: PowerUnits,
    pub default_baud: u32,
    /// `16 <sub>`-class responses echo the subcommand inside `data` instead
    /// of as a second command byte.
    pub alternate_response_layout: bool,
    pub supports_xit: bool,
    /// Capability bit gating [`crate::controller::DualReceiverHandle`].
    pub dual_receiver: bool,
}

impl ModelTraits {
    pub const fn civ(
        model: ModelId,
        civ_address: u8,
        vfo_model: VfoModel,
        requires_mode_filter: bool,
        echoes_commands: bool,
        default_baud: u32,
        alternate_response_layout: bool,
    ) -> Self {
        ModelTraits {
            model,
            dialect: Dialect::CivIcom,
            civ_address: Some(civ_address),
            vfo_model,
            requires_mode_filter,
            echoes_commands,
            power_units: PowerUnits::Percentage,
            default_baud,
            alternate_response_layout,
            supports_xit: true,
            dual_receiver: false,
        }
    }

    pub const fn elecraft(
        model: ModelId,
        power_units: PowerUnits,
        default_baud: u32,
    ) -> Self {
        ModelTraits {
            model,
            dialect: Dialect::ElecraftAscii,
            civ_address: None,
            vfo_model: VfoModel::Targetable,
            requires_mode_filter: false,
            echoes_commands: false,
            power_units,
            default_baud,
            alternate_response_layout: false,
            supports_xit: true,
            dual_receiver: false,
        }
    }

    pub const fn with_dual_receiver(mut self) -> Self {
        self.dual_receiver = true;
        self
    }
}
