// SPDX-License-Identifier: MIT

//! Unified controller (C8): composes the session, per-model codec, the
//! capabilities registry and the state cache into one model-agnostic
//! operation API.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::cache::{Cache, CacheStatistics};
use crate::capabilities::{capabilities_for, Capabilities};
use crate::civ::CivFrame;
use crate::config::RigConfig;
use crate::error::{CatError, CatResult};
use crate::model::{self, ops, Mode, ModelId, ModelTraits, Vfo};
use crate::session::Session;

const CIV_TERMINATOR: u8 = crate::civ::TERMINATOR;
const ELECRAFT_TERMINATOR: u8 = b';';

/// A remembered memory channel: the core owns this table itself (the radio
/// has no uniform "read memory channel" wire op across dialects), and
/// `recall_memory_channel` replays it through `set_frequency`/`set_mode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryChannel {
    pub frequency_hz: u64,
    pub mode: Mode,
    pub name: Option<String>,
}

/// Readable RIT/XIT state (§3 Data Model): whether the offset is applied,
/// and its signed value in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RitState {
    pub enabled: bool,
    pub offset_hz: i32,
}

/// Narrowed accessor returned by [`Controller::as_dual_receiver`] for models
/// whose capability bit says they have independent Main/Sub receivers.
pub struct DualReceiverHandle<'a, S> {
    controller: &'a Controller<S>,
}

impl<'a, S> DualReceiverHandle<'a, S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    /// Swap Main/Sub receiver content (the IC-7600's `07 B0`, documented by
    /// Icom only as "exchange", not as swap-vs-copy).
    pub async fn exchange_bands(&self) -> CatResult<()> {
        let to = self
            .controller
            .traits
            .civ_address
            .ok_or_else(|| CatError::UnsupportedRadio("no CI-V address".into()))?;
        let payload = CivFrame::build(to, crate::civ::CONTROLLER_ADDR, &[0x07], &[0xB0]);
        self.controller.cache.lock().await.invalidate(None);
        self.controller.exchange_civ(payload).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Disconnected,
    Connected,
}

pub struct Controller<S> {
    session: Session<S>,
    traits: ModelTraits,
    capabilities: Capabilities,
    config: RigConfig,
    cache: Mutex<Cache>,
    memory: Mutex<HashMap<u16, MemoryChannel>>,
    state: Mutex<ControllerState>,
}

/// Fields accepted by [`Controller::configure`]; applied in the fixed order
/// frequency → mode → power, short-circuiting on the first error (§4.8).
#[derive(Debug, Clone, Default)]
pub struct ConfigureRequest {
    pub frequency_hz: Option<u64>,
    pub mode: Option<Mode>,
    pub vfo: Option<Vfo>,
    pub power_watts: Option<u32>,
}

impl<S> Controller<S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    /// Wrap an already-connected session. `model` selects the trait record
    /// and capability record; `config` supplies overrides and timeouts.
    pub fn new(session: Session<S>, model: ModelId, config: RigConfig) -> Self {
        let mut traits = model::traits_for(model);
        if let Some(addr) = config.civ_address {
            traits.civ_address = Some(addr);
        }
        Controller {
            session,
            traits,
            capabilities: capabilities_for(model),
            cache: Mutex::new(Cache::new(config.cache_ttl())),
            memory: Mutex::new(HashMap::new()),
            config,
            state: Mutex::new(ControllerState::Connected),
        }
    }

    pub async fn state(&self) -> ControllerState {
        *self.state.lock().await
    }

    async fn require_connected(&self) -> CatResult<()> {
        if *self.state.lock().await == ControllerState::Connected {
            Ok(())
        } else {
            Err(CatError::NotConnected)
        }
    }

    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> CatResult<()> {
        self.session.disconnect().await?;
        *self.state.lock().await = ControllerState::Disconnected;
        self.cache.lock().await.reset();
        info!("controller disconnected");
        Ok(())
    }

    fn terminator(&self) -> u8 {
        match self.traits.dialect {
            model::Dialect::CivIcom => CIV_TERMINATOR,
            model::Dialect::ElecraftAscii => ELECRAFT_TERMINATOR,
        }
    }

    async fn round_trip(&self, payload: Vec<u8>) -> CatResult<Vec<u8>> {
        self.require_connected().await?;
        let raw = self
            .session
            .round_trip(&payload, self.terminator(), self.config.read_timeout())
            .await?;
        if self.traits.dialect == model::Dialect::ElecraftAscii && crate::elecraft::is_busy(&raw) {
            return Err(CatError::Busy);
        }
        Ok(raw)
    }

    /// Fire-and-forget write, for dialects/ops where no response is ever
    /// sent back (Elecraft ASCII "set" commands).
    async fn send(&self, payload: Vec<u8>) -> CatResult<()> {
        self.require_connected().await?;
        self.session.send(&payload).await
    }

    async fn exchange_civ(&self, payload: Vec<u8>) -> CatResult<CivFrame> {
        let raw = self.round_trip(payload).await?;
        let frame = CivFrame::parse(&raw)?;
        if frame.is_nak {
            return Err(CatError::CommandFailed("radio returned NAK".into()));
        }
        Ok(frame)
    }

    /// Send a "set" command: CI-V awaits the ACK/NAK that always follows a
    /// command frame; Elecraft ASCII set commands get no response at all.
    async fn send_command(&self, payload: Vec<u8>) -> CatResult<()> {
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                self.exchange_civ(payload).await?;
                Ok(())
            }
            model::Dialect::ElecraftAscii => self.send(payload).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn set_frequency(&self, hz: u64, vfo: Vfo) -> CatResult<()> {
        self.require_connected().await?;
        self.capabilities.check_frequency(hz)?;
        self.capabilities.check_vfo(vfo)?;
        if self.traits.vfo_model == model::VfoModel::CurrentOnly {
            self.send_command(ops::build_set_vfo(&self.traits, vfo)?).await?;
        }
        let payload = ops::build_set_frequency(&self.traits, hz, vfo)?;
        self.cache.lock().await.invalidate(Some(&freq_key(vfo)));
        self.send_command(payload).await
    }

    async fn fetch_frequency(&self, vfo: Vfo) -> CatResult<u64> {
        let payload = ops::build_get_frequency(&self.traits, vfo)?;
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(payload).await?;
                ops::parse_civ_frequency(&frame)
            }
            model::Dialect::ElecraftAscii => {
                let cmd = if vfo == Vfo::B { "FB" } else { "FA" };
                let raw = self.round_trip(payload).await?;
                ops::parse_elecraft_frequency(cmd, &raw)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_frequency(&self, vfo: Vfo) -> CatResult<u64> {
        self.require_connected().await?;
        let key = freq_key(vfo);
        let ttl = self.config.cache_ttl();
        self.cache
            .lock()
            .await
            .get(&key, Some(ttl), || self.fetch_frequency(vfo))
            .await
    }

    /// Forced-fresh read: bypasses the cache, then invalidates the key.
    /// Replaces a boolean `cached` parameter (see design notes).
    #[instrument(skip(self))]
    pub async fn get_frequency_fresh(&self, vfo: Vfo) -> CatResult<u64> {
        self.require_connected().await?;
        let key = freq_key(vfo);
        self.cache
            .lock()
            .await
            .get_fresh(&key, || self.fetch_frequency(vfo))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_mode(&self, mode: Mode, vfo: Vfo) -> CatResult<()> {
        self.require_connected().await?;
        self.capabilities.check_mode(mode)?;
        let payload = ops::build_set_mode(&self.traits, mode)?;
        self.cache.lock().await.invalidate(Some(&mode_key(vfo)));
        self.send_command(payload).await
    }

    #[instrument(skip(self))]
    pub async fn get_mode(&self, vfo: Vfo) -> CatResult<Mode> {
        self.require_connected().await?;
        let payload = ops::build_get_mode(&self.traits)?;
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(payload).await?;
                ops::parse_civ_mode(&frame)
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(payload).await?;
                let mode = ops::parse_elecraft_mode(&raw)?;
                let _ = vfo;
                Ok(mode)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn set_vfo(&self, vfo: Vfo) -> CatResult<()> {
        self.require_connected().await?;
        self.capabilities.check_vfo(vfo)?;
        let payload = ops::build_set_vfo(&self.traits, vfo)?;
        self.cache.lock().await.invalidate(None);
        self.send_command(payload).await
    }

    #[instrument(skip(self))]
    pub async fn set_ptt(&self, on: bool, mode: Option<Mode>) -> CatResult<()> {
        self.require_connected().await?;
        let payload = ops::build_set_ptt(&self.traits, mode, on)?;
        self.cache.lock().await.invalidate(Some("ptt_state"));
        self.send_command(payload).await?;
        if self.traits.model == ModelId::ElecraftK2 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_ptt(&self) -> CatResult<bool> {
        self.require_connected().await?;
        let payload = ops::build_get_ptt(&self.traits)?;
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(payload).await?;
                ops::parse_civ_ptt(&frame)
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(payload).await?;
                ops::parse_elecraft_ptt(&self.traits, &raw)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn set_power(&self, watts: u32) -> CatResult<()> {
        self.require_connected().await?;
        self.capabilities.check_power_watts(watts)?;
        let payload = ops::build_set_power(&self.traits, self.capabilities.max_power_watts, watts)?;
        self.cache.lock().await.invalidate(Some("power"));
        self.send_command(payload).await
    }

    async fn fetch_power(&self) -> CatResult<u32> {
        let payload = ops::build_get_power(&self.traits)?;
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(payload).await?;
                ops::parse_civ_power(&self.traits, self.capabilities.max_power_watts, &frame)
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(payload).await?;
                ops::parse_elecraft_power(&raw)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_power(&self) -> CatResult<u32> {
        self.require_connected().await?;
        let ttl = self.config.cache_ttl();
        self.cache
            .lock()
            .await
            .get("power", Some(ttl), || self.fetch_power())
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_split(&self, on: bool) -> CatResult<()> {
        self.require_connected().await?;
        if !self.capabilities.supports_split {
            return Err(CatError::UnsupportedOperation("split".into()));
        }
        let payload = ops::build_set_split(&self.traits, on)?;
        self.cache.lock().await.invalidate(Some("split_state"));
        self.send_command(payload).await
    }

    async fn fetch_split(&self) -> CatResult<bool> {
        let payload = ops::build_get_split(&self.traits)?;
        let raw = self.round_trip(payload).await?;
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = CivFrame::parse(&raw)?;
                ops::parse_civ_split(&frame)
            }
            model::Dialect::ElecraftAscii => ops::parse_elecraft_split(&raw),
        }
    }

    #[instrument(skip(self))]
    pub async fn is_split_enabled(&self) -> CatResult<bool> {
        self.require_connected().await?;
        let ttl = self.config.cache_ttl();
        self.cache
            .lock()
            .await
            .get("split_state", Some(ttl), || self.fetch_split())
            .await
    }

    async fn fetch_signal_strength(&self) -> CatResult<u8> {
        let payload = ops::build_signal_strength(&self.traits)?;
        match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(payload).await?;
                ops::parse_civ_signal_strength(&frame)
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(payload).await?;
                ops::parse_elecraft_signal_strength(&raw)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn signal_strength(&self) -> CatResult<u8> {
        self.require_connected().await?;
        let ttl = self.config.cache_ttl();
        self.cache
            .lock()
            .await
            .get("signal_strength", Some(ttl), || self.fetch_signal_strength())
            .await
    }

    #[instrument(skip(self))]
    pub async fn signal_strength_fresh(&self) -> CatResult<u8> {
        self.require_connected().await?;
        self.cache
            .lock()
            .await
            .get_fresh("signal_strength", || self.fetch_signal_strength())
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_rit(&self, enabled: bool, offset_hz: i32) -> CatResult<()> {
        self.require_connected().await?;
        let offset_payload = ops::build_set_rit_offset(&self.traits, offset_hz)?;
        let enable_payload = ops::build_set_rit_enable(&self.traits, enabled)?;
        self.cache.lock().await.invalidate(Some("rit_state"));
        self.send_command(offset_payload).await?;
        self.send_command(enable_payload).await
    }

    async fn fetch_rit(&self) -> CatResult<RitState> {
        let offset_hz = match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(ops::build_get_rit_offset(&self.traits)?).await?;
                ops::parse_civ_rit_offset(&frame)?
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(ops::build_get_rit_offset(&self.traits)?).await?;
                ops::parse_elecraft_rit_offset(&raw)?
            }
        };
        let enabled = match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(ops::build_get_rit_enable(&self.traits)?).await?;
                ops::parse_civ_rit_enable(&frame)?
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(ops::build_get_rit_enable(&self.traits)?).await?;
                ops::parse_elecraft_rit_enable(&raw)?
            }
        };
        Ok(RitState { enabled, offset_hz })
    }

    #[instrument(skip(self))]
    pub async fn get_rit(&self) -> CatResult<RitState> {
        self.require_connected().await?;
        let ttl = self.config.cache_ttl();
        self.cache
            .lock()
            .await
            .get("rit_state", Some(ttl), || self.fetch_rit())
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_xit(&self, enabled: bool, offset_hz: i32) -> CatResult<()> {
        self.require_connected().await?;
        if !self.traits.supports_xit {
            return Err(CatError::UnsupportedOperation("XIT".into()));
        }
        let offset_payload = ops::build_set_xit_offset(&self.traits, offset_hz)?;
        let enable_payload = ops::build_set_xit_enable(&self.traits, enabled)?;
        self.cache.lock().await.invalidate(Some("xit_state"));
        self.send_command(offset_payload).await?;
        self.send_command(enable_payload).await
    }

    async fn fetch_xit(&self) -> CatResult<RitState> {
        let offset_hz = match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(ops::build_get_xit_offset(&self.traits)?).await?;
                ops::parse_civ_xit_offset(&frame)?
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(ops::build_get_xit_offset(&self.traits)?).await?;
                ops::parse_elecraft_xit_offset(&raw)?
            }
        };
        let enabled = match self.traits.dialect {
            model::Dialect::CivIcom => {
                let frame = self.exchange_civ(ops::build_get_xit_enable(&self.traits)?).await?;
                ops::parse_civ_xit_enable(&frame)?
            }
            model::Dialect::ElecraftAscii => {
                let raw = self.round_trip(ops::build_get_xit_enable(&self.traits)?).await?;
                ops::parse_elecraft_xit_enable(&raw)?
            }
        };
        Ok(RitState { enabled, offset_hz })
    }

    #[instrument(skip(self))]
    pub async fn get_xit(&self) -> CatResult<RitState> {
        self.require_connected().await?;
        if !self.traits.supports_xit {
            return Err(CatError::UnsupportedOperation("XIT".into()));
        }
        let ttl = self.config.cache_ttl();
        self.cache
            .lock()
            .await
            .get("xit_state", Some(ttl), || self.fetch_xit())
            .await
    }

    /// Apply `frequency → mode → power` in that order, stopping at the
    /// first failure (§4.8).
    #[instrument(skip(self))]
    pub async fn configure(&self, request: ConfigureRequest) -> CatResult<()> {
        let vfo = request.vfo.unwrap_or(Vfo::A);
        if let Some(hz) = request.frequency_hz {
            self.set_frequency(hz, vfo).await?;
        }
        if let Some(mode) = request.mode {
            self.set_mode(mode, vfo).await?;
        }
        if let Some(watts) = request.power_watts {
            self.set_power(watts).await?;
        }
        Ok(())
    }

    pub async fn invalidate_cache(&self) {
        self.cache.lock().await.invalidate(None);
    }

    pub async fn cache_statistics(&self) -> CacheStatistics {
        self.cache.lock().await.statistics()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn traits(&self) -> &ModelTraits {
        &self.traits
    }

    /// Narrows to Main/Sub-only operations when the model has the
    /// `dual_receiver` capability bit set; `None` otherwise (extension
    /// command, replacing a downcast).
    pub fn as_dual_receiver(&self) -> Option<DualReceiverHandle<'_, S>> {
        if self.traits.dual_receiver {
            Some(DualReceiverHandle { controller: self })
        } else {
            None
        }
    }

    pub fn memory_channel_count(&self) -> u16 {
        self.capabilities.memory_channel_count
    }

    #[instrument(skip(self))]
    pub async fn store_current_to_memory(
        &self,
        channel: u16,
        vfo: Vfo,
        name: Option<String>,
    ) -> CatResult<()> {
        self.capabilities.check_memory_channel(channel)?;
        let frequency_hz = self.get_frequency_fresh(vfo).await?;
        let mode = self.get_mode(vfo).await?;
        if let Some(name) = &name {
            if name.len() > 10 {
                return Err(CatError::InvalidParameter("memory name exceeds 10 chars".into()));
            }
        }
        self.memory.lock().await.insert(
            channel,
            MemoryChannel {
                frequency_hz,
                mode,
                name,
            },
        );
        Ok(())
    }

    pub async fn get_memory_channel(&self, channel: u16) -> CatResult<Option<MemoryChannel>> {
        self.capabilities.check_memory_channel(channel)?;
        Ok(self.memory.lock().await.get(&channel).cloned())
    }

    pub async fn clear_memory_channel(&self, channel: u16) -> CatResult<()> {
        self.capabilities.check_memory_channel(channel)?;
        self.memory.lock().await.remove(&channel);
        Ok(())
    }

    /// `read_slot → set_frequency → set_mode` (§4.5).
    #[instrument(skip(self))]
    pub async fn recall_memory_channel(&self, channel: u16, vfo: Vfo) -> CatResult<()> {
        self.capabilities.check_memory_channel(channel)?;
        let stored = self
            .memory
            .lock()
            .await
            .get(&channel)
            .cloned()
            .ok_or_else(|| CatError::InvalidParameter(format!("memory channel {channel} is empty")))?;
        self.set_frequency(stored.frequency_hz, vfo).await?;
        self.set_mode(stored.mode, vfo).await?;
        Ok(())
    }
}

fn freq_key(vfo: Vfo) -> String {
    format!("freq_{}", vfo.tag())
}

fn mode_key(vfo: Vfo) -> String {
    format!("mode_{}", vfo.tag())
}
