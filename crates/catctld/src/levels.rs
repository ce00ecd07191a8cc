// SPDX-License-Identifier: MIT

//! `set_level`/`get_level` (§4.9): AGC, NB, NR and IF/IFFILTER are tracked
//! as per-connection state rather than radio wire ops — none of the
//! supported models expose a CAT command for these in the command set, so
//! there is nothing to send; the daemon simply remembers what the client
//! last asked for.

/// `set_level`/`get_level` failure, with its own rigctld return code:
/// an unrecognized level name is `NotImplemented` (§4.9), not `NotSupported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    Unknown(String),
    OutOfRange(String),
}

impl LevelError {
    pub fn rigctld_code(&self) -> i32 {
        match self {
            LevelError::Unknown(_) => -4,
            LevelError::OutOfRange(_) => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Agc,
    Nb,
    Nr,
    IfFilter,
}

impl Level {
    fn parse(name: &str) -> Option<Level> {
        match name {
            "AGC" => Some(Level::Agc),
            "NB" => Some(Level::Nb),
            "NR" => Some(Level::Nr),
            "IF" | "IFFILTER" => Some(Level::IfFilter),
            _ => None,
        }
    }

    fn min(self) -> i32 {
        match self {
            Level::Agc | Level::Nb | Level::Nr => 0,
            Level::IfFilter => 1,
        }
    }

    fn max(self) -> i32 {
        match self {
            Level::Agc => 4,
            Level::Nb | Level::Nr => 255,
            Level::IfFilter => 3,
        }
    }
}

pub struct LevelStore {
    agc: i32,
    nb: i32,
    nr: i32,
    if_filter: i32,
}

impl Default for LevelStore {
    fn default() -> Self {
        LevelStore { agc: 0, nb: 0, nr: 0, if_filter: 1 }
    }
}

impl LevelStore {
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), LevelError> {
        let level = Level::parse(name).ok_or_else(|| LevelError::Unknown(name.to_string()))?;
        let value: i32 = value
            .parse()
            .map_err(|_| LevelError::OutOfRange(format!("not an integer: {value}")))?;
        if value < level.min() || value > level.max() {
            return Err(LevelError::OutOfRange(format!("{name} out of range: {value}")));
        }
        match level {
            Level::Agc => self.agc = value,
            Level::Nb => self.nb = value,
            Level::Nr => self.nr = value,
            Level::IfFilter => self.if_filter = value,
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<i32, LevelError> {
        let level = Level::parse(name).ok_or_else(|| LevelError::Unknown(name.to_string()))?;
        Ok(match level {
            Level::Agc => self.agc,
            Level::Nb => self.nb,
            Level::Nr => self.nr,
            Level::IfFilter => self.if_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_is_not_implemented() {
        let store = LevelStore::default();
        let err = store.get("SQUELCH").unwrap_err();
        assert_eq!(err, LevelError::Unknown("SQUELCH".into()));
        assert_eq!(err.rigctld_code(), -4);
    }

    #[test]
    fn agc_round_trips_within_range() {
        let mut store = LevelStore::default();
        store.set("AGC", "2").unwrap();
        assert_eq!(store.get("AGC").unwrap(), 2);
    }

    #[test]
    fn iffilter_accepts_its_alias() {
        let mut store = LevelStore::default();
        store.set("IFFILTER", "3").unwrap();
        assert_eq!(store.get("IF").unwrap(), 3);
    }

    #[test]
    fn agc_rejects_out_of_range() {
        let mut store = LevelStore::default();
        assert!(store.set("AGC", "5").is_err());
    }

    #[test]
    fn iffilter_rejects_zero() {
        let mut store = LevelStore::default();
        let err = store.set("IFFILTER", "0").unwrap_err();
        assert_eq!(err.rigctld_code(), -1);
    }
}
