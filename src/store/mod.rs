use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gate::{GateState, GateType, DEFAULT_INTERVAL_MS};
use crate::world::{Facing, Position};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    pub world: String,
    pub position: Position,
}

impl PositionKey {
    pub fn new(world: impl Into<String>, position: Position) -> Self {
        Self {
            world: world.into(),
            position,
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Position(x, y, z) = self.position;
        write!(f, "{}_{}_{}_{}", self.world, x, y, z)
    }
}

impl FromStr for PositionKey {
    type Err = eyre::Report;

    // 월드 이름에 '_'가 들어갈 수 있으므로 뒤에서부터 자름
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(4, '_');
        let (Some(z), Some(y), Some(x), Some(world)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            eyre::bail!("invalid position key {s:?}");
        };
        eyre::ensure!(!world.is_empty(), "position key {s:?} has no world name");

        Ok(Self {
            world: world.to_owned(),
            position: Position(x.parse()?, y.parse()?, z.parse()?),
        })
    }
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MS
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GateRecord {
    // 알 수 없는 종류는 불러올 때 건너뛰기 위해 문자열로 둠
    pub gate_type: String,
    pub facing: Facing,
    #[serde(default)]
    pub output_state: bool,
    #[serde(default)]
    pub three_input_enabled: bool,
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default)]
    pub last_toggle_time: u64,
}

impl From<&GateState> for GateRecord {
    fn from(state: &GateState) -> Self {
        Self {
            gate_type: state.gate_type().to_string(),
            facing: state.facing,
            output_state: state.output_state,
            three_input_enabled: state.three_input_enabled(),
            interval: state.interval().unwrap_or(DEFAULT_INTERVAL_MS),
            last_toggle_time: state.last_toggle_time().unwrap_or_default(),
        }
    }
}

impl GateRecord {
    pub fn to_state(&self) -> eyre::Result<GateState> {
        let gate_type: GateType = self
            .gate_type
            .parse()
            .map_err(|_| eyre::eyre!("unknown gate type {:?}", self.gate_type))?;

        let mut state = GateState::new(gate_type, self.facing, self.last_toggle_time);
        state.output_state = self.output_state;

        if gate_type.supports_three_input() {
            state.set_three_input(self.three_input_enabled)?;
        }
        if state.is_timer() {
            state.set_interval(self.interval)?;
        }

        Ok(state)
    }
}

// 읽을 수 없는 항목은 경고만 남기고 건너뜀
pub fn decode(text: &str) -> eyre::Result<Vec<(PositionKey, GateState)>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)?;
    let mut gates = Vec::with_capacity(raw.len());

    for (key, value) in raw {
        let entry = key
            .parse::<PositionKey>()
            .and_then(|key| {
                let record: GateRecord = serde_json::from_value(value)?;
                Ok((key, record.to_state()?))
            });

        match entry {
            Ok(entry) => gates.push(entry),
            Err(err) => tracing::warn!("skipping saved gate {key:?}: {err:#}"),
        }
    }

    Ok(gates)
}

pub fn encode(world: &str, gates: &[(Position, GateState)]) -> eyre::Result<String> {
    let records: BTreeMap<String, GateRecord> = gates
        .iter()
        .map(|(pos, state)| (PositionKey::new(world, *pos).to_string(), state.into()))
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}

#[derive(Debug, Clone)]
pub struct GateStore {
    path: PathBuf,
    world: String,
}

impl GateStore {
    pub fn new(path: impl Into<PathBuf>, world: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            world: world.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // 파일이 없으면 빈 목록
    pub fn load(&self) -> eyre::Result<Vec<(Position, GateState)>> {
        if !self.path.exists() {
            tracing::warn!("no gates file at {:?}, starting fresh", self.path);
            return Ok(Vec::new());
        }

        let gates = decode(&fs::read_to_string(&self.path)?)?
            .into_iter()
            .filter(|(key, _)| key.world == self.world)
            .map(|(key, state)| (key.position, state))
            .collect::<Vec<_>>();

        tracing::info!("loaded {} gates from {:?}", gates.len(), self.path);
        Ok(gates)
    }

    pub fn save(&self, gates: &[(Position, GateState)]) -> eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encode(&self.world, gates)?)?;

        tracing::info!("saved {} gates to {:?}", gates.len(), self.path);
        Ok(())
    }
}
