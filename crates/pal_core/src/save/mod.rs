mod records;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::mem;
use std::path::Path;

use flate2::read::GzDecoder;
use serde_json::Value;
use tracing::debug;

use crate::core_api::{CoreError, CoreErrorCode};
use crate::field::FieldReader;

pub use records::{
    BOSS_PREFIX, BaseRecord, CharacterRecord, GUILD_GROUP_TYPE, GroupRecord, GuildMember, Owners,
    SlotRecord,
};

pub const GROUPS_KEY: &str = "GroupSaveDataMap";
pub const BASES_KEY: &str = "BaseCampSaveData";
pub const SLOTS_KEY: &str = "CharacterContainerSaveData";
pub const CHARACTERS_KEY: &str = "CharacterSaveParameterMap";

const WORLD_POINTER: &str = "/properties/worldSaveData/value";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The four world-save collections the ownership report needs, plus id
/// indexes built once at load time.
///
/// A record whose key cannot be read is kept out of its index. The first such
/// key error per collection is held back and returned by any lookup the
/// unreadable record could have answered.
#[derive(Debug, Default)]
pub struct SaveDocument {
    groups: Vec<Value>,
    bases: Vec<Value>,
    slots: Vec<Value>,
    characters: Vec<Value>,
    base_index: HashMap<String, usize>,
    container_index: HashMap<String, usize>,
    instance_index: HashMap<String, Vec<usize>>,
    base_key_error: Option<CoreError>,
    container_key_error: Option<CoreError>,
    instance_key_error: Option<CoreError>,
}

impl SaveDocument {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::new(
                CoreErrorCode::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_slice(&bytes)
    }

    /// Parses a save export. Gzip-compressed input is inflated first.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let root: Value = if bytes.starts_with(&GZIP_MAGIC) {
            let mut inflated = Vec::new();
            GzDecoder::new(bytes)
                .read_to_end(&mut inflated)
                .map_err(|e| {
                    CoreError::new(
                        CoreErrorCode::MalformedSave,
                        format!("failed to decompress save export: {e}"),
                    )
                })?;
            parse_json(&inflated)?
        } else {
            parse_json(bytes)?
        };
        Self::from_value(root)
    }

    pub fn from_value(mut root: Value) -> Result<Self, CoreError> {
        let world = root.pointer_mut(WORLD_POINTER).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::MalformedSave,
                "missing properties.worldSaveData.value",
            )
        })?;

        let groups = take_collection(world, GROUPS_KEY)?;
        let bases = take_collection(world, BASES_KEY)?;
        let slots = take_collection(world, SLOTS_KEY)?;
        let characters = take_collection(world, CHARACTERS_KEY)?;

        let mut doc = Self {
            groups,
            bases,
            slots,
            characters,
            ..Self::default()
        };
        doc.build_indexes();
        debug!(
            groups = doc.groups.len(),
            bases = doc.bases.len(),
            slots = doc.slots.len(),
            characters = doc.characters.len(),
            "save document loaded"
        );
        Ok(doc)
    }

    pub fn groups(&self) -> impl Iterator<Item = GroupRecord<'_>> {
        self.groups
            .iter()
            .enumerate()
            .map(|(index, value)| GroupRecord::new(record_reader(GROUPS_KEY, index, value)))
    }

    /// `Ok(None)` only when every base key was readable and none matched.
    pub fn base(&self, base_id: &str) -> Result<Option<BaseRecord<'_>>, CoreError> {
        match self.base_index.get(base_id) {
            Some(&index) => Ok(Some(BaseRecord::new(record_reader(
                BASES_KEY,
                index,
                &self.bases[index],
            )))),
            None => unmatched(&self.base_key_error),
        }
    }

    /// `Ok(None)` only when every container key was readable and none matched.
    pub fn slot_for_container(
        &self,
        container_id: &str,
    ) -> Result<Option<SlotRecord<'_>>, CoreError> {
        match self.container_index.get(container_id) {
            Some(&index) => Ok(Some(SlotRecord::new(record_reader(
                SLOTS_KEY,
                index,
                &self.slots[index],
            )))),
            None => unmatched(&self.container_key_error),
        }
    }

    /// Characters whose instance id is in `instance_ids`, in collection order.
    /// Fails if any character key is unreadable, since that record could be
    /// one of them.
    pub fn characters_with_ids(
        &self,
        instance_ids: &HashSet<&str>,
    ) -> Result<Vec<CharacterRecord<'_>>, CoreError> {
        if let Some(err) = &self.instance_key_error {
            return Err(err.clone());
        }
        let mut positions: Vec<usize> = instance_ids
            .iter()
            .filter_map(|id| self.instance_index.get(*id))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable();
        Ok(positions
            .into_iter()
            .map(|index| {
                CharacterRecord::new(record_reader(
                    CHARACTERS_KEY,
                    index,
                    &self.characters[index],
                ))
            })
            .collect())
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn base_count(&self) -> usize {
        self.bases.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    // The first record wins on a duplicate base or container id.
    fn build_indexes(&mut self) {
        for (index, value) in self.bases.iter().enumerate() {
            let record = BaseRecord::new(record_reader(BASES_KEY, index, value));
            match record.id() {
                Ok(id) => {
                    self.base_index.entry(id.to_string()).or_insert(index);
                }
                Err(e) => hold_key_error(&mut self.base_key_error, e),
            }
        }
        for (index, value) in self.slots.iter().enumerate() {
            let record = SlotRecord::new(record_reader(SLOTS_KEY, index, value));
            match record.container_id() {
                Ok(id) => {
                    self.container_index.entry(id.to_string()).or_insert(index);
                }
                Err(e) => hold_key_error(&mut self.container_key_error, e),
            }
        }
        for (index, value) in self.characters.iter().enumerate() {
            let record = CharacterRecord::new(record_reader(CHARACTERS_KEY, index, value));
            match record.instance_id() {
                Ok(id) => self
                    .instance_index
                    .entry(id.to_string())
                    .or_default()
                    .push(index),
                Err(e) => hold_key_error(&mut self.instance_key_error, e),
            }
        }
    }
}

fn hold_key_error(slot: &mut Option<CoreError>, err: CoreError) {
    debug!(error = %err, "record left out of index");
    slot.get_or_insert(err);
}

fn unmatched<T>(key_error: &Option<CoreError>) -> Result<Option<T>, CoreError> {
    match key_error {
        Some(err) => Err(err.clone()),
        None => Ok(None),
    }
}

fn parse_json(bytes: &[u8]) -> Result<Value, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::MalformedSave,
            format!("save export is not valid JSON: {e}"),
        )
    })
}

fn take_collection(world: &mut Value, key: &str) -> Result<Vec<Value>, CoreError> {
    world
        .get_mut(key)
        .and_then(|collection| collection.get_mut("value"))
        .and_then(Value::as_array_mut)
        .map(mem::take)
        .ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::MalformedSave,
                format!("missing properties.worldSaveData.value.{key}.value"),
            )
        })
}

fn record_reader<'a>(collection: &str, index: usize, value: &'a Value) -> FieldReader<'a> {
    FieldReader::new(value, format!("{collection}[{index}]"))
}
