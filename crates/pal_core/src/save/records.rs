//! Typed views over the four save collections. Each accessor reads exactly one
//! raw field path and reports a `MissingField` error naming it on failure.

use crate::core_api::CoreError;
use crate::field::FieldReader;

pub const GUILD_GROUP_TYPE: &str = "EPalGroupType::Guild";
pub const BOSS_PREFIX: &str = "BOSS_";

const GROUP_RAW: [&str; 3] = ["value", "RawData", "value"];
const WORKER_RAW: [&str; 5] = ["value", "WorkerDirector", "value", "RawData", "value"];
const SAVE_PARAMETER: [&str; 6] = [
    "value",
    "RawData",
    "value",
    "object",
    "SaveParameter",
    "value",
];

fn under<'s>(prefix: &[&'s str], rest: &[&'s str]) -> Vec<&'s str> {
    prefix.iter().chain(rest).copied().collect()
}

#[derive(Debug, Clone)]
pub struct GroupRecord<'a> {
    reader: FieldReader<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildMember<'a> {
    pub player_uid: &'a str,
    pub player_name: &'a str,
}

impl<'a> GroupRecord<'a> {
    pub fn new(reader: FieldReader<'a>) -> Self {
        Self { reader }
    }

    pub fn id(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&["key"])
    }

    pub fn group_type(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&["value", "GroupType", "value", "value"])
    }

    pub fn is_guild(&self) -> Result<bool, CoreError> {
        Ok(self.group_type()? == GUILD_GROUP_TYPE)
    }

    /// Groups other than guilds carry no guild name.
    pub fn guild_name(&self) -> Result<Option<&'a str>, CoreError> {
        self.reader.read_opt_str(&under(&GROUP_RAW, &["guild_name"]))
    }

    pub fn require_guild_name(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&under(&GROUP_RAW, &["guild_name"]))
    }

    pub fn members(&self) -> Result<Vec<GuildMember<'a>>, CoreError> {
        self.reader
            .read_array(&under(&GROUP_RAW, &["players"]))?
            .iter()
            .map(|player| {
                Ok(GuildMember {
                    player_uid: player.read_str(&["player_uid"])?,
                    player_name: player.read_str(&["player_info", "player_name"])?,
                })
            })
            .collect()
    }

    pub fn base_ids(&self) -> Result<Vec<&'a str>, CoreError> {
        self.reader
            .read_array(&under(&GROUP_RAW, &["base_ids"]))?
            .iter()
            .map(FieldReader::as_str)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BaseRecord<'a> {
    reader: FieldReader<'a>,
}

impl<'a> BaseRecord<'a> {
    pub fn new(reader: FieldReader<'a>) -> Self {
        Self { reader }
    }

    pub fn id(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&["key"])
    }

    pub fn container_id(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&under(&WORKER_RAW, &["container_id"]))
    }

    /// Raw world-space `(x, y)` of the base's worker spawn point.
    pub fn spawn_translation(&self) -> Result<(f64, f64), CoreError> {
        let translation = self
            .reader
            .get(&under(&WORKER_RAW, &["spawn_transform", "translation"]))?;
        Ok((translation.read_f64(&["x"])?, translation.read_f64(&["y"])?))
    }
}

#[derive(Debug, Clone)]
pub struct SlotRecord<'a> {
    reader: FieldReader<'a>,
}

impl<'a> SlotRecord<'a> {
    pub fn new(reader: FieldReader<'a>) -> Self {
        Self { reader }
    }

    pub fn container_id(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&["key", "ID", "value"])
    }

    /// Instance ids in slot order. Empty slots hold the all-zero id, which
    /// never matches a character.
    pub fn instance_ids(&self) -> Result<Vec<&'a str>, CoreError> {
        self.reader
            .read_array(&["value", "Slots", "value", "values"])?
            .iter()
            .map(|slot| slot.read_str(&["RawData", "value", "instance_id"]))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owners<'a> {
    pub first: &'a str,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct CharacterRecord<'a> {
    reader: FieldReader<'a>,
}

impl<'a> CharacterRecord<'a> {
    pub fn new(reader: FieldReader<'a>) -> Self {
        Self { reader }
    }

    pub fn path(&self) -> &str {
        self.reader.path()
    }

    pub fn instance_id(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&["key", "InstanceId", "value"])
    }

    pub fn character_id(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&under(&SAVE_PARAMETER, &["CharacterID", "value"]))
    }

    pub fn gender(&self) -> Result<&'a str, CoreError> {
        self.reader.read_str(&under(&SAVE_PARAMETER, &["Gender", "value", "value"]))
    }

    pub fn level(&self) -> Result<i64, CoreError> {
        self.reader.read_i64(&under(&SAVE_PARAMETER, &["Level", "value"]))
    }

    pub fn max_hp(&self) -> Result<f64, CoreError> {
        self.reader.read_f64(&under(&SAVE_PARAMETER, &["MaxHP", "value", "Value", "value"]))
    }

    pub fn nickname(&self) -> Result<Option<&'a str>, CoreError> {
        self.reader.read_opt_str(&under(&SAVE_PARAMETER, &["NickName", "value"]))
    }

    /// First owner plus the length of the owner list. An empty list is
    /// reported as a missing first element.
    pub fn owners(&self) -> Result<Owners<'a>, CoreError> {
        let list = self.reader.get(&under(
            &SAVE_PARAMETER,
            &["OldOwnerPlayerUIds", "value", "values"],
        ))?;
        let ids = list.elements()?;
        let first = ids
            .first()
            .ok_or_else(|| CoreError::missing_field(format!("{}[0]", list.path())))?
            .as_str()?;
        Ok(Owners {
            first,
            count: ids.len(),
        })
    }

    /// The rarity marker only matters by presence.
    pub fn is_rare(&self) -> bool {
        self.reader.has(&under(&SAVE_PARAMETER, &["IsRarePal"]))
    }
}
