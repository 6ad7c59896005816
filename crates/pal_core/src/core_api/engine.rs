use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::gender::Gender;
use crate::save::{BOSS_PREFIX, CharacterRecord, GroupRecord, SaveDocument};

use super::error::{CoreError, CoreErrorCode};
use super::name_table::NameTable;
use super::types::{Base, Coords, Guild, Pal};

/// Resolves guild, base and pal records from a loaded save into the
/// ownership model. The whole tree is built eagerly.
#[derive(Debug, Clone)]
pub struct Engine {
    names: NameTable,
}

impl Engine {
    pub fn new(names: NameTable) -> Self {
        Self { names }
    }

    /// With no `name`, picks the first guild-type group. With a `name`, picks
    /// the first group whose guild name matches exactly.
    pub fn resolve_guild(
        &self,
        doc: &SaveDocument,
        name: Option<&str>,
    ) -> Result<Guild, CoreError> {
        for group in doc.groups() {
            let matched = match name {
                None => group.is_guild()?,
                Some(wanted) => group.guild_name()? == Some(wanted),
            };
            if matched {
                return self.build_guild(doc, &group);
            }
        }

        Err(CoreError::new(
            CoreErrorCode::GuildNotFound,
            match name {
                Some(wanted) => format!("no guild named {wanted:?} in save"),
                None => "save contains no guild".to_string(),
            },
        ))
    }

    /// Every guild-type group, in save order.
    pub fn resolve_all_guilds(&self, doc: &SaveDocument) -> Result<Vec<Guild>, CoreError> {
        let mut guilds = Vec::new();
        for group in doc.groups() {
            if group.is_guild()? {
                guilds.push(self.build_guild(doc, &group)?);
            }
        }
        if guilds.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::GuildNotFound,
                "save contains no guild",
            ));
        }
        Ok(guilds)
    }

    /// Returns `None` when the save has no base record with `base_id`. An
    /// unreadable key in any base, slot or character record the lookup depends
    /// on is a `MissingField` error.
    pub fn resolve_base(
        &self,
        doc: &SaveDocument,
        base_id: &str,
    ) -> Result<Option<Base>, CoreError> {
        let Some(record) = doc.base(base_id)? else {
            return Ok(None);
        };

        let container_id = record.container_id()?;
        let (raw_x, raw_y) = record.spawn_translation()?;
        let slot = doc.slot_for_container(container_id)?.ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::SlotContainerNotFound,
                format!("base {base_id} references missing slot container {container_id}"),
            )
        })?;

        let instance_ids: HashSet<&str> = slot.instance_ids()?.into_iter().collect();
        let pals = doc
            .characters_with_ids(&instance_ids)?
            .iter()
            .map(|character| self.resolve_pal(character))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(base = base_id, pals = pals.len(), "resolved base");
        Ok(Some(Base {
            id: record.id()?.to_string(),
            container_id: container_id.to_string(),
            coords: Coords::from_spawn_translation(raw_x, raw_y),
            pals,
        }))
    }

    pub fn resolve_pal(&self, character: &CharacterRecord<'_>) -> Result<Pal, CoreError> {
        let character_id = character.character_id()?;
        let code = character_id.replace(BOSS_PREFIX, "");
        let name = self.names.get(&code).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::UnknownCreatureCode,
                format!(
                    "no display name for creature code {code:?} ({})",
                    character.path()
                ),
            )
        })?;

        let raw_gender = character.gender()?;
        let gender = Gender::from_raw(raw_gender).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::MissingField,
                format!("gender value {raw_gender:?} has no variant ({})", character.path()),
            )
        })?;

        let level = character.level()?;
        let level = i32::try_from(level).map_err(|_| {
            CoreError::new(
                CoreErrorCode::MissingField,
                format!("level {level} out of range ({})", character.path()),
            )
        })?;

        let owners = character.owners()?;
        let lucky = character.is_rare();

        Ok(Pal {
            id: character.instance_id()?.to_string(),
            code,
            name: name.to_string(),
            gender,
            level,
            hp: (character.max_hp()? / 1000.0).round_ties_even() as i64,
            nickname: character.nickname()?.map(str::to_string),
            owner: owners.first.to_string(),
            lucky,
            boss: !lucky && character_id.contains(BOSS_PREFIX),
            multiple_owners: owners.count > 1,
        })
    }

    fn build_guild(&self, doc: &SaveDocument, group: &GroupRecord<'_>) -> Result<Guild, CoreError> {
        let id = group.id()?;
        let player_map: IndexMap<String, String> = group
            .members()?
            .into_iter()
            .map(|member| {
                (
                    member.player_uid.to_string(),
                    member.player_name.to_string(),
                )
            })
            .collect();

        let mut seen = HashSet::new();
        let mut bases = Vec::new();
        for base_id in group.base_ids()? {
            if !seen.insert(base_id) {
                continue;
            }
            match self.resolve_base(doc, base_id)? {
                Some(base) => bases.push(base),
                None => warn!(guild = id, base = base_id, "guild references unknown base"),
            }
        }

        let guild = Guild {
            id: id.to_string(),
            name: group.require_guild_name()?.to_string(),
            player_map,
            bases,
        };
        info!(
            guild = %guild.name,
            bases = guild.bases.len(),
            pals = guild.pal_count(),
            "resolved guild"
        );
        Ok(guild)
    }
}
