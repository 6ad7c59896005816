use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anstyle::{AnsiColor, Style};
use pal_core::core_api::{Base, CoreError, CoreErrorCode, Guild, Pal};
use pal_core::gender::Gender;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::{PrettyFormatter, Serializer};

const JSON_INDENT: &[u8] = b"    ";
const GUILD_INDENT: &str = "";
const BASE_INDENT: &str = "  ";
const PLAYER_INDENT: &str = "    ";
const PAL_INDENT: &str = "      ";
const MULTIPLE_OWNERS_MARK: &str = "*";
const MALE_GLYPH: &str = "♂ ";
const FEMALE_GLYPH: &str = "♀ ";
const LUCKY_GLYPH: &str = "♦";
const BOSS_GLYPH: &str = "🕱";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Colored,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    Pretty,
    Compact,
}

struct Palette;

impl Palette {
    const GUILD: Style = AnsiColor::Magenta.on_default().bold();
    const BASE: Style = AnsiColor::Green.on_default().bold();
    const PLAYER: Style = AnsiColor::Yellow.on_default().bold();
    const PAL: Style = AnsiColor::White.on_default();
    const NICKNAME: Style = AnsiColor::BrightBlack.on_default();
    const MALE: Style = AnsiColor::Blue.on_default();
    const FEMALE: Style = AnsiColor::Magenta.on_default();
    const LUCKY: Style = AnsiColor::Cyan.on_default();
    const BOSS: Style = AnsiColor::Red.on_default();
}

/// Renders one guild as an indented guild / base / player / pal listing.
///
/// Guilds without bases and bases without pals produce no output. Players are
/// listed in guild order and only where they own a pal at that base, so pals
/// whose owner is not a guild member are left out (see [`unlisted_pal_count`]).
pub fn render_console(guild: &Guild, style: TextStyle) -> String {
    let mut out = String::new();
    if guild.bases.is_empty() {
        return out;
    }

    let mut header_written = false;
    for (index, base) in guild.bases.iter().enumerate() {
        if base.pals.is_empty() {
            continue;
        }
        if !header_written {
            push_line(&mut out, style, Palette::GUILD, GUILD_INDENT, &guild.name);
            header_written = true;
        }
        let title = format!("Base {} ({}, {})", index + 1, base.coords.x, base.coords.y);
        push_line(&mut out, style, Palette::BASE, BASE_INDENT, &title);
        render_base_players(&mut out, guild, base, style);
    }
    out
}

/// Pals at non-empty bases whose owner is missing from the guild's player map.
/// These appear in JSON output but not in console output.
pub fn unlisted_pal_count(guild: &Guild) -> usize {
    guild
        .bases
        .iter()
        .flat_map(|base| &base.pals)
        .filter(|pal| guild.player_name(&pal.owner).is_none())
        .count()
}

/// The whole guild tree as a JSON array, nothing left out.
pub fn render_json(guilds: &[Guild]) -> Result<JsonValue, CoreError> {
    serde_json::to_value(guilds).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Write,
            format!("failed to render JSON report: {e}"),
        )
    })
}

pub fn render_json_string(guilds: &[Guild], style: JsonStyle) -> Result<String, CoreError> {
    let report = render_json(guilds)?;
    let mut buf = Vec::new();
    let result = match style {
        JsonStyle::Pretty => {
            let formatter = PrettyFormatter::with_indent(JSON_INDENT);
            report.serialize(&mut Serializer::with_formatter(&mut buf, formatter))
        }
        JsonStyle::Compact => report.serialize(&mut Serializer::new(&mut buf)),
    };
    result.map_err(|e| {
        CoreError::new(
            CoreErrorCode::Write,
            format!("failed to render JSON report: {e}"),
        )
    })?;
    String::from_utf8(buf).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Write,
            format!("rendered JSON is not UTF-8: {e}"),
        )
    })
}

/// Writes the full report, replacing any existing file. The document is
/// rendered completely before the file is touched.
pub fn write_json_report(
    guilds: &[Guild],
    path: &Path,
    style: JsonStyle,
) -> Result<(), CoreError> {
    let rendered = render_json_string(guilds, style)?;
    fs::write(path, rendered).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Write,
            format!("failed to write {}: {e}", path.display()),
        )
    })
}

fn render_base_players(out: &mut String, guild: &Guild, base: &Base, style: TextStyle) {
    for (player_id, player_name) in &guild.player_map {
        let mut owned = base.pals_owned_by(player_id).peekable();
        if owned.peek().is_none() {
            continue;
        }
        push_line(out, style, Palette::PLAYER, PLAYER_INDENT, player_name);
        for pal in owned {
            render_pal_line(out, pal, style);
        }
    }
}

fn render_pal_line(out: &mut String, pal: &Pal, style: TextStyle) {
    out.push_str(PAL_INDENT);
    let marker = if pal.multiple_owners {
        MULTIPLE_OWNERS_MARK
    } else {
        ""
    };
    paint(
        out,
        style,
        Palette::PAL,
        &format!("{}{marker} [Lvl {} / HP {}] ", pal.name, pal.level, pal.hp),
    );
    if let Some(nickname) = &pal.nickname {
        paint(out, style, Palette::NICKNAME, &format!("({nickname}) "));
    }
    match pal.gender {
        Gender::Male => paint(out, style, Palette::MALE, MALE_GLYPH),
        Gender::Female => paint(out, style, Palette::FEMALE, FEMALE_GLYPH),
        Gender::Unknown(_) => {}
    }
    if pal.lucky {
        paint(out, style, Palette::LUCKY, LUCKY_GLYPH);
    }
    if pal.boss {
        paint(out, style, Palette::BOSS, BOSS_GLYPH);
    }
    out.push('\n');
}

fn push_line(out: &mut String, style: TextStyle, ansi: Style, indent: &str, text: &str) {
    out.push_str(indent);
    paint(out, style, ansi, text);
    out.push('\n');
}

fn paint(out: &mut String, style: TextStyle, ansi: Style, text: &str) {
    match style {
        TextStyle::Colored => {
            let _ = write!(out, "{}{text}{}", ansi.render(), ansi.render_reset());
        }
        TextStyle::Plain => out.push_str(text),
    }
}
