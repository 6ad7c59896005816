use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pal_core::core_api::{Base, Coords, Engine, Guild, NameTable, Pal};
use pal_core::gender::Gender;
use pal_core::save::SaveDocument;
use pal_render::{
    JsonStyle, TextStyle, render_console, render_json, render_json_string, unlisted_pal_count,
    write_json_report,
};
use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn resolve_fixture_guild(name: Option<&str>) -> Guild {
    let root = workspace_root();
    let names = NameTable::load(&root.join("tests/fixtures/pals.json")).expect("names load");
    let doc = SaveDocument::load(&root.join("tests/fixtures/Level.sav.json")).expect("save loads");
    Engine::new(names)
        .resolve_guild(&doc, name)
        .expect("guild resolves")
}

fn temp_output_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.json", std::process::id(), nanos))
}

fn pal(id: &str, owner: &str) -> Pal {
    Pal {
        id: id.to_string(),
        code: "SheepBall".to_string(),
        name: "Lamball".to_string(),
        gender: Gender::Unknown("None".to_string()),
        level: 1,
        hp: 70,
        nickname: None,
        owner: owner.to_string(),
        lucky: false,
        boss: false,
        multiple_owners: false,
    }
}

fn base(id: &str, pals: Vec<Pal>) -> Base {
    Base {
        id: id.to_string(),
        container_id: format!("{id}-container"),
        coords: Coords { x: 1, y: 2 },
        pals,
    }
}

#[test]
fn console_lists_players_in_guild_order() {
    let guild = resolve_fixture_guild(None);
    let rendered = render_console(&guild, TextStyle::Plain);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Night Owls",
            "  Base 1 (-15, 161)",
            "    Alice",
            "      Foxparks [Lvl 12 / HP 1002] ♀ ♦",
            "  Base 2 (95, 491)",
            "    Alice",
            "      Foxcicle* [Lvl 20 / HP 1500] ♀ 🕱",
            "    Bob",
            "      Lamball [Lvl 5 / HP 545] (Fluffy) ♂ ",
        ]
    );
}

#[test]
fn console_hides_pals_of_unlisted_owners() {
    let guild = resolve_fixture_guild(None);
    let rendered = render_console(&guild, TextStyle::Plain);

    assert!(!rendered.contains("Chikipi"));
    assert_eq!(unlisted_pal_count(&guild), 1);
}

#[test]
fn console_elides_guild_with_only_empty_bases() {
    let guild = resolve_fixture_guild(Some("Quiet Hollow"));
    assert_eq!(guild.bases.len(), 1);
    assert_eq!(render_console(&guild, TextStyle::Plain), "");
    assert_eq!(render_console(&guild, TextStyle::Colored), "");
}

#[test]
fn console_elides_guild_without_bases() {
    let guild = resolve_fixture_guild(Some("Empty Nest"));
    assert_eq!(render_console(&guild, TextStyle::Plain), "");
}

#[test]
fn skipped_bases_keep_their_number() {
    let guild = Guild {
        id: "g".to_string(),
        name: "Numbered".to_string(),
        player_map: [("P1".to_string(), "Alice".to_string())].into_iter().collect(),
        bases: vec![base("empty", vec![]), base("full", vec![pal("i", "P1")])],
    };
    let rendered = render_console(&guild, TextStyle::Plain);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Numbered",
            "  Base 2 (1, 2)",
            "    Alice",
            "      Lamball [Lvl 1 / HP 70] ",
        ]
    );
}

#[test]
fn colored_console_wraps_text_in_escapes() {
    let guild = resolve_fixture_guild(None);
    let colored = render_console(&guild, TextStyle::Colored);
    let plain = render_console(&guild, TextStyle::Plain);

    assert!(colored.contains('\u{1b}'));
    assert!(!plain.contains('\u{1b}'));
    assert!(colored.contains("Night Owls"));
    assert_eq!(colored.lines().count(), plain.lines().count());
}

#[test]
fn json_keeps_empty_collections_and_unlisted_owners() {
    let guilds = vec![
        resolve_fixture_guild(None),
        resolve_fixture_guild(Some("Quiet Hollow")),
    ];
    let value = render_json(&guilds).expect("renders");

    let array = value.as_array().expect("report is an array");
    assert_eq!(array.len(), 2);
    assert_eq!(array[1]["bases"][0]["pals"], Value::Array(vec![]));

    let pals = array[0]["bases"][1]["pals"].as_array().expect("pals array");
    assert_eq!(pals.len(), 3);
    assert_eq!(pals[1]["owner"], "P-stranger");
    assert_eq!(pals[0]["nickname"], Value::Null);
    assert_eq!(pals[2]["nickname"], "Fluffy");
    assert_eq!(array[0]["bases"][1]["coords"], serde_json::json!([95, 491]));
}

#[test]
fn json_uses_model_field_order() {
    let guilds = vec![resolve_fixture_guild(None)];
    let value = render_json(&guilds).expect("renders");

    let guild_keys: Vec<&str> = value[0]
        .as_object()
        .expect("guild object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(guild_keys, vec!["id", "name", "player_map", "bases"]);

    let pal_keys: Vec<&str> = value[0]["bases"][0]["pals"][0]
        .as_object()
        .expect("pal object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        pal_keys,
        vec![
            "id",
            "code",
            "name",
            "gender",
            "level",
            "hp",
            "nickname",
            "owner",
            "lucky",
            "boss",
            "multiple_owners",
        ]
    );
}

#[test]
fn json_report_round_trips() {
    let guilds = vec![resolve_fixture_guild(None)];
    let path = temp_output_path("pal_render_roundtrip");

    fs::write(&path, "stale content that must be replaced").expect("seed file");
    write_json_report(&guilds, &path, JsonStyle::Pretty).expect("report written");

    let text = fs::read_to_string(&path).expect("report readable");
    assert!(text.starts_with("[\n    {"));
    let parsed: Vec<Guild> = serde_json::from_str(&text).expect("report parses");
    assert_eq!(parsed, guilds);

    let _ = fs::remove_file(&path);
}

#[test]
fn compact_json_has_no_newlines() {
    let guilds = vec![resolve_fixture_guild(None)];
    let text = render_json_string(&guilds, JsonStyle::Compact).expect("renders");
    assert!(!text.contains('\n'));
    let parsed: Vec<Guild> = serde_json::from_str(&text).expect("report parses");
    assert_eq!(parsed, guilds);
}

#[test]
fn unwritable_path_is_write_error() {
    let guilds = vec![resolve_fixture_guild(None)];
    let path = workspace_root().join("tests/fixtures/no_such_dir/report.json");

    let err = write_json_report(&guilds, &path, JsonStyle::Pretty).expect_err("must fail");
    assert_eq!(err.code, pal_core::core_api::CoreErrorCode::Write);
    assert!(!path.exists());
}
