use std::fs;

use chrono::Utc;
use tempfile::TempDir;

use echodrill::config::Config;
use echodrill::content::catalog::Catalog;
use echodrill::engine::compare::check_sentence;
use echodrill::session::controller::Session;
use echodrill::store::ProgressStore;
use echodrill::store::json_store::JsonStore;
use echodrill::store::schema::{EXPORT_VERSION, UserProgress};

fn make_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[test]
fn session_survives_restart() {
    let (_dir, store) = make_store();
    let catalog = Catalog::load();

    let session = Session::new(store.load());
    let check = check_sentence("A bird", &["a", "bird"]);
    let (session, _) = session.record_sentence(&catalog, &check, false, Utc::now());
    store.save(&session.progress);

    let reloaded = Session::new(store.load());
    assert_eq!(reloaded.progress, session.progress);
    assert_eq!(reloaded.progress.points, 1);
    assert_eq!(reloaded.current_sentence(&catalog).unwrap().english, "A bird is flying");
}

#[test]
fn progress_file_uses_camel_case_millis() {
    let (dir, store) = make_store();
    let catalog = Catalog::load();
    let session = Session::new(UserProgress::default());
    let check = check_sentence("A bird", &["a", "brd"]);
    let now = Utc::now();
    let (session, _) = session.record_sentence(&catalog, &check, false, now);
    store.save(&session.progress);

    let raw = fs::read_to_string(dir.path().join("progress.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json["sentences"]["A bird"];
    assert_eq!(entry["lastPracticed"], now.timestamp_millis());
    assert_eq!(entry["incorrectCount"], 1);
    assert_eq!(entry["wordErrors"], serde_json::json!(["bird"]));
    assert_eq!(json["currentExerciseIndex"], 0);
}

#[test]
fn garbage_file_starts_fresh() {
    let (dir, store) = make_store();
    fs::write(dir.path().join("progress.json"), "[1, 2, 3]").unwrap();
    assert_eq!(store.load(), UserProgress::default());
}

#[test]
fn export_file_round_trip() {
    let (dir, store) = make_store();
    let mut progress = UserProgress::default();
    progress.points = 9;
    store.save(&progress);

    let export = store.export_all(&Config::default());
    assert_eq!(export.echodrill_export_version, EXPORT_VERSION);
    let path = dir.path().join("export.json");
    fs::write(&path, serde_json::to_string_pretty(&export).unwrap()).unwrap();

    let (_dir2, other) = make_store();
    let parsed = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    other.import_all(&parsed).unwrap();
    assert_eq!(other.load().points, 9);
}
