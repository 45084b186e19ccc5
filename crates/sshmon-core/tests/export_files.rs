mod helpers;

use helpers::sample;
use sshmon_core::{
    CriticalSet, DEFAULT_EXPORT_FILE_NAME, Selection, Session, apply, export_path, load_path,
};

#[test]
fn export_then_reload_preserves_records() {
    let ds = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_EXPORT_FILE_NAME);

    let view = apply(&ds, &Selection::all().with_event("4625"));
    let rows = export_path(&view, &CriticalSet::new(["4625"]), &path).unwrap();
    assert_eq!(rows, 5);

    let reloaded = load_path(&path).unwrap();
    assert_eq!(reloaded.len(), view.len());
    assert_eq!(
        reloaded.columns(),
        &["SourceIP", "EventId", "User", "Timestamp", "lat", "lon", "Critique"]
    );
    for (orig, back) in view.events().iter().zip(reloaded.events()) {
        assert_eq!(orig.source_ip, back.source_ip);
        assert_eq!(orig.event_id, back.event_id);
        assert_eq!(orig.timestamp, back.timestamp);
        assert_eq!(orig.location, back.location);
    }
}

#[test]
fn reexport_does_not_duplicate_critique() {
    let ds = sample();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let critical = CriticalSet::new(["4625"]);

    export_path(&apply(&ds, &Selection::all()), &critical, &first).unwrap();
    let reloaded = load_path(&first).unwrap();
    export_path(&apply(&reloaded, &Selection::all()), &critical, &second).unwrap();

    let text = std::fs::read_to_string(&second).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header.matches("Critique").count(), 1);
    assert_eq!(text, std::fs::read_to_string(&first).unwrap());
}

#[test]
fn session_loads_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv");
    std::fs::write(&path, "SourceIP,EventId\n1.1.1.1,4625\n").unwrap();

    let mut session = Session::default();
    let a = session.load_path(&path).unwrap();
    let b = session.load_path(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));

    std::fs::write(&path, "SourceIP,EventId\n1.1.1.1,4625\n2.2.2.2,4625\n").unwrap();
    let c = session.load_path(&path).unwrap();
    assert_eq!(c.len(), 2);
}
