use chrono::Utc;
use pretty_assertions::assert_eq;
use workfolio_core::{CoreError, NewWork, WorkCollection, WorkPatch};

fn sample(title: &str) -> NewWork {
    NewWork::new(title, "desc", "/uploads/x.png", "https://client.test")
}

#[test]
fn ids_start_at_one_and_follow_max() {
    let mut c = WorkCollection::new();
    assert_eq!(c.next_id(), 1);

    let a = c.insert(sample("a"), Utc::now()).unwrap();
    let b = c.insert(sample("b"), Utc::now()).unwrap();
    let d = c.insert(sample("c"), Utc::now()).unwrap();
    assert_eq!((a.id, b.id, d.id), (1, 2, 3));

    c.remove(2).unwrap();
    let e = c.insert(sample("e"), Utc::now()).unwrap();
    assert_eq!(e.id, 4);

    let ids: Vec<_> = c.as_slice().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn emptied_collection_restarts_at_one() {
    let mut c = WorkCollection::new();
    c.insert(sample("a"), Utc::now()).unwrap();
    c.remove(1).unwrap();
    assert!(c.is_empty());
    assert_eq!(c.insert(sample("b"), Utc::now()).unwrap().id, 1);
}

#[test]
fn create_rejects_blank_title() {
    let mut c = WorkCollection::new();
    let mut new = sample("");
    new.is_visible = true;
    match c.insert(new, Utc::now()) {
        Err(CoreError::Validation(fields)) => assert_eq!(fields, vec!["title"]),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(c.is_empty());
}

#[test]
fn visibility_update_skips_validation() {
    let now = Utc::now();
    // a record that predates validation, loaded from disk
    let mut legacy = workfolio_core::Work::from_new(1, sample("a"), now);
    legacy.description = String::new();
    let mut c = WorkCollection::from_vec(vec![legacy]);

    let patch = WorkPatch { is_visible: Some(false), ..Default::default() };
    let w = c.update(1, &patch, Utc::now()).unwrap();
    assert!(!w.is_visible);

    let patch = WorkPatch { title: Some("a2".into()), ..Default::default() };
    assert!(matches!(
        c.update(1, &patch, Utc::now()),
        Err(CoreError::Validation(f)) if f == vec!["description"]
    ));
}

#[test]
fn failed_update_leaves_record_untouched() {
    let mut c = WorkCollection::new();
    let before = c.insert(sample("a"), Utc::now()).unwrap();

    let patch = WorkPatch {
        title: Some("   ".into()),
        is_visible: Some(false),
        ..Default::default()
    };
    assert!(c.update(1, &patch, Utc::now()).is_err());
    assert_eq!(c.get(1).unwrap(), &before);
}

#[test]
fn missing_ids_are_not_found() {
    let mut c = WorkCollection::new();
    c.insert(sample("a"), Utc::now()).unwrap();

    assert!(matches!(c.get(9), Err(CoreError::NotFound(9))));
    assert!(matches!(
        c.update(9, &WorkPatch::default(), Utc::now()),
        Err(CoreError::NotFound(9))
    ));
    c.remove(1).unwrap();
    assert!(matches!(c.remove(1), Err(CoreError::NotFound(1))));
    assert!(matches!(c.remove(1), Err(CoreError::NotFound(1))));
}
