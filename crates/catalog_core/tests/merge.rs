use catalog_core::{merge_record, EnrichmentStatus, Record};

fn record(id: u64, name: &str, status: EnrichmentStatus) -> Record {
    Record {
        id,
        name: name.to_string(),
        steam_app_id: Some(1000 + id),
        genre: Some("Action".to_string()),
        enrichment_status: status,
        release_date: None,
        short_description: None,
    }
}

#[test]
fn replaces_matching_record_in_place() {
    let list = vec![
        record(1, "Halo", EnrichmentStatus::Pending),
        record(2, "Portal", EnrichmentStatus::Pending),
        record(3, "Doom", EnrichmentStatus::Pending),
    ];
    let mut updated = record(2, "Portal", EnrichmentStatus::Done);
    updated.short_description = Some("Think with portals.".to_string());

    let merged = merge_record(list.clone(), &updated);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0], list[0]);
    assert_eq!(merged[1], updated);
    assert_eq!(merged[2], list[2]);
}

#[test]
fn unknown_record_is_not_inserted() {
    let list = vec![record(1, "Halo", EnrichmentStatus::Pending)];
    let outsider = record(99, "Tetris", EnrichmentStatus::Done);

    assert_eq!(merge_record(list.clone(), &outsider), list);
    assert!(merge_record(Vec::new(), &outsider).is_empty());
}

#[test]
fn merging_twice_equals_merging_once() {
    let list = vec![
        record(1, "Halo", EnrichmentStatus::Pending),
        record(2, "Portal", EnrichmentStatus::InProgress),
    ];
    let update = record(2, "Portal", EnrichmentStatus::Failed);

    let once = merge_record(list.clone(), &update);
    let twice = merge_record(once.clone(), &update);
    assert_eq!(once, twice);
}

#[test]
fn last_write_wins_for_same_identity() {
    let list = vec![record(1, "Halo", EnrichmentStatus::Pending)];

    let merged = merge_record(list, &record(1, "Halo", EnrichmentStatus::InProgress));
    let merged = merge_record(merged, &record(1, "Halo", EnrichmentStatus::Done));

    assert_eq!(merged[0].enrichment_status, EnrichmentStatus::Done);
}
