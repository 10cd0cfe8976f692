use super::*;

fn item(id: &str, title: &str, media_type: MediaType, status: WatchStatus) -> WatchlistItem {
    WatchlistItem {
        id: id.into(),
        media_id: 1,
        media_type,
        title: title.into(),
        status,
        rating: None,
        notes: None,
        added_at: None,
    }
}

fn sample() -> Vec<WatchlistItem> {
    vec![
        item("1", "Severance", MediaType::Tv, WatchStatus::Watching),
        item("2", "Dune", MediaType::Movie, WatchStatus::Completed),
        item("3", "Dune: Part Two", MediaType::Movie, WatchStatus::PlanToWatch),
        item("4", "The Bear", MediaType::Tv, WatchStatus::Dropped),
        item("5", "Arrival", MediaType::Movie, WatchStatus::Completed),
    ]
}

fn ids(group: &StatusGroup<'_>) -> Vec<String> {
    group.items.iter().map(|i| i.id.clone()).collect()
}

#[test]
fn empty_input_builds_empty_view() {
    let view = LibraryView::build(&[], &LibraryFilter::default());
    assert!(view.is_empty());
    assert!(view.sections.is_empty());
}

#[test]
fn groups_by_media_type_then_status_order() {
    let items = sample();
    let view = LibraryView::build(&items, &LibraryFilter::default());
    assert_eq!(view.total, 5);

    let kinds: Vec<MediaType> = view.sections.iter().map(|s| s.media_type).collect();
    assert_eq!(kinds, vec![MediaType::Movie, MediaType::Tv]);

    let movies = view.section(MediaType::Movie).unwrap();
    let statuses: Vec<WatchStatus> = movies.groups.iter().map(|g| g.status).collect();
    assert_eq!(statuses, vec![WatchStatus::PlanToWatch, WatchStatus::Completed]);
    assert_eq!(movies.len(), 3);
}

#[test]
fn items_keep_input_order_within_group() {
    let items = sample();
    let view = LibraryView::build(&items, &LibraryFilter::default());
    let completed = &view.section(MediaType::Movie).unwrap().groups[1];
    assert_eq!(ids(completed), vec!["2", "5"]);
}

#[test]
fn counts_per_status_and_media_type() {
    let items = sample();
    let view = LibraryView::build(&items, &LibraryFilter::default());
    assert_eq!(view.count(WatchStatus::Completed), 2);
    assert_eq!(view.count(WatchStatus::OnHold), 0);
    assert_eq!(view.media_counts.get(&MediaType::Tv), Some(&2));
}

#[test]
fn term_filter_is_case_insensitive_substring() {
    let items = sample();
    let view = LibraryView::build(&items, &LibraryFilter::term("  dUnE "));
    assert_eq!(view.total, 2);
    assert!(view.section(MediaType::Tv).is_none());
}

#[test]
fn blank_term_keeps_everything() {
    let items = sample();
    let view = LibraryView::build(&items, &LibraryFilter::term("   "));
    assert_eq!(view.total, items.len());
}

#[test]
fn media_type_and_status_filters_narrow() {
    let items = sample();
    let filter = LibraryFilter { media_type: Some(MediaType::Tv), status: Some(WatchStatus::Watching), ..LibraryFilter::default() };
    let view = LibraryView::build(&items, &filter);
    assert_eq!(view.total, 1);
    assert_eq!(ids(&view.sections[0].groups[0]), vec!["1"]);
}

#[test]
fn no_match_yields_empty_view() {
    let items = sample();
    let view = LibraryView::build(&items, &LibraryFilter::term("zzz"));
    assert!(view.is_empty());
    assert!(view.status_counts.is_empty());
}

#[test]
fn select_keeps_input_order_across_groups() {
    let items = sample();
    let picked: Vec<&str> = LibraryFilter::default().select(&items).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(picked, vec!["1", "2", "3", "4", "5"]);

    let movies = LibraryFilter { media_type: Some(MediaType::Movie), ..LibraryFilter::default() };
    let picked: Vec<&str> = movies.select(&items).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(picked, vec!["2", "3", "5"]);
}
