use chrono::NaiveDate;

use fitsync_core::contract::{EntryStore, EntryUpdate};
use fitsync_core::store::MemoryEntryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn diet_update(d: NaiveDate) -> EntryUpdate {
    EntryUpdate::diet(d, 2000.0, 1800.0, 300.0, 1500.0)
}

#[tokio::test]
async fn merging_same_update_twice_yields_exactly_one_identical_entry() {
    let store = MemoryEntryStore::new();
    let day = date(2012, 1, 2);

    store.merge(&diet_update(day)).await.unwrap();
    let first = store.get(day).expect("entry created on first merge");

    store.merge(&diet_update(day)).await.unwrap();
    let second = store.get(day).expect("entry still present");

    assert_eq!(store.len(), 1, "re-applying must not duplicate");
    assert_eq!(first, second, "re-applying must not change stored state");
}

#[tokio::test]
async fn diet_then_weight_composes_into_one_full_entry() {
    let store = MemoryEntryStore::new();
    let day = date(2012, 1, 2);

    store.merge(&diet_update(day)).await.unwrap();
    store.merge(&EntryUpdate::weight(day, 150.5)).await.unwrap();

    assert_eq!(store.len(), 1);
    let entry = store.get(day).unwrap();
    assert_eq!(entry.weight, Some(150.5));
    assert_eq!(entry.calorie_goal, Some(2000.0));
    assert_eq!(entry.calories_consumed, Some(1800.0));
    assert_eq!(entry.calories_burned, Some(300.0));
    assert_eq!(entry.net_calories, Some(1500.0));
}

#[tokio::test]
async fn disjoint_field_merges_commute() {
    let day = date(2012, 1, 2);

    let diet_first = MemoryEntryStore::new();
    diet_first.merge(&diet_update(day)).await.unwrap();
    diet_first.merge(&EntryUpdate::weight(day, 150.5)).await.unwrap();

    let weight_first = MemoryEntryStore::new();
    weight_first.merge(&EntryUpdate::weight(day, 150.5)).await.unwrap();
    weight_first.merge(&diet_update(day)).await.unwrap();

    assert_eq!(diet_first.get(day), weight_first.get(day));
}

#[tokio::test]
async fn merge_never_clears_fields_absent_from_the_update() {
    let store = MemoryEntryStore::new();
    let day = date(2012, 1, 2);

    store.merge(&EntryUpdate::weight(day, 150.5)).await.unwrap();
    store.merge(&diet_update(day)).await.unwrap();

    let entry = store.get(day).unwrap();
    assert_eq!(
        entry.weight,
        Some(150.5),
        "a diet merge must leave an existing weight untouched"
    );
}

#[tokio::test]
async fn updated_values_replace_previous_ones_per_field() {
    let store = MemoryEntryStore::new();
    let day = date(2012, 1, 2);

    store.merge(&EntryUpdate::weight(day, 150.5)).await.unwrap();
    store.merge(&EntryUpdate::weight(day, 149.8)).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(day).unwrap().weight, Some(149.8));
}

#[tokio::test]
async fn find_all_returns_entries_sorted_by_date() {
    let store = MemoryEntryStore::new();
    store.merge(&EntryUpdate::weight(date(2012, 1, 5), 150.0)).await.unwrap();
    store.merge(&EntryUpdate::weight(date(2012, 1, 2), 151.0)).await.unwrap();
    store.merge(&EntryUpdate::weight(date(2012, 1, 3), 150.4)).await.unwrap();

    let all = store.find_all().await.unwrap();
    let dates: Vec<_> = all.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(2012, 1, 2), date(2012, 1, 3), date(2012, 1, 5)]);
}
