//! Query tests: pagination, running events and tag search.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain_events::*;
use std::sync::Arc;

fn at(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, h, 0, 0).unwrap()
}

fn event(start: u32, stop: Option<u32>, tags: &[&str]) -> NewEvent {
    NewEvent {
        start: at(start),
        stop: stop.map(at),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

async fn seeded(
    now: DateTime<Utc>,
    events: Vec<NewEvent>,
) -> (EventService<InMemoryEventRepository>, Arc<FixedClock>) {
    let repo = InMemoryEventRepository::with_events(
        events
            .into_iter()
            .enumerate()
            .map(|(i, e)| e.into_event(format!("{:024x}", i + 1)))
            .collect(),
    );
    let clock = Arc::new(FixedClock::new(now));
    (EventService::with_clock(repo, clock.clone()), clock)
}

#[tokio::test]
async fn test_list_all_pages_with_total() {
    let (service, _) = seeded(at(12), (1..=7).map(|h| event(h, None, &[])).collect()).await;

    let page = service.list_all(Pagination::new(5, 10).unwrap()).await.unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(page.skip, 5);
    assert_eq!(page.limit, 10);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].start, at(6));
}

#[tokio::test]
async fn test_list_all_on_empty_store_is_ok() {
    let (service, _) = seeded(at(12), vec![]).await;
    let page = service.list_all(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_invalid_limit_is_rejected() {
    let (service, _) = seeded(at(12), vec![]).await;
    let page = Pagination { skip: 0, limit: 0 };
    let err = service.list_all(page).await.unwrap_err();
    assert!(matches!(err, EventError::Validation(_)));

    let page = Pagination { skip: 0, limit: 101 };
    assert!(service.list_running(page).await.is_err());

    let page = Pagination {
        skip: u64::MAX,
        limit: 10,
    };
    let err = service.list_all(page).await.unwrap_err();
    assert!(matches!(err, EventError::Validation(_)));
}

#[tokio::test]
async fn test_running_events_follow_the_clock() {
    let (service, clock) = seeded(
        at(12),
        vec![
            event(10, Some(12), &["boundary"]),
            event(11, None, &["open"]),
            event(13, Some(15), &["later"]),
            event(8, Some(9), &["done"]),
        ],
    )
    .await;

    let tags_of = |page: Page<Event>| -> Vec<String> {
        page.results.into_iter().map(|e| e.tags[0].clone()).collect()
    };

    let running = service.list_running(Pagination::default()).await.unwrap();
    assert_eq!(running.total, 2);
    assert_eq!(tags_of(running), vec!["boundary", "open"]);

    clock.advance(Duration::seconds(1));
    let running = service.list_running(Pagination::default()).await.unwrap();
    assert_eq!(tags_of(running), vec!["open"]);

    clock.set(at(13));
    let running = service.list_running(Pagination::default()).await.unwrap();
    assert_eq!(tags_of(running), vec!["open", "later"]);
}

#[tokio::test]
async fn test_search_is_any_of() {
    let (service, _) = seeded(
        at(12),
        vec![
            event(1, None, &["cloud"]),
            event(2, None, &["db", "web"]),
            event(3, None, &["web"]),
        ],
    )
    .await;

    let page = service
        .search_by_tags(TagList::new(["cloud", "db"]), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let page = service
        .search_by_tags(TagList::new(["web"]), Pagination::new(1, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].start, at(3));
}

#[tokio::test]
async fn test_search_without_matches_is_not_found() {
    let (service, _) = seeded(at(12), vec![event(1, None, &["cloud"])]).await;

    let err = service
        .search_by_tags(TagList::new(["x"]), Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::NoTagMatches(ref tags) if tags == &["x"]));
    assert_eq!(err.to_string(), "No events found with tags x");
}

#[tokio::test]
async fn test_search_requires_tags() {
    let (service, _) = seeded(at(12), vec![]).await;
    let err = service
        .search_by_tags(TagList::default(), Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::Validation(_)));
}
