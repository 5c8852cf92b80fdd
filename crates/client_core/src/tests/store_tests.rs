use super::*;
use shared::domain::{ContentObject, PostId};

fn post(id: i64) -> Post {
    Post {
        id: PostId(id),
        title: ContentObject::rendered(format!("Title {id}")),
        content: ContentObject::rendered(format!("<p>Content {id}</p>")),
        excerpt: ContentObject::rendered(format!("<p>Excerpt {id}</p>")),
        date: "2019-04-22T10:15:00".to_string(),
    }
}

#[test]
fn new_store_has_no_posts_and_unset_mode() {
    let store = ContentStore::new();
    assert_eq!(store.get_posts(), None);
    assert_eq!(store.get_display_mode(), DisplayMode::Unset);
}

#[test]
fn empty_list_is_distinct_from_nothing_loaded() {
    let mut store = ContentStore::new();
    store.replace_posts(Vec::new());
    assert_eq!(store.get_posts(), Some(&[][..]));
}

#[test]
fn replace_round_trips_without_transformation() {
    let mut store = ContentStore::new();
    let mut p = post(5);
    p.content.raw = Some("raw body".to_string());
    store.replace_posts(vec![p.clone()]);
    assert_eq!(store.get_posts(), Some(&[p][..]));
}

#[test]
fn replace_is_a_full_replacement_and_keeps_order() {
    let mut store = ContentStore::seeded();
    let ids: Vec<PostId> = store.get_posts().unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PostId(42), PostId(4000)]);

    store.replace_posts(vec![post(9), post(1), post(7)]);
    let ids: Vec<PostId> = store.get_posts().unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PostId(9), PostId(1), PostId(7)]);
}

#[test]
fn set_display_mode_overwrites_unconditionally() {
    let mut store = ContentStore::new();
    store.set_display_mode(true);
    assert_eq!(store.get_display_mode(), DisplayMode::Full);
    store.set_display_mode(true);
    assert_eq!(store.get_display_mode(), DisplayMode::Full);
    store.set_display_mode(false);
    assert_eq!(store.get_display_mode(), DisplayMode::Excerpt);
}

#[test]
fn caller_negation_walks_unset_true_false() {
    let mut store = ContentStore::new();
    let mut seen = vec![store.get_display_mode()];
    for _ in 0..2 {
        let next = store.get_display_mode().toggled();
        store.set_display_mode(next);
        seen.push(store.get_display_mode());
    }
    assert_eq!(
        seen,
        vec![DisplayMode::Unset, DisplayMode::Full, DisplayMode::Excerpt]
    );
}

#[test]
fn commit_sync_only_accepts_the_latest_generation() {
    let mut store = ContentStore::seeded();
    let first = store.begin_sync();
    let second = store.begin_sync();
    assert!(second > first);

    assert!(!store.commit_sync(first, vec![post(1)]));
    assert_eq!(store.get_posts().unwrap()[0].id, PostId(42));

    assert!(store.commit_sync(second, vec![post(2)]));
    assert_eq!(store.get_posts(), Some(&[post(2)][..]));
}

#[test]
fn shared_store_snapshots_and_mutates() {
    let shared = SharedContentStore::seeded();
    let clone = shared.clone();
    clone.replace_posts(vec![post(3)]);
    clone.set_display_mode(true);

    assert_eq!(shared.posts(), Some(vec![post(3)]));
    assert_eq!(shared.display_mode(), DisplayMode::Full);
    let count = shared.with_snapshot(|posts, mode| {
        assert!(mode.is_full());
        posts.map_or(0, <[Post]>::len)
    });
    assert_eq!(count, 1);
}

#[test]
fn weak_handle_does_not_keep_store_alive() {
    let shared = SharedContentStore::new(ContentStore::new());
    let weak = shared.downgrade();
    assert!(weak.upgrade().is_some());
    drop(shared);
    assert!(weak.upgrade().is_none());
}
