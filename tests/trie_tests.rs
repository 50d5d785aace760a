use hub_trie::trie::{Matcher, SubscriberId};
use std::sync::Arc;
use std::thread;

fn topic(s: &str) -> Vec<Arc<str>> {
    s.split('.').map(Arc::from).collect()
}

#[test]
fn exact_match_routes_to_subscriber() {
    let m = Matcher::new();
    let sub = SubscriberId::new();
    m.subscribe(&["a.b.c".to_string()], sub);

    assert_eq!(m.lookup(&topic("a.b.c")), vec![sub]);
    assert!(m.lookup(&topic("a.b.d")).is_empty());
}

#[test]
fn single_segment_wildcard_matches_exactly_one_segment() {
    let m = Matcher::new();
    let sub = SubscriberId::new();
    m.subscribe(&["a.*.c".to_string()], sub);

    assert_eq!(m.lookup(&topic("a.b.c")), vec![sub]);
    assert!(m.lookup(&topic("a.b.x.c")).is_empty(), "wildcard must not span multiple segments");
    assert!(m.lookup(&topic("a.c")).is_empty(), "wildcard must not match zero segments");
}

#[test]
fn subscribing_the_same_pattern_and_subscriber_twice_is_idempotent() {
    let m = Matcher::new();
    let sub = SubscriberId::new();
    m.subscribe(&["a.b".to_string()], sub);
    m.subscribe(&["a.b".to_string()], sub);

    assert_eq!(m.lookup(&topic("a.b")), vec![sub]);
    assert_eq!(m.subscriptions().len(), 1);
}

#[test]
fn lookup_deduplicates_across_overlapping_patterns_for_the_same_subscriber() {
    let m = Matcher::new();
    let sub = SubscriberId::new();
    m.subscribe(&["a.*".to_string(), "a.b".to_string()], sub);

    assert_eq!(m.lookup(&topic("a.b")), vec![sub]);
}

#[test]
fn unsubscribe_removes_routing_and_compacts_the_trie() {
    let m = Matcher::new();
    let s1 = SubscriberId::new();
    let s2 = SubscriberId::new();
    let sub1 = m.subscribe(&["a.b.c".to_string()], s1);
    m.subscribe(&["a.b.c".to_string()], s2);

    m.unsubscribe(&sub1);

    assert_eq!(m.lookup(&topic("a.b.c")), vec![s2]);
    assert!(m.subscriptions().iter().all(|s| s.sub != s1));
}

#[test]
fn unsubscribing_the_last_subscriber_on_a_path_prunes_it_entirely() {
    let m = Matcher::new();
    let sub = SubscriberId::new();
    let s = m.subscribe(&["a.b.c".to_string()], sub);

    m.unsubscribe(&s);

    assert!(m.lookup(&topic("a.b.c")).is_empty());
    assert!(m.subscriptions().is_empty());

    // the trie is still usable after full compaction
    let sub2 = SubscriberId::new();
    m.subscribe(&["a.b.c".to_string()], sub2);
    assert_eq!(m.lookup(&topic("a.b.c")), vec![sub2]);
}

#[test]
fn unknown_pattern_and_subscriber_unsubscribe_is_a_silent_no_op() {
    let m = Matcher::new();
    let s = m.subscribe(&["never.registered".to_string()], SubscriberId::new());
    m.unsubscribe(&s);
    m.unsubscribe(&s);

    let phantom = hub_trie::trie::Subscription {
        patterns: vec!["x.y".to_string()],
        sub: SubscriberId::new(),
    };
    m.unsubscribe(&phantom);
}

#[test]
fn subscriptions_snapshot_lists_every_live_pattern_subscriber_edge() {
    let m = Matcher::new();
    let s1 = SubscriberId::new();
    let s2 = SubscriberId::new();
    m.subscribe(&["a.b".to_string()], s1);
    m.subscribe(&["a.*".to_string()], s2);

    let mut seen: Vec<_> = m
        .subscriptions()
        .into_iter()
        .map(|s| (s.patterns.join(","), s.sub))
        .collect();
    seen.sort();

    assert_eq!(seen, vec![("a.*".to_string(), s2), ("a.b".to_string(), s1)]);
}

#[test]
fn concurrent_subscribe_and_lookup_never_loses_a_registration() {
    let m = Arc::new(Matcher::new());
    let threads = 8;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let m = m.clone();
            thread::spawn(move || {
                let mut ids = Vec::with_capacity(per_thread);
                for i in 0..per_thread {
                    let sub = SubscriberId::new();
                    m.subscribe(&[format!("stress.{t}.{i}")], sub);
                    ids.push(sub);
                }
                ids
            })
        })
        .collect();

    let mut all_ids = Vec::new();
    for h in handles {
        all_ids.extend(h.join().unwrap());
    }

    for t in 0..threads {
        for i in 0..per_thread {
            let matched = m.lookup(&topic(&format!("stress.{t}.{i}")));
            assert_eq!(matched.len(), 1, "stress.{t}.{i} should have exactly one subscriber");
        }
    }

    assert_eq!(m.subscriptions().len(), all_ids.len());
}
