use base::{Latest, Sequence, Stamped};
use std::thread;

#[test]
fn test_sequence_starts_at_one() {
    let seq = Sequence::new();
    assert_eq!(seq.next(), 1);
    assert_eq!(seq.next(), 2);
}

#[test]
fn test_sequence_clones_share_counter() {
    let a = Sequence::new();
    let b = a.clone();
    a.next();
    assert_eq!(b.next(), 2);
}

#[test]
fn test_latest_starts_empty() {
    let latest = Latest::<String>::new();
    assert!(latest.get().is_none());
    assert_eq!(latest.seq(), 0);
}

#[test]
fn test_latest_accepts_newer() {
    let latest = Latest::new();
    assert!(latest.publish(Stamped::new(1, "mask")));
    assert!(latest.publish(Stamped::new(3, "no_mask")));
    assert_eq!(latest.get(), Some(Stamped::new(3, "no_mask")));
}

#[test]
fn test_latest_rejects_stale_result() {
    let latest = Latest::new();
    assert!(latest.publish(Stamped::new(5, "no_mask")));
    // frame 4 finished after frame 5
    assert!(!latest.publish(Stamped::new(4, "mask")));
    assert!(!latest.publish(Stamped::new(5, "mask")));
    assert_eq!(latest.get(), Some(Stamped::new(5, "no_mask")));
}

#[test]
fn test_latest_get_newer() {
    let latest = Latest::new();
    latest.publish(Stamped::new(2, 'a'));
    assert_eq!(latest.get_newer(1), Some(Stamped::new(2, 'a')));
    assert_eq!(latest.get_newer(2), None);
}

#[test]
fn test_latest_concurrent_publish_keeps_highest() {
    let latest = Latest::new();
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let latest = latest.clone();
            thread::spawn(move || {
                for i in 0..250u64 {
                    latest.publish(Stamped::new(i * 4 + t + 1, ()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(latest.seq(), 1000);
}
