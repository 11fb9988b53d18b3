use crate::{Counter, Handler, Storage};

#[test]
fn storage_keeps_errors_in_order() {
    let storage = Storage::<String>::new();

    storage.receive("first");
    storage.receive("second".to_string());

    assert_eq!(*storage.as_vec(), vec!["first", "second"]);
    assert_eq!(storage.into_vec(), vec!["first", "second"]);
}

#[test]
fn storage_behind_a_trait_object() {
    let storage = Storage::<String>::default();

    {
        let handler: &dyn Handler<&str> = &storage;

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| handler.receive("error"));
            }
        });
    }

    assert_eq!(storage.into_vec().len(), 4);
}

#[test]
fn counter_counts_across_threads() {
    let counter = Counter::default();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for i in 0..16 {
                    counter.receive(i);
                }
            });
        }
    });

    assert_eq!(counter.count(), 64);
}
