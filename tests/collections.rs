mod support;

use std::sync::Arc;

use modelkit::{props, Collection, Model, QueryOpts, Value};
use support::recording::RecordingProxy;
use support::schemas::{Person, Task};

#[tokio::test]
async fn query_replaces_contents_with_persisted_models() {
    let proxy = Arc::new(RecordingProxy::new().with_rows(vec![
        props! { "id": 1, "title": "one", "done": false },
        props! { "id": 2, "title": "two", "done": true },
    ]));

    let mut tasks: Collection<Task> = Collection::new();
    tasks.push(props! { "title": "stale" });
    tasks.set_data_proxy(proxy.clone());

    let added = tasks.query(None, QueryOpts::default()).await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(proxy.query_count(), 1);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks.at(0).unwrap().get("title"), Some(&Value::from("one")));
    assert_eq!(tasks.at(1).unwrap().get("title"), Some(&Value::from("two")));
    for task in &tasks {
        assert!(!task.is_phantom());
        assert!(task.is_dirty());
    }
}

#[tokio::test]
async fn query_append_keeps_existing_contents() {
    let proxy = Arc::new(RecordingProxy::new().with_rows(vec![props! { "title": "fetched" }]));

    let mut tasks: Collection<Task> = Collection::new();
    tasks.push(props! { "title": "kept" });
    tasks.set_data_proxy(proxy.clone());

    tasks.query(None, QueryOpts::append()).await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks.at(0).unwrap().get("title"), Some(&Value::from("kept")));
    assert_eq!(
        tasks.at(1).unwrap().get("title"),
        Some(&Value::from("fetched"))
    );
}

#[tokio::test]
async fn failed_query_leaves_contents_untouched() {
    let proxy = Arc::new(RecordingProxy::new().failing("offline"));

    let mut tasks: Collection<Task> = Collection::new();
    tasks.push(props! { "title": "survivor" });
    tasks.set_data_proxy(proxy.clone());

    let err = tasks.query(None, QueryOpts::default()).await.unwrap_err();
    assert_eq!(err.message, "offline");
    assert_eq!(tasks.len(), 1);
    assert_eq!(
        tasks.first().unwrap().get("title"),
        Some(&Value::from("survivor"))
    );
}

#[tokio::test]
async fn query_merges_permanent_and_per_call_params() {
    let proxy = Arc::new(RecordingProxy::new());

    let mut tasks: Collection<Task> = Collection::new();
    tasks.set_data_proxy(proxy.clone());
    tasks.set_query_param("tenant", "acme");
    tasks.set_query_param("archived", false);

    tasks
        .query(Some(props! { "archived": true }), QueryOpts::default())
        .await
        .unwrap();

    let seen = proxy.last_params().unwrap();
    assert_eq!(seen.get("tenant"), Some(&Value::from("acme")));
    assert_eq!(seen.get("archived"), Some(&Value::from(true)));
}

#[tokio::test]
async fn queried_models_commit_like_any_other() {
    let proxy = Arc::new(RecordingProxy::new().with_rows(vec![props! { "title": "fresh" }]));

    let mut tasks: Collection<Task> = Collection::new();
    tasks.set_data_proxy(proxy.clone());
    tasks.query(None, QueryOpts::default()).await.unwrap();

    assert_eq!(tasks.dirty_models().len(), 1);
    for task in tasks.models_mut() {
        task.commit(None);
    }
    assert!(tasks.dirty_models().is_empty());
}

#[test]
fn push_accepts_models_props_and_containers() {
    let mut people: Collection<Person> = Collection::new();

    people.push(Model::<Person>::new());
    people.push(props! { "name": "  Ada  " });
    people.push(vec![
        Model::<Person>::create(props! { "name": "Grace" }),
        Model::<Person>::new(),
    ]);
    people.push([props! { "name": "Edsger" }, props! { "name": "Barbara" }]);

    assert_eq!(people.len(), 6);
    // plain data went through the factory, so the trim mutation applied
    assert_eq!(people.at(1).unwrap().get("name"), Some(&Value::from("Ada")));
    assert_eq!(
        people.at(4).unwrap().get("name"),
        Some(&Value::from("Edsger"))
    );
}

#[test]
fn removal_and_membership_go_by_identity() {
    let mut people: Collection<Person> = Collection::new();
    let ada = Model::<Person>::create(props! { "name": "Ada" });
    let twin = Model::<Person>::create(props! { "name": "Ada" });
    people.push(ada.clone());
    people.push(twin.clone());

    assert!(people.contains(&ada));
    assert!(people.remove(&ada));
    assert!(!people.contains(&ada));
    assert!(people.contains(&twin));
    assert_eq!(people.len(), 1);
}
