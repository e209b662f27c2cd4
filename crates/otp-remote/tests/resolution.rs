//! Integration tests for reference resolution
//!
//! These tests verify the full load path:
//! - nested references resolve depth first
//! - lists mix inline values and locators, keeping order
//! - each (locator, type) is fetched once per load
//! - the first failure aborts the load and names its locator
//! - a document reached again on its own path is a cycle

use async_trait::async_trait;
use otp_remote::prelude::*;
use otp_remote::{FetchError, StaticFetcher};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Avatar {
    url: String,
    size: u32,
}

otp_remote::resolvable!(Avatar);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    bio: String,
    avatar: RemoteResource<Avatar>,
}

otp_remote::resolvable!(Profile { avatar });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    profile: RemoteResource<Profile>,
    #[serde(default)]
    friends: RemoteResourceList<Profile>,
}

otp_remote::resolvable!(User { profile, friends });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Chapter {
    title: String,
    #[serde(default)]
    next: RemoteResource<Box<Chapter>>,
}

otp_remote::resolvable!(Chapter { next });

/// Records every fetch before delegating to an in-memory store
#[derive(Debug, Default)]
struct CountingFetcher {
    documents: StaticFetcher,
    calls: Mutex<HashMap<String, usize>>,
}

impl CountingFetcher {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(Locator::parse(url).unwrap(), body);
        self
    }

    fn calls(&self, url: &str) -> usize {
        self.calls.lock().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError> {
        *self.calls.lock().entry(locator.to_string()).or_default() += 1;
        self.documents.fetch(locator).await
    }
}

fn documents() -> CountingFetcher {
    CountingFetcher::default()
        .with(
            "https://api.example.com/profiles/ada",
            r#"{"bio": "Analyst", "avatar": "https://api.example.com/avatars/ada"}"#,
        )
        .with(
            "https://api.example.com/avatars/ada",
            r#"{"url": "https://cdn.example.com/ada.png", "size": 128}"#,
        )
        .with(
            "https://api.example.com/profiles/grace",
            r#"{"bio": "Admiral", "avatar": {"url": "grace.png", "size": 64}}"#,
        )
}

fn loader(fetcher: Arc<CountingFetcher>, format: DocumentFormat) -> Loader {
    Loader::new(LoaderConfig::default().with_format(format), fetcher)
}

#[tokio::test]
async fn nested_references_resolve_depth_first() {
    let fetcher = Arc::new(documents());
    let user: User = loader(fetcher.clone(), DocumentFormat::Json)
        .load(br#"{"name": "Ada", "profile": "https://api.example.com/profiles/ada"}"#)
        .await
        .unwrap();

    let profile = user.profile.value().unwrap();
    assert_eq!(profile.bio, "Analyst");
    assert_eq!(profile.avatar.value().map(|a| a.size), Some(128));
    assert_eq!(fetcher.calls("https://api.example.com/profiles/ada"), 1);
    assert_eq!(fetcher.calls("https://api.example.com/avatars/ada"), 1);
}

#[tokio::test]
async fn mixed_list_keeps_order() {
    let fetcher = Arc::new(documents());
    let user: User = loader(fetcher, DocumentFormat::Json)
        .load(
            br#"{
                "name": "Ada",
                "profile": {"bio": "inline", "avatar": null},
                "friends": [
                    "https://api.example.com/profiles/grace",
                    {"bio": "Local", "avatar": "https://api.example.com/avatars/ada"},
                    "https://api.example.com/profiles/ada"
                ]
            }"#,
        )
        .await
        .unwrap();

    let bios: Vec<String> = user
        .friends
        .clone()
        .into_values()
        .unwrap()
        .into_iter()
        .map(|p| p.bio)
        .collect();
    assert_eq!(bios, ["Admiral", "Local", "Analyst"]);
    assert!(user.profile.value().unwrap().avatar.is_empty());
}

#[tokio::test]
async fn shared_reference_is_fetched_once() {
    let fetcher = Arc::new(documents());
    let user: User = loader(fetcher.clone(), DocumentFormat::Json)
        .load(
            br#"{
                "name": "Ada",
                "profile": "https://api.example.com/profiles/ada",
                "friends": [
                    "https://api.example.com/profiles/ada",
                    "https://api.example.com/profiles/ada"
                ]
            }"#,
        )
        .await
        .unwrap();

    assert_eq!(fetcher.calls("https://api.example.com/profiles/ada"), 1);
    assert_eq!(fetcher.calls("https://api.example.com/avatars/ada"), 1);

    let friends = user.friends.into_values().unwrap();
    assert_eq!(friends[0], friends[1]);
    assert_eq!(Some(&friends[0]), user.profile.value());
}

#[tokio::test]
async fn each_load_uses_a_fresh_cache() {
    let fetcher = Arc::new(documents());
    let loader = loader(fetcher.clone(), DocumentFormat::Json);
    let root = br#"{"name": "Ada", "profile": "https://api.example.com/profiles/ada"}"#;

    loader.load::<User>(root).await.unwrap();
    loader.load::<User>(root).await.unwrap();

    assert_eq!(fetcher.calls("https://api.example.com/profiles/ada"), 2);
}

#[tokio::test]
async fn missing_reference_aborts_load() {
    let fetcher = Arc::new(documents());
    let err = loader(fetcher.clone(), DocumentFormat::Json)
        .load::<User>(
            br#"{
                "name": "Ada",
                "profile": "https://api.example.com/profiles/ada",
                "friends": [
                    "https://api.example.com/profiles/grace",
                    "https://api.example.com/profiles/missing",
                    "https://api.example.com/profiles/never"
                ]
            }"#,
        )
        .await
        .unwrap_err();

    let err = match err {
        RemoteError::Resolve(err) => err,
        other => panic!("expected resolve error, got {other:?}"),
    };
    let missing = Locator::parse("https://api.example.com/profiles/missing").unwrap();
    assert_eq!(err.locator(), Some(&missing));
    assert!(matches!(
        err,
        ResolveError::Fetch {
            source: FetchError::NotFound(_),
            ..
        }
    ));
    assert_eq!(fetcher.calls("https://api.example.com/profiles/never"), 0);
}

#[tokio::test]
async fn fetched_documents_use_the_session_format() {
    let fetcher = Arc::new(
        CountingFetcher::default()
            .with(
                "https://api.example.com/profiles/ada",
                "bio: Analyst\navatar:\n  url: ada.png\n  size: 32\n",
            ),
    );
    let user: User = loader(fetcher, DocumentFormat::Yaml)
        .load(b"name: Ada\nprofile: https://api.example.com/profiles/ada\n")
        .await
        .unwrap();

    assert_eq!(user.profile.value().map(|p| p.bio.as_str()), Some("Analyst"));
}

#[tokio::test]
async fn resolved_document_encodes_to_original_shape() {
    let fetcher = Arc::new(documents());
    let user: User = loader(fetcher, DocumentFormat::Json)
        .load(br#"{"name": "Ada", "profile": "https://api.example.com/profiles/ada"}"#)
        .await
        .unwrap();

    let encoded = serde_json::to_value(&user).unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({
            "name": "Ada",
            "profile": "https://api.example.com/profiles/ada",
            "friends": []
        })
    );
}

#[tokio::test]
async fn resolving_twice_is_a_no_op() {
    let fetcher = Arc::new(documents());
    let loader = loader(fetcher.clone(), DocumentFormat::Json);
    let mut user: User = loader
        .load(br#"{"name": "Ada", "profile": "https://api.example.com/profiles/ada"}"#)
        .await
        .unwrap();
    let before = user.clone();

    let session = loader.session(DecodeContext::new());
    user.resolve(&session).await.unwrap();

    assert_eq!(user, before);
    assert_eq!(fetcher.calls("https://api.example.com/profiles/ada"), 1);
}

#[tokio::test]
async fn cycle_across_documents_is_reported_once_fetched() {
    let fetcher = Arc::new(
        CountingFetcher::default()
            .with(
                "https://api.example.com/chapters/a",
                r#"{"title": "A", "next": "https://api.example.com/chapters/b"}"#,
            )
            .with(
                "https://api.example.com/chapters/b",
                r#"{"title": "B", "next": "https://api.example.com/chapters/a"}"#,
            ),
    );

    let err = loader(fetcher.clone(), DocumentFormat::Json)
        .load::<Chapter>(br#"{"title": "Root", "next": "https://api.example.com/chapters/a"}"#)
        .await
        .unwrap_err();

    let a = Locator::parse("https://api.example.com/chapters/a").unwrap();
    assert_eq!(err, RemoteError::Resolve(ResolveError::Cycle(a)));
    assert_eq!(fetcher.calls("https://api.example.com/chapters/a"), 1);
    assert_eq!(fetcher.calls("https://api.example.com/chapters/b"), 1);
}

#[tokio::test]
async fn diamond_is_not_a_cycle() {
    let fetcher = Arc::new(documents());
    let user: User = loader(fetcher.clone(), DocumentFormat::Json)
        .load(
            br#"{
                "name": "Ada",
                "profile": "https://api.example.com/profiles/ada",
                "friends": [{"bio": "Twin", "avatar": "https://api.example.com/avatars/ada"}]
            }"#,
        )
        .await
        .unwrap();

    let friends = user.friends.into_values().unwrap();
    assert_eq!(friends[0].avatar.value(), user.profile.value().unwrap().avatar.value());
    assert_eq!(fetcher.calls("https://api.example.com/avatars/ada"), 1);
}
