use std::sync::{Arc, Mutex};

use s3_index_core::config::IndexConfig;
use s3_index_core::contract::{
    ListPage, MockObjectStoreClient, ObjectEntry, ObjectStoreClient, StoreError,
};
use s3_index_core::model::FileMetadata;
use s3_index_core::publish::{build_tree, publish, PublishError};

fn folder_entry(key: &str) -> ObjectEntry {
    ObjectEntry {
        key: key.to_string(),
        is_folder_marker: true,
        size: None,
        last_modified: None,
    }
}

fn file_entry(key: &str, size: u64) -> ObjectEntry {
    ObjectEntry {
        key: key.to_string(),
        is_folder_marker: false,
        size: Some(size),
        last_modified: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

#[tokio::test]
async fn publishes_index_per_folder_and_assets_across_pages() {
    let config = IndexConfig::new("my.bucket", "");
    let mut client = MockObjectStoreClient::new();

    // Page 1 ends truncated with a continuation token; page 2 finishes.
    client
        .expect_list_page()
        .withf(|bucket, prefix, token| bucket == "my.bucket" && prefix.is_empty() && token.is_none())
        .times(1)
        .returning(|_, _, _| {
            Ok(ListPage {
                entries: vec![folder_entry("a/"), folder_entry("a/b/")],
                next_token: Some("page-2".to_string()),
                truncated: true,
            })
        });
    client
        .expect_list_page()
        .withf(|_, _, token| token == &Some("page-2"))
        .times(1)
        .returning(|_, _, _| {
            Ok(ListPage {
                entries: vec![file_entry("a/b/c.txt", 1_500_000)],
                next_token: None,
                truncated: false,
            })
        });

    let written: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&written);
    client
        .expect_put_object()
        .times(6)
        .returning(move |_, key, _, content_type, cache_control| {
            assert!(cache_control.is_some(), "every write sets cache-control");
            sink.lock()
                .unwrap()
                .push((key.to_string(), content_type.to_string()));
            Ok(())
        });

    let report = publish(&client, &config).await.expect("publish succeeds");

    assert_eq!(report.folders_total, 3); // root, a/, a/b/
    assert!(report.is_clean());
    assert_eq!(report.indexes_written.len(), 3);
    assert_eq!(report.assets_written.len(), 3);

    let written = written.lock().unwrap();
    let keys: Vec<&str> = written.iter().map(|(k, _)| k.as_str()).collect();
    for expected in [
        "index.html",
        "a/index.html",
        "a/b/index.html",
        "index.css",
        "folder-icon.png",
        "folder-up-icon.png",
    ] {
        assert!(keys.contains(&expected), "missing write for {expected}");
    }
    for (key, content_type) in written.iter() {
        if key.ends_with(".html") {
            assert_eq!(content_type, "text/html");
        } else if key.ends_with(".css") {
            assert_eq!(content_type, "text/css");
        } else {
            assert_eq!(content_type, "image/png");
        }
    }
}

#[tokio::test]
async fn mocked_client_accepts_borrowed_token_and_cache_control() {
    // Drive the mock through the trait seam with short-lived borrows for
    // the optional arguments, the way the pipeline calls it.
    let mut client = MockObjectStoreClient::new();
    client
        .expect_list_page()
        .withf(|_, _, token| token == &Some("resume-here"))
        .times(1)
        .returning(|_, _, _| Ok(ListPage::default()));
    client
        .expect_put_object()
        .withf(|_, _, _, _, cache_control| cache_control == &Some("max-age=2"))
        .times(1)
        .returning(|_, _, _, _, _| Ok(()));

    let client: &dyn ObjectStoreClient = &client;
    let token = String::from("resume-here");
    let page = client
        .list_page("my.bucket", "", Some(token.as_str()))
        .await
        .expect("list page succeeds");
    assert!(!page.truncated);

    let cache = format!("max-age={}", 2);
    client
        .put_object("my.bucket", "index.html", Vec::new(), "text/html", Some(&cache))
        .await
        .expect("put succeeds");
}

#[tokio::test]
async fn listing_failure_aborts_before_anything_is_published() {
    let config = IndexConfig::new("my.bucket", "");
    let mut client = MockObjectStoreClient::new();

    client.expect_list_page().times(1).returning(|_, _, _| {
        Err(StoreError::service(
            "access denied",
            Some(403),
            Some("REQ-1".to_string()),
        ))
    });
    // No put_object expectation: any write would fail the test.

    let err = publish(&client, &config).await.expect_err("must abort");
    match err {
        PublishError::Listing(StoreError::Service { status_code, .. }) => {
            assert_eq!(status_code, Some(403));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn folder_publish_failure_is_isolated() {
    let config = IndexConfig::new("my.bucket", "");
    let mut client = MockObjectStoreClient::new();

    client.expect_list_page().times(1).returning(|_, _, _| {
        Ok(ListPage {
            entries: vec![folder_entry("a/"), folder_entry("b/")],
            next_token: None,
            truncated: false,
        })
    });
    client
        .expect_put_object()
        .times(6)
        .returning(|_, key, _, _, _| {
            if key == "a/index.html" {
                Err(StoreError::service("slow down", Some(503), None))
            } else {
                Ok(())
            }
        });

    let report = publish(&client, &config).await.expect("run continues");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, "a/index.html");
    assert!(report.indexes_written.contains(&"index.html".to_string()));
    assert!(report.indexes_written.contains(&"b/index.html".to_string()));
    assert_eq!(report.assets_written.len(), 3);
}

#[tokio::test]
async fn entries_without_size_fall_back_to_metadata_fetch() {
    let config = IndexConfig::new("my.bucket", "data");
    let mut client = MockObjectStoreClient::new();

    client.expect_list_page().times(1).returning(|_, _, _| {
        Ok(ListPage {
            entries: vec![ObjectEntry {
                key: "data/blob.bin".to_string(),
                is_folder_marker: false,
                size: None,
                last_modified: None,
            }],
            next_token: None,
            truncated: false,
        })
    });
    client
        .expect_get_metadata()
        .withf(|_, key| key == "data/blob.bin")
        .times(1)
        .returning(|_, _| {
            Ok(FileMetadata {
                size: 2048,
                last_modified: Some("2024-02-02T00:00:00Z".to_string()),
                content_type: Some("application/octet-stream".to_string()),
                cache_control: None,
            })
        });

    let tree = build_tree(&client, &config).await.expect("listing succeeds");
    let file = &tree.get("data/").unwrap().files["data/blob.bin"];
    assert_eq!(file.size, 2048);
    assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
}

#[tokio::test]
async fn metadata_failure_during_listing_is_fatal() {
    let config = IndexConfig::new("my.bucket", "");
    let mut client = MockObjectStoreClient::new();

    client.expect_list_page().times(1).returning(|_, _, _| {
        Ok(ListPage {
            entries: vec![ObjectEntry {
                key: "blob.bin".to_string(),
                is_folder_marker: false,
                size: None,
                last_modified: None,
            }],
            next_token: None,
            truncated: false,
        })
    });
    client
        .expect_get_metadata()
        .times(1)
        .returning(|_, _| Err(StoreError::transport("connection reset")));

    let err = build_tree(&client, &config).await.expect_err("must abort");
    match err {
        PublishError::Metadata { key, .. } => assert_eq!(key, "blob.bin"),
        other => panic!("unexpected error: {other:?}"),
    }
}
