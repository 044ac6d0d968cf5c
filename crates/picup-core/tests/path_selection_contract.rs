//! Contract Test: Folder Selection
//!
//! Constraints verified:
//! - Remote path defaults until a non-empty selection is applied
//! - Cancelled or malformed remote selections change nothing
//! - A source folder change moves the watermark to now, compared against
//!   the old folder minus one trailing separator
//! - The comparison happens before the new source path is written

mod common;

use common::*;
use picup_core::keys;
use picup_core::traits::PreferenceStore;
use picup_core::{FolderSelection, PictureUploadsConfig, StaticAccountDirectory};

#[tokio::test]
async fn remote_path_defaults_on_fresh_store() {
    let h = Harness::without_accounts();
    assert_eq!(h.reconciler.remote_path().await.unwrap(), "/CameraUpload");
}

#[tokio::test]
async fn remote_path_default_is_configurable() {
    let h = Harness::build(
        StaticAccountDirectory::new(),
        PictureUploadsConfig::new()
            .with_default_remote_path("/Uploads/Camera")
            .with_default_source_path("/storage/emulated/0/DCIM"),
    );

    assert_eq!(h.reconciler.remote_path().await.unwrap(), "/Uploads/Camera");
    assert_eq!(
        h.reconciler.source_path().await.unwrap(),
        "/storage/emulated/0/DCIM"
    );
}

#[tokio::test]
async fn selected_remote_path_is_stored() {
    let h = Harness::without_accounts();

    h.reconciler
        .apply_selected_remote_path(Some(&FolderSelection::new("/Photos")))
        .await
        .unwrap();

    assert_eq!(h.reconciler.remote_path().await.unwrap(), "/Photos");
}

#[tokio::test]
async fn cancelled_remote_selection_is_a_no_op() {
    let h = Harness::without_accounts();
    h.reconciler
        .apply_selected_remote_path(Some(&FolderSelection::new("/Photos")))
        .await
        .unwrap();
    h.log.clear();

    h.reconciler.apply_selected_remote_path(None).await.unwrap();
    h.reconciler
        .apply_selected_remote_path(Some(&FolderSelection::empty()))
        .await
        .unwrap();
    h.reconciler
        .apply_selected_remote_path(Some(&FolderSelection::new("")))
        .await
        .unwrap();

    assert!(h.log.calls().is_empty());
    assert_eq!(h.reconciler.remote_path().await.unwrap(), "/Photos");
}

#[tokio::test]
async fn source_path_defaults_on_fresh_store() {
    let h = Harness::without_accounts();
    assert_eq!(h.reconciler.source_path().await.unwrap(), "/sdcard/DCIM/Camera");
}

#[tokio::test]
async fn trailing_separator_difference_does_not_reset_watermark() {
    let h = Harness::without_accounts();
    h.store
        .put_string(keys::PICTURE_UPLOADS_SOURCE_PATH, "/sdcard/Pictures/")
        .await
        .unwrap();
    h.log.clear();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/Pictures")))
        .await
        .unwrap();

    assert!(h.log.last_sync_updates().is_empty());
    assert_eq!(h.reconciler.source_path().await.unwrap(), "/sdcard/Pictures");
}

#[tokio::test]
async fn identical_source_path_does_not_reset_watermark() {
    let h = Harness::without_accounts();
    h.store
        .put_string(keys::PICTURE_UPLOADS_SOURCE_PATH, "/sdcard/Pictures")
        .await
        .unwrap();
    h.log.clear();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/Pictures")))
        .await
        .unwrap();

    assert!(h.log.last_sync_updates().is_empty());
    // Still rewritten
    assert_eq!(
        h.log.calls(),
        vec![Call::PutString(
            keys::PICTURE_UPLOADS_SOURCE_PATH.to_string(),
            "/sdcard/Pictures".to_string()
        )]
    );
}

#[tokio::test]
async fn changed_source_path_resets_watermark_to_now() {
    let h = Harness::without_accounts();
    h.store
        .put_string(keys::PICTURE_UPLOADS_SOURCE_PATH, "/sdcard/Pictures")
        .await
        .unwrap();
    h.log.clear();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/DCIM")))
        .await
        .unwrap();

    assert_eq!(h.log.last_sync_updates(), vec![NOW_MILLIS]);
    assert_eq!(h.reconciler.source_path().await.unwrap(), "/sdcard/DCIM");
}

#[tokio::test]
async fn new_path_with_trailing_separator_counts_as_change() {
    // Only the stored side is normalized
    let h = Harness::without_accounts();
    h.store
        .put_string(keys::PICTURE_UPLOADS_SOURCE_PATH, "/sdcard/Pictures")
        .await
        .unwrap();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/Pictures/")))
        .await
        .unwrap();

    assert_eq!(h.log.last_sync_updates(), vec![NOW_MILLIS]);
    assert_eq!(h.reconciler.source_path().await.unwrap(), "/sdcard/Pictures/");
}

#[tokio::test]
async fn only_one_trailing_separator_is_trimmed() {
    let h = Harness::without_accounts();
    h.store
        .put_string(keys::PICTURE_UPLOADS_SOURCE_PATH, "/sdcard/Pictures//")
        .await
        .unwrap();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/Pictures")))
        .await
        .unwrap();

    assert_eq!(h.log.last_sync_updates(), vec![NOW_MILLIS]);
}

#[tokio::test]
async fn default_source_path_is_compared_when_unset() {
    let h = Harness::without_accounts();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/DCIM/Camera")))
        .await
        .unwrap();

    assert!(h.log.last_sync_updates().is_empty());
}

#[tokio::test]
async fn absent_source_selection_resets_watermark_without_writing() {
    let h = Harness::without_accounts();

    h.reconciler.apply_selected_source_path(None).await.unwrap();
    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::empty()))
        .await
        .unwrap();

    assert_eq!(
        h.log.calls(),
        vec![Call::SetLastSync(NOW_MILLIS), Call::SetLastSync(NOW_MILLIS)]
    );
    assert!(
        !h.store
            .contains(keys::PICTURE_UPLOADS_SOURCE_PATH)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn watermark_reset_precedes_source_path_write() {
    let h = Harness::without_accounts();

    h.reconciler
        .apply_selected_source_path(Some(&FolderSelection::new("/sdcard/Screenshots")))
        .await
        .unwrap();

    let reset = h
        .log
        .position(|c| matches!(c, Call::SetLastSync(_)))
        .expect("watermark reset");
    let write = h
        .log
        .position(|c| matches!(c, Call::PutString(k, _) if k == keys::PICTURE_UPLOADS_SOURCE_PATH))
        .expect("source path write");
    assert!(reset < write);
}

#[tokio::test]
async fn reads_go_through_the_store_every_time() {
    let h = Harness::without_accounts();

    h.reconciler.remote_path().await.unwrap();
    h.reconciler.remote_path().await.unwrap();

    assert_eq!(h.store.read_count(), 2);
}
