//! End-to-end: list into the cache, read back, build and export the tree.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aws_sdk_s3::types::StorageClass as SdkStorageClass;
    use s3du_core::{BucketLister, CacheStore, DirectoryNode, NcduExport, S3ObjectSource, StorageClass};

    use crate::{cleanup_bucket, create_test_bucket, put_sized, s3_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_export_listed_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "pipeline").await;
        put_sized(&client, &bucket, "dir/a.txt", 10, SdkStorageClass::Standard).await;
        put_sized(&client, &bucket, "dir/b.txt", 20, SdkStorageClass::Glacier).await;
        put_sized(&client, &bucket, "c.txt", 5, SdkStorageClass::Standard).await;

        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CacheStore::new(dir.path().join("s3du-cache.csv"), Duration::from_secs(3600));
        assert!(!cache.is_fresh(false));

        let lister = BucketLister::new(S3ObjectSource::new(client.clone(), 1))
            .with_bucket(Some(bucket.clone()));
        let mut writer = cache.writer().expect("writer");
        lister.list_into(&mut writer).await.expect("list");
        assert_eq!(writer.commit().expect("commit"), 3);
        assert!(cache.is_fresh(false));

        let listing = cache.read_all(None).expect("read");
        let tree = DirectoryNode::from_records(&listing.records);
        let root = tree.get(&bucket).expect("bucket dir");
        assert_eq!(root.total_size(), 35);
        assert_eq!(root.get("dir").expect("dir").files.len(), 2);

        let json: serde_json::Value =
            serde_json::from_slice(&NcduExport::new(&tree).to_vec().expect("export")).expect("json");
        assert_eq!(json[3][1][0]["name"], bucket.as_str());

        // The emulator may or may not honour storage classes; only check the
        // filter agrees with what was recorded.
        let glacier = cache.read_all(Some(&StorageClass::Glacier)).expect("filtered");
        let expected = listing
            .records
            .iter()
            .filter(|r| r.storage_class == StorageClass::Glacier)
            .count();
        assert_eq!(glacier.records.len(), expected);

        cleanup_bucket(&client, &bucket).await;
    }
}
