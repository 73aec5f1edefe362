//! Bucket lister integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::types::StorageClass as SdkStorageClass;
    use s3du_core::{BucketLister, ObjectRecord, ObjectSource, S3ObjectSource, StorageClass};

    use crate::{cleanup_bucket, create_test_bucket, put_sized, s3_client};

    async fn populate_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
        let keys = [
            ("photos/2024/jan/img1.jpg", 10),
            ("photos/2024/jan/img2.jpg", 20),
            ("photos/2025/mar/img3.jpg", 30),
            ("documents/report.pdf", 40),
            ("root.txt", 5),
        ];
        for (key, size) in keys {
            put_sized(client, bucket, key, size, SdkStorageClass::Standard).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_bucket_with_sizes() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "lister").await;
        populate_bucket(&client, &bucket).await;

        let lister = BucketLister::new(S3ObjectSource::new(client.clone(), 1000))
            .with_bucket(Some(bucket.clone()));
        let mut out: Vec<ObjectRecord> = Vec::new();
        let count = lister.list_into(&mut out).await.expect("list");

        assert_eq!(count, 5);
        let root = out.iter().find(|r| r.key == "root.txt").expect("root.txt");
        assert_eq!(root.size, 5);
        assert_eq!(root.storage_class, StorageClass::Standard);
        assert!(out.iter().all(|r| r.bucket == bucket));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_paginate_with_small_pages() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "pages").await;
        for i in 0..5 {
            put_sized(&client, &bucket, &format!("key-{i:03}"), 1, SdkStorageClass::Standard).await;
        }

        let lister = BucketLister::new(S3ObjectSource::new(client.clone(), 2))
            .with_bucket(Some(bucket.clone()));
        let mut out: Vec<ObjectRecord> = Vec::new();
        lister.list_into(&mut out).await.expect("list");

        let keys: Vec<&str> = out.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["key-000", "key-001", "key-002", "key-003", "key-004"]);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_restrict_to_normalized_prefix() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "prefix").await;
        populate_bucket(&client, &bucket).await;
        put_sized(&client, &bucket, "photos-old.zip", 1, SdkStorageClass::Standard).await;

        let lister = BucketLister::new(S3ObjectSource::new(client.clone(), 1000))
            .with_bucket(Some(bucket.clone()))
            .with_prefix(Some("photos"));
        let mut out: Vec<ObjectRecord> = Vec::new();
        assert_eq!(lister.list_into(&mut out).await.expect("list"), 3);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_enumerate_bucket_names() {
        let client = s3_client();
        let first = create_test_bucket(&client, "names").await;
        let second = create_test_bucket(&client, "names").await;

        let names = S3ObjectSource::new(client.clone(), 1000)
            .bucket_names()
            .await
            .expect("list buckets");
        assert!(names.contains(&first));
        assert!(names.contains(&second));

        cleanup_bucket(&client, &first).await;
        cleanup_bucket(&client, &second).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_empty_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "empty").await;

        let lister = BucketLister::new(S3ObjectSource::new(client.clone(), 1000))
            .with_bucket(Some(bucket.clone()));
        let mut out: Vec<ObjectRecord> = Vec::new();
        assert_eq!(lister.list_into(&mut out).await.expect("list"), 0);

        cleanup_bucket(&client, &bucket).await;
    }
}
