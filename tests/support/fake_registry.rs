// ABOUTME: In-memory Registry with ECR's tag semantics.
// ABOUTME: Counts mutations and can inject lookup and put failures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecr_release::registry::{
    AuthorizationToken, ImageManifest, ImageRecord, Registry, RegistryError, RegistryInventory,
};
use ecr_release::types::{ImageDigest, ImageTag, RepositoryName};
use std::collections::HashSet;
use std::sync::Mutex;

pub const ENDPOINT: &str = "https://123456789012.dkr.ecr.eu-west-1.amazonaws.com";

#[derive(Debug, Clone)]
struct FakeImage {
    digest: ImageDigest,
    tags: Vec<String>,
    pushed_at: Option<DateTime<Utc>>,
    manifest: Option<String>,
}

#[derive(Debug)]
struct Inner {
    exists: bool,
    images: Vec<FakeImage>,
    mutations: usize,
    calls: Vec<String>,
    failing_tags: HashSet<String>,
    fail_inventory: bool,
    put_without_digest: bool,
}

#[derive(Debug)]
pub struct FakeRegistry {
    inner: Mutex<Inner>,
}

pub fn manifest_for(digest: &str) -> String {
    format!(r#"{{"schemaVersion":2,"config":{{"digest":"{digest}"}}}}"#)
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRegistry {
    /// Existing, empty repository.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                exists: true,
                images: Vec::new(),
                mutations: 0,
                calls: Vec::new(),
                failing_tags: HashSet::new(),
                fail_inventory: false,
                put_without_digest: false,
            }),
        }
    }

    pub fn missing_repository() -> Self {
        let registry = Self::new();
        registry.inner.lock().unwrap().exists = false;
        registry
    }

    pub fn with_image(self, digest: &str, tags: &[&str]) -> Self {
        self.push_image(digest, tags, None, Some(manifest_for(digest)))
    }

    pub fn with_image_pushed_at(self, digest: &str, tags: &[&str], secs: i64) -> Self {
        let pushed_at = DateTime::from_timestamp(secs, 0);
        self.push_image(digest, tags, pushed_at, Some(manifest_for(digest)))
    }

    pub fn with_image_without_manifest(self, digest: &str, tags: &[&str]) -> Self {
        self.push_image(digest, tags, None, None)
    }

    /// Lookups of `tag` fail with an API error instead of answering.
    pub fn failing_lookup(self, tag: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .failing_tags
            .insert(tag.to_string());
        self
    }

    pub fn failing_inventory(self) -> Self {
        self.inner.lock().unwrap().fail_inventory = true;
        self
    }

    /// Puts succeed but report no resulting digest.
    pub fn put_without_digest(self) -> Self {
        self.inner.lock().unwrap().put_without_digest = true;
        self
    }

    fn push_image(
        self,
        digest: &str,
        tags: &[&str],
        pushed_at: Option<DateTime<Utc>>,
        manifest: Option<String>,
    ) -> Self {
        self.inner.lock().unwrap().images.push(FakeImage {
            digest: ImageDigest::new(digest),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            pushed_at,
            manifest,
        });
        self
    }

    /// Number of create-repository and put-image calls.
    pub fn mutations(&self) -> usize {
        self.inner.lock().unwrap().mutations
    }

    /// Every registry call, in order, as `operation argument`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn repository_exists_now(&self) -> bool {
        self.inner.lock().unwrap().exists
    }

    pub fn digest_of(&self, tag: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .images
            .iter()
            .find(|image| image.tags.iter().any(|t| t == tag))
            .map(|image| image.digest.to_string())
    }

    pub fn tags_of(&self, digest: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .images
            .iter()
            .find(|image| image.digest.as_str() == digest)
            .map(|image| image.tags.clone())
            .unwrap_or_default()
    }

    pub fn manifest_of(&self, digest: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .images
            .iter()
            .find(|image| image.digest.as_str() == digest)
            .and_then(|image| image.manifest.clone())
    }

    fn record(&self, call: String) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

fn to_record(image: &FakeImage) -> ImageRecord {
    ImageRecord {
        digest: image.digest.clone(),
        tags: image.tags.clone(),
        pushed_at: image.pushed_at,
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn list_images(
        &self,
        repository: &RepositoryName,
    ) -> Result<RegistryInventory, RegistryError> {
        self.record(format!("list_images {repository}"));
        let inner = self.inner.lock().unwrap();
        if inner.fail_inventory {
            return Err(RegistryError::Api("ThrottlingException".to_string()));
        }
        if !inner.exists {
            return Err(RegistryError::RepositoryNotFound(repository.to_string()));
        }
        Ok(inner
            .images
            .iter()
            .filter(|image| !image.tags.is_empty())
            .map(to_record)
            .collect())
    }

    async fn describe_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ImageRecord, RegistryError> {
        self.record(format!("describe_image {tag}"));
        let inner = self.inner.lock().unwrap();
        if inner.failing_tags.contains(tag.as_str()) {
            return Err(RegistryError::Api("ThrottlingException".to_string()));
        }
        inner
            .images
            .iter()
            .find(|image| image.tags.iter().any(|t| t == tag.as_str()))
            .map(to_record)
            .ok_or_else(|| RegistryError::ImageNotFound(format!("{repository}:{tag}")))
    }

    async fn get_manifest(
        &self,
        _repository: &RepositoryName,
        digest: &ImageDigest,
    ) -> Result<Option<ImageManifest>, RegistryError> {
        self.record(format!("get_manifest {digest}"));
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .images
            .iter()
            .find(|image| &image.digest == digest)
            .and_then(|image| image.manifest.clone())
            .map(ImageManifest::new))
    }

    async fn put_image(
        &self,
        _repository: &RepositoryName,
        tag: &ImageTag,
        manifest: &ImageManifest,
    ) -> Result<Option<ImageDigest>, RegistryError> {
        self.record(format!("put_image {tag}"));
        let mut inner = self.inner.lock().unwrap();
        inner.mutations += 1;

        let Some(index) = inner
            .images
            .iter()
            .position(|image| image.manifest.as_deref() == Some(manifest.body.as_str()))
        else {
            return Err(RegistryError::Api("manifest does not match any image".into()));
        };

        // One digest per tag: drop it wherever it points now.
        for image in inner.images.iter_mut() {
            image.tags.retain(|t| t != tag.as_str());
        }
        inner.images[index].tags.push(tag.to_string());

        if inner.put_without_digest {
            return Ok(None);
        }
        Ok(Some(inner.images[index].digest.clone()))
    }

    async fn repository_exists(&self, repository: &RepositoryName) -> Result<bool, RegistryError> {
        self.record(format!("repository_exists {repository}"));
        Ok(self.inner.lock().unwrap().exists)
    }

    async fn create_repository(&self, repository: &RepositoryName) -> Result<(), RegistryError> {
        self.record(format!("create_repository {repository}"));
        let mut inner = self.inner.lock().unwrap();
        inner.mutations += 1;
        inner.exists = true;
        Ok(())
    }

    async fn authorization_token(&self) -> Result<AuthorizationToken, RegistryError> {
        self.record("authorization_token".to_string());
        Ok(AuthorizationToken {
            username: "AWS".to_string(),
            password: "fake-password".to_string(),
            endpoint: ENDPOINT.to_string(),
        })
    }
}
