// ABOUTME: Amazon ECR implementation of the Registry trait over aws-sdk-ecr.
// ABOUTME: Maps SDK service errors onto RegistryError and decodes push credentials.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecr::Client;
use aws_sdk_ecr::config::Region;
use aws_sdk_ecr::error::{DisplayErrorContext, SdkError};
use aws_sdk_ecr::operation::describe_images::DescribeImagesError;
use aws_sdk_ecr::types::{DescribeImagesFilter, ImageDetail, ImageIdentifier, TagStatus};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;
use tracing::debug;

use super::{AuthorizationToken, ImageManifest, ImageRecord, Registry, RegistryError, RegistryInventory};
use crate::types::{ImageDigest, ImageTag, RepositoryName};

const PAGE_SIZE: i32 = 100;

/// ECR client for one region.
pub struct EcrRegistry {
    client: Client,
}

impl EcrRegistry {
    /// Build a client from the default AWS credential chain.
    ///
    /// `region` overrides the region from the environment or profile.
    pub async fn connect(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            debug!("Using ECR region: {}", region);
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl Registry for EcrRegistry {
    async fn list_images(
        &self,
        repository: &RepositoryName,
    ) -> Result<RegistryInventory, RegistryError> {
        let mut inventory = Vec::new();
        let mut next_token = None;

        loop {
            let output = self
                .client
                .describe_images()
                .repository_name(repository.as_str())
                .filter(
                    DescribeImagesFilter::builder()
                        .tag_status(TagStatus::Tagged)
                        .build(),
                )
                .max_results(PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| describe_images_error(repository.as_str(), e))?;

            inventory.extend(output.image_details().iter().filter_map(to_record));

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(
            repository = %repository,
            images = inventory.len(),
            "Fetched tagged images"
        );
        Ok(inventory)
    }

    async fn describe_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ImageRecord, RegistryError> {
        let reference = format!("{repository}:{tag}");
        let output = self
            .client
            .describe_images()
            .repository_name(repository.as_str())
            .image_ids(ImageIdentifier::builder().image_tag(tag.as_str()).build())
            .send()
            .await
            .map_err(|e| describe_images_error(&reference, e))?;

        output
            .image_details()
            .iter()
            .find_map(to_record)
            .ok_or(RegistryError::ImageNotFound(reference))
    }

    async fn get_manifest(
        &self,
        repository: &RepositoryName,
        digest: &ImageDigest,
    ) -> Result<Option<ImageManifest>, RegistryError> {
        let output = self
            .client
            .batch_get_image()
            .repository_name(repository.as_str())
            .image_ids(
                ImageIdentifier::builder()
                    .image_digest(digest.as_str())
                    .build(),
            )
            .send()
            .await
            .map_err(api_error)?;

        Ok(output.images().first().and_then(|image| {
            Some(ImageManifest {
                body: image.image_manifest()?.to_string(),
                media_type: image.image_manifest_media_type().map(str::to_string),
            })
        }))
    }

    async fn put_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
        manifest: &ImageManifest,
    ) -> Result<Option<ImageDigest>, RegistryError> {
        let output = self
            .client
            .put_image()
            .repository_name(repository.as_str())
            .image_tag(tag.as_str())
            .image_manifest(manifest.body.as_str())
            .set_image_manifest_media_type(manifest.media_type.clone())
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .image()
            .and_then(|image| image.image_id())
            .and_then(|id| id.image_digest())
            .map(ImageDigest::from))
    }

    async fn repository_exists(&self, repository: &RepositoryName) -> Result<bool, RegistryError> {
        match self
            .client
            .describe_repositories()
            .repository_names(repository.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_repository_not_found_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(api_error(err)),
        }
    }

    async fn create_repository(&self, repository: &RepositoryName) -> Result<(), RegistryError> {
        match self
            .client
            .create_repository()
            .repository_name(repository.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(()),
            // Created by someone else between the existence check and now
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_repository_already_exists_exception()) =>
            {
                Ok(())
            }
            Err(err) => Err(api_error(err)),
        }
    }

    async fn authorization_token(&self) -> Result<AuthorizationToken, RegistryError> {
        let output = self
            .client
            .get_authorization_token()
            .send()
            .await
            .map_err(api_error)?;

        let data = output
            .authorization_data()
            .first()
            .ok_or_else(|| RegistryError::Authorization("no authorization data returned".into()))?;
        let encoded = data
            .authorization_token()
            .ok_or_else(|| RegistryError::Authorization("authorization token missing".into()))?;
        let endpoint = data
            .proxy_endpoint()
            .ok_or_else(|| RegistryError::Authorization("proxy endpoint missing".into()))?;

        decode_token(encoded, endpoint)
    }
}

fn to_record(detail: &ImageDetail) -> Option<ImageRecord> {
    Some(ImageRecord {
        digest: ImageDigest::new(detail.image_digest()?),
        tags: detail.image_tags().to_vec(),
        pushed_at: detail
            .image_pushed_at()
            .and_then(|at| DateTime::from_timestamp(at.secs(), at.subsec_nanos())),
    })
}

fn describe_images_error<R>(subject: &str, err: SdkError<DescribeImagesError, R>) -> RegistryError
where
    R: std::fmt::Debug,
{
    let service_error = err.as_service_error();
    if service_error.is_some_and(|e| e.is_image_not_found_exception()) {
        return RegistryError::ImageNotFound(subject.to_string());
    }
    if service_error.is_some_and(|e| e.is_repository_not_found_exception()) {
        return RegistryError::RepositoryNotFound(subject.to_string());
    }
    api_error(err)
}

fn api_error<E, R>(err: SdkError<E, R>) -> RegistryError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    RegistryError::Api(DisplayErrorContext(&err).to_string())
}

/// ECR tokens are base64 of `user:password`.
fn decode_token(encoded: &str, endpoint: &str) -> Result<AuthorizationToken, RegistryError> {
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| RegistryError::Authorization(format!("token is not base64: {e}")))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| RegistryError::Authorization("token is not valid UTF-8".into()))?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| RegistryError::Authorization("token has no user:password pair".into()))?;

    Ok(AuthorizationToken {
        username: username.to_string(),
        password: password.to_string(),
        endpoint: endpoint.to_string(),
    })
}
