// ABOUTME: Tag command implementation.
// ABOUTME: Applies a stage tag to an existing image outside of CloudFormation.

use ecr_release::error::{Error, Result};
use ecr_release::output::Output;
use ecr_release::registry::EcrRegistry;
use ecr_release::stage::{StageTagRequest, StageTagger};
use ecr_release::types::{ImageTag, RepositoryName};

pub async fn tag(
    repository: RepositoryName,
    source: &str,
    stage: &str,
    region: Option<&str>,
    mut output: Output,
) -> Result<()> {
    let request = StageTagRequest {
        repository,
        source_tag: ImageTag::new(source).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        stage_tag: ImageTag::new(stage).map_err(|e| Error::InvalidConfig(e.to_string()))?,
    };
    output.start_timer();
    output.progress(&format!(
        "Tagging {}:{} as {}",
        request.repository, request.source_tag, request.stage_tag
    ));

    let registry = EcrRegistry::connect(region).await;
    let result = StageTagger::new(&registry).tag_with_stage(&request).await?;

    output.result(
        &format!(
            "{}:{} -> {}",
            result.repository_name, result.stage_tag, result.image_digest
        ),
        &result,
    );
    Ok(())
}
