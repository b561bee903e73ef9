use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Serializes `value` to JSON, optionally gzip-compresses it, and returns the
/// body with the object key to store it under (`.gz` appended when compressed).
pub fn encode_json(key: &str, value: &impl Serialize, gzip: bool) -> anyhow::Result<(Vec<u8>, String)> {
    let body = serde_json::to_vec(value)?;
    if !gzip {
        return Ok((body, key.to_string()));
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    Ok((encoder.finish()?, format!("{key}.gz")))
}

/// Uploads a value as JSON to an S3 bucket with `application/json` content type.
#[tracing::instrument(skip(client, value))]
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> anyhow::Result<String> {
    let (body, key) = encode_json(key, value, gzip)?;
    let size = body.len();

    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(body.into())
        .content_type("application/json");
    if gzip {
        request = request.content_encoding("gzip");
    }
    request.send().await?;

    info!(bucket, key = %key, size, "Report uploaded to S3");
    Ok(key)
}
