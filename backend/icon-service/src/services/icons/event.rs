//! Event decoder - extracts the source object from a storage notification
//!
//! Only the first record of a notification is processed. Keys arrive
//! form-URL-encoded and are decoded before use.

use crate::error::{IconError, Result};
use crate::models::ObjectLocation;
use aws_lambda_events::event::s3::S3Event;
use tracing::warn;

/// Extract the source bucket and key from the first record of `event`.
pub fn decode_event(event: &S3Event) -> Result<ObjectLocation> {
    let record = event
        .records
        .first()
        .ok_or_else(|| IconError::MalformedEvent("notification contains no records".into()))?;

    if event.records.len() > 1 {
        warn!(
            ignored = event.records.len() - 1,
            "Notification has multiple records, processing only the first"
        );
    }

    location_from_parts(
        record.s3.bucket.name.as_deref(),
        record.s3.object.key.as_deref(),
    )
}

fn location_from_parts(bucket: Option<&str>, key: Option<&str>) -> Result<ObjectLocation> {
    let bucket = bucket
        .filter(|b| !b.is_empty())
        .ok_or_else(|| IconError::MalformedEvent("record is missing the bucket name".into()))?;
    let raw_key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
        IconError::MalformedEvent(format!(
            "record for bucket {bucket} is missing the object key"
        ))
    })?;

    let key = decode_key(raw_key)?;
    Ok(ObjectLocation::new(bucket, key))
}

/// Notification keys use form encoding: `+` is a space, `%XX` an escape.
fn decode_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| {
            IconError::MalformedEvent(format!("object key {raw:?} is not valid UTF-8: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(bucket: &str, key: &str) -> serde_json::Value {
        json!({
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "us-east-1",
            "eventTime": "2024-01-01T00:00:00.000Z",
            "eventName": "ObjectCreated:Put",
            "userIdentity": { "principalId": "EXAMPLE" },
            "requestParameters": { "sourceIPAddress": "127.0.0.1" },
            "responseElements": {
                "x-amz-request-id": "EXAMPLE123456789",
                "x-amz-id-2": "EXAMPLE123/5678abcdefghijklambdaisawesome/mnopqrstuvwxyzABCDEFGH"
            },
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "gen-icons",
                "bucket": {
                    "name": bucket,
                    "ownerIdentity": { "principalId": "EXAMPLE" },
                    "arn": format!("arn:aws:s3:::{bucket}")
                },
                "object": {
                    "key": key,
                    "size": 1024,
                    "eTag": "0123456789abcdef0123456789abcdef",
                    "sequencer": "0A1B2C3D4E5F678901"
                }
            }
        })
    }

    fn event(records: Vec<serde_json::Value>) -> S3Event {
        serde_json::from_value(json!({ "Records": records })).expect("valid S3 event")
    }

    #[test]
    fn test_decode_first_record() {
        let event = event(vec![record("photos-in", "user123.png")]);
        let location = decode_event(&event).unwrap();
        assert_eq!(location, ObjectLocation::new("photos-in", "user123.png"));
    }

    #[test]
    fn test_only_first_record_is_used() {
        let event = event(vec![
            record("photos-in", "first.png"),
            record("photos-in", "second.png"),
        ]);
        let location = decode_event(&event).unwrap();
        assert_eq!(location.key, "first.png");
    }

    #[test]
    fn test_zero_records_is_malformed() {
        let event = event(Vec::new());
        assert!(matches!(
            decode_event(&event),
            Err(IconError::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_key_is_form_decoded() {
        let event = event(vec![record("photos-in", "my+holiday%2Fbeach+%281%29.png")]);
        let location = decode_event(&event).unwrap();
        assert_eq!(location.key, "my holiday/beach (1).png");
    }

    #[test]
    fn test_missing_parts_are_malformed() {
        assert!(matches!(
            location_from_parts(None, Some("k")),
            Err(IconError::MalformedEvent(_))
        ));
        assert!(matches!(
            location_from_parts(Some("b"), None),
            Err(IconError::MalformedEvent(_))
        ));
        assert!(matches!(
            location_from_parts(Some(""), Some("k")),
            Err(IconError::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_key_is_malformed() {
        assert!(matches!(
            decode_key("bad%FF%FEkey"),
            Err(IconError::MalformedEvent(_))
        ));
    }
}
