use chrono::{Duration, Utc};
use listing_comments_api::{
    domain::comment::{
        convert::RowConverter,
        entity::{Comment, PublicComment, REFERENCE_UNIX_SECONDS},
        errors::ConversionError,
        rows::{CommentListRow, PostCommentRow},
        value_objects::{ListingId, Username},
    },
    infrastructure::security::{
        IdentifierError, IdentifierValidator,
        redaction::{remove_emails, remove_links, remove_phone_numbers},
    },
};
use serde_json::{Value, json};
use uuid::Uuid;

fn comment() -> Comment {
    Comment {
        listing_id: "32707340".to_string(),
        comment_id: Uuid::now_v7(),
        user_ip: "2001:db8::1".to_string(),
        user_id: Uuid::now_v7().to_string(),
        username: "TestUser".to_string(),
        comment_text: "Nice yard".to_string(),
        timestamp: Utc::now().timestamp(),
    }
}

#[test]
fn rows_round_trip_identifier_and_listing_for_every_shape() {
    let converter = RowConverter::default();
    let original = comment();

    let post: PostCommentRow = converter.to_row(&original);
    let list: CommentListRow = converter.to_row(&original);
    let json: Value = converter.to_row(&original);

    for back in [
        converter.to_comment(&post).unwrap(),
        converter.to_comment(&list).unwrap(),
        converter.to_comment(&json).unwrap(),
    ] {
        assert_eq!(back.comment_id, original.comment_id);
        assert_eq!(back.listing_id, original.listing_id);
    }
}

#[test]
fn converter_names_the_failure() {
    let converter = RowConverter::default();
    assert_eq!(
        converter.to_comment(&json!("row")),
        Err(ConversionError::UnsupportedShape { shape: "json" })
    );
    assert_eq!(
        converter.to_comment(&json!({ "listing_id": "foo" })),
        Err(ConversionError::MissingField {
            field: "comment_id"
        })
    );

    let mut stale: Value = converter.to_row(&comment());
    stale["extract"] = json!(REFERENCE_UNIX_SECONDS - 1);
    assert!(matches!(
        converter.to_comment(&stale),
        Err(ConversionError::StaleTimestamp { .. })
    ));
}

#[test]
fn public_projection_omits_address_and_submitter() {
    let public = PublicComment::from_comments(vec![comment()]);
    let json = serde_json::to_value(&public).unwrap();
    let keys: Vec<_> = json[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        keys.len(),
        5,
        "unexpected public fields: {keys:?}"
    );
    for hidden in ["user_ip", "user_id"] {
        assert!(json[0].get(hidden).is_none());
    }
}

#[test]
fn identifier_window_is_reference_to_now_plus_skew() {
    let now = Utc::now();
    let validator = IdentifierValidator::default();
    let minted = |at: i64| {
        uuid::Builder::from_unix_timestamp_millis(at as u64, &[1; 10])
            .into_uuid()
            .to_string()
    };

    assert!(validator
        .validate_at(&minted(REFERENCE_UNIX_SECONDS * 1_000), now)
        .is_ok());
    assert!(validator.validate_at(&minted(now.timestamp_millis()), now).is_ok());
    assert!(matches!(
        validator.validate_at(&minted(REFERENCE_UNIX_SECONDS * 1_000 - 1), now),
        Err(IdentifierError::TimestampTooOld { .. })
    ));
    assert!(matches!(
        validator.validate_at(&minted((now + Duration::hours(2)).timestamp_millis()), now),
        Err(IdentifierError::TimestampTooNew { .. })
    ));
}

#[test]
fn redaction_examples() {
    assert_eq!(
        remove_links("Visit https://secure.com for info"),
        "Visit [link removed] for info"
    );
    assert_eq!(remove_emails("Edge case: a@b.c"), "Edge case: a@b.c");
    assert_eq!(remove_emails("test@example.com"), "[email removed]");
    assert_eq!(remove_phone_numbers("123-4567"), "123-4567");
    assert_eq!(remove_phone_numbers("555-123-4567"), "[phone number removed]");
    assert_eq!(
        remove_phone_numbers("555-123-4567x89"),
        "[phone number removed]x89"
    );
}

#[test]
fn listing_id_value_object() {
    assert!(ListingId::new("32707340".to_string()).is_ok());
    assert!(ListingId::new("".to_string()).is_err());
    assert!(ListingId::new("<b>1</b>".to_string()).is_err());
}

#[test]
fn username_value_object() {
    assert!(Username::new("TestUser".to_string()).is_ok());
    assert!(Username::new("ab".to_string()).is_err());
    assert!(Username::new("a".repeat(26)).is_err());
}
