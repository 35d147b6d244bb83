use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref DIGITS: regex::Regex = regex::Regex::new(r"^[0-9]+$").unwrap();
    static ref ALPHANUMERIC: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9]+$").unwrap();
    static ref PRINTABLE_ASCII: regex::Regex = regex::Regex::new(r"^[\x20-\x7E]+$").unwrap();
}

/// Reference to the listing page a comment belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingId {
    #[validate(length(min = 1, max = 20), regex(path = *DIGITS))]
    pub value: String,
}

impl ListingId {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let listing_id = Self { value };
        listing_id.validate()?;
        Ok(listing_id)
    }
}

/// Textual IPv4 or IPv6 address of the submitting client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserIp {
    #[validate(ip)]
    pub value: String,
}

impl UserIp {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let ip = Self { value };
        ip.validate()?;
        Ok(ip)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Username {
    #[validate(length(min = 3, max = 25), regex(path = *ALPHANUMERIC))]
    pub value: String,
}

impl Username {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let username = Self { value };
        username.validate()?;
        Ok(username)
    }
}

/// Comment body: printable ASCII only, so tabs and newlines are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentText {
    #[validate(length(min = 1, max = 300), regex(path = *PRINTABLE_ASCII))]
    pub value: String,
}

impl CommentText {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let text = Self { value };
        text.validate()?;
        Ok(text)
    }
}
