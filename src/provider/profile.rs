//! Normalized user profile and the mapping from SimpleID's profile document.
//!
//! SimpleID wraps the user under a `data` key:
//!
//! ```json
//! { "data": { "id": "42", "name": "Jane", "link": "https://id.schat.me/42", "email": "jane@example.com" } }
//! ```
//!
//! [`Profile::parse`] maps that document into the provider-agnostic [`Profile`] shape and
//! keeps both the raw body and the parsed `data` value for consumers that need fields the
//! mapping does not cover.

// crates.io
use serde::{Deserializer, de::Error as DeError};
use serde_json::Value;
// self
use crate::{_prelude::*, provider::PROVIDER_NAME};

/// Single email entry attached to a [`Profile`].
///
/// SimpleID reports one email per account; the entry is always present and `value` is
/// `None` when the document carries no `email` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileEmail {
	/// Email address as reported by the provider.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

/// Provider-agnostic user profile produced for every successful profile request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	/// Always [`PROVIDER_NAME`].
	pub provider: &'static str,
	/// The user's SimpleID.
	pub id: String,
	/// The user's full name.
	pub display_name: Option<String>,
	/// URL of the user's profile page.
	pub profile_url: Option<String>,
	/// The user's email addresses; SimpleID reports exactly one.
	pub emails: Vec<ProfileEmail>,
	/// Exact response body returned by the profile endpoint.
	#[serde(rename = "_raw")]
	pub raw: String,
	/// Parsed `data` object from the response body.
	#[serde(rename = "_json")]
	pub json: Value,
}
impl Profile {
	/// Parses a profile endpoint body.
	///
	/// Fails with [`Error::MalformedProfile`] when the body is not JSON, carries no
	/// `data` object, or lacks a usable `id`. The parse error is kept untouched. Every other
	/// field is optional: `name` and `link` map to `None`, and a missing `email` still
	/// yields the single [`ProfileEmail`] entry with an empty value.
	pub fn parse(body: impl Into<String>) -> Result<Self> {
		let raw = body.into();
		let envelope = serde_json::from_str::<Envelope>(&raw)?;
		let json = envelope.data;
		let data = ProfileData::deserialize(&json)?;

		Ok(Self {
			provider: PROVIDER_NAME,
			id: data.id,
			display_name: data.name,
			profile_url: data.link,
			emails: vec![ProfileEmail { value: data.email }],
			raw,
			json,
		})
	}

	/// First email address, if any.
	pub fn email(&self) -> Option<&str> {
		self.emails.first().and_then(|email| email.value.as_deref())
	}
}

#[derive(Deserialize)]
struct Envelope {
	data: Value,
}

#[derive(Deserialize)]
struct ProfileData {
	#[serde(deserialize_with = "string_or_integer")]
	id: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	link: Option<String>,
	#[serde(default)]
	email: Option<String>,
}

fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Id {
		Text(String),
		Signed(i64),
		Unsigned(u64),
	}

	match Id::deserialize(deserializer) {
		Ok(Id::Text(value)) if !value.is_empty() => Ok(value),
		Ok(Id::Text(_)) => Err(D::Error::custom("profile id is empty")),
		Ok(Id::Signed(value)) => Ok(value.to_string()),
		Ok(Id::Unsigned(value)) => Ok(value.to_string()),
		Err(_) => Err(D::Error::custom("profile id must be a string or an integer")),
	}
}
