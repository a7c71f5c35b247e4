//! Normalized Bitbucket profile and the merge rules for both upstream payloads.

// self
use crate::{_prelude::*, error::JsonPathError};

/// Single `{ value }` entry used for emails and photos.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileValue {
	/// Email address or photo URL.
	pub value: String,
}
impl ProfileValue {
	/// Wraps `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: value.into() }
	}
}

/// Structured name. Bitbucket exposes a single `display_name`, so every part carries it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileName {
	/// Family name.
	pub family_name: String,
	/// Given name.
	pub given_name: String,
	/// Middle name.
	pub middle_name: String,
}

/// Profile handed to the verify callback.
///
/// Serializes with camelCase keys and the raw account body under `_json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitbucketProfile {
	/// Always `"bitbucket"`.
	pub provider: String,
	/// Account identifier (`account_id`) as text.
	pub id: String,
	/// Account `username`.
	pub display_name: String,
	/// Name parts, all equal to the account `display_name`.
	pub name: ProfileName,
	/// Account emails; a single empty entry until the email stage fills it.
	pub emails: Vec<ProfileValue>,
	/// Exactly one entry: the avatar URL.
	pub photos: Vec<ProfileValue>,
	/// Raw account body, plus the raw email values under `emails` once resolved.
	#[serde(rename = "_json")]
	pub raw: JsonValue,
}
impl BitbucketProfile {
	/// Provider label stamped on every profile.
	pub const PROVIDER: &'static str = "bitbucket";

	/// Builds the account-stage profile from the `GET /2.0/user` body.
	///
	/// `account_id`, `username`, `display_name`, and `links.avatar.href` are required.
	pub fn from_account(raw: JsonValue) -> Result<Self, JsonPathError> {
		let account: AccountFields = serde_path_to_error::deserialize(&raw)?;
		let name = ProfileName {
			family_name: account.display_name.clone(),
			given_name: account.display_name.clone(),
			middle_name: account.display_name,
		};

		Ok(Self {
			provider: Self::PROVIDER.into(),
			id: account.account_id.into_text(),
			display_name: account.username,
			name,
			emails: vec![ProfileValue::default()],
			photos: vec![ProfileValue::new(account.links.avatar.href)],
			raw,
		})
	}

	/// Merges the `GET /2.0/user/emails` body into the profile.
	///
	/// A non-empty `values` array replaces `emails` (in order) and is copied into `raw.emails`.
	/// An empty array keeps the placeholder entry and leaves `raw` untouched.
	pub fn with_emails(mut self, page: &JsonValue) -> Result<Self, JsonPathError> {
		let parsed: EmailPage = serde_path_to_error::deserialize(page)?;

		if parsed.values.is_empty() {
			return Ok(self);
		}

		self.emails =
			parsed.values.into_iter().map(|entry| ProfileValue::new(entry.email)).collect();

		if let (Some(object), Some(values)) = (self.raw.as_object_mut(), page.get("values")) {
			object.insert("emails".into(), values.clone());
		}

		Ok(self)
	}

	/// First email address, if the email stage produced one.
	pub fn primary_email(&self) -> Option<&str> {
		self.emails.first().map(|entry| entry.value.as_str()).filter(|value| !value.is_empty())
	}
}

#[derive(Deserialize)]
struct AccountFields {
	account_id: AccountId,
	username: String,
	display_name: String,
	links: AccountLinks,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccountId {
	Text(String),
	Number(serde_json::Number),
}
impl AccountId {
	fn into_text(self) -> String {
		match self {
			AccountId::Text(text) => text,
			AccountId::Number(number) => number.to_string(),
		}
	}
}

#[derive(Deserialize)]
struct AccountLinks {
	avatar: Link,
}

#[derive(Deserialize)]
struct Link {
	href: String,
}

#[derive(Deserialize)]
struct EmailPage {
	values: Vec<EmailEntry>,
}

#[derive(Deserialize)]
struct EmailEntry {
	email: String,
}
