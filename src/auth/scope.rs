//! Bitbucket scope vocabulary and the ordered scope list requested during authorization.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

macro_rules! def_scopes {
	($($variant:ident => $value:literal, $doc:literal;)+) => {
		/// Permission strings understood by Bitbucket's authorization endpoint.
		#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub enum BitbucketScope {
			$(
				#[doc = $doc]
				$variant,
			)+
		}
		impl BitbucketScope {
			/// Every scope in the vocabulary, in documentation order.
			pub const ALL: &'static [BitbucketScope] = &[$(BitbucketScope::$variant,)+];

			/// Returns the wire representation of the scope.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(BitbucketScope::$variant => $value,)+
				}
			}
		}
		impl FromStr for BitbucketScope {
			type Err = ScopeValidationError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($value => Ok(BitbucketScope::$variant),)+
					"" => Err(ScopeValidationError::Empty),
					other => Err(ScopeValidationError::Unknown { scope: other.to_owned() }),
				}
			}
		}
	};
}

def_scopes! {
	Account => "account", "Read account details.";
	AccountWrite => "account:write", "Modify account details.";
	Team => "team", "Read workspace membership.";
	TeamWrite => "team:write", "Administer workspace membership.";
	Repository => "repository", "Read repositories.";
	RepositoryWrite => "repository:write", "Push to repositories.";
	RepositoryAdmin => "repository:admin", "Administer repositories.";
	PullRequest => "pullRequest", "Read pull requests.";
	PullRequestWrite => "pullRequest:write", "Create and modify pull requests.";
	Snippet => "snippet", "Read snippets.";
	SnippetWrite => "snippet:write", "Create and modify snippets.";
	Issue => "issue", "Read issues.";
	IssueWrite => "issue:write", "Create and modify issues.";
	Wiki => "wiki", "Read and write wikis.";
	Email => "email", "Read the account's email addresses.";
	Webhook => "webhook", "Manage webhooks.";
	Pipeline => "pipeline", "Read pipelines.";
	PipelineWrite => "pipeline:write", "Run pipelines.";
	PipelineVariable => "pipeline:variable", "Manage pipeline variables.";
	Runner => "runner", "Read pipeline runners.";
	RunnerWrite => "runner:write", "Manage pipeline runners.";
}

impl Display for BitbucketScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl Serialize for BitbucketScope {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for BitbucketScope {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(DeError::custom)
	}
}

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// At least one scope must be requested; empty entries are rejected too.
	#[error("Scope list cannot be empty.")]
	Empty,
	/// The scope is not part of Bitbucket's vocabulary.
	#[error("Unknown Bitbucket scope: {scope}.")]
	Unknown {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered, non-empty, duplicate-free list of scopes.
///
/// Unlike a sorted set, the list keeps the order it was configured in because that order is
/// what ends up in the authorize URL. Repeated scopes keep their first position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ScopeList {
	scopes: Arc<[BitbucketScope]>,
}
impl ScopeList {
	/// Builds a list from any iterator of scopes.
	pub fn new<I>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = BitbucketScope>,
	{
		let mut ordered = Vec::new();

		for scope in scopes {
			if !ordered.contains(&scope) {
				ordered.push(scope);
			}
		}

		if ordered.is_empty() {
			return Err(ScopeValidationError::Empty);
		}

		Ok(Self { scopes: Arc::from(ordered) })
	}

	/// Parses each string against the vocabulary before building the list.
	pub fn parse<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let parsed = scopes
			.into_iter()
			.map(|scope| scope.as_ref().parse::<BitbucketScope>())
			.collect::<Result<Vec<_>, _>>()?;

		Self::new(parsed)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Always `false`; kept for API symmetry with collections.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: BitbucketScope) -> bool {
		self.scopes.contains(&scope)
	}

	/// Iterator over scopes in configured order.
	pub fn iter(&self) -> ScopeIter<'_> {
		ScopeIter { inner: self.scopes.iter() }
	}

	/// Joins the scopes with `delimiter`, preserving configured order.
	pub fn join(&self, delimiter: char) -> String {
		let mut buf = String::new();

		for (idx, scope) in self.scopes.iter().enumerate() {
			if idx > 0 {
				buf.push(delimiter);
			}

			buf.push_str(scope.as_str());
		}

		buf
	}

	/// Returns the space-delimited representation sent as the `scope` parameter.
	pub fn normalized(&self) -> String {
		self.join(' ')
	}

	/// Returns the underlying slice of scopes.
	pub fn as_slice(&self) -> &[BitbucketScope] {
		&self.scopes
	}
}
impl Default for ScopeList {
	fn default() -> Self {
		Self { scopes: Arc::from([BitbucketScope::Account]) }
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.scopes).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl From<BitbucketScope> for ScopeList {
	fn from(scope: BitbucketScope) -> Self {
		Self { scopes: Arc::from([scope]) }
	}
}
impl TryFrom<Vec<BitbucketScope>> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<BitbucketScope>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ScopeList {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s.split_whitespace())
	}
}

/// Iterator over scopes in configured order.
pub struct ScopeIter<'a> {
	inner: Iter<'a, BitbucketScope>,
}
impl Iterator for ScopeIter<'_> {
	type Item = BitbucketScope;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().copied()
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = BitbucketScope;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<BitbucketScope>>::deserialize(deserializer)?;

		ScopeList::new(values).map_err(DeError::custom)
	}
}
