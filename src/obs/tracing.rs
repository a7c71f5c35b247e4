// self
use crate::{
	_prelude::*,
	auth::TokenBundle,
	error::ProfileStage,
	obs::FlowKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by authentication flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_bitbucket.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits one record per extracted token. Secrets render as `<redacted>` (or `<empty>` when the
/// provider omitted them); the response body is never logged.
pub(crate) fn debug_tokens(bundle: &TokenBundle) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(access_token = %bundle.access_token, "Retrieved access token.");
		tracing::debug!(refresh_token = %bundle.refresh_token, "Retrieved refresh token.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = bundle;
	}
}

/// Emits a record once a profile stage completed.
pub(crate) fn debug_profile_stage(stage: ProfileStage, id: &str, email_count: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(stage = stage.as_str(), id, email_count, "Profile stage completed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, id, email_count);
	}
}

/// Emits a record when a profile stage failed.
pub(crate) fn warn_profile_stage(stage: ProfileStage, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(stage = stage.as_str(), error = %error, "Profile stage failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, error);
	}
}
