// self
use crate::{
	error::ProfileStage,
	obs::{FlowKind, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_bitbucket_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts profile resolutions that failed at `stage`.
pub fn record_profile_stage_failure(stage: ProfileStage) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_bitbucket_profile_stage_failure_total",
			"stage" => stage.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = stage;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_flow_outcome(FlowKind::ProfileResolution, FlowOutcome::Failure);
		record_profile_stage_failure(ProfileStage::Email);
	}
}
