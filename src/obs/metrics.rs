// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"simpleid_flow_total",
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

/// Records success or failure for a finished flow, logging the error when tracing is on.
pub fn record_result<T>(kind: FlowKind, result: &Result<T>) {
	record_result_with(kind, result, |_| FlowOutcome::Success);
}

/// Like [`record_result`], but lets `classify` decide how an `Ok` value is counted.
///
/// Flows that report rejections as values (rather than errors) use it to keep the
/// failure counter honest.
pub fn record_result_with<T, F>(kind: FlowKind, result: &Result<T>, classify: F)
where
	F: FnOnce(&T) -> FlowOutcome,
{
	match result {
		Ok(value) => record_flow_outcome(kind, classify(value)),
		Err(err) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(flow = kind.as_str(), error = %err, "SimpleID flow failed.");
			#[cfg(not(feature = "tracing"))]
			let _ = err;

			record_flow_outcome(kind, FlowOutcome::Failure);
		},
	}
}
