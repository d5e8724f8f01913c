// self
use crate::{_prelude::*, oauth::Endpoint, obs::FlowKind};

/// Future returned by [`FlowSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span covering one strategy flow.
///
/// Emitted as `simpleid.flow` with `flow` and `stage` set up front. `endpoint` is set when
/// the flow targets a SimpleID endpoint, and `http.status` is filled in by
/// [`record_http_status`] once the provider answers.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	kind: FlowKind,
	endpoint: Option<Endpoint>,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` at the given call site.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		let span = tracing::info_span!(
			"simpleid.flow",
			flow = kind.as_str(),
			stage,
			endpoint = tracing::field::Empty,
			http.status = tracing::field::Empty
		);
		#[cfg(not(feature = "tracing"))]
		let _ = stage;

		Self {
			kind,
			endpoint: None,
			#[cfg(feature = "tracing")]
			span,
		}
	}

	/// Tags the span with the SimpleID endpoint the flow calls.
	pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
		#[cfg(feature = "tracing")]
		{
			self.span.record("endpoint", endpoint.as_str());
		}

		self.endpoint = Some(endpoint);

		self
	}

	/// Flow the span belongs to.
	pub fn kind(&self) -> FlowKind {
		self.kind
	}

	/// Endpoint tagged through [`with_endpoint`](Self::with_endpoint), if any.
	pub fn endpoint(&self) -> Option<Endpoint> {
		self.endpoint
	}

	/// Enters the span for a synchronous section.
	pub fn entered(self) -> FlowSpanGuard {
		FlowSpanGuard {
			#[cfg(feature = "tracing")]
			_entered: self.span.entered(),
		}
	}

	/// Runs `fut` inside the span; no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Keeps a [`FlowSpan`] entered until dropped.
#[must_use]
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

/// Records the provider's HTTP status on the flow span currently entered.
///
/// Outside a flow span (or without `tracing`) the call does nothing.
pub fn record_http_status(status: u16) {
	#[cfg(feature = "tracing")]
	{
		tracing::Span::current().record("http.status", status);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = status;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn span_keeps_flow_and_endpoint() {
		let span = FlowSpan::new(FlowKind::UserProfile, "user_profile");

		assert_eq!(span.kind(), FlowKind::UserProfile);
		assert_eq!(span.endpoint(), None);

		let span = span.with_endpoint(Endpoint::UserProfile);

		assert_eq!(span.endpoint(), Some(Endpoint::UserProfile));

		let _guard = span.entered();

		record_http_status(200);
	}

	#[test]
	fn status_outside_a_flow_is_ignored() {
		record_http_status(503);
	}

	#[tokio::test]
	async fn instrumented_exchange_records_status() {
		let span =
			FlowSpan::new(FlowKind::Authenticate, "authenticate").with_endpoint(Endpoint::Token);
		let status = span
			.instrument(async {
				record_http_status(400);

				400_u16
			})
			.await;

		assert_eq!(status, 400);
		assert_eq!(span.endpoint(), Some(Endpoint::Token));
	}
}
