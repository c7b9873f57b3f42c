//! Harvest orchestration.
//!
//! [`Harvester`] is the single entry point consumed by the transport
//! layer. It routes fresh parameters through the normalizer and
//! continuation tokens through the codec, hands the resulting cursor to
//! the page producer, and packages the outcome as a [`Page`]. It holds no
//! state across calls; every call is fully determined by its input.

use tracing::{debug, instrument};

use gleaner_core::{Clock, Error, FormatRegistry, Page, RecordStore, Result, SystemClock};

use crate::config::HarvestConfig;
use crate::normalize::normalize;
use crate::producer::PageProducer;
use crate::token::{SigningKeys, TokenCodec};

/// Raw selective-harvesting parameters, as parsed from the request.
///
/// All fields are optional strings; validation happens in the normalizer
/// and codec, not at this boundary.
#[derive(Debug, Clone, Default)]
pub struct HarvestRequest {
    /// The requested metadata format (required unless resuming).
    pub metadata_prefix: Option<String>,

    /// Inclusive lower datestamp bound.
    pub from: Option<String>,

    /// Inclusive upper datestamp bound.
    pub until: Option<String>,

    /// Set filter.
    pub set: Option<String>,

    /// Continuation token from a previous page. Exclusive of every other
    /// parameter.
    pub resumption_token: Option<String>,
}

impl HarvestRequest {
    /// A continuation request carrying only a resumption token.
    pub fn resume(token: impl Into<String>) -> Self {
        Self {
            resumption_token: Some(token.into()),
            ..Default::default()
        }
    }

    fn has_selective_params(&self) -> bool {
        self.metadata_prefix.is_some()
            || self.from.is_some()
            || self.until.is_some()
            || self.set.is_some()
    }
}

/// The stateless harvest entry point.
///
/// Any server instance holding the same signing keys and read access to
/// the record store can serve any page of any harvest.
#[derive(Debug)]
pub struct Harvester<S, R, C = SystemClock> {
    producer: PageProducer<S>,
    registry: R,
    codec: TokenCodec,
    clock: C,
    config: HarvestConfig,
}

impl<S: RecordStore, R: FormatRegistry> Harvester<S, R, SystemClock> {
    /// Create a harvester driven by the wall clock.
    pub fn new(store: S, registry: R, keys: SigningKeys, config: HarvestConfig) -> Self {
        Self::with_clock(store, registry, keys, config, SystemClock)
    }
}

impl<S: RecordStore, R: FormatRegistry, C: Clock> Harvester<S, R, C> {
    /// Create a harvester with an injected clock.
    pub fn with_clock(
        store: S,
        registry: R,
        keys: SigningKeys,
        config: HarvestConfig,
        clock: C,
    ) -> Self {
        Self {
            producer: PageProducer::new(store, config.clone()),
            registry,
            codec: TokenCodec::new(keys),
            clock,
            config,
        }
    }

    /// Produce the next page for a harvest request.
    ///
    /// A request carrying a resumption token resumes the harvest encoded in
    /// it; any other request starts a fresh harvest. The returned page
    /// carries the successor token, or no token when the harvest is
    /// complete.
    ///
    /// # Errors
    ///
    /// See [`gleaner_core::Error`]; only
    /// [`StoreUnavailable`](gleaner_core::Error::StoreUnavailable) is
    /// retryable, by resubmitting the identical request.
    #[instrument(skip(self, request))]
    pub async fn produce_next_page(&self, request: &HarvestRequest) -> Result<Page> {
        let now = self.clock.now();

        let cursor = match &request.resumption_token {
            Some(token) => {
                if request.has_selective_params() {
                    return Err(Error::BadArgument {
                        message: "resumptionToken is exclusive of other parameters".to_string(),
                    });
                }
                self.codec.decode(token, now)?
            }
            None => normalize(request, &self.registry, &self.config, now)?,
        };

        let produced = self.producer.next_page(&cursor, now).await?;

        let resumption_token = produced
            .next
            .as_ref()
            .map(|successor| self.codec.encode(successor))
            .transpose()?;

        debug!(
            records = produced.records.len(),
            complete = resumption_token.is_none(),
            "Produced harvest page"
        );

        Ok(Page {
            records: produced.records,
            resumption_token,
        })
    }
}
