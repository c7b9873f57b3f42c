//! gleaner-engine - Stateless selective-harvesting pagination.
//!
//! This crate turns a harvester's request (format + optional date range +
//! optional set + optional resumption token) into a deterministic,
//! resumable sequence of bounded pages over a
//! [`RecordStore`](gleaner_core::RecordStore). The server keeps no session
//! state: the entire harvest position travels inside an HMAC-protected
//! opaque token, so any instance holding the signing keys can serve any
//! page of any harvest.
//!
//! # Example
//!
//! ```no_run
//! use gleaner_engine::{Harvester, HarvestConfig, HarvestRequest, SigningKey, SigningKeys};
//! # use gleaner_core::{DeletionPolicy, RangeQuery, RecordStore, FormatRegistry, MetadataPrefix, StoredRecord};
//! # struct MyStore;
//! # #[async_trait::async_trait]
//! # impl RecordStore for MyStore {
//! #     fn deletion_policy(&self) -> DeletionPolicy { DeletionPolicy::Persistent }
//! #     async fn page_after(&self, _: &RangeQuery) -> gleaner_core::Result<Vec<StoredRecord>> { Ok(vec![]) }
//! # }
//! # struct MyRegistry;
//! # impl FormatRegistry for MyRegistry {
//! #     fn exists(&self, _: &MetadataPrefix) -> bool { true }
//! # }
//!
//! # async fn example() -> gleaner_core::Result<()> {
//! let keys = SigningKeys::new(SigningKey::new(b"server-held secret".to_vec()));
//! let harvester = Harvester::new(MyStore, MyRegistry, keys, HarvestConfig::default());
//!
//! let mut request = HarvestRequest {
//!     metadata_prefix: Some("oai_dc".to_string()),
//!     from: Some("2024-01-01".to_string()),
//!     ..Default::default()
//! };
//!
//! loop {
//!     let page = harvester.produce_next_page(&request).await?;
//!     for record in &page.records {
//!         println!("{}", record.header.id);
//!     }
//!     match page.resumption_token {
//!         Some(token) => request = HarvestRequest::resume(token),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod harvest;
pub mod normalize;
pub mod producer;
pub mod token;

pub use config::HarvestConfig;
pub use harvest::{Harvester, HarvestRequest};
pub use normalize::normalize;
pub use producer::{PageProducer, ProducedPage};
pub use token::{SigningKey, SigningKeys, TokenCodec};
