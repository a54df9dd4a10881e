use thiserror::Error;

/// Error taxonomy for the tracking core.
///
/// None of these are fatal: every variant is recovered locally by skipping
/// the affected asset (or delivery) and letting the next cycle retry.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Provider returned no usable pairs, or the sentinel `0`.
    #[error("no usable valuation data for {address}")]
    DataUnavailable { address: String },

    /// A store row failed to parse into a TrackedAsset.
    #[error("malformed row: {reason}")]
    MalformedRow { reason: String },

    /// A progress write matched no row for the address.
    #[error("store write conflict for {address}")]
    StoreWriteConflict { address: String },

    /// Notifier call failed. State is still persisted so a transient
    /// outage cannot cause re-notification storms.
    #[error("notification delivery failed: {reason}")]
    DeliveryFailure { reason: String },
}
